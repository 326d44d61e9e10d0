//! Tab builder registry and `[TabCreators]` resolution.
//!
//! Builders are registered explicitly by name at startup. The configuration
//! then picks which of them become tabs, and in what order:
//!
//! ```toml
//! [TabCreators]
//! "Main" = "app_tab"
//! "Settings" = "settings_tab"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use toml::Value;

use crate::config::Settings;
use crate::constants::{BUILDER_SUFFIX, TAB_CREATORS_SECTION};
use crate::error::{ConfigError, RegistryError, ResolveError, UnknownBuilderError};

/// A tab builder.
///
/// Receives the scoped panel context `C` of the tab it builds and returns the
/// handles `H` of the widgets it created.
pub type Builder<C, H> = Arc<dyn Fn(&mut C) -> anyhow::Result<H> + Send + Sync>;

/// Named tab builders available to the configuration.
pub struct CallableRegistry<C, H> {
    builders: HashMap<String, Builder<C, H>>,
}

impl<C, H> Default for CallableRegistry<C, H> {
    fn default() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }
}

impl<C, H> fmt::Debug for CallableRegistry<C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableRegistry")
            .field("builders", &self.names())
            .finish()
    }
}

impl<C, H> CallableRegistry<C, H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a builder under `name`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::MissingSuffix`] if `name` does not end with [`BUILDER_SUFFIX`]
    /// - [`RegistryError::Duplicate`] if `name` is already registered
    pub fn register<F>(&mut self, name: impl Into<String>, builder: F) -> Result<(), RegistryError>
    where
        F: Fn(&mut C) -> anyhow::Result<H> + Send + Sync + 'static,
    {
        let name = name.into();
        if !name.ends_with(BUILDER_SUFFIX) {
            return Err(RegistryError::MissingSuffix {
                name,
                suffix: BUILDER_SUFFIX,
            });
        }
        if self.builders.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.builders.insert(name, Arc::new(builder));
        Ok(())
    }

    /// Builds a registry from candidates, keeping only names tagged with
    /// [`BUILDER_SUFFIX`]. Later duplicates replace earlier ones.
    pub fn from_tagged<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = (S, Builder<C, H>)>,
        S: Into<String>,
    {
        let builders = candidates
            .into_iter()
            .map(|(name, builder)| (name.into(), builder))
            .filter(|(name, _)| name.ends_with(BUILDER_SUFFIX))
            .collect();
        Self { builders }
    }

    /// Looks up a builder by name.
    pub fn get(&self, name: &str) -> Option<&Builder<C, H>> {
        self.builders.get(name)
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered builders.
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

/// One resolved tab.
pub struct PlannedTab<C, H> {
    /// Tab display name.
    pub name: String,
    /// Name of the builder it resolved to.
    pub builder_name: String,
    /// The builder itself.
    pub builder: Builder<C, H>,
}

/// Tabs in declaration order, each paired with its builder.
pub struct TabPlan<C, H> {
    tabs: Vec<PlannedTab<C, H>>,
}

impl<C, H> fmt::Debug for TabPlan<C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.tabs.iter().map(|t| (&t.name, &t.builder_name)))
            .finish()
    }
}

impl<C, H> TabPlan<C, H> {
    /// Number of tabs.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if no tabs are planned.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Iterates over tabs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PlannedTab<C, H>> {
        self.tabs.iter()
    }

    /// Tab names in declaration order.
    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Resolves `[TabCreators]` against the available builders.
///
/// A missing section yields an empty plan. Every entry must name a
/// registered builder; otherwise nothing is returned.
///
/// # Errors
///
/// - [`ConfigError::InvalidSection`] if `TabCreators` is not a table
/// - [`ConfigError::InvalidValue`] if a builder name is not a string
/// - [`UnknownBuilderError`] if a builder name is not registered
pub fn resolve<C, H>(
    settings: &Settings,
    available: &CallableRegistry<C, H>,
) -> Result<TabPlan<C, H>, ResolveError> {
    let Some(section) = settings.tree().get(TAB_CREATORS_SECTION) else {
        tracing::warn!("No [{}] section in configuration", TAB_CREATORS_SECTION);
        return Ok(TabPlan { tabs: Vec::new() });
    };

    let Value::Table(entries) = section else {
        return Err(ConfigError::InvalidSection {
            section: TAB_CREATORS_SECTION.to_string(),
            reason: format!("expected a table, found {}", section.type_str()),
        }
        .into());
    };

    let mut tabs = Vec::with_capacity(entries.len());
    for (tab, value) in entries {
        let builder_name = value.as_str().ok_or_else(|| ConfigError::InvalidValue {
            key: format!("{TAB_CREATORS_SECTION}.{tab}"),
            expected: "a builder name string",
            found: value.type_str(),
        })?;

        let builder = available
            .get(builder_name)
            .ok_or_else(|| UnknownBuilderError {
                tab: tab.clone(),
                builder: builder_name.to_string(),
            })?;

        tracing::debug!(tab = %tab, builder = %builder_name, "Resolved tab builder");
        tabs.push(PlannedTab {
            name: tab.clone(),
            builder_name: builder_name.to_string(),
            builder: Arc::clone(builder),
        });
    }

    Ok(TabPlan { tabs })
}

/// Loads the configuration file at `path` and resolves its tabs.
pub fn resolve_file<C, H>(
    path: impl AsRef<Path>,
    available: &CallableRegistry<C, H>,
) -> Result<TabPlan<C, H>, ResolveError> {
    let settings = Settings::load(path)?;
    resolve(&settings, available)
}
