//! Building resolved tabs and wiring the first tab's events.

use std::fmt;

use crate::error::{AssembleError, MissingFirstTabError};
use crate::registry::TabPlan;

/// A UI host that can hold tabs.
///
/// `with_tab` opens a tab, hands its panel to `build` so widgets created
/// there become children of that tab, then closes it. When `build` fails the
/// host must leave no trace of the tab.
pub trait TabContainer {
    /// Scoped context a builder writes its widgets into.
    type Panel;

    /// Runs `build` inside a new tab titled `title`.
    fn with_tab<R>(
        &mut self,
        title: &str,
        build: impl FnOnce(&mut Self::Panel) -> anyhow::Result<R>,
    ) -> anyhow::Result<R>;
}

/// Handles returned by each tab's builder, in tab order.
#[derive(Clone, PartialEq, Eq)]
pub struct TabResults<H> {
    entries: Vec<(String, H)>,
}

impl<H: fmt::Debug> fmt::Debug for TabResults<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<H> Default for TabResults<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> TabResults<H> {
    /// First tab's name and handles.
    pub fn first(&self) -> Option<(&str, &H)> {
        self.entries.first().map(|(name, h)| (name.as_str(), h))
    }

    /// Handles of the tab named `tab`.
    pub fn get(&self, tab: &str) -> Option<&H> {
        self.entries
            .iter()
            .find(|(name, _)| name == tab)
            .map(|(_, h)| h)
    }

    /// Iterates in tab order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &H)> {
        self.entries.iter().map(|(name, h)| (name.as_str(), h))
    }

    /// Tab names in order.
    pub fn tab_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of built tabs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no tab was built.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the results.
    pub fn into_inner(self) -> Vec<(String, H)> {
        self.entries
    }
}

/// Invokes every builder of `plan`, in order, each inside its own tab.
///
/// Stops at the first failing builder. Tabs built before it stay in `host`;
/// the failed tab does not.
pub fn assemble<T, H>(
    plan: &TabPlan<T::Panel, H>,
    host: &mut T,
) -> Result<TabResults<H>, AssembleError>
where
    T: TabContainer,
{
    let mut entries = Vec::with_capacity(plan.len());

    for tab in plan.iter() {
        let handles = host
            .with_tab(&tab.name, |panel| (tab.builder)(panel))
            .map_err(|source| AssembleError::Builder {
                tab: tab.name.clone(),
                source,
            })?;
        tracing::debug!(tab = %tab.name, builder = %tab.builder_name, "Built tab");
        entries.push((tab.name.clone(), handles));
    }

    Ok(TabResults { entries })
}

/// Passes the first tab's handles to the event wiring routine.
///
/// # Errors
///
/// - [`AssembleError::MissingFirstTab`] if `results` is empty
/// - [`AssembleError::Wiring`] if `wiring` fails
pub fn wire_first_tab<T, H, W>(
    results: &TabResults<H>,
    host: &mut T,
    wiring: W,
) -> Result<(), AssembleError>
where
    W: FnOnce(&mut T, &H) -> anyhow::Result<()>,
{
    let (tab, handles) = results.first().ok_or(MissingFirstTabError)?;
    wiring(host, handles).map_err(|source| AssembleError::Wiring {
        tab: tab.to_string(),
        source,
    })
}

/// [`assemble`] followed by [`wire_first_tab`].
pub fn assemble_and_wire<T, H, W>(
    plan: &TabPlan<T::Panel, H>,
    host: &mut T,
    wiring: W,
) -> Result<TabResults<H>, AssembleError>
where
    T: TabContainer,
    W: FnOnce(&mut T, &H) -> anyhow::Result<()>,
{
    let results = assemble(plan, host)?;
    wire_first_tab(&results, host, wiring)?;
    Ok(results)
}
