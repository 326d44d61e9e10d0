//! Configuration loading and flattening.
//!
//! The configuration file is TOML. It is loaded once at process entry into a
//! [`Settings`] value that keeps both the nested tree and a flattened view in
//! which nested keys are joined with [`KEY_SEPARATOR`]
//! (`[AppSettings] APP_VERSION` becomes `AppSettings_APP_VERSION`).
//! `Settings` is shared behind an `Arc` and handed to whoever needs it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::{Table, Value};

use crate::constants::KEY_SEPARATOR;
use crate::error::ConfigError;

/// Single-level view of a configuration tree.
///
/// Keys are the separator-joined paths of every leaf; values are the leaves
/// unchanged. Arrays are leaves, tables never appear as values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatConfig(Table);

impl FlatConfig {
    /// Looks up a flattened key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no leaves.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Looks up a key, failing with [`ConfigError::MissingKey`] if absent.
    pub fn require(&self, key: &str) -> Result<&Value, ConfigError> {
        self.0.get(key).ok_or_else(|| ConfigError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Looks up a string value.
    pub fn require_str(&self, key: &str) -> Result<&str, ConfigError> {
        let value = self.require(key)?;
        value
            .as_str()
            .ok_or_else(|| invalid_value(key, "a string", value))
    }

    /// Looks up an integer value.
    pub fn require_integer(&self, key: &str) -> Result<i64, ConfigError> {
        let value = self.require(key)?;
        value
            .as_integer()
            .ok_or_else(|| invalid_value(key, "an integer", value))
    }

    /// Looks up a boolean value.
    pub fn require_bool(&self, key: &str) -> Result<bool, ConfigError> {
        let value = self.require(key)?;
        value
            .as_bool()
            .ok_or_else(|| invalid_value(key, "a boolean", value))
    }

    /// Consumes the view and returns the underlying table.
    pub fn into_inner(self) -> Table {
        self.0
    }
}

fn invalid_value(key: &str, expected: &'static str, found: &Value) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        expected,
        found: found.type_str(),
    }
}

/// Flattens a configuration tree using [`KEY_SEPARATOR`].
///
/// Every leaf reachable through `[k1, .., kn]` lands under
/// `prefix + k1 + sep + .. + kn`. Two leaves that land on the same key are
/// rejected with [`ConfigError::KeyCollision`], whatever order they appear in.
///
/// # Examples
///
/// ```
/// use tabdash::config::flatten;
///
/// let tree: toml::Table = toml::from_str("[AppSettings]\nAPP_VERSION = \"0.1\"").unwrap();
/// let flat = flatten("", &tree).unwrap();
/// assert_eq!(flat.require_str("AppSettings_APP_VERSION").unwrap(), "0.1");
/// ```
pub fn flatten(prefix: &str, tree: &Table) -> Result<FlatConfig, ConfigError> {
    flatten_with_separator(prefix, tree, KEY_SEPARATOR)
}

/// Flattens a configuration tree with an explicit separator.
pub fn flatten_with_separator(
    prefix: &str,
    tree: &Table,
    separator: &str,
) -> Result<FlatConfig, ConfigError> {
    let mut out = Table::new();
    flatten_into(&mut out, prefix, tree, separator)?;
    Ok(FlatConfig(out))
}

fn flatten_into(
    out: &mut Table,
    prefix: &str,
    tree: &Table,
    separator: &str,
) -> Result<(), ConfigError> {
    for (key, value) in tree {
        match value {
            Value::Table(nested) => {
                let nested_prefix = format!("{prefix}{key}{separator}");
                flatten_into(out, &nested_prefix, nested, separator)?;
            }
            leaf => {
                let flat_key = format!("{prefix}{key}");
                if out.contains_key(&flat_key) {
                    return Err(ConfigError::KeyCollision { key: flat_key });
                }
                out.insert(flat_key, leaf.clone());
            }
        }
    }
    Ok(())
}

/// Typed view of the `[AppSettings]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppSettings {
    /// Version shown in the page header badge.
    #[serde(rename = "APP_VERSION")]
    pub app_version: String,
    /// Stylesheet inlined into the page, relative to the config file.
    #[serde(rename = "CSS_PATH", default)]
    pub css_path: Option<PathBuf>,
    /// Browser tab title.
    #[serde(rename = "TITLE", default = "default_title")]
    pub title: String,
    /// Logo file name inside the static images directory.
    #[serde(rename = "LOGO", default)]
    pub logo: Option<String>,
}

fn default_title() -> String {
    crate::constants::APP_NAME.to_string()
}

/// Typed view of the `[StaticPaths]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StaticPaths {
    /// Directory of images served under `/static`.
    #[serde(rename = "IMAGES", default)]
    pub images: Option<PathBuf>,
}

/// Loaded application configuration.
///
/// Holds the parsed tree and its flattened view. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    path: Option<PathBuf>,
    tree: Table,
    flat: FlatConfig,
}

impl Settings {
    /// Loads and flattens a configuration file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if the file does not exist
    /// - [`ConfigError::Io`] if it cannot be read
    /// - [`ConfigError::Parse`] if it is not valid TOML
    /// - [`ConfigError::Empty`] if it holds no entries
    /// - [`ConfigError::KeyCollision`] if two keys flatten to the same name
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut settings = Self::from_str_with_origin(&content, &path.display().to_string())?;
        settings.path = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            keys = settings.flat.len(),
            "Loaded configuration"
        );
        Ok(settings)
    }

    /// Parses an in-memory TOML document with the same rules as [`Settings::load`].
    ///
    /// `origin` labels the document in error messages.
    pub fn from_str_with_origin(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let tree: Table = toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;

        if tree.is_empty() {
            return Err(ConfigError::Empty {
                origin: origin.to_string(),
            });
        }

        let flat = flatten("", &tree)?;
        Ok(Self {
            path: None,
            tree,
            flat,
        })
    }

    /// Path the configuration was loaded from, if it came from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory relative paths in the configuration are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Resolves a configured path against [`Settings::base_dir`].
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    /// The nested configuration tree.
    pub fn tree(&self) -> &Table {
        &self.tree
    }

    /// The flattened configuration.
    pub fn flat(&self) -> &FlatConfig {
        &self.flat
    }

    /// Deserializes a top-level section into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSection`] if the section is missing or
    /// its fields do not match `T`.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self
            .tree
            .get(name)
            .ok_or_else(|| ConfigError::InvalidSection {
                section: name.to_string(),
                reason: "section is missing".to_string(),
            })?;

        value
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidSection {
                section: name.to_string(),
                reason: e.message().to_string(),
            })
    }

    /// Like [`Settings::section`], but a missing section yields `T::default()`.
    pub fn section_or_default<T: DeserializeOwned + Default>(
        &self,
        name: &str,
    ) -> Result<T, ConfigError> {
        if self.tree.contains_key(name) {
            self.section(name)
        } else {
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn test_flatten_empty_tree() {
        let flat = flatten("", &Table::new()).unwrap();
        assert!(flat.is_empty());
    }

    #[test]
    fn test_flatten_nested_paths() {
        let tree = table(
            r#"
            top = 1
            [outer]
            name = "x"
            [outer.inner]
            flag = true
            list = [1, 2]
            "#,
        );
        let flat = flatten("", &tree).unwrap();

        assert_eq!(flat.len(), 4);
        assert_eq!(flat.require_integer("top").unwrap(), 1);
        assert_eq!(flat.require_str("outer_name").unwrap(), "x");
        assert!(flat.require_bool("outer_inner_flag").unwrap());
        assert_eq!(
            flat.get("outer_inner_list"),
            Some(&Value::Array(vec![Value::Integer(1), Value::Integer(2)]))
        );
        assert!(flat.iter().all(|(_, v)| !v.is_table()));
    }

    #[test]
    fn test_flatten_applies_prefix() {
        let tree = table("[a]\nb = 1");
        let flat = flatten("cfg_", &tree).unwrap();
        assert_eq!(flat.require_integer("cfg_a_b").unwrap(), 1);
    }

    #[test]
    fn test_flatten_custom_separator() {
        let tree = table("[a.b]\nc = \"v\"");
        let flat = flatten_with_separator("", &tree, ".").unwrap();
        assert_eq!(flat.require_str("a.b.c").unwrap(), "v");
    }

    #[test]
    fn test_flatten_flat_input_is_unchanged() {
        let tree = table("a = 1\nb = \"two\"\nc = [3]\nd = 4.5");
        let flat = flatten("", &tree).unwrap();
        assert_eq!(flat.into_inner(), tree);
    }

    #[test]
    fn test_flatten_collision_is_rejected_either_order() {
        let nested_first = table("a_b = 2\n[a]\nb = 1");
        let mut leaf_first = table("[a]\nb = 1");
        leaf_first.insert("a_b".to_string(), Value::Integer(2));

        for tree in [nested_first, leaf_first] {
            match flatten("", &tree) {
                Err(ConfigError::KeyCollision { key }) => assert_eq!(key, "a_b"),
                other => panic!("expected collision, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_require_reports_missing_and_mistyped_keys() {
        let flat = flatten("", &table("n = 3")).unwrap();
        assert!(matches!(
            flat.require_str("missing"),
            Err(ConfigError::MissingKey { .. })
        ));
        match flat.require_str("n") {
            Err(ConfigError::InvalidValue {
                key,
                expected,
                found,
            }) => {
                assert_eq!(key, "n");
                assert_eq!(expected, "a string");
                assert_eq!(found, "integer");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_settings_rejects_empty_document() {
        let err = Settings::from_str_with_origin("# nothing here\n", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Empty { .. }));
    }

    #[test]
    fn test_settings_typed_section() {
        let settings = Settings::from_str_with_origin(
            "[AppSettings]\nAPP_VERSION = \"1.2\"\nCSS_PATH = \"app.css\"",
            "inline",
        )
        .unwrap();
        let app: AppSettings = settings.section("AppSettings").unwrap();
        assert_eq!(app.app_version, "1.2");
        assert_eq!(app.css_path, Some(PathBuf::from("app.css")));
        assert_eq!(app.title, crate::constants::APP_NAME);

        let paths: StaticPaths = settings.section_or_default("StaticPaths").unwrap();
        assert_eq!(paths, StaticPaths::default());
        assert!(matches!(
            settings.section::<StaticPaths>("StaticPaths"),
            Err(ConfigError::InvalidSection { .. })
        ));
    }

    #[test]
    fn test_base_dir_without_file_is_current_dir() {
        let settings = Settings::from_str_with_origin("a = 1", "inline").unwrap();
        assert_eq!(settings.base_dir(), PathBuf::from("."));
        assert_eq!(
            settings.resolve_path(Path::new("x.css")),
            PathBuf::from("./x.css")
        );
    }
}
