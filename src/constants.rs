//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the naming conventions shared by the
//! configuration file and the tab builder registry.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Tabdash";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "tabdash";

/// Configuration file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "config.toml";

/// Separator joining nested key paths when the configuration is flattened.
pub const KEY_SEPARATOR: &str = "_";

/// Top-level section mapping tab display names to builder names.
pub const TAB_CREATORS_SECTION: &str = "TabCreators";

/// Suffix every registered tab builder name must carry.
pub const BUILDER_SUFFIX: &str = "_tab";
