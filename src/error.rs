//! Error types for configuration loading, tab resolution and assembly.
//!
//! Every error here is a startup error: a misconfigured deployment cannot
//! correct itself, so callers report the diagnostic and exit. Messages name
//! the configuration key, tab or builder at fault.

use std::path::PathBuf;

use thiserror::Error;

/// Errors arising from reading, parsing or querying the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Io {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML.
    #[error("Failed to parse configuration {origin}: {source}")]
    Parse {
        /// Where the document came from (file path or a label).
        origin: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The document parsed but holds no entries at all.
    #[error("Configuration {origin} is empty")]
    Empty {
        /// Where the document came from.
        origin: String,
    },

    /// Two distinct key paths flatten to the same key.
    #[error("Configuration key collision: more than one entry flattens to '{key}'")]
    KeyCollision {
        /// The flattened key both paths produce.
        key: String,
    },

    /// A required key is absent.
    #[error("Missing configuration key '{key}'")]
    MissingKey {
        /// Flattened key that was requested.
        key: String,
    },

    /// A key holds a value of the wrong type.
    #[error("Configuration key '{key}' must be {expected}, found {found}")]
    InvalidValue {
        /// Flattened key holding the value.
        key: String,
        /// Expected TOML type.
        expected: &'static str,
        /// Actual TOML type.
        found: &'static str,
    },

    /// A top-level section is missing or does not match its expected shape.
    #[error("Invalid configuration section [{section}]: {reason}")]
    InvalidSection {
        /// Section name.
        section: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// A tab references a builder that was never registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tab '{tab}' requests builder '{builder}', which is not registered")]
pub struct UnknownBuilderError {
    /// Tab display name from the configuration.
    pub tab: String,
    /// Builder name the tab asked for.
    pub builder: String,
}

/// The tab plan was empty when event wiring needed its first tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No tabs were built, so there is no first tab to wire events to")]
pub struct MissingFirstTabError;

/// Errors raised while populating a builder registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name does not carry the builder suffix marker.
    #[error("Builder name '{name}' must end with '{suffix}'")]
    MissingSuffix {
        /// Rejected name.
        name: String,
        /// Required suffix.
        suffix: &'static str,
    },

    /// The name is already registered.
    #[error("Builder '{0}' is already registered")]
    Duplicate(String),
}

/// Errors from resolving `[TabCreators]` against a registry.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The configuration could not be loaded or has a malformed section.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A tab names a builder that is not registered.
    #[error(transparent)]
    UnknownBuilder(#[from] UnknownBuilderError),
}

/// Errors from building tabs and wiring their events.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// A builder failed; assembly stops at the first failure.
    #[error("Failed to build tab '{tab}': {source:#}")]
    Builder {
        /// Tab whose builder failed.
        tab: String,
        /// Error returned by the builder.
        #[source]
        source: anyhow::Error,
    },

    /// There is no first tab to hand to the event wiring.
    #[error(transparent)]
    MissingFirstTab(#[from] MissingFirstTabError),

    /// The event wiring routine rejected the first tab's handles.
    #[error("Failed to wire events for tab '{tab}': {source:#}")]
    Wiring {
        /// First tab's name.
        tab: String,
        /// Error returned by the wiring routine.
        #[source]
        source: anyhow::Error,
    },
}
