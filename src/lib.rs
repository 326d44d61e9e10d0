//! Tabdash Library
//!
//! This library provides the pieces of a config-driven tabbed dashboard:
//! loading and flattening a TOML configuration, resolving the tabs it
//! declares against a registry of named builders, assembling them into a
//! page, and serving that page over HTTP.

// Module declarations
pub mod app;
pub mod assemble;
pub mod config;
pub mod constants;
pub mod error;
pub mod registry;
pub mod ui;
#[cfg(feature = "web")]
pub mod web;

pub use assemble::{assemble, assemble_and_wire, wire_first_tab, TabContainer, TabResults};
pub use config::{flatten, FlatConfig, Settings};
pub use error::{
    AssembleError, ConfigError, MissingFirstTabError, RegistryError, ResolveError,
    UnknownBuilderError,
};
pub use registry::{resolve, resolve_file, Builder, CallableRegistry, TabPlan};
