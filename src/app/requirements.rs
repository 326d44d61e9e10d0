//! Dependency table for the "Requirements" tab.
//!
//! Lists the crates this binary was built with, read from its own manifest.

use anyhow::{Context, Result};
use toml::{Table, Value};

use crate::config::FlatConfig;

/// The manifest this binary was built from.
const MANIFEST: &str = include_str!("../../Cargo.toml");

/// One dependency line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Crate name.
    pub library: String,
    /// Version requirement declared in the manifest.
    pub version: String,
}

/// Parses the `[dependencies]` table of a Cargo manifest.
///
/// Dependencies without a version requirement (path or git) are listed as `*`.
pub fn parse_manifest(content: &str) -> Result<Vec<Requirement>> {
    let manifest: Table = toml::from_str(content).context("Failed to parse Cargo manifest")?;

    let Some(deps) = manifest.get("dependencies").and_then(Value::as_table) else {
        return Ok(Vec::new());
    };

    let requirements = deps
        .iter()
        .map(|(library, spec)| {
            let version = match spec {
                Value::String(v) => v.clone(),
                Value::Table(t) => t
                    .get("version")
                    .and_then(Value::as_str)
                    .unwrap_or("*")
                    .to_string(),
                _ => "*".to_string(),
            };
            Requirement {
                library: library.clone(),
                version,
            }
        })
        .collect();

    Ok(requirements)
}

/// crates.io link showing the latest published version as a badge.
pub fn crate_badge(library: &str) -> String {
    format!(
        "<a href='https://crates.io/crates/{library}' target='_blank'>\
         <img src='https://img.shields.io/crates/v/{library}' alt='crates.io' /></a>"
    )
}

/// Column titles and rows of the dependency table.
///
/// Column titles come from `[Requirements] LIBRARY, REC_VERSION, CURR_VERSION`.
pub fn requirements_table(flat: &FlatConfig) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let headers = vec![
        flat.require_str("Requirements_LIBRARY")?.to_string(),
        flat.require_str("Requirements_REC_VERSION")?.to_string(),
        flat.require_str("Requirements_CURR_VERSION")?.to_string(),
    ];

    let rows = parse_manifest(MANIFEST)?
        .into_iter()
        .map(|req| {
            let badge = crate_badge(&req.library);
            vec![req.library, req.version, badge]
        })
        .collect();

    Ok((headers, rows))
}
