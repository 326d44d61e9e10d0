//! The dashboard application.
//!
//! `create_app` turns loaded [`Settings`] into a ready-to-serve page:
//! register builders, resolve `[TabCreators]`, build the tabs, then wire the
//! first tab's events.

pub mod description;
pub mod events;
pub mod matching;
pub mod requirements;
pub mod tabs;

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::assemble::assemble_and_wire;
use crate::config::{AppSettings, Settings};
use crate::registry;
use crate::ui::{Blocks, Html};

/// Section holding page-level settings.
pub const APP_SETTINGS_SECTION: &str = "AppSettings";

/// Builds the dashboard page described by `settings`.
///
/// # Errors
///
/// Fails on a malformed configuration, an unknown builder, a failing
/// builder, or an empty tab plan.
pub fn create_app(settings: Arc<Settings>) -> Result<Blocks> {
    let app: AppSettings = settings.section(APP_SETTINGS_SECTION)?;

    let css = match &app.css_path {
        Some(path) => {
            let path = settings.resolve_path(path);
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read stylesheet {}", path.display()))?
        }
        None => String::new(),
    };

    let mut blocks = Blocks::new(app.title.clone()).with_css(css);
    blocks.add_header(Html::new(description::description(&app)));

    let available = tabs::available_builders(&settings)?;
    let plan = registry::resolve(&settings, &available)?;
    info!(tabs = ?plan.tab_names(), "Resolved tab plan");

    let results = assemble_and_wire(&plan, &mut blocks, |blocks, handles| {
        events::setup_app_event_handlers(blocks, &settings, handles)
    })?;

    info!(
        tabs = results.len(),
        bindings = blocks.bindings().len(),
        "Dashboard assembled"
    );
    Ok(blocks)
}
