//! Event handlers wired to the first tab's widgets.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde_json::Value;

use super::matching::{self, Subject};
use super::tabs::TabHandles;
use crate::config::Settings;
use crate::ui::components::notice_markup;
use crate::ui::render::escape_html;
use crate::ui::{Blocks, EventKind, WidgetUpdate};

/// Messages shown by the evaluate handler.
#[derive(Debug, Clone)]
struct Messages {
    no_vacancy: String,
    no_subjects: String,
    evaluated: String,
}

/// Binds the handlers of the main tab.
///
/// `handles` are the first tab's handles, unpacked positionally as
/// `[vacancy, subjects, evaluate, notice, results]`.
pub fn setup_app_event_handlers(
    blocks: &mut Blocks,
    settings: &Settings,
    handles: &TabHandles,
) -> Result<()> {
    let [vacancy, subjects, evaluate, notice, results] = *handles.as_slice() else {
        bail!(
            "Expected 5 widget handles from the first tab, got {}",
            handles.len()
        );
    };

    let flat = settings.flat();
    let messages = Messages {
        no_vacancy: flat.require_str("InformationMessages_NO_VACANCY")?.to_string(),
        no_subjects: flat.require_str("InformationMessages_NO_SUBJECTS")?.to_string(),
        evaluated: flat.require_str("InformationMessages_EVALUATED")?.to_string(),
    };
    let catalog: Arc<Vec<Subject>> = Arc::new(matching::load_subjects(settings)?);

    // Evaluate is only useful once there is text to evaluate.
    blocks.bind(vacancy, EventKind::Change, &[vacancy], &[evaluate], |values| {
        let has_text = !text_value(&values[0]).trim().is_empty();
        Ok(vec![WidgetUpdate::keep().with_interactive(has_text)])
    })?;

    // A new selection makes previous results stale.
    blocks.bind(subjects, EventKind::Change, &[], &[notice, results], |_| {
        Ok(vec![
            WidgetUpdate::keep().with_visible(false),
            WidgetUpdate::keep().with_visible(false),
        ])
    })?;

    let on_evaluate = move |values: &[Value]| evaluate_vacancy(&catalog, &messages, values);
    blocks.bind(
        evaluate,
        EventKind::Click,
        &[vacancy, subjects],
        &[notice, results],
        on_evaluate.clone(),
    )?;
    blocks.bind(
        vacancy,
        EventKind::Submit,
        &[vacancy, subjects],
        &[notice, results],
        on_evaluate,
    )?;

    tracing::debug!(bindings = blocks.bindings().len(), "Wired main tab events");
    Ok(())
}

fn evaluate_vacancy(
    catalog: &[Subject],
    messages: &Messages,
    values: &[Value],
) -> Result<Vec<WidgetUpdate>> {
    let text = text_value(&values[0]);
    let selected = selection(&values[1]);

    let error = |message: &str| {
        Ok(vec![
            WidgetUpdate::value(notice_markup(message, true)).with_visible(true),
            WidgetUpdate::keep().with_visible(false),
        ])
    };

    if text.trim().is_empty() {
        return error(&messages.no_vacancy);
    }
    if selected.is_empty() {
        return error(&messages.no_subjects);
    }

    let chosen = catalog.iter().filter(|s| selected.contains(&s.name.as_str()));
    let rows: Vec<Vec<String>> = matching::score(text, chosen)
        .into_iter()
        .map(|score| {
            vec![
                escape_html(&score.subject),
                format!("{}%", score.percent()),
                escape_html(&score.matched.join(", ")),
            ]
        })
        .collect();

    Ok(vec![
        WidgetUpdate::value(notice_markup(&messages.evaluated, false)).with_visible(true),
        WidgetUpdate::value(rows).with_visible(true),
    ])
}

fn text_value(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

/// Selected choices; a single-select dropdown sends a bare string.
fn selection(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}
