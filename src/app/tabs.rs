//! Tab builders of the dashboard.
//!
//! Each builder fills the panel of one tab and returns the handles of the
//! widgets other code needs to reach. `[TabCreators]` picks which builders
//! are shown, under which title and in which order.

use std::sync::Arc;

use anyhow::Result;

use super::{description, matching, requirements};
use crate::config::Settings;
use crate::error::RegistryError;
use crate::registry::CallableRegistry;
use crate::ui::{button, dataframe, dropdown, html_message, textbox, Html, Panel, WidgetId};

/// Widget handles a builder returns, in a fixed order per builder.
pub type TabHandles = Vec<WidgetId>;

/// Registry of the dashboard's builders.
pub type TabRegistry = CallableRegistry<Panel, TabHandles>;

/// Registers every builder of the dashboard.
pub fn available_builders(settings: &Arc<Settings>) -> Result<TabRegistry, RegistryError> {
    let mut registry = TabRegistry::new();

    let s = Arc::clone(settings);
    registry.register("app_tab", move |panel: &mut Panel| app_tab(panel, &s))?;

    let s = Arc::clone(settings);
    registry.register("requirements_tab", move |panel: &mut Panel| {
        requirements_tab(panel, &s)
    })?;

    let s = Arc::clone(settings);
    registry.register("about_tab", move |panel: &mut Panel| about_tab(panel, &s))?;

    Ok(registry)
}

/// Main tab: vacancy input, subject selection and the results table.
///
/// Returns `[vacancy, subjects, evaluate, notice, results]`.
pub fn app_tab(panel: &mut Panel, settings: &Settings) -> Result<TabHandles> {
    let flat = settings.flat();
    let subject_list = matching::load_subjects(settings)?;
    let names: Vec<&str> = subject_list.iter().map(|s| s.name.as_str()).collect();

    panel.add(Html::new(description::step(
        flat.require_str("InformationMessages_STEP_1")?,
    )));
    let vacancy = panel.add(
        textbox()
            .label(flat.require_str("Labels_VACANCY")?)
            .placeholder(flat.require_str("Labels_VACANCY_PLACEHOLDER")?)
            .max_lines(10)
            .show_copy_button(false),
    );

    panel.add(Html::new(description::step(
        flat.require_str("InformationMessages_STEP_2")?,
    )));
    let subjects = panel.add(
        dropdown()
            .label(flat.require_str("Labels_SUBJECTS")?)
            .choices(names.iter().copied())
            .value(names.iter().copied())
            .multiselect(true),
    );

    let evaluate = panel.add(
        button(flat.require_str("Labels_EVALUATE")?)
            .interactive(false)
            .elem_classes("evaluate"),
    );
    let notice = panel.add(html_message("", true, false));

    let headers = vec![
        flat.require_str("Labels_SUBJECT")?.to_string(),
        flat.require_str("Labels_SCORE")?.to_string(),
        flat.require_str("Labels_MATCHED")?.to_string(),
    ];
    let results = panel.add(
        dataframe(Some(headers), Some(Vec::new()))
            .label(flat.require_str("Labels_RESULTS")?)
            .height(400)
            .visible(false),
    );

    Ok(vec![vacancy, subjects, evaluate, notice, results])
}

/// Dependency table of this build. Returns `[table]`.
pub fn requirements_tab(panel: &mut Panel, settings: &Settings) -> Result<TabHandles> {
    let (headers, rows) = requirements::requirements_table(settings.flat())?;
    let table = panel.add(dataframe(Some(headers), Some(rows)));
    Ok(vec![table])
}

/// Free-form text from `[About] TEXT`. Returns no handles.
pub fn about_tab(panel: &mut Panel, settings: &Settings) -> Result<TabHandles> {
    let text = settings.flat().require_str("About_TEXT")?;
    panel.add(Html::new(text).elem_classes("about"));
    Ok(Vec::new())
}
