//! Page description and step headings.

use crate::config::AppSettings;
use crate::ui::render::escape_html;

/// Heading and version badge shown above the tabs.
pub fn description(app: &AppSettings) -> String {
    let logo = app
        .logo
        .as_deref()
        .map(|logo| {
            format!(
                "<img class=\"app-logo\" src=\"/static/{}\" alt=\"\">",
                escape_html(logo)
            )
        })
        .unwrap_or_default();

    format!(
        "<div class=\"app-header\">{logo}<h1>{}</h1></div>\n\
         <div class=\"app-flex-container\">\n    \
         <img src=\"https://img.shields.io/badge/version-v{}-stable\" alt=\"Version\">\n\
         </div>",
        escape_html(&app.title),
        escape_html(&app.app_version),
    )
}

/// Centered step heading.
pub fn step(text: &str) -> String {
    format!("<h2 align=\"center\">{}</h2>", escape_html(text))
}
