//! HTML rendering of a [`Blocks`] page.
//!
//! The page is fully server-rendered. A JSON description of the event
//! bindings is embedded for the client script (`/assets/app.js`), which
//! posts events back and applies the returned updates.

use std::fmt::Write;

use serde::Serialize;

use super::{
    Binding, Blocks, Button, DataType, Dataframe, Dropdown, Html, Tab, Textbox, Widget, WidgetId,
};

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Client-side description of the page.
#[derive(Debug, Serialize)]
pub struct PageSpec<'a> {
    /// Tabs with their widget ids.
    pub tabs: &'a [Tab],
    /// Event bindings.
    pub bindings: &'a [Binding],
}

impl<'a> PageSpec<'a> {
    /// Describes `blocks`.
    pub fn new(blocks: &'a Blocks) -> Self {
        Self {
            tabs: blocks.tabs(),
            bindings: blocks.bindings(),
        }
    }
}

/// Renders the whole page.
pub fn page(blocks: &Blocks) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(blocks.title()));
    out.push_str("<link rel=\"stylesheet\" href=\"/assets/app.css\">\n");
    if !blocks.css().is_empty() {
        // Closing tags inside user CSS would end the element early.
        let _ = writeln!(out, "<style>\n{}\n</style>", blocks.css().replace("</", "<\\/"));
    }
    out.push_str("</head>\n<body>\n<main class=\"tabdash\">\n");

    for id in blocks.header() {
        render_widget(&mut out, blocks, *id);
    }

    out.push_str("<nav class=\"tabdash-tabs\" role=\"tablist\">\n");
    for (index, tab) in blocks.tabs().iter().enumerate() {
        let _ = writeln!(
            out,
            "<button type=\"button\" role=\"tab\" class=\"tabdash-tab{}\" data-tab=\"{}\">{}</button>",
            if index == 0 { " selected" } else { "" },
            index,
            escape_html(&tab.title)
        );
    }
    out.push_str("</nav>\n");

    for (index, tab) in blocks.tabs().iter().enumerate() {
        let _ = writeln!(
            out,
            "<section class=\"tabdash-panel\" role=\"tabpanel\" data-tab=\"{}\"{}>",
            index,
            if index == 0 { "" } else { " hidden" }
        );
        for id in &tab.children {
            render_widget(&mut out, blocks, *id);
        }
        out.push_str("</section>\n");
    }

    out.push_str("</main>\n");

    let spec = serde_json::to_string(&PageSpec::new(blocks)).unwrap_or_else(|_| "{}".to_string());
    let _ = writeln!(
        out,
        "<script id=\"tabdash-spec\" type=\"application/json\">{}</script>",
        spec.replace("</", "<\\/")
    );
    out.push_str("<script src=\"/assets/app.js\"></script>\n</body>\n</html>\n");
    out
}

fn render_widget(out: &mut String, blocks: &Blocks, id: WidgetId) {
    let Some(widget) = blocks.widget(id) else {
        return;
    };

    let _ = write!(
        out,
        "<div class=\"tabdash-widget tabdash-{}\" id=\"{}\" data-kind=\"{}\"{}>",
        widget.kind(),
        id.dom_id(),
        widget.kind(),
        if widget.visible() { "" } else { " hidden" }
    );

    match widget {
        Widget::Html(w) => render_html(out, w),
        Widget::Textbox(w) => render_textbox(out, id, w),
        Widget::Dropdown(w) => render_dropdown(out, id, w),
        Widget::Button(w) => render_button(out, id, w),
        Widget::Dataframe(w) => render_dataframe(out, id, w),
    }

    out.push_str("</div>\n");
}

fn class_attr(base: &str, extra: Option<&String>) -> String {
    match extra {
        Some(extra) => format!("{} {}", base, escape_html(extra)),
        None => base.to_string(),
    }
}

fn render_label(
    out: &mut String,
    id: WidgetId,
    label: Option<&String>,
    show: bool,
    info: Option<&String>,
) {
    if let Some(label) = label.filter(|_| show) {
        let _ = write!(
            out,
            "<label class=\"tabdash-label\" for=\"{}-input\">{}</label>",
            id.dom_id(),
            escape_html(label)
        );
    }
    if let Some(info) = info {
        let _ = write!(out, "<p class=\"tabdash-info\">{}</p>", escape_html(info));
    }
}

fn render_html(out: &mut String, w: &Html) {
    let _ = write!(
        out,
        "<div class=\"{}\" data-role=\"value\">{}</div>",
        class_attr("tabdash-html-body", w.elem_classes.as_ref()),
        w.value
    );
}

fn render_textbox(out: &mut String, id: WidgetId, w: &Textbox) {
    render_label(out, id, w.label.as_ref(), w.show_label, w.info.as_ref());

    let value = escape_html(w.value.as_deref().unwrap_or_default());
    let placeholder = w
        .placeholder
        .as_deref()
        .map(|p| format!(" placeholder=\"{}\"", escape_html(p)))
        .unwrap_or_default();
    let disabled = if w.interactive { "" } else { " disabled" };
    let container = if w.container { " tabdash-container" } else { "" };

    if w.max_lines > 1 {
        let _ = write!(
            out,
            "<textarea id=\"{}-input\" class=\"tabdash-input{}\" rows=\"{}\" style=\"flex-grow:{}\"{}{} data-role=\"value\">{}</textarea>",
            id.dom_id(),
            container,
            w.max_lines,
            w.scale,
            placeholder,
            disabled,
            value
        );
    } else {
        let _ = write!(
            out,
            "<input id=\"{}-input\" class=\"tabdash-input{}\" type=\"{}\" value=\"{}\" style=\"flex-grow:{}\"{}{} data-role=\"value\">",
            id.dom_id(),
            container,
            w.kind.as_str(),
            value,
            w.scale,
            placeholder,
            disabled
        );
    }

    if w.show_copy_button {
        let _ = write!(
            out,
            "<button type=\"button\" class=\"tabdash-copy\" data-copy=\"{}-input\">Copy</button>",
            id.dom_id()
        );
    }
}

fn render_dropdown(out: &mut String, id: WidgetId, w: &Dropdown) {
    render_label(out, id, w.label.as_ref(), w.show_label, w.info.as_ref());

    let _ = write!(
        out,
        "<select id=\"{}-input\" class=\"{}\"{}{} data-role=\"value\">",
        id.dom_id(),
        class_attr("tabdash-select", w.elem_classes.as_ref()),
        if w.multiselect { " multiple" } else { "" },
        if w.interactive { "" } else { " disabled" }
    );
    for choice in &w.choices {
        let selected = if w.value.contains(choice) {
            " selected"
        } else {
            ""
        };
        let escaped = escape_html(choice);
        let _ = write!(out, "<option value=\"{escaped}\"{selected}>{escaped}</option>");
    }
    out.push_str("</select>");
}

fn render_button(out: &mut String, id: WidgetId, w: &Button) {
    let _ = write!(
        out,
        "<button type=\"button\" id=\"{}-input\" class=\"{}\" style=\"flex-grow:{}\"{} data-role=\"value\">",
        id.dom_id(),
        class_attr("tabdash-button", w.elem_classes.as_ref()),
        w.scale,
        if w.interactive { "" } else { " disabled" }
    );
    if let Some(icon) = &w.icon {
        let _ = write!(out, "<img class=\"tabdash-icon\" src=\"{}\" alt=\"\">", escape_html(icon));
    }
    let _ = write!(out, "<span>{}</span></button>", escape_html(&w.value));
}

fn render_dataframe(out: &mut String, id: WidgetId, w: &Dataframe) {
    if let Some(label) = w.label.as_ref().filter(|_| w.show_label) {
        let _ = write!(out, "<p class=\"tabdash-label\">{}</p>", escape_html(label));
    }

    let _ = write!(
        out,
        "<div class=\"{}\" style=\"max-height:{}px\"><table id=\"{}-input\" class=\"{}\" data-role=\"value\" data-datatype=\"{}\">",
        class_attr("tabdash-table-wrap", w.elem_classes.as_ref()),
        w.height,
        id.dom_id(),
        if w.wrap { "tabdash-table wrap" } else { "tabdash-table" },
        match w.datatype {
            DataType::Str => "str",
            DataType::Markdown => "markdown",
        }
    );

    out.push_str("<thead><tr>");
    for header in &w.headers {
        let _ = write!(out, "<th>{}</th>", escape_html(header));
    }
    out.push_str("</tr></thead><tbody>");
    out.push_str(&table_rows(&w.rows, w.datatype));
    out.push_str("</tbody></table></div>");
}

/// Renders table body rows.
pub fn table_rows(rows: &[Vec<String>], datatype: DataType) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            match datatype {
                DataType::Str => {
                    let _ = write!(out, "<td>{}</td>", escape_html(cell));
                }
                DataType::Markdown => {
                    let _ = write!(out, "<td>{cell}</td>");
                }
            }
        }
        out.push_str("</tr>");
    }
    out
}
