//! Widget definitions and their default constructors.
//!
//! Each widget is a plain serializable struct with chainable setters. The
//! free functions (`textbox`, `dropdown`, ...) return widgets carrying the
//! defaults the dashboard uses everywhere.

use serde::Serialize;

/// Raw HTML block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Html {
    /// Markup inserted verbatim.
    pub value: String,
    /// Initially visible.
    pub visible: bool,
    /// Extra CSS classes.
    pub elem_classes: Option<String>,
}

impl Html {
    /// Creates a visible HTML block.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            visible: true,
            elem_classes: None,
        }
    }

    /// Sets visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets CSS classes.
    pub fn elem_classes(mut self, classes: impl Into<String>) -> Self {
        self.elem_classes = Some(classes.into());
        self
    }
}

/// CSS class of an error notice.
pub const NOTICE_ERROR_CLASS: &str = "noti_err";
/// CSS class of a success notice.
pub const NOTICE_OK_CLASS: &str = "noti_true";

/// Markup of a notice heading, styled as an error or a success.
pub fn notice_markup(message: &str, error: bool) -> String {
    let class = if error {
        NOTICE_ERROR_CLASS
    } else {
        NOTICE_OK_CLASS
    };
    format!(
        "<h3 class='{}'>{}</h3>",
        class,
        super::render::escape_html(message)
    )
}

/// Notice heading shown above results.
pub fn html_message(message: &str, error: bool, visible: bool) -> Html {
    Html::new(notice_markup(message, error)).visible(visible)
}

/// Input type of a [`Textbox`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextboxKind {
    /// Plain text.
    #[default]
    Text,
    /// Hidden characters.
    Password,
    /// Email address.
    Email,
}

impl TextboxKind {
    /// HTML `type` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Email => "email",
        }
    }
}

/// Text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Textbox {
    /// Initial text.
    pub value: Option<String>,
    /// Input type.
    pub kind: TextboxKind,
    /// Label above the input.
    pub label: Option<String>,
    /// Hint shown while empty.
    pub placeholder: Option<String>,
    /// Help text below the label.
    pub info: Option<String>,
    /// More than one line renders a text area.
    pub max_lines: u32,
    /// Whether the label is rendered.
    pub show_label: bool,
    /// Editable.
    pub interactive: bool,
    /// Initially visible.
    pub visible: bool,
    /// Adds a copy-to-clipboard button.
    pub show_copy_button: bool,
    /// Relative width in a row.
    pub scale: u32,
    /// Draws a framed container around the input.
    pub container: bool,
}

impl Default for Textbox {
    fn default() -> Self {
        Self {
            value: None,
            kind: TextboxKind::Text,
            label: None,
            placeholder: None,
            info: None,
            max_lines: 1,
            show_label: true,
            interactive: true,
            visible: true,
            show_copy_button: true,
            scale: 1,
            container: false,
        }
    }
}

impl Textbox {
    /// Sets the initial text.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the input type.
    pub fn kind(mut self, kind: TextboxKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the placeholder hint.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the help text.
    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Sets the visible line count, at least one.
    pub fn max_lines(mut self, max_lines: u32) -> Self {
        self.max_lines = max_lines.max(1);
        self
    }

    /// Sets whether the text is editable.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Shows or hides the copy button.
    pub fn show_copy_button(mut self, show: bool) -> Self {
        self.show_copy_button = show;
        self
    }
}

/// Text input with the dashboard defaults.
pub fn textbox() -> Textbox {
    Textbox::default()
}

/// Choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    /// Label above the list.
    pub label: Option<String>,
    /// Help text below the label.
    pub info: Option<String>,
    /// Available choices, in display order.
    pub choices: Vec<String>,
    /// Initially selected choices.
    pub value: Vec<String>,
    /// Allows more than one selection.
    pub multiselect: bool,
    /// Whether the label is rendered.
    pub show_label: bool,
    /// Selection can be changed.
    pub interactive: bool,
    /// Initially visible.
    pub visible: bool,
    /// Extra CSS classes.
    pub elem_classes: Option<String>,
}

impl Default for Dropdown {
    fn default() -> Self {
        Self {
            label: None,
            info: None,
            choices: Vec::new(),
            value: Vec::new(),
            multiselect: false,
            show_label: true,
            interactive: true,
            visible: true,
            elem_classes: None,
        }
    }
}

impl Dropdown {
    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the help text.
    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Replaces the choices.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the initial selection.
    pub fn value<I, S>(mut self, value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value = value.into_iter().map(Into::into).collect();
        self
    }

    /// Allows or forbids multiple selections.
    pub fn multiselect(mut self, multiselect: bool) -> Self {
        self.multiselect = multiselect;
        self
    }
}

/// Choice list with the dashboard defaults.
pub fn dropdown() -> Dropdown {
    Dropdown::default()
}

/// Clickable button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    /// Caption.
    pub value: String,
    /// Clickable.
    pub interactive: bool,
    /// Relative width in a row.
    pub scale: u32,
    /// Icon image URL shown before the caption.
    pub icon: Option<String>,
    /// Initially visible.
    pub visible: bool,
    /// Extra CSS classes.
    pub elem_classes: Option<String>,
}

impl Button {
    /// Enables or disables the button.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Sets the icon URL.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets CSS classes.
    pub fn elem_classes(mut self, classes: impl Into<String>) -> Self {
        self.elem_classes = Some(classes.into());
        self
    }
}

/// Button with the given caption.
pub fn button(value: impl Into<String>) -> Button {
    Button {
        value: value.into(),
        interactive: true,
        scale: 1,
        icon: None,
        visible: true,
        elem_classes: None,
    }
}

/// How table cells are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Escaped plain text.
    Str,
    /// Inserted as markup (links, badges).
    Markdown,
}

/// Table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataframe {
    /// Column titles.
    pub headers: Vec<String>,
    /// Cell values, one vector per row.
    pub rows: Vec<Vec<String>>,
    /// How cells are rendered.
    pub datatype: DataType,
    /// Caption above the table.
    pub label: Option<String>,
    /// Whether the caption is rendered.
    pub show_label: bool,
    /// Maximum height in pixels before scrolling.
    pub height: u32,
    /// Wraps long cell text.
    pub wrap: bool,
    /// Initially visible.
    pub visible: bool,
    /// Cells can be edited.
    pub interactive: bool,
    /// Extra CSS classes.
    pub elem_classes: Option<String>,
}

impl Dataframe {
    /// Sets the caption.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the maximum height.
    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Sets visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Table holding `rows` under `headers`.
///
/// Cells are treated as markup when both headers and rows are given, and as
/// plain text otherwise (an empty placeholder table).
pub fn dataframe(headers: Option<Vec<String>>, rows: Option<Vec<Vec<String>>>) -> Dataframe {
    let datatype = if headers.is_some() && rows.is_some() {
        DataType::Markdown
    } else {
        DataType::Str
    };

    Dataframe {
        headers: headers.unwrap_or_default(),
        rows: rows.unwrap_or_default(),
        datatype,
        label: None,
        show_label: true,
        height: 500,
        wrap: true,
        visible: true,
        interactive: false,
        elem_classes: Some("dataframe".to_string()),
    }
}
