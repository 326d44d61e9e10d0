//! Page model: tabs, widgets and event bindings.
//!
//! A [`Blocks`] page owns every widget in a single arena addressed by
//! [`WidgetId`]. Tabs are opened through [`TabContainer::with_tab`], which
//! hands builders a [`Panel`] to add widgets to. Event handlers run on the
//! server: the browser posts the current values of a binding's inputs and
//! receives one [`WidgetUpdate`] per output.

pub mod components;
pub mod render;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::assemble::TabContainer;

pub use components::{
    button, dataframe, dropdown, html_message, textbox, Button, DataType, Dataframe, Dropdown,
    Html, Textbox, TextboxKind,
};

/// Handle to a widget on a [`Blocks`] page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(usize);

impl WidgetId {
    /// Position in the page's widget arena.
    pub fn index(self) -> usize {
        self.0
    }

    /// Element id used in the rendered page.
    pub fn dom_id(self) -> String {
        format!("w{}", self.0)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Any widget that can be placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    /// Raw HTML block.
    Html(Html),
    /// Text input.
    Textbox(Textbox),
    /// Choice list.
    Dropdown(Dropdown),
    /// Clickable button.
    Button(Button),
    /// Table.
    Dataframe(Dataframe),
}

impl Widget {
    /// Short lowercase name of the widget kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Html(_) => "html",
            Self::Textbox(_) => "textbox",
            Self::Dropdown(_) => "dropdown",
            Self::Button(_) => "button",
            Self::Dataframe(_) => "dataframe",
        }
    }

    /// Whether the widget starts out visible.
    pub fn visible(&self) -> bool {
        match self {
            Self::Html(w) => w.visible,
            Self::Textbox(w) => w.visible,
            Self::Dropdown(w) => w.visible,
            Self::Button(w) => w.visible,
            Self::Dataframe(w) => w.visible,
        }
    }

    fn supports(&self, event: EventKind) -> bool {
        matches!(
            (self, event),
            (Self::Button(_), EventKind::Click)
                | (Self::Textbox(_), EventKind::Change | EventKind::Submit)
                | (Self::Dropdown(_), EventKind::Change)
        )
    }
}

macro_rules! impl_into_widget {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Widget {
            fn from(w: $ty) -> Self {
                Self::$ty(w)
            }
        })*
    };
}

impl_into_widget!(Html, Textbox, Dropdown, Button, Dataframe);

/// Browser event a binding listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Button press.
    Click,
    /// Value edited or selection changed.
    Change,
    /// Enter pressed in a textbox.
    Submit,
}

/// Change to apply to one output widget. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetUpdate {
    /// New value (string, list of strings, or table rows depending on the widget).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// New interactivity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
}

impl WidgetUpdate {
    /// Leaves the widget as it is.
    pub fn keep() -> Self {
        Self::default()
    }

    /// Replaces the widget's value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Also sets visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Also sets interactivity.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }
}

/// Server-side event handler: input values in, one update per output out.
pub type Handler = Arc<dyn Fn(&[Value]) -> anyhow::Result<Vec<WidgetUpdate>> + Send + Sync>;

/// An event handler attached to a widget.
#[derive(Clone, Serialize)]
pub struct Binding {
    /// Position in the page's binding list.
    pub id: usize,
    /// Widget whose event fires the handler.
    pub trigger: WidgetId,
    /// Event listened to.
    pub event: EventKind,
    /// Widgets whose values are sent to the handler.
    pub inputs: Vec<WidgetId>,
    /// Widgets the handler's updates apply to.
    pub outputs: Vec<WidgetId>,
    #[serde(skip)]
    handler: Handler,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("trigger", &self.trigger)
            .field("event", &self.event)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

/// Errors from dispatching an event to its handler.
#[derive(Debug, Error)]
pub enum EventError {
    /// No binding has this id.
    #[error("Unknown event binding: {0}")]
    UnknownBinding(usize),

    /// The request carried the wrong number of input values.
    #[error("Binding {binding} expects {expected} input values, got {found}")]
    InputCount {
        /// Binding id.
        binding: usize,
        /// Number of declared inputs.
        expected: usize,
        /// Number of values received.
        found: usize,
    },

    /// The handler returned the wrong number of updates.
    #[error("Binding {binding} handler returned {found} updates for {expected} outputs")]
    OutputCount {
        /// Binding id.
        binding: usize,
        /// Number of declared outputs.
        expected: usize,
        /// Number of updates returned.
        found: usize,
    },

    /// The handler failed.
    #[error("Event handler failed: {0:#}")]
    Handler(#[source] anyhow::Error),
}

/// A tab and the widgets placed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    /// Title shown in the tab strip.
    pub title: String,
    /// Widgets in display order.
    pub children: Vec<WidgetId>,
}

/// Scoped context handed to a tab builder.
///
/// Widgets added here become children of the tab being built.
#[derive(Debug)]
pub struct Panel {
    title: String,
    first_id: usize,
    widgets: Vec<Widget>,
}

impl Panel {
    /// Adds a widget and returns its handle.
    pub fn add(&mut self, widget: impl Into<Widget>) -> WidgetId {
        let id = WidgetId(self.first_id + self.widgets.len());
        self.widgets.push(widget.into());
        id
    }

    /// Title of the tab being built.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of widgets added so far.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns true if nothing was added yet.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

/// A complete page.
#[derive(Debug, Default)]
pub struct Blocks {
    title: String,
    css: String,
    header: Vec<WidgetId>,
    tabs: Vec<Tab>,
    widgets: Vec<Widget>,
    bindings: Vec<Binding>,
}

impl Blocks {
    /// Creates an empty page.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the stylesheet inlined into the page.
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    /// Page title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Inlined stylesheet.
    pub fn css(&self) -> &str {
        &self.css
    }

    /// Adds a widget above the tab strip.
    pub fn add_header(&mut self, widget: impl Into<Widget>) -> WidgetId {
        let id = WidgetId(self.widgets.len());
        self.widgets.push(widget.into());
        self.header.push(id);
        id
    }

    /// Widgets shown above the tab strip.
    pub fn header(&self) -> &[WidgetId] {
        &self.header
    }

    /// Tabs in display order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Looks up a widget.
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    /// Event bindings in registration order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Attaches `handler` to `event` on `trigger`.
    ///
    /// # Errors
    ///
    /// Fails if any widget id is unknown or `trigger` does not emit `event`.
    pub fn bind<F>(
        &mut self,
        trigger: WidgetId,
        event: EventKind,
        inputs: &[WidgetId],
        outputs: &[WidgetId],
        handler: F,
    ) -> anyhow::Result<usize>
    where
        F: Fn(&[Value]) -> anyhow::Result<Vec<WidgetUpdate>> + Send + Sync + 'static,
    {
        let Some(widget) = self.widget(trigger) else {
            anyhow::bail!("Cannot bind {event:?}: unknown trigger widget {trigger}");
        };
        if !widget.supports(event) {
            anyhow::bail!(
                "Cannot bind {event:?} to {trigger}: a {} does not emit it",
                widget.kind()
            );
        }
        if let Some(missing) = inputs
            .iter()
            .chain(outputs)
            .find(|id| self.widget(**id).is_none())
        {
            anyhow::bail!("Cannot bind {event:?} on {trigger}: unknown widget {missing}");
        }

        let id = self.bindings.len();
        self.bindings.push(Binding {
            id,
            trigger,
            event,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            handler: Arc::new(handler),
        });
        Ok(id)
    }

    /// Runs binding `id` with the given input values.
    pub fn dispatch(&self, id: usize, inputs: &[Value]) -> Result<Vec<WidgetUpdate>, EventError> {
        let binding = self.bindings.get(id).ok_or(EventError::UnknownBinding(id))?;

        if inputs.len() != binding.inputs.len() {
            return Err(EventError::InputCount {
                binding: id,
                expected: binding.inputs.len(),
                found: inputs.len(),
            });
        }

        let updates = (binding.handler)(inputs).map_err(EventError::Handler)?;

        if updates.len() != binding.outputs.len() {
            return Err(EventError::OutputCount {
                binding: id,
                expected: binding.outputs.len(),
                found: updates.len(),
            });
        }

        Ok(updates)
    }
}

impl TabContainer for Blocks {
    type Panel = Panel;

    fn with_tab<R>(
        &mut self,
        title: &str,
        build: impl FnOnce(&mut Panel) -> anyhow::Result<R>,
    ) -> anyhow::Result<R> {
        let mut panel = Panel {
            title: title.to_string(),
            first_id: self.widgets.len(),
            widgets: Vec::new(),
        };
        // Widgets of a failed tab are dropped with the panel.
        let result = build(&mut panel)?;

        let children = (panel.first_id..panel.first_id + panel.widgets.len())
            .map(WidgetId)
            .collect();
        self.widgets.extend(panel.widgets);
        self.tabs.push(Tab {
            title: panel.title,
            children,
        });
        Ok(result)
    }
}
