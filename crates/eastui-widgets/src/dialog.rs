#![forbid(unsafe_code)]

//! Modal dialog node. Visibility lives in the store under `open_key`.

use eastui_value::{Value, ValueType};

use crate::{Component, node};

/// A modal dialog whose open/closed flag is a boolean state key.
#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    title: String,
    open_key: String,
    body: Value,
    dismissable: bool,
}

impl Dialog {
    /// Create a dialog with a title, a visibility key, and a body node.
    #[must_use]
    pub fn new(title: impl Into<String>, open_key: impl Into<String>, body: Value) -> Self {
        Self {
            title: title.into(),
            open_key: open_key.into(),
            body,
            dismissable: true,
        }
    }

    /// Disallow dismissing via the backdrop or escape.
    #[must_use]
    pub fn blocking(mut self) -> Self {
        self.dismissable = false;
        self
    }
}

impl Component for Dialog {
    const TAG: &'static str = "Dialog";

    fn schema() -> ValueType {
        ValueType::record([
            ("title", ValueType::Str),
            ("open_key", ValueType::Str),
            ("body", ValueType::Any),
            ("dismissable", ValueType::Bool),
        ])
    }

    fn build(self) -> Value {
        node::<Self>(Value::record([
            ("title", Value::Str(self.title)),
            ("open_key", Value::Str(self.open_key)),
            ("body", self.body),
            ("dismissable", Value::Bool(self.dismissable)),
        ]))
    }
}
