#![forbid(unsafe_code)]

//! Single-line text input bound to a string state key.

use eastui_value::{Value, ValueType};

use crate::{Component, node, opt_str};

/// A text input whose current value lives under `state_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
    state_key: String,
    placeholder: Option<String>,
}

impl TextInput {
    /// Create an input bound to `state_key`.
    #[must_use]
    pub fn new(state_key: impl Into<String>) -> Self {
        Self {
            state_key: state_key.into(),
            placeholder: None,
        }
    }

    /// Placeholder shown while the bound key is absent or empty.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }
}

impl Component for TextInput {
    const TAG: &'static str = "TextInput";

    fn schema() -> ValueType {
        ValueType::record([
            ("state_key", ValueType::Str),
            ("placeholder", ValueType::option(ValueType::Str)),
        ])
    }

    fn build(self) -> Value {
        node::<Self>(Value::record([
            ("state_key", Value::Str(self.state_key)),
            ("placeholder", opt_str(self.placeholder)),
        ]))
    }
}
