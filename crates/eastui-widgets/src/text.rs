#![forbid(unsafe_code)]

//! Text node: a styled run of content.

use eastui_value::{Value, ValueType};

use crate::{Component, node, opt_str};

/// A run of text with basic styling.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    content: String,
    bold: bool,
    color: Option<String>,
}

impl Text {
    /// Create a text node.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            bold: false,
            color: None,
        }
    }

    /// Render bold.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Foreground color token (resolved by the host design system).
    #[must_use]
    pub fn color(mut self, token: impl Into<String>) -> Self {
        self.color = Some(token.into());
        self
    }
}

impl Component for Text {
    const TAG: &'static str = "Text";

    fn schema() -> ValueType {
        ValueType::record([
            ("content", ValueType::Str),
            ("bold", ValueType::Bool),
            ("color", ValueType::option(ValueType::Str)),
        ])
    }

    fn build(self) -> Value {
        node::<Self>(Value::record([
            ("content", Value::Str(self.content)),
            ("bold", Value::Bool(self.bold)),
            ("color", opt_str(self.color)),
        ]))
    }
}
