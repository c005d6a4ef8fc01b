#![forbid(unsafe_code)]

//! Button node.

use eastui_value::{Value, ValueType};

use crate::{Component, node, opt_str};

/// A clickable button. The action itself is wired by the host binding; the
/// node carries an optional action name for it to dispatch on.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    label: String,
    action: Option<String>,
    disabled: bool,
}

impl Button {
    /// Create a button with a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: None,
            disabled: false,
        }
    }

    /// Name of the action the host should dispatch when pressed.
    #[must_use]
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.action = Some(name.into());
        self
    }

    /// Render disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl Component for Button {
    const TAG: &'static str = "Button";

    fn schema() -> ValueType {
        ValueType::record([
            ("label", ValueType::Str),
            ("action", ValueType::option(ValueType::Str)),
            ("disabled", ValueType::Bool),
        ])
    }

    fn build(self) -> Value {
        node::<Self>(Value::record([
            ("label", Value::Str(self.label)),
            ("action", opt_str(self.action)),
            ("disabled", Value::Bool(self.disabled)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_action() {
        let Value::Union { tag, payload } = Button::new("Save").action("save").build() else {
            panic!("expected union");
        };
        assert_eq!(tag, "Button");
        assert_eq!(payload.field("action"), Some(&Value::some(Value::str("save"))));
        assert_eq!(payload.field("disabled"), Some(&Value::Bool(false)));
    }
}
