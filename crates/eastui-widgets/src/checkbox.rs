#![forbid(unsafe_code)]

//! Checkbox node. The checked flag lives in the state store under the
//! node's state key, so reactive fragments can depend on it.

use eastui_value::{Value, ValueType};

use crate::{Component, node};

/// A labeled checkbox bound to a boolean state key.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkbox {
    label: String,
    state_key: String,
    disabled: bool,
}

impl Checkbox {
    /// Create a checkbox bound to `state_key`.
    #[must_use]
    pub fn new(label: impl Into<String>, state_key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state_key: state_key.into(),
            disabled: false,
        }
    }

    /// Render disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl Component for Checkbox {
    const TAG: &'static str = "Checkbox";

    fn schema() -> ValueType {
        ValueType::record([
            ("label", ValueType::Str),
            ("state_key", ValueType::Str),
            ("disabled", ValueType::Bool),
        ])
    }

    fn build(self) -> Value {
        node::<Self>(Value::record([
            ("label", Value::Str(self.label)),
            ("state_key", Value::Str(self.state_key)),
            ("disabled", Value::Bool(self.disabled)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_state_key() {
        let Value::Union { payload, .. } = Checkbox::new("I agree", "form.agree").build() else {
            panic!("expected union");
        };
        assert_eq!(payload.field("state_key"), Some(&Value::str("form.agree")));
    }
}
