#![forbid(unsafe_code)]

//! Slider node bound to an integer state key.

use eastui_value::{Value, ValueType};

use crate::{Component, node};

/// A slider over an inclusive integer range.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    state_key: String,
    min: i64,
    max: i64,
    step: i64,
}

impl Slider {
    /// Create a slider bound to `state_key` over `[min, max]`.
    #[must_use]
    pub fn new(state_key: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            state_key: state_key.into(),
            min,
            max,
            step: 1,
        }
    }

    /// Step increment (defaults to 1).
    #[must_use]
    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }
}

impl Component for Slider {
    const TAG: &'static str = "Slider";

    fn schema() -> ValueType {
        ValueType::record([
            ("state_key", ValueType::Str),
            ("min", ValueType::Int),
            ("max", ValueType::Int),
            ("step", ValueType::Int),
        ])
    }

    fn build(self) -> Value {
        node::<Self>(Value::record([
            ("state_key", Value::Str(self.state_key)),
            ("min", Value::Int(self.min)),
            ("max", Value::Int(self.max)),
            ("step", Value::Int(self.step)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_and_step() {
        let Value::Union { payload, .. } = Slider::new("vol", 0, 10).step(2).build() else {
            panic!("expected union");
        };
        assert_eq!(payload.field("min"), Some(&Value::Int(0)));
        assert_eq!(payload.field("max"), Some(&Value::Int(10)));
        assert_eq!(payload.field("step"), Some(&Value::Int(2)));
    }
}
