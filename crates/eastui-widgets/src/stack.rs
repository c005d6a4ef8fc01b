#![forbid(unsafe_code)]

//! Stack container: children laid out along one axis.

use eastui_value::{Value, ValueType};

use crate::{Component, node};

/// Layout axis for a [`Stack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    fn tag(self) -> &'static str {
        match self {
            Self::Horizontal => "Horizontal",
            Self::Vertical => "Vertical",
        }
    }
}

/// A container laying out its children along one axis with uniform spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    direction: Direction,
    spacing: i64,
    children: Vec<Value>,
}

impl Stack {
    /// Create an empty stack.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            spacing: 0,
            children: Vec::new(),
        }
    }

    /// Spacing between children, in design-system units.
    #[must_use]
    pub fn spacing(mut self, spacing: i64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn child(mut self, child: Value) -> Self {
        self.children.push(child);
        self
    }

    /// Append many child nodes.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Value>) -> Self {
        self.children.extend(children);
        self
    }
}

impl Component for Stack {
    const TAG: &'static str = "Stack";

    fn schema() -> ValueType {
        ValueType::record([
            (
                "direction",
                ValueType::union([("Horizontal", ValueType::Unit), ("Vertical", ValueType::Unit)]),
            ),
            ("spacing", ValueType::Int),
            ("children", ValueType::array(ValueType::Any)),
        ])
    }

    fn build(self) -> Value {
        node::<Self>(Value::record([
            ("direction", Value::union(self.direction.tag(), Value::Unit)),
            ("spacing", Value::Int(self.spacing)),
            ("children", Value::Array(self.children)),
        ]))
    }
}
