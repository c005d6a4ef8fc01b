#![forbid(unsafe_code)]

//! Component schemas and constructors for the East UI node tree.
//!
//! Everything here is declarative data shaping: each component is a builder
//! that produces a tagged-union [`Value`] node plus a [`ValueType`] schema
//! for its payload. Constructors are pure — no side effects, no state — and
//! type mismatches are caught by the value layer. The stateful machinery
//! (tracking, stores, re-render) lives in `eastui-reactive`.

pub mod button;
pub mod checkbox;
pub mod dialog;
pub mod grid;
pub mod reactive;
pub mod slider;
pub mod stack;
pub mod table;
pub mod text;
pub mod text_input;

pub use button::Button;
pub use checkbox::Checkbox;
pub use dialog::Dialog;
pub use grid::Grid;
pub use slider::Slider;
pub use stack::{Direction, Stack};
pub use table::Table;
pub use text::Text;
pub use text_input::TextInput;

use eastui_value::{Value, ValueType};

/// A UI component: a pure mapping from props to a typed node.
pub trait Component {
    /// Union tag identifying this component's nodes.
    const TAG: &'static str;

    /// Schema of this component's payload.
    fn schema() -> ValueType;

    /// Build the node. Consumes the builder.
    fn build(self) -> Value;
}

/// Wrap a payload in this component's union tag.
pub(crate) fn node<C: Component>(payload: Value) -> Value {
    Value::union(C::TAG, payload)
}

/// An optional string prop as a value.
pub(crate) fn opt_str(s: Option<String>) -> Value {
    match s {
        Some(s) => Value::some(Value::Str(s)),
        None => Value::none(),
    }
}
