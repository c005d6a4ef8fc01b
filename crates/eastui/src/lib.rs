#![forbid(unsafe_code)]

//! East UI public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub mod prelude {
    pub use eastui_expr as expr;
    pub use eastui_reactive as reactive;
    pub use eastui_value as value;
    pub use eastui_widgets as widgets;

    pub use eastui_expr::{Expr, Lambda, Site};
    pub use eastui_reactive::{ReactiveUnit, Runtime, StateScope, StateStore, Tracker};
    pub use eastui_value::{Value, ValueType};
    pub use eastui_widgets::Component;
}
