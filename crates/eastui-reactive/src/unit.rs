#![forbid(unsafe_code)]

//! Reactive units: independently re-renderable fragments.
//!
//! A [`ReactiveUnit`] wraps the expression lambda that is its render body.
//! Construction runs the static no-capture check, so a body that references
//! an enclosing scope never reaches a render at all — the violation is
//! reported with the offending definition site.
//!
//! # Lifecycle
//!
//! `Idle` → `Rendering` (body invoked under a tracking frame) → `Subscribed`
//! (dependency set installed) → `Rendering` again on any write touching a
//! subscribed key. Unmounting drops the unit and its subscriptions.

use eastui_expr::{CaptureViolation, Lambda, check_no_captures};

/// Identifier for a mounted reactive unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u64);

impl UnitId {
    /// The raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Where a mounted unit is in its render lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Registered, never rendered.
    Idle,
    /// Body executing under an active tracking frame.
    Rendering,
    /// Last render complete; dependency set installed.
    Subscribed,
}

/// A capture-checked render body, ready to mount.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactiveUnit {
    lambda: Lambda,
}

impl ReactiveUnit {
    /// Validate and wrap a render body.
    ///
    /// The body must be a parameterless lambda whose only inputs are tracked
    /// state reads; any reference to an enclosing-scope variable fails here,
    /// before any render.
    pub fn new(lambda: Lambda) -> Result<Self, CaptureViolation> {
        check_no_captures(&lambda)?;
        Ok(Self { lambda })
    }

    /// The render body.
    #[must_use]
    pub fn lambda(&self) -> &Lambda {
        &self.lambda
    }

    /// Consume the unit, yielding its body.
    #[must_use]
    pub fn into_lambda(self) -> Lambda {
        self.lambda
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eastui_expr::{Expr, Site};
    use eastui_value::ValueType;

    #[test]
    fn closed_body_constructs() {
        let lambda = Lambda::thunk(
            Expr::state_read("counter", ValueType::Int),
            Site::named("Counter"),
        );
        assert!(ReactiveUnit::new(lambda).is_ok());
    }

    #[test]
    fn capturing_body_fails_before_any_render() {
        let lambda = Lambda::thunk(
            Expr::var("outer", Site::new("App", 7)),
            Site::named("Broken"),
        );
        let err = ReactiveUnit::new(lambda).unwrap_err();
        assert_eq!(err.name, "outer");
        assert!(err.to_string().contains("App:7"));
    }

    #[test]
    fn unit_id_display() {
        assert_eq!(UnitId(3).to_string(), "unit#3");
        assert_eq!(UnitId(3).raw(), 3);
    }
}
