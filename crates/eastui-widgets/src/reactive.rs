#![forbid(unsafe_code)]

//! Reactive fragments: the DSL entry point for independently re-rendering
//! subtrees.
//!
//! A fragment's body is an expression thunk whose only inputs are tracked
//! state reads. The no-capture check runs here, at construction — a body
//! referencing an enclosing scope never becomes a mountable unit.

use eastui_expr::{CaptureViolation, Expr, Lambda, Site};
use eastui_reactive::ReactiveUnit;

/// Build a mountable reactive fragment from a body expression.
///
/// `site` names the fragment in diagnostics.
pub fn fragment(body: Expr, site: Site) -> Result<ReactiveUnit, CaptureViolation> {
    ReactiveUnit::new(Lambda::thunk(body, site))
}
