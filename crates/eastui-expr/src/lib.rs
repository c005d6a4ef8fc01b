#![forbid(unsafe_code)]

//! Expression IR, scope analysis, and evaluator for East UI reactive bodies.
//!
//! Reactive render bodies are not host-language closures; they are data — a
//! small typed expression tree ([`Expr`]) built by the DSL. Keeping bodies as
//! data is what makes the no-capture rule checkable *before* any render: the
//! free-variable set of a [`Lambda`] is a pure function of its syntax.

pub mod eval;
pub mod expr;
pub mod scope;

pub use eval::{EvalError, HostState, eval, eval_lambda};
pub use expr::{Expr, Lambda, Site};
pub use scope::{CaptureViolation, check_no_captures, free_vars};
