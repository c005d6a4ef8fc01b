#![forbid(unsafe_code)]

//! Dependency tracking, state store, and selective re-render runtime for
//! East UI.
//!
//! This crate is the stateful core of the system. Everything else in the
//! workspace is data shaping; here live the three pieces with genuine
//! behavior:
//!
//! - [`Tracker`]: records the set of state keys read during one render pass.
//! - [`StateStore`]: provider-scoped key → blob map with synchronous change
//!   notification.
//! - [`Runtime`]: registers reactive units, brackets their renders with
//!   tracking, and re-renders exactly the units whose dependency sets a
//!   write touches.
//!
//! # Concurrency model
//!
//! Single-threaded and cooperative. The only shared mutable resources are
//! the store and the tracker, both reached through cheaply cloneable handles
//! (`Rc` inside). Writes apply in call order and invalidation is synchronous
//! with the write; there is no batching at this layer.

pub mod runtime;
pub mod store;
pub mod tracker;
pub mod unit;

pub use runtime::{MountHandle, RenderError, Runtime};
pub use store::{StateError, StateScope, StateStore, StoreSubscription};
pub use tracker::Tracker;
pub use unit::{ReactiveUnit, UnitId, UnitState};
