#![forbid(unsafe_code)]

//! The selective re-render runtime.
//!
//! A [`Runtime`] owns the tracker, a provider store, and a registry of
//! mounted reactive units. Each unit render is bracketed by a tracking
//! frame; the keys read become the unit's dependency set, and a reverse
//! index (key → units) makes invalidation a lookup. Writes notify the store,
//! the store notifies the runtime, and the runtime synchronously re-renders
//! exactly the units whose dependency sets contain the written key.
//!
//! # Invariants
//!
//! 1. A unit's dependency set after a render equals exactly the keys its own
//!    body read during that render — not keys read by nested units, not keys
//!    from prior renders.
//! 2. One write produces at most one re-render per dependent unit, in
//!    ascending unit-id order. Writes are never coalesced.
//! 3. A unit currently `Rendering` is not re-entered by a write issued
//!    during its own pass.
//! 4. Unmounting removes the unit from the reverse index before returning.
//!
//! # Failure Modes
//!
//! - **Initial render fails** (decode mismatch, malformed body): `mount`
//!   unregisters the unit and returns the error.
//! - **Write-triggered render fails**: there is no caller to return to; the
//!   error is logged and retained on the unit (see
//!   [`Runtime::last_error`]). The unit keeps the dependency set from the
//!   reads that succeeded, so a later write can still reach it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::{AHashMap, AHashSet};
use tracing::{debug, error, trace};

use eastui_expr::{CaptureViolation, EvalError, HostState, Lambda, eval_lambda};
use eastui_value::{CodecError, Value, ValueType, decode_as, encode};

use crate::store::{StateError, StateScope, StateStore, StoreSubscription};
use crate::tracker::Tracker;
use crate::unit::{ReactiveUnit, UnitId, UnitState};

// ─── Registry ────────────────────────────────────────────────────────────────

struct UnitEntry {
    lambda: Lambda,
    state: UnitState,
    deps: Vec<String>,
    rendered: Option<Value>,
    renders: u64,
    last_error: Option<RenderError>,
}

#[derive(Default)]
struct Registry {
    units: AHashMap<UnitId, UnitEntry>,
    by_key: AHashMap<String, AHashSet<UnitId>>,
    next_id: u64,
}

impl Registry {
    fn unregister(&mut self, id: UnitId) {
        if let Some(entry) = self.units.remove(&id) {
            for key in &entry.deps {
                let emptied = self
                    .by_key
                    .get_mut(key)
                    .map(|set| {
                        set.remove(&id);
                        set.is_empty()
                    })
                    .unwrap_or(false);
                if emptied {
                    self.by_key.remove(key);
                }
            }
            debug!(unit = %id, "unit unmounted");
        }
    }
}

// ─── Runtime ─────────────────────────────────────────────────────────────────

/// Provider-scoped reactive runtime. Cloning is not supported; host bindings
/// hold one runtime per provider instance.
pub struct Runtime {
    registry: Rc<RefCell<Registry>>,
    store: StateStore,
    tracker: Tracker,
    _invalidation: StoreSubscription,
}

impl Runtime {
    /// Create a runtime with a fresh provider store.
    #[must_use]
    pub fn new() -> Self {
        let tracker = Tracker::new();
        Self::with_store(StateStore::new(tracker))
    }

    /// Create a runtime over the store bound to `scope`.
    ///
    /// Fails fast if no provider has bound a store yet.
    pub fn from_scope(scope: &StateScope) -> Result<Self, StateError> {
        match scope.store() {
            Some(store) => Ok(Self::with_store(store.clone())),
            None => Err(StateError::NoProvider),
        }
    }

    fn with_store(store: StateStore) -> Self {
        let tracker = store.tracker();
        let registry = Rc::new(RefCell::new(Registry::default()));

        let weak_registry = Rc::downgrade(&registry);
        let weak_store = store.downgrade();
        let invalidation = store.subscribe(move |key| {
            let (Some(registry), Some(store)) = (weak_registry.upgrade(), weak_store.upgrade())
            else {
                return;
            };
            invalidate(&registry, &store, key);
        });

        Self {
            registry,
            store,
            tracker,
            _invalidation: invalidation,
        }
    }

    /// Handle to the provider store (for host bindings that write directly).
    #[must_use]
    pub fn store(&self) -> StateStore {
        self.store.clone()
    }

    /// Handle to the tracker (for host bindings that bracket their own
    /// render passes).
    #[must_use]
    pub fn tracker(&self) -> Tracker {
        self.tracker.clone()
    }

    /// Mount a unit and render it once.
    ///
    /// On render failure the unit is unregistered and the error returned;
    /// a unit never stays mounted without a first successful render.
    pub fn mount(&self, unit: ReactiveUnit) -> Result<MountHandle, RenderError> {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = UnitId(registry.next_id);
            registry.next_id += 1;
            registry.units.insert(
                id,
                UnitEntry {
                    lambda: unit.into_lambda(),
                    state: UnitState::Idle,
                    deps: Vec::new(),
                    rendered: None,
                    renders: 0,
                    last_error: None,
                },
            );
            id
        };

        if let Err(err) = render_unit(&self.registry, &self.store, id) {
            self.registry.borrow_mut().unregister(id);
            return Err(err);
        }

        Ok(MountHandle {
            registry: Rc::downgrade(&self.registry),
            id,
        })
    }

    /// Capture-check a render body and mount it in one step.
    pub fn mount_body(&self, lambda: Lambda) -> Result<MountHandle, RenderError> {
        let unit = ReactiveUnit::new(lambda).map_err(RenderError::Capture)?;
        self.mount(unit)
    }

    /// Encode `value` and write it to `key`, triggering invalidation.
    pub fn write_value(&self, key: &str, value: &Value) -> Result<(), CodecError> {
        let blob = encode(value)?;
        self.store.write(key, Some(blob));
        Ok(())
    }

    /// Delete `key`, triggering invalidation.
    pub fn delete(&self, key: &str) {
        self.store.write(key, None);
    }

    /// The unit's last successfully rendered value.
    #[must_use]
    pub fn rendered(&self, id: UnitId) -> Option<Value> {
        self.registry
            .borrow()
            .units
            .get(&id)
            .and_then(|e| e.rendered.clone())
    }

    /// Completed render count for the unit (zero if unknown).
    #[must_use]
    pub fn renders(&self, id: UnitId) -> u64 {
        self.registry
            .borrow()
            .units
            .get(&id)
            .map_or(0, |e| e.renders)
    }

    /// The unit's current dependency set, in first-read order.
    #[must_use]
    pub fn deps(&self, id: UnitId) -> Vec<String> {
        self.registry
            .borrow()
            .units
            .get(&id)
            .map(|e| e.deps.clone())
            .unwrap_or_default()
    }

    /// The unit's lifecycle state, if mounted.
    #[must_use]
    pub fn unit_state(&self, id: UnitId) -> Option<UnitState> {
        self.registry.borrow().units.get(&id).map(|e| e.state)
    }

    /// The error from the unit's most recent failed render, if its latest
    /// render failed.
    #[must_use]
    pub fn last_error(&self, id: UnitId) -> Option<RenderError> {
        self.registry
            .borrow()
            .units
            .get(&id)
            .and_then(|e| e.last_error.clone())
    }

    /// Number of mounted units.
    #[must_use]
    pub fn mounted(&self) -> usize {
        self.registry.borrow().units.len()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("Runtime")
            .field("units", &registry.units.len())
            .field("tracked_keys", &registry.by_key.len())
            .finish()
    }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Host surface handed to the evaluator: reads go through the store, which
/// records them into the active tracking frame.
struct StoreHost {
    store: StateStore,
}

impl HostState for StoreHost {
    fn state_read(&self, key: &str, ty: &ValueType) -> Result<Value, EvalError> {
        match self.store.read(key) {
            None => Ok(Value::none()),
            Some(blob) => Ok(Value::some(decode_as(&blob, ty)?)),
        }
    }

    fn state_has(&self, key: &str) -> Result<bool, EvalError> {
        Ok(self.store.has(key))
    }
}

fn render_unit(
    registry: &Rc<RefCell<Registry>>,
    store: &StateStore,
    id: UnitId,
) -> Result<(), RenderError> {
    let lambda = {
        let mut reg = registry.borrow_mut();
        let Some(entry) = reg.units.get_mut(&id) else {
            return Ok(());
        };
        if entry.state == UnitState::Rendering {
            trace!(unit = %id, "skipping re-entrant render");
            return Ok(());
        }
        entry.state = UnitState::Rendering;
        entry.lambda.clone()
    };

    let tracker = store.tracker();
    tracker.enable();
    let host = StoreHost {
        store: store.clone(),
    };
    let result = eval_lambda(&lambda, Vec::new(), &host);
    let deps = tracker.disable();

    let mut reg = registry.borrow_mut();
    let Registry { units, by_key, .. } = &mut *reg;
    let Some(entry) = units.get_mut(&id) else {
        return Ok(());
    };

    // Replace the unit's reverse-index entries: stale keys out, fresh in.
    for key in entry.deps.drain(..) {
        let emptied = by_key
            .get_mut(&key)
            .map(|set| {
                set.remove(&id);
                set.is_empty()
            })
            .unwrap_or(false);
        if emptied {
            by_key.remove(&key);
        }
    }
    for key in &deps {
        by_key.entry(key.clone()).or_default().insert(id);
    }
    entry.deps = deps;
    entry.state = UnitState::Subscribed;

    match result {
        Ok(value) => {
            entry.renders += 1;
            entry.rendered = Some(value);
            entry.last_error = None;
            debug!(unit = %id, deps = entry.deps.len(), renders = entry.renders, "render complete");
            Ok(())
        }
        Err(err) => {
            let render_err = RenderError::Eval(err);
            entry.last_error = Some(render_err.clone());
            Err(render_err)
        }
    }
}

fn invalidate(registry: &Rc<RefCell<Registry>>, store: &StateStore, key: &str) {
    let mut affected: Vec<UnitId> = registry
        .borrow()
        .by_key
        .get(key)
        .map(|set| set.iter().copied().collect())
        .unwrap_or_default();
    if affected.is_empty() {
        return;
    }
    affected.sort_unstable();
    debug!(key, fan_out = affected.len(), "write invalidation");
    for id in affected {
        if let Err(err) = render_unit(registry, store, id) {
            error!(unit = %id, error = %err, "write-triggered re-render failed");
        }
    }
}

// ─── MountHandle ─────────────────────────────────────────────────────────────

/// RAII guard for a mounted unit. Dropping it unmounts the unit and drops
/// all of its subscriptions.
#[must_use = "dropping the handle immediately unmounts the unit"]
pub struct MountHandle {
    registry: Weak<RefCell<Registry>>,
    id: UnitId,
}

impl MountHandle {
    /// The mounted unit's identifier.
    #[must_use]
    pub fn id(&self) -> UnitId {
        self.id
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().unregister(self.id);
        }
    }
}

impl std::fmt::Debug for MountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountHandle").field("id", &self.id).finish()
    }
}

// ─── RenderError ─────────────────────────────────────────────────────────────

/// A reactive unit failed to mount or render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The body references an enclosing-scope variable (construction-time).
    Capture(CaptureViolation),
    /// The body failed during evaluation (decode mismatch, malformed tree).
    Eval(EvalError),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Capture(err) => write!(f, "{err}"),
            Self::Eval(err) => write!(f, "render failed: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Capture(err) => Some(err),
            Self::Eval(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eastui_expr::{Expr, Site};

    fn counter_body() -> Lambda {
        Lambda::thunk(
            Expr::state_read("counter", ValueType::Int),
            Site::named("Counter"),
        )
    }

    #[test]
    fn mount_renders_once() {
        let rt = Runtime::new();
        let handle = rt.mount_body(counter_body()).unwrap();
        assert_eq!(rt.renders(handle.id()), 1);
        assert_eq!(rt.rendered(handle.id()), Some(Value::none()));
        assert_eq!(rt.deps(handle.id()), ["counter"]);
        assert_eq!(rt.unit_state(handle.id()), Some(UnitState::Subscribed));
    }

    #[test]
    fn write_rerenders_dependent() {
        let rt = Runtime::new();
        let handle = rt.mount_body(counter_body()).unwrap();
        rt.write_value("counter", &Value::Int(5)).unwrap();
        assert_eq!(rt.renders(handle.id()), 2);
        assert_eq!(
            rt.rendered(handle.id()),
            Some(Value::some(Value::Int(5)))
        );
    }

    #[test]
    fn write_to_untracked_key_is_inert() {
        let rt = Runtime::new();
        let handle = rt.mount_body(counter_body()).unwrap();
        rt.write_value("unrelated", &Value::Int(1)).unwrap();
        assert_eq!(rt.renders(handle.id()), 1);
    }

    #[test]
    fn capture_violation_blocks_mount() {
        let rt = Runtime::new();
        let bad = Lambda::thunk(Expr::var("leak", Site::new("App", 3)), Site::named("Bad"));
        let err = rt.mount_body(bad).unwrap_err();
        assert!(matches!(err, RenderError::Capture(_)));
        assert_eq!(rt.mounted(), 0);
    }

    #[test]
    fn failed_initial_render_unmounts() {
        let rt = Runtime::new();
        rt.write_value("counter", &Value::str("NaN")).unwrap();
        let err = rt.mount_body(counter_body()).unwrap_err();
        assert!(matches!(err, RenderError::Eval(EvalError::Codec(_))));
        assert_eq!(rt.mounted(), 0);
        // The failed mount left nothing behind in the reverse index.
        rt.write_value("counter", &Value::Int(1)).unwrap();
    }

    #[test]
    fn write_triggered_failure_is_retained() {
        let rt = Runtime::new();
        let handle = rt.mount_body(counter_body()).unwrap();
        rt.write_value("counter", &Value::str("wrong shape")).unwrap();
        let err = rt.last_error(handle.id()).unwrap();
        assert!(matches!(err, RenderError::Eval(EvalError::Codec(_))));
        // A corrective write recovers on the next render.
        rt.write_value("counter", &Value::Int(2)).unwrap();
        assert!(rt.last_error(handle.id()).is_none());
        assert_eq!(
            rt.rendered(handle.id()),
            Some(Value::some(Value::Int(2)))
        );
    }

    #[test]
    fn unmount_drops_subscriptions() {
        let rt = Runtime::new();
        let handle = rt.mount_body(counter_body()).unwrap();
        let id = handle.id();
        drop(handle);
        assert_eq!(rt.mounted(), 0);
        rt.write_value("counter", &Value::Int(9)).unwrap();
        assert_eq!(rt.renders(id), 0);
    }

    #[test]
    fn from_scope_requires_provider() {
        assert_eq!(
            Runtime::from_scope(&StateScope::unbound()).map(|_| ()),
            Err(StateError::NoProvider)
        );
        let tracker = Tracker::new();
        let scope = StateScope::bound(StateStore::new(tracker));
        assert!(Runtime::from_scope(&scope).is_ok());
    }

    #[test]
    fn runtime_shares_store_with_scope() {
        let scope = StateScope::bound(StateStore::new(Tracker::new()));
        let rt = Runtime::from_scope(&scope).unwrap();
        let handle = rt.mount_body(counter_body()).unwrap();
        // A write through the scope (host-binding path) reaches the unit.
        scope
            .write("counter", Some(encode(&Value::Int(3)).unwrap()))
            .unwrap();
        assert_eq!(
            rt.rendered(handle.id()),
            Some(Value::some(Value::Int(3)))
        );
    }
}
