#![forbid(unsafe_code)]

//! The provider-scoped state store.
//!
//! A [`StateStore`] maps string keys to opaque encoded blobs and notifies
//! subscribers synchronously on every write. Reads and existence checks are
//! *tracked*: the store holds a [`Tracker`] handle and records each access
//! into the active frame, if one exists.
//!
//! A store is created by a provider and injected wherever it is needed —
//! there is no module-level singleton. Code that may run before a provider
//! mounts goes through [`StateScope`], which fails fast with
//! [`StateError::NoProvider`] instead of silently dropping writes.
//!
//! # Invariants
//!
//! 1. Writes apply in call order; each write produces exactly one
//!    notification per live listener (no coalescing).
//! 2. Notification is synchronous with the write completing.
//! 3. Dropping a [`StoreSubscription`] removes the listener before the next
//!    notification cycle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::tracker::Tracker;

type Listener = Rc<dyn Fn(&str)>;

#[derive(Default)]
struct StoreInner {
    entries: AHashMap<String, Vec<u8>>,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
}

/// Key → blob state with tracked reads and synchronous change notification.
///
/// Cloning produces another handle to the same store.
#[derive(Clone)]
pub struct StateStore {
    inner: Rc<RefCell<StoreInner>>,
    tracker: Tracker,
}

impl StateStore {
    /// Create an empty store whose reads record into `tracker`.
    #[must_use]
    pub fn new(tracker: Tracker) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner::default())),
            tracker,
        }
    }

    /// The tracker this store records reads into.
    #[must_use]
    pub fn tracker(&self) -> Tracker {
        self.tracker.clone()
    }

    /// Tracked lookup. Absent keys return `None`; the access is recorded
    /// either way.
    #[must_use]
    pub fn read(&self, key: &str) -> Option<Vec<u8>> {
        self.tracker.record(key);
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Tracked existence check.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.tracker.record(key);
        self.inner.borrow().entries.contains_key(key)
    }

    /// Set (`Some`) or delete (`None`) a key, then notify every listener
    /// with the key. Listeners run after the store borrow is released, so
    /// they may read and even write the store.
    pub fn write(&self, key: &str, blob: Option<Vec<u8>>) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            match blob {
                Some(bytes) => {
                    trace!(key, len = bytes.len(), "state write");
                    inner.entries.insert(key.to_string(), bytes);
                }
                None => {
                    trace!(key, "state delete");
                    inner.entries.remove(key);
                }
            }
            inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };
        for listener in listeners {
            listener(key);
        }
    }

    /// Register a listener called synchronously with the key on every write.
    /// The returned guard unsubscribes on drop.
    #[must_use]
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> StoreSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push((id, Rc::new(listener)));
        StoreSubscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Weak handle for listeners that must not keep the store alive.
    pub(crate) fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
            tracker: self.tracker.clone(),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("StateStore")
            .field("keys", &inner.entries.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Non-owning store handle; avoids reference cycles when a store listener
/// needs the store back.
pub(crate) struct WeakStore {
    inner: Weak<RefCell<StoreInner>>,
    tracker: Tracker,
}

impl WeakStore {
    pub(crate) fn upgrade(&self) -> Option<StateStore> {
        self.inner.upgrade().map(|inner| StateStore {
            inner,
            tracker: self.tracker.clone(),
        })
    }
}

/// RAII guard for a store listener. Dropping it unsubscribes.
#[must_use = "dropping the subscription immediately unsubscribes the listener"]
pub struct StoreSubscription {
    store: Weak<RefCell<StoreInner>>,
    id: u64,
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for StoreSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSubscription").field("id", &self.id).finish()
    }
}

// ─── StateScope ──────────────────────────────────────────────────────────────

/// A possibly-unbound reference to a provider's store.
///
/// Host bindings thread a `StateScope` through the render tree; until a
/// provider binds a store, every operation fails fast so a missing provider
/// is caught at the first access rather than as mysteriously inert UI.
#[derive(Debug, Clone, Default)]
pub struct StateScope {
    store: Option<StateStore>,
}

impl StateScope {
    /// A scope with no provider bound.
    #[must_use]
    pub fn unbound() -> Self {
        Self::default()
    }

    /// A scope bound to `store`.
    #[must_use]
    pub fn bound(store: StateStore) -> Self {
        Self { store: Some(store) }
    }

    /// Bind a provider's store. Replaces any previous binding.
    pub fn bind(&mut self, store: StateStore) {
        if self.store.is_some() {
            debug!("state scope rebound to a new provider store");
        }
        self.store = Some(store);
    }

    /// Whether a provider is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.store.is_some()
    }

    /// The bound store, if any.
    #[must_use]
    pub fn store(&self) -> Option<&StateStore> {
        self.store.as_ref()
    }

    /// Tracked read through the bound store.
    pub fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.require()?.read(key))
    }

    /// Tracked existence check through the bound store.
    pub fn has(&self, key: &str) -> Result<bool, StateError> {
        Ok(self.require()?.has(key))
    }

    /// Write through the bound store.
    pub fn write(&self, key: &str, blob: Option<Vec<u8>>) -> Result<(), StateError> {
        self.require()?.write(key, blob);
        Ok(())
    }

    fn require(&self) -> Result<&StateStore, StateError> {
        self.store.as_ref().ok_or(StateError::NoProvider)
    }
}

/// State access failed before reaching a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// No provider has bound a store to this scope.
    NoProvider,
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoProvider => write!(
                f,
                "no UI state provider is mounted; create a StateStore and bind it to the scope \
                 before reading or writing state"
            ),
        }
    }
}

impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn store() -> StateStore {
        StateStore::new(Tracker::new())
    }

    #[test]
    fn read_absent_returns_none() {
        let s = store();
        assert!(s.read("counter").is_none());
        assert!(!s.has("counter"));
    }

    #[test]
    fn write_then_read() {
        let s = store();
        s.write("counter", Some(vec![1, 2, 3]));
        assert_eq!(s.read("counter"), Some(vec![1, 2, 3]));
        assert!(s.has("counter"));
        s.write("counter", None);
        assert!(s.read("counter").is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn reads_record_into_active_frame_even_when_absent() {
        let t = Tracker::new();
        let s = StateStore::new(t.clone());
        t.enable();
        let _ = s.read("counter");
        let _ = s.has("flag");
        assert_eq!(t.disable(), ["counter", "flag"]);
    }

    #[test]
    fn reads_outside_tracking_are_not_recorded() {
        let t = Tracker::new();
        let s = StateStore::new(t.clone());
        let _ = s.read("counter");
        t.enable();
        assert!(t.disable().is_empty());
    }

    #[test]
    fn each_write_notifies_once() {
        let s = store();
        let count = Rc::new(Cell::new(0u32));
        let count_in = Rc::clone(&count);
        let _sub = s.subscribe(move |_| count_in.set(count_in.get() + 1));

        s.write("a", Some(vec![1]));
        s.write("a", Some(vec![2]));
        s.write("b", None);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn listener_receives_key() {
        let s = store();
        let last = Rc::new(RefCell::new(String::new()));
        let last_in = Rc::clone(&last);
        let _sub = s.subscribe(move |key| *last_in.borrow_mut() = key.to_string());
        s.write("counter", Some(vec![0]));
        assert_eq!(*last.borrow(), "counter");
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let s = store();
        let count = Rc::new(Cell::new(0u32));
        let count_in = Rc::clone(&count);
        let sub = s.subscribe(move |_| count_in.set(count_in.get() + 1));
        s.write("a", Some(vec![1]));
        drop(sub);
        s.write("a", Some(vec![2]));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_may_read_the_store() {
        let s = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        let s_in = s.clone();
        let _sub = s.subscribe(move |key| {
            seen_in.borrow_mut().push(s_in.read(key));
        });
        s.write("k", Some(vec![9]));
        assert_eq!(*seen.borrow(), [Some(vec![9])]);
    }

    #[test]
    fn unbound_scope_fails_fast() {
        let scope = StateScope::unbound();
        assert_eq!(scope.write("k", Some(vec![1])), Err(StateError::NoProvider));
        assert_eq!(scope.read("k"), Err(StateError::NoProvider));
        assert_eq!(scope.has("k"), Err(StateError::NoProvider));
        let msg = StateError::NoProvider.to_string();
        assert!(msg.contains("provider"), "{msg}");
    }

    #[test]
    fn bound_scope_forwards() {
        let mut scope = StateScope::unbound();
        scope.bind(store());
        assert!(scope.is_bound());
        scope.write("k", Some(vec![7])).unwrap();
        assert_eq!(scope.read("k").unwrap(), Some(vec![7]));
        assert!(scope.has("k").unwrap());
    }
}
