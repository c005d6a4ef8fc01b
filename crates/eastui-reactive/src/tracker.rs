#![forbid(unsafe_code)]

//! Read tracking for render passes.
//!
//! A [`Tracker`] collects the set of state keys read during exactly one
//! logical render pass. It is an explicit, injected object — never a process
//! global — and it is stack-disciplined: nested passes compose, with an inner
//! pass recording into its own frame only. This removes the silent-overwrite
//! hazard a single mutable slot would have, and gives nested reactive units
//! correct per-unit dependency sets.
//!
//! # Invariants
//!
//! 1. [`disable`](Tracker::disable) returns exactly the keys recorded since
//!    the matching [`enable`](Tracker::enable), in first-read order, with no
//!    duplicates regardless of repeated reads.
//! 2. Reads outside any active frame are not recorded anywhere.
//! 3. A record lands in the innermost (top) frame only.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashSet;
use tracing::{debug, trace};

/// One tracking frame: insertion-ordered keys plus a dedupe set.
#[derive(Debug, Default)]
struct Frame {
    order: Vec<String>,
    seen: AHashSet<String>,
}

impl Frame {
    fn record(&mut self, key: &str) {
        if self.seen.insert(key.to_string()) {
            self.order.push(key.to_string());
        }
    }
}

/// Handle to a stack of tracking frames. Cloning shares the stack.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl Tracker {
    /// Create a tracker with no active frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a tracking pass: push a fresh empty frame.
    pub fn enable(&self) {
        let mut frames = self.frames.borrow_mut();
        frames.push(Frame::default());
        trace!(depth = frames.len(), "tracking enabled");
    }

    /// End the innermost tracking pass and return its keys in first-read
    /// order. Returns an empty set if no pass is active (logged, not fatal:
    /// the caller's bracket is unbalanced).
    #[must_use]
    pub fn disable(&self) -> Vec<String> {
        let mut frames = self.frames.borrow_mut();
        match frames.pop() {
            Some(frame) => {
                trace!(depth = frames.len() + 1, keys = frame.order.len(), "tracking disabled");
                frame.order
            }
            None => {
                debug!("tracking disable without matching enable");
                Vec::new()
            }
        }
    }

    /// Record an access into the innermost frame, if any.
    pub fn record(&self, key: &str) {
        if let Some(top) = self.frames.borrow_mut().last_mut() {
            top.record(key);
        }
    }

    /// Whether a tracking pass is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.frames.borrow().is_empty()
    }

    /// Number of nested passes currently active.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disable_returns_recorded_keys_deduplicated() {
        let t = Tracker::new();
        t.enable();
        t.record("a");
        t.record("b");
        t.record("a");
        t.record("a");
        assert_eq!(t.disable(), ["a", "b"]);
    }

    #[test]
    fn keys_come_back_in_first_read_order() {
        let t = Tracker::new();
        t.enable();
        for key in ["z", "m", "a", "m", "z"] {
            t.record(key);
        }
        assert_eq!(t.disable(), ["z", "m", "a"]);
    }

    #[test]
    fn records_outside_a_frame_are_dropped() {
        let t = Tracker::new();
        t.record("ghost");
        t.enable();
        assert_eq!(t.disable(), Vec::<String>::new());
    }

    #[test]
    fn nested_frames_do_not_mix() {
        let t = Tracker::new();
        t.enable();
        t.record("outer");
        t.enable();
        t.record("inner");
        assert_eq!(t.disable(), ["inner"]);
        t.record("outer-again");
        assert_eq!(t.disable(), ["outer", "outer-again"]);
    }

    #[test]
    fn disable_without_enable_is_empty() {
        let t = Tracker::new();
        assert!(t.disable().is_empty());
        assert!(!t.is_active());
    }

    #[test]
    fn clone_shares_the_stack() {
        let t = Tracker::new();
        let t2 = t.clone();
        t.enable();
        t2.record("shared");
        assert_eq!(t.disable(), ["shared"]);
    }

    #[test]
    fn depth_reflects_nesting() {
        let t = Tracker::new();
        assert_eq!(t.depth(), 0);
        t.enable();
        t.enable();
        assert_eq!(t.depth(), 2);
        let _ = t.disable();
        assert_eq!(t.depth(), 1);
    }
}
