#![forbid(unsafe_code)]

//! Property tests for the tracking frame discipline.
//!
//! Invariants under arbitrary interleavings of enable/record/disable:
//!
//! 1. `disable()` returns exactly the distinct keys recorded into its frame,
//!    in first-record order.
//! 2. Frames never observe records made while they were not the innermost.
//! 3. The stack depth equals enables minus disables, floored at zero.

use proptest::prelude::*;

use eastui_reactive::Tracker;

#[derive(Debug, Clone)]
enum Op {
    Enable,
    Record(String),
    Disable,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Enable),
        5 => "[a-e]".prop_map(Op::Record),
        2 => Just(Op::Disable),
    ]
}

/// Reference model: a plain stack of ordered key lists.
#[derive(Default)]
struct Model {
    stack: Vec<Vec<String>>,
}

impl Model {
    fn enable(&mut self) {
        self.stack.push(Vec::new());
    }

    fn record(&mut self, key: &str) {
        if let Some(top) = self.stack.last_mut() {
            if !top.iter().any(|k| k == key) {
                top.push(key.to_string());
            }
        }
    }

    fn disable(&mut self) -> Vec<String> {
        self.stack.pop().unwrap_or_default()
    }
}

proptest! {
    #[test]
    fn tracker_matches_reference_model(ops in prop::collection::vec(arb_op(), 0..64)) {
        let tracker = Tracker::new();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Enable => {
                    tracker.enable();
                    model.enable();
                }
                Op::Record(key) => {
                    tracker.record(&key);
                    model.record(&key);
                }
                Op::Disable => {
                    prop_assert_eq!(tracker.disable(), model.disable());
                }
            }
            prop_assert_eq!(tracker.depth(), model.stack.len());
        }

        // Drain whatever is left; frames must still match.
        while tracker.is_active() {
            prop_assert_eq!(tracker.disable(), model.disable());
        }
    }

    #[test]
    fn disable_never_duplicates(keys in prop::collection::vec("[a-c]", 0..32)) {
        let tracker = Tracker::new();
        tracker.enable();
        for key in &keys {
            tracker.record(key);
        }
        let result = tracker.disable();
        let mut deduped = result.clone();
        deduped.dedup();
        prop_assert_eq!(&result, &deduped);
        let mut sorted = result.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), result.len());
    }
}
