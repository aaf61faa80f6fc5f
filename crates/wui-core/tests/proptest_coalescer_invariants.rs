//! Property-based invariant tests for the animation coalescer.
//!
//! 1. At most one handle is executing (executed but neither settled nor
//!    cancelled) at any time.
//! 2. Any number of requests during one animation yields at most one replay.
//! 3. Only the in-flight ticket settles; everything else is stale.
//! 4. Cancelling drops the queued follow-up.
//! 5. Tickets are never reused.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use proptest::prelude::*;
use wui_core::coalescer::{AnimationCoalescer, Settle};
use wui_core::host::{AnimationTicket, UpdateAnimation};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Counters {
    executing: usize,
    max_executing: usize,
}

#[derive(Debug)]
struct Handle {
    counters: Rc<RefCell<Counters>>,
    live: bool,
}

impl Handle {
    fn new(counters: &Rc<RefCell<Counters>>) -> Self {
        Self {
            counters: Rc::clone(counters),
            live: false,
        }
    }
}

impl UpdateAnimation for Handle {
    fn execute(&mut self, _ticket: AnimationTicket) {
        let mut c = self.counters.borrow_mut();
        c.executing += 1;
        c.max_executing = c.max_executing.max(c.executing);
        self.live = true;
    }

    fn cancel(&mut self) {
        if self.live {
            self.live = false;
            self.counters.borrow_mut().executing -= 1;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    /// Render now if idle, otherwise queue.
    Request,
    Settle,
    SettleStale,
    Cancel,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Request),
        3 => Just(Op::Settle),
        1 => Just(Op::SettleStale),
        1 => Just(Op::Cancel),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// Model check against a simple reference
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coalescer_matches_model(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let counters = Rc::new(RefCell::new(Counters::default()));
        let mut slot: AnimationCoalescer<Handle> = AnimationCoalescer::new();
        let mut issued = HashSet::new();
        let mut retired = Vec::new();
        // Reference model: (busy, queued).
        let mut busy = false;
        let mut queued = false;

        for op in ops {
            match op {
                Op::Request => {
                    if slot.request_if_busy() {
                        prop_assert!(busy);
                        queued = true;
                    } else {
                        prop_assert!(!busy);
                        let ticket = slot.begin(Handle::new(&counters));
                        prop_assert!(issued.insert(ticket), "ticket reused: {}", ticket);
                        busy = true;
                    }
                }
                Op::Settle => {
                    if let Some(ticket) = slot.current_ticket() {
                        let result = slot.settle(ticket);
                        prop_assert_eq!(result, Settle::Finished { replay: queued });
                        // The owner's animation has ended.
                        counters.borrow_mut().executing -= 1;
                        retired.push(ticket);
                        busy = false;
                        queued = false;
                        if let Settle::Finished { replay: true } = result {
                            let ticket = slot.begin(Handle::new(&counters));
                            prop_assert!(issued.insert(ticket));
                            busy = true;
                        }
                    }
                }
                Op::SettleStale => {
                    if let Some(&old) = retired.last() {
                        prop_assert_eq!(slot.settle(old), Settle::Stale);
                    }
                }
                Op::Cancel => {
                    let cancelled = slot.cancel_if_pending();
                    prop_assert_eq!(cancelled.is_some(), busy);
                    retired.extend(cancelled);
                    busy = false;
                    queued = false;
                }
            }

            prop_assert_eq!(slot.is_busy(), busy);
            prop_assert_eq!(slot.is_queued(), queued);
            prop_assert_eq!(counters.borrow().executing, usize::from(busy));
        }

        prop_assert!(counters.borrow().max_executing <= 1);
    }
}
