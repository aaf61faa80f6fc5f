#![forbid(unsafe_code)]

//! Animation coalescing for widgets that re-render through animations.
//!
//! A widget that animates its updates must not start a second animation while
//! one is still running, and must not lose the requests that arrive in the
//! meantime. [`AnimationCoalescer`] holds that bookkeeping:
//!
//! - At most one animation handle is in flight.
//! - Requests that arrive while busy set a single "queued" flag. Any number of
//!   them collapse into one follow-up pass.
//! - When the in-flight animation settles, the owner learns whether a
//!   follow-up is due and re-renders from its *latest* desired state.
//!
//! # Design
//!
//! The slot is a tagged state, so the queued flag cannot exist without a
//! handle in flight:
//!
//! ```text
//! Idle ──begin──▶ InFlight{queued: false} ──request_if_busy──▶ InFlight{queued: true}
//!   ▲                    │                                            │
//!   └──────settle / cancel_if_pending─────────────────────────────────┘
//! ```
//!
//! Completion is never awaited. The host reports it by ticket and the owner
//! forwards it to [`settle`](AnimationCoalescer::settle). Tickets from a
//! cancelled or superseded animation are reported as [`Settle::Stale`].
//!
//! # Usage
//!
//! ```
//! use wui_core::coalescer::{AnimationCoalescer, Settle};
//! use wui_core::host::{AnimationTicket, UpdateAnimation};
//!
//! #[derive(Debug, Default)]
//! struct Instant;
//! impl UpdateAnimation for Instant {
//!     fn execute(&mut self, _ticket: AnimationTicket) {}
//!     fn cancel(&mut self) {}
//! }
//!
//! let mut slot = AnimationCoalescer::new();
//! assert!(!slot.request_if_busy()); // idle: render now
//!
//! let ticket = slot.begin(Instant);
//! assert!(slot.request_if_busy()); // busy: deferred
//! assert!(slot.request_if_busy()); // still one follow-up
//!
//! assert_eq!(slot.settle(ticket), Settle::Finished { replay: true });
//! assert!(!slot.is_busy());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::host::{AnimationTicket, UpdateAnimation};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

fn next_ticket() -> AnimationTicket {
    AnimationTicket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug, Default)]
enum Slot<H> {
    #[default]
    Idle,
    InFlight {
        ticket: AnimationTicket,
        handle: H,
        queued: bool,
    },
}

/// Result of reporting an animation completion to the coalescer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// The ticket does not belong to the in-flight animation. Ignore it.
    Stale,
    /// The in-flight animation finished and the slot is idle again.
    Finished {
        /// A request arrived during the animation; run one follow-up pass.
        replay: bool,
    },
}

/// Single-slot animation bookkeeping with one coalesced follow-up.
///
/// Not thread-safe; owned by one widget on the host's event loop.
#[derive(Debug, Default)]
pub struct AnimationCoalescer<H> {
    slot: Slot<H>,
}

impl<H: UpdateAnimation> AnimationCoalescer<H> {
    /// Create an idle coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self { slot: Slot::Idle }
    }

    /// Start executing `handle` and make it the in-flight animation.
    ///
    /// Callers check [`request_if_busy`](Self::request_if_busy) first. If an
    /// animation is somehow still in flight it is cancelled and replaced; its
    /// ticket becomes stale and its queued request carries over.
    pub fn begin(&mut self, mut handle: H) -> AnimationTicket {
        let mut carried = false;
        if let Slot::InFlight {
            handle: mut previous,
            queued,
            ..
        } = std::mem::take(&mut self.slot)
        {
            crate::warn!("begin while busy, cancelling previous animation");
            previous.cancel();
            carried = queued;
        }

        let ticket = next_ticket();
        handle.execute(ticket);
        self.slot = Slot::InFlight {
            ticket,
            handle,
            queued: carried,
        };
        ticket
    }

    /// If an animation is in flight, mark a follow-up as queued and return
    /// `true`. Otherwise return `false` and let the caller proceed directly.
    pub fn request_if_busy(&mut self) -> bool {
        match &mut self.slot {
            Slot::Idle => false,
            Slot::InFlight { queued, .. } => {
                if !*queued {
                    crate::debug!("update requested during animation, queued");
                }
                *queued = true;
                true
            }
        }
    }

    /// Cancel the in-flight animation, if any, and drop any queued follow-up.
    ///
    /// Returns the cancelled ticket. Completion reports for it will be
    /// [`Settle::Stale`].
    pub fn cancel_if_pending(&mut self) -> Option<AnimationTicket> {
        match std::mem::take(&mut self.slot) {
            Slot::Idle => None,
            Slot::InFlight {
                ticket, mut handle, ..
            } => {
                crate::debug!(%ticket, "cancelling in-flight animation");
                handle.cancel();
                Some(ticket)
            }
        }
    }

    /// Report that the animation identified by `ticket` ended.
    pub fn settle(&mut self, ticket: AnimationTicket) -> Settle {
        if self.current_ticket() != Some(ticket) {
            crate::debug!(%ticket, "ignoring stale animation completion");
            return Settle::Stale;
        }
        match std::mem::take(&mut self.slot) {
            Slot::InFlight { queued, .. } => Settle::Finished { replay: queued },
            Slot::Idle => Settle::Stale,
        }
    }

    /// Whether an animation is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.slot, Slot::InFlight { .. })
    }

    /// Whether a follow-up pass is queued behind the in-flight animation.
    #[must_use]
    pub fn is_queued(&self) -> bool {
        matches!(self.slot, Slot::InFlight { queued: true, .. })
    }

    /// Ticket of the in-flight animation.
    #[must_use]
    pub fn current_ticket(&self) -> Option<AnimationTicket> {
        match self.slot {
            Slot::Idle => None,
            Slot::InFlight { ticket, .. } => Some(ticket),
        }
    }

    /// Whether `ticket` identifies the in-flight animation.
    #[must_use]
    pub fn owns(&self, ticket: AnimationTicket) -> bool {
        self.current_ticket() == Some(ticket)
    }
}
