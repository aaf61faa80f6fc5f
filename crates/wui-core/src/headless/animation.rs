#![forbid(unsafe_code)]

//! Recording animation engine.
//!
//! Animations do nothing visually. Creation, execution, and cancellation are
//! appended to the host journal so tests can assert on ordering, and the test
//! decides when (and how) each executed animation settles.

use std::cell::RefCell;
use std::rc::Rc;

use super::{HostOp, NodeId};
use crate::host::{AnimationTicket, UpdateAnimation};

pub(crate) type Journal = Rc<RefCell<Vec<HostOp>>>;

/// Handle produced by the headless animation engine.
#[derive(Debug)]
pub struct RecordedAnimation {
    index: usize,
    ticket: Option<AnimationTicket>,
    cancelled: bool,
    journal: Journal,
}

impl RecordedAnimation {
    pub(crate) fn new(index: usize, journal: Journal) -> Self {
        Self {
            index,
            ticket: None,
            cancelled: false,
            journal,
        }
    }

    /// Creation index of this animation within its host.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl UpdateAnimation for RecordedAnimation {
    fn execute(&mut self, ticket: AnimationTicket) {
        self.ticket = Some(ticket);
        self.journal.borrow_mut().push(HostOp::ExecuteAnimation {
            index: self.index,
            ticket,
        });
    }

    fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.journal.borrow_mut().push(HostOp::CancelAnimation {
            index: self.index,
            ticket: self.ticket,
        });
    }
}

/// What an animation was created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationRequest {
    /// A list update.
    Update {
        /// Items entering the list.
        added: Vec<NodeId>,
        /// Items leaving the list.
        removed: Vec<NodeId>,
        /// Items that stay and may move.
        affected: Vec<NodeId>,
    },
    /// A show or hide transition.
    Visibility {
        /// Animated node.
        target: NodeId,
        /// `true` for show.
        visible: bool,
    },
}
