#![forbid(unsafe_code)]

//! Deterministic host for running widgets without a browser.
//!
//! [`HeadlessHost`] implements every trait in [`crate::host`]:
//!
//! - **Tree**: a [`MemoryTree`] with caller-assigned natural sizes.
//! - **Time**: [`DeterministicTimers`]; the clock moves only on
//!   [`advance`](HeadlessHost::advance).
//! - **Animation**: [`RecordedAnimation`] handles that never settle on their
//!   own. The embedding code (usually a test) reports completion.
//! - **Media**: per-node playback state.
//!
//! Every call is appended to a journal of [`HostOp`]s so the relative order
//! of measurement, animation creation, and tree mutation can be asserted.

mod animation;
mod timers;
mod tree;

pub use animation::{AnimationRequest, RecordedAnimation};
pub use timers::DeterministicTimers;
pub use tree::{MemoryTree, NodeId};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use crate::event::ListenerKind;
use crate::geometry::Size;
use crate::host::{
    AnimationDriver, AnimationTicket, ListenerHost, ListenerId, MediaHost, TimerHost, TimerId,
    Tree,
};

/// One recorded host call.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    /// `create_element`.
    Create { node: NodeId, tag: String },
    /// `append_child`.
    Append { parent: NodeId, child: NodeId },
    /// `insert_before`.
    InsertBefore {
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    },
    /// `detach`.
    Detach(NodeId),
    /// `add_class`.
    AddClass(NodeId, String),
    /// `remove_class`.
    RemoveClass(NodeId, String),
    /// `set_attribute`.
    SetAttribute(NodeId, String, String),
    /// `remove_attribute`.
    RemoveAttribute(NodeId, String),
    /// `measure`, with the size reported.
    Measure(NodeId, Size),
    /// `pin_size`.
    PinSize(NodeId, Option<Size>),
    /// `create_update_animation` / `create_visibility_animation`.
    CreateAnimation {
        index: usize,
        request: AnimationRequest,
    },
    /// [`UpdateAnimation::execute`](crate::host::UpdateAnimation::execute).
    ExecuteAnimation {
        index: usize,
        ticket: AnimationTicket,
    },
    /// [`UpdateAnimation::cancel`](crate::host::UpdateAnimation::cancel).
    CancelAnimation {
        index: usize,
        ticket: Option<AnimationTicket>,
    },
    /// `set_timer`.
    SetTimer(TimerId, Duration),
    /// `clear_timer`.
    ClearTimer(TimerId),
    /// `listen`.
    Listen {
        id: ListenerId,
        target: NodeId,
        kind: ListenerKind,
    },
    /// `unlisten`.
    Unlisten(ListenerId),
    /// `play`.
    Play(NodeId),
    /// `pause`.
    Pause(NodeId),
    /// `set_current_time`.
    Seek(NodeId, f64),
    /// `clear_source`.
    ClearSource(NodeId),
}

/// Playback state of a media node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MediaState {
    /// Whether playback is running.
    pub playing: bool,
    /// Playback position in seconds.
    pub current_time: f64,
    /// Whether a source is loaded.
    pub has_source: bool,
}

/// Deterministic implementation of every host capability.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    tree: MemoryTree,
    timers: DeterministicTimers,
    listeners: BTreeMap<ListenerId, (NodeId, ListenerKind)>,
    next_listener: u64,
    media: BTreeMap<NodeId, MediaState>,
    animations: Vec<AnimationRequest>,
    journal: Rc<RefCell<Vec<HostOp>>>,
}

impl HeadlessHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, op: HostOp) {
        self.journal.borrow_mut().push(op);
    }

    // --- tree helpers -------------------------------------------------------

    /// Read-only view of the node tree.
    #[must_use]
    pub fn tree(&self) -> &MemoryTree {
        &self.tree
    }

    /// Create a detached element with a natural size.
    pub fn create_sized(&mut self, tag: &str, size: Size) -> NodeId {
        let node = self.create_element(tag);
        self.tree.set_natural_size(node, size);
        node
    }

    /// Create a media element (`video` or `audio`) with a loaded source.
    pub fn create_media(&mut self, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.tree.set_attribute(&node, "src", "media://fixture");
        self.media.insert(
            node,
            MediaState {
                has_source: true,
                ..MediaState::default()
            },
        );
        node
    }

    /// Change the size a node reports when unpinned.
    pub fn set_natural_size(&mut self, node: NodeId, size: Size) {
        self.tree.set_natural_size(node, size);
    }

    /// Children of `node` in document order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.children(node).to_vec()
    }

    // --- time ---------------------------------------------------------------

    /// Advance the clock and return the timers that fired.
    ///
    /// The caller delivers each id to the widget that owns it.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        self.timers.advance(dt)
    }

    /// Read-only view of the timer queue.
    #[must_use]
    pub fn timers(&self) -> &DeterministicTimers {
        &self.timers
    }

    // --- listeners ----------------------------------------------------------

    /// Listeners currently installed on `target` for `kind`.
    #[must_use]
    pub fn listeners_on(&self, target: NodeId, kind: ListenerKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, (node, k))| *node == target && *k == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Total number of installed listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // --- animations ---------------------------------------------------------

    /// Every animation requested so far, in creation order.
    #[must_use]
    pub fn animation_requests(&self) -> &[AnimationRequest] {
        &self.animations
    }

    /// Tickets passed to `execute`, in order.
    #[must_use]
    pub fn executed_tickets(&self) -> Vec<AnimationTicket> {
        self.journal
            .borrow()
            .iter()
            .filter_map(|op| match op {
                HostOp::ExecuteAnimation { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .collect()
    }

    /// Ticket of the most recently executed animation.
    #[must_use]
    pub fn last_ticket(&self) -> Option<AnimationTicket> {
        self.executed_tickets().last().copied()
    }

    /// Tickets of executed animations that were later cancelled.
    #[must_use]
    pub fn cancelled_tickets(&self) -> Vec<AnimationTicket> {
        self.journal
            .borrow()
            .iter()
            .filter_map(|op| match op {
                HostOp::CancelAnimation { ticket, .. } => *ticket,
                _ => None,
            })
            .collect()
    }

    // --- media --------------------------------------------------------------

    /// Playback state of a media node.
    #[must_use]
    pub fn media_state(&self, node: NodeId) -> Option<MediaState> {
        self.media.get(&node).copied()
    }

    // --- journal ------------------------------------------------------------

    /// Snapshot of every recorded host call.
    #[must_use]
    pub fn journal(&self) -> Vec<HostOp> {
        self.journal.borrow().clone()
    }

    /// Discard the journal (tree, timers, and listeners are untouched).
    pub fn clear_journal(&mut self) {
        self.journal.borrow_mut().clear();
    }
}

impl Tree for HeadlessHost {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        let node = self.tree.create_element(tag);
        self.record(HostOp::Create {
            node,
            tag: tag.to_owned(),
        });
        node
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.record(HostOp::Append {
            parent: *parent,
            child: *child,
        });
        self.tree.append_child(parent, child);
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: &NodeId) {
        self.record(HostOp::InsertBefore {
            parent: *parent,
            child: *child,
            reference: *reference,
        });
        self.tree.insert_before(parent, child, reference);
    }

    fn detach(&mut self, node: &NodeId) {
        self.record(HostOp::Detach(*node));
        self.tree.detach(node);
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        self.record(HostOp::AddClass(*node, class.to_owned()));
        self.tree.add_class(node, class);
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.record(HostOp::RemoveClass(*node, class.to_owned()));
        self.tree.remove_class(node, class);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.tree.has_class(node, class)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.tree.attribute(node, name)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.record(HostOp::SetAttribute(
            *node,
            name.to_owned(),
            value.to_owned(),
        ));
        self.tree.set_attribute(node, name, value);
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        self.record(HostOp::RemoveAttribute(*node, name.to_owned()));
        self.tree.remove_attribute(node, name);
    }

    fn measure(&self, node: &NodeId) -> Size {
        let size = self.tree.measure(node);
        self.record(HostOp::Measure(*node, size));
        size
    }

    fn pin_size(&mut self, node: &NodeId, size: Option<Size>) {
        self.record(HostOp::PinSize(*node, size));
        self.tree.pin_size(node, size);
    }

    fn find_descendant(&self, root: &NodeId, tag: &str) -> Option<NodeId> {
        self.tree.find_descendant(root, tag)
    }
}

impl TimerHost for HeadlessHost {
    fn set_timer(&mut self, duration: Duration) -> TimerId {
        let id = self.timers.set_timer(duration);
        self.record(HostOp::SetTimer(id, duration));
        id
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.record(HostOp::ClearTimer(id));
        self.timers.clear_timer(id);
    }
}

impl ListenerHost<NodeId> for HeadlessHost {
    fn listen(&mut self, target: &NodeId, kind: ListenerKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, (*target, kind));
        self.record(HostOp::Listen {
            id,
            target: *target,
            kind,
        });
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.record(HostOp::Unlisten(id));
        self.listeners.remove(&id);
    }
}

impl AnimationDriver<NodeId> for HeadlessHost {
    type Animation = RecordedAnimation;

    fn create_update_animation(
        &mut self,
        added: &[NodeId],
        removed: &[NodeId],
        affected: &[NodeId],
    ) -> RecordedAnimation {
        let request = AnimationRequest::Update {
            added: added.to_vec(),
            removed: removed.to_vec(),
            affected: affected.to_vec(),
        };
        self.push_animation(request)
    }

    fn create_visibility_animation(&mut self, target: &NodeId, visible: bool) -> RecordedAnimation {
        self.push_animation(AnimationRequest::Visibility {
            target: *target,
            visible,
        })
    }
}

impl HeadlessHost {
    fn push_animation(&mut self, request: AnimationRequest) -> RecordedAnimation {
        let index = self.animations.len();
        self.animations.push(request.clone());
        self.record(HostOp::CreateAnimation { index, request });
        RecordedAnimation::new(index, Rc::clone(&self.journal))
    }
}

impl MediaHost<NodeId> for HeadlessHost {
    fn play(&mut self, media: &NodeId) {
        self.record(HostOp::Play(*media));
        if let Some(state) = self.media.get_mut(media) {
            state.playing = state.has_source;
        }
    }

    fn pause(&mut self, media: &NodeId) {
        self.record(HostOp::Pause(*media));
        if let Some(state) = self.media.get_mut(media) {
            state.playing = false;
        }
    }

    fn set_current_time(&mut self, media: &NodeId, seconds: f64) {
        self.record(HostOp::Seek(*media, seconds));
        if let Some(state) = self.media.get_mut(media) {
            state.current_time = seconds.max(0.0);
        }
    }

    fn clear_source(&mut self, media: &NodeId) {
        self.record(HostOp::ClearSource(*media));
        self.tree.remove_attribute(media, "src");
        if let Some(state) = self.media.get_mut(media) {
            *state = MediaState::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::UpdateAnimation;

    #[test]
    fn journal_records_tree_calls_in_order() {
        let mut host = HeadlessHost::new();
        let root = host.create_element("div");
        let child = host.create_sized("span", Size::new(4.0, 2.0));
        host.append_child(&root, &child);
        let size = host.measure(&child);
        host.detach(&child);

        assert_eq!(size, Size::new(4.0, 2.0));
        let ops = host.journal();
        assert_eq!(
            &ops[2..],
            &[
                HostOp::Append {
                    parent: root,
                    child
                },
                HostOp::Measure(child, Size::new(4.0, 2.0)),
                HostOp::Detach(child),
            ]
        );
    }

    #[test]
    fn animation_handles_write_to_shared_journal() {
        let mut host = HeadlessHost::new();
        let node = host.create_element("div");
        let mut anim = host.create_visibility_animation(&node, true);
        anim.execute(AnimationTicket(42));
        anim.cancel();
        anim.cancel();

        assert_eq!(host.executed_tickets(), vec![AnimationTicket(42)]);
        assert_eq!(host.cancelled_tickets(), vec![AnimationTicket(42)]);
        assert_eq!(host.last_ticket(), Some(AnimationTicket(42)));
        assert_eq!(
            host.animation_requests(),
            &[AnimationRequest::Visibility {
                target: node,
                visible: true
            }]
        );
    }

    #[test]
    fn cancel_before_execute_has_no_ticket() {
        let mut host = HeadlessHost::new();
        let mut anim = host.create_update_animation(&[], &[], &[]);
        anim.cancel();
        assert!(host.cancelled_tickets().is_empty());
        assert!(matches!(
            host.journal().last(),
            Some(HostOp::CancelAnimation { ticket: None, .. })
        ));
    }

    #[test]
    fn listeners_register_and_unregister() {
        let mut host = HeadlessHost::new();
        let root = host.create_element("div");
        let id = host.listen(&root, ListenerKind::KeyDown);
        assert_eq!(host.listeners_on(root, ListenerKind::KeyDown), vec![id]);
        assert!(host.listeners_on(root, ListenerKind::PointerMove).is_empty());
        host.unlisten(id);
        host.unlisten(id);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn media_playback_state() {
        let mut host = HeadlessHost::new();
        let video = host.create_media("video");
        host.play(&video);
        host.set_current_time(&video, 12.5);
        assert_eq!(
            host.media_state(video),
            Some(MediaState {
                playing: true,
                current_time: 12.5,
                has_source: true
            })
        );

        host.clear_source(&video);
        assert_eq!(host.tree().attribute(&video, "src"), None);
        host.play(&video);
        assert_eq!(host.media_state(video).map(|s| s.playing), Some(false));
    }

    #[test]
    fn timers_fire_through_host() {
        let mut host = HeadlessHost::new();
        let id = host.set_timer(Duration::from_millis(10));
        assert_eq!(host.advance(Duration::from_millis(10)), vec![id]);
        assert_eq!(host.timers().pending_count(), 0);
    }
}
