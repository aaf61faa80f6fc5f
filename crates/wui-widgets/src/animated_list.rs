#![forbid(unsafe_code)]

//! Animated list: reconciles a requested child sequence into the tree.
//!
//! [`AnimatedList`] keeps two sequences:
//!
//! - **requested** ([`items`](AnimatedList::items)): the latest sequence the
//!   owner asked for, replaced wholesale by every [`set_items`](AnimatedList::set_items).
//! - **rendered** ([`items_in_dom`](AnimatedList::items_in_dom)): what the
//!   tree reflects. It changes only when an update pass mutates the tree.
//!
//! # Update pass
//!
//! 1. Diff rendered against requested into `added`, `removed`, `affected`.
//! 2. Measure every removed item while it is still in layout flow.
//! 3. Create the update animation (the host may snapshot positions here).
//! 4. Detach rendered items, append requested items in order, then re-append
//!    removed items marked `removing` and pinned to their measured size.
//! 5. Commit rendered := requested.
//! 6. Execute the animation. When it settles, removed items are unpinned,
//!    unmarked and detached, and a queued pass runs if one was requested.
//!
//! # Invariants
//!
//! 1. At most one update animation is in flight.
//! 2. Requests during an animation are coalesced; only the latest requested
//!    sequence is rendered by the follow-up pass.
//! 3. Rendered state is committed when the tree is mutated, not when the
//!    animation settles.
//! 4. After the last animation settles, the root's children are exactly the
//!    rendered sequence, in order.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use wui_core::coalescer::{AnimationCoalescer, Settle};
use wui_core::host::{AnimationDriver, AnimationOutcome, AnimationTicket, Tree, UpdateAnimation};

use crate::CONTROL_ATTRIBUTE;

/// Class names applied by the animated list.
pub mod class_names {
    /// Root element.
    pub const ANIMATED_LIST: &str = "wui-animatedlist";
    /// Item animating out of the list.
    pub const REMOVING: &str = "wui-animatedlist-removing";
}

/// Set difference between two item sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDiff<N> {
    /// Items in `next` but not in `prev`, in `next` order.
    pub added: Vec<N>,
    /// Items in `prev` but not in `next`, in `prev` order.
    pub removed: Vec<N>,
    /// Items in both, in `prev` order.
    pub affected: Vec<N>,
}

impl<N: Clone + Eq + Hash> ListDiff<N> {
    /// Diff `prev` against `next` by identity.
    #[must_use]
    pub fn compute(prev: &[N], next: &[N]) -> Self {
        let prev_set: HashSet<&N> = prev.iter().collect();
        let next_set: HashSet<&N> = next.iter().collect();

        let added = next
            .iter()
            .filter(|n| !prev_set.contains(n))
            .cloned()
            .collect();
        let (affected, removed) = prev
            .iter()
            .cloned()
            .partition(|n| next_set.contains(n));

        Self {
            added,
            removed,
            affected,
        }
    }

    /// True when membership is unchanged.
    #[must_use]
    pub fn is_membership_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// A list container that animates membership changes.
#[derive(Debug)]
pub struct AnimatedList<N, A> {
    root: N,
    requested: Vec<N>,
    rendered: Vec<N>,
    /// Removed items still in the tree under the in-flight animation.
    removing: Vec<N>,
    animation: AnimationCoalescer<A>,
}

impl<N, A> AnimatedList<N, A>
where
    N: Clone + Eq + Hash + Debug,
    A: UpdateAnimation,
{
    /// Create a list on `root`, or on a new `div` when `root` is `None`.
    pub fn new<H>(host: &mut H, root: Option<N>) -> Self
    where
        H: Tree<Node = N>,
    {
        let root = root.unwrap_or_else(|| host.create_element("div"));
        host.add_class(&root, class_names::ANIMATED_LIST);
        host.set_attribute(&root, CONTROL_ATTRIBUTE, "AnimatedList");
        Self {
            root,
            requested: Vec::new(),
            rendered: Vec::new(),
            removing: Vec::new(),
            animation: AnimationCoalescer::new(),
        }
    }

    /// Root node.
    #[must_use]
    pub fn element(&self) -> &N {
        &self.root
    }

    /// The most recently requested children.
    #[must_use]
    pub fn items(&self) -> &[N] {
        &self.requested
    }

    /// The children the tree currently reflects.
    #[must_use]
    pub fn items_in_dom(&self) -> &[N] {
        &self.rendered
    }

    /// Whether an update animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_busy()
    }

    /// Whether a follow-up pass is queued behind the in-flight animation.
    #[must_use]
    pub fn has_queued_update(&self) -> bool {
        self.animation.is_queued()
    }

    /// Items currently animating out.
    #[must_use]
    pub fn removing(&self) -> &[N] {
        &self.removing
    }

    /// Whether `ticket` belongs to this list's in-flight animation.
    #[must_use]
    pub fn owns_ticket(&self, ticket: AnimationTicket) -> bool {
        self.animation.owns(ticket)
    }

    /// Request a new child sequence, animating the change.
    ///
    /// While an animation is in flight this only records the request; the
    /// latest request is rendered once the animation settles.
    pub fn set_items<H>(&mut self, host: &mut H, items: impl IntoIterator<Item = N>)
    where
        H: Tree<Node = N> + AnimationDriver<N, Animation = A>,
    {
        self.requested = items.into_iter().collect();
        self.update_dom(host);
    }

    /// Render a child sequence immediately, without animation.
    ///
    /// Cancels any in-flight animation and drops a queued pass. Items that
    /// were animating out are cleaned up before the new sequence is applied.
    pub fn set_items_immediate<H>(&mut self, host: &mut H, items: impl IntoIterator<Item = N>)
    where
        H: Tree<Node = N>,
    {
        self.requested = items.into_iter().collect();
        self.animation.cancel_if_pending();
        self.finish_removals(host);

        for item in &self.rendered {
            host.detach(item);
        }
        for item in &self.requested {
            host.append_child(&self.root, item);
        }
        self.rendered = self.requested.clone();
        wui_core::trace!(count = self.rendered.len(), "animated list rendered immediately");
    }

    /// Append `node` to the rendered children without animation.
    ///
    /// A node that is already rendered moves to the end.
    pub fn append_child<H>(&mut self, host: &mut H, node: N)
    where
        H: Tree<Node = N>,
    {
        self.remove_child(host, &node);
        if let Some(index) = self.removing.iter().position(|n| *n == node) {
            let reclaimed = self.removing.remove(index);
            strip_removing(host, &reclaimed);
        }
        host.append_child(&self.root, &node);
        self.rendered.push(node);
    }

    /// Remove `node` from the rendered children without animation.
    ///
    /// Returns `false` (and does nothing) when `node` is not rendered.
    pub fn remove_child<H>(&mut self, host: &mut H, node: &N) -> bool
    where
        H: Tree<Node = N>,
    {
        let Some(index) = self.rendered.iter().position(|n| n == node) else {
            return false;
        };
        self.rendered.remove(index);
        host.detach(node);
        true
    }

    /// Report that an animation ended.
    ///
    /// Returns `false` when `ticket` is not this list's in-flight animation
    /// (already cancelled, superseded, or owned by someone else).
    pub fn animation_settled<H>(
        &mut self,
        host: &mut H,
        ticket: AnimationTicket,
        outcome: AnimationOutcome,
    ) -> bool
    where
        H: Tree<Node = N> + AnimationDriver<N, Animation = A>,
    {
        let Settle::Finished { replay } = self.animation.settle(ticket) else {
            return false;
        };
        if matches!(outcome, AnimationOutcome::Failed(_)) {
            wui_core::warn!(%ticket, ?outcome, "list update animation failed, abandoning it");
        }
        self.finish_removals(host);
        if replay {
            self.update_dom(host);
        }
        true
    }

    fn update_dom<H>(&mut self, host: &mut H)
    where
        H: Tree<Node = N> + AnimationDriver<N, Animation = A>,
    {
        if self.animation.request_if_busy() {
            return;
        }

        let span = wui_core::debug_span!("animated_list.update", items = self.requested.len());
        let _guard = span.enter();

        let next = self.requested.clone();
        let diff = ListDiff::compute(&self.rendered, &next);
        wui_core::trace!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            affected = diff.affected.len(),
            "reconciling animated list"
        );

        let removed_sizes: Vec<_> = diff.removed.iter().map(|n| host.measure(n)).collect();
        let animation = host.create_update_animation(&diff.added, &diff.removed, &diff.affected);

        for item in &self.rendered {
            host.detach(item);
        }
        for item in &next {
            host.append_child(&self.root, item);
        }
        for (item, size) in diff.removed.iter().zip(removed_sizes) {
            host.add_class(item, class_names::REMOVING);
            host.pin_size(item, Some(size));
            host.append_child(&self.root, item);
        }

        self.rendered = next;
        self.removing = diff.removed;
        self.animation.begin(animation);
    }

    fn finish_removals<H>(&mut self, host: &mut H)
    where
        H: Tree<Node = N>,
    {
        for item in std::mem::take(&mut self.removing) {
            strip_removing(host, &item);
            host.detach(&item);
        }
    }
}

fn strip_removing<H: Tree>(host: &mut H, node: &H::Node) {
    host.remove_class(node, class_names::REMOVING);
    host.pin_size(node, None);
}
