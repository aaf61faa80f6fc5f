#![forbid(unsafe_code)]

//! Host capabilities consumed by widgets.
//!
//! A widget owns the subtree under its root node but never owns the tree
//! itself, the timer queue, or the animation engine. Those belong to the
//! embedding host and are passed into every widget call as `&mut H`, where
//! `H` implements the traits below.
//!
//! Asynchronous work is started through these traits and finished by the host
//! calling back into the widget:
//!
//! | Started by | Identified by | Finished by |
//! |---|---|---|
//! | [`UpdateAnimation::execute`] | [`AnimationTicket`] | `animation_settled(ticket, outcome)` |
//! | [`TimerHost::set_timer`] | [`TimerId`] | `timer_fired(id)` |
//! | [`ListenerHost::listen`] | [`ListenerId`] | `handle_input(event)` |
//!
//! A widget ignores tickets and ids it no longer tracks, so a completion the
//! host had already queued before a cancel is harmless.

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use crate::event::ListenerKind;
use crate::geometry::Size;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifies one execution of an animation handle.
///
/// Tickets are unique for the lifetime of the process, so a host can route a
/// completion to the right widget even when several widgets share one
/// animation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationTicket(pub u64);

impl fmt::Display for AnimationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

/// Handle to a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle to an installed event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// How an executed animation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The animation ran to completion.
    Completed,
    /// The animation engine rejected or aborted the animation.
    Failed(String),
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// A DOM-like node tree.
///
/// Nodes are opaque, identity-comparable handles. Structural operations mirror
/// the DOM: appending a node that already has a parent moves it.
pub trait Tree {
    /// Node handle. Equality is node identity.
    type Node: Clone + Eq + Hash + fmt::Debug;

    /// Create a detached element with the given tag name.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Insert `child` into `parent` immediately before `reference`.
    ///
    /// Falls back to appending when `reference` is not a child of `parent`.
    fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, reference: &Self::Node);

    /// Detach `node` from its parent. No-op for detached nodes.
    fn detach(&mut self, node: &Self::Node);

    /// Current parent of `node`, if attached.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Add a class to the node's class list.
    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Remove a class from the node's class list.
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Check whether the node carries a class.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Read an attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Write an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Remove an attribute. No-op when absent.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Current rendered box size of the node.
    fn measure(&self, node: &Self::Node) -> Size;

    /// Pin the node's width and height (`Some`) or release the pin (`None`).
    fn pin_size(&mut self, node: &Self::Node, size: Option<Size>);

    /// First descendant of `root` (depth first, document order) with `tag`.
    fn find_descendant(&self, root: &Self::Node, tag: &str) -> Option<Self::Node>;
}

// ---------------------------------------------------------------------------
// Timers and listeners
// ---------------------------------------------------------------------------

/// One-shot timers. Fires are delivered by the host to the widget that owns
/// the returned [`TimerId`].
pub trait TimerHost {
    /// Schedule a one-shot timer.
    fn set_timer(&mut self, duration: Duration) -> TimerId;

    /// Cancel a timer. Unknown or already-fired ids are ignored.
    fn clear_timer(&mut self, id: TimerId);
}

/// Input listener registration on nodes of type `N`.
pub trait ListenerHost<N> {
    /// Install a listener of `kind` on `target`.
    fn listen(&mut self, target: &N, kind: ListenerKind) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn unlisten(&mut self, id: ListenerId);
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// An animation created by an [`AnimationDriver`] that has not yet settled.
pub trait UpdateAnimation {
    /// Start executing. The host reports the end with `ticket`.
    fn execute(&mut self, ticket: AnimationTicket);

    /// Abort the animation. Must be safe before, during, or after execution.
    fn cancel(&mut self);
}

/// The host's animation engine.
pub trait AnimationDriver<N> {
    /// Handle type produced by this driver.
    type Animation: UpdateAnimation;

    /// Build a list-update animation.
    ///
    /// Called before the tree is mutated, so the driver may snapshot the
    /// positions of `affected` items and the sizes of `removed` items.
    fn create_update_animation(
        &mut self,
        added: &[N],
        removed: &[N],
        affected: &[N],
    ) -> Self::Animation;

    /// Build a show (`visible == true`) or hide animation for `target`.
    fn create_visibility_animation(&mut self, target: &N, visible: bool) -> Self::Animation;
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// Playback control for media element nodes.
pub trait MediaHost<N> {
    /// Begin or resume playback.
    fn play(&mut self, media: &N);

    /// Pause playback.
    fn pause(&mut self, media: &N);

    /// Seek to `seconds` from the start of the media.
    fn set_current_time(&mut self, media: &N, seconds: f64);

    /// Unload the media source.
    fn clear_source(&mut self, media: &N);
}
