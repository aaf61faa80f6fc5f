#![forbid(unsafe_code)]

//! Widgets: animated list, auto-hiding controls, and the media player shell.
//!
//! Every widget is host-driven. Methods that touch the outside world take the
//! host as `&mut H`, and completions (animation settled, timer fired, input
//! received) come back through explicit calls carrying the id the widget was
//! handed. Ids the widget no longer recognises are ignored.

pub mod animated_list;
pub mod auto_hide;
pub mod media_player;

pub use animated_list::{AnimatedList, ListDiff};
pub use auto_hide::{AutoHideConfig, AutoHideSignal, AutoHideState, AutoHider};
pub use media_player::{
    MediaCommand, MediaElementAdapter, MediaError, MediaPlayer, MediaPlayerConfig, PlayerHost,
};

/// Attribute naming the control instantiated on an element.
///
/// An element carrying it already hosts a control; constructing a second
/// media player on it is refused.
pub const CONTROL_ATTRIBUTE: &str = "data-wui-control";
