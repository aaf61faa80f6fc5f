#![forbid(unsafe_code)]

//! wui public facade crate.
//!
//! Re-exports the host capability traits, the deterministic headless host,
//! and the widgets, plus a prelude for day-to-day use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use wui_core::coalescer::{AnimationCoalescer, Settle};
pub use wui_core::event::{InputEvent, KeyCode, KeyEvent, ListenerKind, Modifiers, PointerEvent};
pub use wui_core::geometry::{Point, Size};
pub use wui_core::headless::{HeadlessHost, NodeId, RecordedAnimation};
pub use wui_core::host::{
    AnimationDriver, AnimationOutcome, AnimationTicket, ListenerHost, ListenerId, MediaHost,
    TimerHost, TimerId, Tree, UpdateAnimation,
};

// --- Widget re-exports -----------------------------------------------------

pub use wui_widgets::{
    AnimatedList, AutoHideConfig, AutoHideSignal, AutoHideState, AutoHider, ListDiff,
    MediaCommand, MediaElementAdapter, MediaError, MediaPlayer, MediaPlayerConfig, PlayerHost,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for wui apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Media player or adapter failure.
    Media(MediaError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Media(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Media(err) => Some(err),
        }
    }
}

impl From<MediaError> for Error {
    fn from(err: MediaError) -> Self {
        Self::Media(err)
    }
}

/// Standard result type for wui APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnimatedList, AnimationOutcome, AutoHideConfig, AutoHideState, Error, HeadlessHost,
        InputEvent, MediaCommand, MediaPlayer, MediaPlayerConfig, NodeId, PointerEvent, Result,
        Tree,
    };

    pub use crate::{core, widgets};
}

pub use wui_core as core;
pub use wui_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn media_errors_convert() {
        fn construct_twice() -> Result<()> {
            let mut host = HeadlessHost::new();
            let player: MediaPlayer<NodeId, RecordedAnimation> =
                MediaPlayer::new(&mut host, None, MediaPlayerConfig::default())?;
            MediaPlayer::<NodeId, RecordedAnimation>::new(
                &mut host,
                Some(*player.element()),
                MediaPlayerConfig::default(),
            )?;
            Ok(())
        }

        let err = construct_twice().expect_err("second construction is refused");
        assert_eq!(err, Error::Media(MediaError::DuplicateConstruction));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), MediaError::DuplicateConstruction.to_string());
    }

    #[test]
    fn prelude_is_usable() {
        use crate::prelude::*;

        let mut host = HeadlessHost::new();
        let mut list: AnimatedList<NodeId, RecordedAnimation> = AnimatedList::new(&mut host, None);
        let item = host.create_element("li");
        list.set_items_immediate(&mut host, [item]);
        assert_eq!(list.items_in_dom(), &[item]);
    }
}
