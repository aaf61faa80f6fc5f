#![forbid(unsafe_code)]

use std::fmt;

/// Errors raised by the media player and its element adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// An adapter was constructed without a media player.
    NullMediaPlayer,
    /// The root element already hosts a control.
    DuplicateConstruction,
    /// The named adapter query is not implemented.
    Unimplemented(&'static str),
}

impl MediaError {
    /// Stable identifier for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NullMediaPlayer => "media_element_adapter.null_parameter",
            Self::DuplicateConstruction => "media_player.duplicate_construction",
            Self::Unimplemented(_) => "media_element_adapter.unimplemented",
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullMediaPlayer => write!(f, "invalid argument: a media player is required"),
            Self::DuplicateConstruction => write!(
                f,
                "invalid argument: controls may only be instantiated once per element"
            ),
            Self::Unimplemented(what) => write!(f, "{what} is not implemented"),
        }
    }
}

impl std::error::Error for MediaError {}
