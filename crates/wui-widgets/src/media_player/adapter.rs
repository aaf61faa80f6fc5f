#![forbid(unsafe_code)]

//! Bridge between the player chrome and a media element.

use std::fmt::Debug;
use std::hash::Hash;

use wui_core::host::{MediaHost, Tree, UpdateAnimation};

use super::{MediaError, MediaPlayer};

/// Forwards transport requests to a media element.
///
/// Requests without an element are accepted and ignored. Capability queries
/// the chrome does not support yet return [`MediaError::Unimplemented`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaElementAdapter<N> {
    media: Option<N>,
    disposed: bool,
}

impl<N: Clone + Eq + Hash + Debug> MediaElementAdapter<N> {
    /// Create an adapter for `player`.
    ///
    /// Without an explicit element, the first `video` under the player's root
    /// is used, then the first `audio`.
    pub fn new<H, A>(
        host: &H,
        player: Option<&MediaPlayer<N, A>>,
        existing: Option<N>,
    ) -> Result<Self, MediaError>
    where
        H: Tree<Node = N>,
        A: UpdateAnimation,
    {
        let player = player.ok_or(MediaError::NullMediaPlayer)?;
        let media = existing.or_else(|| discover(host, player.element()));
        wui_core::debug!(found = media.is_some(), "media element adapter created");
        Ok(Self {
            media,
            disposed: false,
        })
    }

    /// Adapted element, if any.
    #[must_use]
    pub fn media_element(&self) -> Option<&N> {
        self.media.as_ref()
    }

    /// Whether [`dispose`](Self::dispose) ran.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn play<H: MediaHost<N>>(&self, host: &mut H) {
        if let Some(media) = &self.media {
            host.play(media);
        }
    }

    pub fn pause<H: MediaHost<N>>(&self, host: &mut H) {
        if let Some(media) = &self.media {
            host.pause(media);
        }
    }

    /// Seek to `seconds` from the start.
    pub fn seek<H: MediaHost<N>>(&self, host: &mut H, seconds: f64) {
        if let Some(media) = &self.media {
            host.set_current_time(media, seconds);
        }
    }

    pub fn next_track(&self) {}

    pub fn previous_track(&self) {}

    pub fn stop(&self) {}

    pub fn live_time(&self) -> Result<f64, MediaError> {
        Err(MediaError::Unimplemented("live_time"))
    }

    pub fn is_live(&self) -> Result<bool, MediaError> {
        Err(MediaError::Unimplemented("is_live"))
    }

    pub fn is_pause_allowed(&self) -> Result<bool, MediaError> {
        Err(MediaError::Unimplemented("is_pause_allowed"))
    }

    pub fn is_play_allowed(&self) -> Result<bool, MediaError> {
        Err(MediaError::Unimplemented("is_play_allowed"))
    }

    pub fn is_seek_allowed(&self) -> Result<bool, MediaError> {
        Err(MediaError::Unimplemented("is_seek_allowed"))
    }

    /// Unload the element's source and release it. Idempotent.
    pub fn dispose<H: MediaHost<N>>(&mut self, host: &mut H) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(media) = self.media.take() {
            host.clear_source(&media);
        }
    }
}

fn discover<H: Tree>(host: &H, root: &H::Node) -> Option<H::Node> {
    host.find_descendant(root, "video")
        .or_else(|| host.find_descendant(root, "audio"))
}
