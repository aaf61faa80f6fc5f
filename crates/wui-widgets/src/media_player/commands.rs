#![forbid(unsafe_code)]

//! Built-in transport commands and their toolbar buttons.

use std::fmt;

use wui_core::host::Tree;

/// A built-in media player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaCommand {
    PlayFromBeginning,
    ChapterSkipBack,
    PreviousTrack,
    Stop,
    TimeSkipBack,
    Rewind,
    Cast,
    Zoom,
    AudioTracks,
    PlayPause,
    ClosedCaptions,
    Volume,
    FullScreen,
    TimeSkipForward,
    FastForward,
    PlaybackRate,
    NextTrack,
    ChapterSkipForward,
    GoToLive,
}

/// Static description of a command's button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Element id of the button.
    pub id: &'static str,
    /// Resource key for the button label.
    pub label_key: &'static str,
    /// Class identifying the button.
    pub class: &'static str,
    /// Icon name or glyph.
    pub icon: &'static str,
    /// Display priority; lower values are kept visible longer.
    pub priority: u8,
    /// Whether the button starts hidden.
    pub hidden: bool,
}

const fn descriptor(
    id: &'static str,
    label_key: &'static str,
    class: &'static str,
    icon: &'static str,
    priority: u8,
    hidden: bool,
) -> CommandDescriptor {
    CommandDescriptor {
        id,
        label_key,
        class,
        icon,
        priority,
        hidden,
    }
}

impl MediaCommand {
    /// Every built-in command, in catalogue order.
    pub const ALL: [MediaCommand; 19] = [
        Self::PlayFromBeginning,
        Self::ChapterSkipBack,
        Self::PreviousTrack,
        Self::Stop,
        Self::TimeSkipBack,
        Self::Rewind,
        Self::Cast,
        Self::Zoom,
        Self::AudioTracks,
        Self::PlayPause,
        Self::ClosedCaptions,
        Self::Volume,
        Self::FullScreen,
        Self::TimeSkipForward,
        Self::FastForward,
        Self::PlaybackRate,
        Self::NextTrack,
        Self::ChapterSkipForward,
        Self::GoToLive,
    ];

    /// Button description for this command.
    #[must_use]
    pub const fn descriptor(self) -> CommandDescriptor {
        match self {
            Self::PlayFromBeginning => descriptor(
                "wui-mediaplayer-playfrombeginning",
                "media_player.play_from_beginning",
                "wui-mediaplayer-playfrombeginningbutton",
                "refresh",
                19,
                true,
            ),
            Self::ChapterSkipBack => descriptor(
                "wui-mediaplayer-chapterskipback",
                "media_player.chapter_skip_back",
                "wui-mediaplayer-chapterskipbackbutton",
                "back",
                17,
                true,
            ),
            Self::PreviousTrack => descriptor(
                "wui-mediaplayer-previoustrack",
                "media_player.previous_track",
                "wui-mediaplayer-previoustrackbutton",
                "previous",
                15,
                true,
            ),
            Self::Stop => descriptor(
                "wui-mediaplayer-stop",
                "media_player.stop",
                "wui-mediaplayer-stopbutton",
                "stop",
                18,
                true,
            ),
            Self::TimeSkipBack => descriptor(
                "wui-mediaplayer-timeskipback",
                "media_player.time_skip_back",
                "wui-mediaplayer-timeskipbackbutton",
                "undo",
                11,
                true,
            ),
            Self::Rewind => descriptor(
                "wui-mediaplayer-rewind",
                "media_player.rewind",
                "wui-mediaplayer-rewindbutton",
                "previous",
                13,
                true,
            ),
            Self::Cast => descriptor(
                "wui-mediaplayer-playonremotedevice",
                "media_player.cast",
                "wui-mediaplayer-playonremotedevicebutton",
                "\u{EC15}",
                6,
                false,
            ),
            Self::Zoom => descriptor(
                "wui-mediaplayer-zoom",
                "media_player.zoom",
                "wui-mediaplayer-zoombutton",
                "\u{E799}",
                7,
                false,
            ),
            Self::AudioTracks => descriptor(
                "wui-mediaplayer-audiotracks",
                "media_player.audio_tracks",
                "wui-mediaplayer-audiotracksbutton",
                "\u{E8C1}",
                8,
                true,
            ),
            Self::PlayPause => descriptor(
                "wui-mediaplayer-playpause",
                "media_player.play",
                "wui-mediaplayer-playpausebutton",
                "play",
                1,
                false,
            ),
            Self::ClosedCaptions => descriptor(
                "wui-mediaplayer-closedcaptions",
                "media_player.closed_captions",
                "wui-mediaplayer-closedcaptionsbutton",
                "\u{E7F0}",
                4,
                true,
            ),
            Self::Volume => descriptor(
                "wui-mediaplayer-volume",
                "media_player.volume",
                "wui-mediaplayer-volumebutton",
                "volume",
                3,
                false,
            ),
            Self::FullScreen => descriptor(
                "wui-mediaplayer-fullscreen",
                "media_player.fullscreen",
                "wui-mediaplayer-fullscreenbutton",
                "fullscreen",
                5,
                false,
            ),
            Self::TimeSkipForward => descriptor(
                "wui-mediaplayer-timeskipforward",
                "media_player.time_skip_forward",
                "wui-mediaplayer-timeskipforwardbutton",
                "redo",
                10,
                true,
            ),
            Self::FastForward => descriptor(
                "wui-mediaplayer-fastforward",
                "media_player.fast_forward",
                "wui-mediaplayer-fastforwardbutton",
                "next",
                12,
                true,
            ),
            Self::PlaybackRate => descriptor(
                "wui-mediaplayer-playbackrate",
                "media_player.playback_rate",
                "wui-mediaplayer-playbackratebutton",
                "\u{EC57}",
                9,
                true,
            ),
            Self::NextTrack => descriptor(
                "wui-mediaplayer-nexttrack",
                "media_player.next_track",
                "wui-mediaplayer-nexttrackbutton",
                "next",
                14,
                true,
            ),
            Self::ChapterSkipForward => descriptor(
                "wui-mediaplayer-chapterskipforward",
                "media_player.chapter_skip_forward",
                "wui-mediaplayer-chapterskipforwardbutton",
                "forward",
                16,
                true,
            ),
            Self::GoToLive => descriptor(
                "wui-mediaplayer-live",
                "media_player.live",
                "wui-mediaplayer-livebutton",
                "gotostart",
                20,
                true,
            ),
        }
    }

    /// Display priority.
    #[must_use]
    pub const fn priority(self) -> u8 {
        self.descriptor().priority
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().id)
    }
}

#[derive(Debug)]
struct CommandButton<N> {
    command: MediaCommand,
    node: N,
    hidden: bool,
}

/// The player's command buttons and their hidden flags.
#[derive(Debug)]
pub(crate) struct CommandSet<N> {
    buttons: Vec<CommandButton<N>>,
}

impl<N: Clone> CommandSet<N> {
    /// Create one button element per built-in command.
    pub(crate) fn build<H>(host: &mut H) -> Self
    where
        H: Tree<Node = N>,
    {
        let buttons = MediaCommand::ALL
            .iter()
            .map(|&command| {
                let desc = command.descriptor();
                let node = host.create_element("button");
                host.add_class(&node, desc.class);
                host.set_attribute(&node, "id", desc.id);
                host.set_attribute(&node, "data-label-key", desc.label_key);
                host.set_attribute(&node, "data-icon", desc.icon);
                CommandButton {
                    command,
                    node,
                    hidden: desc.hidden,
                }
            })
            .collect();
        Self { buttons }
    }

    /// Visible commands, most important first.
    pub(crate) fn visible(&self) -> Vec<MediaCommand> {
        let mut visible: Vec<_> = self
            .buttons
            .iter()
            .filter(|b| !b.hidden)
            .map(|b| b.command)
            .collect();
        visible.sort_by_key(|c| c.priority());
        visible
    }

    /// Button nodes of the visible commands, most important first.
    pub(crate) fn visible_nodes(&self) -> Vec<N> {
        self.visible()
            .into_iter()
            .filter_map(|c| self.node(c).cloned())
            .collect()
    }

    pub(crate) fn node(&self, command: MediaCommand) -> Option<&N> {
        self.find(command).map(|b| &b.node)
    }

    pub(crate) fn is_hidden(&self, command: MediaCommand) -> bool {
        self.find(command).is_none_or(|b| b.hidden)
    }

    /// Returns `true` when the flag changed.
    pub(crate) fn set_hidden(&mut self, command: MediaCommand, hidden: bool) -> bool {
        match self.buttons.iter_mut().find(|b| b.command == command) {
            Some(button) if button.hidden != hidden => {
                button.hidden = hidden;
                true
            }
            _ => false,
        }
    }

    fn find(&self, command: MediaCommand) -> Option<&CommandButton<N>> {
        self.buttons.iter().find(|b| b.command == command)
    }
}
