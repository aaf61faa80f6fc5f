#![forbid(unsafe_code)]

//! Media player chrome: transport controls around a media element.
//!
//! The player builds this structure under its root:
//!
//! ```text
//! root.wui-mediaplayer
//! └── content
//!     └── container
//!         ├── <media element>.wui-mediaplayer-video   (inserted on render)
//!         └── controls
//!             └── transport controls
//!                 ├── timeline
//!                 └── toolbar (AnimatedList of command buttons)
//! ```
//!
//! Control visibility is driven by an [`AutoHider`]: activity on the root shows
//! the controls, idleness hides them. Each transition runs a visibility
//! animation through an [`AnimationCoalescer`], so a show and a hide never
//! overlap. Command buttons live in an [`AnimatedList`]; hiding or revealing a
//! command animates the toolbar.

mod adapter;
mod commands;
mod error;

use std::env;
use std::fmt::Debug;
use std::hash::Hash;

use wui_core::coalescer::{AnimationCoalescer, Settle};
use wui_core::event::InputEvent;
use wui_core::host::{
    AnimationDriver, AnimationOutcome, AnimationTicket, ListenerHost, MediaHost, TimerHost,
    TimerId, Tree, UpdateAnimation,
};

use crate::CONTROL_ATTRIBUTE;
use crate::animated_list::AnimatedList;
use crate::auto_hide::{AutoHideConfig, AutoHideSignal, AutoHideState, AutoHider};

pub use adapter::MediaElementAdapter;
pub use commands::{CommandDescriptor, MediaCommand};
pub use error::MediaError;

use commands::CommandSet;

/// Class names applied by the media player.
pub mod class_names {
    pub const MEDIA_PLAYER: &str = "wui-mediaplayer";
    pub const DISPOSABLE: &str = "wui-disposable";
    pub const DOUBLE_ROW: &str = "wui-mediaplayer-doublerow";
    pub const CONTENT: &str = "wui-mediaplayer-content";
    pub const CONTAINER: &str = "wui-mediaplayer-container";
    pub const CONTROLS: &str = "wui-mediaplayer-controls";
    pub const CONTROLS_HIDDEN: &str = "wui-mediaplayer-controls-hidden";
    pub const TRANSPORT_CONTROLS: &str = "wui-mediaplayer-transportcontrols";
    pub const TIMELINE: &str = "wui-mediaplayer-timeline";
    pub const TOOLBAR: &str = "wui-mediaplayer-toolbar";
    pub const COMMANDS: &str = "wui-mediaplayer-commands";
    pub const VIDEO: &str = "wui-mediaplayer-video";
}

/// Environment variable selecting the single-row layout when set to `0`/`false`.
pub const ENV_DOUBLE_ROW: &str = "WUI_MEDIAPLAYER_DOUBLE_ROW";

/// Everything a host must provide to run a [`MediaPlayer`].
pub trait PlayerHost<N, A>:
    Tree<Node = N> + TimerHost + ListenerHost<N> + AnimationDriver<N, Animation = A> + MediaHost<N>
{
}

impl<N, A, T> PlayerHost<N, A> for T where
    T: Tree<Node = N>
        + TimerHost
        + ListenerHost<N>
        + AnimationDriver<N, Animation = A>
        + MediaHost<N>
        + ?Sized
{
}

/// Configuration for [`MediaPlayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPlayerConfig {
    /// Control auto-hide behaviour.
    pub auto_hide: AutoHideConfig,
    /// Lay the timeline and the toolbar out on separate rows.
    pub double_row: bool,
}

impl Default for MediaPlayerConfig {
    fn default() -> Self {
        Self {
            auto_hide: AutoHideConfig::default(),
            double_row: true,
        }
    }
}

impl MediaPlayerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn auto_hide(mut self, auto_hide: AutoHideConfig) -> Self {
        self.auto_hide = auto_hide;
        self
    }

    #[must_use]
    pub fn double_row(mut self, double_row: bool) -> Self {
        self.double_row = double_row;
        self
    }

    /// Read overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Read overrides through a custom lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            auto_hide: AutoHideConfig::from_env_with(&get_env),
            ..Self::default()
        };
        if let Some(value) = get_env(ENV_DOUBLE_ROW) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.double_row = true,
                "0" | "false" | "no" | "off" => config.double_row = false,
                _ => {
                    wui_core::warn!(%value, "ignoring invalid {}", ENV_DOUBLE_ROW);
                }
            }
        }
        config
    }
}

#[derive(Debug, Clone)]
struct PlayerDom<N> {
    root: N,
    content: N,
    container: N,
    controls: N,
    timeline: N,
}

/// Transport chrome around a media element.
#[derive(Debug)]
pub struct MediaPlayer<N, A> {
    dom: PlayerDom<N>,
    config: MediaPlayerConfig,
    commands: CommandSet<N>,
    toolbar: AnimatedList<N, A>,
    adapter: Option<MediaElementAdapter<N>>,
    rendered_media: Option<N>,
    auto_hider: AutoHider<N>,
    controls_animation: AnimationCoalescer<A>,
    /// Visibility the controls should end up in.
    controls_target: bool,
    /// Visibility the in-flight controls animation moves to.
    animating_to: Option<bool>,
    disposed: bool,
}

impl<N, A> MediaPlayer<N, A>
where
    N: Clone + Eq + Hash + Debug,
    A: UpdateAnimation,
{
    /// Build the player on `root`, or on a new `div` when `root` is `None`.
    ///
    /// Fails with [`MediaError::DuplicateConstruction`] when `root` already
    /// hosts a control. A `video` (or else `audio`) element found under the
    /// root becomes the adapted media element.
    pub fn new<H>(
        host: &mut H,
        root: Option<N>,
        config: MediaPlayerConfig,
    ) -> Result<Self, MediaError>
    where
        H: PlayerHost<N, A>,
    {
        if let Some(root) = &root {
            if host.attribute(root, CONTROL_ATTRIBUTE).is_some() {
                return Err(MediaError::DuplicateConstruction);
            }
        }

        let span = wui_core::debug_span!("media_player.new");
        let _guard = span.enter();

        let root = root.unwrap_or_else(|| host.create_element("div"));
        let (dom, toolbar_node) = build_dom(host, root, config.double_row);

        let commands = CommandSet::build(host);
        let mut toolbar = AnimatedList::new(host, Some(toolbar_node));
        toolbar.set_items_immediate(host, commands.visible_nodes());

        let auto_hider = AutoHider::new(host, dom.root.clone(), config.auto_hide.clone());

        let mut player = Self {
            dom,
            config,
            commands,
            toolbar,
            adapter: None,
            rendered_media: None,
            auto_hider,
            controls_animation: AnimationCoalescer::new(),
            controls_target: false,
            animating_to: None,
            disposed: false,
        };

        let adapter = MediaElementAdapter::new(&*host, Some(&player), None)?;
        player.adapter = Some(adapter);
        player.update_dom(host);
        Ok(player)
    }

    /// Root node.
    #[must_use]
    pub fn element(&self) -> &N {
        &self.dom.root
    }

    /// Node wrapping the player content.
    #[must_use]
    pub fn content_element(&self) -> &N {
        &self.dom.content
    }

    /// Node that holds the media element and the controls.
    #[must_use]
    pub fn container_element(&self) -> &N {
        &self.dom.container
    }

    /// Node that shows and hides.
    #[must_use]
    pub fn controls_element(&self) -> &N {
        &self.dom.controls
    }

    #[must_use]
    pub fn timeline_element(&self) -> &N {
        &self.dom.timeline
    }

    #[must_use]
    pub fn config(&self) -> &MediaPlayerConfig {
        &self.config
    }

    /// Toolbar holding the visible command buttons.
    #[must_use]
    pub fn toolbar(&self) -> &AnimatedList<N, A> {
        &self.toolbar
    }

    #[must_use]
    pub fn media_element_adapter(&self) -> Option<&MediaElementAdapter<N>> {
        self.adapter.as_ref()
    }

    /// Media element currently placed in the player.
    #[must_use]
    pub fn media_element(&self) -> Option<&N> {
        self.rendered_media.as_ref()
    }

    /// Replace the media element adapter and re-render. Returns the previous
    /// adapter, which is left undisposed.
    pub fn set_media_element_adapter<H>(
        &mut self,
        host: &mut H,
        adapter: MediaElementAdapter<N>,
    ) -> Option<MediaElementAdapter<N>>
    where
        H: PlayerHost<N, A>,
    {
        let previous = self.adapter.replace(adapter);
        self.update_dom(host);
        previous
    }

    pub fn play<H: PlayerHost<N, A>>(&self, host: &mut H) {
        if let Some(adapter) = &self.adapter {
            adapter.play(host);
        }
    }

    pub fn pause<H: PlayerHost<N, A>>(&self, host: &mut H) {
        if let Some(adapter) = &self.adapter {
            adapter.pause(host);
        }
    }

    pub fn seek<H: PlayerHost<N, A>>(&self, host: &mut H, seconds: f64) {
        if let Some(adapter) = &self.adapter {
            adapter.seek(host, seconds);
        }
    }

    // --- commands -----------------------------------------------------------

    /// Visible commands, most important first.
    #[must_use]
    pub fn visible_commands(&self) -> Vec<MediaCommand> {
        self.commands.visible()
    }

    #[must_use]
    pub fn is_command_hidden(&self, command: MediaCommand) -> bool {
        self.commands.is_hidden(command)
    }

    /// Button node of `command`.
    #[must_use]
    pub fn command_element(&self, command: MediaCommand) -> Option<&N> {
        self.commands.node(command)
    }

    /// Hide or reveal a command, animating the toolbar.
    pub fn set_command_hidden<H>(&mut self, host: &mut H, command: MediaCommand, hidden: bool)
    where
        H: PlayerHost<N, A>,
    {
        if self.disposed || !self.commands.set_hidden(command, hidden) {
            return;
        }
        wui_core::debug!(%command, hidden, "command visibility changed");
        self.toolbar.set_items(host, self.commands.visible_nodes());
    }

    // --- controls visibility ------------------------------------------------

    /// Auto-hide state of the controls.
    #[must_use]
    pub fn controls_state(&self) -> AutoHideState {
        self.auto_hider.state()
    }

    /// Whether the controls are shown or on their way to being shown.
    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.controls_target
    }

    /// Feed an input event received on the root.
    pub fn handle_input<H>(&mut self, host: &mut H, event: &InputEvent)
    where
        H: PlayerHost<N, A>,
    {
        if self.disposed {
            return;
        }
        let signal = self.auto_hider.handle_input(host, event);
        self.apply_signal(host, signal);
    }

    /// Report a fired timer.
    pub fn timer_fired<H>(&mut self, host: &mut H, id: TimerId)
    where
        H: PlayerHost<N, A>,
    {
        if self.disposed {
            return;
        }
        let signal = self.auto_hider.timer_fired(host, id);
        self.apply_signal(host, signal);
    }

    /// Report that an animation ended. Returns `false` when the ticket is not
    /// one of this player's in-flight animations.
    pub fn animation_settled<H>(
        &mut self,
        host: &mut H,
        ticket: AnimationTicket,
        outcome: AnimationOutcome,
    ) -> bool
    where
        H: PlayerHost<N, A>,
    {
        if self.toolbar.owns_ticket(ticket) {
            return self.toolbar.animation_settled(host, ticket, outcome);
        }

        let Settle::Finished { replay } = self.controls_animation.settle(ticket) else {
            return false;
        };
        if matches!(outcome, AnimationOutcome::Failed(_)) {
            wui_core::warn!(%ticket, ?outcome, "controls animation failed, abandoning it");
        }

        let reached = self.animating_to.take().unwrap_or(self.controls_target);
        if !reached {
            host.add_class(&self.dom.controls, class_names::CONTROLS_HIDDEN);
        }
        if replay && reached != self.controls_target {
            self.start_controls_animation(host, self.controls_target);
        } else if reached {
            self.auto_hider.shown(host);
        } else {
            self.auto_hider.hidden(host);
        }
        true
    }

    /// Show or hide the controls at once, cancelling any running transition.
    pub fn set_controls_visible_immediate<H>(&mut self, host: &mut H, visible: bool)
    where
        H: PlayerHost<N, A>,
    {
        if self.disposed {
            return;
        }
        self.controls_animation.cancel_if_pending();
        self.animating_to = None;
        self.controls_target = visible;
        if visible {
            host.remove_class(&self.dom.controls, class_names::CONTROLS_HIDDEN);
            self.auto_hider.shown(host);
        } else {
            host.add_class(&self.dom.controls, class_names::CONTROLS_HIDDEN);
            self.auto_hider.hidden(host);
        }
    }

    fn apply_signal<H>(&mut self, host: &mut H, signal: Option<AutoHideSignal>)
    where
        H: PlayerHost<N, A>,
    {
        let visible = match signal {
            Some(AutoHideSignal::Show) => true,
            Some(AutoHideSignal::Hide) => false,
            None => return,
        };
        self.controls_target = visible;
        if self.controls_animation.request_if_busy() {
            return;
        }
        self.start_controls_animation(host, visible);
    }

    fn start_controls_animation<H>(&mut self, host: &mut H, visible: bool)
    where
        H: PlayerHost<N, A>,
    {
        if visible {
            host.remove_class(&self.dom.controls, class_names::CONTROLS_HIDDEN);
        }
        let animation = host.create_visibility_animation(&self.dom.controls, visible);
        self.animating_to = Some(visible);
        self.controls_animation.begin(animation);
    }

    // --- lifecycle ----------------------------------------------------------

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Tear the player down. Idempotent.
    pub fn dispose<H>(&mut self, host: &mut H)
    where
        H: PlayerHost<N, A>,
    {
        if self.disposed {
            return;
        }
        self.disposed = true;
        wui_core::debug!("disposing media player");

        self.controls_animation.cancel_if_pending();
        self.animating_to = None;
        let items = self.toolbar.items().to_vec();
        self.toolbar.set_items_immediate(host, items);
        self.auto_hider.dispose(host);
        if let Some(adapter) = &mut self.adapter {
            adapter.dispose(host);
        }
    }

    fn update_dom<H>(&mut self, host: &mut H)
    where
        H: PlayerHost<N, A>,
    {
        let media = self
            .adapter
            .as_ref()
            .and_then(|adapter| adapter.media_element().cloned());
        if media == self.rendered_media {
            return;
        }
        if let Some(old) = &self.rendered_media {
            host.remove_class(old, class_names::VIDEO);
        }
        if let Some(new) = &media {
            host.add_class(new, class_names::VIDEO);
            host.insert_before(&self.dom.container, new, &self.dom.controls);
        }
        wui_core::debug!(?media, "media element rendered");
        self.rendered_media = media;
    }
}

/// Returns the chrome and the (still empty) toolbar node.
fn build_dom<H: Tree>(
    host: &mut H,
    root: H::Node,
    double_row: bool,
) -> (PlayerDom<H::Node>, H::Node) {
    host.set_attribute(&root, CONTROL_ATTRIBUTE, "MediaPlayer");
    host.add_class(&root, class_names::MEDIA_PLAYER);
    host.add_class(&root, class_names::DISPOSABLE);
    if double_row {
        host.add_class(&root, class_names::DOUBLE_ROW);
    }

    let element = |host: &mut H, class: &str| {
        let node = host.create_element("div");
        host.add_class(&node, class);
        node
    };
    let content = element(host, class_names::CONTENT);
    let container = element(host, class_names::CONTAINER);
    let controls = element(host, class_names::CONTROLS);
    let transport = element(host, class_names::TRANSPORT_CONTROLS);
    let timeline = element(host, class_names::TIMELINE);
    let toolbar = element(host, class_names::TOOLBAR);
    host.add_class(&toolbar, class_names::COMMANDS);
    host.set_attribute(&timeline, "tabindex", "0");
    host.add_class(&controls, class_names::CONTROLS_HIDDEN);

    host.append_child(&root, &content);
    host.append_child(&content, &container);
    host.append_child(&container, &controls);
    host.append_child(&controls, &transport);
    host.append_child(&transport, &timeline);
    host.append_child(&transport, &toolbar);

    let dom = PlayerDom {
        root,
        content,
        container,
        controls,
        timeline,
    };
    (dom, toolbar)
}
