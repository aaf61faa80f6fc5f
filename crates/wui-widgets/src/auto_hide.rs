#![forbid(unsafe_code)]

//! Auto-hide controller: shows controls on activity, hides them after idle.
//!
//! # State Machine
//!
//! ```text
//!            pointer move                 show finished
//!  Hidden ───────────────▶ Showing ───────────────────▶ Shown ◀─┐
//!    ▲                                                   │  │   │ move / key:
//!    │ hide finished                           idle timer│  └───┘ restart timer
//!    └──────────────────────── Hiding ◀──────────────────┘
//! ```
//!
//! - `shown()` / `hidden()` force `Shown` / `Hidden` from any live state.
//! - `Suspended` ignores every input. No transition enters it yet.
//! - `Disposed` is terminal. Listeners are removed and the idle timer cleared.
//!
//! The idle timer runs exactly while the state is `Shown`. Leaving `Shown`
//! clears it; entering `Shown` starts it.
//!
//! # Signals
//!
//! Entering `Showing` or `Hiding` emits an [`AutoHideSignal`] to the owner,
//! which starts the matching animation and reports its end through
//! [`AutoHider::shown`] or [`AutoHider::hidden`].

use std::env;
use std::fmt::Debug;
use std::time::Duration;

use wui_core::event::{InputEvent, ListenerKind};
use wui_core::host::{ListenerHost, ListenerId, TimerHost, TimerId};

/// Environment variable overriding the idle duration, in milliseconds.
pub const ENV_AUTOHIDE_MS: &str = "WUI_AUTOHIDE_MS";

/// Idle duration used when none is configured.
pub const DEFAULT_IDLE_DURATION: Duration = Duration::from_millis(2500);

/// Configuration for [`AutoHider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoHideConfig {
    /// Time without input, while shown, before the controls hide.
    pub idle_duration: Duration,
}

impl Default for AutoHideConfig {
    fn default() -> Self {
        Self {
            idle_duration: DEFAULT_IDLE_DURATION,
        }
    }
}

impl AutoHideConfig {
    /// Create a config with the default idle duration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle duration.
    #[must_use]
    pub fn idle_duration(mut self, duration: Duration) -> Self {
        self.idle_duration = duration;
        self
    }

    /// Read overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Read overrides through a custom lookup (for tests).
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = get_env(ENV_AUTOHIDE_MS) {
            match value.trim().parse::<u64>() {
                Ok(ms) => config.idle_duration = Duration::from_millis(ms),
                Err(_) => {
                    wui_core::warn!(%value, "ignoring invalid {}", ENV_AUTOHIDE_MS);
                }
            }
        }
        config
    }
}

/// Visibility state of auto-hidden controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AutoHideState {
    /// Controls are hidden.
    #[default]
    Hidden,
    /// Show animation running.
    Showing,
    /// Controls are visible; the idle timer is running.
    Shown,
    /// Hide animation running.
    Hiding,
    /// Inputs are ignored. Never entered by the current transitions.
    Suspended,
    /// Terminal.
    Disposed,
}

/// Something that can move an [`AutoHideState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Pointer moved by a non-zero amount.
    PointerMove,
    /// A key was pressed.
    KeyDown,
    /// The idle timer fired.
    IdleElapsed,
    /// The owner finished showing the controls.
    ShowFinished,
    /// The owner finished hiding the controls.
    HideFinished,
    /// The controller is being torn down.
    Dispose,
}

/// What a trigger does in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing happens.
    Ignore,
    /// Stay in `Shown` and restart the idle timer.
    RestartIdleTimer,
    /// Leave the current state for another.
    Enter(AutoHideState),
}

impl AutoHideState {
    /// Transition table.
    #[must_use]
    pub const fn on(self, trigger: Trigger) -> Transition {
        use AutoHideState::*;
        match (self, trigger) {
            (Disposed, _) => Transition::Ignore,
            (_, Trigger::Dispose) => Transition::Enter(Disposed),
            (_, Trigger::ShowFinished) => Transition::Enter(Shown),
            (_, Trigger::HideFinished) => Transition::Enter(Hidden),
            (Hidden, Trigger::PointerMove) => Transition::Enter(Showing),
            (Shown, Trigger::PointerMove | Trigger::KeyDown) => Transition::RestartIdleTimer,
            (Shown, Trigger::IdleElapsed) => Transition::Enter(Hiding),
            _ => Transition::Ignore,
        }
    }
}

/// Request from the controller to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoHideSignal {
    /// Start showing the controls, then call [`AutoHider::shown`].
    Show,
    /// Start hiding the controls, then call [`AutoHider::hidden`].
    Hide,
}

/// Drives control visibility from user activity on a root node.
#[derive(Debug)]
pub struct AutoHider<N> {
    root: N,
    config: AutoHideConfig,
    state: AutoHideState,
    idle_timer: Option<TimerId>,
    listeners: Vec<ListenerId>,
}

impl<N: Clone + Debug> AutoHider<N> {
    /// Install pointer-move and key-down listeners on `root` and start
    /// `Hidden`.
    pub fn new<H>(host: &mut H, root: N, config: AutoHideConfig) -> Self
    where
        H: ListenerHost<N>,
    {
        let listeners = vec![
            host.listen(&root, ListenerKind::PointerMove),
            host.listen(&root, ListenerKind::KeyDown),
        ];
        Self {
            root,
            config,
            state: AutoHideState::Hidden,
            idle_timer: None,
            listeners,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AutoHideState {
        self.state
    }

    /// Node the listeners are installed on.
    #[must_use]
    pub fn root(&self) -> &N {
        &self.root
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &AutoHideConfig {
        &self.config
    }

    /// Pending idle timer, present exactly while `Shown`.
    #[must_use]
    pub fn idle_timer(&self) -> Option<TimerId> {
        self.idle_timer
    }

    /// Feed an input event received on the root.
    ///
    /// Pointer moves with zero movement are ignored; some hosts emit them
    /// spuriously.
    pub fn handle_input<H>(&mut self, host: &mut H, event: &InputEvent) -> Option<AutoHideSignal>
    where
        H: TimerHost + ListenerHost<N>,
    {
        let trigger = match event {
            InputEvent::PointerMove(pointer) if pointer.is_stationary() => return None,
            InputEvent::PointerMove(_) => Trigger::PointerMove,
            InputEvent::KeyDown(_) => Trigger::KeyDown,
        };
        self.fire(host, trigger)
    }

    /// Report a fired timer. Timers other than the current idle timer are
    /// ignored.
    pub fn timer_fired<H>(&mut self, host: &mut H, id: TimerId) -> Option<AutoHideSignal>
    where
        H: TimerHost + ListenerHost<N>,
    {
        if self.idle_timer != Some(id) {
            wui_core::trace!(?id, "ignoring stale timer");
            return None;
        }
        self.idle_timer = None;
        self.fire(host, Trigger::IdleElapsed)
    }

    /// Force `Shown`. Called when the show animation finishes.
    pub fn shown<H>(&mut self, host: &mut H)
    where
        H: TimerHost + ListenerHost<N>,
    {
        self.fire(host, Trigger::ShowFinished);
    }

    /// Force `Hidden`. Called when the hide animation finishes.
    pub fn hidden<H>(&mut self, host: &mut H)
    where
        H: TimerHost + ListenerHost<N>,
    {
        self.fire(host, Trigger::HideFinished);
    }

    /// Remove listeners, clear the idle timer, and enter `Disposed`.
    /// Idempotent.
    pub fn dispose<H>(&mut self, host: &mut H)
    where
        H: TimerHost + ListenerHost<N>,
    {
        self.fire(host, Trigger::Dispose);
    }

    fn fire<H>(&mut self, host: &mut H, trigger: Trigger) -> Option<AutoHideSignal>
    where
        H: TimerHost + ListenerHost<N>,
    {
        match self.state.on(trigger) {
            Transition::Ignore => None,
            Transition::RestartIdleTimer => {
                self.clear_idle_timer(host);
                self.idle_timer = Some(host.set_timer(self.config.idle_duration));
                None
            }
            Transition::Enter(next) => self.enter(host, next),
        }
    }

    fn enter<H>(&mut self, host: &mut H, next: AutoHideState) -> Option<AutoHideSignal>
    where
        H: TimerHost + ListenerHost<N>,
    {
        let previous = self.state;
        if previous == AutoHideState::Shown {
            self.clear_idle_timer(host);
        }
        self.state = next;
        wui_core::debug!(from = ?previous, to = ?next, "auto-hide transition");

        match next {
            AutoHideState::Showing => Some(AutoHideSignal::Show),
            AutoHideState::Hiding => Some(AutoHideSignal::Hide),
            AutoHideState::Shown => {
                self.idle_timer = Some(host.set_timer(self.config.idle_duration));
                None
            }
            AutoHideState::Disposed => {
                self.clear_idle_timer(host);
                for id in self.listeners.drain(..) {
                    host.unlisten(id);
                }
                None
            }
            AutoHideState::Hidden | AutoHideState::Suspended => None,
        }
    }

    fn clear_idle_timer<H: TimerHost>(&mut self, host: &mut H) {
        if let Some(id) = self.idle_timer.take() {
            host.clear_timer(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wui_core::event::{KeyCode, KeyEvent, PointerEvent};
    use wui_core::headless::{HeadlessHost, NodeId};
    use wui_core::host::Tree;

    const IDLE: Duration = Duration::from_millis(1000);

    fn moved() -> InputEvent {
        InputEvent::PointerMove(PointerEvent::new(10.0, 10.0, 2.0, 0.0))
    }

    fn key() -> InputEvent {
        InputEvent::KeyDown(KeyEvent::new(KeyCode::Space))
    }

    fn setup() -> (HeadlessHost, AutoHider<NodeId>) {
        let mut host = HeadlessHost::new();
        let root = host.create_element("div");
        let hider = AutoHider::new(&mut host, root, AutoHideConfig::new().idle_duration(IDLE));
        (host, hider)
    }

    #[test]
    fn config_defaults_and_env_override() {
        assert_eq!(AutoHideConfig::default().idle_duration, DEFAULT_IDLE_DURATION);
        let config = AutoHideConfig::from_env_with(|key| {
            (key == ENV_AUTOHIDE_MS).then(|| "750".to_string())
        });
        assert_eq!(config.idle_duration, Duration::from_millis(750));
        let config = AutoHideConfig::from_env_with(|_| Some("soon".to_string()));
        assert_eq!(config, AutoHideConfig::default());
    }

    #[test]
    fn transition_table() {
        use AutoHideState::*;
        assert_eq!(Hidden.on(Trigger::PointerMove), Transition::Enter(Showing));
        assert_eq!(Hidden.on(Trigger::KeyDown), Transition::Ignore);
        assert_eq!(Showing.on(Trigger::PointerMove), Transition::Ignore);
        assert_eq!(Shown.on(Trigger::KeyDown), Transition::RestartIdleTimer);
        assert_eq!(Shown.on(Trigger::IdleElapsed), Transition::Enter(Hiding));
        assert_eq!(Hiding.on(Trigger::PointerMove), Transition::Ignore);
        assert_eq!(Hiding.on(Trigger::ShowFinished), Transition::Enter(Shown));
        assert_eq!(Suspended.on(Trigger::PointerMove), Transition::Ignore);
        assert_eq!(Disposed.on(Trigger::ShowFinished), Transition::Ignore);
        assert_eq!(Disposed.on(Trigger::Dispose), Transition::Ignore);
    }

    #[test]
    fn installs_listeners_on_root() {
        let (host, hider) = setup();
        let root = *hider.root();
        assert_eq!(host.listeners_on(root, ListenerKind::PointerMove).len(), 1);
        assert_eq!(host.listeners_on(root, ListenerKind::KeyDown).len(), 1);
    }

    #[test]
    fn full_cycle() {
        let (mut host, mut hider) = setup();

        assert_eq!(hider.handle_input(&mut host, &moved()), Some(AutoHideSignal::Show));
        assert_eq!(hider.state(), AutoHideState::Showing);
        assert_eq!(hider.idle_timer(), None);

        hider.shown(&mut host);
        assert_eq!(hider.state(), AutoHideState::Shown);
        let timer = hider.idle_timer().expect("idle timer running");

        let fired = host.advance(IDLE);
        assert_eq!(fired, vec![timer]);
        assert_eq!(hider.timer_fired(&mut host, timer), Some(AutoHideSignal::Hide));
        assert_eq!(hider.state(), AutoHideState::Hiding);

        hider.hidden(&mut host);
        assert_eq!(hider.state(), AutoHideState::Hidden);
        assert_eq!(host.timers().pending_count(), 0);
    }

    #[test]
    fn stationary_pointer_is_ignored() {
        let (mut host, mut hider) = setup();
        let still = InputEvent::PointerMove(PointerEvent::new(5.0, 5.0, 0.0, 0.0));
        assert_eq!(hider.handle_input(&mut host, &still), None);
        assert_eq!(hider.state(), AutoHideState::Hidden);
    }

    #[test]
    fn key_does_not_show_hidden_controls() {
        let (mut host, mut hider) = setup();
        assert_eq!(hider.handle_input(&mut host, &key()), None);
        assert_eq!(hider.state(), AutoHideState::Hidden);
    }

    #[test]
    fn activity_while_shown_restarts_timer() {
        let (mut host, mut hider) = setup();
        hider.shown(&mut host);
        let first = hider.idle_timer().expect("running");

        host.advance(Duration::from_millis(600));
        assert_eq!(hider.handle_input(&mut host, &key()), None);
        let second = hider.idle_timer().expect("restarted");
        assert_ne!(first, second);
        assert!(!host.timers().is_pending(first));

        // The first deadline passes without effect.
        assert!(host.advance(Duration::from_millis(600)).is_empty());
        assert_eq!(hider.state(), AutoHideState::Shown);
        assert_eq!(host.advance(Duration::from_millis(400)), vec![second]);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let (mut host, mut hider) = setup();
        hider.shown(&mut host);
        let first = hider.idle_timer().expect("running");
        hider.handle_input(&mut host, &moved());
        assert_eq!(hider.timer_fired(&mut host, first), None);
        assert_eq!(hider.state(), AutoHideState::Shown);
    }

    #[test]
    fn forced_hidden_clears_timer() {
        let (mut host, mut hider) = setup();
        hider.shown(&mut host);
        hider.hidden(&mut host);
        assert_eq!(hider.idle_timer(), None);
        assert_eq!(host.timers().pending_count(), 0);
    }

    #[test]
    fn dispose_is_terminal_and_idempotent() {
        let (mut host, mut hider) = setup();
        hider.shown(&mut host);
        hider.dispose(&mut host);
        hider.dispose(&mut host);

        assert_eq!(hider.state(), AutoHideState::Disposed);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.timers().pending_count(), 0);

        assert_eq!(hider.handle_input(&mut host, &moved()), None);
        hider.shown(&mut host);
        assert_eq!(hider.state(), AutoHideState::Disposed);
    }
}
