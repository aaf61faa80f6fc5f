#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! Only the two input kinds the widgets react to are modelled: pointer moves
//! and key presses. The host translates its native events into these and
//! delivers them to whichever widget installed a listener on the target.
//!
//! # Design Notes
//!
//! - Pointer moves carry the movement delta reported by the host, not a
//!   delta computed from previous positions. Some rendering engines fire
//!   move events with a zero delta when layout shifts beneath a stationary
//!   pointer; [`PointerEvent::is_stationary`] identifies those.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The pointer moved over the listener target.
    PointerMove(PointerEvent),

    /// A key was pressed while the listener target had focus.
    KeyDown(KeyEvent),
}

impl InputEvent {
    /// The listener kind this event is delivered through.
    #[must_use]
    pub const fn kind(&self) -> ListenerKind {
        match self {
            Self::PointerMove(_) => ListenerKind::PointerMove,
            Self::KeyDown(_) => ListenerKind::KeyDown,
        }
    }
}

/// The kinds of listener a widget can install on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    /// Pointer movement.
    PointerMove,
    /// Key press.
    KeyDown,
}

/// A pointer move event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in client coordinates.
    pub position: Point,

    /// Horizontal movement since the previous move event.
    pub movement_x: f32,

    /// Vertical movement since the previous move event.
    pub movement_y: f32,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a pointer move at `(x, y)` with the given movement delta.
    #[must_use]
    pub const fn new(x: f32, y: f32, movement_x: f32, movement_y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            movement_x,
            movement_y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a pointer move with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// True when the host reported no movement on either axis.
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.movement_x == 0.0 && self.movement_y == 0.0
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with default modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Space bar.
    Space,
    /// Tab key.
    Tab,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Function key (F1-F24).
    F(u8),
    /// Dedicated media play/pause key.
    MediaPlayPause,
}

bitflags! {
    /// Modifier keys that can be held during a key or pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}
