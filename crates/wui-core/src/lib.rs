#![forbid(unsafe_code)]

//! Core: geometry, input events, host capabilities, and animation coalescing.
//!
//! Widgets built on this crate never talk to a browser directly. Everything
//! they need from the outside world (a node tree, timers, listeners, animation
//! execution, media playback) is reached through the traits in [`host`], and
//! every asynchronous completion is delivered back by the host as an explicit
//! call. [`headless`] provides deterministic implementations of those traits.

pub mod coalescer;
pub mod event;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
