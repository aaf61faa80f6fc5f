#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Widget spans and events enabled:
//!   cargo test -p wui-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p wui-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use wui_core::geometry::Size;
use wui_core::headless::{HeadlessHost, NodeId, RecordedAnimation};
use wui_core::host::AnimationOutcome;
use wui_widgets::animated_list::AnimatedList;
#[cfg(feature = "tracing")]
use wui_widgets::media_player::{MediaPlayer, MediaPlayerConfig};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

/// A captured event with its level and message.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records spans and events.
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Handle to read what was captured.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

/// Run `f` with a capturing subscriber installed.
fn with_capture<F: FnOnce()>(f: F) -> CaptureHandle {
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn animate_list_once() {
    let mut host = HeadlessHost::new();
    let mut list: AnimatedList<NodeId, RecordedAnimation> = AnimatedList::new(&mut host, None);
    let items: Vec<_> = (0..3)
        .map(|_| host.create_sized("li", Size::new(10.0, 10.0)))
        .collect();
    list.set_items(&mut host, items);
    let ticket = host.last_ticket().expect("executed");
    list.animation_settled(&mut host, ticket, AnimationOutcome::Completed);
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn list_update_span_records_item_count() {
    let handle = with_capture(animate_list_once);

    let spans = handle.spans();
    let update = spans
        .iter()
        .find(|s| s.name == "animated_list.update")
        .expect("update span recorded");
    assert_eq!(update.fields.get("items").map(String::as_str), Some("3"));
}

#[test]
#[cfg(feature = "tracing")]
fn failed_animation_logs_warning() {
    let handle = with_capture(|| {
        let mut host = HeadlessHost::new();
        let mut list: AnimatedList<NodeId, RecordedAnimation> =
            AnimatedList::new(&mut host, None);
        let item = host.create_element("li");
        list.set_items(&mut host, [item]);
        let ticket = host.last_ticket().expect("executed");
        list.animation_settled(&mut host, ticket, AnimationOutcome::Failed("gone".into()));
    });

    let warnings: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1, "got {warnings:?}");
    assert!(warnings[0].message.contains("abandoning"));
}

#[test]
#[cfg(feature = "tracing")]
fn media_player_construction_span() {
    let handle = with_capture(|| {
        let mut host = HeadlessHost::new();
        let _player: MediaPlayer<NodeId, RecordedAnimation> =
            MediaPlayer::new(&mut host, None, MediaPlayerConfig::default()).expect("constructs");
    });
    assert!(handle.spans().iter().any(|s| s.name == "media_player.new"));
}

/// Without the `tracing` feature the widget macros expand to nothing, so no
/// spans reach the subscriber.
#[test]
fn zero_overhead_when_disabled() {
    let handle = with_capture(animate_list_once);
    let spans = handle.spans();
    let widget_spans: Vec<_> = spans
        .iter()
        .filter(|s| s.name.starts_with("animated_list"))
        .collect();

    #[cfg(feature = "tracing")]
    assert!(
        !widget_spans.is_empty(),
        "With tracing feature, animated_list spans should be present"
    );

    #[cfg(not(feature = "tracing"))]
    assert!(
        widget_spans.is_empty(),
        "Without tracing feature, no animated_list spans should exist (got {})",
        widget_spans.len()
    );
}
