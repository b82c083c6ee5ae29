#![forbid(unsafe_code)]

//! Structured logging contract: targets, levels, and fields emitted while a
//! container is dragged, released, and closed.
//!
//! Run:
//!   cargo test -p pullsheet-core --test tracing_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pullsheet_core::{
    AnimationToken, ContainerHost, PointerPhase, PullableContainer, ScrollSample, ScrollSurface,
    SheetConfig, SheetContent,
};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned().unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            fields,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(EventCapture {
            events: events.clone(),
        });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [CapturedEvent], target: &str, message: &str) -> Vec<&'a CapturedEvent> {
    events
        .iter()
        .filter(|e| e.target == target && e.message == message)
        .collect()
}

// ── Fixtures ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Host {
    snaps: Vec<AnimationToken>,
}

impl ContainerHost for Host {
    fn query_available_height(&self) -> f64 {
        800.0
    }
    fn did_update_height(&mut self, _: f64) {}
    fn did_request_snap_back(&mut self, _: f64, token: AnimationToken) {
        self.snaps.push(token);
    }
    fn did_request_close(&mut self) {}
}

struct Surface;

impl ScrollSurface for Surface {
    fn set_bounces(&mut self, _: bool) {}
    fn set_content_offset_y(&mut self, _: f64) {}
    fn set_scroll_enabled(&mut self, _: bool) {}
}

struct Content(f64);

impl SheetContent for Content {
    fn content_height(&self) -> f64 {
        self.0
    }
}

fn presented() -> PullableContainer<Host, Surface, Content> {
    let mut sheet = PullableContainer::new(Host::default(), Surface, Content(400.0), SheetConfig::default());
    sheet.view_did_layout(0.0);
    let token = *sheet.controller().host().snaps.last().unwrap();
    sheet.animation_did_complete(token).unwrap();
    sheet
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[test]
fn release_logs_decision_at_debug() {
    let events = with_captured_events(|| {
        let mut sheet = presented();
        sheet.handle_pointer(PointerPhase::Began);
        sheet.handle_pointer(PointerPhase::Changed {
            translation_y: 250.0,
            velocity_y: 0.0,
        });
        sheet.handle_pointer(PointerPhase::Ended { velocity_y: 0.0 });
    });

    let ended = find(&events, "pullsheet.controller", "drag ended");
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0].level, tracing::Level::DEBUG);
    assert_eq!(ended[0].fields.get("decision").map(String::as_str), Some("Close"));
    assert_eq!(ended[0].fields.get("height").map(String::as_str), Some("150"));

    assert_eq!(find(&events, "pullsheet.controller", "close requested").len(), 1);
    assert_eq!(find(&events, "pullsheet.container", "container closing").len(), 1);
}

#[test]
fn drag_changes_log_at_trace_only() {
    let events = with_captured_events(|| {
        let mut sheet = presented();
        sheet.handle_pointer(PointerPhase::Began);
        for step in 1..=5 {
            sheet.handle_pointer(PointerPhase::Changed {
                translation_y: f64::from(step) * 10.0,
                velocity_y: 100.0,
            });
        }
    });

    let changed = find(&events, "pullsheet.controller", "drag changed");
    assert_eq!(changed.len(), 5);
    assert!(changed.iter().all(|e| e.level == tracing::Level::TRACE));
}

#[test]
fn losing_source_is_logged_as_dropped() {
    let events = with_captured_events(|| {
        let mut sheet = presented();
        sheet.handle_pointer(PointerPhase::Began);
        sheet.scroll_will_begin_dragging();
        sheet.scroll_did_scroll(ScrollSample::new(-10.0, -50.0));
    });

    let dropped = find(&events, "pullsheet.controller", "event dropped");
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].level, tracing::Level::TRACE);
    let err = dropped[0].fields.get("err").cloned().unwrap_or_default();
    assert!(err.contains("Scroll"), "err={err}");

    assert_eq!(find(&events, "pullsheet.source", "scroll pull not granted").len(), 1);
}

#[test]
fn nothing_logs_above_debug_in_normal_flow() {
    let events = with_captured_events(|| {
        let mut sheet = presented();
        sheet.scroll_will_begin_dragging();
        sheet.scroll_did_scroll(ScrollSample::new(-40.0, -200.0));
        sheet.scroll_did_end_dragging(-200.0);
        let token = *sheet.controller().host().snaps.last().unwrap();
        sheet.animation_did_complete(token).unwrap();
        sheet.dimming_tapped();
        sheet.dismiss_transition_did_finish();
    });

    assert!(!events.is_empty());
    assert!(
        events
            .iter()
            .all(|e| e.level >= tracing::Level::DEBUG && e.target.starts_with("pullsheet.")),
        "{events:#?}"
    );
}
