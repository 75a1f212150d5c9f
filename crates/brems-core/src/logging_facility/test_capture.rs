//! In-memory event capture for logging assertions
//!
//! Review operations log `start`/`end` pairs and `recovered` warnings keyed
//! by `op` and `approval_request_id`. The capture layer keeps every event
//! with its fields rendered as strings, so tests can assert on exactly what
//! a log consumer would see.

use brems_core_types::schema::{
    EVENT_END, EVENT_RECOVERED, EVENT_START, FIELD_APPROVAL_REQUEST_ID, FIELD_COMPONENT,
    FIELD_EVENT, FIELD_OP,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

type EventBuffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// One captured event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// Field value as recorded, if present
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether this is the given lifecycle event (`start`, `end`, ...)
    pub fn is(&self, event: &str) -> bool {
        self.event.as_deref() == Some(event)
    }
}

/// Renders every field as a string; numbers and bools via `to_string`,
/// `?`-formatted values via `Debug`, `%`-formatted values via `Display`.
#[derive(Default)]
struct StringFields(HashMap<String, String>);

impl StringFields {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for StringFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

struct CaptureLayer {
    events: EventBuffer,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = StringFields::default();
        event.record(&mut visitor);
        let fields = visitor.0;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        };

        self.events
            .lock()
            .map(|mut events| events.push(captured))
            .ok();
    }
}

/// Shared handle to the captured events
#[derive(Clone)]
pub struct TestCapture {
    events: EventBuffer,
}

impl TestCapture {
    /// Every event captured so far, in emission order
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events emitted for one operation
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.op.as_deref() == Some(op))
    }

    /// Events correlated with one approval request
    pub fn events_for_request(&self, approval_request_id: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.field(FIELD_APPROVAL_REQUEST_ID) == Some(approval_request_id))
    }

    /// `recovered` warnings logged by `op`
    pub fn recovered(&self, op: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.op.as_deref() == Some(op) && e.is(EVENT_RECOVERED))
    }

    /// Number of start and end events for an approval request
    pub fn boundary_counts(&self, approval_request_id: &str) -> (usize, usize) {
        let events = self.events_for_request(approval_request_id);
        (
            events.iter().filter(|e| e.is(EVENT_START)).count(),
            events.iter().filter(|e| e.is(EVENT_END)).count(),
        )
    }

    /// Assert that `op` logged `event`
    ///
    /// # Panics
    ///
    /// Panics if no such event was captured
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let matching = self.events_for_op(op);
        assert!(
            matching.iter().any(|e| e.is(event)),
            "Expected event op={} event={} not found ({} events for op)",
            op,
            event,
            matching.len()
        );
    }

    /// Count events matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    fn filtered<F>(&self, keep: F) -> Vec<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().into_iter().filter(|e| keep(e)).collect()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (first call only) and
/// return the shared handle.
///
/// Tests in one binary share the buffer, so filter by a unique `op` or
/// `approval_request_id`.
///
/// # Example
///
/// ```
/// use brems_core::logging_facility::test_capture::init_test_capture;
/// use brems_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op", approval_request_id = "doc-1");
/// capture.assert_event_exists("doc_capture_op", "start");
/// assert_eq!(capture.boundary_counts("doc-1"), (1, 0));
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let events = EventBuffer::default();
            let layer = CaptureLayer {
                events: events.clone(),
            };
            tracing_subscriber::registry().with(layer).init();
            TestCapture { events }
        })
        .clone()
}
