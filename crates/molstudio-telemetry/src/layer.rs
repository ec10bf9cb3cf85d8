//! Tracing layer that streams log events to a channel.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// A log event as seen by the front end.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StudioEvent {
    /// Event target (e.g. "molstudio_application::viewport::sync")
    pub target: String,
    /// Log level (ERROR, WARN, ...)
    pub level: String,
    /// Human-readable message
    pub message: String,
    /// Structured fields from the event
    pub fields: HashMap<String, Value>,
    /// Fields of the enclosing spans, outermost first, inner spans win
    pub span: HashMap<String, Value>,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Sends every event at or above `min_level` to a channel.
pub struct StudioEventLayer {
    sender: mpsc::UnboundedSender<StudioEvent>,
    min_level: Level,
}

impl StudioEventLayer {
    /// Creates a layer forwarding `WARN` and `ERROR` events.
    pub fn new(sender: mpsc::UnboundedSender<StudioEvent>) -> Self {
        Self {
            sender,
            min_level: Level::WARN,
        }
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Creates a layer together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StudioEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

/// Span fields stored in the registry's extensions.
struct SpanFields(HashMap<String, Value>);

impl<S> Layer<S> for StudioEventLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = HashMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));
        span.extensions_mut().insert(SpanFields(fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(SpanFields(fields)) = extensions.get_mut::<SpanFields>() {
            values.record(&mut FieldVisitor(fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() > self.min_level {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let mut span_fields = HashMap::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(SpanFields(stored)) = span.extensions().get::<SpanFields>() {
                    span_fields.extend(stored.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let message = fields
            .remove("message")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        let studio_event = StudioEvent {
            target: metadata.target().to_string(),
            level: metadata.level().to_string(),
            message,
            fields,
            span: span_fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // Receiver gone means nobody is listening anymore
        let _ = self.sender.send(studio_event);
    }
}

/// Collects tracing fields into JSON values.
struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}
