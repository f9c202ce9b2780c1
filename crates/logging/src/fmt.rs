//! Render `tracing` events into concise logfmt strings.
//!
//! Level, target, and message are pulled out of the event; every other field is rendered in
//! `key=value` form so structured context survives into the buffer and the CLI output.

use std::fmt::{Debug, Write};

use tracing::{
    Event, Metadata,
    field::{Field, Visit},
};

/// Rendered fields extracted from a tracing Event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLog {
    /// Severity level (e.g., INFO, WARN) for the event.
    pub level: String,
    /// Event target (typically the module path).
    pub target: String,
    /// The `message` field, empty when the event has none.
    pub message: String,
    /// Remaining fields as space-separated `key=value` pairs.
    pub fields: String,
}

impl RenderedLog {
    /// One logfmt line: `level=INFO target=actions msg="..." key=value`.
    pub fn line(&self) -> String {
        let mut out = format!("level={} target={}", self.level, self.target);
        if !self.message.is_empty() {
            let _ignored = write!(out, " msg={:?}", self.message);
        }
        if !self.fields.is_empty() {
            out.push(' ');
            out.push_str(&self.fields);
        }
        out
    }
}

/// Collects the message and the remaining fields of one event.
struct FieldVisitor {
    /// Captured `message` field, if present.
    msg: Option<String>,
    /// Accumulated non-message fields rendered as `key=value`.
    fields: String,
}

impl FieldVisitor {
    /// Append one `key=value` pair.
    fn push(&mut self, field: &Field, value: impl Debug) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ignored = write!(self.fields, "{}={:?}", field.name(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.msg = Some(value.to_string());
        } else {
            self.push(field, value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        // Bare booleans read better than their Debug form in logfmt.
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ignored = write!(self.fields, "{}={}", field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.msg = Some(format!("{:?}", value));
        } else {
            self.push(field, format_args!("{:?}", value));
        }
    }
}

/// Extract level, target, message, and remaining fields from a tracing Event.
pub fn render_event(event: &Event<'_>) -> RenderedLog {
    let meta: &Metadata<'_> = event.metadata();
    let mut vis = FieldVisitor {
        msg: None,
        fields: String::new(),
    };
    event.record(&mut vis);
    RenderedLog {
        level: meta.level().to_string(),
        target: meta.target().to_string(),
        message: vis.msg.unwrap_or_default(),
        fields: vis.fields,
    }
}
