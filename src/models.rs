//! Data models for the log analyzer.
//!
//! This module contains the event records decoded from the callback log,
//! the run statistics accumulated from them, and the report metadata.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Fallback for a missing task name or host.
pub const UNKNOWN: &str = "Unknown";

/// Fallback for a failure without a `msg` field.
pub const NO_ERROR_MESSAGE: &str = "No error message";

/// Outcome category of an event, derived from its `event` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `runner_on_ok` - the task ran successfully on a host.
    Ok,
    /// `runner_on_failed` - the task failed on a host.
    Failed,
    /// `runner_on_skipped` - the task was skipped on a host.
    Skipped,
    /// Any other discriminator (playbook start, stats, etc.).
    Other,
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s {
            "runner_on_ok" => EventKind::Ok,
            "runner_on_failed" => EventKind::Failed,
            "runner_on_skipped" => EventKind::Skipped,
            _ => EventKind::Other,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Ok => write!(f, "ok"),
            EventKind::Failed => write!(f, "failed"),
            EventKind::Skipped => write!(f, "skipped"),
            EventKind::Other => write!(f, "other"),
        }
    }
}

/// One JSON record from the callback log.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEvent {
    /// Event discriminator, e.g. `runner_on_ok`.
    #[serde(default)]
    pub event: Option<Value>,
    /// Event payload. Records without one carry no task outcome.
    #[serde(default)]
    pub event_data: Option<Map<String, Value>>,
}

impl LogEvent {
    /// Classify the event by its discriminator.
    pub fn kind(&self) -> EventKind {
        self.event
            .as_ref()
            .and_then(Value::as_str)
            .map(EventKind::from)
            .unwrap_or(EventKind::Other)
    }

    /// Look up a raw payload field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.event_data.as_ref().and_then(|data| data.get(key))
    }

    /// Look up a payload field as display text.
    pub fn field_text(&self, key: &str) -> Option<String> {
        self.field(key).map(value_text)
    }

    /// Whether the payload flags the task as having changed the host.
    pub fn changed(&self) -> bool {
        self.event_data
            .as_ref()
            .and_then(|data| data.get("changed"))
            .map(is_truthy)
            .unwrap_or(false)
    }
}

/// Render a JSON value as text: strings verbatim, everything else as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Identity of a managed host as it appeared in `remote_addr`.
///
/// The string `"1"` and the number `1` are different hosts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum HostId {
    /// A JSON string, verbatim.
    Name(String),
    /// Any other JSON value, as compact JSON text.
    Value(String),
}

impl From<&Value> for HostId {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => HostId::Name(s.clone()),
            other => HostId::Value(other.to_string()),
        }
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostId::Name(s) | HostId::Value(s) => write!(f, "{}", s),
        }
    }
}

/// A failed task as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetail {
    /// Task name.
    pub task: String,
    /// Host the task failed on.
    pub host: String,
    /// Error message reported by the module.
    pub error: String,
}

impl FailureDetail {
    /// Build a failure record, substituting defaults for missing fields.
    pub fn from_event(event: &LogEvent) -> Self {
        Self {
            task: event
                .field_text("task")
                .unwrap_or_else(|| UNKNOWN.to_string()),
            host: event
                .field_text("remote_addr")
                .unwrap_or_else(|| UNKNOWN.to_string()),
            error: event
                .field_text("msg")
                .unwrap_or_else(|| NO_ERROR_MESSAGE.to_string()),
        }
    }
}

/// Counters accumulated over a single analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Tasks that completed, successfully or not. Skipped tasks are not counted.
    pub total_tasks: usize,
    /// Tasks that succeeded.
    pub ok_tasks: usize,
    /// Successful tasks that reported a change.
    pub changed_tasks: usize,
    /// Tasks that failed.
    pub failed_tasks: usize,
    /// Tasks that were skipped.
    pub skipped_tasks: usize,
    /// Distinct hosts seen in any event.
    pub hosts: BTreeSet<HostId>,
    /// Failures in encounter order.
    pub failures: Vec<FailureDetail>,
}

impl RunStatistics {
    /// Fold one event into the counters.
    pub fn record(&mut self, event: &LogEvent) {
        if event.event_data.is_none() {
            return;
        }

        if let Some(host) = event.field("remote_addr") {
            self.hosts.insert(HostId::from(host));
        }

        match event.kind() {
            EventKind::Ok => {
                self.total_tasks += 1;
                self.ok_tasks += 1;
                if event.changed() {
                    self.changed_tasks += 1;
                }
            }
            EventKind::Failed => {
                self.total_tasks += 1;
                self.failed_tasks += 1;
                self.failures.push(FailureDetail::from_event(event));
            }
            EventKind::Skipped => {
                self.skipped_tasks += 1;
            }
            EventKind::Other => {}
        }
    }

    /// Number of distinct managed hosts.
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Percentage of completed tasks that succeeded, or `None` when nothing ran.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_tasks == 0 {
            return None;
        }
        Some(self.ok_tasks as f64 / self.total_tasks as f64 * 100.0)
    }

    /// Success rate rounded to one decimal place, the way the text report prints it.
    ///
    /// Ties round to even on the exact binary value, so 1 of 16 gives 6.2.
    pub fn rounded_success_rate(&self) -> Option<f64> {
        self.success_rate()
            .and_then(|rate| format!("{:.1}", rate).parse().ok())
    }

    /// True when no task failed.
    pub fn is_success(&self) -> bool {
        self.failed_tasks == 0
    }
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Local>,
    /// The resolved log source, as displayed.
    pub log_file: String,
}

impl ReportMetadata {
    /// Metadata stamped with the current local time.
    pub fn now(log_file: impl Into<String>) -> Self {
        Self {
            generated_at: Local::now(),
            log_file: log_file.into(),
        }
    }
}
