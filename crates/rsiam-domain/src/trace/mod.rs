//! Structured decision trace events.
//!
//! One event is produced per (request, permission) pair and written as a
//! line of JSON to a configured sink. Emission is strictly best-effort:
//! sink failures are swallowed so tracing can never perturb a decision.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Trace schema version stamped on every event.
pub const SCHEMA_VERSION: &str = "1.0";

/// Event type tag for permission-check decisions.
pub const EVENT_TYPE_AUTHZ_CHECK: &str = "authz.check";

/// Name recorded as the evaluator of every decision.
pub const EVALUATOR: &str = "rsiam";

/// A single authorization decision, ready for a line-oriented JSON sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthzEvent {
    pub schema_version: String,
    pub event_type: String,
    /// RFC3339 timestamp with nanosecond precision.
    pub timestamp: String,
    pub actor: Actor,
    pub target: Target,
    pub action: Action,
    pub decision: DecisionRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub principal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub resource: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub permission: String,
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub outcome: Outcome,
    pub reason: String,
    pub evaluated_by: String,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Allow,
    Deny,
}

impl AuthzEvent {
    /// Builds a check event with the schema tags and timestamp filled in.
    pub fn check(
        principal: &str,
        resource: &str,
        permission: &str,
        method: &str,
        outcome: Outcome,
        reason: String,
        latency_ms: f64,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            event_type: EVENT_TYPE_AUTHZ_CHECK.to_string(),
            timestamp: now_rfc3339_nanos(),
            actor: Actor {
                principal: principal.to_string(),
            },
            target: Target {
                resource: resource.to_string(),
            },
            action: Action {
                permission: permission.to_string(),
                method: method.to_string(),
            },
            decision: DecisionRecord {
                outcome,
                reason,
                evaluated_by: EVALUATOR.to_string(),
                latency_ms,
            },
        }
    }
}

/// Current time as an RFC3339 string with nanosecond precision.
pub fn now_rfc3339_nanos() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// A destination for trace events.
///
/// Implementations must be infallible from the caller's point of view:
/// errors are handled (or dropped) internally.
pub trait TraceSink: Send + Sync {
    fn emit(&self, event: &AuthzEvent);

    /// Flushes buffered events. Called after a batch of emits.
    fn flush(&self) {}
}

/// Writes one JSON object per line to a file.
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Creates (truncating) the trace output file.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl TraceSink for JsonLinesSink {
    fn emit(&self, event: &AuthzEvent) {
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
