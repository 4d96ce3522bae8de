//! Condition evaluation over a constrained expression grammar.
//!
//! The grammar is deliberately small: four recognized patterns, detected by
//! substring presence and evaluated against the per-request context.
//!
//! | Pattern                              | Effect                             |
//! |--------------------------------------|------------------------------------|
//! | `resource.name.startsWith("PREFIX")` | resource name begins with PREFIX   |
//! | `resource.type == "TYPE"`            | derived resource type equals TYPE  |
//! | `request.time < timestamp("T")`      | request time strictly before T     |
//! | `request.time > timestamp("T")`      | request time strictly after T      |
//!
//! Anything outside these forms evaluates to false with an explanatory
//! reason; evaluation never returns an error to the caller. New patterns
//! are added here explicitly, never by generalizing the parser.

mod context;

pub use context::{EvalContext, ResourceType};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::Condition;

/// Evaluates `condition` against `ctx`, returning the verdict and a
/// human-readable reason suitable for decision traces.
///
/// A whitespace-only expression is vacuously true.
pub fn evaluate(condition: &Condition, ctx: &EvalContext<'_>) -> (bool, String) {
    let expression = condition.expression.trim();
    if expression.is_empty() {
        return (true, "empty condition".to_string());
    }

    if expression.contains("resource.name.startsWith") {
        return eval_starts_with(expression, ctx.resource_name);
    }

    if expression.contains("resource.type") {
        return eval_resource_type(expression, ctx.resource_type);
    }

    if expression.contains("request.time") {
        return eval_request_time(expression, ctx.request_time);
    }

    (false, format!("unsupported expression: {expression}"))
}

/// Extracts the text between the first and last double quote.
fn quoted_literal(expression: &str) -> Option<&str> {
    let start = expression.find('"')?;
    let end = expression.rfind('"')?;
    if start >= end {
        return None;
    }
    Some(&expression[start + 1..end])
}

fn eval_starts_with(expression: &str, resource_name: &str) -> (bool, String) {
    let Some(prefix) = quoted_literal(expression) else {
        return (false, "invalid startsWith syntax".to_string());
    };

    if resource_name.starts_with(prefix) {
        (
            true,
            format!("resource.name '{resource_name}' starts with '{prefix}'"),
        )
    } else {
        (
            false,
            format!("resource.name '{resource_name}' does not start with '{prefix}'"),
        )
    }
}

fn eval_resource_type(expression: &str, resource_type: ResourceType) -> (bool, String) {
    let Some(expected) = quoted_literal(expression) else {
        return (false, "invalid resource.type syntax".to_string());
    };

    if resource_type.as_str() == expected {
        (
            true,
            format!("resource.type '{resource_type}' matches '{expected}'"),
        )
    } else {
        (
            false,
            format!("resource.type '{resource_type}' does not match '{expected}'"),
        )
    }
}

fn eval_request_time(expression: &str, request_time: DateTime<Utc>) -> (bool, String) {
    const TIMESTAMP_OPEN: &str = "timestamp(\"";

    let Some(start) = expression.find(TIMESTAMP_OPEN) else {
        return (false, "invalid request.time syntax".to_string());
    };
    let literal_start = start + TIMESTAMP_OPEN.len();
    let Some(literal_len) = expression[literal_start..].find('"') else {
        return (false, "invalid timestamp format".to_string());
    };
    let literal = &expression[literal_start..literal_start + literal_len];

    let Ok(target) = DateTime::parse_from_rfc3339(literal) else {
        return (false, format!("invalid timestamp: {literal}"));
    };
    let target = target.with_timezone(&Utc);
    let now = request_time.to_rfc3339_opts(SecondsFormat::Secs, true);

    if expression.contains('<') {
        if request_time < target {
            (true, format!("request.time {now} < {literal}"))
        } else {
            (false, format!("request.time {now} >= {literal}"))
        }
    } else if expression.contains('>') {
        if request_time > target {
            (true, format!("request.time {now} > {literal}"))
        } else {
            (false, format!("request.time {now} <= {literal}"))
        }
    } else {
        (false, "request.time expression must use < or >".to_string())
    }
}
