use serde::Serialize;
use serde_json::Value;

/// Get-or-default accessors over loosely-typed backend JSON.
///
/// The backend omits fields freely and is inconsistent about numeric
/// types, so every record constructor goes through these instead of
/// erroring on a missing or mistyped field. Defaulting lives here and
/// nowhere else.
pub trait ValueExt {
    fn str_field(&self, key: &str) -> String;
    fn i64_field(&self, key: &str) -> i64;
    fn f64_field(&self, key: &str) -> f64;
    fn array_field(&self, key: &str) -> Vec<Value>;
}

impl ValueExt for Value {
    fn str_field(&self, key: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn i64_field(&self, key: &str) -> i64 {
        self.get(key)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or_default()
    }

    fn f64_field(&self, key: &str) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or_default()
    }

    fn array_field(&self, key: &str) -> Vec<Value> {
        self.get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}

/// Map a JSON array into records; anything that isn't an array (including
/// the null payload of an empty response body) becomes an empty list.
pub(crate) fn record_array<T>(value: &Value, from: impl Fn(&Value) -> T) -> Vec<T> {
    value
        .as_array()
        .map(|items| items.iter().map(from).collect())
        .unwrap_or_default()
}

/// Result of creating a new document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentInit {
    pub document_id: String,
    pub status: String,
}

impl DocumentInit {
    pub fn from_value(value: &Value) -> Self {
        Self {
            document_id: value.str_field("document_id"),
            status: value.str_field("status"),
        }
    }
}

/// Current state of a document as reported by the text service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentSnapshot {
    pub document_id: String,
    pub text: String,
    pub version: i64,
    pub timestamp: String,
    pub topic: String,
}

impl DocumentSnapshot {
    pub fn from_value(value: &Value) -> Self {
        Self {
            document_id: value.str_field("document_id"),
            text: value.str_field("text"),
            version: value.i64_field("version"),
            timestamp: value.str_field("timestamp"),
            topic: value.str_field("topic"),
        }
    }
}

/// One entry from the edit history listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditRecord {
    pub edit_id: String,
    pub agent_id: String,
    pub operation: String,
    pub status: String,
    pub tokens_used: i64,
    pub created_at: String,
}

impl EditRecord {
    pub fn from_value(value: &Value) -> Self {
        Self {
            edit_id: value.str_field("edit_id"),
            agent_id: value.str_field("agent_id"),
            operation: value.str_field("operation"),
            status: value.str_field("status"),
            tokens_used: value.i64_field("tokens_used"),
            created_at: value.str_field("created_at"),
        }
    }
}

/// One agent chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatMessage {
    pub timestamp: String,
    pub agent_id: String,
    pub message: String,
    pub document_id: String,
}

impl ChatMessage {
    pub fn from_value(value: &Value) -> Self {
        Self {
            timestamp: value.str_field("timestamp"),
            agent_id: value.str_field("agent_id"),
            message: value.str_field("message"),
            document_id: value.str_field("document_id"),
        }
    }
}

/// Aggregate metrics plus the token-usage time series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total_edits: i64,
    pub total_tokens: i64,
    pub active_agents: i64,
    pub avg_latency_ms: f64,
    pub edits_per_minute: f64,
    pub token_usage_by_time: Vec<MetricPoint>,
}

impl AnalyticsSnapshot {
    pub fn from_value(value: &Value) -> Self {
        Self {
            total_edits: value.i64_field("total_edits"),
            total_tokens: value.i64_field("total_tokens"),
            active_agents: value.i64_field("active_agents"),
            avg_latency_ms: value.f64_field("avg_latency_ms"),
            edits_per_minute: value.f64_field("edits_per_minute"),
            token_usage_by_time: value
                .array_field("token_usage_by_time")
                .iter()
                .map(MetricPoint::from_value)
                .collect(),
        }
    }
}

/// One sample in a time series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricPoint {
    pub timestamp: String,
    pub value: f64,
}

impl MetricPoint {
    pub fn from_value(value: &Value) -> Self {
        Self {
            timestamp: value.str_field("timestamp"),
            value: value.f64_field("value"),
        }
    }
}
