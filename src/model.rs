use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ── Entity types ──────────────────────────────────────────────

/// Task priority as clients send it.
///
/// `low`, `medium` and `high` are the values the web client offers. Anything
/// else is kept verbatim in `Other` rather than rejected, including
/// non-string JSON such as `2`, so a record always round-trips through the
/// save file unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    #[serde(untagged)]
    Other(Value),
}

impl Priority {
    /// Map a client-supplied value. Empty means "not given" and falls back to medium.
    pub fn from_input(value: Option<String>) -> Option<Priority> {
        let value = value?;
        match value.as_str() {
            "" => None,
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => Some(Priority::Other(Value::String(value))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => f.write_str("low"),
            Priority::Medium => f.write_str("medium"),
            Priority::High => f.write_str("high"),
            Priority::Other(Value::String(value)) => f.write_str(value),
            Priority::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Accept any JSON scalar where a string is expected.
///
/// Null reads as `None`; numbers, booleans and other non-strings keep their
/// JSON text (`2` → `"2"`).
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// A single to-do item.
///
/// `completed_at` is Some exactly when `completed` is true, as long as the
/// task is only ever flipped through `TaskList::toggle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Free-form date string from the client (usually `YYYY-MM-DD`). Not validated.
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// ── Tests ──────────────────────────────────────────────────────
