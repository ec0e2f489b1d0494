use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commands::{Dataset, Repositories};
use crate::error::Result;

/// Whole-dataset export: the five collections plus when they were taken.
///
/// ```json
/// { "vehicles": [...], "fuel": [...], "maintenance": [...],
///   "parts": [...], "reminders": [...], "exportDate": "2024-06-01T10:00:00Z" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(flatten)]
    pub data: Dataset,
    pub export_date: DateTime<Utc>,
}

pub fn run(repos: &Repositories, now: DateTime<Utc>) -> ExportDocument {
    ExportDocument {
        data: Dataset::capture(repos),
        export_date: now,
    }
}

/// Pretty-printed JSON of `document`.
pub fn to_json(document: &ExportDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Suggested file name for an export taken at `now`.
pub fn file_name(now: DateTime<Utc>) -> String {
    format!("vehicle-expenses-backup-{}.json", now.format("%Y-%m-%d"))
}
