use compact_str::{CompactString, format_compact};
use serde_json::Value;
use tracing::warn;

use crate::{
    cursor::Cursor,
    result::{Result, WatchError},
};

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Review statuses documented by the upstream API
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human readable verdict sent to the chat
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Approved => "The work has been reviewed: the reviewer liked everything. Hooray!",
            Self::Reviewing => "The work has been taken for review by the reviewer.",
            Self::Rejected => "The work has been reviewed: the reviewer has comments.",
        }
    }
}

/// A single submission entry, validated out of the raw API payload
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkRecord {
    pub homework_name: CompactString,
    pub status: HomeworkStatus,
}

impl HomeworkRecord {
    pub fn from_value(value: &Value) -> Result<Self> {
        let homework_name = value
            .get("homework_name")
            .and_then(Value::as_str)
            .ok_or_else(|| WatchError::missing_field("homework_name"))?;

        let code = value
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| WatchError::missing_field("status"))?;

        let status = HomeworkStatus::from_code(code)
            .ok_or_else(|| WatchError::UnknownStatus(code.into()))?;

        Ok(Self { homework_name: homework_name.into(), status })
    }

    pub fn message(&self) -> CompactString {
        format_compact!(
            "Changed review status of \"{}\". {}",
            self.homework_name,
            self.status.verdict()
        )
    }
}

/// Extract the homework list from a decoded API response
pub fn check_response(response: &Value) -> Result<&[Value]> {
    let homeworks = response
        .as_object()
        .and_then(|body| body.get(HOMEWORKS_KEY))
        .filter(|homeworks| !homeworks.is_null())
        .ok_or_else(|| WatchError::missing_key(HOMEWORKS_KEY))?;

    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| WatchError::Shape {
            key: HOMEWORKS_KEY.into(),
            found: json_type_name(homeworks).into(),
        })
}

/// Format the notification text for one homework record
pub fn parse_status(homework: &Value) -> Result<CompactString> {
    HomeworkRecord::from_value(homework).map(|record| record.message())
}

/// Server reported time of the response, when it is usable as the next cursor
pub fn current_date(response: &Value) -> Option<Cursor> {
    let value = response.get(CURRENT_DATE_KEY)?;
    match value.as_i64() {
        Some(secs) => Some(Cursor::from_secs(secs)),
        None => {
            warn!(found = json_type_name(value), "Ignoring non-integer current_date");
            None
        },
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
