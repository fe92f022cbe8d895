//! Task result records.
//!
//! A task result is the outcome of delivering one task to one destination of
//! one service. Result ids are monotonically increasing and serve as the sole
//! recency signal: among all results for a (task, service, destination)
//! triple, the highest id is authoritative.

use crate::domain::Service;
use crate::error::SyncstateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskResultStatus {
    Done,
    Error,
}

impl TaskResultStatus {
    /// Canonical uppercase form, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskResultStatus::Done => "DONE",
            TaskResultStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for TaskResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskResultStatus {
    type Err = SyncstateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DONE" => Ok(TaskResultStatus::Done),
            "ERROR" => Ok(TaskResultStatus::Error),
            _ => Err(SyncstateError::UnknownResultStatus(s.to_string())),
        }
    }
}

/// Outcome of delivering one task to one destination of one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Store-assigned identity, monotonically increasing.
    pub id: i32,

    /// Task this result belongs to.
    pub task_id: i32,

    /// Service the delivery was for.
    pub service: Service,

    /// Endpoint the delivery went to (host or URL).
    pub destination: String,

    /// Delivery outcome.
    pub status: TaskResultStatus,

    /// Exit code of the delivery script.
    pub return_code: i32,

    /// Captured stdout, if any.
    pub standard_message: Option<String>,

    /// Captured stderr, if any.
    pub error_message: Option<String>,

    /// When the result was recorded.
    pub timestamp: Option<DateTime<Utc>>,
}

impl TaskResult {
    /// Create a result with the given identity and outcome.
    pub fn new(
        id: i32,
        task_id: i32,
        service: Service,
        destination: impl Into<String>,
        status: TaskResultStatus,
    ) -> Self {
        Self {
            id,
            task_id,
            service,
            destination: destination.into(),
            status,
            return_code: 0,
            standard_message: None,
            error_message: None,
            timestamp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_status_roundtrip() {
        assert_eq!("DONE".parse::<TaskResultStatus>().unwrap(), TaskResultStatus::Done);
        assert_eq!("error".parse::<TaskResultStatus>().unwrap(), TaskResultStatus::Error);
    }

    #[test]
    fn test_result_status_unknown_is_fatal() {
        let err = "MAYBE".parse::<TaskResultStatus>().unwrap_err();
        assert!(matches!(err, SyncstateError::UnknownResultStatus(s) if s == "MAYBE"));
    }

    #[test]
    fn test_new_result_defaults() {
        let result = TaskResult::new(1, 10, Service::new(2, "s"), "host1", TaskResultStatus::Done);
        assert_eq!(result.return_code, 0);
        assert!(result.standard_message.is_none());
        assert!(result.error_message.is_none());
        assert!(result.timestamp.is_none());
    }

    #[test]
    fn test_result_serialization_roundtrip() {
        let result = TaskResult::new(1, 10, Service::new(2, "s"), "host1", TaskResultStatus::Error);
        let json = serde_json::to_string(&result).unwrap();
        let restored: TaskResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, restored);
    }
}
