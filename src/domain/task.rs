//! Task record and lifecycle status.
//!
//! A task is one scheduled/executed unit of propagating a service to a
//! facility. The external store owns task identity and lifecycle; this crate
//! only reads them.

use crate::domain::{Facility, Service};
use crate::error::SyncstateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a propagation task.
///
/// The vocabulary is closed: parsing any other string is a fatal
/// data-integrity error, never a silent coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Waiting,
    Planned,
    Generating,
    Generated,
    Sending,
    Done,
    Generror,
    Senderror,
    Error,
}

impl TaskStatus {
    /// Returns true if the task is still propagating.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            TaskStatus::Waiting
                | TaskStatus::Planned
                | TaskStatus::Generating
                | TaskStatus::Generated
                | TaskStatus::Sending
        )
    }

    /// Returns true if the task ended in failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TaskStatus::Generror | TaskStatus::Senderror | TaskStatus::Error
        )
    }

    /// Canonical uppercase form, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Waiting => "WAITING",
            TaskStatus::Planned => "PLANNED",
            TaskStatus::Generating => "GENERATING",
            TaskStatus::Generated => "GENERATED",
            TaskStatus::Sending => "SENDING",
            TaskStatus::Done => "DONE",
            TaskStatus::Generror => "GENERROR",
            TaskStatus::Senderror => "SENDERROR",
            TaskStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = SyncstateError;

    /// Case-insensitive parse of the closed status vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WAITING" => Ok(TaskStatus::Waiting),
            "PLANNED" => Ok(TaskStatus::Planned),
            "GENERATING" => Ok(TaskStatus::Generating),
            "GENERATED" => Ok(TaskStatus::Generated),
            "SENDING" => Ok(TaskStatus::Sending),
            "DONE" => Ok(TaskStatus::Done),
            "GENERROR" => Ok(TaskStatus::Generror),
            "SENDERROR" => Ok(TaskStatus::Senderror),
            "ERROR" => Ok(TaskStatus::Error),
            _ => Err(SyncstateError::UnknownTaskStatus(s.to_string())),
        }
    }
}

/// One scheduled/executed propagation of a service to a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identity.
    pub id: i32,

    /// Facility the service is propagated to.
    pub facility: Facility,

    /// Service being propagated. Absent for tasks whose service was removed
    /// out from under them.
    pub service: Option<Service>,

    /// Lifecycle status.
    pub status: TaskStatus,

    /// When the task is scheduled to run.
    pub schedule: Option<DateTime<Utc>>,

    /// When execution started.
    pub start_time: Option<DateTime<Utc>>,

    /// When execution ended.
    pub end_time: Option<DateTime<Utc>>,

    /// Delay in minutes before a rescheduled run.
    pub delay: i32,

    /// Recurrence interval.
    pub recurrence: i32,

    /// Execution engine that owns the task, if any.
    pub engine_id: Option<i32>,
}

impl Task {
    /// Create a new waiting task for a service on a facility.
    pub fn new(id: i32, facility: Facility, service: Service) -> Self {
        Self {
            id,
            facility,
            service: Some(service),
            status: TaskStatus::Waiting,
            schedule: None,
            start_time: None,
            end_time: None,
            delay: 0,
            recurrence: 0,
            engine_id: None,
        }
    }

    /// Builder-style status override.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_all_variants() {
        let all = [
            TaskStatus::Waiting,
            TaskStatus::Planned,
            TaskStatus::Generating,
            TaskStatus::Generated,
            TaskStatus::Sending,
            TaskStatus::Done,
            TaskStatus::Generror,
            TaskStatus::Senderror,
            TaskStatus::Error,
        ];
        for status in all {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("sending".parse::<TaskStatus>().unwrap(), TaskStatus::Sending);
        assert_eq!("Done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert_eq!("genERROR".parse::<TaskStatus>().unwrap(), TaskStatus::Generror);
    }

    #[test]
    fn test_status_parse_unknown_is_fatal() {
        let err = "SHIPPING".parse::<TaskStatus>().unwrap_err();
        assert!(matches!(err, SyncstateError::UnknownTaskStatus(s) if s == "SHIPPING"));
    }

    #[test]
    fn test_status_partitions() {
        assert!(TaskStatus::Waiting.is_in_progress());
        assert!(TaskStatus::Planned.is_in_progress());
        assert!(TaskStatus::Generating.is_in_progress());
        assert!(TaskStatus::Generated.is_in_progress());
        assert!(TaskStatus::Sending.is_in_progress());
        assert!(!TaskStatus::Done.is_in_progress());
        assert!(!TaskStatus::Error.is_in_progress());

        assert!(TaskStatus::Generror.is_failure());
        assert!(TaskStatus::Senderror.is_failure());
        assert!(TaskStatus::Error.is_failure());
        assert!(!TaskStatus::Done.is_failure());
        assert!(!TaskStatus::Waiting.is_failure());
    }

    #[test]
    fn test_status_serde_uses_uppercase() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Generror).unwrap(),
            "\"GENERROR\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"SENDING\"").unwrap(),
            TaskStatus::Sending
        );
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new(1, Facility::new(1, "f"), Service::new(2, "s"));
        assert_eq!(task.status, TaskStatus::Waiting);
        assert!(task.schedule.is_none());
        assert!(task.engine_id.is_none());
        assert_eq!(task.delay, 0);
        assert_eq!(task.recurrence, 0);
    }

    #[test]
    fn test_with_status() {
        let task = Task::new(1, Facility::new(1, "f"), Service::new(2, "s"))
            .with_status(TaskStatus::Sending);
        assert_eq!(task.status, TaskStatus::Sending);
    }
}
