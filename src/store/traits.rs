//! Consumed-interface traits.
//!
//! The aggregation core reads tasks and results through [`TaskStore`] and the
//! propagation topology (facilities, services, destinations, resources)
//! through [`Topology`]. Both are satisfied by external collaborators; the
//! crate ships a SQLite [`TaskStore`] and leaves [`Topology`] to callers.
//!
//! Callers are responsible for a consistent snapshot across the calls made
//! within one aggregation; the core does not re-validate identity existence.

use crate::domain::{Facility, Organization, Resource, Service, Task, TaskResult, TaskStatus};
use crate::error::Result;

/// Persistence for task and task-result records.
pub trait TaskStore {
    /// Insert a new task, returning its store-assigned id.
    fn schedule_task(&mut self, task: &Task) -> Result<i32>;

    /// The current task for a (service, facility) pair, if any.
    fn get_task(&self, service_id: i32, facility_id: i32) -> Result<Option<Task>>;

    /// Look up a task by id.
    fn get_task_by_id(&self, id: i32) -> Result<Option<Task>>;

    /// All tasks.
    fn list_tasks(&self) -> Result<Vec<Task>>;

    /// All tasks on one facility.
    fn list_tasks_for_facility(&self, facility_id: i32) -> Result<Vec<Task>>;

    /// All tasks in one lifecycle status.
    fn list_tasks_in_status(&self, status: TaskStatus) -> Result<Vec<Task>>;

    /// Update an existing task.
    fn update_task(&mut self, task: &Task) -> Result<()>;

    /// Remove a task by id.
    fn remove_task(&mut self, id: i32) -> Result<()>;

    /// Number of stored tasks.
    fn count_tasks(&self) -> Result<usize>;

    /// Insert a new result, returning its store-assigned id. Ids increase
    /// monotonically; they are the recency signal for reduction.
    fn insert_result(&mut self, result: &TaskResult) -> Result<i32>;

    /// Look up a result by id.
    fn result_by_id(&self, id: i32) -> Result<Option<TaskResult>>;

    /// All results for one task.
    fn results_for_task(&self, task_id: i32) -> Result<Vec<TaskResult>>;

    /// All results targeting any of the given destinations.
    fn results_for_destinations(&self, destinations: &[String]) -> Result<Vec<TaskResult>>;

    /// Delete all results of one task, returning how many were removed.
    fn clear_results_for_task(&mut self, task_id: i32) -> Result<usize>;

    /// Delete results older than the given number of days.
    fn clear_old_results(&mut self, days: u32) -> Result<usize>;
}

/// Enumeration of the propagation topology.
pub trait Topology {
    /// Known destination endpoints of a facility, independent of whether any
    /// task has produced a result for them yet.
    fn destinations_for_facility(&self, facility: &Facility) -> Result<Vec<String>>;

    /// Services currently assigned to a facility.
    fn assigned_services(&self, facility: &Facility) -> Result<Vec<Service>>;

    /// Whether a service is administratively blocked on a facility.
    fn is_service_blocked(&self, service: &Service, facility: &Facility) -> Result<bool>;

    /// Whether a service has any destination configured on a facility.
    fn has_destinations(&self, service: &Service, facility: &Facility) -> Result<bool>;

    /// All facilities visible to the caller.
    fn list_facilities(&self) -> Result<Vec<Facility>>;

    /// Resources of an organization, each carrying its facility.
    fn resources_for_organization(&self, organization: &Organization) -> Result<Vec<Resource>>;
}
