//! Resource state composition.

use crate::domain::{Resource, ResourceState, Task};

/// Pair a resource with the unreduced task list of its facility.
///
/// Pure composition: no aggregation, no filtering. Callers drill into the
/// attached tasks themselves.
pub fn resource_state(resource: Resource, tasks: Vec<Task>) -> ResourceState {
    ResourceState { resource, tasks }
}
