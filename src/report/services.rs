//! Per-service state rows for one facility.
//!
//! Merges the services currently assigned to a facility with the services
//! that have an active task there, producing one row per service with its
//! blocked and has-destinations flags.

use crate::domain::{Facility, Service, ServiceState, Task};
use crate::error::Result;
use std::collections::HashMap;

/// Build one [`ServiceState`] row per service on a facility.
///
/// Starts with a row per assigned service, flags filled via the callbacks.
/// Then each task on the facility is attached to its service's row; a service
/// with a task but no current assignment gets a row synthesized the same way.
/// At most one task exists per (service, facility), so attachment is a set,
/// not an append. Output order is unspecified.
pub fn service_states<B, D>(
    facility: &Facility,
    assigned_services: &[Service],
    tasks: Vec<Task>,
    mut blocked_check: B,
    mut has_destinations_check: D,
) -> Result<Vec<ServiceState>>
where
    B: FnMut(&Service, &Facility) -> Result<bool>,
    D: FnMut(&Service, &Facility) -> Result<bool>,
{
    let mut states: HashMap<i32, ServiceState> = HashMap::new();

    for service in assigned_services {
        let mut state = ServiceState::new(service.clone(), facility.clone());
        state.blocked = blocked_check(service, facility)?;
        state.has_destinations = has_destinations_check(service, facility)?;
        states.insert(service.id, state);
    }

    for task in tasks {
        let Some(service) = task.service.clone() else {
            continue;
        };

        let state = match states.entry(service.id) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                // Task for a service no longer assigned to the facility.
                let mut state = ServiceState::new(service.clone(), facility.clone());
                state.has_destinations = has_destinations_check(&service, facility)?;
                entry.insert(state)
            }
        };

        state.blocked = blocked_check(&service, facility)?;
        state.task = Some(task);
    }

    Ok(states.into_values().collect())
}
