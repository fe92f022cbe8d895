//! Computed summary states.
//!
//! These are transient read-side views: constructed fresh per request, never
//! persisted, never mutated after the fold that builds them.

use crate::domain::{Facility, Resource, Service, Task};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Propagation state of a facility or one of its destinations.
///
/// Variant order is the fold priority: the overall facility state is the
/// maximum contribution across its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropagationState {
    /// No information (no tasks, or no result for a destination yet).
    NotDetermined,
    /// Fully synchronized.
    Ok,
    /// Still propagating.
    Processing,
    /// At least one task or delivery failed.
    Error,
}

/// Overall propagation summary for one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityState {
    pub facility: Facility,

    /// Rolled-up state across all of the facility's tasks.
    pub state: PropagationState,

    /// Per-destination state, keyed by endpoint identifier.
    pub destinations: BTreeMap<String, PropagationState>,
}

impl FacilityState {
    /// Summary with no task information at all.
    pub fn not_determined(facility: Facility) -> Self {
        Self {
            facility,
            state: PropagationState::NotDetermined,
            destinations: BTreeMap::new(),
        }
    }
}

/// A resource paired with the raw task list of its facility.
///
/// No reduction happens here; callers drill into the tasks themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource: Resource,
    pub tasks: Vec<Task>,
}

/// Summary row for one (service, facility) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceState {
    pub service: Service,
    pub facility: Facility,

    /// Whether the service is administratively blocked on the facility.
    pub blocked: bool,

    /// Whether the service has any destination configured on the facility.
    pub has_destinations: bool,

    /// The service's current task on the facility, if one exists.
    pub task: Option<Task>,
}

impl ServiceState {
    pub fn new(service: Service, facility: Facility) -> Self {
        Self {
            service,
            facility,
            blocked: false,
            has_destinations: false,
            task: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propagation_state_priority_order() {
        assert!(PropagationState::NotDetermined < PropagationState::Ok);
        assert!(PropagationState::Ok < PropagationState::Processing);
        assert!(PropagationState::Processing < PropagationState::Error);
    }

    #[test]
    fn test_propagation_state_max_is_fold_priority() {
        let states = [
            PropagationState::Ok,
            PropagationState::Error,
            PropagationState::Processing,
        ];
        assert_eq!(
            states.iter().copied().max(),
            Some(PropagationState::Error)
        );
    }

    #[test]
    fn test_propagation_state_serde_names() {
        assert_eq!(
            serde_json::to_string(&PropagationState::NotDetermined).unwrap(),
            "\"NOT_DETERMINED\""
        );
        assert_eq!(
            serde_json::to_string(&PropagationState::Processing).unwrap(),
            "\"PROCESSING\""
        );
    }

    #[test]
    fn test_not_determined_facility_state() {
        let state = FacilityState::not_determined(Facility::new(1, "f"));
        assert_eq!(state.state, PropagationState::NotDetermined);
        assert!(state.destinations.is_empty());
    }

    #[test]
    fn test_service_state_defaults() {
        let state = ServiceState::new(Service::new(1, "s"), Facility::new(2, "f"));
        assert!(!state.blocked);
        assert!(!state.has_destinations);
        assert!(state.task.is_none());
    }
}
