//! Facility state report assembly.
//!
//! Orchestrates the per-facility aggregation across a set of facilities,
//! either a pre-sorted listing or the facilities reachable through an
//! organization's resources. The aggregation itself is injected so these
//! stay pure over their inputs.

use crate::domain::{Facility, FacilityState, Resource};
use crate::error::Result;
use std::collections::HashSet;

/// Aggregate every facility in the given (pre-sorted) order.
///
/// Input ordering is preserved; no re-sort happens here.
pub fn all_facility_states<F>(facilities: &[Facility], mut state_for: F) -> Result<Vec<FacilityState>>
where
    F: FnMut(&Facility) -> Result<FacilityState>,
{
    let mut states = Vec::with_capacity(facilities.len());
    for facility in facilities {
        states.push(state_for(facility)?);
    }
    Ok(states)
}

/// Aggregate the facilities reachable through an organization's resources.
///
/// Multiple resources can share a facility, so facilities are deduplicated by
/// id before aggregation. The resulting states are sorted by facility, a
/// deliberate re-sort distinct from the plain all-facilities path (resource
/// traversal order is meaningless to the reader).
pub fn organization_facility_states<F>(
    resources: &[Resource],
    mut state_for: F,
) -> Result<Vec<FacilityState>>
where
    F: FnMut(&Facility) -> Result<FacilityState>,
{
    let mut seen: HashSet<i32> = HashSet::new();
    let mut states = Vec::new();

    for resource in resources {
        if seen.insert(resource.facility.id) {
            states.push(state_for(&resource.facility)?);
        }
    }

    states.sort_by(|a, b| a.facility.cmp(&b.facility));
    Ok(states)
}
