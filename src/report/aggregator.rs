//! Facility status aggregation.
//!
//! Folds a facility's task list, with each task's reduced per-destination
//! results, into one overall propagation state and one state per destination.
//! The fold is a pure in-memory computation; the only collaborator is the
//! result fetcher supplied by the caller.

use crate::domain::{
    Facility, FacilityState, PropagationState, Task, TaskResult, TaskResultStatus, TaskStatus,
};
use crate::error::Result;
use crate::report::reducer::latest_results;
use std::collections::BTreeMap;

/// What a single task contributes to the overall facility state.
///
/// WAITING and DONE contribute nothing. WAITING in particular is invisible to
/// the rollup even though it counts as in-progress elsewhere; callers relying
/// on the rollup will not see tasks stuck in WAITING.
fn contribution(status: TaskStatus) -> Option<PropagationState> {
    match status {
        TaskStatus::Generating | TaskStatus::Generated | TaskStatus::Planned | TaskStatus::Sending => {
            Some(PropagationState::Processing)
        }
        TaskStatus::Error | TaskStatus::Generror | TaskStatus::Senderror => {
            Some(PropagationState::Error)
        }
        TaskStatus::Waiting | TaskStatus::Done => None,
    }
}

/// Aggregate a facility's tasks into a [`FacilityState`].
///
/// With no tasks the state is NOT_DETERMINED with an empty destination map:
/// propagation state is undefined absent any task, not "ok". Otherwise every
/// known destination is seeded NOT_DETERMINED and the overall state is the
/// maximum contribution across tasks (ERROR > PROCESSING > OK), defaulting to
/// OK. The fold is commutative: task order never changes the outcome.
///
/// Per destination: an ERROR result is written unconditionally and is sticky
/// for the rest of the pass; a DONE result only upgrades an entry still at
/// NOT_DETERMINED. ERROR results may insert destinations outside the known
/// set; DONE results never insert.
pub fn aggregate<F>(
    facility: &Facility,
    tasks: &[Task],
    known_destinations: &[String],
    mut fetch_results: F,
) -> Result<FacilityState>
where
    F: FnMut(&Task) -> Result<Vec<TaskResult>>,
{
    if tasks.is_empty() {
        return Ok(FacilityState::not_determined(facility.clone()));
    }

    let mut destinations: BTreeMap<String, PropagationState> = known_destinations
        .iter()
        .map(|d| (d.clone(), PropagationState::NotDetermined))
        .collect();

    let state = tasks
        .iter()
        .filter_map(|task| contribution(task.status))
        .fold(PropagationState::Ok, PropagationState::max);

    for task in tasks {
        if task.service.is_none() {
            continue;
        }

        let reduced = latest_results(fetch_results(task)?);
        for result in reduced.values() {
            match result.status {
                TaskResultStatus::Error => {
                    destinations.insert(result.destination.clone(), PropagationState::Error);
                }
                TaskResultStatus::Done => {
                    if destinations.get(&result.destination)
                        == Some(&PropagationState::NotDetermined)
                    {
                        destinations.insert(result.destination.clone(), PropagationState::Ok);
                    }
                }
            }
        }
    }

    Ok(FacilityState {
        facility: facility.clone(),
        state,
        destinations,
    })
}
