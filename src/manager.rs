//! Task manager facade.
//!
//! `TasksManager` ties a [`TaskStore`] and a [`Topology`] together: plain
//! pass-through for task/result CRUD, plus the report entry points that wire
//! stored records into the aggregation core. It holds no state of its own and
//! computes every report fresh per call.

use crate::domain::{
    Facility, FacilityState, Organization, ResourceState, Service, ServiceState, Task, TaskResult,
    TaskStatus,
};
use crate::error::Result;
use crate::report::{
    aggregate, all_facility_states, latest_results, organization_facility_states, resource_state,
    service_states,
};
use crate::store::{TaskStore, Topology};
use log::debug;

pub struct TasksManager<S, T> {
    store: S,
    topology: T,
}

impl<S: TaskStore, T: Topology> TasksManager<S, T> {
    pub fn new(store: S, topology: T) -> Self {
        Self { store, topology }
    }

    //=== Task pass-through ===

    pub fn schedule_task(&mut self, task: &Task) -> Result<i32> {
        self.store.schedule_task(task)
    }

    pub fn get_task(&self, service: &Service, facility: &Facility) -> Result<Option<Task>> {
        self.store.get_task(service.id, facility.id)
    }

    pub fn get_task_by_id(&self, id: i32) -> Result<Option<Task>> {
        self.store.get_task_by_id(id)
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.store.list_tasks()
    }

    pub fn list_tasks_for_facility(&self, facility: &Facility) -> Result<Vec<Task>> {
        self.store.list_tasks_for_facility(facility.id)
    }

    pub fn list_tasks_in_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        self.store.list_tasks_in_status(status)
    }

    pub fn update_task(&mut self, task: &Task) -> Result<()> {
        self.store.update_task(task)
    }

    pub fn remove_task(&mut self, id: i32) -> Result<()> {
        self.store.remove_task(id)
    }

    pub fn count_tasks(&self) -> Result<usize> {
        self.store.count_tasks()
    }

    /// Remove a task together with all of its results.
    pub fn delete_task(&mut self, task: &Task) -> Result<()> {
        let cleared = self.store.clear_results_for_task(task.id)?;
        debug!("deleting task {} ({cleared} results cleared)", task.id);
        self.store.remove_task(task.id)
    }

    //=== Result pass-through ===

    pub fn insert_result(&mut self, result: &TaskResult) -> Result<i32> {
        self.store.insert_result(result)
    }

    pub fn result_by_id(&self, id: i32) -> Result<Option<TaskResult>> {
        self.store.result_by_id(id)
    }

    pub fn results_for_task(&self, task_id: i32) -> Result<Vec<TaskResult>> {
        self.store.results_for_task(task_id)
    }

    /// Only the most recent result per (service, destination) of one task.
    pub fn latest_results_for_task(&self, task_id: i32) -> Result<Vec<TaskResult>> {
        let reduced = latest_results(self.store.results_for_task(task_id)?);
        Ok(reduced.into_values().collect())
    }

    pub fn results_for_destinations(&self, destinations: &[String]) -> Result<Vec<TaskResult>> {
        self.store.results_for_destinations(destinations)
    }

    pub fn clear_results_for_task(&mut self, task_id: i32) -> Result<usize> {
        self.store.clear_results_for_task(task_id)
    }

    pub fn clear_old_results(&mut self, days: u32) -> Result<usize> {
        self.store.clear_old_results(days)
    }

    //=== Reports ===

    /// Overall and per-destination propagation state of one facility.
    pub fn facility_state(&self, facility: &Facility) -> Result<FacilityState> {
        let tasks = self.store.list_tasks_for_facility(facility.id)?;
        let destinations = self.topology.destinations_for_facility(facility)?;
        debug!(
            "aggregating facility {} ({} tasks, {} destinations)",
            facility.name,
            tasks.len(),
            destinations.len()
        );
        aggregate(facility, &tasks, &destinations, |task| {
            self.store.results_for_task(task.id)
        })
    }

    /// States of all visible facilities, ordered by facility.
    pub fn all_facility_states(&self) -> Result<Vec<FacilityState>> {
        let mut facilities = self.topology.list_facilities()?;
        facilities.sort();
        all_facility_states(&facilities, |f| self.facility_state(f))
    }

    /// States of the facilities reachable through an organization's
    /// resources, deduplicated and ordered by facility.
    pub fn facility_states_for_organization(
        &self,
        organization: &Organization,
    ) -> Result<Vec<FacilityState>> {
        let resources = self.topology.resources_for_organization(organization)?;
        organization_facility_states(&resources, |f| self.facility_state(f))
    }

    /// Each of an organization's resources paired with its facility's tasks.
    pub fn resource_states(&self, organization: &Organization) -> Result<Vec<ResourceState>> {
        let resources = self.topology.resources_for_organization(organization)?;
        let mut states = Vec::with_capacity(resources.len());
        for resource in resources {
            let tasks = self.store.list_tasks_for_facility(resource.facility.id)?;
            states.push(resource_state(resource, tasks));
        }
        Ok(states)
    }

    /// One summary row per service on a facility.
    pub fn facility_service_states(&self, facility: &Facility) -> Result<Vec<ServiceState>> {
        let assigned = self.topology.assigned_services(facility)?;
        let tasks = self.store.list_tasks_for_facility(facility.id)?;
        service_states(
            facility,
            &assigned,
            tasks,
            |s, f| self.topology.is_service_blocked(s, f),
            |s, f| self.topology.has_destinations(s, f),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PropagationState, Resource, TaskResultStatus};
    use crate::store::SqliteTaskStore;
    use std::collections::{HashMap, HashSet};

    /// In-memory topology fixture.
    #[derive(Default)]
    struct MemoryTopology {
        facilities: Vec<Facility>,
        destinations: HashMap<i32, Vec<String>>,
        assigned: HashMap<i32, Vec<Service>>,
        blocked: HashSet<(i32, i32)>,
        resources: HashMap<i32, Vec<Resource>>,
    }

    impl Topology for MemoryTopology {
        fn destinations_for_facility(&self, facility: &Facility) -> Result<Vec<String>> {
            Ok(self.destinations.get(&facility.id).cloned().unwrap_or_default())
        }

        fn assigned_services(&self, facility: &Facility) -> Result<Vec<Service>> {
            Ok(self.assigned.get(&facility.id).cloned().unwrap_or_default())
        }

        fn is_service_blocked(&self, service: &Service, facility: &Facility) -> Result<bool> {
            Ok(self.blocked.contains(&(service.id, facility.id)))
        }

        fn has_destinations(&self, _service: &Service, facility: &Facility) -> Result<bool> {
            Ok(!self.destinations.get(&facility.id).map_or(true, Vec::is_empty))
        }

        fn list_facilities(&self) -> Result<Vec<Facility>> {
            Ok(self.facilities.clone())
        }

        fn resources_for_organization(&self, organization: &Organization) -> Result<Vec<Resource>> {
            Ok(self.resources.get(&organization.id).cloned().unwrap_or_default())
        }
    }

    fn facility() -> Facility {
        Facility::new(1, "cluster-a")
    }

    fn service() -> Service {
        Service::new(2, "mailman")
    }

    fn manager() -> TasksManager<SqliteTaskStore, MemoryTopology> {
        let topology = MemoryTopology {
            facilities: vec![facility()],
            destinations: HashMap::from([(1, vec!["host1".to_string(), "host2".to_string()])]),
            assigned: HashMap::from([(1, vec![service()])]),
            ..Default::default()
        };
        TasksManager::new(SqliteTaskStore::open_in_memory().unwrap(), topology)
    }

    #[test]
    fn test_task_crud_pass_through() {
        let mut manager = manager();
        let id = manager.schedule_task(&Task::new(0, facility(), service())).unwrap();

        assert_eq!(manager.count_tasks().unwrap(), 1);
        let task = manager.get_task(&service(), &facility()).unwrap().unwrap();
        assert_eq!(task.id, id);

        manager.remove_task(id).unwrap();
        assert_eq!(manager.count_tasks().unwrap(), 0);
    }

    #[test]
    fn test_latest_results_for_task_reduces() {
        let mut manager = manager();
        let task_id = manager.schedule_task(&Task::new(0, facility(), service())).unwrap();

        for status in [TaskResultStatus::Done, TaskResultStatus::Error] {
            manager
                .insert_result(&TaskResult::new(0, task_id, service(), "host1", status))
                .unwrap();
        }

        let latest = manager.latest_results_for_task(task_id).unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].status, TaskResultStatus::Error);
    }

    #[test]
    fn test_delete_task_clears_results() {
        let mut manager = manager();
        let task_id = manager.schedule_task(&Task::new(0, facility(), service())).unwrap();
        manager
            .insert_result(&TaskResult::new(
                0,
                task_id,
                service(),
                "host1",
                TaskResultStatus::Done,
            ))
            .unwrap();

        let task = manager.get_task_by_id(task_id).unwrap().unwrap();
        manager.delete_task(&task).unwrap();

        assert!(manager.get_task_by_id(task_id).unwrap().is_none());
        assert!(manager.results_for_task(task_id).unwrap().is_empty());
    }

    #[test]
    fn test_facility_state_wires_store_and_topology() {
        let mut manager = manager();
        let task_id = manager
            .schedule_task(&Task::new(0, facility(), service()).with_status(TaskStatus::Generating))
            .unwrap();
        manager
            .insert_result(&TaskResult::new(
                0,
                task_id,
                service(),
                "host1",
                TaskResultStatus::Done,
            ))
            .unwrap();

        let state = manager.facility_state(&facility()).unwrap();
        assert_eq!(state.state, PropagationState::Processing);
        assert_eq!(state.destinations["host1"], PropagationState::Ok);
        assert_eq!(state.destinations["host2"], PropagationState::NotDetermined);
    }

    #[test]
    fn test_facility_state_without_tasks() {
        let manager = manager();
        let state = manager.facility_state(&facility()).unwrap();
        assert_eq!(state.state, PropagationState::NotDetermined);
        assert!(state.destinations.is_empty());
    }

    #[test]
    fn test_all_facility_states_sorted_by_facility() {
        let mut manager = manager();
        manager.topology.facilities = vec![Facility::new(2, "zeta"), Facility::new(3, "alpha")];

        let states = manager.all_facility_states().unwrap();
        let names: Vec<&str> = states.iter().map(|s| s.facility.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_resource_states_attach_facility_tasks() {
        let mut manager = manager();
        manager.schedule_task(&Task::new(0, facility(), service())).unwrap();

        let organization = Organization::new(5, "acme");
        manager.topology.resources = HashMap::from([(
            5,
            vec![
                Resource::new(10, "storage", facility()),
                Resource::new(11, "compute", Facility::new(9, "empty")),
            ],
        )]);

        let states = manager.resource_states(&organization).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].tasks.len(), 1);
        assert!(states[1].tasks.is_empty());
    }

    #[test]
    fn test_organization_facility_states_dedupe_and_sort() {
        let mut manager = manager();
        let organization = Organization::new(5, "acme");
        manager.topology.resources = HashMap::from([(
            5,
            vec![
                Resource::new(10, "a", Facility::new(2, "zeta")),
                Resource::new(11, "b", Facility::new(2, "zeta")),
                Resource::new(12, "c", facility()),
            ],
        )]);

        let states = manager.facility_states_for_organization(&organization).unwrap();
        assert_eq!(states.len(), 2);
        let names: Vec<&str> = states.iter().map(|s| s.facility.name.as_str()).collect();
        assert_eq!(names, vec!["cluster-a", "zeta"]);
    }

    #[test]
    fn test_facility_service_states_flags() {
        let mut manager = manager();
        manager.topology.blocked.insert((service().id, facility().id));
        manager.schedule_task(&Task::new(0, facility(), service())).unwrap();

        let states = manager.facility_service_states(&facility()).unwrap();
        assert_eq!(states.len(), 1);
        assert!(states[0].blocked);
        assert!(states[0].has_destinations);
        assert!(states[0].task.is_some());
    }
}
