//! Domain types for syncstate
//!
//! This module contains all core domain types:
//! - Task: one scheduled/executed propagation of a service to a facility
//! - TaskResult: outcome of delivering one task to one destination
//! - Facility/Service/Resource/Organization: topology identities
//! - FacilityState/ResourceState/ServiceState: computed summary views

pub mod entities;
pub mod result;
pub mod state;
pub mod task;

pub use entities::{Facility, Organization, Resource, Service};
pub use result::{TaskResult, TaskResultStatus};
pub use state::{FacilityState, PropagationState, ResourceState, ServiceState};
pub use task::{Task, TaskStatus};
