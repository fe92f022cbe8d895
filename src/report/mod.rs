//! Status aggregation core.
//!
//! Raw task/result records flow one direction through this module:
//! results are reduced to the most recent per (service, destination), then
//! folded with the task list into facility, resource and service summaries.
//! Everything here is a pure in-memory computation over data the caller
//! already fetched; nothing is persisted.

pub mod aggregator;
pub mod builder;
pub mod reducer;
pub mod resources;
pub mod services;

pub use aggregator::aggregate;
pub use builder::{all_facility_states, organization_facility_states};
pub use reducer::{ResultKey, latest_results};
pub use resources::resource_state;
pub use services::service_states;
