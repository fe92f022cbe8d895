//! Syncstate - propagation status rollup for managed facilities
//!
//! Syncstate tracks the asynchronous propagation of service data from a
//! central authority to managed facilities. It folds raw task and
//! per-destination result records into live, human-readable summaries:
//! per-facility, per-resource and per-service states. The summaries are
//! transient read-side views, recomputed on each request; nothing here
//! schedules or executes propagation.

pub mod domain;
pub mod error;
pub mod manager;
pub mod report;
pub mod store;

pub use error::{Result, SyncstateError};
pub use manager::TasksManager;
