//! Storage layer for syncstate.
//!
//! [`traits`] defines the consumed interfaces: [`TaskStore`] for task/result
//! persistence and [`Topology`] for facility/service/destination enumeration.
//! [`sqlite`] ships a rusqlite-backed [`TaskStore`]; a [`Topology`]
//! implementation is the caller's concern.

mod sqlite;
mod traits;

pub use sqlite::SqliteTaskStore;
pub use traits::{TaskStore, Topology};
