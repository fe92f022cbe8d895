//! Result reduction: most recent result per (service, destination).
//!
//! Result ids are the sole recency signal. Reduction is a pure, single-pass
//! fold over a task's result records.

use crate::domain::TaskResult;
use std::collections::HashMap;

/// Key for one reduced result: (service id, destination).
pub type ResultKey = (i32, String);

/// Reduce a task's results to the most recent one per (service, destination).
///
/// A result replaces the kept entry for its key only when its id is strictly
/// greater. Output holds exactly one result per key seen in the input.
pub fn latest_results(results: Vec<TaskResult>) -> HashMap<ResultKey, TaskResult> {
    let mut latest: HashMap<ResultKey, TaskResult> = HashMap::new();

    for result in results {
        let key = (result.service.id, result.destination.clone());
        match latest.get(&key) {
            Some(kept) if kept.id >= result.id => {}
            _ => {
                latest.insert(key, result);
            }
        }
    }

    latest
}
