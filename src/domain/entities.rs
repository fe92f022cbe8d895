//! Identity types for the propagation topology.
//!
//! Facilities, services, resources and organizations are owned by external
//! collaborators; syncstate only carries their identities through the
//! aggregation. Destinations are plain string endpoint identifiers (host or
//! URL) and have no dedicated type.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A managed facility that services are propagated to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facility {
    pub id: i32,
    pub name: String,
}

impl Facility {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Facilities order by name, then id, so reports list them alphabetically.
impl Ord for Facility {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Facility {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A service propagated to facilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Service {
    pub id: i32,
    pub name: String,
}

impl Service {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// A resource binding an organization to a facility.
///
/// Carries its owning facility so organization-scoped reports can
/// deduplicate facilities reached through multiple resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i32,
    pub name: String,
    pub facility: Facility,
}

impl Resource {
    pub fn new(id: i32, name: impl Into<String>, facility: Facility) -> Self {
        Self {
            id,
            name: name.into(),
            facility,
        }
    }
}

/// A virtual organization whose resources span facilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Organization {
    pub id: i32,
    pub name: String,
}

impl Organization {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_orders_by_name_then_id() {
        let alpha = Facility::new(9, "alpha");
        let beta = Facility::new(1, "beta");
        assert!(alpha < beta);

        let alpha_twin = Facility::new(10, "alpha");
        assert!(alpha < alpha_twin);
    }

    #[test]
    fn test_facility_sort() {
        let mut facilities = vec![
            Facility::new(3, "gamma"),
            Facility::new(1, "alpha"),
            Facility::new(2, "beta"),
        ];
        facilities.sort();

        let names: Vec<&str> = facilities.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_resource_carries_facility() {
        let facility = Facility::new(1, "cluster-a");
        let resource = Resource::new(10, "storage", facility.clone());
        assert_eq!(resource.facility, facility);
    }

    #[test]
    fn test_entity_serialization_roundtrip() {
        let service = Service::new(5, "mailman");
        let json = serde_json::to_string(&service).unwrap();
        let restored: Service = serde_json::from_str(&json).unwrap();
        assert_eq!(service, restored);
    }
}
