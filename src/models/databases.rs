//! Shape of the `/api/databases` response

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Accessible databases grouped by AWS region name.
///
/// BTreeMap keeps regions and instance identifiers in sorted order, which
/// is the display order everywhere.
pub type RegionMap = BTreeMap<String, RegionDatabases>;

/// Databases accessible within one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDatabases {
    /// Human-readable region description, e.g. "EU (Ireland)".
    pub location: String,
    /// Database names per RDS instance identifier.
    pub instances: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_region_map() {
        let json = r#"{
            "eu-west-1": {
                "location": "EU (Ireland)",
                "instances": {"orders-db": ["orders", "invoices"]}
            },
            "us-east-1": {
                "location": "US East (N. Virginia)",
                "instances": {}
            }
        }"#;

        let map: RegionMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["eu-west-1"].location, "EU (Ireland)");
        assert_eq!(map["eu-west-1"].instances["orders-db"], ["orders", "invoices"]);
        assert!(map["us-east-1"].instances.is_empty());
    }
}
