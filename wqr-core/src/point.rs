//! Collection points, client display info, and outorga limits.

use serde::{Deserialize, Serialize};

/// Display metadata for a collection point. Carried through to page
/// headers; never feeds computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointInfo {
    pub point_id: String,
    pub name: String,
    pub area: String,
}

impl PointInfo {
    pub fn new(point_id: &str, name: &str, area: &str) -> PointInfo {
        PointInfo {
            point_id: point_id.to_string(),
            name: name.to_string(),
            area: area.to_string(),
        }
    }
}

/// Client identity shown on the report cover. Display-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub address: String,
    pub tax_id: String,
}

/// The granted extraction permit for a point: a maximum daily volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutorgaLimit {
    pub value: f64,
    pub unit: String,
}

impl OutorgaLimit {
    pub fn cubic_meters(value: f64) -> OutorgaLimit {
        OutorgaLimit {
            value,
            unit: "m³".to_string(),
        }
    }
}
