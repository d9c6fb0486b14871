use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::PoiId;

/// Intermediate stop a custom route must pass through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Waypoint {
    /// Stop at a known point of interest; the coordinate is used when the
    /// graph has no node linked to the POI
    Poi { poi_id: PoiId, coordinate: Coordinate },
    /// Free-form stop snapped to the nearest node
    Coordinate(Coordinate),
}

impl Waypoint {
    pub fn coordinate(&self) -> Coordinate {
        match self {
            Waypoint::Poi { coordinate, .. } | Waypoint::Coordinate(coordinate) => *coordinate,
        }
    }

    pub fn poi_id(&self) -> Option<PoiId> {
        match self {
            Waypoint::Poi { poi_id, .. } => Some(*poi_id),
            Waypoint::Coordinate(_) => None,
        }
    }
}

impl From<Coordinate> for Waypoint {
    fn from(coordinate: Coordinate) -> Self {
        Waypoint::Coordinate(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let waypoint = Waypoint::Poi {
            poi_id: 7,
            coordinate: Coordinate { lat: 1.0, lon: 2.0 },
        };
        let json = serde_json::to_value(&waypoint).unwrap();
        assert_eq!(json["kind"], "poi");
        assert_eq!(json["poi_id"], 7);

        let parsed: Waypoint =
            serde_json::from_str(r#"{"kind":"coordinate","lat":3.0,"lon":4.0}"#).unwrap();
        assert_eq!(parsed.coordinate(), Coordinate { lat: 3.0, lon: 4.0 });
        assert_eq!(parsed.poi_id(), None);
    }
}
