//! Road graph components - intersections and road segments

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::{EdgeId, NodeId, PoiId, Seconds};

/// Road graph node (intersection or referenced point)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    /// Free-form classification from the ingestion pipeline
    pub node_type: Option<String>,
    /// Point of interest this node stands for, if any
    pub poi_id: Option<PoiId>,
    pub name: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self {
            id,
            lat,
            lon,
            node_type: None,
            poi_id: None,
            name: None,
        }
    }

    #[must_use]
    pub fn with_poi(mut self, poi_id: PoiId) -> Self {
        self.poi_id = Some(poi_id);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn geometry(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn distance_m(&self, other: Point<f64>) -> f64 {
        Haversine.distance(self.geometry(), other)
    }
}

/// Road classification, roughly following OSM `highway` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    #[default]
    Unclassified,
}

impl RoadType {
    /// Parses a classification tag; unknown tags are unclassified
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "motorway" | "motorway_link" => RoadType::Motorway,
            "trunk" | "trunk_link" => RoadType::Trunk,
            "primary" | "primary_link" => RoadType::Primary,
            "secondary" | "secondary_link" => RoadType::Secondary,
            "tertiary" | "tertiary_link" => RoadType::Tertiary,
            "residential" | "living_street" => RoadType::Residential,
            "service" => RoadType::Service,
            _ => RoadType::Unclassified,
        }
    }

    /// Speed assumed when a segment carries no usable limit (km/h)
    pub fn default_speed_kmh(self) -> f64 {
        match self {
            RoadType::Motorway => 120.0,
            RoadType::Trunk => 100.0,
            RoadType::Primary => 80.0,
            RoadType::Secondary => 70.0,
            RoadType::Tertiary => 60.0,
            RoadType::Residential => 40.0,
            RoadType::Service => 20.0,
            RoadType::Unclassified => 50.0,
        }
    }
}

/// Road graph edge (road segment)
///
/// A segment is stored once as `source -> target`. Unless it is one-way it can
/// be travelled in both directions at the same cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub distance_m: f64,
    pub road_type: RoadType,
    /// Posted limit; zero when unknown
    pub max_speed_kmh: f64,
    /// Driving time in seconds; `None` or zero when unknown
    pub travel_time_s: Option<Seconds>,
    pub oneway: bool,
    pub name: Option<String>,
}

impl Edge {
    /// Bidirectional unclassified segment without a measured travel time
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, distance_m: f64) -> Self {
        Self {
            id,
            source,
            target,
            distance_m,
            road_type: RoadType::default(),
            max_speed_kmh: 0.0,
            travel_time_s: None,
            oneway: false,
            name: None,
        }
    }

    #[must_use]
    pub fn with_road_type(mut self, road_type: RoadType) -> Self {
        self.road_type = road_type;
        self
    }

    #[must_use]
    pub fn with_max_speed(mut self, max_speed_kmh: f64) -> Self {
        self.max_speed_kmh = max_speed_kmh;
        self
    }

    #[must_use]
    pub fn with_travel_time(mut self, seconds: Seconds) -> Self {
        self.travel_time_s = Some(seconds);
        self
    }

    #[must_use]
    pub fn one_way(mut self) -> Self {
        self.oneway = true;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn fill_travel_time(&mut self) {
        self.travel_time_s = Some(self.travel_time());
    }

    /// Speed used for deriving travel time (km/h)
    pub fn effective_speed_kmh(&self) -> f64 {
        if self.max_speed_kmh.is_finite() && self.max_speed_kmh > 0.0 {
            self.max_speed_kmh
        } else {
            self.road_type.default_speed_kmh()
        }
    }

    /// `ceil(distance_km / speed_kmh * 3600)`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn derived_travel_time(&self) -> Seconds {
        // distance_m * 3600 / (speed * 1000) keeps whole results exact
        let seconds = (self.distance_m.max(0.0) * 3600.0) / (self.effective_speed_kmh() * 1000.0);
        seconds.ceil() as Seconds
    }

    /// Search weight of the segment in seconds, derived when missing or zero
    pub fn travel_time(&self) -> Seconds {
        match self.travel_time_s {
            Some(seconds) if seconds > 0 => seconds,
            _ => self.derived_travel_time(),
        }
    }

    /// Node reached when entering the segment at `from`, respecting one-way
    pub fn other_end(&self, from: NodeId) -> Option<NodeId> {
        if from == self.source {
            Some(self.target)
        } else if from == self.target && !self.oneway {
            Some(self.source)
        } else {
            None
        }
    }

    /// Whether the segment can be travelled from `from` directly to `to`
    pub fn leads(&self, from: NodeId, to: NodeId) -> bool {
        self.other_end(from) == Some(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_time_is_derived_when_missing() {
        // 1 km at 60 km/h
        let edge = Edge::new(1, 10, 11, 1000.0).with_max_speed(60.0);
        assert_eq!(edge.travel_time_s, None);
        assert_eq!(edge.travel_time(), 60);

        // partial seconds round up
        let edge = Edge::new(2, 10, 11, 1001.0).with_max_speed(60.0);
        assert_eq!(edge.travel_time(), 61);
    }

    #[test]
    fn zero_travel_time_counts_as_missing() {
        let edge = Edge::new(1, 10, 11, 500.0)
            .with_max_speed(30.0)
            .with_travel_time(0);
        assert_eq!(edge.travel_time(), 60);

        let mut edge = edge;
        edge.fill_travel_time();
        assert_eq!(edge.travel_time_s, Some(60));
    }

    #[test]
    fn measured_travel_time_wins() {
        let edge = Edge::new(1, 10, 11, 1000.0).with_travel_time(42);
        assert_eq!(edge.travel_time(), 42);
    }

    #[test]
    fn missing_speed_falls_back_to_road_type() {
        let edge = Edge::new(1, 10, 11, 40_000.0).with_road_type(RoadType::Residential);
        assert_eq!(edge.effective_speed_kmh(), 40.0);
        assert_eq!(edge.travel_time(), 3600);
    }

    #[test]
    fn one_way_edges_only_lead_forward() {
        let both = Edge::new(1, 10, 11, 100.0);
        assert_eq!(both.other_end(10), Some(11));
        assert_eq!(both.other_end(11), Some(10));
        assert_eq!(both.other_end(12), None);

        let forward = Edge::new(2, 10, 11, 100.0).one_way();
        assert!(forward.leads(10, 11));
        assert!(!forward.leads(11, 10));
    }

    #[test]
    fn road_type_tags() {
        assert_eq!(RoadType::from_tag("Motorway_link"), RoadType::Motorway);
        assert_eq!(RoadType::from_tag("living_street"), RoadType::Residential);
        assert_eq!(RoadType::from_tag("footway"), RoadType::Unclassified);
    }
}
