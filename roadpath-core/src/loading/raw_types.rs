use serde::{Deserialize, Deserializer};

use crate::{Coordinate, Edge, EdgeId, Node, NodeId, PoiId, RoadType, Seconds};

#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub poi_id: Option<PoiId>,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawNode {
    /// `None` when the position is not a valid coordinate
    pub fn into_node(self) -> Option<Node> {
        Coordinate::new(self.lat, self.lon).ok()?;
        Some(Node {
            id: self.id,
            lat: self.lat,
            lon: self.lon,
            node_type: non_empty(self.node_type),
            poi_id: self.poi_id,
            name: non_empty(self.name),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub distance_m: f64,
    #[serde(default)]
    pub road_type: Option<String>,
    #[serde(default)]
    pub max_speed_kmh: Option<f64>,
    #[serde(default)]
    pub travel_time_s: Option<Seconds>,
    #[serde(default, deserialize_with = "deserialize_oneway")]
    pub oneway: bool,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawEdge {
    /// `None` for negative or non-finite lengths
    pub fn into_edge(self) -> Option<Edge> {
        if !(self.distance_m.is_finite() && self.distance_m >= 0.0) {
            return None;
        }

        let road_type = self
            .road_type
            .as_deref()
            .map_or_else(RoadType::default, RoadType::from_tag);
        let mut edge = Edge::new(self.id, self.source, self.target, self.distance_m)
            .with_road_type(road_type);
        if let Some(speed) = self.max_speed_kmh.filter(|s| s.is_finite() && *s > 0.0) {
            edge = edge.with_max_speed(speed);
        }
        if let Some(seconds) = self.travel_time_s.filter(|&s| s > 0) {
            edge = edge.with_travel_time(seconds);
        }
        if self.oneway {
            edge = edge.one_way();
        }
        edge.name = non_empty(self.name);
        Some(edge)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts `1/0`, `true/false` and `yes/no`; an empty field is two-way
fn deserialize_oneway<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "" | "0" | "false" | "no" | "n" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid oneway flag '{other}'"
        ))),
    }
}
