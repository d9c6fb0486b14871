use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::{Error, Node, RouteResult};

impl RouteResult {
    /// Converts the route to a `GeoJSON` `FeatureCollection`: the path as a
    /// `LineString` followed by its start and end points.
    ///
    /// Routes that were not found produce an empty collection.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::new();

        if self.found && !self.nodes.is_empty() {
            features.push(self.path_feature()?);
            if let Some(first) = self.nodes.first() {
                features.push(endpoint_feature(first, "start")?);
            }
            if let Some(last) = self.nodes.last() {
                features.push(endpoint_feature(last, "end")?);
            }
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?)
            .map_err(|e| Error::SerializationError(e.to_string()))
    }

    fn path_feature(&self) -> Result<Feature, Error> {
        let geometry = Geometry::new(GeoJsonValue::from(&self.geometry()));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "feature_type": "route",
                "start_node": self.start_node,
                "end_node": self.end_node,
                "total_distance_km": self.total_distance_km,
                "total_time_seconds": self.total_time_seconds,
                "nodes_explored": self.nodes_explored,
                "from_cache": self.from_cache,
                "edge_ids": self.edge_ids(),
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::SerializationError(e.to_string()))
    }
}

fn endpoint_feature(node: &Node, role: &str) -> Result<Feature, Error> {
    let point: Point<f64> = node.geometry();
    let geometry = Geometry::new(GeoJsonValue::from(&point));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "feature_type": role,
            "node_id": node.id,
            "name": node.name,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::{Edge, Node, RouteResult};

    #[test]
    fn route_becomes_line_and_endpoints() {
        let route = RouteResult::from_path(
            vec![
                Node::new(1, 10.0, 20.0).with_name("Depot"),
                Node::new(2, 10.5, 20.5),
            ],
            vec![Edge::new(5, 1, 2, 2500.0).with_travel_time(120)],
            2,
        );

        let collection = route.to_geojson().unwrap();
        assert_eq!(collection.features.len(), 3);

        let json: serde_json::Value = serde_json::from_str(&route.to_geojson_string().unwrap()).unwrap();
        let line = &json["features"][0];
        assert_eq!(line["geometry"]["type"], "LineString");
        // GeoJSON positions are lon, lat
        assert_eq!(line["geometry"]["coordinates"][0][0], 20.0);
        assert_eq!(line["geometry"]["coordinates"][0][1], 10.0);
        assert_eq!(line["properties"]["total_time_seconds"], 120);
        assert_eq!(json["features"][1]["properties"]["name"], "Depot");
        assert_eq!(json["features"][2]["properties"]["feature_type"], "end");
    }

    #[test]
    fn missing_route_is_empty() {
        let route = RouteResult::not_found("nothing", 3);
        assert!(route.to_geojson().unwrap().features.is_empty());
    }
}
