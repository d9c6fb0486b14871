use rayon::prelude::*;
use roadpath_core::prelude::*;
use tracing::warn;

/// Travel time in seconds between every ordered pair of points
///
/// Each pair is an independent search and `None` marks unreachable pairs.
///
/// # Errors
///
/// The first store failure aborts the whole matrix
pub fn travel_time_matrix(
    calculator: &MultiRouteCalculator,
    points: &[Coordinate],
) -> Result<Vec<Vec<Option<Seconds>>>, Error> {
    points
        .par_iter()
        .map(|&from| {
            points
                .iter()
                .map(|&to| {
                    let route = calculator
                        .compute_optimal_route(from, to)
                        .inspect_err(|e| warn!("Routing failed for {from} -> {to}, error: {e}"))?;
                    Ok(route.found.then_some(route.total_time_seconds))
                })
                .collect::<Result<Vec<_>, Error>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn matrix_over_a_short_line() {
        let nodes = vec![
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.0, 0.01),
            Node::new(3, 0.0, 0.02),
            Node::new(4, 0.5, 0.5),
        ];
        let edges = vec![
            Edge::new(1, 1, 2, 1000.0).with_travel_time(60),
            Edge::new(2, 2, 3, 1000.0).with_travel_time(90).one_way(),
        ];
        let store = InMemoryGraphStore::new(nodes, edges).unwrap();
        let calculator =
            MultiRouteCalculator::new(Arc::new(store), RoutingConfig::default()).unwrap();
        let points = [
            Coordinate::new(0.0, 0.0).unwrap(),
            Coordinate::new(0.0, 0.02).unwrap(),
            Coordinate::new(0.5, 0.5).unwrap(),
        ];

        let matrix = travel_time_matrix(&calculator, &points).unwrap();

        assert_eq!(matrix[0], vec![Some(0), Some(150), None]);
        // one-way segment blocks the way back
        assert_eq!(matrix[1], vec![None, Some(0), None]);
        assert_eq!(matrix[2], vec![None, None, Some(0)]);
    }

    struct OfflineStore;

    impl GraphStore for OfflineStore {
        fn find_node(&self, _: NodeId) -> Result<Option<Node>, Error> {
            Err(Error::StoreUnavailable("offline".into()))
        }
        fn find_nodes_in_bounding_box(&self, _: &BoundingBox) -> Result<Vec<Node>, Error> {
            Err(Error::StoreUnavailable("offline".into()))
        }
        fn find_nearest_node(&self, _: f64, _: f64) -> Result<Option<Node>, Error> {
            Err(Error::StoreUnavailable("offline".into()))
        }
        fn find_edges_in_bounding_box(&self, _: &BoundingBox) -> Result<Vec<Edge>, Error> {
            Err(Error::StoreUnavailable("offline".into()))
        }
        fn find_neighbor_edges(&self, _: NodeId) -> Result<Vec<Edge>, Error> {
            Err(Error::StoreUnavailable("offline".into()))
        }
        fn find_edge_between(&self, _: NodeId, _: NodeId) -> Result<Option<Edge>, Error> {
            Err(Error::StoreUnavailable("offline".into()))
        }
    }

    #[test]
    fn store_outage_fails_the_matrix() {
        let calculator =
            MultiRouteCalculator::new(Arc::new(OfflineStore), RoutingConfig::default()).unwrap();
        let points = [
            Coordinate::new(0.0, 0.0).unwrap(),
            Coordinate::new(0.0, 0.02).unwrap(),
        ];

        let err = travel_time_matrix(&calculator, &points).unwrap_err();
        assert!(err.is_retryable());
        assert!(crate::error::CliError::from(err).is_retryable());
    }
}
