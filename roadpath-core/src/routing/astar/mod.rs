//! A* point-to-point search over a [`NetworkView`]

mod state;

use std::collections::BinaryHeap;
use std::time::Instant;

use log::debug;

use state::{SearchTree, State};

use super::assembler::RouteAssembler;
use super::heuristic::{DEFAULT_MAX_SPEED_KMH, travel_time_lower_bound};
use super::network::{NetworkView, Step};
use crate::store::{GraphStore, StoreView};
use crate::{Error, NodeId, RouteResult, RoutingConfig, Subgraph};

/// Single-pair shortest travel-time search
///
/// Each call owns its open and closed sets, so one finder can serve any
/// number of concurrent searches.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder {
    max_speed_kmh: f64,
}

impl Default for PathFinder {
    fn default() -> Self {
        Self {
            max_speed_kmh: DEFAULT_MAX_SPEED_KMH,
        }
    }
}

impl PathFinder {
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            max_speed_kmh: config.max_speed_kmh,
        }
    }

    /// Raises the assumed maximum speed to `fastest_kmh` when roads are faster
    #[must_use]
    pub fn covering(self, fastest_kmh: Option<f64>) -> Self {
        match fastest_kmh {
            Some(speed) if speed > self.max_speed_kmh => Self {
                max_speed_kmh: speed,
            },
            _ => self,
        }
    }

    pub fn max_speed_kmh(&self) -> f64 {
        self.max_speed_kmh
    }

    /// Searches a preloaded subgraph, or the store node by node when none is given
    pub fn find_route(
        &self,
        store: &dyn GraphStore,
        start: NodeId,
        goal: NodeId,
        subgraph: Option<&Subgraph>,
    ) -> Result<RouteResult, Error> {
        match subgraph {
            Some(subgraph) => self.search(subgraph, start, goal),
            None => self.search(&StoreView::new(store), start, goal),
        }
    }

    /// Lower bound on the travel time between two nodes of `view`
    pub fn heuristic<V>(&self, view: &V, from: NodeId, goal: NodeId) -> Result<Option<f64>, Error>
    where
        V: NetworkView + ?Sized,
    {
        match (view.position(from)?, view.position(goal)?) {
            (Some(from), Some(goal)) => Ok(Some(travel_time_lower_bound(
                from,
                goal,
                self.max_speed_kmh,
            ))),
            _ => Ok(None),
        }
    }

    /// A* from `start` to `goal` with travel time as edge weight
    ///
    /// Closed nodes are never reopened. The returned totals are the exact sums
    /// of the traversed segments.
    ///
    /// # Errors
    ///
    /// Propagates view failures; unknown nodes and unreachable goals are
    /// reported as `found = false` results
    pub fn search<V>(&self, view: &V, start: NodeId, goal: NodeId) -> Result<RouteResult, Error>
    where
        V: NetworkView + ?Sized,
    {
        let started = Instant::now();

        let Some(goal_position) = view.position(goal)? else {
            return Ok(RouteResult::not_found(
                format!("Node {goal} is not part of the road graph"),
                0,
            )
            .with_computation_time(started.elapsed()));
        };
        let Some(start_position) = view.position(start)? else {
            return Ok(RouteResult::not_found(
                format!("Node {start} is not part of the road graph"),
                0,
            )
            .with_computation_time(started.elapsed()));
        };

        let mut tree = SearchTree::with_capacity(256);
        let mut heap = BinaryHeap::with_capacity(64);
        let mut steps: Vec<Step> = Vec::with_capacity(8);
        let mut explored = 0usize;

        let start_slot = tree.slot(start);
        let goal_slot = tree.slot(goal);
        let start_bound = travel_time_lower_bound(start_position, goal_position, self.max_speed_kmh);
        tree.best[start_slot] = 0;
        tree.bound[start_slot] = Some(start_bound);
        tree.bound[goal_slot] = Some(0.0);
        heap.push(State {
            estimate: start_bound,
            cost: 0,
            slot: start_slot,
        });

        while let Some(State { cost, slot, .. }) = heap.pop() {
            // Stale duplicate of an already expanded node
            if tree.is_closed(slot) {
                continue;
            }
            tree.close(slot);
            explored += 1;

            if slot == goal_slot {
                let path = tree.path_to(goal_slot);
                debug!(
                    "A* {start} -> {goal}: {} nodes on path, {explored} explored",
                    path.len()
                );
                return Ok(RouteAssembler::assemble(view, &path, explored)?
                    .with_computation_time(started.elapsed()));
            }

            steps.clear();
            view.steps(tree.id(slot), &mut steps)?;

            for step in &steps {
                let next = tree.slot(step.target);
                if tree.is_closed(next) {
                    continue;
                }

                let tentative = cost.saturating_add(step.cost);
                if tentative >= tree.best[next] {
                    continue;
                }

                let bound = match tree.bound[next] {
                    Some(bound) => bound,
                    None => {
                        let bound = view
                            .position(step.target)?
                            .map_or(0.0, |p| {
                                travel_time_lower_bound(p, goal_position, self.max_speed_kmh)
                            });
                        tree.bound[next] = Some(bound);
                        bound
                    }
                };

                tree.best[next] = tentative;
                tree.parent[next] = Some((slot, step.edge));
                heap.push(State {
                    estimate: f64::from(tentative) + bound,
                    cost: tentative,
                    slot: next,
                });
            }
        }

        debug!("A* {start} -> {goal}: exhausted after {explored} nodes");
        Ok(
            RouteResult::from_error(&Error::PathNotFound { from: start, to: goal }, explored)
                .with_endpoints(Some(start), Some(goal))
                .with_computation_time(started.elapsed()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{dijkstra_costs, grid_store, line_store};
    use crate::{BoundingBox, Edge, InMemoryGraphStore, Node, Seconds, SubgraphLoader};

    fn whole_graph(store: &dyn GraphStore) -> Subgraph {
        let config = RoutingConfig::default();
        SubgraphLoader::new(store, &config)
            .load_bounding_box(&BoundingBox::new(-90.0, -180.0, 90.0, 180.0))
            .unwrap()
    }

    #[test]
    fn line_route_has_exact_totals() {
        let store = line_store();
        let graph = whole_graph(&store);
        let route = PathFinder::default().search(&graph, 1, 3).unwrap();

        assert!(route.found);
        assert!(route.is_valid());
        assert_eq!(route.node_ids(), vec![1, 2, 3]);
        assert_eq!(route.edge_ids(), vec![1, 2]);
        assert_eq!(route.total_time_seconds, 120);
        assert!((route.total_distance_km - 222.39).abs() < 1e-9);
        assert_eq!(route.start_node, Some(1));
        assert_eq!(route.end_node, Some(3));
    }

    #[test]
    fn both_directions_cost_the_same() {
        let store = grid_store(6, 0.01);
        let graph = whole_graph(&store);
        let finder = PathFinder::default();

        for (a, b) in [(1, 36), (3, 32), (7, 12), (18, 19)] {
            let forward = finder.search(&graph, a, b).unwrap();
            let backward = finder.search(&graph, b, a).unwrap();
            assert!(forward.found && backward.found);
            assert_eq!(forward.total_time_seconds, backward.total_time_seconds);
        }
    }

    #[test]
    fn totals_are_sums_of_traversed_edges() {
        let store = grid_store(8, 0.01);
        let graph = whole_graph(&store);
        let route = PathFinder::default().search(&graph, 1, 64).unwrap();

        let time: Seconds = route.edges.iter().map(Edge::travel_time).sum();
        let km = route.edges.iter().map(|e| e.distance_m).sum::<f64>() / 1000.0;
        assert_eq!(route.total_time_seconds, time);
        assert!((route.total_distance_km - km).abs() < 1e-9);
        assert_eq!(route.edges.len(), route.nodes.len() - 1);
    }

    #[test]
    fn heuristic_never_overestimates() {
        let store = grid_store(8, 0.01);
        let graph = whole_graph(&store);
        let finder = PathFinder::default();
        let goal = 64;
        // all segments are two-way, so costs from the goal equal costs to it
        let remaining = dijkstra_costs(&store, goal);

        for (&node, &cost) in &remaining {
            let bound = finder.heuristic(&graph, node, goal).unwrap().unwrap();
            assert!(
                bound <= f64::from(cost) + 1e-9,
                "h({node}) = {bound} exceeds true cost {cost}"
            );
        }
    }

    #[test]
    fn matches_dijkstra_optimum() {
        let store = grid_store(10, 0.01);
        let graph = whole_graph(&store);
        let finder = PathFinder::default();

        for start in [1, 5, 23, 57] {
            let truth = dijkstra_costs(&store, start);
            for goal in [10, 46, 91, 100] {
                let route = finder.search(&graph, start, goal).unwrap();
                assert!(route.found);
                assert_eq!(route.total_time_seconds, truth[&goal], "{start} -> {goal}");
            }
        }
    }

    #[test]
    fn repeated_searches_are_identical() {
        let store = grid_store(10, 0.01);
        let graph = whole_graph(&store);
        let finder = PathFinder::default();

        let first = finder.search(&graph, 2, 99).unwrap();
        for _ in 0..5 {
            let again = finder.search(&graph, 2, 99).unwrap();
            assert_eq!(again.node_ids(), first.node_ids());
            assert_eq!(again.edge_ids(), first.edge_ids());
            assert_eq!(again.nodes_explored, first.nodes_explored);
        }
    }

    #[test]
    fn store_fallback_finds_the_same_route() {
        let store = grid_store(6, 0.01);
        let graph = whole_graph(&store);
        let finder = PathFinder::default();

        let preloaded = finder.find_route(&store, 1, 36, Some(&graph)).unwrap();
        let view = StoreView::new(&store);
        let fallback = finder.search(&view, 1, 36).unwrap();

        assert_eq!(preloaded.node_ids(), fallback.node_ids());
        assert_eq!(preloaded.total_time_seconds, fallback.total_time_seconds);
        assert!(view.round_trips() > 0);
    }

    #[test]
    fn isolated_goal_explores_and_fails() {
        let store = line_store();
        let graph = whole_graph(&store);
        let route = PathFinder::default().search(&graph, 1, 4).unwrap();

        assert!(!route.found);
        assert_eq!(route.nodes_explored, 3);
        assert_eq!(
            route.error_message.as_deref(),
            Some("No path found from node 1 to node 4")
        );
    }

    #[test]
    fn unknown_nodes_are_not_searched() {
        let store = line_store();
        let graph = whole_graph(&store);
        let route = PathFinder::default().search(&graph, 1, 999).unwrap();
        assert!(!route.found);
        assert_eq!(route.nodes_explored, 0);
    }

    #[test]
    fn start_equal_to_goal_is_a_single_node_route() {
        let store = line_store();
        let graph = whole_graph(&store);
        let route = PathFinder::default().search(&graph, 2, 2).unwrap();

        assert!(route.found);
        assert_eq!(route.node_ids(), vec![2]);
        assert!(route.edges.is_empty());
        assert_eq!(route.total_time_seconds, 0);
        assert_eq!(route.total_distance_km, 0.0);
    }

    #[test]
    fn one_way_segments_are_respected() {
        let nodes = vec![
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.0, 0.01),
            Node::new(3, 0.01, 0.01),
        ];
        let edges = vec![
            Edge::new(1, 1, 2, 1112.0).with_travel_time(60).one_way(),
            Edge::new(2, 2, 3, 1112.0).with_travel_time(60),
        ];
        let store = InMemoryGraphStore::new(nodes, edges).unwrap();
        let graph = whole_graph(&store);
        let finder = PathFinder::default();

        assert!(finder.search(&graph, 1, 3).unwrap().found);
        assert!(!finder.search(&graph, 3, 1).unwrap().found);
        assert!(!finder.search(&StoreView::new(&store), 3, 1).unwrap().found);
    }

    #[test]
    fn covering_only_raises_the_speed_bound() {
        let finder = PathFinder::default();
        assert_eq!(finder.covering(None).max_speed_kmh(), DEFAULT_MAX_SPEED_KMH);
        assert_eq!(finder.covering(Some(90.0)).max_speed_kmh(), DEFAULT_MAX_SPEED_KMH);
        assert_eq!(finder.covering(Some(250.0)).max_speed_kmh(), 250.0);
    }

    #[test]
    fn prefers_faster_detour_over_shorter_road() {
        let nodes = vec![
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.0, 0.02),
            Node::new(3, 0.01, 0.01),
        ];
        let edges = vec![
            // direct but slow
            Edge::new(1, 1, 2, 2224.0).with_travel_time(600),
            Edge::new(2, 1, 3, 1573.0).with_travel_time(70),
            Edge::new(3, 3, 2, 1573.0).with_travel_time(70),
        ];
        let store = InMemoryGraphStore::new(nodes, edges).unwrap();
        let route = PathFinder::default()
            .search(&whole_graph(&store), 1, 2)
            .unwrap();

        assert_eq!(route.node_ids(), vec![1, 3, 2]);
        assert_eq!(route.total_time_seconds, 140);
    }
}
