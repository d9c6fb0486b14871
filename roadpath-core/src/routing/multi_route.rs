use std::sync::Arc;
use std::time::Instant;

use geo::Point;
use itertools::Itertools;
use log::{debug, warn};

use super::{NetworkView, PathFinder, RouteAssembler};
use crate::store::StoreView;
use crate::{
    Coordinate, Error, GraphStore, MultiRouteResult, Node, NodeId, RouteCache, RouteRequest,
    RouteResult, RoutingConfig, Subgraph, SubgraphLoader, Waypoint,
};

type Stop = Result<Node, String>;

/// Computes the direct route and the waypoint-constrained route of a request
///
/// Snapping and search failures become `found = false` results, so both
/// routes are always returned. Only store failures and invalid input abort
/// a request.
pub struct MultiRouteCalculator {
    store: Arc<dyn GraphStore>,
    config: RoutingConfig,
    finder: PathFinder,
    cache: Option<RouteCache>,
}

impl MultiRouteCalculator {
    pub fn new(store: Arc<dyn GraphStore>, config: RoutingConfig) -> Result<Self, Error> {
        config.validate()?;
        let finder = PathFinder::new(&config).covering(store.fastest_speed_kmh());
        if finder.max_speed_kmh() > config.max_speed_kmh {
            warn!(
                "Graph has edges faster than max_speed_kmh {}, searching with {:.1} km/h",
                config.max_speed_kmh,
                finder.max_speed_kmh()
            );
        }
        Ok(Self {
            finder,
            store,
            config,
            cache: None,
        })
    }

    #[must_use]
    pub fn with_cache(mut self, cache: RouteCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&RouteCache> {
        self.cache.as_ref()
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn GraphStore {
        self.store.as_ref()
    }

    pub fn snap(&self, coordinate: Coordinate) -> Result<Node, Error> {
        coordinate.validate()?;
        self.store
            .find_nearest_node(coordinate.lat, coordinate.lon)?
            .ok_or(Error::NodeNotFound {
                lat: coordinate.lat,
                lon: coordinate.lon,
            })
    }

    /// Node linked to the waypoint's POI, else the node nearest its coordinate
    pub fn snap_waypoint(&self, waypoint: &Waypoint) -> Result<Node, Error> {
        if let Some(poi_id) = waypoint.poi_id()
            && let Some(node) = self.store.find_node_by_poi(poi_id)?
        {
            return Ok(node);
        }
        self.snap(waypoint.coordinate())
    }

    pub fn compute_optimal_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteResult, Error> {
        let request = RouteRequest::new(start, end);
        let (stops, subgraph) = self.prepare(&request)?;
        self.with_view(subgraph.as_ref(), |view| self.optimal(view, &stops, None))
    }

    pub fn compute_custom_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Waypoint],
    ) -> Result<RouteResult, Error> {
        let request = RouteRequest::new(start, end).with_waypoints(waypoints.to_vec());
        let (stops, subgraph) = self.prepare(&request)?;
        self.with_view(subgraph.as_ref(), |view| self.custom(view, &stops, None))
    }

    pub fn compute_multi_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Waypoint],
    ) -> Result<MultiRouteResult, Error> {
        self.compute(&RouteRequest::new(start, end).with_waypoints(waypoints.to_vec()))
    }

    /// Both routes of a request; cached entries are tagged with its owner
    ///
    /// The two routes are computed concurrently over the same preloaded
    /// subgraph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for out-of-range coordinates and
    /// propagates store failures
    pub fn compute(&self, request: &RouteRequest) -> Result<MultiRouteResult, Error> {
        let started = Instant::now();
        let (stops, subgraph) = self.prepare(request)?;
        let subgraph = subgraph.as_ref();
        let owner = request.owner.as_deref();

        let (optimal, custom) = if request.waypoints.is_empty() {
            let optimal = self.with_view(subgraph, |view| self.optimal(view, &stops, owner))?;
            (optimal.clone(), optimal)
        } else {
            let (optimal, custom) = rayon::join(
                || self.with_view(subgraph, |view| self.optimal(view, &stops, owner)),
                || self.with_view(subgraph, |view| self.custom(view, &stops, owner)),
            );
            (optimal?, custom?)
        };

        debug!(
            "Multi-route with {} waypoints in {:.1} ms: optimal found={}, custom found={}",
            request.waypoints.len(),
            started.elapsed().as_secs_f64() * 1000.0,
            optimal.found,
            custom.found
        );
        Ok(MultiRouteResult { optimal, custom })
    }

    fn prepare(&self, request: &RouteRequest) -> Result<(Vec<Stop>, Option<Subgraph>), Error> {
        request.validate()?;
        let stops = self.snap_stops(request)?;
        let subgraph = self.preload(request, &stops)?;
        Ok((stops, subgraph))
    }

    fn snap_stops(&self, request: &RouteRequest) -> Result<Vec<Stop>, Error> {
        let mut stops = Vec::with_capacity(request.waypoints.len() + 2);
        stops.push(soften("start", self.snap(request.start))?);
        for (idx, waypoint) in request.waypoints.iter().enumerate() {
            let label = format!("waypoint {}", idx + 1);
            stops.push(soften(&label, self.snap_waypoint(waypoint))?);
        }
        stops.push(soften("end", self.snap(request.end))?);
        Ok(stops)
    }

    /// Subgraph covering the request's endpoints and snapped stops; `None`
    /// when preloading is disabled or nothing will be searched
    fn preload(&self, request: &RouteRequest, stops: &[Stop]) -> Result<Option<Subgraph>, Error> {
        if !self.config.preload_subgraph {
            return Ok(None);
        }
        if !matches!((stops.first(), stops.last()), (Some(Ok(_)), Some(Ok(_)))) {
            return Ok(None);
        }

        // Waypoint coordinates are left out: a snapped waypoint is covered by
        // its node and an unsnapped one is never searched
        let points: Vec<Point<f64>> = [request.start.point(), request.end.point()]
            .into_iter()
            .chain(stops.iter().flatten().map(Node::geometry))
            .collect();

        SubgraphLoader::new(self.store.as_ref(), &self.config)
            .load(&points)
            .map(Some)
    }

    fn with_view<T>(
        &self,
        subgraph: Option<&Subgraph>,
        search: impl FnOnce(&dyn NetworkView) -> T,
    ) -> T {
        match subgraph {
            Some(subgraph) => {
                let view: &dyn NetworkView = subgraph;
                search(view)
            }
            None => {
                let fallback = StoreView::new(self.store.as_ref());
                let view: &dyn NetworkView = &fallback;
                search(view)
            }
        }
    }

    fn optimal(
        &self,
        view: &dyn NetworkView,
        stops: &[Stop],
        owner: Option<&str>,
    ) -> Result<RouteResult, Error> {
        match (stops.first(), stops.last()) {
            (Some(Ok(start)), Some(Ok(end))) => self.search_pair(view, start.id, end.id, owner),
            (first, last) => {
                let message = [first, last]
                    .into_iter()
                    .flatten()
                    .filter_map(|stop| stop.as_ref().err())
                    .join("; ");
                Ok(RouteResult::not_found(message, 0))
            }
        }
    }

    fn custom(
        &self,
        view: &dyn NetworkView,
        stops: &[Stop],
        owner: Option<&str>,
    ) -> Result<RouteResult, Error> {
        let unsnapped = stops
            .iter()
            .filter_map(|stop| stop.as_ref().err())
            .join("; ");
        if !unsnapped.is_empty() {
            return Ok(RouteResult::not_found(unsnapped, 0));
        }

        let segments = stops
            .iter()
            .flatten()
            .tuple_windows()
            .map(|(from, to)| self.search_pair(view, from.id, to.id, owner))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RouteAssembler::merge(segments))
    }

    fn search_pair(
        &self,
        view: &dyn NetworkView,
        from: NodeId,
        to: NodeId,
        owner: Option<&str>,
    ) -> Result<RouteResult, Error> {
        match &self.cache {
            Some(cache) => cache.find_path(&self.finder, view, from, to, owner),
            None => self.finder.search(view, from, to),
        }
    }
}

/// Keeps snapping misses as labeled messages and propagates everything else
fn soften(label: &str, snapped: Result<Node, Error>) -> Result<Stop, Error> {
    match snapped {
        Ok(node) => Ok(Ok(node)),
        Err(e) if e.is_route_failure() => Ok(Err(format!("{label}: {e}"))),
        Err(e) => Err(e),
    }
}
