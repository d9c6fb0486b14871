use clap::ValueEnum;
use roadpath_core::prelude::*;
use tracing::{info, warn};
use wkt::ToWkt;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full route result
    Json,
    /// Route line with start and end points
    Geojson,
    /// Route geometry only
    Wkt,
}

pub fn render(route: &RouteResult, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(route)?,
        OutputFormat::Geojson => route.to_geojson_string()?,
        OutputFormat::Wkt => route.geometry().wkt_string(),
    })
}

fn log_outcome(label: &str, route: &RouteResult) {
    if route.found {
        info!(
            nodes = route.nodes.len(),
            explored = route.nodes_explored,
            cached = route.from_cache,
            "{label} route: {:.2} km, {} s",
            route.total_distance_km,
            route.total_time_seconds
        );
    } else {
        warn!(
            "{label} route not found: {}",
            route.error_message.as_deref().unwrap_or("unknown reason")
        );
    }
}

/// Prints the direct route, or the waypoint route when `via` is not empty
pub fn run_route(
    calculator: &MultiRouteCalculator,
    from: Coordinate,
    to: Coordinate,
    via: &[Coordinate],
    format: OutputFormat,
) -> Result<(), CliError> {
    let route = if via.is_empty() {
        calculator.compute_optimal_route(from, to)?
    } else {
        let waypoints: Vec<Waypoint> = via.iter().copied().map(Waypoint::from).collect();
        calculator.compute_custom_route(from, to, &waypoints)?
    };

    log_outcome(if via.is_empty() { "Optimal" } else { "Custom" }, &route);
    println!("{}", render(&route, format)?);
    Ok(())
}

pub fn run_multi(
    calculator: &MultiRouteCalculator,
    from: Coordinate,
    to: Coordinate,
    via: &[Coordinate],
    owner: Option<String>,
) -> Result<(), CliError> {
    let waypoints = via.iter().copied().map(Waypoint::from).collect();
    let mut request = RouteRequest::new(from, to).with_waypoints(waypoints);
    if let Some(owner) = owner {
        request = request.with_owner(owner);
    }

    let result = calculator.compute(&request)?;
    log_outcome("Optimal", &result.optimal);
    log_outcome("Custom", &result.custom);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
