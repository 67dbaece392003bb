//! Route retrieval and normalization
//!
//! The adapter owns the whole "ask the provider, absorb its failures"
//! policy: address resolution never fails (it degrades to a regional
//! default), and any provider or transform failure is replaced with a
//! deterministic mock route so callers always receive a well-formed
//! result. The only hard error is an empty address.

use std::collections::HashMap;

use anyhow::{ensure, Result};
use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::provider::{Coordinates, ProviderRoute, RouteProvider};
use crate::route::{
    average_speed_kmh, traffic_label, AlternateRoute, RouteData, RouteResult, RouteSummary,
    TrafficSignals,
};

/// How many path alternatives to request from the provider.
const MAX_ALTERNATIVES: u32 = 3;

/// Mock timing for one (origin, destination) pair.
#[derive(Debug, Clone, Copy)]
pub struct MockTiming {
    pub total_seconds: u32,
    pub total_meters: u32,
}

/// Immutable fallback data injected into the adapter at construction.
///
/// Holds everything the adapter needs to answer without the provider:
/// coordinates for known addresses, canned directions for the two known
/// round-trip routes, and mock timings.
#[derive(Debug, Clone)]
pub struct FallbackTables {
    /// Known addresses that skip the live geocoder
    known_coordinates: HashMap<String, Coordinates>,

    /// Where resolution lands when everything else fails (a generic
    /// regional center)
    default_coordinates: Coordinates,

    /// Canned directions keyed by the literal (origin, destination) pair
    known_directions: HashMap<(String, String), Vec<String>>,

    /// Directions for any unrecognized pair
    generic_directions: Vec<String>,

    /// Mock timings keyed by the literal (origin, destination) pair
    mock_timings: HashMap<(String, String), MockTiming>,

    /// Mock timing for any unrecognized pair
    generic_mock: MockTiming,

    /// Traffic label reported with mock data
    mock_traffic: String,
}

const HOME_ADDRESS: &str = "91 Abbett St, Scarborough WA 6019";
const WORK_ADDRESS: &str = "11 Mount St, Perth WA 6000";

impl Default for FallbackTables {
    /// The built-in Perth commute tables.
    fn default() -> Self {
        let pair = |a: &str, b: &str| (a.to_string(), b.to_string());

        let mut known_coordinates = HashMap::new();
        known_coordinates.insert(
            HOME_ADDRESS.to_string(),
            Coordinates {
                lat: -31.8941,
                lon: 115.7586,
            },
        );
        known_coordinates.insert(
            WORK_ADDRESS.to_string(),
            Coordinates {
                lat: -31.9523,
                lon: 115.8613,
            },
        );

        let mut known_directions = HashMap::new();
        known_directions.insert(
            pair(HOME_ADDRESS, WORK_ADDRESS),
            vec![
                "Head south on Abbett St toward Brighton Rd".to_string(),
                "Turn right onto Scarborough Beach Rd".to_string(),
                "Turn left onto West Coast Hwy".to_string(),
                "Continue onto Mounts Bay Rd".to_string(),
                "Turn right onto Mount St".to_string(),
                "Arrive at destination on left".to_string(),
            ],
        );
        known_directions.insert(
            pair(WORK_ADDRESS, HOME_ADDRESS),
            vec![
                "Head north on Mount St toward St Georges Terrace".to_string(),
                "Turn left onto Mounts Bay Rd".to_string(),
                "Continue onto West Coast Hwy".to_string(),
                "Turn right onto Scarborough Beach Rd".to_string(),
                "Turn left onto Abbett St".to_string(),
                "Arrive at destination on right".to_string(),
            ],
        );

        // Both directions of the known commute carry the same timing
        let commute = MockTiming {
            total_seconds: 69 * 60,
            total_meters: 14200,
        };
        let mut mock_timings = HashMap::new();
        mock_timings.insert(pair(HOME_ADDRESS, WORK_ADDRESS), commute);
        mock_timings.insert(pair(WORK_ADDRESS, HOME_ADDRESS), commute);

        Self {
            known_coordinates,
            // Perth CBD
            default_coordinates: Coordinates {
                lat: -31.9505,
                lon: 115.8605,
            },
            known_directions,
            generic_directions: vec![
                "Start driving".to_string(),
                "Continue on the recommended route".to_string(),
                "Follow the main road".to_string(),
                "Continue to your destination".to_string(),
                "Arrive at destination".to_string(),
            ],
            mock_timings,
            generic_mock: MockTiming {
                total_seconds: 69 * 60,
                total_meters: 12000,
            },
            mock_traffic: "Light to moderate traffic".to_string(),
        }
    }
}

impl FallbackTables {
    /// Directions for a pair: canned for the two known round trips, the
    /// generic sequence otherwise. Never empty.
    pub fn directions_for(&self, origin: &str, destination: &str) -> Vec<String> {
        self.known_directions
            .get(&(origin.to_string(), destination.to_string()))
            .cloned()
            .unwrap_or_else(|| self.generic_directions.clone())
    }

    /// Mock timing for a pair.
    pub fn mock_timing(&self, origin: &str, destination: &str) -> MockTiming {
        self.mock_timings
            .get(&(origin.to_string(), destination.to_string()))
            .copied()
            .unwrap_or(self.generic_mock)
    }
}

/// The route provider adapter: resolves, requests, normalizes, and
/// degrades to mock data when the provider lets it down.
pub struct RouteAdapter<P> {
    provider: P,
    tables: FallbackTables,
}

impl<P: RouteProvider> RouteAdapter<P> {
    pub fn new(provider: P, tables: FallbackTables) -> Self {
        Self { provider, tables }
    }

    /// Get a normalized route between two addresses.
    ///
    /// Always returns a well-formed result; only empty input produces an
    /// error variant.
    pub fn get_route(&self, origin: &str, destination: &str) -> RouteResult {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return RouteResult::error(
                "No route found: origin and destination addresses are required",
            );
        }

        info!(origin, destination, "requesting route");
        let departure = Local::now();

        let from = self.resolve(origin);
        let to = self.resolve(destination);

        let routes = match self.provider.fetch_routes(from, to, MAX_ALTERNATIVES) {
            Ok(response) => response.into_routes(),
            Err(err) => {
                error!(origin, destination, error = %err, "routing request failed");
                return self.mock_route(origin, destination, departure);
            }
        };

        if routes.is_empty() {
            warn!(origin, destination, "provider returned no route alternatives");
            return self.mock_route(origin, destination, departure);
        }

        match self.normalize(&routes, origin, destination, departure) {
            Ok(data) => RouteResult::Route(data),
            Err(err) => {
                error!(origin, destination, error = %err, "failed to normalize provider response");
                self.mock_route(origin, destination, departure)
            }
        }
    }

    /// Resolve an address to coordinates. Never fails: known addresses
    /// skip the geocoder, and any geocoding failure lands on the regional
    /// default.
    fn resolve(&self, address: &str) -> Coordinates {
        if let Some(coords) = self.tables.known_coordinates.get(address) {
            return *coords;
        }

        match self.provider.resolve_coordinates(address) {
            Ok(Some(coords)) => coords,
            Ok(None) => {
                warn!(address, "no geocode candidate, using regional default");
                self.tables.default_coordinates
            }
            Err(err) => {
                warn!(address, error = %err, "geocoding failed, using regional default");
                self.tables.default_coordinates
            }
        }
    }

    /// Translate provider routes into the normalized result shape.
    fn normalize(
        &self,
        routes: &[ProviderRoute],
        origin: &str,
        destination: &str,
        departure: DateTime<Local>,
    ) -> Result<RouteData> {
        let first = &routes[0];
        ensure!(
            !first.results.is_empty(),
            "preferred route alternative has no segments"
        );

        let total_seconds = first.total_seconds();
        let total_meters = first.total_meters();

        let signals = TrafficSignals {
            jam_segments: first.jam_segments(),
            speed_class: first.speed_class.clone(),
            average_speed_kmh: average_speed_kmh(total_meters, total_seconds),
        };
        let traffic = traffic_label(&signals).to_string();

        let alternates = routes[1..]
            .iter()
            .enumerate()
            .map(|(i, route)| AlternateRoute {
                name: match route.route_name.as_deref() {
                    Some(street) if !street.is_empty() => format!("Alternative via {}", street),
                    _ => format!("Alternative route {}", i + 1),
                },
                total_seconds: route.total_seconds(),
                total_meters: route.total_meters(),
            })
            .collect();

        info!(
            total_seconds,
            total_meters,
            traffic = traffic.as_str(),
            "normalized provider route"
        );

        Ok(RouteData {
            summary: RouteSummary::new(total_seconds, total_meters, departure),
            directions: self.tables.directions_for(origin, destination),
            traffic,
            alternates,
        })
    }

    /// Deterministic substitute for a failed provider call. Same shape as
    /// a live result, so callers need no special-case handling.
    fn mock_route(
        &self,
        origin: &str,
        destination: &str,
        departure: DateTime<Local>,
    ) -> RouteResult {
        warn!(origin, destination, "substituting mock route data");

        let timing = self.tables.mock_timing(origin, destination);
        let alternates = vec![
            AlternateRoute {
                name: "Alternative via Mitchell Freeway".to_string(),
                total_seconds: timing.total_seconds + 5 * 60,
                total_meters: timing.total_meters + 2000,
            },
            AlternateRoute {
                name: "Alternative via inland roads".to_string(),
                total_seconds: timing.total_seconds + 8 * 60,
                total_meters: timing.total_meters.saturating_sub(1000),
            },
        ];

        RouteResult::Route(RouteData {
            summary: RouteSummary::new(timing.total_seconds, timing.total_meters, departure),
            directions: self.tables.directions_for(origin, destination),
            traffic: self.tables.mock_traffic.clone(),
            alternates,
        })
    }
}
