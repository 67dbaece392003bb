//! External routing provider interface and the live Waze client
//!
//! The adapter only ever talks to a [`RouteProvider`], so the live HTTP
//! strategy and test strategies can be swapped without touching the
//! normalization logic.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One driveable segment of a provider route.
///
/// Every field is optional on the wire; missing values default so a sparse
/// payload still decodes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteSegment {
    /// Segment length in meters
    #[serde(default)]
    pub length: f64,

    /// Time to cross the segment in seconds, including live traffic
    #[serde(default, rename = "crossTime")]
    pub cross_time: f64,

    /// Congestion level for the segment, when the provider reports one
    #[serde(default, rename = "jamLevel")]
    pub jam_level: Option<i64>,
}

/// One route alternative as the provider describes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderRoute {
    /// The segments making up the route
    #[serde(default)]
    pub results: Vec<RouteSegment>,

    /// Notable street name for the route, e.g. "Mitchell Fwy"
    #[serde(default, rename = "routeName")]
    pub route_name: Option<String>,

    /// Coarse speed classification: "slow", "moderate" or "fast"
    #[serde(default, rename = "routeSpeedClass")]
    pub speed_class: Option<String>,
}

impl ProviderRoute {
    /// Total travel time in seconds, summed over the segments.
    pub fn total_seconds(&self) -> u32 {
        let total: f64 = self.results.iter().map(|s| s.cross_time.max(0.0)).sum();
        total.round() as u32
    }

    /// Total distance in meters, summed over the segments.
    pub fn total_meters(&self) -> u32 {
        let total: f64 = self.results.iter().map(|s| s.length.max(0.0)).sum();
        total.round() as u32
    }

    /// Number of jammed segments, or `None` when the provider sent no jam
    /// data at all for this route.
    pub fn jam_segments(&self) -> Option<u32> {
        if self.results.iter().all(|s| s.jam_level.is_none()) {
            return None;
        }
        let jammed = self
            .results
            .iter()
            .filter(|s| s.jam_level.is_some_and(|level| level > 0))
            .count();
        Some(jammed as u32)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteAlternative {
    pub response: Option<ProviderRoute>,
}

/// Wire shape of the routing endpoint.
///
/// Multi-path responses carry an `alternatives` array; single-path
/// responses put the one route under `response`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutingResponse {
    #[serde(default)]
    pub alternatives: Vec<RouteAlternative>,
    #[serde(default)]
    pub response: Option<ProviderRoute>,
}

impl RoutingResponse {
    /// Flatten both wire shapes into an ordered route list, preferred
    /// route first.
    pub fn into_routes(self) -> Vec<ProviderRoute> {
        if !self.alternatives.is_empty() {
            return self
                .alternatives
                .into_iter()
                .filter_map(|alt| alt.response)
                .collect();
        }
        self.response.into_iter().collect()
    }
}

/// One candidate returned by the geocoding endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<GeocodeLocation>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeocodeLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Capability interface for the external routing service.
pub trait RouteProvider {
    /// Geocode a free-text address. `Ok(None)` means the provider answered
    /// but had no usable candidate.
    fn resolve_coordinates(&self, address: &str) -> Result<Option<Coordinates>>;

    /// Request up to `max_alternatives` routes between two resolved points.
    fn fetch_routes(
        &self,
        from: Coordinates,
        to: Coordinates,
        max_alternatives: u32,
    ) -> Result<RoutingResponse>;
}

/// Waze endpoints for the row (rest-of-world) server, which covers AU.
const DEFAULT_BASE_URL: &str = "https://www.waze.com";
const GEOCODE_PATH: &str = "/SearchServer/mozi";
const ROUTING_PATH: &str = "/row-RoutingManager/routingRequest";

/// Live HTTP strategy against the Waze public endpoints.
pub struct WazeProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WazeProvider {
    /// Build a provider against the public Waze servers.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build a provider against a specific server, e.g. a local stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        // Waze rejects requests without a browser-like user agent and referer
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::REFERER,
            reqwest::header::HeaderValue::from_static("https://www.waze.com/"),
        );

        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0")
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl RouteProvider for WazeProvider {
    fn resolve_coordinates(&self, address: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}{}", self.base_url, GEOCODE_PATH);
        info!(address, "requesting geocode");

        let body = self
            .client
            .get(&url)
            .query(&[("q", address), ("lang", "eng"), ("origin", "livemap")])
            .send()
            .with_context(|| format!("Geocode request failed for '{}'", address))?
            .error_for_status()
            .context("Geocode request returned an error status")?
            .text()
            .context("Failed to read geocode response body")?;

        let candidates: Vec<GeocodeCandidate> =
            serde_json::from_str(&body).context("Failed to parse geocode response")?;

        let resolved = candidates.into_iter().find_map(|candidate| {
            candidate.location.map(|loc| Coordinates {
                lat: loc.lat,
                lon: loc.lon,
            })
        });

        match &resolved {
            Some(coords) => debug!(address, lat = coords.lat, lon = coords.lon, "geocoded"),
            None => debug!(address, "geocoder returned no usable candidate"),
        }

        Ok(resolved)
    }

    fn fetch_routes(
        &self,
        from: Coordinates,
        to: Coordinates,
        max_alternatives: u32,
    ) -> Result<RoutingResponse> {
        let url = format!("{}{}", self.base_url, ROUTING_PATH);
        info!(
            from_lat = from.lat,
            from_lon = from.lon,
            to_lat = to.lat,
            to_lon = to.lon,
            max_alternatives,
            "requesting routes"
        );

        let body = self
            .client
            .get(&url)
            .query(&[
                ("from", format!("x:{} y:{}", from.lon, from.lat)),
                ("to", format!("x:{} y:{}", to.lon, to.lat)),
                ("at", "0".to_string()),
                ("returnJSON", "true".to_string()),
                ("returnGeometries", "false".to_string()),
                ("returnInstructions", "false".to_string()),
                ("nPaths", max_alternatives.to_string()),
                ("options", "AVOID_TRAILS:t".to_string()),
            ])
            .send()
            .context("Routing request failed")?
            .error_for_status()
            .context("Routing request returned an error status")?
            .text()
            .context("Failed to read routing response body")?;

        let response: RoutingResponse =
            serde_json::from_str(&body).context("Failed to parse routing response")?;

        debug!(
            alternatives = response.alternatives.len(),
            "routing response received"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_alternatives_shape() {
        let json = r#"{
            "alternatives": [
                {
                    "response": {
                        "results": [
                            {"length": 5000.0, "crossTime": 600.0, "jamLevel": 0},
                            {"length": 9200.0, "crossTime": 3540.0, "jamLevel": 3}
                        ],
                        "routeName": "Mitchell Fwy"
                    }
                },
                {
                    "response": {
                        "results": [{"length": 16200.0, "crossTime": 4440.0}]
                    }
                }
            ]
        }"#;

        let response: RoutingResponse = serde_json::from_str(json).unwrap();
        let routes = response.into_routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].total_seconds(), 4140);
        assert_eq!(routes[0].total_meters(), 14200);
        assert_eq!(routes[0].route_name.as_deref(), Some("Mitchell Fwy"));
        assert_eq!(routes[0].jam_segments(), Some(1));
        // Second route reported no jam data at all
        assert_eq!(routes[1].jam_segments(), None);
    }

    #[test]
    fn test_decode_single_response_shape() {
        let json = r#"{
            "response": {
                "results": [{"length": 1000.0, "crossTime": 120.0}]
            }
        }"#;

        let response: RoutingResponse = serde_json::from_str(json).unwrap();
        let routes = response.into_routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].total_seconds(), 120);
        assert_eq!(routes[0].total_meters(), 1000);
    }

    #[test]
    fn test_decode_sparse_payload() {
        // Empty object still decodes; totals default to zero
        let response: RoutingResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_routes().is_empty());

        let route: ProviderRoute = serde_json::from_str("{}").unwrap();
        assert_eq!(route.total_seconds(), 0);
        assert_eq!(route.total_meters(), 0);
        assert_eq!(route.jam_segments(), None);
        assert_eq!(route.speed_class, None);
    }

    #[test]
    fn test_decode_geocode_candidates() {
        let json = r#"[
            {"name": "91 Abbett St, Scarborough"},
            {"name": "Abbett St", "location": {"lat": -31.8941, "lon": 115.7586}}
        ]"#;

        let candidates: Vec<GeocodeCandidate> = serde_json::from_str(json).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].location.is_none());
        let loc = candidates[1].location.unwrap();
        assert!((loc.lat - -31.8941).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_segment_values_clamped() {
        let route = ProviderRoute {
            results: vec![RouteSegment {
                length: -500.0,
                cross_time: -60.0,
                jam_level: None,
            }],
            ..Default::default()
        };
        assert_eq!(route.total_seconds(), 0);
        assert_eq!(route.total_meters(), 0);
    }
}
