//! Normalized route model and traffic estimation
//!
//! Every route the adapter hands to the presentation layer is one of these
//! types, whether it came from the live provider or the mock fallback.
//! The invariants (arrival = departure + duration, directions never empty)
//! are upheld by construction here, not re-checked by callers.

use chrono::{DateTime, Duration, Local};

/// Totals for the primary route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    /// Travel time in seconds
    pub total_seconds: u32,

    /// Travel distance in meters
    pub total_meters: u32,

    /// When the trip starts
    pub departure: DateTime<Local>,

    /// When the trip ends; always departure + total_seconds
    pub arrival: DateTime<Local>,
}

impl RouteSummary {
    /// Build a summary, deriving the arrival time from the departure time.
    pub fn new(total_seconds: u32, total_meters: u32, departure: DateTime<Local>) -> Self {
        let arrival = departure + Duration::seconds(i64::from(total_seconds));
        Self {
            total_seconds,
            total_meters,
            departure,
            arrival,
        }
    }

    /// Travel time in whole minutes
    pub fn minutes(&self) -> u32 {
        self.total_seconds / 60
    }

    /// Travel distance in kilometers
    pub fn kilometers(&self) -> f64 {
        f64::from(self.total_meters) / 1000.0
    }
}

/// A less-preferred route offered alongside the primary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateRoute {
    /// Display label, e.g. "Alternative via Mitchell Freeway"
    pub name: String,

    /// Travel time in seconds
    pub total_seconds: u32,

    /// Travel distance in meters
    pub total_meters: u32,
}

/// A fully normalized successful route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteData {
    pub summary: RouteSummary,

    /// Turn-by-turn instructions; never empty
    pub directions: Vec<String>,

    /// Traffic condition label
    pub traffic: String,

    /// Zero or more alternate routes
    pub alternates: Vec<AlternateRoute>,
}

/// Outcome of a route request: fully a route or fully an error, never a
/// partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResult {
    Route(RouteData),
    Error { message: String },
}

impl RouteResult {
    /// Build an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Congestion signals extracted from a provider response.
///
/// At most one signal is consulted per call: jam data wins over the
/// provider's speed classification, which wins over the locally computed
/// average speed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficSignals {
    /// Number of jammed segments, when the provider reported jam levels
    pub jam_segments: Option<u32>,

    /// Provider's coarse route speed classification
    pub speed_class: Option<String>,

    /// Average speed over the whole route, in km/h
    pub average_speed_kmh: Option<f64>,
}

/// Map congestion signals to a traffic condition label using fixed
/// thresholds.
pub fn traffic_label(signals: &TrafficSignals) -> &'static str {
    if let Some(jams) = signals.jam_segments {
        return if jams > 5 {
            "Heavy traffic"
        } else if jams > 2 {
            "Moderate traffic"
        } else {
            "Light traffic with some congestion"
        };
    }

    if let Some(class) = signals.speed_class.as_deref() {
        return match class {
            "slow" => "Heavy traffic",
            "moderate" => "Moderate traffic",
            "fast" => "Light traffic with some congestion",
            _ => "Normal traffic conditions",
        };
    }

    if let Some(speed) = signals.average_speed_kmh {
        return if speed < 30.0 {
            "Heavy traffic"
        } else if speed < 50.0 {
            "Moderate traffic"
        } else if speed < 70.0 {
            "Light traffic with some congestion"
        } else {
            "Light traffic"
        };
    }

    "Unknown traffic conditions"
}

/// Average speed in km/h, when the totals allow one to be computed.
pub fn average_speed_kmh(total_meters: u32, total_seconds: u32) -> Option<f64> {
    if total_seconds == 0 {
        return None;
    }
    let hours = f64::from(total_seconds) / 3600.0;
    Some(f64::from(total_meters) / 1000.0 / hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speed_signal(kmh: f64) -> TrafficSignals {
        TrafficSignals {
            average_speed_kmh: Some(kmh),
            ..Default::default()
        }
    }

    #[test]
    fn test_arrival_is_departure_plus_duration() {
        let departure = Local::now();
        let summary = RouteSummary::new(4140, 14200, departure);
        assert_eq!(summary.arrival - summary.departure, Duration::seconds(4140));
        assert_eq!(summary.minutes(), 69);
        assert!((summary.kilometers() - 14.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_speed_thresholds() {
        assert_eq!(traffic_label(&speed_signal(29.0)), "Heavy traffic");
        assert_eq!(traffic_label(&speed_signal(49.0)), "Moderate traffic");
        assert_eq!(
            traffic_label(&speed_signal(69.0)),
            "Light traffic with some congestion"
        );
        assert_eq!(traffic_label(&speed_signal(71.0)), "Light traffic");
    }

    #[test]
    fn test_boundary_speeds_fall_into_slower_bucket() {
        assert_eq!(traffic_label(&speed_signal(30.0)), "Moderate traffic");
        assert_eq!(
            traffic_label(&speed_signal(50.0)),
            "Light traffic with some congestion"
        );
        assert_eq!(traffic_label(&speed_signal(70.0)), "Light traffic");
    }

    #[test]
    fn test_jam_count_thresholds() {
        let jams = |n| TrafficSignals {
            jam_segments: Some(n),
            ..Default::default()
        };
        assert_eq!(traffic_label(&jams(6)), "Heavy traffic");
        assert_eq!(traffic_label(&jams(3)), "Moderate traffic");
        assert_eq!(traffic_label(&jams(2)), "Light traffic with some congestion");
        assert_eq!(traffic_label(&jams(0)), "Light traffic with some congestion");
    }

    #[test]
    fn test_speed_class_mapping() {
        let class = |c: &str| TrafficSignals {
            speed_class: Some(c.to_string()),
            ..Default::default()
        };
        assert_eq!(traffic_label(&class("slow")), "Heavy traffic");
        assert_eq!(traffic_label(&class("moderate")), "Moderate traffic");
        assert_eq!(
            traffic_label(&class("fast")),
            "Light traffic with some congestion"
        );
        assert_eq!(traffic_label(&class("warp")), "Normal traffic conditions");
    }

    #[test]
    fn test_signal_precedence() {
        // Jam data beats the speed class and the computed speed
        let all = TrafficSignals {
            jam_segments: Some(6),
            speed_class: Some("fast".to_string()),
            average_speed_kmh: Some(80.0),
        };
        assert_eq!(traffic_label(&all), "Heavy traffic");

        // Speed class beats the computed speed
        let class_and_speed = TrafficSignals {
            jam_segments: None,
            speed_class: Some("moderate".to_string()),
            average_speed_kmh: Some(80.0),
        };
        assert_eq!(traffic_label(&class_and_speed), "Moderate traffic");
    }

    #[test]
    fn test_no_signal_is_unknown() {
        assert_eq!(
            traffic_label(&TrafficSignals::default()),
            "Unknown traffic conditions"
        );
    }

    #[test]
    fn test_average_speed_computation() {
        // 14.2 km in 69 minutes is roughly 12.3 km/h
        let speed = average_speed_kmh(14200, 4140).unwrap();
        assert!((speed - 12.347826).abs() < 1e-3);

        assert_eq!(average_speed_kmh(14200, 0), None);
    }
}
