//! Server configuration from environment.

use foodshare_core::{Coordinate, RoutePolicy};
use std::env;

// Fallback courier origin when a client supplies none: central Nairobi.
const DEFAULT_ORIGIN_LAT: f64 = -1.2921;
const DEFAULT_ORIGIN_LON: f64 = 36.8219;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub notify_url: String,
    pub notify_api_key: String,
    pub default_origin: Coordinate,
    pub route_policy: RoutePolicy,
}

impl Config {
    pub fn from_env() -> Self {
        let policy_defaults = RoutePolicy::default();
        Self {
            server_port: env::var("FOODSHARE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            notify_url: env::var("NOTIFY_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            notify_api_key: env::var("NOTIFY_API_KEY").unwrap_or_default(),
            default_origin: Coordinate::new(
                env::var("DEFAULT_ORIGIN_LAT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_ORIGIN_LAT),
                env::var("DEFAULT_ORIGIN_LON")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_ORIGIN_LON),
            ),
            route_policy: RoutePolicy {
                minutes_per_km: env::var("ROUTE_MINUTES_PER_KM")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(policy_defaults.minutes_per_km),
                dwell_minutes_per_stop: env::var("ROUTE_DWELL_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(policy_defaults.dwell_minutes_per_stop),
            },
        }
    }
}
