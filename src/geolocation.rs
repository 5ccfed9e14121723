//! Approximate coordinates for GMT-offset timezones.
//!
//! Used only as a geolocation hint when a profile has no proxy (IP-based
//! lookup is unavailable without one). Plain data, anchored to a large city
//! in each offset.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Geolocation {
  pub latitude: f64,
  pub longitude: f64,
}

const TIMEZONE_COORDS: [(&str, f64, f64); 25] = [
  ("GMT-12:00", -14.2710, -170.1322), // Baker Island
  ("GMT-11:00", 21.3099, -157.8581),  // Hawaii
  ("GMT-10:00", 61.2181, -149.9003),  // Alaska
  ("GMT-09:00", 37.7749, -122.4194),  // San Francisco
  ("GMT-08:00", 34.0522, -118.2437),  // Los Angeles
  ("GMT-07:00", 39.7392, -104.9903),  // Denver
  ("GMT-06:00", 29.7604, -95.3698),   // Houston
  ("GMT-05:00", 40.7128, -74.0060),   // New York
  ("GMT-04:00", 25.7617, -80.1918),   // Miami
  ("GMT-03:00", -23.5505, -46.6333),  // Sao Paulo
  ("GMT-02:00", -22.9068, -43.1729),  // Rio de Janeiro
  ("GMT-01:00", 32.6612, -16.9244),   // Madeira
  ("GMT+00:00", 51.5074, -0.1278),    // London
  ("GMT+01:00", 52.5200, 13.4050),    // Berlin
  ("GMT+02:00", 59.3293, 18.0686),    // Stockholm
  ("GMT+03:00", 55.7558, 37.6176),    // Moscow
  ("GMT+04:00", 25.2048, 55.2708),    // Dubai
  ("GMT+05:00", 28.6139, 77.2090),    // Delhi
  ("GMT+06:00", 23.8103, 90.4125),    // Dhaka
  ("GMT+07:00", 13.7563, 100.5018),   // Bangkok
  ("GMT+08:00", 39.9042, 116.4074),   // Beijing
  ("GMT+09:00", 35.6762, 139.6503),   // Tokyo
  ("GMT+10:00", -33.8688, 151.2093),  // Sydney
  ("GMT+11:00", -37.8136, 144.9631),  // Melbourne
  ("GMT+12:00", -36.8485, 174.7633),  // Auckland
];

/// Look up hint coordinates for a timezone, defaulting to London.
pub fn coords_for_timezone(timezone: &str) -> Geolocation {
  let (_, latitude, longitude) = TIMEZONE_COORDS
    .iter()
    .find(|(tz, _, _)| *tz == timezone)
    .copied()
    .unwrap_or(("GMT+00:00", 51.5074, -0.1278));
  Geolocation {
    latitude,
    longitude,
  }
}
