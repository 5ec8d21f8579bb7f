// src/search/viewport.rs

use crate::errors::ServerError;
use serde::Deserialize;

pub const FALLBACK_CITY: &str = "Toronto";

/// Visible map area, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewportBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl ViewportBounds {
    pub fn validate(&self) -> Result<(), ServerError> {
        let all = [self.north, self.south, self.east, self.west];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(ServerError::BadRequest(
                "Viewport bounds must be finite numbers".into(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.north) || !(-90.0..=90.0).contains(&self.south) {
            return Err(ServerError::BadRequest(
                "Viewport latitude must be between -90 and 90".into(),
            ));
        }
        if !(-180.0..=180.0).contains(&self.east) || !(-180.0..=180.0).contains(&self.west) {
            return Err(ServerError::BadRequest(
                "Viewport longitude must be between -180 and 180".into(),
            ));
        }
        if self.north <= self.south {
            return Err(ServerError::BadRequest(
                "Viewport north must be greater than south".into(),
            ));
        }
        if self.east <= self.west {
            return Err(ServerError::BadRequest(
                "Viewport east must be greater than west".into(),
            ));
        }
        Ok(())
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}

struct CityBox {
    city: &'static str,
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

// Rough boxes, checked in order; the first containing the viewport centre wins.
static CITY_BOXES: &[CityBox] = &[
    CityBox { city: "Toronto", north: 43.86, south: 43.58, east: -79.11, west: -79.56 },
    CityBox { city: "Mississauga", north: 43.74, south: 43.47, east: -79.56, west: -79.81 },
    CityBox { city: "Brampton", north: 43.85, south: 43.74, east: -79.63, west: -79.89 },
    CityBox { city: "Vaughan", north: 43.93, south: 43.86, east: -79.46, west: -79.69 },
    CityBox { city: "Richmond Hill", north: 43.97, south: 43.86, east: -79.38, west: -79.46 },
    CityBox { city: "Markham", north: 43.96, south: 43.86, east: -79.17, west: -79.38 },
    CityBox { city: "Pickering", north: 43.96, south: 43.79, east: -79.03, west: -79.11 },
    CityBox { city: "Ajax", north: 43.90, south: 43.82, east: -78.99, west: -79.03 },
    CityBox { city: "Whitby", north: 43.97, south: 43.84, east: -78.90, west: -78.99 },
    CityBox { city: "Oshawa", north: 43.98, south: 43.85, east: -78.80, west: -78.90 },
    CityBox { city: "Oakville", north: 43.53, south: 43.39, east: -79.62, west: -79.81 },
    CityBox { city: "Burlington", north: 43.43, south: 43.30, east: -79.74, west: -79.92 },
    CityBox { city: "Milton", north: 43.58, south: 43.47, east: -79.81, west: -79.97 },
    CityBox { city: "Aurora", north: 44.02, south: 43.97, east: -79.41, west: -79.50 },
    CityBox { city: "Newmarket", north: 44.08, south: 44.02, east: -79.41, west: -79.50 },
];

/// Approximate city for a viewport, falling back to Toronto.
pub fn city_for_bounds(bounds: &ViewportBounds) -> &'static str {
    let (lat, lng) = bounds.center();
    CITY_BOXES
        .iter()
        .find(|b| lat <= b.north && lat >= b.south && lng <= b.east && lng >= b.west)
        .map(|b| b.city)
        .unwrap_or(FALLBACK_CITY)
}
