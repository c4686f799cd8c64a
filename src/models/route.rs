use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stop::{GeocodedStop, MapStop};
use crate::error::ClientResult;
use crate::shaping::format::FormattedSummary;

/// One vertex of the route polyline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeometryPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Route totals computed by the optimizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub length_in_meters: f64,
    pub travel_time_in_seconds: f64,
}

/// Optimizer output nested under `optimization_result`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// Indices into the geocoded stops, in visiting order
    pub optimized_order: Vec<i64>,
    pub summary: RouteSummary,
    #[serde(default)]
    pub geometry: Option<Vec<GeometryPoint>>,
}

/// Bounding box the map should fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl MapBounds {
    /// Smallest box containing every point; `None` for an empty path
    pub fn enclosing(points: &[GeometryPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let seed = Self {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };
        Some(rest.iter().fold(seed, |b, p| Self {
            south: b.south.min(p.latitude),
            west: b.west.min(p.longitude),
            north: b.north.max(p.latitude),
            east: b.east.max(p.longitude),
        }))
    }
}

/// Shaped, validated result ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub message: String,
    /// Every geocoded stop, in optimized visiting order
    pub ordered_stops: Vec<GeocodedStop>,
    /// Drawable subset of `ordered_stops`, same relative order
    pub map_stops: Vec<MapStop>,
    pub route_geometry: Option<Vec<GeometryPoint>>,
    pub summary: RouteSummary,
    /// Untouched backend payload
    pub raw: Value,
}

impl DisplayModel {
    /// Polyline the map should draw.
    ///
    /// Falls back to straight segments through `map_stops` when the backend
    /// sent no geometry.
    pub fn render_path(&self) -> Vec<GeometryPoint> {
        match &self.route_geometry {
            Some(geometry) => geometry.clone(),
            None => self
                .map_stops
                .iter()
                .map(|stop| GeometryPoint::new(stop.lat, stop.lon))
                .collect(),
        }
    }

    pub fn bounds(&self) -> Option<MapBounds> {
        MapBounds::enclosing(&self.render_path())
    }

    pub fn formatted_summary(&self) -> FormattedSummary {
        FormattedSummary::from(&self.summary)
    }

    /// Stops the backend could not geocode
    pub fn flagged_stops(&self) -> impl Iterator<Item = &GeocodedStop> {
        self.ordered_stops.iter().filter(|stop| stop.is_flagged())
    }

    /// The untouched payload, indented for a "show full response" view
    pub fn raw_json_pretty(&self) -> ClientResult<String> {
        Ok(serde_json::to_string_pretty(&self.raw)?)
    }
}
