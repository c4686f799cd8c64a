//! # Result Shaping
//!
//! Turns the raw `result` payload of a completed job into a validated
//! [`DisplayModel`]. Shaping is a pure function of its input: no I/O, no
//! clocks, no retained state.
//!
//! Missing required fields and inconsistent stop ordering are reported as
//! [`ShapingError`] instead of being defaulted.

pub mod format;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::constants::messages;
use crate::error::ShapingError;
use crate::models::{DisplayModel, GeocodedStop, MapStop, OptimizationResult};

pub use format::{format_distance, format_duration, FormattedSummary};

const GEOCODING_SUMMARY: &str = "geocoding_summary";
const OPTIMIZATION_RESULT: &str = "optimization_result";
const SUMMARY: &str = "summary";
const OPTIMIZED_ORDER: &str = "optimizedOrder";

/// Outcome of shaping a well-formed payload
#[derive(Debug, Clone, PartialEq)]
pub enum ShapedResult {
    /// Optimized route ready for display
    Route(DisplayModel),
    /// The backend described its own failure via a top-level `error` field.
    ///
    /// `message` is `None` when the field is not a non-empty string.
    BackendError { message: Option<String> },
}

/// Stateless payload transformer
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultShaper;

impl ResultShaper {
    /// Shape a raw payload. `Value::Null` stands for an absent payload.
    pub fn shape(raw: &Value) -> Result<ShapedResult, ShapingError> {
        let payload = match raw {
            Value::Null => return Err(ShapingError::MissingPayload),
            Value::Object(map) => map,
            other => {
                return Err(ShapingError::malformed(
                    "result",
                    format!("expected an object, got {}", json_kind(other)),
                ))
            }
        };

        if let Some(error) = reported_error(payload) {
            let message = error
                .as_str()
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string);
            return Ok(ShapedResult::BackendError { message });
        }

        let stops_value = present(payload, GEOCODING_SUMMARY)
            .ok_or_else(|| ShapingError::incomplete(GEOCODING_SUMMARY))?;
        let optimization = present(payload, OPTIMIZATION_RESULT)
            .ok_or_else(|| ShapingError::incomplete(OPTIMIZATION_RESULT))?;
        let optimization_map = optimization.as_object().ok_or_else(|| {
            ShapingError::malformed(OPTIMIZATION_RESULT, "expected an object")
        })?;
        for field in [SUMMARY, OPTIMIZED_ORDER] {
            if present(optimization_map, field).is_none() {
                return Err(ShapingError::incomplete(format!(
                    "{OPTIMIZATION_RESULT}.{field}"
                )));
            }
        }

        let stops: Vec<GeocodedStop> = parse(GEOCODING_SUMMARY, stops_value)?;
        let result: OptimizationResult = parse(OPTIMIZATION_RESULT, optimization)?;

        let ordered_stops = reorder(&stops, &result.optimized_order)?;
        let map_stops = drawable(&ordered_stops);
        let route_geometry = result.geometry.filter(|points| !points.is_empty());
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(messages::OPTIMIZATION_COMPLETED)
            .to_string();

        Ok(ShapedResult::Route(DisplayModel {
            message,
            ordered_stops,
            map_stops,
            route_geometry,
            summary: result.summary,
            raw: raw.clone(),
        }))
    }
}

/// Apply the optimized order, then append stops the order never mentioned
/// in their original sequence so no stop is dropped from the list.
fn reorder(stops: &[GeocodedStop], order: &[i64]) -> Result<Vec<GeocodedStop>, ShapingError> {
    let mut visited = vec![false; stops.len()];
    let mut ordered = Vec::with_capacity(stops.len());

    for &index in order {
        let slot = usize::try_from(index)
            .ok()
            .filter(|&i| i < stops.len())
            .ok_or(ShapingError::IndexOutOfRange {
                index,
                stop_count: stops.len(),
            })?;
        if visited[slot] {
            return Err(ShapingError::DuplicateIndex { index: slot });
        }
        visited[slot] = true;
        ordered.push(stops[slot].clone());
    }

    ordered.extend(
        stops
            .iter()
            .zip(&visited)
            .filter(|&(_, &seen)| !seen)
            .map(|(stop, _)| stop.clone()),
    );
    Ok(ordered)
}

fn drawable(ordered: &[GeocodedStop]) -> Vec<MapStop> {
    ordered
        .iter()
        .filter_map(|stop| stop.coordinates().map(|(lat, lon)| (stop, lat, lon)))
        .enumerate()
        .map(|(i, (stop, lat, lon))| MapStop {
            position: i + 1,
            address: stop.address.clone(),
            lat,
            lon,
        })
        .collect()
}

/// The top-level `error` field, unless it is empty, `false`, zero or `null`
fn reported_error(payload: &Map<String, Value>) -> Option<&Value> {
    payload.get("error").filter(|error| match error {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    })
}

/// A field counts as present only when it exists and is not `null`
fn present<'a>(map: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    map.get(field).filter(|value| !value.is_null())
}

fn parse<T: DeserializeOwned>(field: &str, value: &Value) -> Result<T, ShapingError> {
    serde_json::from_value(value.clone()).map_err(|e| ShapingError::malformed(field, e))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
