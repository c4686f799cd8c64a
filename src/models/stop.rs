use serde::{Deserialize, Serialize};

/// One input address after backend-side geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedStop {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Geocoding failure reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeocodedStop {
    pub fn located(address: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            address: address.into(),
            lat: Some(lat),
            lon: Some(lon),
            error: None,
        }
    }

    pub fn unresolved(address: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            lat: None,
            lon: None,
            error: Some(error.into()),
        }
    }

    /// Both coordinates, only when present and finite
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// True when the stop carries a geocoding error
    pub fn is_flagged(&self) -> bool {
        self.error.is_some()
    }
}

/// A stop that can be drawn on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStop {
    /// 1-based position among drawable stops
    pub position: usize,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinates_require_both_finite() {
        assert_eq!(
            GeocodedStop::located("A", 51.1, 17.0).coordinates(),
            Some((51.1, 17.0))
        );

        let mut half = GeocodedStop::located("B", 51.1, 17.0);
        half.lon = None;
        assert_eq!(half.coordinates(), None);

        let nan = GeocodedStop::located("C", f64::NAN, 17.0);
        assert_eq!(nan.coordinates(), None);
    }

    #[test]
    fn test_unresolved_stop_from_backend() {
        let stop: GeocodedStop = serde_json::from_value(json!({
            "address": "Nieistniejący Adres 12345",
            "error": "Nie znaleziono współrzędnych"
        }))
        .unwrap();

        assert!(stop.is_flagged());
        assert_eq!(stop.coordinates(), None);
    }
}
