//! Payload and file builders shared by the integration tests

use serde_json::{json, Value};

use optiroute_client::models::UploadFile;

pub fn stops_csv() -> UploadFile {
    UploadFile::new(
        "stops.csv",
        "adres\nKrakowska 1, Wrocław\nPiłsudskiego 2, Wrocław\nRynek 3, Wrocław\n",
    )
}

/// Three geocoded stops visited in the order 2, 0, 1
pub fn completed_payload() -> Value {
    json!({
        "message": "Trasa gotowa.",
        "geocoding_summary": [
            {"address": "Krakowska 1, Wrocław", "lat": 51.10, "lon": 17.03},
            {"address": "Piłsudskiego 2, Wrocław", "lat": 51.11, "lon": 17.04},
            {"address": "Rynek 3, Wrocław", "lat": 51.12, "lon": 17.05}
        ],
        "optimization_result": {
            "optimizedOrder": [2, 0, 1],
            "summary": {"lengthInMeters": 12345, "travelTimeInSeconds": 3900},
            "geometry": [
                {"latitude": 51.12, "longitude": 17.05},
                {"latitude": 51.10, "longitude": 17.03},
                {"latitude": 51.11, "longitude": 17.04}
            ]
        }
    })
}

/// `n` located stops with an order covering all of them
pub fn payload_with_order(n: usize, order: &[usize]) -> Value {
    let stops: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "address": format!("Stop {i}"),
                "lat": 50.0 + i as f64 / 100.0,
                "lon": 19.0 + i as f64 / 100.0
            })
        })
        .collect();

    json!({
        "geocoding_summary": stops,
        "optimization_result": {
            "optimizedOrder": order,
            "summary": {"lengthInMeters": 1000, "travelTimeInSeconds": 600}
        }
    })
}
