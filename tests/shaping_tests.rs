mod common;

use common::*;
use proptest::prelude::*;
use serde_json::json;

use optiroute_client::error::ShapingError;
use optiroute_client::models::DisplayModel;
use optiroute_client::shaping::{ResultShaper, ShapedResult};

fn route(raw: &serde_json::Value) -> DisplayModel {
    match ResultShaper::shape(raw) {
        Ok(ShapedResult::Route(model)) => model,
        other => panic!("Expected route, got {other:?}"),
    }
}

#[test]
fn shaping_is_deterministic() {
    let payload = completed_payload();
    assert_eq!(route(&payload), route(&payload));
}

#[test]
fn unlocated_stops_stay_listed_but_off_the_map() {
    let payload = json!({
        "geocoding_summary": [
            {"address": "Rynek 1, Kraków", "lat": 50.06, "lon": 19.94},
            {"address": "Nieistniejąca 0", "error": "Nie znaleziono adresu"},
            {"address": "Floriańska 3, Kraków", "lat": 50.06, "lon": 19.93}
        ],
        "optimization_result": {
            "optimizedOrder": [1, 2, 0],
            "summary": {"lengthInMeters": 4200, "travelTimeInSeconds": 840}
        }
    });

    let model = route(&payload);
    assert_eq!(model.ordered_stops.len(), 3);
    assert_eq!(model.flagged_stops().count(), 1);

    let on_map: Vec<(usize, &str)> = model
        .map_stops
        .iter()
        .map(|stop| (stop.position, stop.address.as_str()))
        .collect();
    assert_eq!(
        on_map,
        vec![(1, "Floriańska 3, Kraków"), (2, "Rynek 1, Kraków")]
    );

    // No geometry: the map falls back to straight segments between stops
    assert_eq!(model.route_geometry, None);
    assert_eq!(model.render_path().len(), 2);
    assert_eq!(model.formatted_summary().duration, "14 minut");
    assert_eq!(model.formatted_summary().distance, "4.20 km");
}

#[test]
fn out_of_range_order_fails_closed() {
    let payload = payload_with_order(3, &[0, 1, 3]);
    assert_eq!(
        ResultShaper::shape(&payload),
        Err(ShapingError::IndexOutOfRange {
            index: 3,
            stop_count: 3
        })
    );
}

proptest! {
    /// Property: every permutation is applied exactly, and every stop is drawable
    #[test]
    fn permutation_is_applied((n, order) in permutation_strategy()) {
        let model = route(&payload_with_order(n, &order));

        let addresses: Vec<String> = model.ordered_stops.iter().map(|s| s.address.clone()).collect();
        let expected: Vec<String> = order.iter().map(|i| format!("Stop {i}")).collect();
        prop_assert_eq!(addresses, expected);

        let positions: Vec<usize> = model.map_stops.iter().map(|s| s.position).collect();
        prop_assert_eq!(positions, (1..=n).collect::<Vec<_>>());
    }

    /// Property: a partial order never drops a stop
    #[test]
    fn partial_order_keeps_every_stop((n, order) in permutation_strategy(), keep in 0usize..12) {
        let prefix = &order[..keep.min(order.len())];
        let model = route(&payload_with_order(n, prefix));

        prop_assert_eq!(model.ordered_stops.len(), n);
        for (stop, &index) in model.ordered_stops.iter().zip(prefix) {
            prop_assert_eq!(&stop.address, &format!("Stop {index}"));
        }
    }
}
