use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use travelsmart_core::demo_itinerary;

use crate::{app, config::Config, state::AppState};

fn setup_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default()).expect("state"));
    state.replace(demo_itinerary());
    (app(state.clone()), state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_check_echoes_request_id() {
    let (app, _state) = setup_app();

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "trace-me");

    let response = app.oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn get_itinerary_lists_seeded_destinations() {
    let (app, _state) = setup_app();

    let response = app.oneshot(get("/v1/itinerary")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let cities: Vec<&str> = body["destinations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["city"].as_str().unwrap())
        .collect();
    assert_eq!(cities, vec!["Madrid", "París", "Ámsterdam", "Roma"]);
    assert_eq!(body["total_days"], 11);
    assert_eq!(body["destinations"][0]["coordinates"], json!([-3.7038, 40.4168]));
}

#[tokio::test]
async fn add_destination_assigns_next_id() {
    let (app, state) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/itinerary/destinations",
            json!({ "city": "Berlín", "coordinates": [13.405, 52.52] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    assert_eq!(body["id"], 5);
    assert_eq!(body["days"], 1);
    assert_eq!(body["transport"], "unspecified");
    assert_eq!(state.itinerary().len(), 5);
}

#[tokio::test]
async fn add_destination_rejects_bad_input() {
    let (app, state) = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/itinerary/destinations",
            json!({ "city": "Nowhere", "coordinates": [200.0, 0.0] }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/itinerary/destinations",
            json!({ "city": "Lisboa", "coordinates": [-9.1393, 38.7223], "days": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().is_some());
    assert_eq!(state.itinerary().len(), 4);
}

#[tokio::test]
async fn patch_destination_updates_days_and_transport() {
    let (app, state) = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/v1/itinerary/destinations/2",
            json!({ "days": 5, "transport": "train" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["days"], 5);
    assert_eq!(body["transport"], "train");

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/v1/itinerary/destinations/2",
            json!({ "days": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/v1/itinerary/destinations/42",
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(state.itinerary().get(2).unwrap().days, 5);
}

#[tokio::test]
async fn delete_destination_removes_it_once() {
    let (app, state) = setup_app();

    let request = || {
        Request::builder()
            .method("DELETE")
            .uri("/v1/itinerary/destinations/3")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.itinerary().get(3).is_none());

    let response = app.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reorder_moves_destination_and_noop_keeps_snapshot() {
    let (app, state) = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/itinerary/reorder",
            json!({ "from": 0, "to": 3 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let ids: Vec<u64> = body["destinations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3, 4, 1]);

    let before = state.itinerary();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/itinerary/reorder",
            json!({ "from": 2, "to": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(Arc::ptr_eq(&before, &state.itinerary()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/itinerary/reorder",
            json!({ "from": 0, "to": 9 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replace_itinerary_rejects_duplicate_ids() {
    let (app, state) = setup_app();

    let duplicate = json!([
        { "id": 1, "city": "Oslo", "coordinates": [10.7522, 59.9139], "days": 2 },
        { "id": 1, "city": "Bergen", "coordinates": [5.3221, 60.3913], "days": 1 }
    ]);
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/v1/itinerary", duplicate))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.itinerary().len(), 4);

    let valid = json!([
        { "id": 1, "city": "Oslo", "coordinates": [10.7522, 59.9139], "days": 2, "transport": "car" },
        { "id": 2, "city": "Bergen", "coordinates": [5.3221, 60.3913], "days": 1 }
    ]);
    let response = app
        .oneshot(json_request("PUT", "/v1/itinerary", valid))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_days"], 3);
}

#[tokio::test]
async fn routes_are_published_for_current_itinerary() {
    let (app, state) = setup_app();
    state
        .subscribe_routes()
        .wait_for(|published| published.generation == 1)
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/v1/routes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["generation"], 1);
    let segments = body["value"].as_array().unwrap();
    assert_eq!(segments.len(), 3);
    for segment in segments {
        // No token configured: every leg is a 96-step great circle.
        assert_eq!(segment["source"], "geodesic");
        assert_eq!(segment["coordinates"].as_array().unwrap().len(), 97);
    }
    assert_eq!(segments[0]["from_id"], 1);
    assert_eq!(segments[2]["to_id"], 4);

    let response = app.oneshot(get("/v1/countries")).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["value"], json!([]));
}

#[tokio::test]
async fn routes_geojson_is_a_feature_collection() {
    let (app, state) = setup_app();
    state
        .subscribe_routes()
        .wait_for(|published| published.generation == 1)
        .await
        .unwrap();

    let response = app.oneshot(get("/v1/routes/geojson")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    assert_eq!(body["type"], "FeatureCollection");
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 7);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(features[4]["geometry"]["type"], "LineString");
    assert_eq!(body["visited_countries"], json!([]));
}

#[tokio::test]
async fn edits_trigger_new_route_generation() {
    let (app, state) = setup_app();
    let mut rx = state.subscribe_routes();

    let response = app
        .oneshot(json_request(
            "PATCH",
            "/v1/itinerary/destinations/1",
            json!({ "transport": "car" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let published = rx.wait_for(|p| p.generation == 2).await.unwrap();
    assert_eq!(published.value.len(), 3);
    assert_eq!(
        published.value.segments()[0].mode,
        travelsmart_core::TransportMode::Car
    );
}

#[tokio::test]
async fn add_after_highest_possible_id_is_rejected() {
    let (app, state) = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/v1/itinerary",
            json!([
                { "id": u64::MAX, "city": "Edge", "coordinates": [0.0, 0.0], "days": 4_000_000_000u32 },
                { "id": 1, "city": "Other", "coordinates": [1.0, 1.0], "days": 4_000_000_000u32 }
            ]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_days"], 8_000_000_000u64);

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/itinerary/destinations",
            json!({ "city": "Lisboa", "coordinates": [-9.1393, 38.7223] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.itinerary().len(), 2);
}

#[tokio::test]
async fn blank_request_id_is_replaced() {
    let (app, _state) = setup_app();

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "   ")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let echoed = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(echoed).is_ok());
}
