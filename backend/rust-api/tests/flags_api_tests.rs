use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::collections::HashSet;
use tower::ServiceExt;

mod common;

fn names(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|flag| flag["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_flags_returns_dataset_with_images() {
    let app = common::create_test_app();

    let (status, json) = common::get_json(&app, "/api/flags").await;

    assert_eq!(status, StatusCode::OK);
    let flags = json.as_array().unwrap();
    assert_eq!(flags.len(), common::COUNTRIES.len());
    assert_eq!(flags[0]["name"], "France");
    assert_eq!(flags[0]["code"], "FR");
    assert_eq!(flags[0]["image"], "https://flagcdn.com/w320/fr.png");
}

#[tokio::test]
async fn test_random_flags_respects_count() {
    let app = common::create_test_app();

    let (status, json) = common::get_json(&app, "/api/flags/random?count=3").await;

    assert_eq!(status, StatusCode::OK);
    let picked = names(&json);
    assert_eq!(picked.len(), 3);
    let unique: HashSet<&String> = picked.iter().collect();
    assert_eq!(unique.len(), 3);
}

#[tokio::test]
async fn test_random_flags_bad_count_falls_back_to_default() {
    let app = common::create_test_app();

    // Default is 10, capped at the six flags available.
    for uri in [
        "/api/flags/random",
        "/api/flags/random?count=0",
        "/api/flags/random?count=-5",
        "/api/flags/random?count=abc",
        "/api/flags/random?count=",
    ] {
        let (status, json) = common::get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(names(&json).len(), 6, "{}", uri);
    }
}

#[tokio::test]
async fn test_random_flags_default_size_with_large_pool() {
    let countries: Vec<(String, String)> = (0..25)
        .map(|i| (format!("Country {}", i), format!("C{}", i)))
        .collect();
    let borrowed: Vec<(&str, &str)> = countries
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let app = common::create_test_app_with(&borrowed);

    let (_, json) = common::get_json(&app, "/api/flags/random?count=0").await;
    assert_eq!(names(&json).len(), 10);

    let (_, json) = common::get_json(&app, "/api/flags/random?count=500").await;
    assert_eq!(names(&json).len(), 25);

    let (status, json) =
        common::get_json(&app, "/api/flags/random?count=99999999999999999999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&json).len(), 25);
}

#[tokio::test]
async fn test_question_has_four_distinct_options() {
    let app = common::create_test_app();

    for _ in 0..20 {
        let (status, json) = common::get_json(&app, "/api/flags/question").await;
        assert_eq!(status, StatusCode::OK);

        let answer = json["answer"].as_str().unwrap();
        let options: Vec<&str> = json["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_str().unwrap())
            .collect();
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().collect::<HashSet<_>>().len(), 4);
        assert_eq!(options.iter().filter(|o| **o == answer).count(), 1);

        let code = common::COUNTRIES
            .iter()
            .find(|(name, _)| *name == answer)
            .map(|(_, code)| code.to_lowercase())
            .unwrap();
        assert_eq!(
            json["image"],
            format!("https://flagcdn.com/w320/{}.png", code)
        );
    }
}

#[tokio::test]
async fn test_question_with_too_few_flags_is_unprocessable() {
    let app = common::create_test_app_with(&common::COUNTRIES[..3]);

    let (status, json) = common::get_json(&app, "/api/flags/question").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["status"], 422);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("Not enough flags"));
}

#[tokio::test]
async fn test_health_reports_dataset_size() {
    let app = common::create_test_app();

    let (status, json) = common::get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "flagquiz-api");
    assert_eq!(json["flags"], 6);
}

#[tokio::test]
async fn test_metrics_exposes_request_counters() {
    let app = common::create_test_app();
    let _ = common::get_json(&app, "/api/flags").await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("flags_served_total"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = common::create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/flags")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_trace_id_is_echoed_or_generated() {
    let app = common::create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-trace-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-trace-id"], "abc-123");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers()["x-trace-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = common::create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/flags/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
