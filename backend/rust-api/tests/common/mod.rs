#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use flagquiz_api::{
    config::Config,
    create_router,
    models::FlagRecord,
    services::{
        flag_store::{FlagCdnResolver, FlagStore},
        AppState,
    },
};
use std::sync::Arc;
use tower::ServiceExt;

pub const COUNTRIES: [(&str, &str); 6] = [
    ("France", "FR"),
    ("Japan", "JP"),
    ("Brazil", "BR"),
    ("Kenya", "KE"),
    ("Canada", "CA"),
    ("Norway", "NO"),
];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn store_with(countries: &[(&str, &str)]) -> FlagStore {
    let records = countries
        .iter()
        .map(|(name, code)| FlagRecord {
            name: name.to_string(),
            code: code.to_string(),
        })
        .collect();
    FlagStore::from_records(records, &FlagCdnResolver::default())
        .expect("Failed to build test store")
}

pub fn create_test_app_with(countries: &[(&str, &str)]) -> Router {
    init_tracing();
    let state = AppState::with_store(Config::default(), store_with(countries));
    create_router(Arc::new(state))
}

pub fn create_test_app() -> Router {
    create_test_app_with(&COUNTRIES)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        panic!(
            "non-JSON body for {} ({}): {}",
            uri,
            status,
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, json)
}
