use ideahub::app::{build_router, AppState};
use ideahub::auth::session::SessionKeys;
use ideahub::config::SeedConfig;
use ideahub::store::memory::InMemoryStore;
use std::sync::Arc;
use std::time::Duration;

pub const SEED_TOKEN: &str = "test-seed-token";

pub fn test_app() -> axum::routing::RouterIntoService<axum::body::Body, ()> {
    let state = AppState {
        store: Arc::new(InMemoryStore::new()),
        sessions: Arc::new(SessionKeys::new("test-secret", Duration::from_secs(3600))),
        seed: Arc::new(SeedConfig {
            secret: SEED_TOKEN.to_string(),
            admin_email: "admin@startuphub.edu".to_string(),
            admin_password: "admin123".to_string(),
            admin_name: "Admin User".to_string(),
            admin_affiliation: "Startup Hub".to_string(),
        }),
    };
    build_router(state).into_service()
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
