mod common;
mod http_helpers;

use axum::http::StatusCode;
use common::{read_json, test_app};
use http_helpers::{authed_json_request, authed_request, json_request, plain_request};
use tower::ServiceExt;

type App = axum::routing::RouterIntoService<axum::body::Body, ()>;

async fn register(app: &App, name: &str, email: &str, role: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "name": name,
                "email": email,
                "password": "password123",
                "role": role
            }),
        ))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn login(app: &App, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": email, "password": "password123" }),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    payload["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn collaborate_interest_notifies_owner_and_rejects_duplicates() {
    let app = test_app();

    register(&app, "Alice Silva", "alice@example.edu", "Student").await;
    register(&app, "Bruno Costa", "bruno@example.edu", "Student").await;
    let token_a = login(&app, "alice@example.edu").await;
    let token_b = login(&app, "bruno@example.edu").await;

    // Alice publishes idea "X".
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/ideas",
            &token_a,
            serde_json::json!({
                "title": "X",
                "description": "a campus startup",
                "category": "Tech",
                "stage": "Idea",
                "tags": ["campus", "saas"]
            }),
        ))
        .await
        .expect("create idea");
    assert_eq!(response.status(), StatusCode::CREATED);
    let idea = read_json(response).await;
    let idea_id = idea["id"].as_str().expect("idea id").to_string();
    assert_eq!(idea["interestCount"], 0);

    // Bruno signals interest to collaborate.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &token_b,
            serde_json::json!({ "ideaId": idea_id, "interestType": "Collaborate" }),
        ))
        .await
        .expect("create interest");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Alice's inbox now holds exactly one unread collaboration item that
    // names Bruno and the idea.
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/notifications", &token_a))
        .await
        .expect("inbox");
    assert_eq!(response.status(), StatusCode::OK);
    let inbox = read_json(response).await;
    let items = inbox.as_array().expect("items");
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item["type"], "collaboration");
    assert_eq!(item["read"], false);
    assert_eq!(item["requesterName"], "Bruno Costa");
    assert_eq!(item["ideaTitle"], "X");
    let message = item["message"].as_str().expect("message");
    assert!(message.contains("Bruno Costa"));
    assert!(message.contains("\"X\""));

    // Repeating the same signal conflicts.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &token_b,
            serde_json::json!({ "ideaId": idea_id, "interestType": "Collaborate" }),
        ))
        .await
        .expect("duplicate interest");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "conflict");

    // The derived count reflects the one active signal.
    let response = app
        .clone()
        .oneshot(plain_request("GET", "/api/ideas?sortBy=mostInterest"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let ideas = read_json(response).await;
    assert_eq!(ideas[0]["id"].as_str(), Some(idea_id.as_str()));
    assert_eq!(ideas[0]["interestCount"], 1);
}

#[tokio::test]
async fn idea_detail_lists_interested_people() {
    let app = test_app();

    register(&app, "Owner", "owner@example.edu", "Alumni").await;
    register(&app, "Fan", "fan@example.edu", "Investor").await;
    let owner = login(&app, "owner@example.edu").await;
    let fan = login(&app, "fan@example.edu").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/ideas",
            &owner,
            serde_json::json!({
                "title": "Solar kiosk",
                "description": "off-grid vending",
                "category": "Sustainability",
                "stage": "Prototype"
            }),
        ))
        .await
        .expect("create idea");
    let idea_id = read_json(response).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &fan,
            serde_json::json!({
                "ideaId": idea_id,
                "interestType": "Fund",
                "message": "happy to talk terms"
            }),
        ))
        .await
        .expect("fund interest");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Detail view is public and carries the resolved interest join.
    let response = app
        .clone()
        .oneshot(plain_request("GET", &format!("/api/ideas/{idea_id}")))
        .await
        .expect("detail");
    assert_eq!(response.status(), StatusCode::OK);
    let detail = read_json(response).await;
    assert_eq!(detail["interestCount"], 1);
    assert_eq!(detail["interestedPeople"][0]["name"], "Fan");
    assert_eq!(detail["interestedPeople"][0]["interestTypeForIdea"], "Fund");

    // The funding notification resolves the interest message on read.
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/notifications?read=false", &owner))
        .await
        .expect("inbox");
    let inbox = read_json(response).await;
    assert_eq!(inbox[0]["type"], "funding");
    assert_eq!(inbox[0]["interestMessage"], "happy to talk terms");
}

#[tokio::test]
async fn seed_endpoint_provisions_admin() {
    let app = test_app();

    // Wrong bearer token is rejected.
    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/admin/seed", "wrong-token"))
        .await
        .expect("seed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/admin/seed", common::SEED_TOKEN))
        .await
        .expect("seed");
    assert_eq!(response.status(), StatusCode::OK);

    // Seeding is idempotent.
    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/admin/seed", common::SEED_TOKEN))
        .await
        .expect("seed again");
    assert_eq!(response.status(), StatusCode::OK);

    // The configured admin can log in.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": "admin@startuphub.edu", "password": "admin123" }),
        ))
        .await
        .expect("admin login");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["user"]["role"], "Admin");
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(plain_request("GET", "/api/health"))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"], "ok");
}
