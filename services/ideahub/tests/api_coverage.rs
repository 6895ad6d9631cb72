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
    read_json(response).await["token"]
        .as_str()
        .expect("token")
        .to_string()
}

async fn create_idea(app: &App, token: &str, title: &str) -> String {
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/ideas",
            token,
            serde_json::json!({
                "title": title,
                "description": "a description",
                "category": "Tech",
                "stage": "Idea"
            }),
        ))
        .await
        .expect("create idea");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["id"]
        .as_str()
        .expect("id")
        .to_string()
}

#[tokio::test]
async fn register_validation_failures() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({ "name": "No Email", "password": "password123", "role": "Student" }),
        ))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "name": "Short",
                "email": "short@example.edu",
                "password": "tiny",
                "role": "Student"
            }),
        ))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "name": "Odd Role",
                "email": "odd@example.edu",
                "password": "password123",
                "role": "Wizard"
            }),
        ))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    register(&app, "First", "taken@example.edu", "Student").await;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "name": "Second",
                "email": "taken@example.edu",
                "password": "password123",
                "role": "Alumni"
            }),
        ))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "conflict");
}

#[tokio::test]
async fn login_and_session_failures() {
    let app = test_app();
    register(&app, "Ada", "ada@example.edu", "Student").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": "ada@example.edu", "password": "wrong-password" }),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(plain_request("GET", "/api/auth/me"))
        .await
        .expect("me");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/auth/me", "not-a-token"))
        .await
        .expect("me");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = login(&app, "ada@example.edu").await;
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/auth/me", &token))
        .await
        .expect("me");
    assert_eq!(response.status(), StatusCode::OK);
    let session = read_json(response).await;
    assert_eq!(session["name"], "Ada");
    assert_eq!(session["role"], "Student");
}

#[tokio::test]
async fn idea_mutations_enforce_ownership_and_moderation() {
    let app = test_app();
    register(&app, "Owner", "owner@example.edu", "Student").await;
    register(&app, "Peer", "peer@example.edu", "Student").await;
    register(&app, "Prof", "prof@example.edu", "Professor").await;
    let owner = login(&app, "owner@example.edu").await;
    let peer = login(&app, "peer@example.edu").await;
    let prof = login(&app, "prof@example.edu").await;

    let idea_id = create_idea(&app, &owner, "Guarded").await;

    // Unauthenticated mutation.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/ideas/{idea_id}"),
            serde_json::json!({ "title": "Hijacked" }),
        ))
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A peer student is neither owner nor moderator.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/ideas/{idea_id}"),
            &peer,
            serde_json::json!({ "title": "Hijacked" }),
        ))
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A professor moderates updates but may not delete someone else's idea.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/ideas/{idea_id}"),
            &prof,
            serde_json::json!({ "title": "Moderated title" }),
        ))
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["title"], "Moderated title");

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/ideas/{idea_id}"),
            &prof,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner deletes; the idea then reads as absent.
    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/ideas/{idea_id}"),
            &owner,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(plain_request("GET", &format!("/api/ideas/{idea_id}")))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/ideas/{idea_id}"),
            &owner,
            serde_json::json!({ "title": "Too late" }),
        ))
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_can_delete_any_idea() {
    let app = test_app();
    register(&app, "Owner", "owner@example.edu", "Student").await;
    let owner = login(&app, "owner@example.edu").await;
    let idea_id = create_idea(&app, &owner, "Admin target").await;

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/admin/seed", common::SEED_TOKEN))
        .await
        .expect("seed");
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": "admin@startuphub.edu", "password": "admin123" }),
        ))
        .await
        .expect("admin login");
    let admin = read_json(response).await["token"]
        .as_str()
        .expect("token")
        .to_string();

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/ideas/{idea_id}"),
            &admin,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn interest_workflow_failure_modes() {
    let app = test_app();
    register(&app, "Owner", "owner@example.edu", "Student").await;
    register(&app, "Fan", "fan@example.edu", "Student").await;
    let owner = login(&app, "owner@example.edu").await;
    let fan = login(&app, "fan@example.edu").await;
    let idea_id = create_idea(&app, &owner, "Signals").await;

    // Unauthenticated.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/interests",
            serde_json::json!({ "ideaId": idea_id, "interestType": "Explore" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Missing and unknown fields.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &fan,
            serde_json::json!({ "interestType": "Explore" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &fan,
            serde_json::json!({ "ideaId": idea_id, "interestType": "Acquire" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Absent idea.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &fan,
            serde_json::json!({ "ideaId": "missing", "interestType": "Explore" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Explore produces no notification.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &fan,
            serde_json::json!({ "ideaId": idea_id, "interestType": "Explore" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Owner signaling the own idea produces no notification either.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &owner,
            serde_json::json!({ "ideaId": idea_id, "interestType": "Collaborate" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/notifications", &owner))
        .await
        .expect("inbox");
    let inbox = read_json(response).await;
    assert!(inbox.as_array().expect("items").is_empty());

    // Withdraw requires an existing pair, then succeeds repeatedly.
    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            "/api/interests?ideaId=missing",
            &fan,
        ))
        .await
        .expect("withdraw");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(authed_request(
                "DELETE",
                &format!("/api/interests?ideaId={idea_id}"),
                &fan,
            ))
            .await
            .expect("withdraw");
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Re-expressing after withdrawal reactivates rather than conflicting.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &fan,
            serde_json::json!({ "ideaId": idea_id, "interestType": "Mentor" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/interests?ideaId={idea_id}"),
            &fan,
        ))
        .await
        .expect("list");
    let interests = read_json(response).await;
    let items = interests.as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .any(|item| item["interestType"] == "Mentor" && item["userName"] == "Fan"));
}

#[tokio::test]
async fn external_role_cannot_create_ideas_but_can_signal() {
    let app = test_app();
    register(&app, "Owner", "owner@example.edu", "Student").await;
    register(&app, "Guest", "guest@example.edu", "External").await;
    let owner = login(&app, "owner@example.edu").await;
    let guest = login(&app, "guest@example.edu").await;
    let idea_id = create_idea(&app, &owner, "Open to externals").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/ideas",
            &guest,
            serde_json::json!({
                "title": "Not allowed",
                "description": "nope",
                "category": "Other",
                "stage": "Idea"
            }),
        ))
        .await
        .expect("create idea");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &guest,
            serde_json::json!({ "ideaId": idea_id, "interestType": "Explore" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn notifications_are_scoped_to_their_recipient() {
    let app = test_app();
    register(&app, "Owner", "owner@example.edu", "Student").await;
    register(&app, "Fan", "fan@example.edu", "Student").await;
    let owner = login(&app, "owner@example.edu").await;
    let fan = login(&app, "fan@example.edu").await;
    let idea_id = create_idea(&app, &owner, "Scoped").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/interests",
            &fan,
            serde_json::json!({ "ideaId": idea_id, "interestType": "Collaborate" }),
        ))
        .await
        .expect("interest");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/notifications", &owner))
        .await
        .expect("inbox");
    let inbox = read_json(response).await;
    let notification_id = inbox[0]["id"].as_str().expect("id").to_string();

    // The requester cannot read, flip, or delete the owner's notification.
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/notifications", &fan))
        .await
        .expect("inbox");
    assert!(read_json(response).await.as_array().expect("items").is_empty());

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PATCH",
            "/api/notifications",
            &fan,
            serde_json::json!({ "id": notification_id, "read": true }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/notifications?id={notification_id}"),
            &fan,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Missing id is a validation failure; unknown id is not found.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PATCH",
            "/api/notifications",
            &owner,
            serde_json::json!({ "read": true }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PATCH",
            "/api/notifications",
            &owner,
            serde_json::json!({ "id": "missing", "read": true }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner marks read, then deletes.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PATCH",
            "/api/notifications",
            &owner,
            serde_json::json!({ "id": notification_id, "read": true }),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["read"], true);

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/notifications?id={notification_id}"),
            &owner,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/notifications", &owner))
        .await
        .expect("inbox");
    assert!(read_json(response).await.as_array().expect("items").is_empty());
}

#[tokio::test]
async fn user_directory_and_account_deletion() {
    let app = test_app();
    register(&app, "Keeper", "keeper@example.edu", "Student").await;
    register(&app, "Leaver", "leaver@example.edu", "Student").await;
    let keeper = login(&app, "keeper@example.edu").await;
    let leaver = login(&app, "leaver@example.edu").await;
    let idea_id = create_idea(&app, &leaver, "Orphaned soon").await;

    // Directory requires a session.
    let response = app
        .clone()
        .oneshot(plain_request("GET", "/api/users"))
        .await
        .expect("users");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/users?search=leaver", &keeper))
        .await
        .expect("users");
    assert_eq!(response.status(), StatusCode::OK);
    let users = read_json(response).await;
    assert_eq!(users.as_array().expect("users").len(), 1);
    let leaver_id = users[0]["id"].as_str().expect("id").to_string();
    assert!(users[0].get("passwordHash").is_none());

    // Another student may not delete the account.
    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/users/{leaver_id}"),
            &keeper,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Self-deletion cascades to the owned idea.
    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/users/{leaver_id}"),
            &leaver,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(plain_request("GET", &format!("/api/ideas/{idea_id}")))
        .await
        .expect("idea");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/users/{leaver_id}"),
            &keeper,
        ))
        .await
        .expect("user");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A deleted account can no longer log in.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": "leaver@example.edu", "password": "password123" }),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_updates_require_self_or_admin() {
    let app = test_app();
    register(&app, "Subject", "subject@example.edu", "Student").await;
    register(&app, "Other", "other@example.edu", "Student").await;
    let subject = login(&app, "subject@example.edu").await;
    let other = login(&app, "other@example.edu").await;

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/users?search=subject", &subject))
        .await
        .expect("users");
    let subject_id = read_json(response).await[0]["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/users/{subject_id}"),
            &other,
            serde_json::json!({ "bio": "rewritten by someone else" }),
        ))
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/users/{subject_id}"),
            &subject,
            serde_json::json!({ "bio": "builder of things", "affiliation": "CS dept" }),
        ))
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["bio"], "builder of things");
    assert_eq!(updated["affiliation"], "CS dept");
}

#[tokio::test]
async fn idea_listing_filters_and_validation() {
    let app = test_app();
    register(&app, "Owner", "owner@example.edu", "Student").await;
    let owner = login(&app, "owner@example.edu").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/ideas",
            &owner,
            serde_json::json!({
                "title": "Clinic triage",
                "description": "ml for intake",
                "category": "Healthcare",
                "stage": "Prototype"
            }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    create_idea(&app, &owner, "Campus food swap").await;

    let response = app
        .clone()
        .oneshot(plain_request("GET", "/api/ideas?category=Healthcare"))
        .await
        .expect("list");
    let ideas = read_json(response).await;
    assert_eq!(ideas.as_array().expect("ideas").len(), 1);
    assert_eq!(ideas[0]["title"], "Clinic triage");

    let response = app
        .clone()
        .oneshot(plain_request("GET", "/api/ideas?search=food"))
        .await
        .expect("list");
    let ideas = read_json(response).await;
    assert_eq!(ideas.as_array().expect("ideas").len(), 1);
    assert_eq!(ideas[0]["title"], "Campus food swap");

    let response = app
        .clone()
        .oneshot(plain_request("GET", "/api/ideas?category=Gardening"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
