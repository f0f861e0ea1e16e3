//! Integration tests for the Lectern Server API

use axum_test::TestServer;
use lectern_core::auth::LocalAuthProvider;
use lectern_core::corpus::{Corpus, VersionCatalog};
use lectern_core::store::MemoryDocStore;
use lectern_server::routes::create_router;
use lectern_server::state::AppState;
use serde_json::{json, Value};
use std::sync::Arc;

/// Two-book corpus: Genesis(2 chapters), Exodus(1 chapter)
const SAMPLE: &str = concat!(
    "Genesis 1:1\tIn the beginning God created the heaven and the earth.\n",
    "Genesis 1:2\tAnd the earth was without form, and void.\n",
    "Genesis 2:1\tThus the heavens and the earth were finished.\n",
    "Exodus 1:1\tNow these are the names of the children of Israel.\n",
);

/// Create a test app state over in-memory collaborators
fn create_test_state() -> AppState {
    let mut catalog = VersionCatalog::new();
    catalog.insert(Corpus::parse("KJV", SAMPLE));

    let store = Arc::new(MemoryDocStore::new());
    let auth = Arc::new(LocalAuthProvider::new(store.clone()));
    AppState::assemble(Arc::new(catalog), store, auth)
}

/// Create a test server
fn create_test_server() -> TestServer {
    let app = create_router(create_test_state());
    TestServer::new(app).expect("Failed to create test server")
}

/// Sign up a fresh account, returning its bearer token
async fn sign_up(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": email,
            "password": "secret1",
            "full_name": "A Reader",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_list_versions() {
    let server = create_test_server();

    let response = server.get("/api/v1/versions").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["versions"], json!(["KJV"]));
}

#[tokio::test]
async fn test_read_chapter_anonymous() {
    let server = create_test_server();

    let response = server.get("/api/v1/read/KJV/Genesis/1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["book"], "Genesis");
    assert_eq!(body["chapter"], 1);
    assert_eq!(body["verses"].as_array().unwrap().len(), 2);
    assert_eq!(body["highlights"], json!([]));
    assert_eq!(body["bookmarks"], json!([]));
    assert!(body["previous"].is_null());
    assert_eq!(body["next"]["chapter"], 2);
}

#[tokio::test]
async fn test_read_chapter_rolls_over_book_boundary() {
    let server = create_test_server();

    let response = server.get("/api/v1/read/KJV/Genesis/2").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["next"]["book"], "Exodus");
    assert_eq!(body["next"]["chapter"], 1);

    let response = server.get("/api/v1/read/KJV/Exodus/1").await;
    let body: Value = response.json();
    assert_eq!(body["previous"]["book"], "Genesis");
    assert_eq!(body["previous"]["chapter"], 2);
    assert!(body["next"].is_null());
}

#[tokio::test]
async fn test_read_chapter_book_name_is_case_insensitive() {
    let server = create_test_server();

    let response = server.get("/api/v1/read/kjv/genesis/1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["version"], "KJV");
    assert_eq!(body["book"], "Genesis");
}

#[tokio::test]
async fn test_read_chapter_not_found() {
    let server = create_test_server();

    let response = server.get("/api/v1/read/NIV/Genesis/1").await;
    response.assert_status_not_found();

    let response = server.get("/api/v1/read/KJV/Genesis/99").await;
    response.assert_status_not_found();

    let response = server.get("/api/v1/read/KJV/Leviticus/1").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_search() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/search/KJV")
        .add_query_param("q", "EARTH")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["hits"][0]["reference"], "Genesis 1:1");
}

#[tokio::test]
async fn test_search_respects_limit() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/search/KJV")
        .add_query_param("q", "the")
        .add_query_param("limit", "1")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["hits"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_daily_verse_is_stable_within_a_day() {
    let server = create_test_server();

    let first = server.get("/api/v1/daily").await;
    first.assert_status_ok();
    let second = server.get("/api/v1/daily").await;

    let a: Value = first.json();
    let b: Value = second.json();
    assert_eq!(a["reference"], b["reference"]);
    assert_eq!(a["version"], "KJV");
}

#[tokio::test]
async fn test_sign_up_and_get_account() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    let response = server
        .get("/api/v1/account")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email"], "reader@example.com");
    assert_eq!(body["full_name"], "A Reader");
}

#[tokio::test]
async fn test_update_profile_round_trip() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    let response = server
        .put("/api/v1/account/profile")
        .authorization_bearer(&token)
        .json(&json!({ "full_name": "Renamed Reader" }))
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server
        .get("/api/v1/account/profile")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["full_name"], "Renamed Reader");
    assert_eq!(body["email"], "reader@example.com");
}

#[tokio::test]
async fn test_sign_up_duplicate_email_conflicts() {
    let server = create_test_server();
    sign_up(&server, "reader@example.com").await;

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "email": "reader@example.com",
            "password": "secret2",
            "full_name": "Another",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let server = create_test_server();
    sign_up(&server, "reader@example.com").await;

    let response = server
        .post("/api/v1/auth/signin")
        .json(&json!({ "email": "reader@example.com", "password": "wrong!!" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_account_requires_token() {
    let server = create_test_server();

    let response = server.get("/api/v1/account").await;
    response.assert_status_unauthorized();

    let response = server
        .get("/api/v1/account")
        .authorization_bearer("not-a-token")
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_toggle_highlight_round_trip() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    let toggle = json!({
        "kind": "highlight",
        "version": "KJV",
        "book": "Genesis",
        "chapter": 1,
        "verse": 2,
    });

    let response = server
        .post("/api/v1/annotations/toggle")
        .authorization_bearer(&token)
        .json(&toggle)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["set"], true);

    // The chapter read now carries the highlight
    let response = server
        .get("/api/v1/read/KJV/Genesis/1")
        .authorization_bearer(&token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["highlights"], json!([2]));
    assert_eq!(body["bookmarks"], json!([]));

    // Toggling again restores the original state
    let response = server
        .post("/api/v1/annotations/toggle")
        .authorization_bearer(&token)
        .json(&toggle)
        .await;
    let body: Value = response.json();
    assert_eq!(body["set"], false);

    let response = server
        .get("/api/v1/read/KJV/Genesis/1")
        .authorization_bearer(&token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["highlights"], json!([]));
}

#[tokio::test]
async fn test_toggle_requires_auth() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/annotations/toggle")
        .json(&json!({
            "kind": "highlight",
            "version": "KJV",
            "book": "Genesis",
            "chapter": 1,
            "verse": 1,
        }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_toggle_unknown_location_not_found() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    let response = server
        .post("/api/v1/annotations/toggle")
        .authorization_bearer(&token)
        .json(&json!({
            "kind": "bookmark",
            "version": "KJV",
            "book": "Genesis",
            "chapter": 99,
            "verse": 1,
        }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_bookmarks_listing() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    for (book, chapter, verse, text) in [
        ("Genesis", 1, 1, "In the beginning..."),
        ("Exodus", 1, 1, "Now these are the names..."),
    ] {
        let response = server
            .post("/api/v1/annotations/toggle")
            .authorization_bearer(&token)
            .json(&json!({
                "kind": "bookmark",
                "version": "KJV",
                "book": book,
                "chapter": chapter,
                "verse": verse,
                "text": text,
            }))
            .await;
        response.assert_status_ok();
    }

    let response = server
        .get("/api/v1/bookmarks")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let bookmarks = body["bookmarks"].as_array().unwrap();
    assert_eq!(bookmarks.len(), 2);
    assert!(bookmarks.iter().any(|b| b["reference"] == "Genesis 1:1"));
    assert!(bookmarks.iter().any(|b| b["reference"] == "Exodus 1:1"));
}

#[tokio::test]
async fn test_preferences_default_then_round_trip() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    let response = server
        .get("/api/v1/preferences")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["reader"]["font_size"], 18.0);
    assert_eq!(body["reader"]["theme"], "System");

    let mut prefs = body;
    prefs["reader"]["font_size"] = json!(22.0);
    prefs["dark_mode"] = json!(true);
    let response = server
        .put("/api/v1/preferences")
        .authorization_bearer(&token)
        .json(&prefs)
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server
        .get("/api/v1/preferences")
        .authorization_bearer(&token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["reader"]["font_size"], 22.0);
    assert_eq!(body["dark_mode"], true);
}

#[tokio::test]
async fn test_change_password() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    let response = server
        .post("/api/v1/auth/password")
        .authorization_bearer(&token)
        .json(&json!({ "current_password": "secret1", "new_password": "newsecret" }))
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server
        .post("/api/v1/auth/signin")
        .json(&json!({ "email": "reader@example.com", "password": "secret1" }))
        .await;
    response.assert_status_unauthorized();

    let response = server
        .post("/api/v1/auth/signin")
        .json(&json!({ "email": "reader@example.com", "password": "newsecret" }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_sign_out_invalidates_token() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    let response = server
        .post("/api/v1/auth/signout")
        .authorization_bearer(&token)
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = server
        .get("/api/v1/account")
        .authorization_bearer(&token)
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_delete_account_removes_user_data() {
    let server = create_test_server();
    let token = sign_up(&server, "reader@example.com").await;

    let response = server
        .post("/api/v1/annotations/toggle")
        .authorization_bearer(&token)
        .json(&json!({
            "kind": "bookmark",
            "version": "KJV",
            "book": "Genesis",
            "chapter": 1,
            "verse": 1,
        }))
        .await;
    response.assert_status_ok();

    let response = server
        .delete("/api/v1/account")
        .authorization_bearer(&token)
        .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    // The token is dead and the account can be recreated from scratch
    let response = server
        .get("/api/v1/account")
        .authorization_bearer(&token)
        .await;
    response.assert_status_unauthorized();

    let token = sign_up(&server, "reader@example.com").await;
    let response = server
        .get("/api/v1/bookmarks")
        .authorization_bearer(&token)
        .await;
    let body: Value = response.json();
    assert_eq!(body["bookmarks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_federated_sign_in() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/auth/federated")
        .json(&json!({
            "provider": "google",
            "subject": "subject-1",
            "email": "reader@example.com",
        }))
        .await;
    response.assert_status_ok();
    let first: Value = response.json();

    let response = server
        .post("/api/v1/auth/federated")
        .json(&json!({
            "provider": "google",
            "subject": "subject-1",
            "email": "reader@example.com",
        }))
        .await;
    let second: Value = response.json();
    assert_eq!(first["uid"], second["uid"]);
}
