//! Integration tests for posts grouping media.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, id_of};

#[tokio::test]
async fn test_create_post_with_own_media() {
    let app = TestApp::new();
    let (token, user_id) = app.register("ada").await;
    let first = app.upload_png(&token, "One").await;
    let second = app.upload_png(&token, "Two").await;

    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({
                "title": "Holiday",
                "tags": "trip",
                "media_ids": [second, first, second],
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["owner_id"], user_id.to_string());
    assert_eq!(data["media_ids"], json!([second, first]));
    assert_eq!(data["is_public"], true);
}

#[tokio::test]
async fn test_create_post_rejects_foreign_media() {
    let app = TestApp::new();
    let (owner, _) = app.register("ada").await;
    let (other, _) = app.register("bob").await;
    let theirs = app.upload_png(&other, "Theirs").await;

    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({ "title": "Mine?", "media_ids": [theirs] })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let listed = app.request("GET", "/api/posts/my", None, Some(&owner)).await;
    assert_eq!(listed.body["data"]["total"], 0);
}

#[tokio::test]
async fn test_create_post_requires_media() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;

    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({ "title": "Empty", "media_ids": [] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_INPUT");
}

#[tokio::test]
async fn test_post_visibility_and_ownership() {
    let app = TestApp::new();
    let (owner, _) = app.register("ada").await;
    let (other, _) = app.register("bob").await;
    let media = app.upload_png(&owner, "Pic").await;

    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({ "title": "Public post", "media_ids": [media] })),
            Some(&owner),
        )
        .await;
    let id = id_of(&response.body["data"]);

    let public = app
        .request("GET", &format!("/public/posts/{id}"), None, None)
        .await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.body["data"]["title"], "Public post");

    let response = app
        .request(
            "PUT",
            &format!("/api/posts/{id}"),
            Some(json!({ "title": "Hijacked" })),
            Some(&other),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("DELETE", &format!("/api/posts/{id}"), None, Some(&other))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("DELETE", &format!("/api/posts/{id}"), None, Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let gone = app
        .request("GET", &format!("/public/posts/{id}"), None, None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let still_there = app
        .request("GET", &format!("/api/images/{media}"), None, Some(&owner))
        .await;
    assert_eq!(still_there.status, StatusCode::OK);
}

#[tokio::test]
async fn test_private_post_hidden_from_public_listing() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;
    let media = app.upload_png(&token, "Pic").await;

    app.request(
        "POST",
        "/api/posts",
        Some(json!({ "title": "Secret", "is_public": false, "media_ids": [media] })),
        Some(&token),
    )
    .await;
    app.request(
        "POST",
        "/api/posts",
        Some(json!({ "title": "Open", "media_ids": [media] })),
        Some(&token),
    )
    .await;

    let listed = app.request("GET", "/public/posts", None, None).await;
    assert_eq!(listed.body["data"]["total"], 1);
    assert_eq!(listed.body["data"]["items"][0]["title"], "Open");

    let search = app
        .request("GET", "/public/posts/search?query=secret", None, None)
        .await;
    assert_eq!(search.body["data"]["total"], 0);

    let mine = app.request("GET", "/api/posts/my", None, Some(&token)).await;
    assert_eq!(mine.body["data"]["total"], 2);
}
