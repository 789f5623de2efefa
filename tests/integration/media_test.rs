//! Integration tests for media upload, visibility, and deletion.

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use gallery_storage::probe::solid_png;

use crate::helpers::{TestApp, id_of};

#[tokio::test]
async fn test_upload_stores_object_and_row() {
    let app = TestApp::new();
    let (token, user_id) = app.register("ada").await;
    let png = solid_png(3, 2).unwrap();

    let response = app
        .upload(
            &token,
            Some(("sunset.png", &png[..])),
            &[("title", "Sunset"), ("tags", "Sky, sky, beach"), ("description", "warm")],
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["owner_id"], user_id.to_string());
    assert_eq!(data["title"], "Sunset");
    assert_eq!(data["width"], 3);
    assert_eq!(data["height"], 2);
    assert_eq!(data["is_public"], true);
    assert_eq!(data["tags"], "Sky, beach");

    let remote_ref = data["remote_ref"].as_str().unwrap();
    assert!(app.objects.contains(remote_ref));
    assert_eq!(app.store.media_count().await, 1);
}

#[tokio::test]
async fn test_upload_requires_auth() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/images/my", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_rejects_bad_input() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;

    let response = app
        .upload(&token, Some(("notes.txt", b"hello".as_slice())), &[("title", "Notes")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_FILE_TYPE");

    let response = app.upload(&token, None, &[("title", "Nothing")]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_INPUT");

    let png = solid_png(2, 2).unwrap();
    let response = app
        .upload(&token, Some(("a.png", &png[..])), &[("is_public", "maybe")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.objects.upload_attempts(), 0);
    assert_eq!(app.store.media_count().await, 0);
}

#[tokio::test]
async fn test_remote_failure_reports_upload_failed() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;
    app.objects.fail_uploads(true);

    let png = solid_png(2, 2).unwrap();
    let response = app.upload(&token, Some(("a.png", &png[..])), &[]).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.error_code(), "UPLOAD_FAILED");
    assert_eq!(app.store.media_count().await, 0);
    assert!(app.objects.delete_attempts().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_deletes_remote_object() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;
    app.store.fail_media_creates(true);

    let png = solid_png(2, 2).unwrap();
    let response = app.upload(&token, Some(("a.png", &png[..])), &[]).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_code(), "INTERNAL_ERROR");
    assert_eq!(app.objects.upload_attempts(), 1);
    assert_eq!(app.objects.delete_attempts().len(), 1);
    assert_eq!(app.objects.object_count(), 0);
    assert_eq!(app.store.media_count().await, 0);
}

#[tokio::test]
async fn test_private_media_hidden_from_others() {
    let app = TestApp::new();
    let (owner, _) = app.register("ada").await;
    let (other, _) = app.register("bob").await;

    let png = solid_png(2, 2).unwrap();
    let response = app
        .upload(&owner, Some(("a.png", &png[..])), &[("is_public", "false")])
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = id_of(&response.body["data"]);

    let anonymous = app
        .request("GET", &format!("/public/images/{id}"), None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::NOT_FOUND);

    let stranger = app
        .request("GET", &format!("/api/images/{id}"), None, Some(&other))
        .await;
    assert_eq!(stranger.status, StatusCode::NOT_FOUND);

    let mine = app
        .request("GET", &format!("/public/images/{id}"), None, Some(&owner))
        .await;
    assert_eq!(mine.status, StatusCode::OK);

    let listed = app.request("GET", "/public/images", None, None).await;
    assert_eq!(listed.body["data"]["total"], 0);
}

#[tokio::test]
async fn test_delete_enforces_ownership() {
    let app = TestApp::new();
    let (owner, _) = app.register("ada").await;
    let (other, _) = app.register("bob").await;
    let id = app.upload_png(&owner, "Mine").await;

    let response = app
        .request("DELETE", &format!("/api/images/{id}"), None, Some(&other))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("DELETE", &format!("/api/images/{}", Uuid::new_v4()), None, Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", "/api/images/not-a-uuid", None, Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_INPUT");

    assert!(app.objects.delete_attempts().is_empty());
    assert_eq!(app.store.media_count().await, 1);
}

#[tokio::test]
async fn test_owner_delete_removes_object_and_row() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;
    let id = app.upload_png(&token, "Mine").await;

    let response = app
        .request("DELETE", &format!("/api/images/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.objects.delete_attempts().len(), 1);
    assert_eq!(app.objects.object_count(), 0);

    let response = app
        .request("GET", &format!("/api/images/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_list_mine() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;
    let (other, _) = app.register("bob").await;
    let id = app.upload_png(&token, "First").await;
    app.upload_png(&token, "Second").await;
    app.upload_png(&other, "Theirs").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/images/{id}"),
            Some(json!({ "title": "Renamed", "tags": "cats" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "Renamed");
    assert_eq!(response.body["data"]["tags"], "cats");

    let response = app
        .request(
            "PUT",
            &format!("/api/images/{id}"),
            Some(json!({ "title": "Stolen" })),
            Some(&other),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", "/api/images/my?page=1&limit=10", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 2);
}

#[tokio::test]
async fn test_public_search_and_tags() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;
    let png = solid_png(2, 2).unwrap();
    app.upload(&token, Some(("a.png", &png[..])), &[("title", "Beach day"), ("tags", "sea,sun")])
        .await;
    app.upload(&token, Some(("b.png", &png[..])), &[("title", "Mountain"), ("tags", "snow")])
        .await;

    let response = app
        .request("GET", "/public/images/search?query=beach", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 1);
    assert_eq!(response.body["data"]["items"][0]["title"], "Beach day");

    let response = app
        .request("GET", "/public/images/tags?tags=snow", None, None)
        .await;
    assert_eq!(response.body["data"]["total"], 1);
    assert_eq!(response.body["data"]["items"][0]["title"], "Mountain");

    let response = app
        .request("GET", "/public/images/tags?tags=%20,%20", None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transform_url() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;
    let id = app.upload_png(&token, "Pic").await;

    let response = app
        .request(
            "GET",
            &format!("/public/images/{id}/transform?width=100&height=50&crop=fill"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let url = response.body["data"]["url"].as_str().unwrap();
    assert!(url.contains("w100_h50_cfill"), "{url}");

    let response = app
        .request(
            "GET",
            &format!("/public/images/{id}/transform?width=0"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;
    app.upload_png(&token, "Pic").await;

    let response = app
        .request(
            "GET",
            "/public/images?page=18446744073709551615&limit=20",
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 1);
    assert_eq!(response.body["data"]["items"], json!([]));

    let response = app
        .request("GET", "/api/images/my?page=18446744073709551615", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["items"], json!([]));
}
