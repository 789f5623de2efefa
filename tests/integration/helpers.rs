//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use gallery_api::{AppState, Stores, build_app};
use gallery_core::config::{AppConfig, StorageProviderKind};
use gallery_core::traits::{Clock, ManualClock, ObjectStore};
use gallery_database::MemoryStore;
use gallery_storage::MemoryObjectStore;
use gallery_storage::probe::solid_png;

pub const PASSWORD: &str = "password123";
const BOUNDARY: &str = "gallery-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Metadata stores, for direct inspection and failure injection
    pub store: Arc<MemoryStore>,
    /// Remote object store double
    pub objects: Arc<MemoryObjectStore>,
    /// Clock shared by token issue and verification
    pub clock: Arc<ManualClock>,
}

/// Status and parsed JSON body of a test response
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of a failure body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.storage.provider = StorageProviderKind::Memory;

        let store = Arc::new(MemoryStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let clock = Arc::new(ManualClock::starting_now());

        let object_store: Arc<dyn ObjectStore> = objects.clone();
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let state = AppState::new(
            Arc::new(config),
            Stores::shared(store.clone()),
            object_store,
            dyn_clock,
        );

        Self {
            router: build_app(state),
            store,
            objects,
            clock,
        }
    }

    /// Send a JSON request
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        self.send(req.body(Body::from(body_str)).expect("Failed to build request"))
            .await
    }

    /// Send a request with a raw Authorization header value
    pub async fn request_with_header(&self, path: &str, authorization: &str) -> TestResponse {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .header("Authorization", authorization)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// POST a multipart upload to `/api/images`
    pub async fn upload(
        &self,
        token: &str,
        file: Option<(&str, &[u8])>,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let mut body: Vec<u8> = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/images")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a small PNG and return its id
    pub async fn upload_png(&self, token: &str, title: &str) -> Uuid {
        let png = solid_png(2, 2).expect("Failed to encode PNG");
        let response = self
            .upload(token, Some(("photo.png", &png[..])), &[("title", title)])
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        id_of(&response.body["data"])
    }

    /// Register a user named `name` and return its token and id
    pub async fn register(&self, name: &str) -> (String, Uuid) {
        let response = self
            .request(
                "POST",
                "/auth/register",
                Some(json!({
                    "email": format!("{name}@example.com"),
                    "username": name,
                    "password": PASSWORD,
                    "first_name": name,
                    "last_name": "Tester",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let token = response.body["data"]["token"]
            .as_str()
            .expect("token missing")
            .to_string();
        (token, id_of(&response.body["data"]["user"]))
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Parse the `id` field of a JSON object
pub fn id_of(value: &Value) -> Uuid {
    value["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("id missing")
}
