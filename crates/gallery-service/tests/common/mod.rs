#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use gallery_auth::jwt::{JwtDecoder, JwtEncoder};
use gallery_auth::password::{PasswordHasher, PasswordValidator};
use gallery_core::config::{AuthConfig, StorageConfig};
use gallery_core::traits::{Clock, ManualClock, ObjectStore};
use gallery_database::MemoryStore;
use gallery_database::store::{MediaStore, PostStore, UserStore};
use gallery_entity::media::MediaAsset;
use gallery_entity::user::User;
use gallery_service::{
    AuthSession, IdentityService, MediaService, PostService, RegisterRequest, RequestContext,
    UploadRequest, UploadService, ViewCounter,
};
use gallery_storage::MemoryObjectStore;
use gallery_storage::probe::solid_png;

pub const PASSWORD: &str = "password123";

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub objects: Arc<MemoryObjectStore>,
    pub clock: Arc<ManualClock>,
    pub decoder: JwtDecoder,
    pub identity: IdentityService,
    pub uploads: UploadService,
    pub media: MediaService,
    pub posts: PostService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(StorageConfig::default())
    }

    pub fn with_storage(storage: StorageConfig) -> Self {
        let auth = AuthConfig {
            jwt_secret: "service-test-secret".to_string(),
            ..AuthConfig::default()
        };

        let store = Arc::new(MemoryStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let clock = Arc::new(ManualClock::starting_now());

        let users: Arc<dyn UserStore> = store.clone();
        let media: Arc<dyn MediaStore> = store.clone();
        let posts: Arc<dyn PostStore> = store.clone();
        let object_store: Arc<dyn ObjectStore> = objects.clone();
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let views = ViewCounter::new(media.clone(), posts.clone());

        let identity = IdentityService::new(
            users,
            Arc::new(JwtEncoder::new(&auth, dyn_clock.clone())),
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&auth)),
        );

        Self {
            decoder: JwtDecoder::new(&auth, dyn_clock),
            uploads: UploadService::new(media.clone(), object_store.clone(), Arc::new(storage)),
            media: MediaService::new(media.clone(), object_store, views.clone()),
            posts: PostService::new(posts, media, views),
            identity,
            store,
            objects,
            clock,
        }
    }

    pub async fn register(&self, name: &str) -> (User, RequestContext) {
        let session = self.register_session(name).await;
        let ctx = RequestContext::new(
            session.user.id,
            session.user.username.clone(),
            session.user.email.clone(),
        );
        (session.user, ctx)
    }

    pub async fn register_session(&self, name: &str) -> AuthSession {
        self.identity
            .register(RegisterRequest {
                email: format!("{name}@example.com"),
                username: name.to_string(),
                password: PASSWORD.to_string(),
                first_name: name.to_string(),
                last_name: "Tester".to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn upload_png(&self, ctx: &RequestContext, title: &str) -> MediaAsset {
        self.uploads
            .upload(ctx, png_request(title, "photo.png"))
            .await
            .unwrap()
    }
}

pub fn png() -> Bytes {
    solid_png(4, 3).unwrap()
}

pub fn png_request(title: &str, filename: &str) -> UploadRequest {
    UploadRequest {
        title: title.to_string(),
        description: String::new(),
        tags: String::new(),
        is_public: None,
        filename: filename.to_string(),
        data: png(),
    }
}

/// Polls `check` until it holds or roughly half a second has passed.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
