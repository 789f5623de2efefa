//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gallery_auth::jwt::{JwtDecoder, JwtEncoder};
use gallery_auth::password::{PasswordHasher, PasswordValidator};
use gallery_core::config::AppConfig;
use gallery_core::traits::{Clock, ObjectStore};
use gallery_database::store::{MediaStore, PostStore, UserStore};
use gallery_service::{IdentityService, MediaService, PostService, UploadService, ViewCounter};

/// The three metadata stores, however they are backed.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Identity records.
    pub users: Arc<dyn UserStore>,
    /// Media asset rows.
    pub media: Arc<dyn MediaStore>,
    /// Posts and attachments.
    pub posts: Arc<dyn PostStore>,
}

impl Stores {
    /// Use one backend for all three stores.
    pub fn shared<S>(backend: Arc<S>) -> Self
    where
        S: UserStore + MediaStore + PostStore,
    {
        Self {
            users: backend.clone(),
            media: backend.clone(),
            posts: backend,
        }
    }
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Remote object store
    pub object_store: Arc<dyn ObjectStore>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Registration, login, profile
    pub identity_service: Arc<IdentityService>,
    /// Upload and delete across both stores
    pub upload_service: Arc<UploadService>,
    /// Media reads and updates
    pub media_service: Arc<MediaService>,
    /// Post lifecycle
    pub post_service: Arc<PostService>,
}

impl AppState {
    /// Wires every service from configuration, stores, and a clock.
    pub fn new(
        config: Arc<AppConfig>,
        stores: Stores,
        object_store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth, Arc::clone(&clock)));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth, clock));
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));

        let views = ViewCounter::new(Arc::clone(&stores.media), Arc::clone(&stores.posts));

        let identity_service = Arc::new(IdentityService::new(
            Arc::clone(&stores.users),
            jwt_encoder,
            password_hasher,
            password_validator,
        ));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&stores.media),
            Arc::clone(&object_store),
            Arc::new(config.storage.clone()),
        ));
        let media_service = Arc::new(MediaService::new(
            Arc::clone(&stores.media),
            Arc::clone(&object_store),
            views.clone(),
        ));
        let post_service = Arc::new(PostService::new(stores.posts, stores.media, views));

        Self {
            config,
            object_store,
            jwt_decoder,
            identity_service,
            upload_service,
            media_service,
            post_service,
        }
    }
}
