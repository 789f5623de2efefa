//! Fire-and-forget view counting.
//!
//! Increments run on detached tasks: the read that triggered them returns
//! without waiting, nothing observes the outcome, and concurrent increments
//! may be lost depending on the store. Failures are logged at `debug`.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use gallery_database::store::{MediaStore, PostStore};

/// Dispatches detached view-count increments.
#[derive(Debug, Clone)]
pub struct ViewCounter {
    media: Arc<dyn MediaStore>,
    posts: Arc<dyn PostStore>,
}

impl ViewCounter {
    /// Creates a view counter over the given stores.
    pub fn new(media: Arc<dyn MediaStore>, posts: Arc<dyn PostStore>) -> Self {
        Self { media, posts }
    }

    /// Count one view of a media asset.
    pub fn record_media(&self, id: Uuid) {
        let store = Arc::clone(&self.media);
        tokio::spawn(async move {
            if let Err(e) = store.increment_views(id).await {
                debug!(media_id = %id, error = %e, "Media view increment dropped");
            }
        });
    }

    /// Count one view of a post.
    pub fn record_post(&self, id: Uuid) {
        let store = Arc::clone(&self.posts);
        tokio::spawn(async move {
            if let Err(e) = store.increment_views(id).await {
                debug!(post_id = %id, error = %e, "Post view increment dropped");
            }
        });
    }
}
