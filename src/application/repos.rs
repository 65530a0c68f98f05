//! Repository traits describing persistence adapters.
//!
//! The pipeline consumes storage only through these traits so every
//! component stays testable against in-memory fakes, and so "not found"
//! is always a distinct outcome from a storage fault.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::PostRecord;
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<PostRecord>, RepoError>;

    /// Overwrite the cached render for `slug`. `NotFound` when no such post.
    async fn update_content_html(&self, slug: &str, html: &str) -> Result<(), RepoError>;

    /// Persist a status transition for `slug`. `NotFound` when no such post.
    async fn update_status(&self, slug: &str, status: PostStatus) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ProfilesRepo: Send + Sync {
    /// The website URL bound to `user_id`, or `None` when no binding exists.
    async fn website_url(&self, user_id: Uuid) -> Result<Option<String>, RepoError>;
}
