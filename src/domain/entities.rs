//! Persisted records as they exist in storage.

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{PostStatus, TemplateKind};

/// A content item. `content_html` is a cache of the last render of
/// `content`/`template`/`featured_image` and is never authoritative.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub content_html: Option<String>,
    pub template: TemplateKind,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Maps a user to their externally hosted website. Owned by the
/// profile/membership store; read-only here.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SiteBindingRecord {
    pub user_id: Uuid,
    pub website_url: String,
}
