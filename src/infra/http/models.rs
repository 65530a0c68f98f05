//! Request and response bodies for the pipeline surface.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::entities::PostRecord;
use crate::domain::types::{PostStatus, TemplateKind};

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub title: String,
    pub content: String,
    pub template: String,
    pub slug: String,
    pub featured_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(rename = "previewHtml")]
    pub preview_html: String,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    #[serde(rename = "templateHtml")]
    pub template_html: String,
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub template: TemplateKind,
    pub status: PostStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<PostRecord> for PostSummary {
    fn from(record: PostRecord) -> Self {
        Self {
            slug: record.slug,
            title: record.title,
            template: record.template,
            status: record.status,
            updated_at: record.updated_at,
        }
    }
}
