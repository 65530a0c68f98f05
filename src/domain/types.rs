//! Shared domain enumerations aligned with persisted database enums.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "post_status", rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl TryFrom<&str> for PostStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(()),
        }
    }
}

/// Closed set of rendering strategies. `Custom` marks a template hosted on
/// the client's own site; the registry renders it like `Basic` so that no
/// template name can ever fail a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "template_kind", rename_all = "snake_case")]
pub enum TemplateKind {
    Basic,
    Minimal,
    Modern,
    Custom,
}

impl TemplateKind {
    /// Unknown names degrade to `Basic` instead of failing.
    pub fn from_name(name: &str) -> Self {
        match name {
            "minimal" => TemplateKind::Minimal,
            "modern" => TemplateKind::Modern,
            "custom" => TemplateKind::Custom,
            _ => TemplateKind::Basic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Basic => "basic",
            TemplateKind::Minimal => "minimal",
            TemplateKind::Modern => "modern",
            TemplateKind::Custom => "custom",
        }
    }
}
