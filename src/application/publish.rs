//! The draft → published transition.

use std::sync::Arc;

use tracing::info;

use crate::application::error::AppError;
use crate::application::repos::PostsRepo;
use crate::application::webhook::{BuildTrigger, DispatchOutcome};
use crate::domain::error::DomainError;
use crate::domain::types::PostStatus;

const SOURCE: &str = "application::publish::PublishService";

/// Label carried in the build-hook body for publish-driven rebuilds.
pub const PUBLISH_TRIGGER: &str = "post_published";

#[derive(Debug, Clone)]
pub struct PublishCommand {
    pub slug: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Triggered,
    NoHookConfigured,
}

impl PublishOutcome {
    pub fn message(self) -> &'static str {
        match self {
            PublishOutcome::Triggered => "Netlify build triggered successfully",
            PublishOutcome::NoHookConfigured => "No build hook configured; no action taken",
        }
    }
}

/// Owns the publish transition. Dispatches the build hook exactly once per
/// request before touching stored state: a post is never marked published
/// when an attempted dispatch failed.
///
/// Re-publishing an already-published post dispatches again. The hook is
/// at-least-once per explicit request, and rebuild endpoints are expected
/// to be idempotent.
#[derive(Clone)]
pub struct PublishService {
    posts: Arc<dyn PostsRepo>,
    trigger: Arc<dyn BuildTrigger>,
}

impl PublishService {
    pub fn new(posts: Arc<dyn PostsRepo>, trigger: Arc<dyn BuildTrigger>) -> Self {
        Self { posts, trigger }
    }

    pub async fn publish(&self, command: &PublishCommand) -> Result<PublishOutcome, AppError> {
        if PostStatus::try_from(command.status.as_str()) != Ok(PostStatus::Published) {
            return Err(DomainError::validation("Invalid status").into());
        }

        let post = self
            .posts
            .find_by_slug(&command.slug)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        let outcome = self.trigger.dispatch(PUBLISH_TRIGGER).await?;

        self.posts
            .update_status(&command.slug, PostStatus::Published)
            .await?;

        info!(
            target = SOURCE,
            slug = command.slug,
            previous_status = post.status.as_str(),
            dispatched = matches!(outcome, DispatchOutcome::Triggered),
            "post published"
        );

        Ok(match outcome {
            DispatchOutcome::Triggered => PublishOutcome::Triggered,
            DispatchOutcome::Skipped => PublishOutcome::NoHookConfigured,
        })
    }
}
