use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use tracing::debug;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::preview::PreviewCommand;
use crate::application::publish::PublishCommand;
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;
use crate::domain::types::PostStatus;

use super::models::{
    PostListQuery, PostSummary, PreviewRequest, PreviewResponse, PublishRequest, PublishResponse,
    TemplateResponse,
};
use super::{HttpState, db_health_response};

pub async fn health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.ping().await)
}

pub async fn list_posts(
    State(state): State<HttpState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<Vec<PostSummary>>, AppError> {
    let status = PostStatus::try_from(query.status.as_str())
        .map_err(|_| DomainError::validation("Invalid status"))?;

    let posts = state.posts.list_by_status(status).await?;
    Ok(Json(posts.into_iter().map(PostSummary::from).collect()))
}

/// Renders a static preview and refreshes the stored `content_html` cache.
/// A slug that is not stored yet is fine: drafts are previewed before they
/// are ever saved, so only real storage faults propagate.
pub async fn preview_post(
    State(state): State<HttpState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let command = PreviewCommand {
        title: request.title,
        content: request.content,
        template: request.template,
        slug: request.slug,
        featured_image: request.featured_image,
    };

    let html = state.preview.render_preview(&command)?;

    match state.posts.update_content_html(&command.slug, &html).await {
        Ok(()) => {}
        Err(RepoError::NotFound { .. }) => {
            debug!(
                target = "infra::http::preview_post",
                slug = command.slug,
                "previewed unsaved draft, cache not persisted"
            );
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Json(PreviewResponse { preview_html: html }))
}

pub async fn publish_post(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, AppError> {
    let command = PublishCommand {
        slug,
        status: request.status,
    };

    let outcome = state.publisher.publish(&command).await?;
    Ok(Json(PublishResponse {
        message: outcome.message().to_string(),
    }))
}

pub async fn resolve_client_template(
    State(state): State<HttpState>,
    Path((user_id, template)): Path<(Uuid, String)>,
) -> Result<Json<TemplateResponse>, AppError> {
    let url = state.resolver.resolve_template_url(user_id, &template).await?;
    let html = state.fetcher.fetch_rendered_html(&url).await?;
    Ok(Json(TemplateResponse {
        template_html: html,
    }))
}
