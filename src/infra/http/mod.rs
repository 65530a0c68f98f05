pub mod handlers;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::browser::RemoteTemplateFetcher;
use crate::application::error::ErrorReport;
use crate::application::preview::PreviewService;
use crate::application::publish::PublishService;
use crate::application::repos::PostsRepo;
use crate::application::sites::ClientSiteResolver;
use crate::infra::db::PostgresRepositories;
use crate::infra::error::InfraError;

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<dyn PostsRepo>,
    pub preview: PreviewService,
    pub publisher: PublishService,
    pub resolver: ClientSiteResolver,
    pub fetcher: RemoteTemplateFetcher,
    pub db: PostgresRepositories,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/api/v1/posts", get(handlers::list_posts))
        .route("/api/v1/posts/preview", post(handlers::preview_post))
        .route("/api/v1/posts/{slug}/publish", post(handlers::publish_post))
        .route(
            "/api/v1/clients/{user_id}/templates/{template}",
            get(handlers::resolve_client_template),
        )
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}

pub(crate) fn db_health_response(result: Result<(), InfraError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
