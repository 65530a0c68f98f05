use std::{process, sync::Arc, time::Duration};

use foglio::{
    application::{
        browser::{BrowserEngine, RemoteTemplateFetcher},
        error::AppError,
        preview::PreviewService,
        publish::PublishService,
        repos::{PostsRepo, ProfilesRepo},
        sites::ClientSiteResolver,
        webhook::{BuildTrigger, WebhookDispatcher},
    },
    config,
    infra::{
        chromium::ChromiumEngine,
        db::PostgresRepositories,
        http::{HttpState, build_router},
        telemetry,
    },
};
use sqlx::postgres::PgPoolOptions;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    let database_url = settings
        .database
        .url
        .as_deref()
        .ok_or_else(|| AppError::unexpected("no database URL configured"))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections.get())
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .map_err(|err| AppError::unexpected(format!("failed to connect to database: {err}")))?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|err| AppError::unexpected(format!("failed to run migrations: {err}")))?;

    let repositories = PostgresRepositories::new(pool);
    let posts: Arc<dyn PostsRepo> = Arc::new(repositories.clone());
    let profiles: Arc<dyn ProfilesRepo> = Arc::new(repositories.clone());

    let trigger: Arc<dyn BuildTrigger> =
        Arc::new(WebhookDispatcher::new(settings.build_hook.url.clone()));
    let engine: Arc<dyn BrowserEngine> = Arc::new(ChromiumEngine::new(settings.browser.clone()));

    let state = HttpState {
        posts: posts.clone(),
        preview: PreviewService::new(),
        publisher: PublishService::new(posts, trigger),
        resolver: ClientSiteResolver::new(profiles),
        fetcher: RemoteTemplateFetcher::new(engine),
        db: repositories,
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| {
            AppError::unexpected(format!("failed to bind {}: {err}", settings.server.addr))
        })?;

    info!(
        target = "foglio::main",
        addr = %settings.server.addr,
        build_hook_configured = settings.build_hook.url.is_some(),
        "serving"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(settings.server.graceful_shutdown))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

/// Resolves on the first shutdown signal. In-flight connections then drain,
/// bounded by the configured grace period with a hard exit as backstop.
async fn shutdown_signal(grace: Duration) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!(
        target = "foglio::main",
        grace_seconds = grace.as_secs(),
        "shutdown signal received, draining"
    );
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        error!("graceful shutdown grace period elapsed, exiting");
        process::exit(0);
    });
}
