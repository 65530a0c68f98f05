use std::collections::HashMap;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use foglio::application::error::AppError;
use foglio::application::publish::{PublishCommand, PublishService};
use foglio::application::repos::{PostsRepo, RepoError};
use foglio::application::webhook::{BuildTrigger, DispatchOutcome, WebhookDispatcher, WebhookError};
use foglio::domain::entities::PostRecord;
use foglio::domain::error::DomainError;
use foglio::domain::types::{PostStatus, TemplateKind};

struct InMemoryPosts {
    posts: Mutex<HashMap<String, PostRecord>>,
}

impl InMemoryPosts {
    fn with_post(post: PostRecord) -> Arc<Self> {
        let mut posts = HashMap::new();
        posts.insert(post.slug.clone(), post);
        Arc::new(Self {
            posts: Mutex::new(posts),
        })
    }

    async fn status_of(&self, slug: &str) -> PostStatus {
        self.posts.lock().await.get(slug).unwrap().status
    }
}

#[async_trait]
impl PostsRepo for InMemoryPosts {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.posts.lock().await.get(slug).cloned())
    }

    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<PostRecord>, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .values()
            .filter(|post| post.status == status)
            .cloned()
            .collect())
    }

    async fn update_content_html(&self, slug: &str, html: &str) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts.get_mut(slug).ok_or(RepoError::not_found("post"))?;
        post.content_html = Some(html.to_string());
        Ok(())
    }

    async fn update_status(&self, slug: &str, status: PostStatus) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts.get_mut(slug).ok_or(RepoError::not_found("post"))?;
        post.status = status;
        Ok(())
    }
}

enum TriggerMode {
    Accept,
    Reject { status: u16 },
}

struct CountingTrigger {
    mode: TriggerMode,
    dispatched: AtomicUsize,
}

impl CountingTrigger {
    fn new(mode: TriggerMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            dispatched: AtomicUsize::new(0),
        })
    }

    fn count(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BuildTrigger for CountingTrigger {
    async fn dispatch(&self, _trigger: &str) -> Result<DispatchOutcome, WebhookError> {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            TriggerMode::Accept => Ok(DispatchOutcome::Triggered),
            TriggerMode::Reject { status } => Err(WebhookError::Rejected {
                status,
                body: "hook exploded".to_string(),
            }),
        }
    }
}

fn draft_post(slug: &str) -> PostRecord {
    let now = OffsetDateTime::now_utc();
    PostRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: "Hi".to_string(),
        content: "<p>Hi</p>".to_string(),
        content_html: None,
        template: TemplateKind::Minimal,
        featured_image: None,
        status: PostStatus::Draft,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn publishing_dispatches_once_and_marks_post_published() {
    let posts = InMemoryPosts::with_post(draft_post("hi"));
    let trigger = CountingTrigger::new(TriggerMode::Accept);
    let service = PublishService::new(posts.clone(), trigger.clone());

    let outcome = service
        .publish(&PublishCommand {
            slug: "hi".to_string(),
            status: "published".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(outcome.message(), "Netlify build triggered successfully");
    assert_eq!(trigger.count(), 1);
    assert_eq!(posts.status_of("hi").await, PostStatus::Published);
}

#[tokio::test]
async fn non_published_status_never_dispatches() {
    let posts = InMemoryPosts::with_post(draft_post("hi"));
    let trigger = CountingTrigger::new(TriggerMode::Accept);
    let service = PublishService::new(posts.clone(), trigger.clone());

    let err = service
        .publish(&PublishCommand {
            slug: "hi".to_string(),
            status: "draft".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Domain(DomainError::Validation { .. })
    ));
    assert_eq!(err.to_string(), "Invalid status");
    assert_eq!(trigger.count(), 0);
    assert_eq!(posts.status_of("hi").await, PostStatus::Draft);
}

#[tokio::test]
async fn garbage_status_is_rejected_like_draft() {
    let posts = InMemoryPosts::with_post(draft_post("hi"));
    let trigger = CountingTrigger::new(TriggerMode::Accept);
    let service = PublishService::new(posts, trigger.clone());

    let err = service
        .publish(&PublishCommand {
            slug: "hi".to_string(),
            status: "launched".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid status");
    assert_eq!(trigger.count(), 0);
}

#[tokio::test]
async fn unconfigured_hook_is_a_success_with_no_action_taken() {
    let posts = InMemoryPosts::with_post(draft_post("hi"));
    let dispatcher = Arc::new(WebhookDispatcher::new(None));
    let service = PublishService::new(posts.clone(), dispatcher);

    let outcome = service
        .publish(&PublishCommand {
            slug: "hi".to_string(),
            status: "published".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(outcome.message(), "No build hook configured; no action taken");
    assert_eq!(posts.status_of("hi").await, PostStatus::Published);
}

#[tokio::test]
async fn rejected_dispatch_leaves_post_unpublished() {
    let posts = InMemoryPosts::with_post(draft_post("hi"));
    let trigger = CountingTrigger::new(TriggerMode::Reject { status: 500 });
    let service = PublishService::new(posts.clone(), trigger.clone());

    let err = service
        .publish(&PublishCommand {
            slug: "hi".to_string(),
            status: "published".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Webhook(_)));
    assert_eq!(trigger.count(), 1);
    assert_eq!(posts.status_of("hi").await, PostStatus::Draft);
}

#[tokio::test]
async fn unknown_slug_is_not_found_without_dispatch() {
    let posts = InMemoryPosts::with_post(draft_post("hi"));
    let trigger = CountingTrigger::new(TriggerMode::Accept);
    let service = PublishService::new(posts, trigger.clone());

    let err = service
        .publish(&PublishCommand {
            slug: "missing".to_string(),
            status: "published".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Domain(DomainError::NotFound { .. })
    ));
    assert_eq!(trigger.count(), 0);
}

#[tokio::test]
async fn republishing_dispatches_again() {
    let posts = InMemoryPosts::with_post(draft_post("hi"));
    let trigger = CountingTrigger::new(TriggerMode::Accept);
    let service = PublishService::new(posts.clone(), trigger.clone());

    for _ in 0..2 {
        service
            .publish(&PublishCommand {
                slug: "hi".to_string(),
                status: "published".to_string(),
            })
            .await
            .unwrap();
    }

    assert_eq!(trigger.count(), 2);
    assert_eq!(posts.status_of("hi").await, PostStatus::Published);
}
