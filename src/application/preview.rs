//! Static preview rendering for posts.

use metrics::counter;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::templates::{self, TemplateFields};
use crate::domain::types::TemplateKind;

const SOURCE: &str = "application::preview::PreviewService";

#[derive(Debug, Clone)]
pub struct PreviewCommand {
    pub title: String,
    pub content: String,
    pub template: String,
    pub slug: String,
    pub featured_image: Option<String>,
}

/// Renders a post's fields into static HTML via the template registry.
///
/// Pure apart from metrics: no storage I/O happens here, the caller owns
/// persisting the result into `content_html`. Identical inputs always
/// produce byte-identical output.
#[derive(Debug, Clone, Default)]
pub struct PreviewService;

impl PreviewService {
    pub fn new() -> Self {
        Self
    }

    pub fn render_preview(&self, command: &PreviewCommand) -> Result<String, DomainError> {
        require_non_empty("title", &command.title)?;
        require_non_empty("content", &command.content)?;
        require_non_empty("template", &command.template)?;
        require_non_empty("slug", &command.slug)?;

        let kind = TemplateKind::from_name(&command.template);
        let fields = TemplateFields {
            title: &command.title,
            content: &command.content,
            featured_image: command.featured_image.as_deref(),
        };
        let html = templates::render(kind, &fields);

        counter!("foglio_preview_render_total").increment(1);
        debug!(
            target = SOURCE,
            slug = command.slug,
            template = kind.as_str(),
            bytes = html.len(),
            "preview rendered"
        );

        Ok(html)
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!(
            "Missing required field `{field}`"
        )));
    }
    Ok(())
}
