//! Resolution of a client's externally hosted template URL.

use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::ProfilesRepo;
use crate::domain::error::DomainError;

/// Path convention under the client's site root.
const TEMPLATE_PATH_PREFIX: &str = "templates";

/// Maps a user to the URL of one of their hosted templates. Computes the
/// URL only; fetching it is [`RemoteTemplateFetcher`]'s job.
///
/// [`RemoteTemplateFetcher`]: crate::application::browser::RemoteTemplateFetcher
#[derive(Clone)]
pub struct ClientSiteResolver {
    profiles: Arc<dyn ProfilesRepo>,
}

impl ClientSiteResolver {
    pub fn new(profiles: Arc<dyn ProfilesRepo>) -> Self {
        Self { profiles }
    }

    pub async fn resolve_template_url(
        &self,
        user_id: Uuid,
        template: &str,
    ) -> Result<Url, AppError> {
        if template.is_empty()
            || !template
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::validation("Invalid template name").into());
        }

        let website_url = self
            .profiles
            .website_url(user_id)
            .await?
            .filter(|url| !url.trim().is_empty())
            .ok_or(DomainError::not_found("site binding"))?;

        let site = normalize_site_url(website_url.trim());
        let address = format!("{site}/{TEMPLATE_PATH_PREFIX}/{template}.html");

        Url::parse(&address).map_err(|err| {
            DomainError::validation(format!("Stored website URL is invalid: {err}")).into()
        })
    }
}

/// Bare hostnames gain `https://`; explicit schemes pass through.
fn normalize_site_url(raw: &str) -> String {
    let qualified = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    qualified.trim_end_matches('/').to_string()
}
