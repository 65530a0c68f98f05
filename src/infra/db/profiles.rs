use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{ProfilesRepo, RepoError};

use super::PostgresRepositories;

#[async_trait]
impl ProfilesRepo for PostgresRepositories {
    async fn website_url(&self, user_id: Uuid) -> Result<Option<String>, RepoError> {
        sqlx::query_scalar::<_, String>("SELECT website_url FROM site_bindings WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_persistence)
    }
}
