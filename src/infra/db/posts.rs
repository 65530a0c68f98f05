use async_trait::async_trait;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::types::PostStatus;

use super::PostgresRepositories;

const POST_COLUMNS: &str = "id, slug, title, content, content_html, template, \
                            featured_image, status, created_at, updated_at";

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1");
        sqlx::query_as::<_, PostRecord>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_persistence)
    }

    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<PostRecord>, RepoError> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE status = $1 ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, PostRecord>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_persistence)
    }

    async fn update_content_html(&self, slug: &str, html: &str) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE posts SET content_html = $2, updated_at = now() WHERE slug = $1",
        )
        .bind(slug)
        .bind(html)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_persistence)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("post"));
        }
        Ok(())
    }

    async fn update_status(&self, slug: &str, status: PostStatus) -> Result<(), RepoError> {
        let result =
            sqlx::query("UPDATE posts SET status = $2, updated_at = now() WHERE slug = $1")
                .bind(slug)
                .bind(status)
                .execute(&self.pool)
                .await
                .map_err(RepoError::from_persistence)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("post"));
        }
        Ok(())
    }
}
