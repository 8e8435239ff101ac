//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, slug, destination_url, keywords, click_count, click_limit, \
                            expires_at, is_active, created_at, updated_at";

/// PostgreSQL repository for links.
///
/// Slug uniqueness is enforced by the `links_slug_key` unique index; a
/// violating insert surfaces as [`AppError::Conflict`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE slug = $1");

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(slug.to_ascii_lowercase())
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (slug, destination_url, keywords, click_limit, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(new_link.slug.to_ascii_lowercase())
            .bind(&new_link.destination_url)
            .bind(&new_link.keywords)
            .bind(new_link.click_limit)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn update(&self, slug: &str, patch: LinkPatch) -> Result<Option<Link>, AppError> {
        let sql = format!(
            r#"
            UPDATE links SET
                destination_url = COALESCE($2, destination_url),
                is_active       = COALESCE($3, is_active),
                expires_at      = CASE WHEN $4 THEN $5 ELSE expires_at END,
                click_limit     = CASE WHEN $6 THEN $7 ELSE click_limit END,
                updated_at      = NOW()
            WHERE slug = $1
            RETURNING {LINK_COLUMNS}
            "#
        );

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(slug.to_ascii_lowercase())
            .bind(patch.destination_url)
            .bind(patch.is_active)
            .bind(patch.expires_at.is_some())
            .bind(patch.expires_at.flatten())
            .bind(patch.click_limit.is_some())
            .bind(patch.click_limit.flatten())
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn record_click(&self, slug: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE slug = $1")
            .bind(slug.to_ascii_lowercase())
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE is_active ORDER BY created_at DESC, id DESC LIMIT $1"
        );

        let links = sqlx::query_as::<_, Link>(&sql)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(links)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
