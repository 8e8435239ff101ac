//! In-memory implementation of the link repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    links: HashMap<String, Link>,
    next_id: i64,
}

/// Process-local link store.
///
/// Used for `STORAGE_BACKEND=memory`, integration tests and the CLI's dry
/// runs. Enforces slug uniqueness under its mutex, so it reproduces the same
/// conflict contract as the PostgreSQL unique index.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    inner: Mutex<Inner>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.links.get(&slug.to_ascii_lowercase()).cloned())
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.inner.lock().await;
        let slug = new_link.slug.to_ascii_lowercase();

        if inner.links.contains_key(&slug) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_slug_key" }),
            ));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let link = Link {
            id: inner.next_id,
            slug: slug.clone(),
            destination_url: new_link.destination_url,
            keywords: new_link.keywords,
            click_count: 0,
            click_limit: new_link.click_limit,
            expires_at: new_link.expires_at,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        inner.links.insert(slug, link.clone());
        Ok(link)
    }

    async fn update(&self, slug: &str, patch: LinkPatch) -> Result<Option<Link>, AppError> {
        let mut inner = self.inner.lock().await;

        Ok(inner.links.get_mut(&slug.to_ascii_lowercase()).map(|link| {
            patch.apply(link);
            link.clone()
        }))
    }

    async fn record_click(&self, slug: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().await;

        match inner.links.get_mut(&slug.to_ascii_lowercase()) {
            Some(link) => {
                link.click_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let inner = self.inner.lock().await;

        let mut links: Vec<Link> = inner
            .links
            .values()
            .filter(|l| l.is_active)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        links.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(links)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_link(slug: &str) -> NewLink {
        NewLink {
            slug: slug.to_string(),
            destination_url: "https://example.com/".to_string(),
            keywords: vec![],
            click_limit: None,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_case_insensitive() {
        let repo = InMemoryLinkRepository::new();
        let link = repo.create(new_link("Amazon.Product")).await.unwrap();
        assert_eq!(link.slug, "amazon.product");

        let found = repo.find_by_slug("AMAZON.PRODUCT").await.unwrap();
        assert_eq!(found.map(|l| l.id), Some(link.id));
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let repo = InMemoryLinkRepository::new();
        repo.create(new_link("promo")).await.unwrap();

        let err = repo.create(new_link("PROMO")).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_concurrent_creates_exactly_one_wins() {
        let repo = Arc::new(InMemoryLinkRepository::new());

        let a = tokio::spawn({
            let repo = repo.clone();
            async move { repo.create(new_link("race")).await }
        });
        let b = tokio::spawn({
            let repo = repo.clone();
            async move { repo.create(new_link("race")).await }
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| r.as_ref().is_err_and(|e| e.is_conflict()))
            .count();

        assert_eq!(ok, 1);
        assert_eq!(conflicts, 1);
    }

    #[tokio::test]
    async fn test_update_and_record_click() {
        let repo = InMemoryLinkRepository::new();
        repo.create(new_link("promo")).await.unwrap();

        let patch = LinkPatch {
            is_active: Some(false),
            ..Default::default()
        };
        let updated = repo.update("promo", patch).await.unwrap().unwrap();
        assert!(!updated.is_active);

        assert!(repo.record_click("promo").await.unwrap());
        assert!(!repo.record_click("missing").await.unwrap());
        assert_eq!(
            repo.find_by_slug("promo").await.unwrap().unwrap().click_count,
            1
        );

        assert!(repo.update("missing", LinkPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_skips_inactive() {
        let repo = InMemoryLinkRepository::new();
        repo.create(new_link("one")).await.unwrap();
        repo.create(new_link("two")).await.unwrap();
        repo.create(new_link("three")).await.unwrap();
        repo.update(
            "two",
            LinkPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let slugs: Vec<String> = repo
            .list_recent(10)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.slug)
            .collect();
        assert_eq!(slugs, vec!["three", "one"]);

        assert_eq!(repo.list_recent(1).await.unwrap().len(), 1);
    }
}
