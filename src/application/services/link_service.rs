//! Link creation, redirect resolution and management.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::slug_resolver::{Resolution, SlugResolver};
use super::suggestion_service::SuggestionService;
use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::domain::slug::{detect, is_valid_slug, sanitize, validate_custom_slug, with_suffix};
use crate::error::AppError;
use crate::infrastructure::cache::{CachedRedirect, RedirectCache};
use crate::utils::url_normalizer::normalize_url;

/// Insert attempts for a generated slug before giving up.
const MAX_CREATE_ATTEMPTS: usize = 5;

/// Keywords kept per link.
const MAX_KEYWORDS: usize = 10;

/// Input for [`LinkService::create`].
#[derive(Debug, Clone, Default)]
pub struct LinkDraft {
    pub url: String,
    pub keywords: Vec<String>,
    pub custom_slug: Option<String>,
    pub click_limit: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub base_url: String,
    /// TTL for entries populated by redirects.
    pub redirect_ttl: Duration,
    /// TTL for the entry written when a link is created.
    pub creation_ttl: Duration,
}

/// Orchestrates the slug pipeline and the redirect cache.
///
/// Creation runs strictly in order: pattern detection (or AI/heuristic
/// generation), sanitization, uniqueness resolution, insert, cache
/// population. The resolver's availability check is advisory; the
/// repository's uniqueness constraint decides, and a generated slug that
/// loses a race is re-resolved and retried.
#[derive(Clone)]
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    resolver: SlugResolver,
    suggestions: SuggestionService,
    cache: RedirectCache,
    settings: LinkSettings,
}

impl LinkService {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        suggestions: SuggestionService,
        cache: RedirectCache,
        settings: LinkSettings,
    ) -> Self {
        Self {
            resolver: SlugResolver::new(repository.clone()),
            repository,
            suggestions,
            cache,
            settings,
        }
    }

    /// Creates a link.
    ///
    /// # Slug Assignment
    ///
    /// - A custom slug is used as given (lowercased) or the call fails.
    /// - Otherwise the slug comes from the pattern detector, then the
    ///   suggestion service. A collision is resolved silently with the next
    ///   free alternate.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the destination is not an HTTP(S) URL
    /// - [`AppError::Validation`] for a malformed custom slug or bad limits
    /// - [`AppError::SlugTaken`] if the custom slug already exists
    /// - [`AppError::Internal`] if every generated candidate lost its race
    pub async fn create(&self, draft: LinkDraft) -> Result<Link, AppError> {
        let destination_url = normalize_url(&draft.url).map_err(|e| {
            AppError::invalid_url("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        validate_limits(draft.click_limit, draft.expires_at)?;

        let keywords: Vec<String> = draft
            .keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .take(MAX_KEYWORDS)
            .collect();

        let new_link = NewLink {
            slug: String::new(),
            destination_url,
            keywords,
            click_limit: draft.click_limit,
            expires_at: draft.expires_at,
        };

        let link = match draft.custom_slug {
            Some(custom) => self.create_with_custom_slug(&custom, new_link).await?,
            None => self.create_with_generated_slug(new_link).await?,
        };

        self.cache
            .put(&link.slug, &snapshot(&link), self.settings.creation_ttl)
            .await;

        info!(slug = %link.slug, url = %link.destination_url, "Link created");

        Ok(link)
    }

    async fn create_with_custom_slug(
        &self,
        custom: &str,
        mut new_link: NewLink,
    ) -> Result<Link, AppError> {
        let slug = validate_custom_slug(custom)?;

        if !self.resolver.is_free(&slug).await? {
            return Err(AppError::slug_taken(slug));
        }

        new_link.slug = slug.clone();

        match self.repository.create(new_link).await {
            Err(e) if e.is_conflict() => Err(AppError::slug_taken(slug)),
            other => other,
        }
    }

    async fn create_with_generated_slug(&self, new_link: NewLink) -> Result<Link, AppError> {
        let base = self
            .candidate_slug(&new_link.destination_url, &new_link.keywords)
            .await;

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let resolution = self.resolver.resolve(&base).await?;
            let slug = pick_slug(&base, resolution);

            let mut candidate = new_link.clone();
            candidate.slug = slug.clone();

            match self.repository.create(candidate).await {
                Ok(link) => return Ok(link),
                Err(e) if e.is_conflict() => {
                    metrics::counter!("slug_conflicts_total").increment(1);
                    warn!(%slug, attempt, "Slug claimed concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to assign a unique slug",
            json!({ "slug": base, "attempts": MAX_CREATE_ATTEMPTS }),
        ))
    }

    /// Proposes a base slug in stored form for `url`.
    async fn candidate_slug(&self, url: &str, keywords: &[String]) -> String {
        let detected = detect(url);

        if let Some(suggested) = detected.suggested_slug.filter(|_| detected.matched) {
            let slug = sanitize(&suggested);
            if !slug.is_empty() {
                debug!(pattern = detected.pattern_name, %slug, "Using detected pattern slug");
                return slug;
            }
        }

        self.suggestions.generate_one(url, keywords).await
    }

    /// Resolves a slug to the destination a redirect should go to.
    ///
    /// A cache hit is re-checked against storage before it is served; an
    /// entry whose link disappeared, was deactivated or expired is evicted.
    /// A miss reads storage and populates the cache in the background.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for unknown or inactive slugs
    /// - [`AppError::Gone`] for links past their expiry date or click limit
    pub async fn resolve_redirect(&self, slug: &str) -> Result<String, AppError> {
        let slug = slug.to_ascii_lowercase();

        if let Some(cached) = self.cache.get(&slug).await {
            let found = self.repository.find_by_slug(&slug).await?;

            let link = match servable(&slug, found) {
                Ok(link) => link,
                Err(e) => {
                    self.cache.invalidate(&slug).await;
                    return Err(e);
                }
            };

            if link.destination_url != cached.destination_url {
                debug!(%slug, "Refreshing stale redirect cache entry");
                self.cache
                    .put(&slug, &snapshot(&link), self.settings.redirect_ttl)
                    .await;
            }

            return Ok(link.destination_url);
        }

        let found = self.repository.find_by_slug(&slug).await?;
        let link = servable(&slug, found)?;

        let cache = self.cache.clone();
        let entry = snapshot(&link);
        let ttl = self.settings.redirect_ttl;
        tokio::spawn(async move {
            cache.put(&slug, &entry, ttl).await;
        });

        Ok(link.destination_url)
    }

    /// Retrieves a link by slug, whatever its state.
    pub async fn get(&self, slug: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "slug": slug })))
    }

    /// Lists the most recently created active links.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        self.repository.list_recent(limit).await
    }

    /// Applies a partial update and evicts the redirect cache entry before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty patch or bad limits,
    /// [`AppError::InvalidUrl`] for a bad destination and
    /// [`AppError::NotFound`] if the slug does not exist.
    pub async fn update(&self, slug: &str, mut patch: LinkPatch) -> Result<Link, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({ "slug": slug }),
            ));
        }

        if let Some(url) = &patch.destination_url {
            let normalized = normalize_url(url).map_err(|e| {
                AppError::invalid_url("Invalid URL format", json!({ "reason": e.to_string() }))
            })?;
            patch.destination_url = Some(normalized);
        }

        validate_limits(patch.click_limit.flatten(), patch.expires_at.flatten())?;

        let link = self
            .repository
            .update(slug, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "slug": slug })))?;

        self.cache.invalidate(&link.slug).await;
        info!(slug = %link.slug, "Link updated");

        Ok(link)
    }

    /// Deactivates a link. Its slug stays reserved.
    pub async fn deactivate(&self, slug: &str) -> Result<Link, AppError> {
        self.update(
            slug,
            LinkPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    /// Checks whether `slug` is free and proposes alternates if not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `slug` is not valid slug grammar.
    pub async fn check_slug(&self, slug: &str) -> Result<Resolution, AppError> {
        if !is_valid_slug(&slug.to_ascii_lowercase()) {
            return Err(AppError::bad_request(
                "Invalid slug format",
                json!({ "slug": slug }),
            ));
        }

        self.resolver.resolve(slug).await
    }

    /// Drops the cached redirect for `slug`.
    pub async fn invalidate_cache(&self, slug: &str) {
        self.cache.invalidate(slug).await;
    }

    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), slug)
    }
}

/// Picks the slug to insert from a resolution of `base`.
///
/// Falls back to a random suffix when every ordered alternate is taken.
fn pick_slug(base: &str, resolution: Resolution) -> String {
    if resolution.available {
        return resolution.slug;
    }

    match resolution.suggestions.into_iter().next() {
        Some(alternative) => alternative.slug,
        None => {
            let suffix: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(4)
                .map(|b| (b as char).to_ascii_lowercase())
                .collect();
            with_suffix(base, &suffix)
        }
    }
}

fn servable(slug: &str, found: Option<Link>) -> Result<Link, AppError> {
    let link = found
        .filter(|l| l.is_active)
        .ok_or_else(|| AppError::not_found("Link not found", json!({ "slug": slug })))?;

    if link.is_expired() {
        return Err(AppError::gone("Link has expired", json!({ "slug": slug })));
    }

    Ok(link)
}

fn snapshot(link: &Link) -> CachedRedirect {
    CachedRedirect {
        destination_url: link.destination_url.clone(),
        click_count: link.click_count,
    }
}

fn validate_limits(
    click_limit: Option<i64>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if let Some(limit) = click_limit
        && limit <= 0
    {
        return Err(AppError::bad_request(
            "clickLimit must be positive",
            json!({ "clickLimit": limit }),
        ));
    }

    if let Some(expires_at) = expires_at
        && expires_at <= Utc::now()
    {
        return Err(AppError::bad_request(
            "expiresAt must be in the future",
            json!({ "expiresAt": expires_at }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::suggestion_service::SuggestionSettings;
    use crate::infrastructure::cache::{CacheService, MemoryCache, SuggestionCache};
    use crate::infrastructure::persistence::InMemoryLinkRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixture {
        service: LinkService,
        repo: Arc<InMemoryLinkRepository>,
        cache: RedirectCache,
    }

    fn fixture_with(repo: Arc<dyn LinkRepository>, raw: Arc<InMemoryLinkRepository>) -> Fixture {
        let backend: Arc<dyn CacheService> = Arc::new(MemoryCache::new());
        let cache = RedirectCache::new(backend.clone());
        let suggestions = SuggestionService::new(
            None,
            SuggestionCache::new(backend, Duration::from_secs(60)),
            SuggestionSettings {
                ai_timeout: Duration::from_secs(1),
                slow_threshold: Duration::from_secs(1),
                base_url: "http://s.test".into(),
            },
        );
        let service = LinkService::new(
            repo,
            suggestions,
            cache.clone(),
            LinkSettings {
                base_url: "http://s.test".into(),
                redirect_ttl: Duration::from_secs(86400),
                creation_ttl: Duration::from_secs(3600),
            },
        );

        Fixture {
            service,
            repo: raw,
            cache,
        }
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryLinkRepository::new());
        fixture_with(repo.clone(), repo)
    }

    fn draft(url: &str) -> LinkDraft {
        LinkDraft {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_uses_detected_pattern() {
        let f = fixture();
        let link = f
            .service
            .create(draft("https://github.com/facebook/react"))
            .await
            .unwrap();

        assert_eq!(link.slug, "github.facebook.react");
        assert_eq!(
            f.service.short_url(&link.slug),
            "http://s.test/github.facebook.react"
        );

        let cached = f.cache.get("github.facebook.react").await.unwrap();
        assert_eq!(cached.destination_url, "https://github.com/facebook/react");
    }

    #[tokio::test]
    async fn test_generated_collision_gets_numbered_alternate() {
        let f = fixture();
        let first = f
            .service
            .create(draft("https://github.com/facebook/react"))
            .await
            .unwrap();
        let second = f
            .service
            .create(draft("https://github.com/facebook/react"))
            .await
            .unwrap();

        assert_eq!(first.slug, "github.facebook.react");
        assert_eq!(second.slug, "github.facebook.react.2");
    }

    #[tokio::test]
    async fn test_create_with_keywords_uses_fallback() {
        let f = fixture();
        let link = f
            .service
            .create(LinkDraft {
                url: "https://shop.example.com/item/991".into(),
                keywords: vec!["test".into(), "product".into(), "demo".into()],
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(link.slug, "test.product.demo");
        assert_eq!(link.keywords.len(), 3);
    }

    #[tokio::test]
    async fn test_custom_slug_conflict_is_reported() {
        let f = fixture();
        let mut d = draft("https://example.com/a");
        d.custom_slug = Some("Spring.Sale".into());
        let link = f.service.create(d.clone()).await.unwrap();
        assert_eq!(link.slug, "spring.sale");

        d.custom_slug = Some("spring.SALE".into());
        let err = f.service.create(d).await.unwrap_err();
        assert!(matches!(err, AppError::SlugTaken { .. }));
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let f = fixture();

        let err = f.service.create(draft("javascript:alert(1)")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));

        let mut d = draft("https://example.com");
        d.custom_slug = Some("health".into());
        let err = f.service.create(d).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let mut d = draft("https://example.com");
        d.click_limit = Some(0);
        let err = f.service.create(d).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    /// Claims the requested slug with a competing insert right before the
    /// first create call, as a concurrent request would.
    struct RacingRepository {
        inner: Arc<InMemoryLinkRepository>,
        raced: AtomicBool,
    }

    #[async_trait]
    impl LinkRepository for RacingRepository {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
            self.inner.find_by_slug(slug).await
        }

        async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                let mut rival = new_link.clone();
                rival.destination_url = "https://rival.example.com".into();
                self.inner.create(rival).await?;
            }
            self.inner.create(new_link).await
        }

        async fn update(&self, slug: &str, patch: LinkPatch) -> Result<Option<Link>, AppError> {
            self.inner.update(slug, patch).await
        }

        async fn record_click(&self, slug: &str) -> Result<bool, AppError> {
            self.inner.record_click(slug).await
        }

        async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError> {
            self.inner.list_recent(limit).await
        }

        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_lost_race_retries_with_fresh_alternate() {
        let inner = Arc::new(InMemoryLinkRepository::new());
        let racing = Arc::new(RacingRepository {
            inner: inner.clone(),
            raced: AtomicBool::new(false),
        });
        let f = fixture_with(racing, inner);

        let link = f
            .service
            .create(draft("https://github.com/rust-lang/rust"))
            .await
            .unwrap();
        assert_eq!(link.slug, "github.rust-lang.rust.2");

        let rival = f.repo.find_by_slug("github.rust-lang.rust").await.unwrap().unwrap();
        assert_eq!(rival.destination_url, "https://rival.example.com");
    }

    #[tokio::test]
    async fn test_lost_race_on_custom_slug_is_slug_taken() {
        let inner = Arc::new(InMemoryLinkRepository::new());
        let racing = Arc::new(RacingRepository {
            inner: inner.clone(),
            raced: AtomicBool::new(false),
        });
        let f = fixture_with(racing, inner);

        let mut d = draft("https://example.com");
        d.custom_slug = Some("launch".into());
        let err = f.service.create(d).await.unwrap_err();
        assert!(matches!(err, AppError::SlugTaken { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_slugs() {
        let f = fixture();
        let a = f.service.clone();
        let b = f.service.clone();

        let (ra, rb) = tokio::join!(
            a.create(draft("https://github.com/tokio-rs/tokio")),
            b.create(draft("https://github.com/tokio-rs/tokio")),
        );
        let (ra, rb) = (ra.unwrap(), rb.unwrap());

        assert_ne!(ra.slug, rb.slug);
        let mut slugs = vec![ra.slug, rb.slug];
        slugs.sort();
        assert_eq!(slugs, vec!["github.tokio-rs.tokio", "github.tokio-rs.tokio.2"]);
    }

    #[tokio::test]
    async fn test_redirect_serves_active_link() {
        let f = fixture();
        let link = f.service.create(draft("https://example.com/x")).await.unwrap();

        let dest = f.service.resolve_redirect(&link.slug.to_uppercase()).await.unwrap();
        assert_eq!(dest, "https://example.com/x");
    }

    #[tokio::test]
    async fn test_redirect_evicts_expired_cache_entry() {
        let f = fixture();
        let mut d = draft("https://example.com/flash");
        d.custom_slug = Some("flash".into());
        d.click_limit = Some(1);
        f.service.create(d).await.unwrap();
        assert!(f.cache.get("flash").await.is_some());

        // Limit reached without any cache invalidation event.
        f.repo.record_click("flash").await.unwrap();

        let err = f.service.resolve_redirect("flash").await.unwrap_err();
        assert!(matches!(err, AppError::Gone { .. }));
        assert!(f.cache.get("flash").await.is_none());
    }

    #[tokio::test]
    async fn test_redirect_serves_storage_over_stale_cache() {
        let f = fixture();
        let mut d = draft("https://example.com/old");
        d.custom_slug = Some("moving".into());
        f.service.create(d).await.unwrap();

        f.repo
            .update(
                "moving",
                LinkPatch {
                    destination_url: Some("https://example.com/new".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let dest = f.service.resolve_redirect("moving").await.unwrap();
        assert_eq!(dest, "https://example.com/new");
        assert_eq!(
            f.cache.get("moving").await.unwrap().destination_url,
            "https://example.com/new"
        );
    }

    #[tokio::test]
    async fn test_update_and_deactivate_invalidate_cache() {
        let f = fixture();
        let mut d = draft("https://example.com/a");
        d.custom_slug = Some("promo".into());
        f.service.create(d).await.unwrap();

        let updated = f
            .service
            .update(
                "promo",
                LinkPatch {
                    destination_url: Some("https://EXAMPLE.com/b".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.destination_url, "https://example.com/b");
        assert!(f.cache.get("promo").await.is_none());

        f.service.deactivate("promo").await.unwrap();
        let err = f.service.resolve_redirect("promo").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let patch = LinkPatch {
            is_active: Some(true),
            ..Default::default()
        };
        let err = f.service.update("missing", patch).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_check_slug() {
        let f = fixture();
        let mut d = draft("https://example.com");
        d.custom_slug = Some("amazon.product".into());
        f.service.create(d).await.unwrap();

        let res = f.service.check_slug("Amazon.Product").await.unwrap();
        assert!(!res.available);
        assert_eq!(res.suggestions[0].slug, "Amazon.Product.2");

        assert!(f.service.check_slug("fresh.one").await.unwrap().available);
        assert!(f.service.check_slug("bad..slug").await.is_err());
    }

    #[test]
    fn test_pick_slug_random_suffix_when_exhausted() {
        let slug = pick_slug(
            "promo",
            Resolution {
                slug: "promo".into(),
                available: false,
                suggestions: Vec::new(),
            },
        );
        assert!(slug.starts_with("promo."));
        assert_eq!(slug.len(), "promo.".len() + 4);
        assert!(is_valid_slug(&slug));
    }
}
