//! Caching layer.
//!
//! A generic [`CacheService`] with three backends:
//! - [`RedisCache`] - shared Redis cache
//! - [`MemoryCache`] - in-process TTL map
//! - [`NullCache`] - caching disabled
//!
//! and two typed views on top of it:
//! - [`RedirectCache`] - slug to destination snapshot
//! - [`SuggestionCache`] - generated suggestions per `(url, keywords)`

mod memory_cache;
mod null_cache;
mod redirect_cache;
mod redis_cache;
mod service;
mod suggestion_cache;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redirect_cache::{CachedRedirect, RedirectCache};
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
pub use suggestion_cache::SuggestionCache;
