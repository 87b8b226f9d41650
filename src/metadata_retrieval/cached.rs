//! Cached metadata provider implementation
//!
//! This module provides a caching wrapper for metadata providers that
//! automatically stores and retrieves series records and season episode
//! lists from a local cache.

use super::{Episode, MetadataProvider, MetadataRetrievalError, SeriesRecord};
use crate::cache::CacheStorage;

/// A caching wrapper for metadata providers
///
/// This provider wraps another metadata provider and caches series and
/// season lookups to avoid redundant network requests. The cache is
/// persistent across application runs. Title suggestions are never cached;
/// they are cheap, short-lived and keyed on half-typed fragments.
pub struct CachedMetadataProvider<P>
where
    P: MetadataProvider,
{
    /// The underlying metadata provider
    provider: P,
    /// Cache storage for series records
    series_cache: CacheStorage<SeriesRecord>,
    /// Cache storage for season episode lists
    season_cache: CacheStorage<Vec<Episode>>,
}

impl<P> CachedMetadataProvider<P>
where
    P: MetadataProvider,
{
    /// Creates a new cached metadata provider wrapping the given provider
    ///
    /// # Arguments
    ///
    /// * `provider` - The metadata provider to wrap
    /// * `series_cache` - Cache storage for series records
    /// * `season_cache` - Cache storage for season episode lists
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let omdb = OmdbProvider::new(api_key);
    /// let series_cache = CacheStorage::open("series", ttl)?;
    /// let season_cache = CacheStorage::open("seasons", ttl)?;
    /// let cached = CachedMetadataProvider::new(omdb, series_cache, season_cache);
    /// ```
    pub fn new(
        provider: P,
        series_cache: CacheStorage<SeriesRecord>,
        season_cache: CacheStorage<Vec<Episode>>,
    ) -> Self {
        Self {
            provider,
            series_cache,
            season_cache,
        }
    }

    /// Generates a cache key for a season query
    ///
    /// The key combines the series title with the season number to keep
    /// seasons of the same series apart.
    fn season_cache_key(title: &str, season_number: usize) -> String {
        format!("{}_season_{}", title, season_number)
    }
}

impl<P> MetadataProvider for CachedMetadataProvider<P>
where
    P: MetadataProvider,
{
    fn search_titles(&self, fragment: &str) -> Result<Vec<String>, MetadataRetrievalError> {
        self.provider.search_titles(fragment)
    }

    fn fetch_series(&self, title: &str) -> Result<SeriesRecord, MetadataRetrievalError> {
        // Try to load from cache
        match self.series_cache.load(title) {
            Ok(Some(record)) => {
                // Cache hit - return cached data
                return Ok(record);
            }
            Ok(None) => {
                // Cache miss - continue to fetch from provider
            }
            Err(_) => {
                // Cache read error - continue to fetch from provider
                // We don't want cache failures to prevent metadata retrieval
            }
        }

        // Fetch from underlying provider
        let record = self.provider.fetch_series(title)?;

        // Store in cache (ignore errors to avoid failing the request)
        let _ = self.series_cache.store(title, &record);

        Ok(record)
    }

    fn fetch_season(
        &self,
        title: &str,
        season_number: usize,
    ) -> Result<Option<Vec<Episode>>, MetadataRetrievalError> {
        let cache_key = Self::season_cache_key(title, season_number);

        if let Ok(Some(episodes)) = self.season_cache.load(&cache_key) {
            return Ok(Some(episodes));
        }

        let episodes = self.provider.fetch_season(title, season_number)?;

        // Only actual episode lists are cached; a season the provider has
        // no data for stays uncached and is asked for again next time.
        if let Some(episodes) = &episodes {
            let _ = self.season_cache.store(&cache_key, episodes);
        }

        Ok(episodes)
    }
}
