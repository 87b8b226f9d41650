/// Data structures and traits for TV series metadata retrieval.
///
/// This module provides structures to represent the series record and its
/// episodes as reported by the ratings provider, as well as the trait all
/// metadata providers implement.
mod cached;
mod omdb;
mod omdb_types;

pub use cached::CachedMetadataProvider;
pub use omdb::OmdbProvider;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// Request to the metadata provider failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The requested title does not resolve to a series
    #[error("Series not found: {0}")]
    SeriesNotFound(String),

    /// The API returned invalid or unexpected data
    #[error("API returned invalid data: {0}")]
    InvalidData(String),
}

/// Canonical metadata of a series as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// The canonical series title
    pub title: String,
    /// Release year or year range (e.g. "2008-2013")
    pub year: String,
    /// Poster image URL, when the provider has one
    pub poster: Option<String>,
    /// Overall series rating as display text (e.g. "9.5")
    pub rating: Option<String>,
    /// Vote count behind the overall rating, as display text
    pub votes: Option<String>,
    /// The provider's stable identifier for the series
    pub imdb_id: String,
    /// Number of seasons; 0 when the provider reports none or something
    /// non-numeric
    pub total_seasons: usize,
}

/// Represents a single episode of a TV series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// The season number this episode belongs to. The raw season record does
    /// not carry it; the provider implementation stamps it from the request.
    pub season_number: usize,
    /// The episode label within the season, as reported by the provider.
    /// Usually numeric, but not guaranteed to parse.
    pub episode_number: String,
    /// The episode title
    pub title: String,
    /// The provider's stable identifier. This is the only key used to decide
    /// whether two records refer to the same episode. Unique within a season
    /// and, together with `season_number`, unique within the series.
    pub imdb_id: String,
    /// Audience rating in [0, 10]. `None` is the distinct "unrated" state:
    /// the provider sent nothing, or nothing parseable. Never substituted
    /// with 0.
    pub rating: Option<f64>,
}

/// Trait for metadata providers that can look up series, season and title
/// suggestion data.
///
/// Implementors of this trait retrieve series information from an external
/// source such as OMDb. All three operations are single request/response
/// round trips; retry policy, if any, belongs to the caller.
pub trait MetadataProvider {
    /// Searches for series titles matching a search fragment.
    ///
    /// Returns matching titles in the order the provider ranks them,
    /// possibly empty. Callers are expected to suppress the call entirely
    /// for empty fragments.
    fn search_titles(&self, fragment: &str) -> Result<Vec<String>, MetadataRetrievalError>;

    /// Fetches the canonical record of a series.
    ///
    /// # Arguments
    ///
    /// * `title` - The series title to look up
    ///
    /// # Returns
    ///
    /// A Result containing the series record, or `SeriesNotFound` when the
    /// provider has no match or classifies the match as something other
    /// than a series (a movie, for example).
    fn fetch_series(&self, title: &str) -> Result<SeriesRecord, MetadataRetrievalError>;

    /// Fetches one season's episode list.
    ///
    /// Episodes are returned in provider order, which is assumed to be
    /// broadcast order; callers must not re-sort them. `Ok(None)` means the
    /// provider has no episode data for this season, which is valid and
    /// distinct from a failed request.
    fn fetch_season(
        &self,
        title: &str,
        season_number: usize,
    ) -> Result<Option<Vec<Episode>>, MetadataRetrievalError>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Box<P> {
    fn search_titles(&self, fragment: &str) -> Result<Vec<String>, MetadataRetrievalError> {
        (**self).search_titles(fragment)
    }

    fn fetch_series(&self, title: &str) -> Result<SeriesRecord, MetadataRetrievalError> {
        (**self).fetch_series(title)
    }

    fn fetch_season(
        &self,
        title: &str,
        season_number: usize,
    ) -> Result<Option<Vec<Episode>>, MetadataRetrievalError> {
        (**self).fetch_season(title, season_number)
    }
}
