//! SeasonSleuth - Investigate a TV series' episode ratings
//!
//! This library provides the core functionality for looking up a series at
//! the ratings provider, walking its seasons one by one, aggregating each
//! season's rating statistics and tracking the best and worst episode
//! across the whole series. It also keeps the search history and debounces
//! search-as-you-type suggestion queries for interactive frontends.

mod cache;
mod debounce;
mod history;
mod investigation;
mod metadata_retrieval;
mod rating;

// Re-export error types
pub use cache::CacheError;
pub use history::HistoryError;
pub use metadata_retrieval::MetadataRetrievalError;

// Re-export the engine and its building blocks
pub use cache::CacheStorage;
pub use debounce::{DEFAULT_QUIET_PERIOD, SuggestionDebouncer};
pub use history::{HISTORY_CAPACITY, HistoryStore, SearchHistory};
pub use investigation::{
    CaseFile, Investigation, InvestigationPhase, SeasonReport, SeasonSleuth, Step,
};
pub use metadata_retrieval::{
    CachedMetadataProvider, Episode, MetadataProvider, OmdbProvider, SeriesRecord,
};
pub use rating::{
    SeasonStats, SeriesExtrema, parse_rating, season_average, season_best, season_worst,
};

use thiserror::Error;

/// Progress event emitted during an investigation
///
/// These events allow library users to track progress and render partial
/// results while later seasons are still being fetched.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A case was opened and the series record is being fetched
    CaseOpened { title: String },

    /// The provider identified the series
    SeriesIdentified { record: SeriesRecord },

    /// A season's episode list arrived, together with its aggregated
    /// statistics
    SeasonFetched { season: usize, report: SeasonReport },

    /// A season could not be fetched; the investigation continues without
    /// it
    SeasonUnavailable { season: usize, reason: String },

    /// The investigation finished; final best and worst across all seasons
    CaseClosed {
        best: Option<Episode>,
        worst: Option<Episode>,
    },
}

/// Top-level error type for SeasonSleuth operations
#[derive(Debug, Error)]
pub enum SleuthError {
    /// Error during metadata retrieval
    #[error("Metadata retrieval error: {0}")]
    MetadataRetrieval(#[from] MetadataRetrievalError),

    /// The investigation was superseded by a newer search before it
    /// finished
    #[error("Investigation superseded by a newer search")]
    Superseded,
}
