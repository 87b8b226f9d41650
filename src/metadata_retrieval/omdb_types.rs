/// OMDb API response types for deserialization.
///
/// These structures mirror the JSON response format of the OMDb API. Only
/// the fields this crate consumes are modeled; OMDb reports field names in
/// PascalCase, hence the renames.
use serde::Deserialize;

/// Top-level response from the OMDb search endpoint (`s=` queries).
#[derive(Debug, Deserialize)]
pub(super) struct OmdbSearchResponse {
    /// Matching titles in provider ranking order; absent when nothing
    /// matched
    #[serde(rename = "Search")]
    pub search: Option<Vec<OmdbSearchHit>>,
}

/// A single hit in a search response.
#[derive(Debug, Deserialize)]
pub(super) struct OmdbSearchHit {
    /// Title of the matched series
    #[serde(rename = "Title")]
    pub title: String,
}

/// Response from a title lookup (`t=` queries).
///
/// OMDb signals "not found" in-band: HTTP 200 with `Response: "False"`.
/// All payload fields are therefore optional.
#[derive(Debug, Deserialize)]
pub(super) struct OmdbTitleResponse {
    /// "True" when the lookup succeeded, "False" otherwise
    #[serde(rename = "Response")]
    pub response: String,
    /// Media classification ("series", "movie", "episode")
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    /// Season count as display text; may be "N/A" or missing entirely
    #[serde(rename = "totalSeasons")]
    pub total_seasons: Option<String>,
}

/// Response from a season lookup (`t=` plus `Season=` queries).
#[derive(Debug, Deserialize)]
pub(super) struct OmdbSeasonResponse {
    /// Episode list in broadcast order; absent when the provider has no
    /// data for the requested season
    #[serde(rename = "Episodes")]
    pub episodes: Option<Vec<OmdbEpisode>>,
}

/// A single episode from a season response.
#[derive(Debug, Deserialize)]
pub(super) struct OmdbEpisode {
    #[serde(rename = "Title")]
    pub title: String,
    /// Episode label within the season (not guaranteed to be numeric)
    #[serde(rename = "Episode")]
    pub episode: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Rating as display text, commonly "N/A" for unrated episodes
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
}
