/// OMDb metadata provider implementation.
use super::omdb_types::{OmdbEpisode, OmdbSearchResponse, OmdbSeasonResponse, OmdbTitleResponse};
use super::{Episode, MetadataProvider, MetadataRetrievalError, SeriesRecord};
use crate::rating::parse_rating;
use serde::de::DeserializeOwned;

/// Metadata provider for the OMDb API.
///
/// This provider fetches series information from https://www.omdbapi.com
/// using three query shapes: `s=` for title search, `t=` for the series
/// record and `t=` plus `Season=` for a single season's episode list. Every
/// request carries the caller's API key.
pub struct OmdbProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl OmdbProvider {
    /// Creates a new OMDb provider instance using the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url("https://www.omdbapi.com", api_key)
    }

    /// Creates a provider against a non-default base URL, for mirrors or
    /// local stub servers.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Performs a GET request against the API and deserializes the JSON
    /// response.
    fn get_json<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T, MetadataRetrievalError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        // OMDb signals "not found" in-band with HTTP 200, so any
        // non-success status is a transport or key problem.
        if !response.status().is_success() {
            return Err(MetadataRetrievalError::RequestError(format!(
                "HTTP {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json()
            .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))
    }

    /// Converts a raw OMDb episode to our internal Episode structure.
    ///
    /// The raw record does not know its own season; it is stamped from the
    /// season that was requested.
    fn convert_episode(raw: OmdbEpisode, season_number: usize) -> Episode {
        Episode {
            season_number,
            episode_number: raw.episode,
            title: raw.title,
            imdb_id: raw.imdb_id,
            rating: raw.imdb_rating.as_deref().and_then(parse_rating),
        }
    }

    /// Converts a raw OMDb title response to our internal SeriesRecord.
    ///
    /// A `Response` of "False" and a `Type` other than "series" both mean
    /// the requested title is not a usable series; neither produces a
    /// record.
    fn convert_series(
        raw: OmdbTitleResponse,
        requested_title: &str,
    ) -> Result<SeriesRecord, MetadataRetrievalError> {
        if raw.response != "True" {
            return Err(MetadataRetrievalError::SeriesNotFound(
                requested_title.to_string(),
            ));
        }

        if raw.media_type.as_deref() != Some("series") {
            return Err(MetadataRetrievalError::SeriesNotFound(
                requested_title.to_string(),
            ));
        }

        let title = raw.title.ok_or_else(|| {
            MetadataRetrievalError::InvalidData("No title in series response".to_string())
        })?;
        let imdb_id = raw.imdb_id.ok_or_else(|| {
            MetadataRetrievalError::InvalidData("No imdbID in series response".to_string())
        })?;

        // A season count that is missing or unparseable ("N/A") collapses
        // to zero seasons rather than an error.
        let total_seasons = raw
            .total_seasons
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(0);

        Ok(SeriesRecord {
            title,
            year: raw.year.unwrap_or_default(),
            poster: not_na(raw.poster),
            rating: not_na(raw.imdb_rating),
            votes: not_na(raw.imdb_votes),
            imdb_id,
            total_seasons,
        })
    }
}

/// Maps OMDb's "N/A" placeholder to the absent state.
fn not_na(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "N/A")
}

impl MetadataProvider for OmdbProvider {
    fn search_titles(&self, fragment: &str) -> Result<Vec<String>, MetadataRetrievalError> {
        let response: OmdbSearchResponse = self.get_json(&[
            ("s", fragment),
            ("type", "series"),
            ("apikey", self.api_key.as_str()),
        ])?;

        // No hits comes back as a missing Search array, not an error.
        Ok(response
            .search
            .unwrap_or_default()
            .into_iter()
            .map(|hit| hit.title)
            .collect())
    }

    fn fetch_series(&self, title: &str) -> Result<SeriesRecord, MetadataRetrievalError> {
        let raw: OmdbTitleResponse =
            self.get_json(&[("t", title), ("apikey", self.api_key.as_str())])?;

        Self::convert_series(raw, title)
    }

    fn fetch_season(
        &self,
        title: &str,
        season_number: usize,
    ) -> Result<Option<Vec<Episode>>, MetadataRetrievalError> {
        let season_param = season_number.to_string();
        let raw: OmdbSeasonResponse = self.get_json(&[
            ("t", title),
            ("Season", season_param.as_str()),
            ("apikey", self.api_key.as_str()),
        ])?;

        // Episodes in provider order; a season the provider has no data
        // for yields None instead of an empty list.
        Ok(raw.episodes.map(|episodes| {
            episodes
                .into_iter()
                .map(|e| Self::convert_episode(e, season_number))
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_response(json: &str) -> OmdbTitleResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_convert_series_builds_record() {
        let raw = title_response(
            r#"{
                "Title": "Breaking Bad",
                "Year": "2008-2013",
                "Type": "series",
                "Poster": "https://example.invalid/poster.jpg",
                "imdbRating": "9.5",
                "imdbVotes": "1,234,567",
                "imdbID": "tt0903747",
                "totalSeasons": "5",
                "Response": "True"
            }"#,
        );

        let record = OmdbProvider::convert_series(raw, "breaking bad").unwrap();
        assert_eq!(record.title, "Breaking Bad");
        assert_eq!(record.year, "2008-2013");
        assert_eq!(record.imdb_id, "tt0903747");
        assert_eq!(record.total_seasons, 5);
        assert_eq!(record.rating.as_deref(), Some("9.5"));
        assert_eq!(record.votes.as_deref(), Some("1,234,567"));
    }

    #[test]
    fn test_convert_series_rejects_movies() {
        let raw = title_response(
            r#"{
                "Title": "Casablanca",
                "Year": "1942",
                "Type": "movie",
                "imdbID": "tt0034583",
                "Response": "True"
            }"#,
        );

        let result = OmdbProvider::convert_series(raw, "Casablanca");
        assert!(matches!(
            result,
            Err(MetadataRetrievalError::SeriesNotFound(title)) if title == "Casablanca"
        ));
    }

    #[test]
    fn test_convert_series_rejects_unknown_titles() {
        let raw = title_response(r#"{"Response": "False", "Error": "Movie not found!"}"#);

        let result = OmdbProvider::convert_series(raw, "No Such Show");
        assert!(matches!(
            result,
            Err(MetadataRetrievalError::SeriesNotFound(title)) if title == "No Such Show"
        ));
    }

    #[test]
    fn test_convert_series_collapses_unparseable_season_count() {
        let raw = title_response(
            r#"{
                "Title": "Oddity",
                "Type": "series",
                "imdbID": "tt0000001",
                "totalSeasons": "N/A",
                "Response": "True"
            }"#,
        );

        let record = OmdbProvider::convert_series(raw, "Oddity").unwrap();
        assert_eq!(record.total_seasons, 0);
    }

    #[test]
    fn test_convert_series_maps_na_fields_to_none() {
        let raw = title_response(
            r#"{
                "Title": "Obscurity",
                "Type": "series",
                "Poster": "N/A",
                "imdbRating": "N/A",
                "imdbVotes": "N/A",
                "imdbID": "tt0000002",
                "totalSeasons": "1",
                "Response": "True"
            }"#,
        );

        let record = OmdbProvider::convert_series(raw, "Obscurity").unwrap();
        assert_eq!(record.poster, None);
        assert_eq!(record.rating, None);
        assert_eq!(record.votes, None);
    }

    #[test]
    fn test_convert_episode_stamps_season_and_parses_rating() {
        let raw: OmdbEpisode = serde_json::from_str(
            r#"{
                "Title": "Ozymandias",
                "Episode": "14",
                "imdbID": "tt2301451",
                "imdbRating": "10.0"
            }"#,
        )
        .unwrap();

        let episode = OmdbProvider::convert_episode(raw, 5);
        assert_eq!(episode.season_number, 5);
        assert_eq!(episode.episode_number, "14");
        assert_eq!(episode.title, "Ozymandias");
        assert_eq!(episode.rating, Some(10.0));
    }

    #[test]
    fn test_convert_episode_keeps_unrated_distinct() {
        let raw: OmdbEpisode = serde_json::from_str(
            r#"{
                "Title": "Unaired Pilot",
                "Episode": "0",
                "imdbID": "tt0000003",
                "imdbRating": "N/A"
            }"#,
        )
        .unwrap();

        let episode = OmdbProvider::convert_episode(raw, 1);
        assert_eq!(episode.rating, None);
    }

    #[test]
    fn test_season_response_without_episodes_field() {
        let raw: OmdbSeasonResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Series or season not found!"}"#)
                .unwrap();

        assert!(raw.episodes.is_none());
    }
}
