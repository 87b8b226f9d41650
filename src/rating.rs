//! Rating aggregation module
//!
//! Pure computations over episode lists: the per-season average, best and
//! worst episode, and the running best/worst fold across a whole series.
//! Nothing in here performs IO or knows about providers, so every rule is
//! independently testable.
//!
//! All aggregates share one tie-break rule: when two episodes carry the
//! same rating, the one encountered first in provider order wins and is
//! never displaced by a later equal.

use crate::metadata_retrieval::Episode;
use serde::{Deserialize, Serialize};

/// Parses a provider rating string into a finite rating value.
///
/// Returns `None` for anything that is not a finite decimal: "N/A", empty
/// strings and other placeholders all map to the unrated state. Unrated
/// never becomes 0.
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Computes the mean rating over all rated episodes of a season.
///
/// Unrated episodes are excluded from both the numerator and the
/// denominator. Returns `None` when no episode carries a rating, so a
/// fully unrated season reads as "no average" rather than 0.0.
pub fn season_average(episodes: &[Episode]) -> Option<f64> {
    let ratings: Vec<f64> = episodes.iter().filter_map(|e| e.rating).collect();

    if ratings.is_empty() {
        return None;
    }

    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

/// Finds the highest-rated episode of a season.
///
/// Unrated episodes are never selected. A later episode displaces the
/// current best only when its rating is strictly greater.
pub fn season_best(episodes: &[Episode]) -> Option<&Episode> {
    let mut best: Option<(&Episode, f64)> = None;

    for episode in episodes {
        if let Some(rating) = episode.rating {
            if best.map_or(true, |(_, current)| rating > current) {
                best = Some((episode, rating));
            }
        }
    }

    best.map(|(episode, _)| episode)
}

/// Finds the lowest-rated episode of a season.
///
/// Unrated episodes are never selected. A later episode displaces the
/// current worst only when its rating is strictly lower.
pub fn season_worst(episodes: &[Episode]) -> Option<&Episode> {
    let mut worst: Option<(&Episode, f64)> = None;

    for episode in episodes {
        if let Some(rating) = episode.rating {
            if worst.map_or(true, |(_, current)| rating < current) {
                worst = Some((episode, rating));
            }
        }
    }

    worst.map(|(episode, _)| episode)
}

/// Aggregated ratings view of one season's episode list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    /// Mean over rated episodes; None when the season has no rated episode
    pub average: Option<f64>,
    /// Highest-rated episode of the season
    pub best: Option<Episode>,
    /// Lowest-rated episode of the season
    pub worst: Option<Episode>,
}

impl SeasonStats {
    /// Derives the season's statistics from its episode list.
    pub fn for_episodes(episodes: &[Episode]) -> Self {
        Self {
            average: season_average(episodes),
            best: season_best(episodes).cloned(),
            worst: season_worst(episodes).cloned(),
        }
    }
}

/// The best and worst rated episode seen so far across all seasons.
///
/// Seasons are folded in as they arrive. Folding season after season
/// produces exactly the extrema a batch pass over every episode seen so
/// far would produce; each extremum remembers its season through
/// [`Episode::season_number`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesExtrema {
    /// Best-rated episode across all folded seasons
    pub best: Option<Episode>,
    /// Worst-rated episode across all folded seasons
    pub worst: Option<Episode>,
}

impl SeriesExtrema {
    /// Folds a single episode into the running extrema.
    ///
    /// A strictly greater rating replaces the best, a strictly lower one
    /// replaces the worst; an equal rating keeps the earlier episode, the
    /// same tie-break the per-season statistics use. Unrated episodes are
    /// ignored.
    pub fn observe(&mut self, episode: &Episode) {
        let Some(rating) = episode.rating else {
            return;
        };

        let best_so_far = self.best.as_ref().and_then(|e| e.rating);
        if best_so_far.map_or(true, |current| rating > current) {
            self.best = Some(episode.clone());
        }

        let worst_so_far = self.worst.as_ref().and_then(|e| e.rating);
        if worst_so_far.map_or(true, |current| rating < current) {
            self.worst = Some(episode.clone());
        }
    }

    /// Folds a whole season's episode list in provider order.
    pub fn fold_season(&mut self, episodes: &[Episode]) {
        for episode in episodes {
            self.observe(episode);
        }
    }
}
