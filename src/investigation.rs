//! Series investigation module
//!
//! The acquisition orchestrator. An investigation opens a case on a title,
//! fetches the series record, then walks the seasons one by one in order,
//! handing every episode list to the rating aggregation and folding the
//! running series-wide extrema as it goes. The caller drives each step and
//! observes progress through [`ProgressEvent`]s, so a frontend can render
//! partial results while later seasons are still on the wire.
//!
//! Every investigation is tagged with the engine generation that opened it.
//! Opening a new case bumps the generation, which turns all older
//! investigations inert: their remaining steps do nothing, emit nothing and
//! record nothing.

use crate::history::SearchHistory;
use crate::metadata_retrieval::{Episode, MetadataProvider, SeriesRecord};
use crate::rating::{SeasonStats, SeriesExtrema};
use crate::{ProgressEvent, SleuthError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One season's episode list together with its aggregated statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    /// Episodes in provider order, assumed to be broadcast order
    pub episodes: Vec<Episode>,
    /// Aggregates over `episodes`
    pub stats: SeasonStats,
}

/// The complete findings of a finished investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFile {
    /// The title exactly as the user searched it
    pub searched_title: String,
    /// Canonical series metadata from the provider
    pub record: SeriesRecord,
    /// Season number to report, for every season the provider had episode
    /// data for. Seasons whose fetch failed or came back empty are absent.
    pub seasons: BTreeMap<usize, SeasonReport>,
    /// Best and worst rated episode across all fetched seasons
    pub extrema: SeriesExtrema,
}

/// Where an investigation currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvestigationPhase {
    /// The series record is being fetched
    FetchingSeries,
    /// Seasons are being fetched; `next` is the season the upcoming step
    /// will request
    FetchingSeasons { next: usize, total: usize },
    /// All seasons were processed and the case file was handed out
    Done,
    /// The investigation failed or was superseded by a newer one
    Aborted,
}

/// What a single [`SeasonSleuth::advance`] call produced.
#[derive(Debug)]
pub enum Step {
    /// The series record arrived; season fetching is next
    SeriesFetched,
    /// One season was processed, successfully or not
    SeasonProcessed { season: usize },
    /// The investigation finished and produced its case file
    Finished(CaseFile),
    /// The investigation is superseded or already closed; nothing was done
    Superseded,
}

/// One in-flight investigation, tagged with the engine generation that
/// opened it.
///
/// All interim state lives in here: the series record, the seasons fetched
/// so far and the running extrema. Nothing is shared between
/// investigations, so a stale one can never leak partial results into a
/// newer one.
#[derive(Debug)]
pub struct Investigation {
    generation: u64,
    title: String,
    phase: InvestigationPhase,
    record: Option<SeriesRecord>,
    seasons: BTreeMap<usize, SeasonReport>,
    extrema: SeriesExtrema,
}

impl Investigation {
    /// The title this case was opened on.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The current phase.
    pub fn phase(&self) -> &InvestigationPhase {
        &self.phase
    }

    /// The series record, once it has arrived.
    pub fn record(&self) -> Option<&SeriesRecord> {
        self.record.as_ref()
    }

    /// Season reports collected so far; partial until the phase is `Done`.
    pub fn seasons(&self) -> &BTreeMap<usize, SeasonReport> {
        &self.seasons
    }

    /// Series-wide extrema over the seasons collected so far.
    pub fn extrema(&self) -> &SeriesExtrema {
        &self.extrema
    }
}

/// The episode ratings investigation engine.
///
/// Owns the metadata provider and the search history, and hands out
/// [`Investigation`]s whose steps it executes one provider round trip at a
/// time.
pub struct SeasonSleuth<P>
where
    P: MetadataProvider,
{
    provider: P,
    history: SearchHistory,
    generation: u64,
}

impl<P> SeasonSleuth<P>
where
    P: MetadataProvider,
{
    /// Creates a new engine on top of the given provider and history.
    pub fn new(provider: P, history: SearchHistory) -> Self {
        Self {
            provider,
            history,
            generation: 0,
        }
    }

    /// Opens a new case on the given title.
    ///
    /// This supersedes every investigation opened earlier: their remaining
    /// steps turn into no-ops and none of their pending results will be
    /// published or remembered.
    pub fn open_case(&mut self, title: &str) -> Investigation {
        self.generation += 1;

        Investigation {
            generation: self.generation,
            title: title.to_string(),
            phase: InvestigationPhase::FetchingSeries,
            record: None,
            seasons: BTreeMap::new(),
            extrema: SeriesExtrema::default(),
        }
    }

    /// Executes the next step of an investigation.
    ///
    /// At most one provider round trip happens per call. Progress is
    /// reported through `on_event`. A superseded investigation performs no
    /// request, emits no event and returns [`Step::Superseded`]; a failed
    /// series lookup aborts the case and propagates the error.
    pub fn advance<F>(
        &mut self,
        investigation: &mut Investigation,
        mut on_event: F,
    ) -> Result<Step, SleuthError>
    where
        F: FnMut(ProgressEvent),
    {
        if investigation.generation != self.generation {
            investigation.phase = InvestigationPhase::Aborted;
            return Ok(Step::Superseded);
        }

        match investigation.phase.clone() {
            InvestigationPhase::FetchingSeries => {
                self.fetch_series_step(investigation, &mut on_event)
            }
            InvestigationPhase::FetchingSeasons { next, total } => {
                self.fetch_season_step(investigation, next, total, &mut on_event)
            }
            InvestigationPhase::Done | InvestigationPhase::Aborted => Ok(Step::Superseded),
        }
    }

    /// Runs a complete investigation from title to case file.
    ///
    /// Equivalent to [`open_case`](Self::open_case) followed by
    /// [`advance`](Self::advance) until the case closes. Progress events
    /// are emitted through the provided callback, allowing callers to
    /// render partial results, display status, or remain silent.
    ///
    /// # Arguments
    ///
    /// * `title` - The series title to investigate
    /// * `on_event` - Closure called with progress events (can be empty for
    ///   silent operation)
    ///
    /// # Returns
    ///
    /// The finished [`CaseFile`] with every season report and the
    /// series-wide extrema
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use season_sleuth::{OmdbProvider, ProgressEvent, SearchHistory, SeasonSleuth};
    ///
    /// let provider = OmdbProvider::new("YOUR_API_KEY");
    /// let mut sleuth = SeasonSleuth::new(provider, SearchHistory::open());
    ///
    /// // With progress output
    /// let case_file = sleuth
    ///     .investigate("Breaking Bad", |event| match event {
    ///         ProgressEvent::SeasonFetched { season, report } => {
    ///             println!("Season {}: {} episodes", season, report.episodes.len());
    ///         }
    ///         _ => {} // Handle other events as needed
    ///     })
    ///     .unwrap();
    /// println!("{} seasons on file", case_file.seasons.len());
    ///
    /// // Silent operation
    /// let case_file = sleuth.investigate("The Wire", |_| {}).unwrap();
    /// # let _ = case_file;
    /// ```
    pub fn investigate<F>(&mut self, title: &str, mut on_event: F) -> Result<CaseFile, SleuthError>
    where
        F: FnMut(ProgressEvent),
    {
        let mut investigation = self.open_case(title);

        loop {
            match self.advance(&mut investigation, &mut on_event)? {
                Step::Finished(case_file) => return Ok(case_file),
                Step::Superseded => return Err(SleuthError::Superseded),
                Step::SeriesFetched | Step::SeasonProcessed { .. } => {}
            }
        }
    }

    /// Best-effort title suggestions for a search fragment.
    ///
    /// Empty or whitespace-only fragments never reach the provider, and
    /// provider failures collapse to an empty list; suggestions never
    /// surface an error.
    pub fn suggestions(&self, fragment: &str) -> Vec<String> {
        if fragment.trim().is_empty() {
            return Vec::new();
        }

        self.provider.search_titles(fragment).unwrap_or_default()
    }

    /// Previously investigated titles, most recent first.
    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    /// Forgets all previously investigated titles.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn fetch_series_step<F>(
        &mut self,
        investigation: &mut Investigation,
        on_event: &mut F,
    ) -> Result<Step, SleuthError>
    where
        F: FnMut(ProgressEvent),
    {
        on_event(ProgressEvent::CaseOpened {
            title: investigation.title.clone(),
        });

        let record = match self.provider.fetch_series(&investigation.title) {
            Ok(record) => record,
            Err(error) => {
                investigation.phase = InvestigationPhase::Aborted;
                return Err(error.into());
            }
        };

        on_event(ProgressEvent::SeriesIdentified {
            record: record.clone(),
        });

        let total = record.total_seasons;
        investigation.record = Some(record.clone());

        // A series without seasons has nothing left to fetch.
        if total == 0 {
            return Ok(self.finish(investigation, record, on_event));
        }

        investigation.phase = InvestigationPhase::FetchingSeasons { next: 1, total };
        Ok(Step::SeriesFetched)
    }

    fn fetch_season_step<F>(
        &mut self,
        investigation: &mut Investigation,
        season: usize,
        total: usize,
        on_event: &mut F,
    ) -> Result<Step, SleuthError>
    where
        F: FnMut(ProgressEvent),
    {
        let Some(record) = investigation.record.clone() else {
            // Unreachable in practice: this phase is only entered after the
            // record arrived. Treat it as a closed case rather than panic.
            investigation.phase = InvestigationPhase::Aborted;
            return Ok(Step::Superseded);
        };

        // Season lookups are keyed by the canonical provider title, not by
        // whatever the user typed.
        match self.provider.fetch_season(&record.title, season) {
            Ok(Some(episodes)) => {
                investigation.extrema.fold_season(&episodes);
                let report = SeasonReport {
                    stats: SeasonStats::for_episodes(&episodes),
                    episodes,
                };
                on_event(ProgressEvent::SeasonFetched {
                    season,
                    report: report.clone(),
                });
                investigation.seasons.insert(season, report);
            }
            Ok(None) => {
                // The provider has no episode data for this season. Valid;
                // the season map simply keeps a gap.
            }
            Err(error) => {
                on_event(ProgressEvent::SeasonUnavailable {
                    season,
                    reason: error.to_string(),
                });
            }
        }

        if season >= total {
            return Ok(self.finish(investigation, record, on_event));
        }

        investigation.phase = InvestigationPhase::FetchingSeasons {
            next: season + 1,
            total,
        };
        Ok(Step::SeasonProcessed { season })
    }

    fn finish<F>(
        &mut self,
        investigation: &mut Investigation,
        record: SeriesRecord,
        on_event: &mut F,
    ) -> Step
    where
        F: FnMut(ProgressEvent),
    {
        investigation.phase = InvestigationPhase::Done;

        on_event(ProgressEvent::CaseClosed {
            best: investigation.extrema.best.clone(),
            worst: investigation.extrema.worst.clone(),
        });

        // The exact input title goes into the history, so re-running the
        // entry reproduces the original search.
        self.history.record(&investigation.title);

        Step::Finished(CaseFile {
            searched_title: investigation.title.clone(),
            record,
            seasons: investigation.seasons.clone(),
            extrema: investigation.extrema.clone(),
        })
    }
}
