use clap::Parser;
use dialoguer::console::style;
use dialoguer::{Input, Select};
use season_sleuth::{
    CacheStorage, CachedMetadataProvider, Episode, MetadataProvider, OmdbProvider, ProgressEvent,
    SearchHistory, SeasonReport, SeasonSleuth, SeasonStats, SeriesRecord,
};
use std::process;
use std::time::Duration;

/// How long fetched series and season data stays fresh in the local cache.
const METADATA_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Series title to investigate; omit it for the interactive prompt
    title: Option<String>,

    /// OMDb API key (falls back to the OMDB_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Print the finished case file as JSON instead of the report
    #[arg(long)]
    json: bool,

    /// Bypass the local metadata cache for this run
    #[arg(long)]
    fresh: bool,

    /// Forget all remembered searches and exit
    #[arg(long)]
    clear_history: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.clear_history {
        let mut history = SearchHistory::open();
        history.clear();
        println!("Search history cleared.");
        return;
    }

    let Some(api_key) = cli.api_key.clone().or_else(|| std::env::var("OMDB_API_KEY").ok()) else {
        eprintln!("Error: no OMDb API key given. Pass --api-key or set OMDB_API_KEY.");
        process::exit(1);
    };

    let provider = build_provider(&api_key, cli.fresh);
    let mut sleuth = SeasonSleuth::new(provider, SearchHistory::open());

    match cli.title {
        Some(title) => {
            if !run_investigation(&mut sleuth, &title, cli.json) {
                process::exit(1);
            }
        }
        None => run_interactive(&mut sleuth),
    }
}

/// Builds the metadata provider stack: OMDb, wrapped in the local cache
/// unless the cache is bypassed or unavailable.
fn build_provider(api_key: &str, fresh: bool) -> Box<dyn MetadataProvider> {
    let omdb = OmdbProvider::new(api_key);

    if fresh {
        return Box::new(omdb);
    }

    let series_cache = CacheStorage::open("series", Some(METADATA_CACHE_TTL));
    let season_cache = CacheStorage::open("seasons", Some(METADATA_CACHE_TTL));

    match (series_cache, season_cache) {
        (Ok(series), Ok(seasons)) => Box::new(CachedMetadataProvider::new(omdb, series, seasons)),
        _ => {
            eprintln!("Warning: metadata cache unavailable, continuing without it.");
            Box::new(omdb)
        }
    }
}

/// Runs a single investigation and reports whether it succeeded.
fn run_investigation(
    sleuth: &mut SeasonSleuth<Box<dyn MetadataProvider>>,
    title: &str,
    json: bool,
) -> bool {
    if json {
        match sleuth.investigate(title, |_| {}) {
            Ok(case_file) => match serde_json::to_string_pretty(&case_file) {
                Ok(text) => {
                    println!("{}", text);
                    true
                }
                Err(e) => {
                    eprintln!("Error: failed to serialize case file: {}", e);
                    false
                }
            },
            Err(_) => {
                report_cold_case(title);
                false
            }
        }
    } else {
        match sleuth.investigate(title, handle_progress_event) {
            Ok(_) => true,
            Err(_) => {
                report_cold_case(title);
                false
            }
        }
    }
}

/// Interactive mode: a menu of new searches, remembered searches and
/// housekeeping, until the user quits.
fn run_interactive(sleuth: &mut SeasonSleuth<Box<dyn MetadataProvider>>) {
    println!("SeasonSleuth at your service.");

    loop {
        let history: Vec<String> = sleuth.history().to_vec();

        let mut items = vec!["Search for a series".to_string()];
        items.extend(history.iter().map(|title| format!("Reopen: {}", title)));
        if !history.is_empty() {
            items.push("Clear search history".to_string());
        }
        items.push("Quit".to_string());

        let Ok(choice) = Select::new()
            .with_prompt("What should be investigated?")
            .items(&items)
            .default(0)
            .interact()
        else {
            break;
        };

        let title = if choice == 0 {
            match prompt_for_title(sleuth) {
                Some(title) => title,
                None => continue,
            }
        } else if choice <= history.len() {
            history[choice - 1].clone()
        } else if !history.is_empty() && choice == history.len() + 1 {
            sleuth.clear_history();
            println!("Search history cleared.");
            continue;
        } else {
            break;
        };

        if sleuth.investigate(&title, handle_progress_event).is_err() {
            report_cold_case(&title);
        }
        println!();
    }
}

/// Asks for a title and offers provider suggestions for the typed
/// fragment. Returns None when the user backs out.
fn prompt_for_title(sleuth: &SeasonSleuth<Box<dyn MetadataProvider>>) -> Option<String> {
    let fragment: String = Input::new()
        .with_prompt("Series title")
        .allow_empty(true)
        .interact_text()
        .ok()?;

    if fragment.trim().is_empty() {
        return None;
    }

    let suggestions = sleuth.suggestions(&fragment);
    if suggestions.is_empty() {
        return Some(fragment);
    }

    let mut items = suggestions.clone();
    items.push(format!("Search for '{}' as typed", fragment));
    items.push("Back".to_string());

    let choice = Select::new()
        .with_prompt("Did you mean")
        .items(&items)
        .default(0)
        .interact()
        .ok()?;

    if choice < suggestions.len() {
        Some(suggestions[choice].clone())
    } else if choice == suggestions.len() {
        Some(fragment)
    } else {
        None
    }
}

/// Handles progress events and prints the report to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::CaseOpened { title } => {
            println!("SeasonSleuth reporting: opening the case on '{}'...", title);
        }
        ProgressEvent::SeriesIdentified { record } => {
            print_series_header(&record);
        }
        ProgressEvent::SeasonFetched { season, report } => {
            print_season_report(season, &report);
        }
        ProgressEvent::SeasonUnavailable { season, .. } => {
            println!("\nSeason {:02}: no data available", season);
        }
        ProgressEvent::CaseClosed { best, worst } => {
            print_verdict(best, worst);
        }
    }
}

fn print_series_header(record: &SeriesRecord) {
    println!("\n=== {} ({}) ===", record.title, record.year);
    if let Some(rating) = &record.rating {
        match &record.votes {
            Some(votes) => println!("Series rating: {} ({} votes)", rating, votes),
            None => println!("Series rating: {}", rating),
        }
    }
    println!("Seasons: {}", record.total_seasons);
    println!("IMDb: https://www.imdb.com/title/{}/", record.imdb_id);
}

fn print_season_report(season: usize, report: &SeasonReport) {
    match report.stats.average {
        Some(average) => println!("\nSeason {:02} (avg {:.2})", season, average),
        None => println!("\nSeason {:02} (no rated episodes)", season),
    }

    for episode in &report.episodes {
        println!(
            "  E{:>2}  {}  {}{}",
            episode.episode_number,
            styled_rating(episode.rating),
            episode.title,
            episode_marker(episode, &report.stats)
        );
    }
}

fn print_verdict(best: Option<Episode>, worst: Option<Episode>) {
    println!("\n=== Verdict ===");

    match (best, worst) {
        (Some(best), Some(worst)) => {
            println!(
                "{}",
                verdict_row(&best, style("(series best)").green().bold().to_string())
            );
            println!(
                "{}",
                verdict_row(&worst, style("(series worst)").red().bold().to_string())
            );
        }
        _ => println!("No rated episodes on file."),
    }
}

/// One grid-style row for a series-level extremum, marked the same way the
/// season rows mark theirs.
fn verdict_row(episode: &Episode, badge: String) -> String {
    format!(
        "  S{:02} E{:>2}  {}  {}  {}",
        episode.season_number,
        episode.episode_number,
        styled_rating(episode.rating),
        episode.title,
        badge
    )
}

/// Marks an episode as the season's best or worst. Episodes are matched by
/// their provider identifier, never by title.
fn episode_marker(episode: &Episode, stats: &SeasonStats) -> String {
    let is_best = stats
        .best
        .as_ref()
        .is_some_and(|b| b.imdb_id == episode.imdb_id);
    let is_worst = stats
        .worst
        .as_ref()
        .is_some_and(|w| w.imdb_id == episode.imdb_id);

    match (is_best, is_worst) {
        (true, true) => format!("  {}", style("(best & worst)").dim()),
        (true, false) => format!("  {}", style("(season best)").green()),
        (false, true) => format!("  {}", style("(season worst)").red()),
        (false, false) => String::new(),
    }
}

/// Renders a rating in the report's color gradient: greens at the top,
/// yellows in the middle, orange and red at the bottom. Unrated episodes
/// show a dimmed placeholder.
fn styled_rating(rating: Option<f64>) -> String {
    let Some(rating) = rating else {
        return style(" n/a").dim().to_string();
    };

    let text = format!("{:>4.1}", rating);
    let styled = if rating >= 9.0 {
        style(text).green().bold()
    } else if rating >= 8.5 {
        style(text).green()
    } else if rating >= 8.0 {
        style(text).green().dim()
    } else if rating >= 7.5 {
        style(text).yellow().bold()
    } else if rating >= 7.0 {
        style(text).yellow()
    } else if rating >= 6.0 {
        style(text).color256(208)
    } else {
        style(text).red()
    };

    styled.to_string()
}

/// Prints the generic notice shown for any failed investigation. Goes to
/// stderr so that stdout stays machine-readable in `--json` mode.
fn report_cold_case(title: &str) {
    eprintln!(
        "{}",
        style(format!(
            "The case on '{}' went cold. No series data could be retrieved.",
            title
        ))
        .red()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use season_sleuth::MetadataRetrievalError;

    struct OfflineProvider;

    impl MetadataProvider for OfflineProvider {
        fn search_titles(&self, _fragment: &str) -> Result<Vec<String>, MetadataRetrievalError> {
            Err(MetadataRetrievalError::RequestError("offline".to_string()))
        }

        fn fetch_series(&self, _title: &str) -> Result<SeriesRecord, MetadataRetrievalError> {
            Err(MetadataRetrievalError::RequestError("offline".to_string()))
        }

        fn fetch_season(
            &self,
            _title: &str,
            _season_number: usize,
        ) -> Result<Option<Vec<Episode>>, MetadataRetrievalError> {
            Err(MetadataRetrievalError::RequestError("offline".to_string()))
        }
    }

    fn episode(season: usize, number: &str, id: &str, rating: Option<f64>) -> Episode {
        Episode {
            season_number: season,
            episode_number: number.to_string(),
            title: format!("Episode {}", number),
            imdb_id: id.to_string(),
            rating,
        }
    }

    #[test]
    fn test_failed_investigation_reports_failure() {
        let mut sleuth = SeasonSleuth::new(
            Box::new(OfflineProvider) as Box<dyn MetadataProvider>,
            SearchHistory::in_memory(),
        );

        assert!(!run_investigation(&mut sleuth, "Nothing", true));
        assert!(!run_investigation(&mut sleuth, "Nothing", false));
    }

    #[test]
    fn test_episode_marker_badges_by_provider_id() {
        let episodes = vec![
            episode(1, "1", "tt1", Some(9.0)),
            episode(1, "2", "tt2", Some(5.0)),
            episode(1, "3", "tt3", Some(7.0)),
        ];
        let stats = SeasonStats::for_episodes(&episodes);

        assert!(episode_marker(&episodes[0], &stats).contains("(season best)"));
        assert!(episode_marker(&episodes[1], &stats).contains("(season worst)"));
        assert!(episode_marker(&episodes[2], &stats).is_empty());
    }

    #[test]
    fn test_single_rated_episode_is_best_and_worst() {
        let episodes = vec![episode(1, "1", "tt1", Some(7.0))];
        let stats = SeasonStats::for_episodes(&episodes);

        assert!(episode_marker(&episodes[0], &stats).contains("(best & worst)"));
    }

    #[test]
    fn test_verdict_rows_badge_series_extrema() {
        let best = episode(5, "14", "tt14", Some(10.0));

        let row = verdict_row(&best, "(series best)".to_string());

        assert!(row.contains("S05 E14"));
        assert!(row.contains("Episode 14"));
        assert!(row.contains("(series best)"));
    }
}
