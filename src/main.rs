use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use movie_oracle::backend::MovieRecord;
use movie_oracle::fetch::{DiscoverSection, SearchOutcome};
use movie_oracle::output::ScoredMovie;
use movie_oracle::scoring::calculate_score;
use movie_oracle::session::{load_session, save_session, SessionState};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for movies with a natural-language query
    Search {
        /// What you're in the mood for, in plain words
        query: Vec<String>,
    },
    /// Browse curated lists: trending, now playing, top rated, upcoming
    /// (default if no subcommand)
    Discover,
    /// Show full details for a movie by its index in the last listing
    Details {
        /// Index number of the movie (1-based, as shown in the listing)
        index: usize,
    },
    /// Open a movie's TMDb page in the browser by its index number
    Open {
        /// Index number of the movie (1-based, as shown in the listing)
        index: usize,
    },
    /// Create a config file interactively
    Init,
    /// Delete all cached backend responses
    ClearCache,
}

#[derive(Parser, Debug)]
#[command(name = "movie-oracle")]
#[command(about = "Natural-language movie discovery with Oracle scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/movie-oracle/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Bypass the response cache for this invocation
    #[arg(long, global = true)]
    no_cache: bool,

    /// Emit tab-separated values instead of the colored table
    #[arg(long, global = true)]
    tsv: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Discover);
    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);

    // Init and clear-cache never need a backend, handle them before anything else
    if let Commands::Init = command {
        if let Err(e) = movie_oracle::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }
    if let Commands::ClearCache = command {
        if let Err(e) = movie_oracle::backend::cache::clear_cache() {
            eprintln!("Failed to clear cache: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Response cache cleared.");
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match movie_oracle::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let backend_url = cli
        .backend_url
        .as_deref()
        .unwrap_or_else(|| config.backend_url())
        .to_string();

    if cli.verbose {
        eprintln!("Backend: {}", backend_url);
    }

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = movie_oracle::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let cache_config = match config.cache_config(cli.no_cache) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if cli.verbose && !cache_config.enabled {
        eprintln!("Response cache disabled");
    }

    let cache = movie_oracle::backend::ResponseCache::new(cache_config);
    let client = match movie_oracle::backend::create_client(&backend_url, cache) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create backend client: {}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    let use_colors = !cli.tsv && movie_oracle::output::should_use_colors();
    let session_path = movie_oracle::session::get_session_path();

    match command {
        Commands::Search { query } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                eprintln!("Empty query. Tell the Oracle what you're in the mood for:");
                eprintln!("  movie-oracle search \"slow-burn heist movies from the 90s\"");
                std::process::exit(EXIT_CONFIG);
            }

            let outcome = match movie_oracle::fetch::search_and_score(
                &client,
                &query,
                &scoring,
                cli.verbose,
            )
            .await
            {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("Search failed: {}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            };

            print_search(&outcome, cli.tsv, use_colors);

            let state = SessionState::from_results(&outcome.movies);
            if let Err(e) = save_session(&session_path, &state) {
                eprintln!("Warning: could not save listing for `open`/`details`: {}", e);
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} movies in {:?}",
                    outcome.movies.len(),
                    start_time.elapsed()
                );
            }
        }
        Commands::Discover => {
            let sections = match movie_oracle::fetch::discover_and_score(
                &client,
                &scoring,
                cli.verbose,
            )
            .await
            {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Discover failed: {}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            };

            // One flat listing across sections, so `open 7` is unambiguous
            let flat: Vec<_> = sections
                .iter()
                .flat_map(|s| s.movies.iter().cloned())
                .collect();

            print_discover(&sections, cli.tsv, use_colors);

            let state = SessionState::from_results(&flat);
            if let Err(e) = save_session(&session_path, &state) {
                eprintln!("Warning: could not save listing for `open`/`details`: {}", e);
            }

            if cli.verbose {
                eprintln!();
                eprintln!("Total: {} movies in {:?}", flat.len(), start_time.elapsed());
            }
        }
        Commands::Details { index } => {
            let entry = match resolve_index(&session_path, index) {
                Ok(e) => e,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let Some(tmdb_id) = entry.tmdb_id else {
                eprintln!("'{}' has no TMDb id, details are unavailable.", entry.title);
                std::process::exit(EXIT_CONFIG);
            };

            let record = match client.details(tmdb_id).await {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Failed to fetch details: {}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            };

            let result = calculate_score(&record, &scoring);
            println!(
                "{}",
                movie_oracle::output::format_movie_detail(&record, result.score, use_colors)
            );

            if cli.verbose {
                for contribution in &result.breakdown.contributions {
                    eprintln!(
                        "  {}: {} ({:.1} -> {:.1})",
                        contribution.label,
                        contribution.description,
                        contribution.before,
                        contribution.after
                    );
                }
            }
        }
        Commands::Open { index } => {
            let entry = match resolve_index(&session_path, index) {
                Ok(e) => e,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let record = MovieRecord {
                tmdb_id: entry.tmdb_id,
                title: entry.title.clone(),
                year: entry.year.clone(),
                ..Default::default()
            };

            match movie_oracle::browser::open_movie(&record) {
                Ok(url) => println!("Opening {} in browser: {}", record.short_ref(), url),
                Err(e) => {
                    eprintln!("Failed to open browser: {}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            }
        }
        Commands::Init | Commands::ClearCache => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Look up a 1-based index in the last saved listing.
fn resolve_index(
    session_path: &std::path::Path,
    index: usize,
) -> anyhow::Result<movie_oracle::session::SessionEntry> {
    let state = load_session(session_path)?;
    if state.entries.is_empty() {
        anyhow::bail!("No previous listing. Run `movie-oracle search` or `discover` first.");
    }
    state.get(index).cloned().ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid index {}. Must be between 1 and {}.",
            index,
            state.entries.len()
        )
    })
}

fn print_search(outcome: &SearchOutcome, tsv: bool, use_colors: bool) {
    let scored: Vec<ScoredMovie> = outcome
        .movies
        .iter()
        .map(|(record, result)| ScoredMovie {
            record,
            score: result.score,
        })
        .collect();

    if tsv {
        let body = movie_oracle::output::format_tsv(&scored);
        if !body.is_empty() {
            println!("{}", body);
        }
        return;
    }

    if !outcome.interpretation.is_empty() {
        use owo_colors::OwoColorize;
        if use_colors {
            println!("{}", outcome.interpretation.cyan());
        } else {
            println!("{}", outcome.interpretation);
        }
    }
    if !outcome.summary.is_empty() {
        println!("{}", outcome.summary);
    }
    if !outcome.interpretation.is_empty() || !outcome.summary.is_empty() {
        println!();
    }

    println!(
        "{}",
        movie_oracle::output::format_scored_table(&scored, use_colors)
    );
}

fn print_discover(sections: &[DiscoverSection], tsv: bool, use_colors: bool) {
    let scored: Vec<ScoredMovie> = sections
        .iter()
        .flat_map(|s| s.movies.iter())
        .map(|(record, result)| ScoredMovie {
            record,
            score: result.score,
        })
        .collect();

    if tsv {
        let body = movie_oracle::output::format_tsv(&scored);
        if !body.is_empty() {
            println!("{}", body);
        }
        return;
    }

    if scored.is_empty() {
        println!("No movies found.");
        return;
    }

    // The table numbers every movie continuously; re-split its lines to
    // print each section under its own header.
    use owo_colors::OwoColorize;
    let table = movie_oracle::output::format_scored_table(&scored, use_colors);
    let mut lines = table.lines();
    let mut first = true;
    for section in sections {
        if section.movies.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        first = false;

        if use_colors {
            println!("{}", section.label.bold().underline());
        } else {
            println!("{}:", section.label);
        }
        for _ in 0..section.movies.len() {
            if let Some(line) = lines.next() {
                println!("{}", line);
            }
        }
    }
}
