use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::backend::types::{MovieRecord, RawValue};

/// A movie with its calculated Oracle score for display
pub struct ScoredMovie<'a> {
    pub record: &'a MovieRecord,
    pub score: Option<u32>,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format the Oracle badge, e.g. "Oracle: 87".
///
/// Returns an empty string when the score is unavailable: the badge is
/// omitted entirely, never shown as zero or a placeholder.
pub fn format_oracle_badge(score: Option<u32>, use_colors: bool) -> String {
    let Some(score) = score else {
        return String::new();
    };
    if use_colors {
        match score {
            75..=100 => format!("Oracle: {}", score.green().bold()),
            50..=74 => format!("Oracle: {}", score.yellow().bold()),
            _ => format!("Oracle: {}", score.red().bold()),
        }
    } else {
        format!("Oracle: {}", score)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format movies as a ranked table with columns: Index, Score, Title (Year).
/// No headers. The score column is right-aligned, 3 chars wide, and left
/// blank for movies without a score.
pub fn format_scored_table(movies: &[ScoredMovie], use_colors: bool) -> String {
    if movies.is_empty() {
        return "No movies found.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 3;
    let separator = "  ";

    movies
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            // 1-based index, right-aligned with trailing dot
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = match scored.score {
                Some(s) => format!("{:>width$}", s, width = score_width),
                None => " ".repeat(score_width),
            };

            let year = format!("({})", scored.record.display_year());
            let fixed_width = index_width + 1 + score_width + separator.len() * 2 + year.len();

            let title = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_title(&scored.record.title, width - fixed_width)
                } else {
                    // Very narrow terminal, show truncated
                    truncate_title(&scored.record.title, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                scored.record.title.clone()
            };

            if use_colors {
                let score_colored = match scored.score {
                    Some(s) if s >= 75 => score_str.green().bold().to_string(),
                    Some(s) if s >= 50 => score_str.yellow().bold().to_string(),
                    Some(_) => score_str.red().bold().to_string(),
                    None => score_str,
                };
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_colored,
                    separator,
                    title,
                    separator,
                    year.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_str, separator, title, separator, year
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn raw_field(value: &Option<RawValue>) -> Option<String> {
    let value = value.as_ref()?;
    let text = value.to_string();
    if text.is_empty() || text.eq_ignore_ascii_case("n/a") {
        None
    } else {
        Some(text)
    }
}

/// Format a single movie with detailed multi-line output: the terminal
/// counterpart of the app's detail modal.
pub fn format_movie_detail(record: &MovieRecord, score: Option<u32>, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let title = record.short_ref();
    if use_colors {
        lines.push(title.bold().to_string());
    } else {
        lines.push(title);
    }

    if let Some(tagline) = record.tagline.as_deref().filter(|t| !t.is_empty()) {
        if use_colors {
            lines.push(format!("  {}", tagline.italic()));
        } else {
            lines.push(format!("  {}", tagline));
        }
    }

    let badge = format_oracle_badge(score, use_colors);
    if !badge.is_empty() {
        lines.push(format!("  {}", badge));
    }

    let mut ratings = Vec::new();
    if let Some(m) = raw_field(&record.metascore) {
        ratings.push(format!("Metascore {}", m));
    }
    if let Some(rt) = raw_field(&record.rotten_tomatoes) {
        ratings.push(format!("RT {}", rt));
    }
    if let Some(imdb) = raw_field(&record.imdb_rating) {
        ratings.push(format!("IMDb {}", imdb));
    }
    if let Some(tmdb) = record.tmdb_rating {
        ratings.push(format!("TMDb {:.1}", tmdb));
    }
    if !ratings.is_empty() {
        lines.push(format!("  Ratings: {}", ratings.join(" | ")));
    }

    if let Some(rated) = record.rated.as_deref() {
        lines.push(format!("  Rated: {}", rated));
    }
    if let Some(runtime) = record.runtime {
        lines.push(format!("  Runtime: {} min", runtime));
    }
    if let Some(genres) = record.genres.as_deref() {
        lines.push(format!("  Genres: {}", genres));
    }
    if let Some(director) = record.director.as_deref() {
        lines.push(format!("  Director: {}", director));
    }
    if let Some(actors) = record.actors.as_deref() {
        lines.push(format!("  Cast: {}", actors));
    }

    let mut financials = Vec::new();
    if let Some(budget) = raw_field(&record.budget) {
        financials.push(format!("Budget {}", budget));
    }
    if let Some(revenue) = raw_field(&record.revenue) {
        financials.push(format!("Revenue {}", revenue));
    }
    if let Some(roi) = raw_field(&record.roi) {
        financials.push(format!("ROI {}", roi));
    }
    if let Some(performance) = record.performance.as_deref() {
        financials.push(performance.to_string());
    }
    if !financials.is_empty() {
        lines.push(format!("  Box office: {}", financials.join(" | ")));
    }

    if let Some(streaming) = record.streaming.as_deref() {
        lines.push(format!("  Streaming: {}", streaming));
    }
    if let Some(url) = record.tmdb_url() {
        if use_colors {
            lines.push(format!("  URL: {}", url.underline()));
        } else {
            lines.push(format!("  URL: {}", url));
        }
    }
    if let Some(overview) = record.overview.as_deref().filter(|o| !o.is_empty()) {
        lines.push(String::new());
        lines.push(format!("  {}", overview));
    }
    if let Some(explanation) = record
        .relevance_explanation
        .as_deref()
        .filter(|e| !e.is_empty())
    {
        lines.push(String::new());
        if use_colors {
            lines.push(format!("  {}", explanation.cyan()));
        } else {
            lines.push(format!("  {}", explanation));
        }
    }

    lines.join("\n")
}

/// Format movies as tab-separated values for scripting
/// Columns: score, title, year, tmdb_id (no headers, no colors).
/// The score column is empty (not zero) for unavailable scores.
pub fn format_tsv(movies: &[ScoredMovie]) -> String {
    if movies.is_empty() {
        return String::new();
    }

    movies
        .iter()
        .map(|scored| {
            let score = scored
                .score
                .map(|s| s.to_string())
                .unwrap_or_default();
            let tmdb_id = scored
                .record
                .tmdb_id
                .map(|id| id.to_string())
                .unwrap_or_default();
            format!(
                "{}\t{}\t{}\t{}",
                score,
                scored.record.title,
                scored.record.display_year(),
                tmdb_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
