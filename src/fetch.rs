use anyhow::Result;
use std::collections::HashSet;

use crate::backend::{BackendClient, MovieRecord};
use crate::scoring::{calculate_score, ScoreResult, ScoringConfig};

/// A search response with every result scored and ranked.
pub struct SearchOutcome {
    pub interpretation: String,
    pub summary: String,
    pub movies: Vec<(MovieRecord, ScoreResult)>,
}

/// One discover section (e.g. "Trending") with its scored records.
pub struct DiscoverSection {
    pub label: &'static str,
    pub movies: Vec<(MovieRecord, ScoreResult)>,
}

/// Run a natural-language search, then dedupe, score, and rank the results.
///
/// Called from main.rs for the `search` command. Scores are derived fresh
/// on every invocation; nothing is memoized across records.
pub async fn search_and_score(
    client: &BackendClient,
    query: &str,
    scoring: &ScoringConfig,
    verbose: bool,
) -> Result<SearchOutcome> {
    let response = client.search(query).await?;

    if verbose {
        eprintln!("Backend returned {} results", response.results.len());
    }

    let unique = dedupe_records(response.results);
    if verbose {
        eprintln!("After deduplication: {} unique movies", unique.len());
    }

    Ok(SearchOutcome {
        interpretation: response.ai_interpretation,
        summary: response.summary,
        movies: score_and_rank(unique, scoring),
    })
}

/// Fetch the discover feed and score each curated section.
pub async fn discover_and_score(
    client: &BackendClient,
    scoring: &ScoringConfig,
    verbose: bool,
) -> Result<Vec<DiscoverSection>> {
    let response = client.discover().await?;

    let sections = vec![
        ("Trending", response.trending),
        ("Now Playing", response.now_playing),
        ("Top Rated", response.top_rated),
        ("Upcoming", response.upcoming),
    ];

    let mut scored_sections = Vec::new();
    for (label, records) in sections {
        if verbose {
            eprintln!("  {}: {} movies", label, records.len());
        }
        scored_sections.push(DiscoverSection {
            label,
            movies: score_and_rank(dedupe_records(records), scoring),
        });
    }

    Ok(scored_sections)
}

/// Drop duplicate records by TMDb id (multiple search strategies can
/// surface the same movie). Records without an id are kept as-is.
fn dedupe_records(records: Vec<MovieRecord>) -> Vec<MovieRecord> {
    let mut seen_ids = HashSet::new();
    records
        .into_iter()
        .filter(|record| match record.tmdb_id {
            Some(id) => seen_ids.insert(id),
            None => true,
        })
        .collect()
}

/// Score every record and sort by Oracle score descending. Unavailable
/// scores sink to the bottom. The sort is stable, so records tied on
/// score keep the backend's own ranking order.
pub fn score_and_rank(
    records: Vec<MovieRecord>,
    scoring: &ScoringConfig,
) -> Vec<(MovieRecord, ScoreResult)> {
    let mut scored: Vec<_> = records
        .into_iter()
        .map(|record| {
            let result = calculate_score(&record, scoring);
            (record, result)
        })
        .collect();

    scored.sort_by(|a, b| b.1.score.cmp(&a.1.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::RawValue;

    fn record(tmdb_id: Option<u64>, title: &str, metascore: Option<f64>) -> MovieRecord {
        MovieRecord {
            tmdb_id,
            title: title.to_string(),
            metascore: metascore.map(RawValue::Number),
            ..Default::default()
        }
    }

    #[test]
    fn test_dedupe_by_tmdb_id() {
        let records = vec![
            record(Some(1), "Heat", Some(76.0)),
            record(Some(2), "Ronin", Some(67.0)),
            record(Some(1), "Heat", Some(76.0)),
            record(None, "Unknown A", None),
            record(None, "Unknown B", None),
        ];
        let unique = dedupe_records(records);
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_rank_descending_with_unavailable_last() {
        let records = vec![
            record(Some(1), "Middling", Some(50.0)),
            record(Some(2), "Unscored", None),
            record(Some(3), "Great", Some(90.0)),
        ];
        let ranked = score_and_rank(records, &ScoringConfig::default());
        let titles: Vec<&str> = ranked.iter().map(|(r, _)| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Great", "Middling", "Unscored"]);
        assert_eq!(ranked[2].1.score, None);
    }

    #[test]
    fn test_ties_keep_backend_order() {
        // The backend's reasoning step already ranked these; equal Oracle
        // scores must not reshuffle them.
        let records = vec![
            record(Some(1), "First", Some(70.0)),
            record(Some(2), "Second", Some(70.0)),
            record(Some(3), "Third", Some(70.0)),
        ];
        let ranked = score_and_rank(records, &ScoringConfig::default());
        let titles: Vec<&str> = ranked.iter().map(|(r, _)| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }
}
