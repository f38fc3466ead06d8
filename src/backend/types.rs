use serde::{Deserialize, Serialize};

/// A backend field that may arrive as a JSON number or a string.
///
/// The aggregation backend passes OMDb values through as-is, so ratings show
/// up as `"7.5"`, `"94%"`, `70`, or the literal `"N/A"` depending on the
/// upstream source. Deserialize keeps whatever shape arrived; normalization
/// happens later in `scoring::signals`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One movie as returned by the backend's search/discover/details endpoints.
///
/// Field-for-field mirror of the backend JSON schema. Everything except the
/// title is optional since upstream sources may omit any of it. Records are
/// read-only from the scoring engine's point of view.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MovieRecord {
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    pub year: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,

    /// TMDb platform rating, 0.0-10.0.
    pub tmdb_rating: Option<f64>,
    /// IMDb audience rating, 0.0-10.0, usually a string.
    pub imdb_rating: Option<RawValue>,
    /// Rotten Tomatoes critic consensus, e.g. "94%".
    pub rotten_tomatoes: Option<RawValue>,
    /// Metacritic aggregate, 0-100.
    pub metascore: Option<RawValue>,

    pub rated: Option<String>,
    pub director: Option<String>,
    pub writers: Option<String>,
    pub actors: Option<String>,
    pub genres: Option<String>,

    /// Budget and revenue arrive currency-formatted ("$185.0M") or raw.
    pub budget: Option<RawValue>,
    pub revenue: Option<RawValue>,
    /// Yield multiple, e.g. "3.4x".
    pub roi: Option<RawValue>,
    pub performance: Option<String>,
    pub performance_color: Option<String>,

    pub runtime: Option<u32>,
    pub keywords: Option<String>,
    pub production_countries: Option<String>,
    pub spoken_languages: Option<String>,
    pub streaming: Option<String>,

    /// Relevance note written by the backend's ranking step.
    pub relevance_explanation: Option<String>,

    /// Score precomputed by the backend's reasoning step. When present it
    /// overrides the local heuristic entirely. Some responses name this
    /// field `ai_score`.
    #[serde(default, alias = "ai_score")]
    pub oracle_score: Option<f64>,
}

impl MovieRecord {
    /// Release year for display, "----" when unknown.
    pub fn display_year(&self) -> &str {
        match self.year.as_deref() {
            Some(y) if !y.is_empty() && y != "N/A" => y,
            _ => "----",
        }
    }

    /// The movie's TMDb page, when the record carries an id.
    pub fn tmdb_url(&self) -> Option<String> {
        self.tmdb_id
            .map(|id| format!("https://www.themoviedb.org/movie/{}", id))
    }

    /// Short reference like "Heat (1995)".
    pub fn short_ref(&self) -> String {
        format!("{} ({})", self.title, self.display_year())
    }
}

/// Envelope for POST /api/search.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub ai_interpretation: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub results: Vec<MovieRecord>,
}

/// Envelope for GET /api/discover: four curated sections in one response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoverResponse {
    #[serde(default)]
    pub trending: Vec<MovieRecord>,
    #[serde(default)]
    pub now_playing: Vec<MovieRecord>,
    #[serde(default)]
    pub top_rated: Vec<MovieRecord>,
    #[serde(default)]
    pub upcoming: Vec<MovieRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_field_shapes() {
        let json = r#"{
            "tmdb_id": 603,
            "title": "The Matrix",
            "year": "1999",
            "tmdb_rating": 8.2,
            "imdb_rating": "8.7",
            "rotten_tomatoes": "83%",
            "metascore": 73,
            "revenue": "$463.5M",
            "roi": "7.3x"
        }"#;
        let record: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tmdb_id, Some(603));
        assert_eq!(record.tmdb_rating, Some(8.2));
        assert_eq!(record.imdb_rating, Some(RawValue::Text("8.7".to_string())));
        assert_eq!(record.metascore, Some(RawValue::Number(73.0)));
        assert_eq!(record.revenue, Some(RawValue::Text("$463.5M".to_string())));
        assert!(record.oracle_score.is_none());
    }

    #[test]
    fn test_deserialize_ai_score_alias() {
        let json = r#"{"title": "Dune", "ai_score": 88.0}"#;
        let record: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.oracle_score, Some(88.0));

        let json = r#"{"title": "Dune", "oracle_score": 91.0}"#;
        let record: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.oracle_score, Some(91.0));
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let record: MovieRecord = serde_json::from_str(r#"{"title": "Obscure Film"}"#).unwrap();
        assert_eq!(record.title, "Obscure Film");
        assert!(record.tmdb_id.is_none());
        assert!(record.imdb_rating.is_none());
        assert_eq!(record.display_year(), "----");
        assert!(record.tmdb_url().is_none());
    }

    #[test]
    fn test_tmdb_url() {
        let record = MovieRecord {
            tmdb_id: Some(603),
            ..Default::default()
        };
        assert_eq!(
            record.tmdb_url().unwrap(),
            "https://www.themoviedb.org/movie/603"
        );
    }

    #[test]
    fn test_search_response_defaults() {
        let json = r#"{"query": "heist movies"}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.query, "heist movies");
        assert!(response.results.is_empty());
    }
}
