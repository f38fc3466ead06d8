use crate::backend::types::{MovieRecord, RawValue};

use super::config::SignalWeights;

/// Normalize a loosely-typed backend field into a plain number.
///
/// Upstream sources deliver ratings as JSON numbers, numeric strings,
/// percentage strings ("94%"), multiples ("3.4x"), or the literal "N/A".
/// Anything that does not parse cleanly is treated as absent, never as zero.
pub fn parse_optional_numeric(value: Option<&RawValue>) -> Option<f64> {
    match value? {
        RawValue::Number(n) if n.is_finite() => Some(*n),
        RawValue::Number(_) => None,
        RawValue::Text(s) => parse_numeric_str(s),
    }
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("n/a") {
        return None;
    }
    let s = s
        .strip_suffix('%')
        .or_else(|| s.strip_suffix('x'))
        .or_else(|| s.strip_suffix('X'))
        .unwrap_or(s)
        .trim();
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a revenue field into whole dollars.
///
/// Accepts raw numbers, currency strings with thousands separators
/// ("$1,200,000,000"), and the backend's abbreviated form ("$912.0M").
pub fn parse_revenue(value: Option<&RawValue>) -> Option<u64> {
    match value? {
        RawValue::Number(n) if n.is_finite() && *n >= 0.0 => Some(n.round() as u64),
        RawValue::Number(_) => None,
        RawValue::Text(s) => parse_revenue_str(s),
    }
}

fn parse_revenue_str(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("n/a") {
        return None;
    }
    let s = s.strip_prefix('$').unwrap_or(s).trim();
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != ' ').collect();

    let (digits, multiplier) = if let Some(rest) = cleaned.strip_suffix(['b', 'B']) {
        (rest, 1e9)
    } else if let Some(rest) = cleaned.strip_suffix(['m', 'M']) {
        (rest, 1e6)
    } else if let Some(rest) = cleaned.strip_suffix(['k', 'K']) {
        (rest, 1e3)
    } else {
        (cleaned.as_str(), 1.0)
    };

    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

/// The rating signals of one record, each normalized to the 0-100 scale.
/// Absent or unparseable inputs stay `None` so they can be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingSignals {
    pub metascore: Option<f64>,
    pub rotten_tomatoes: Option<f64>,
    pub imdb: Option<f64>,
    pub tmdb: Option<f64>,
}

impl RatingSignals {
    /// Extract and normalize every rating signal from a record.
    pub fn extract(record: &MovieRecord) -> Self {
        Self {
            metascore: parse_optional_numeric(record.metascore.as_ref()),
            rotten_tomatoes: parse_optional_numeric(record.rotten_tomatoes.as_ref()),
            imdb: parse_optional_numeric(record.imdb_rating.as_ref()).map(|r| r * 10.0),
            tmdb: record
                .tmdb_rating
                .filter(|r| r.is_finite())
                .map(|r| r * 10.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metascore.is_none()
            && self.rotten_tomatoes.is_none()
            && self.imdb.is_none()
            && self.tmdb.is_none()
    }

    /// Weighted average over the signals that are present.
    ///
    /// `sum(value_i * weight_i) / sum(weight_i)` where the sums run only
    /// over present signals. Missing signals never drag the average down.
    /// Returns `None` when no signal carries a positive weight.
    pub fn blend(&self, weights: &SignalWeights) -> Option<f64> {
        let pairs = [
            (self.metascore, weights.metascore),
            (self.rotten_tomatoes, weights.rotten_tomatoes),
            (self.imdb, weights.imdb),
            (self.tmdb, weights.tmdb),
        ];

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (value, weight) in pairs {
            if let Some(v) = value {
                weighted_sum += v * weight;
                weight_total += weight;
            }
        }

        if weight_total > 0.0 {
            Some(weighted_sum / weight_total)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::MovieRecord;

    fn num(n: f64) -> Option<RawValue> {
        Some(RawValue::Number(n))
    }

    fn text(s: &str) -> Option<RawValue> {
        Some(RawValue::Text(s.to_string()))
    }

    #[test]
    fn test_parse_numeric_plain() {
        assert_eq!(parse_optional_numeric(num(70.0).as_ref()), Some(70.0));
        assert_eq!(parse_optional_numeric(text("70").as_ref()), Some(70.0));
        assert_eq!(parse_optional_numeric(text("7.5").as_ref()), Some(7.5));
    }

    #[test]
    fn test_parse_numeric_na_sentinel() {
        assert_eq!(parse_optional_numeric(text("N/A").as_ref()), None);
        assert_eq!(parse_optional_numeric(text("n/a").as_ref()), None);
        assert_eq!(parse_optional_numeric(text("  N/a ").as_ref()), None);
    }

    #[test]
    fn test_parse_numeric_suffixes() {
        // Rotten Tomatoes percentage and ROI multiple forms
        assert_eq!(parse_optional_numeric(text("94%").as_ref()), Some(94.0));
        assert_eq!(parse_optional_numeric(text("3.4x").as_ref()), Some(3.4));
    }

    #[test]
    fn test_parse_numeric_garbage() {
        assert_eq!(parse_optional_numeric(text("unknown").as_ref()), None);
        assert_eq!(parse_optional_numeric(text("").as_ref()), None);
        assert_eq!(parse_optional_numeric(None), None);
        assert_eq!(parse_optional_numeric(num(f64::NAN).as_ref()), None);
    }

    #[test]
    fn test_parse_revenue_currency_string() {
        assert_eq!(
            parse_revenue(text("$1,200,000,000").as_ref()),
            Some(1_200_000_000)
        );
        assert_eq!(parse_revenue(text("850000000").as_ref()), Some(850_000_000));
    }

    #[test]
    fn test_parse_revenue_abbreviated() {
        // The backend formats financials as "$NNN.NM"
        assert_eq!(parse_revenue(text("$912.0M").as_ref()), Some(912_000_000));
        assert_eq!(parse_revenue(text("$1.5B").as_ref()), Some(1_500_000_000));
        assert_eq!(parse_revenue(text("$500k").as_ref()), Some(500_000));
    }

    #[test]
    fn test_parse_revenue_raw_number() {
        assert_eq!(parse_revenue(num(2_000_000_000.0).as_ref()), Some(2_000_000_000));
    }

    #[test]
    fn test_parse_revenue_absent() {
        assert_eq!(parse_revenue(text("N/A").as_ref()), None);
        assert_eq!(parse_revenue(text("unknown").as_ref()), None);
        assert_eq!(parse_revenue(num(-5.0).as_ref()), None);
        assert_eq!(parse_revenue(None), None);
    }

    #[test]
    fn test_extract_normalizes_scales() {
        let record = MovieRecord {
            metascore: text("70"),
            rotten_tomatoes: text("80%"),
            imdb_rating: text("7.5"),
            tmdb_rating: Some(6.8),
            ..Default::default()
        };
        let signals = RatingSignals::extract(&record);
        assert_eq!(signals.metascore, Some(70.0));
        assert_eq!(signals.rotten_tomatoes, Some(80.0));
        assert_eq!(signals.imdb, Some(75.0));
        assert_eq!(signals.tmdb, Some(68.0));
    }

    #[test]
    fn test_blend_skips_missing_signals() {
        let signals = RatingSignals {
            metascore: Some(70.0),
            rotten_tomatoes: Some(80.0),
            imdb: Some(75.0),
            tmdb: None,
        };
        let blended = signals.blend(&SignalWeights::default()).unwrap();
        // (70*3 + 80*2.5 + 75*2) / 7.5
        assert!((blended - 74.666).abs() < 0.01);
    }

    #[test]
    fn test_blend_single_signal_is_identity() {
        let signals = RatingSignals {
            metascore: None,
            rotten_tomatoes: None,
            imdb: None,
            tmdb: Some(68.0),
        };
        assert_eq!(signals.blend(&SignalWeights::default()), Some(68.0));
    }

    #[test]
    fn test_blend_empty_is_unavailable() {
        let signals = RatingSignals::default();
        assert!(signals.is_empty());
        assert_eq!(signals.blend(&SignalWeights::default()), None);
    }

    #[test]
    fn test_blend_all_zero_weights() {
        let signals = RatingSignals {
            metascore: Some(70.0),
            ..Default::default()
        };
        let weights = SignalWeights {
            metascore: 0.0,
            rotten_tomatoes: 0.0,
            imdb: 0.0,
            tmdb: 0.0,
        };
        assert_eq!(signals.blend(&weights), None);
    }
}
