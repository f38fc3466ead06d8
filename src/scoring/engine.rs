use crate::backend::types::MovieRecord;

use super::config::ScoringConfig;
use super::signals::{parse_optional_numeric, parse_revenue, RatingSignals};

#[derive(Debug, Clone)]
pub struct SignalContribution {
    pub label: String,       // e.g. "Blend", "Divergence", "Revenue"
    pub description: String, // e.g. "imdb 90 vs metascore 60, gap 30 > 15"
    pub before: f64,         // Score before this step
    pub after: f64,          // Score after this step
}

#[derive(Debug, Clone, Default)]
pub struct ScoreBreakdown {
    pub contributions: Vec<SignalContribution>,
}

/// Result of scoring one record. `score` is `None` when not a single
/// rating signal was usable; the renderer must omit the badge in that
/// case, never display a zero.
#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub score: Option<u32>,
    pub breakdown: ScoreBreakdown,
}

impl ScoreResult {
    fn unavailable() -> Self {
        Self {
            score: None,
            breakdown: ScoreBreakdown::default(),
        }
    }
}

/// Compute the Oracle score for one movie record.
///
/// Tiered precedence:
/// 1. A score supplied by the backend's reasoning step wins outright.
/// 2. Otherwise, blend the present rating signals by weight.
/// 3. Apply the divergence and financial adjustments, then clamp to
///    [0, 100] and round.
///
/// Pure and stateless: never mutates the record, performs no I/O, and
/// degrades to `None` instead of failing on malformed input.
pub fn calculate_score(record: &MovieRecord, config: &ScoringConfig) -> ScoreResult {
    // Trust tier: an externally supplied score overrides the heuristic
    // regardless of every other field.
    if let Some(trusted) = record.oracle_score.filter(|s| s.is_finite()) {
        let clamped = clamp_round(trusted);
        return ScoreResult {
            score: Some(clamped),
            breakdown: ScoreBreakdown {
                contributions: vec![SignalContribution {
                    label: "Oracle override".to_string(),
                    description: format!("backend supplied {:.1}", trusted),
                    before: trusted,
                    after: clamped as f64,
                }],
            },
        };
    }

    let weights = config.weights.clone().unwrap_or_default();
    let signals = RatingSignals::extract(record);

    let Some(blended) = signals.blend(&weights) else {
        return ScoreResult::unavailable();
    };

    let mut score = blended;
    let mut contributions = vec![SignalContribution {
        label: "Blend".to_string(),
        description: describe_signals(&signals),
        before: 0.0,
        after: score,
    }];

    // Divergence bonus: audience-loved, critically-dismissed. The gap must
    // strictly exceed the threshold, and the symmetric case never fires.
    if let Some(rule) = &config.divergence {
        if let (Some(imdb), Some(metascore)) = (signals.imdb, signals.metascore) {
            let gap = imdb - metascore;
            if gap > rule.threshold {
                let before = score;
                score += rule.bonus;
                contributions.push(SignalContribution {
                    label: "Divergence".to_string(),
                    description: format!(
                        "imdb {:.0} vs metascore {:.0}, gap {:.0} > {:.0}",
                        imdb, metascore, gap, rule.threshold
                    ),
                    before,
                    after: score,
                });
            }
        }
    }

    // Blockbuster bonus: first matching revenue tier.
    if let Some(tiers) = &config.revenue_tiers {
        if let Some(revenue) = parse_revenue(record.revenue.as_ref()) {
            if let Some(tier) = tiers.iter().find(|t| revenue >= t.min) {
                let before = score;
                score += tier.bonus;
                contributions.push(SignalContribution {
                    label: "Revenue".to_string(),
                    description: format!("${} >= ${} -> {:+}", revenue, tier.min, tier.bonus),
                    before,
                    after: score,
                });
            }
        }
    }

    // ROI adjustment: first matching tier; flops are penalized.
    if let Some(tiers) = &config.roi_tiers {
        if let Some(roi) = parse_optional_numeric(record.roi.as_ref()) {
            if let Some(tier) = tiers.iter().find(|t| t.matches(roi)) {
                let before = score;
                score += tier.bonus;
                contributions.push(SignalContribution {
                    label: "ROI".to_string(),
                    description: format!("{:.1}x -> {:+}", roi, tier.bonus),
                    before,
                    after: score,
                });
            }
        }
    }

    ScoreResult {
        score: Some(clamp_round(score)),
        breakdown: ScoreBreakdown { contributions },
    }
}

fn clamp_round(score: f64) -> u32 {
    score.clamp(0.0, 100.0).round() as u32
}

fn describe_signals(signals: &RatingSignals) -> String {
    let mut parts = Vec::new();
    if let Some(v) = signals.metascore {
        parts.push(format!("metascore {:.0}", v));
    }
    if let Some(v) = signals.rotten_tomatoes {
        parts.push(format!("rt {:.0}", v));
    }
    if let Some(v) = signals.imdb {
        parts.push(format!("imdb {:.0}", v));
    }
    if let Some(v) = signals.tmdb {
        parts.push(format!("tmdb {:.0}", v));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::RawValue;

    fn text(s: &str) -> Option<RawValue> {
        Some(RawValue::Text(s.to_string()))
    }

    fn num(n: f64) -> Option<RawValue> {
        Some(RawValue::Number(n))
    }

    fn score_of(record: &MovieRecord) -> Option<u32> {
        calculate_score(record, &ScoringConfig::default()).score
    }

    #[test]
    fn test_weighted_blend() {
        // (70*3 + 80*2.5 + 75*2) / 7.5 = 74.67 -> 75; gap 75-70=5, no bonus
        let record = MovieRecord {
            metascore: num(70.0),
            rotten_tomatoes: num(80.0),
            imdb_rating: text("7.5"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), Some(75));
    }

    #[test]
    fn test_divergence_bonus() {
        // blend (60*3 + 90*2) / 5 = 72; gap 90-60=30 > 15 -> 77
        let record = MovieRecord {
            metascore: num(60.0),
            imdb_rating: text("9.0"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), Some(77));
    }

    #[test]
    fn test_divergence_boundary_is_strict() {
        // imdb 7.5 -> 75, metascore 60: gap exactly 15 must NOT fire.
        // blend (60*3 + 75*2) / 5 = 66
        let record = MovieRecord {
            metascore: num(60.0),
            imdb_rating: text("7.5"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), Some(66));
    }

    #[test]
    fn test_divergence_is_asymmetric() {
        // Critics way above audience: no adjustment either direction.
        // blend (90*3 + 60*2) / 5 = 78
        let record = MovieRecord {
            metascore: num(90.0),
            imdb_rating: text("6.0"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), Some(78));
    }

    #[test]
    fn test_blockbuster_bonus() {
        // blend = 50; $1.2B hits the top revenue tier -> +5
        let record = MovieRecord {
            metascore: num(50.0),
            revenue: text("$1,200,000,000"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), Some(55));
    }

    #[test]
    fn test_mid_revenue_tier() {
        // $600M hits the second tier -> +2
        let record = MovieRecord {
            metascore: num(50.0),
            revenue: text("$600.0M"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), Some(52));
    }

    #[test]
    fn test_roi_tiers() {
        let hit = MovieRecord {
            metascore: num(50.0),
            roi: text("4.2x"),
            ..Default::default()
        };
        assert_eq!(score_of(&hit), Some(55));

        let solid = MovieRecord {
            metascore: num(50.0),
            roi: text("2.7x"),
            ..Default::default()
        };
        assert_eq!(score_of(&solid), Some(52));

        let flop = MovieRecord {
            metascore: num(50.0),
            roi: text("0.4x"),
            ..Default::default()
        };
        assert_eq!(score_of(&flop), Some(45));
    }

    #[test]
    fn test_revenue_and_roi_stack() {
        // blend 50, +5 revenue, +5 ROI -> 60
        let record = MovieRecord {
            metascore: num(50.0),
            revenue: text("$2.0B"),
            roi: text("6.0x"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), Some(60));
    }

    #[test]
    fn test_trust_tier_wins_outright() {
        let record = MovieRecord {
            oracle_score: Some(42.0),
            metascore: num(99.0),
            rotten_tomatoes: num(99.0),
            imdb_rating: text("9.9"),
            revenue: text("$2.0B"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), Some(42));
    }

    #[test]
    fn test_trust_tier_clamps_and_rounds() {
        let over = MovieRecord {
            oracle_score: Some(150.0),
            ..Default::default()
        };
        assert_eq!(score_of(&over), Some(100));

        let under = MovieRecord {
            oracle_score: Some(-3.0),
            ..Default::default()
        };
        assert_eq!(score_of(&under), Some(0));

        let fractional = MovieRecord {
            oracle_score: Some(41.6),
            ..Default::default()
        };
        assert_eq!(score_of(&fractional), Some(42));
    }

    #[test]
    fn test_empty_record_is_unavailable() {
        let record = MovieRecord::default();
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, None);
        assert!(result.breakdown.contributions.is_empty());
    }

    #[test]
    fn test_financials_alone_are_not_a_rating() {
        // Revenue without any rating signal must stay unavailable, not 0+5.
        let record = MovieRecord {
            revenue: text("$2.0B"),
            roi: text("6.0x"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), None);
    }

    #[test]
    fn test_na_sentinels_treated_as_absent() {
        let record = MovieRecord {
            metascore: text("N/A"),
            rotten_tomatoes: text("N/A"),
            imdb_rating: text("N/A"),
            roi: text("N/A"),
            ..Default::default()
        };
        assert_eq!(score_of(&record), None);
    }

    #[test]
    fn test_missing_signal_independence() {
        // Dropping the tmdb signal must not pull the result toward zero:
        // the remaining signals are re-averaged over their own weights.
        let with_tmdb = MovieRecord {
            metascore: num(80.0),
            tmdb_rating: Some(8.0),
            ..Default::default()
        };
        let without_tmdb = MovieRecord {
            metascore: num(80.0),
            ..Default::default()
        };
        assert_eq!(score_of(&with_tmdb), Some(80));
        assert_eq!(score_of(&without_tmdb), Some(80));
    }

    #[test]
    fn test_blend_monotonicity() {
        // Raising one present signal never lowers the blended result.
        let mut previous = 0;
        for rt in [10.0, 30.0, 50.0, 70.0, 90.0] {
            let record = MovieRecord {
                metascore: num(50.0),
                rotten_tomatoes: num(rt),
                ..Default::default()
            };
            let score = score_of(&record).unwrap();
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_clamp_invariant() {
        // Stacked bonuses on a near-perfect blend stay inside [0, 100].
        let high = MovieRecord {
            metascore: num(99.0),
            imdb_rating: text("9.9"),
            revenue: text("$2.0B"),
            roi: text("8.0x"),
            ..Default::default()
        };
        assert_eq!(score_of(&high), Some(100));

        // Flop penalty on a rock-bottom blend stays at 0.
        let low = MovieRecord {
            metascore: num(1.0),
            roi: text("0.1x"),
            ..Default::default()
        };
        assert_eq!(score_of(&low), Some(0));
    }

    #[test]
    fn test_custom_weights() {
        // With the critic weight zeroed out, only imdb counts.
        let config = ScoringConfig {
            weights: Some(crate::scoring::SignalWeights {
                metascore: 0.0,
                rotten_tomatoes: 0.0,
                imdb: 1.0,
                tmdb: 0.0,
            }),
            divergence: None,
            revenue_tiers: None,
            roi_tiers: None,
        };
        let record = MovieRecord {
            metascore: num(20.0),
            imdb_rating: text("9.0"),
            ..Default::default()
        };
        let result = calculate_score(&record, &config);
        assert_eq!(result.score, Some(90));
    }

    #[test]
    fn test_breakdown_records_each_step() {
        let record = MovieRecord {
            metascore: num(60.0),
            imdb_rating: text("9.0"),
            revenue: text("$1.5B"),
            ..Default::default()
        };
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, Some(82)); // 72 + 5 divergence + 5 revenue
        let labels: Vec<&str> = result
            .breakdown
            .contributions
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Blend", "Divergence", "Revenue"]);
    }

    #[test]
    fn test_scoring_never_mutates_record() {
        let record = MovieRecord {
            metascore: num(70.0),
            revenue: text("$1.2B"),
            ..Default::default()
        };
        let snapshot = record.clone();
        let _ = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(record, snapshot);
    }
}
