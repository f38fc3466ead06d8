use serde::{Deserialize, Serialize};

/// Oracle scoring configuration.
///
/// Every weight, threshold, and bonus the engine uses lives here so the
/// formula can be tuned from the config file without touching code. Each
/// section is optional and falls back to the canonical defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     metascore: 3.0
///     rotten_tomatoes: 2.5
///     imdb: 2.0
///     tmdb: 1.5
///   divergence:
///     threshold: 15
///     bonus: 5
///   revenue_tiers:
///     - { min: 1000000000, bonus: 5 }
///     - { min: 500000000, bonus: 2 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Per-signal blend weights. Missing signals are skipped entirely,
    /// they never count as zero.
    #[serde(default)]
    pub weights: Option<SignalWeights>,

    /// Audience-over-critics bonus: applied when the IMDb rating (on the
    /// 0-100 scale) exceeds the Metascore by strictly more than `threshold`.
    #[serde(default)]
    pub divergence: Option<DivergenceRule>,

    /// Box-office bonus tiers, checked in order; first match wins.
    #[serde(default)]
    pub revenue_tiers: Option<Vec<RevenueTier>>,

    /// Return-on-investment adjustment tiers, checked in order; first
    /// match wins. Bonuses may be negative (flops are penalized).
    #[serde(default)]
    pub roi_tiers: Option<Vec<RoiTier>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Some(SignalWeights::default()),
            divergence: Some(DivergenceRule {
                threshold: 15.0,
                bonus: 5.0,
            }),
            revenue_tiers: Some(vec![
                RevenueTier {
                    min: 1_000_000_000,
                    bonus: 5.0,
                },
                RevenueTier {
                    min: 500_000_000,
                    bonus: 2.0,
                },
            ]),
            roi_tiers: Some(vec![
                RoiTier {
                    min: Some(4.0),
                    max: None,
                    bonus: 5.0,
                },
                RoiTier {
                    min: Some(2.5),
                    max: None,
                    bonus: 2.0,
                },
                RoiTier {
                    min: None,
                    max: Some(1.0),
                    bonus: -5.0,
                },
            ]),
        }
    }
}

/// Blend weights for each rating signal, highest-authority first.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SignalWeights {
    /// Metacritic critic aggregate, already on the 0-100 scale.
    #[serde(default = "default_metascore_weight")]
    pub metascore: f64,

    /// Rotten Tomatoes critic consensus, already on the 0-100 scale.
    #[serde(default = "default_rt_weight")]
    pub rotten_tomatoes: f64,

    /// IMDb audience rating, 0-10, normalized by x10 before blending.
    #[serde(default = "default_imdb_weight")]
    pub imdb: f64,

    /// TMDb platform rating, 0-10, normalized by x10. Lowest-trust signal.
    #[serde(default = "default_tmdb_weight")]
    pub tmdb: f64,
}

fn default_metascore_weight() -> f64 {
    3.0
}

fn default_rt_weight() -> f64 {
    2.5
}

fn default_imdb_weight() -> f64 {
    2.0
}

fn default_tmdb_weight() -> f64 {
    1.5
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            metascore: default_metascore_weight(),
            rotten_tomatoes: default_rt_weight(),
            imdb: default_imdb_weight(),
            tmdb: default_tmdb_weight(),
        }
    }
}

/// Audience/critic divergence rule. Deliberately asymmetric: only the
/// "audience loved it, critics dismissed it" direction earns the bonus.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DivergenceRule {
    /// Gap (in 0-100 points) the IMDb rating must exceed the Metascore by.
    /// Strict inequality: a gap exactly equal to the threshold does not fire.
    pub threshold: f64,

    /// Points added when the rule fires.
    pub bonus: f64,
}

/// A revenue tier: `min` dollars (raw, not millions) earns `bonus` points.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RevenueTier {
    pub min: u64,
    pub bonus: f64,
}

/// An ROI tier matching `min <= roi` and/or `roi < max`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoiTier {
    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,

    pub bonus: f64,
}

impl RoiTier {
    /// Check whether an ROI multiple falls in this tier.
    pub fn matches(&self, roi: f64) -> bool {
        if let Some(min) = self.min {
            if roi < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if roi >= max {
                return false;
            }
        }
        true
    }
}
