use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(weights) = &config.weights {
        let named = [
            ("metascore", weights.metascore),
            ("rotten_tomatoes", weights.rotten_tomatoes),
            ("imdb", weights.imdb),
            ("tmdb", weights.tmdb),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                errors.push(format!(
                    "scoring.weights.{}: must be a non-negative number, got {}",
                    name, weight
                ));
            }
        }
        if named.iter().all(|(_, w)| *w <= 0.0) {
            errors.push("scoring.weights: at least one weight must be positive".to_string());
        }
    }

    if let Some(divergence) = &config.divergence {
        if !divergence.threshold.is_finite() || divergence.threshold < 0.0 {
            errors.push(format!(
                "scoring.divergence.threshold: must be non-negative, got {}",
                divergence.threshold
            ));
        }
        if !divergence.bonus.is_finite() {
            errors.push("scoring.divergence.bonus: must be a finite number".to_string());
        }
    }

    if let Some(tiers) = &config.revenue_tiers {
        for (i, tier) in tiers.iter().enumerate() {
            if tier.min == 0 {
                errors.push(format!(
                    "scoring.revenue_tiers[{}].min: must be greater than zero",
                    i
                ));
            }
            if !tier.bonus.is_finite() {
                errors.push(format!(
                    "scoring.revenue_tiers[{}].bonus: must be a finite number",
                    i
                ));
            }
        }
        // First match wins, so tiers must go from highest threshold down.
        for window in tiers.windows(2) {
            if window[0].min <= window[1].min {
                errors.push(
                    "scoring.revenue_tiers: tiers must be ordered by descending min".to_string(),
                );
                break;
            }
        }
    }

    if let Some(tiers) = &config.roi_tiers {
        for (i, tier) in tiers.iter().enumerate() {
            if tier.min.is_none() && tier.max.is_none() {
                errors.push(format!(
                    "scoring.roi_tiers[{}]: needs at least one of min or max",
                    i
                ));
            }
            if let (Some(min), Some(max)) = (tier.min, tier.max) {
                if min >= max {
                    errors.push(format!(
                        "scoring.roi_tiers[{}]: min {} must be below max {}",
                        i, min, max
                    ));
                }
            }
            if !tier.bonus.is_finite() {
                errors.push(format!(
                    "scoring.roi_tiers[{}].bonus: must be a finite number",
                    i
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
