use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, CacheSettings, Config, DEFAULT_BACKEND_URL};
use crate::scoring::{validate_scoring, DivergenceRule, ScoringConfig, SignalWeights};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

fn prompt_weight(name: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(&format!("  {} weight", name), &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if v >= 0.0 => return Ok(v),
            Ok(_) => println!("  Invalid: must be non-negative. Try again."),
            Err(_) => println!("  Invalid: must be a non-negative number. Try again."),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Movie Oracle Configuration Wizard");
    println!("=================================");
    println!();

    // 1. Backend URL
    typewriter("The Oracle needs its backend: the service that aggregates TMDb, OMDb, and the reasoning step.");
    let backend_url = prompt_with_default("Backend URL", DEFAULT_BACKEND_URL)?;

    // 2. Scoring configuration
    println!();
    let defaults = ScoringConfig::default();
    let configure_scoring = prompt_yes_no("Tune the Oracle score? (n accepts defaults)", false)?;

    let scoring = if configure_scoring {
        println!();
        typewriter("The Oracle blends every rating a movie has into one 0-100 score.");
        typewriter("Each signal gets a weight; missing ratings are simply skipped, they never count as zero.");
        let default_weights = SignalWeights::default();
        let weights = SignalWeights {
            metascore: prompt_weight("Metascore", default_weights.metascore)?,
            rotten_tomatoes: prompt_weight("Rotten Tomatoes", default_weights.rotten_tomatoes)?,
            imdb: prompt_weight("IMDb", default_weights.imdb)?,
            tmdb: prompt_weight("TMDb", default_weights.tmdb)?,
        };

        println!();
        typewriter("The divergence bonus rewards movies audiences love but critics dismissed.");
        typewriter("It fires when the IMDb rating (x10) beats the Metascore by strictly more than the threshold.");
        let threshold = loop {
            let input = prompt_with_default("Divergence threshold", "15")?;
            match input.parse::<f64>() {
                Ok(v) if v >= 0.0 => break v,
                _ => println!("  Invalid: must be a non-negative number. Try again."),
            }
        };
        let bonus = loop {
            let input = prompt_with_default("Divergence bonus", "5")?;
            match input.parse::<f64>() {
                Ok(v) if v.is_finite() => break v,
                _ => println!("  Invalid: must be a number. Try again."),
            }
        };

        println!();
        typewriter("Box-office adjustments: +5 for billion-dollar grossers, +2 above $500M,");
        typewriter("and ROI tiers that reward hits (>=2.5x) and penalize flops (<1x).");
        let keep_financial = prompt_yes_no("Keep the default box-office tiers?", true)?;
        let (revenue_tiers, roi_tiers) = if keep_financial {
            (defaults.revenue_tiers.clone(), defaults.roi_tiers.clone())
        } else {
            typewriter("Skipping box-office adjustments. You can add revenue_tiers and roi_tiers to the config file later.");
            (None, None)
        };

        ScoringConfig {
            weights: Some(weights),
            divergence: Some(DivergenceRule { threshold, bonus }),
            revenue_tiers,
            roi_tiers,
        }
    } else {
        defaults
    };

    if let Err(errors) = validate_scoring(&scoring) {
        println!("Scoring config errors:");
        for error in errors {
            println!("  - {}", error);
        }
        anyhow::bail!("Aborting: the scoring configuration is invalid");
    }

    // 3. Cache
    println!();
    typewriter("Backend responses are cached on disk so repeat searches come back instantly.");
    let ttl = loop {
        let input = prompt_with_default("Cache TTL (e.g. 30m, 6h, 2d)", "6h")?;
        match humantime::parse_duration(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        backend_url: Some(backend_url),
        scoring: Some(scoring),
        cache: Some(CacheSettings {
            enabled: Some(true),
            ttl: Some(ttl),
        }),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `movie-oracle search \"a heist movie with a great soundtrack\"` to get started.");

    Ok(())
}
