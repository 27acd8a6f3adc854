use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use futbr_predictor::features::{self, FeatureError, PipelineConfig};
use futbr_predictor::historical_dataset::{self, LoadOptions};

const DEFAULT_DATA_PATH: &str = "data/raw/campeonato-brasileiro-full.csv";

fn main() -> Result<()> {
    init_tracing();

    let positional = positional_args();
    let [home, away] = positional.as_slice() else {
        return Err(anyhow!(
            "usage: match_features <home_team> <away_team> [--data PATH] [--window N] [--cutoff-year YEAR]"
        ));
    };

    let data_path = parse_string_arg("--data")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let mut options = LoadOptions::default();
    if let Some(year) = parse_string_arg("--cutoff-year") {
        options.cutoff_year = Some(year.parse().context("parse --cutoff-year")?);
    }
    let mut config = PipelineConfig::default();
    if let Some(window) = parse_string_arg("--window") {
        config.window = window.parse::<usize>().context("parse --window")?.max(1);
    }

    let history = historical_dataset::load_history_csv(&data_path, &options)
        .with_context(|| format!("load match history from {}", data_path.display()))?;
    if history.is_empty() {
        return Err(anyhow!(
            "no matches left in {} after the cutoff filter",
            data_path.display()
        ));
    }

    let features = match features::assemble_single(&history, home, away, &config) {
        Ok(features) => features,
        Err(err @ FeatureError::UnknownTeam(_)) => {
            let samples = history.sample_teams(5).join(", ");
            return Err(anyhow!("{err}; known teams include: {samples}"));
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", serde_json::to_string_pretty(&features)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

// All supported flags take a value, so a bare "--flag" consumes the next arg.
fn positional_args() -> Vec<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::new();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(flag) = arg.strip_prefix("--") {
            skip_next = !flag.contains('=');
            continue;
        }
        positional.push(arg.clone());
    }
    positional
}

fn parse_string_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&format!("{name}=")) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
