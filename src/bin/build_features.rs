use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use futbr_predictor::feature_export;
use futbr_predictor::features::{self, PipelineConfig};
use futbr_predictor::historical_dataset::{self, LoadOptions, MatchHistory};

const DEFAULT_OUT_PATH: &str = "data/features/match_features.parquet";

fn main() -> Result<()> {
    init_tracing();

    let Some(hist_path) = parse_string_arg("--hist").map(PathBuf::from) else {
        return Err(anyhow!(
            "usage: build_features --hist PATH [--new PATH] [--out PATH] [--window N] [--cutoff-year YEAR]"
        ));
    };
    let new_path = parse_string_arg("--new").map(PathBuf::from);
    let out_path = parse_string_arg("--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_PATH));

    let mut options = LoadOptions::default();
    if let Some(year) = parse_string_arg("--cutoff-year") {
        options.cutoff_year = Some(year.parse().context("parse --cutoff-year")?);
    }
    let mut config = PipelineConfig::default();
    if let Some(window) = parse_string_arg("--window") {
        config.window = window.parse::<usize>().context("parse --window")?.max(1);
    }

    let mut records = historical_dataset::read_match_csv(&hist_path)
        .with_context(|| format!("load historical matches from {}", hist_path.display()))?;
    let hist_rows = records.len();
    if let Some(new_path) = &new_path {
        let new_records = historical_dataset::read_match_csv(new_path)
            .with_context(|| format!("load new matches from {}", new_path.display()))?;
        println!(
            "Combined {} historical rows with {} new rows",
            hist_rows,
            new_records.len()
        );
        records.extend(new_records);
    }

    let history = MatchHistory::from_records(records, &options);
    if history.is_empty() {
        return Err(anyhow!("no matches left after the cutoff filter"));
    }

    let table = features::assemble_training_table(&history, &config);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    feature_export::write_training_table(&out_path, &table)?;

    println!("Training table written to {}", out_path.display());
    println!(
        "Eligible matches: {} (cutoff year {:?})",
        table.eligible, options.cutoff_year
    );
    println!("Dropped for missing history: {}", table.dropped);
    println!("Rows written: {}", table.rows.len());
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
