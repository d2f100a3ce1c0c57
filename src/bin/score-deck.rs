//! Score an extractor's output from the command line.
//!
//! Usage: `score-deck [PATH|-]` (stdin when PATH is absent or `-`).
//! Prints `{"extracted": .., "decision": ..}` as pretty JSON.

use std::io::Read;

use anyhow::{Context, Result};
use pitchdeck_analyzer::extract::analyze_text;
use pitchdeck_analyzer::telemetry::init_tracing;
use tracing::info;

fn read_input(arg: Option<&str>) -> Result<String> {
    match arg {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading model output from stdin")?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading model output from {path}")),
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("warn");

    let arg = std::env::args().nth(1);
    let text = read_input(arg.as_deref())?;
    let analysis = analyze_text(&text)?;
    info!(
        score = analysis.decision.score,
        verdict = %analysis.decision.verdict,
        "deck scored"
    );

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
