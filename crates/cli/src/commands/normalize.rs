//! Normalize command - offline normalization of a raw payload

use anyhow::{Context, Result};
use loterias_domain::normalize;
use serde_json::Value;
use std::io::{self, Read};

use crate::args::NormalizeArgs;

pub async fn execute(args: NormalizeArgs) -> Result<()> {
    let input = read_input(&args)?;
    let raw: Value = serde_json::from_str(&input).context("Input is not valid JSON")?;

    let result = normalize(&raw, args.lottery);
    if !result.is_complete() {
        tracing::warn!(
            lottery = %args.lottery,
            contest = result.contest_number,
            numbers = result.drawn_numbers.len(),
            "Payload does not describe a completed draw"
        );
    }

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize output")?;
    println!("{}", json);

    Ok(())
}

fn read_input(args: &NormalizeArgs) -> Result<String> {
    if args.file.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read file: {}", args.file.display()))
    }
}
