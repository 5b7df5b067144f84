//! Result commands - latest, contest, and all lotteries

use anyhow::{Context, Result, bail};
use loterias_domain::usecases::seo::json_ld;
use serde_json::json;
use std::path::PathBuf;

use super::output::print_result;
use super::{build_service, unavailable};
use crate::args::{AllArgs, ContestArgs, LatestArgs};
use crate::config::AppConfig;

pub async fn latest(args: LatestArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let service = build_service(&config)?;

    tracing::info!(lottery = %args.lottery, "Fetching latest result");

    let fetched = service.latest(args.lottery).await;
    service.flush_notifications().await;
    let result = fetched.map_err(|e| unavailable(args.lottery, None, e))?;

    if args.json {
        let mut value = serde_json::to_value(&result).context("Failed to serialize result")?;
        if args.json_ld {
            value["json_ld"] = json_ld(service.site(), &result);
        }
        let json = serde_json::to_string_pretty(&value).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        print_result(&result);
    }

    Ok(())
}

pub async fn contest(args: ContestArgs, config_path: Option<PathBuf>) -> Result<()> {
    if args.number == 0 {
        bail!("Contest numbers start at 1");
    }

    let config = AppConfig::load(config_path.as_deref())?;
    let service = build_service(&config)?;

    tracing::info!(lottery = %args.lottery, contest = args.number, "Fetching contest");

    let result = service
        .contest(args.lottery, args.number)
        .await
        .map_err(|e| unavailable(args.lottery, Some(args.number), e))?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        print_result(&result);
    }

    Ok(())
}

pub async fn all(args: AllArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let service = build_service(&config)?;

    let report = service.all_latest().await;
    service.flush_notifications().await;

    for (lottery, error) in &report.failed {
        eprintln!("Unavailable: {} ({})", lottery.display_name(), error);
    }

    if report.results.is_empty() {
        bail!("No results available. Try again later.");
    }

    if args.json {
        let failed: Vec<_> = report
            .failed
            .iter()
            .map(|(lottery, error)| json!({"lottery": lottery, "error": error.to_string()}))
            .collect();
        let output = json!({
            "results": report.results,
            "failed": failed,
        });
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        for (i, result) in report.results.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_result(result);
        }
    }

    Ok(())
}
