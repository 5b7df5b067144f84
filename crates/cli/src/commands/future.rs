//! Future command - projected upcoming contests

use anyhow::{Context, Result, bail};
use loterias_domain::usecases::future::weekday_name;
use loterias_domain::usecases::project_range;
use std::path::PathBuf;

use super::output::format_brl;
use super::{build_service, unavailable};
use crate::args::FutureArgs;
use crate::config::AppConfig;

pub async fn execute(args: FutureArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let service = build_service(&config)?;
    let count = args.count.unwrap_or(config.site.future_pages);

    let fetched = service.latest(args.lottery).await;
    service.flush_notifications().await;
    let latest = fetched.map_err(|e| unavailable(args.lottery, None, e))?;

    let projections = project_range(&latest, count);
    if projections.is_empty() && count > 0 {
        bail!(
            "Cannot project {} contests: latest result has no usable contest date",
            latest.name
        );
    }

    if args.json {
        let json =
            serde_json::to_string_pretty(&projections).context("Failed to serialize output")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "{} - upcoming contests (projected, not drawn)",
        latest.lottery.display_name()
    );
    println!("=============================================");
    for projection in &projections {
        let weekday = projection
            .contest_date_parsed()
            .map(|date| weekday_name(date.weekday()))
            .unwrap_or_default();
        let estimate = projection
            .jackpot()
            .map(|tier| tier.prize_amount)
            .unwrap_or_default();
        println!(
            "  - Contest {} on {} ({}): estimated {}",
            projection.contest_number,
            projection.contest_date,
            weekday,
            format_brl(estimate)
        );
    }

    Ok(())
}
