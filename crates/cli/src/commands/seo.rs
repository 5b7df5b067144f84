//! SEO commands - sitemap.xml and robots.txt

use anyhow::{Context, Result, bail};
use loterias_domain::SiteInfo;
use loterias_domain::usecases::project_range;
use loterias_domain::usecases::seo::{robots_txt, sitemap_entries, sitemap_xml};
use std::fs;
use std::path::PathBuf;

use super::build_service;
use crate::args::SitemapArgs;
use crate::config::AppConfig;

pub async fn sitemap(args: SitemapArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let service = build_service(&config)?;

    let report = service.all_latest().await;
    service.flush_notifications().await;

    for (lottery, error) in &report.failed {
        tracing::warn!(lottery = %lottery, error = %error, "Lottery left out of sitemap");
    }
    if report.results.is_empty() {
        bail!("No results available for the sitemap. Try again later.");
    }

    let projections: Vec<_> = report
        .results
        .iter()
        .flat_map(|latest| project_range(latest, config.site.future_pages))
        .collect();

    let entries = sitemap_entries(service.site(), &report.results, &projections);
    let xml = sitemap_xml(&entries);

    match args.output {
        Some(path) => {
            fs::write(&path, xml)
                .with_context(|| format!("Failed to write sitemap: {}", path.display()))?;
            println!("Wrote {} URLs to {}", entries.len(), path.display());
        }
        None => print!("{}", xml),
    }

    Ok(())
}

pub async fn robots(config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let site = SiteInfo::new(config.site.base_url);
    print!("{}", robots_txt(&site));
    Ok(())
}
