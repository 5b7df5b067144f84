//! Command implementations and shared wiring

pub mod config;
pub mod future;
pub mod normalize;
mod output;
pub mod results;
pub mod seo;

use anyhow::{Context, Result, bail};
use loterias_adapters::result_api::ResponseCache;
use loterias_adapters::{
    FanoutNotifier, IndexNowNotifier, ResultsApiClient, StubResultSource, WebhookNotifier,
};
use loterias_domain::usecases::ResultService;
use loterias_domain::{FetchError, IndexNotifier, LotteryId, ResultSource, SiteInfo, SystemClock};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;

pub(crate) type Service = ResultService<dyn ResultSource>;

pub(crate) fn build_source(config: &AppConfig) -> Result<Arc<dyn ResultSource>> {
    match config.api.provider.as_str() {
        "stub" => Ok(Arc::new(StubResultSource::new())),
        "http" => {
            let token = load_secret(&config.api.token_env, "results API")?;
            let cache = ResponseCache::new(
                Duration::from_millis(config.api.cache_ttl_ms),
                Arc::new(SystemClock),
            );
            Ok(Arc::new(ResultsApiClient::new(
                config.api.hosts(),
                token,
                config.api.retry_policy(),
                cache,
            )))
        }
        other => bail!("Unknown API provider: {}", other),
    }
}

pub(crate) fn build_notifier(
    config: &AppConfig,
    site: &SiteInfo,
) -> Result<Option<Arc<dyn IndexNotifier>>> {
    let mut notifiers: Vec<Arc<dyn IndexNotifier>> = Vec::new();

    if config.site.indexnow_enabled {
        let key = load_secret(&config.site.indexnow_key_env, "IndexNow")?;
        let mut notifier = IndexNowNotifier::with_endpoint(
            config.site.indexnow_endpoint.clone(),
            site.host(),
            key,
        );
        if let Some(location) = &config.site.indexnow_key_location {
            notifier = notifier.with_key_location(location.clone());
        }
        notifiers.push(Arc::new(notifier));
    }

    if let Some(url) = config
        .site
        .indexing_webhook_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    {
        notifiers.push(Arc::new(WebhookNotifier::new(url.to_string())));
    }

    Ok(match notifiers.len() {
        0 => None,
        1 => notifiers.pop(),
        _ => Some(Arc::new(FanoutNotifier::new(notifiers))),
    })
}

pub(crate) fn build_service(config: &AppConfig) -> Result<Service> {
    let site = SiteInfo::new(config.site.base_url.clone());
    let source = build_source(config)?;
    let notifier = build_notifier(config, &site)?;

    let service = ResultService::new(source, site);
    Ok(match notifier {
        Some(notifier) => service.with_notifier(notifier),
        None => service,
    })
}

pub(crate) fn load_secret(env_var: &str, purpose: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No env var configured for the {} credential", purpose);
    }

    let value = std::env::var(env_var)
        .with_context(|| format!("Missing env var {} for the {} credential", env_var, purpose))?;

    if value.trim().is_empty() {
        bail!("Env var {} for the {} credential is empty", env_var, purpose);
    }

    Ok(SecretString::new(value.into()))
}

/// Turn a failed fetch into the user-facing "not available" error
pub(crate) fn unavailable(
    lottery: LotteryId,
    contest: Option<u32>,
    error: FetchError,
) -> anyhow::Error {
    if let FetchError::Config(message) = &error {
        return anyhow::anyhow!("Configuration error: {}", message);
    }

    tracing::warn!(lottery = %lottery, error = %error, "Result unavailable");
    match contest {
        Some(contest) => anyhow::anyhow!(
            "Result not found for {} contest {}. Try again later.",
            lottery.display_name(),
            contest
        ),
        None => anyhow::anyhow!(
            "Result not found for {}. Try again later.",
            lottery.display_name()
        ),
    }
}
