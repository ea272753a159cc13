use crate::config::types::{Config, OutputConfig, ScraperConfig, SiteConfig, Source, UserAgentConfig};
use crate::crawler::MarkupSchema;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Smallest delay accepted between requests to the same site (milliseconds)
const MIN_DELAY_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_site_config(&config.site)?;
    validate_sources(&config.sources)?;
    MarkupSchema::from_config(&config.markup)?;
    Ok(())
}

/// Validates pacing and limits
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.page_delay_ms < MIN_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "page_delay_ms must be >= {}ms, got {}ms",
            MIN_DELAY_MS, config.page_delay_ms
        )));
    }

    if config.source_delay_ms < MIN_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "source_delay_ms must be >= {}ms, got {}ms",
            MIN_DELAY_MS, config.source_delay_ms
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_pages_per_source < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_source must be >= 1, got {}",
            config.max_pages_per_source
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "dataset_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if let Some(root) = &config.root_url {
        validate_http_url(root, "root_url")?;
    }

    if !config.post_id_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "post_id_prefix must start with '/', got '{}'",
            config.post_id_prefix
        )));
    }

    Ok(())
}

/// Validates the roster: ids are positive and unique, URLs parse.
///
/// Repeated names or blog URLs under different ids are accepted as-is.
fn validate_sources(sources: &[Source]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[source]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for source in sources {
        if source.id == 0 {
            return Err(ConfigError::Validation(format!(
                "source id must be a positive integer (source '{}')",
                source.name
            )));
        }

        if !seen.insert(source.id) {
            return Err(ConfigError::DuplicateSource(source.id));
        }

        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source {} must have a name",
                source.id
            )));
        }

        validate_http_url(&source.blog_url, &format!("blog_url of source {}", source.id))?;

        if let Some(avatar) = &source.avatar_url {
            Url::parse(avatar).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "Invalid avatar_url '{}' of source {}: {}",
                    avatar, source.id, e
                ))
            })?;
        }
    }

    Ok(())
}

fn validate_http_url(raw: &str, what: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", what, raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            what, raw
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
