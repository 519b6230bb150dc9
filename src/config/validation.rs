use crate::config::types::{AssetConfig, Config, CrawlerConfig, OutputConfig};
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use url::Url;

/// Longest accepted pause between requests (seconds)
pub const MAX_REQUEST_DELAY_SECS: f64 = 3600.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_asset_config(&config.assets)?;
    compile_patterns(&config.filters.include_patterns)?;
    compile_patterns(&config.filters.exclude_patterns)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if !config.request_delay.is_finite() || config.request_delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "request_delay must be a non-negative number of seconds, got {}",
            config.request_delay
        )));
    }

    if config.request_delay > MAX_REQUEST_DELAY_SECS {
        return Err(ConfigError::Validation(format!(
            "request_delay must be at most {}s, got {}s",
            MAX_REQUEST_DELAY_SECS, config.request_delay
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if let Some(webdriver) = &config.webdriver_url {
        Url::parse(webdriver)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if matches!(&config.report_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates asset directories
fn validate_asset_config(config: &AssetConfig) -> ConfigResult<()> {
    for (name, dir) in [
        ("images_dir", &config.images_dir),
        ("css_dir", &config.css_dir),
        ("js_dir", &config.js_dir),
    ] {
        if matches!(dir, Some(d) if d.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{} cannot be empty when set",
                name
            )));
        }
    }

    Ok(())
}

/// Compiles a list of URL patterns, failing on the first invalid one
pub fn compile_patterns(patterns: &[String]) -> ConfigResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(base_url: &str) -> Config {
        Config {
            crawler: CrawlerConfig {
                base_url: base_url.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_base_url() {
        assert!(validate(&config_for("https://example.com/")).is_ok());
        assert!(validate(&config_for("http://127.0.0.1:8080")).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            validate(&config_for("not a url")),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate(&config_for("ftp://example.com/")),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let mut config = config_for("https://example.com/");
        config.crawler.request_delay = -0.5;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        config.crawler.request_delay = f64::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_huge_delay_rejected() {
        let mut config = config_for("https://example.com/");
        config.crawler.request_delay = 1e20;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        config.crawler.request_delay = MAX_REQUEST_DELAY_SECS;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = config_for("https://example.com/");
        config.crawler.request_timeout = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut config = config_for("https://example.com/");
        config.filters.exclude_patterns = vec!["(unclosed".to_string()];
        match validate(&config) {
            Err(ConfigError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_patterns() {
        let compiled = compile_patterns(&[".*blog.*".to_string(), "^https://".to_string()])
            .unwrap();
        assert_eq!(compiled.len(), 2);
        assert!(compiled[0].is_match("https://example.com/blog/post"));
    }

    #[test]
    fn test_empty_asset_dir_rejected() {
        let mut config = config_for("https://example.com/");
        config.assets.css_dir = Some(String::new());
        assert!(validate(&config).is_err());
    }
}
