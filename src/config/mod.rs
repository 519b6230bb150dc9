//! Configuration module for Site-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and turning them into [`CrawlSettings`] for the engine.
//!
//! # Example
//!
//! ```no_run
//! use site_harvest::config::{load_config, CrawlSettings};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! let settings = CrawlSettings::from_config(&config).unwrap();
//! println!("Crawling domain: {}", settings.domain());
//! ```

mod parser;
mod settings;
mod types;
mod validation;

// Re-export types
pub use settings::{AssetSettings, CrawlSettings, DEFAULT_USER_AGENT};
pub use types::{AssetConfig, Config, CrawlerConfig, FilterConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{compile_patterns, MAX_REQUEST_DELAY_SECS};
