//! URL handling module for Site-Harvest
//!
//! This module provides link normalization, domain extraction and the
//! filter policy that decides which discovered URLs stay in the crawl.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{domain_of, extract_domain};
pub use filter::{should_filter, FilterPolicy};
pub use normalize::{normalize, normalize_absolute};
