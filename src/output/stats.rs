//! Terminal summary of a finished run

use crate::state::{RunState, RunStatistics};
use crate::storage::AssetKind;

/// Prints run statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `state` - Final state of the run
/// * `stats` - The statistics to display
/// * `total_urls` - Number of visited URLs
pub fn print_statistics(state: RunState, stats: &RunStatistics, total_urls: usize) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  State: {}", state);
    if let Some(started) = stats.started_at {
        println!("  Started: {}", started.to_rfc3339());
    }
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    println!("  Duration: {:.2}s", stats.duration_seconds());
    println!();

    println!("Pages:");
    println!("  URLs visited: {}", total_urls);
    println!("  Successful: {}", stats.successful);
    println!("  Failed: {}", stats.failed);
    println!("  Filtered links: {}", stats.filtered);
    println!();

    let downloads: Vec<_> = AssetKind::ALL
        .iter()
        .map(|kind| (*kind, stats.downloads(*kind)))
        .filter(|(_, count)| *count > 0)
        .collect();
    if !downloads.is_empty() {
        println!("Downloads:");
        for (kind, count) in downloads {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully scraped)",
        success_rate(stats),
        stats.successful,
        stats.total_processed
    );
}

/// Share of processed URLs that were scraped successfully, in percent
pub fn success_rate(stats: &RunStatistics) -> f64 {
    if stats.total_processed > 0 {
        (stats.successful as f64 / stats.total_processed as f64) * 100.0
    } else {
        0.0
    }
}
