//! Output module for crawl notifications and reports
//!
//! This module handles:
//! - Status and progress notifications while a run is in progress
//! - Writing the JSON report of a finished run
//! - Printing run statistics for the command line

mod notify;
mod report;
pub mod stats;

pub use notify::{ChannelNotifier, NoopNotifier, Notifier, NotifyEvent, Progress, TracingNotifier};
pub use report::{write_report, OutputError, OutputResult, PageRecord, Report, ReportStats};
pub use stats::print_statistics;
