//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunState`: lifecycle of the engine (idle, running, completed, stopped, failed)
//! - `RunStatistics`: per-run counters and timestamps

mod run_state;
mod statistics;

// Re-export main types
pub use run_state::RunState;
pub use statistics::RunStatistics;
