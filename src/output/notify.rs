//! Status and progress notifications
//!
//! The engine reports human-readable status lines and progress ticks to a
//! [`Notifier`]. Calls are synchronous and must not block.

use tokio::sync::mpsc;

/// One progress tick: `percent` of `total` known URLs, `done` processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(percent: u8, done: usize, total: usize) -> Self {
        Self {
            percent,
            done,
            total,
        }
    }
}

/// Observer for crawl status and progress
pub trait Notifier: Send + Sync {
    fn on_status(&self, message: &str);

    fn on_progress(&self, progress: Progress);
}

/// Logs notifications through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn on_status(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn on_progress(&self, progress: Progress) {
        tracing::debug!(
            "Progress: {}% ({}/{})",
            progress.percent,
            progress.done,
            progress.total
        );
    }
}

/// Discards all notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn on_status(&self, _message: &str) {}

    fn on_progress(&self, _progress: Progress) {}
}

/// A notification forwarded by [`ChannelNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    Status(String),
    Progress(Progress),
}

/// Forwards notifications over an unbounded channel
///
/// Sends never wait; once the receiver is dropped, events are discarded.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<NotifyEvent>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotifyEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn on_status(&self, message: &str) {
        let _ = self.sender.send(NotifyEvent::Status(message.to_string()));
    }

    fn on_progress(&self, progress: Progress) {
        let _ = self.sender.send(NotifyEvent::Progress(progress));
    }
}
