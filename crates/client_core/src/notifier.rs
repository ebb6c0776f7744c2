//! Transient user-facing messages raised by screen controllers.

use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_failure(&self, message: &str);
}

/// Publishes every toast on a broadcast channel. Toasts raised while nobody
/// is subscribed are dropped.
pub struct BroadcastNotifier {
    toasts: broadcast::Sender<Toast>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (toasts, _) = broadcast::channel(capacity);
        Self { toasts }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.toasts.subscribe()
    }

    fn publish(&self, level: ToastLevel, message: &str) {
        let _ = self.toasts.send(Toast {
            level,
            message: message.to_string(),
        });
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify_success(&self, message: &str) {
        info!(toast = message, "success");
        self.publish(ToastLevel::Success, message);
    }

    fn notify_failure(&self, message: &str) {
        warn!(toast = message, "failure");
        self.publish(ToastLevel::Failure, message);
    }
}
