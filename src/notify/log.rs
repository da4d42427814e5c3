use super::*;
use tracing::{info, warn};

/// Writes notifications to the log
#[derive(Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn new_shared() -> SharedNotifier {
        Arc::new(Self::new())
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        let template = notification.template.as_str();
        let message = notification.render();
        match notification.severity {
            Severity::Urgent => warn!(template, "{message}"),
            Severity::Info => info!(template, "{message}"),
        }
        Ok(())
    }
}
