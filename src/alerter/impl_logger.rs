use crate::alerter::interface::{alert_message, Alerter};
use crate::library::logger::interface::Logger;
use std::sync::Arc;

/// Raises alerts as error-level log lines.
pub struct AlerterLogger {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl AlerterLogger {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("alert"),
        }
    }
}

impl Alerter for AlerterLogger {
    fn alert(&self, activity: &str, confidence: f32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.error(&alert_message(activity, confidence))
    }
}
