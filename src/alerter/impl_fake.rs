use crate::alerter::interface::Alerter;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct AlerterFake {
    alerts: Arc<Mutex<Vec<(String, f32)>>>,
}

impl AlerterFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<(String, f32)> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Alerter for AlerterFake {
    fn alert(&self, activity: &str, confidence: f32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.alerts
            .lock()
            .unwrap()
            .push((activity.to_string(), confidence));
        Ok(())
    }
}
