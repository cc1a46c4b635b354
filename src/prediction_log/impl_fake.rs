use crate::prediction_log::interface::{PredictionLog, PredictionRecord};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct PredictionLogFake {
    records: Arc<Mutex<Vec<PredictionRecord>>>,
}

impl PredictionLogFake {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PredictionLog for PredictionLogFake {
    fn append(&self, record: &PredictionRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn records(&self) -> Result<Vec<PredictionRecord>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.records.lock().unwrap().clone())
    }
}
