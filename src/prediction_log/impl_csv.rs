use crate::prediction_log::interface::{PredictionLog, PredictionRecord};
use chrono::{NaiveDate, NaiveTime};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

const HEADER: [&str; 4] = ["Date", "Time", "Activity", "Confidence"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// `Date,Time,Activity,Confidence` rows in a single CSV file.
pub struct PredictionLogCsv {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PredictionLogCsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

impl PredictionLog for PredictionLogCsv {
    fn append(&self, record: &PredictionRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| "prediction log lock poisoned")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_new {
            writer.write_record(HEADER)?;
        }

        writer.write_record([
            record.date.format(DATE_FORMAT).to_string(),
            record.time.format(TIME_FORMAT).to_string(),
            record.activity.clone(),
            record.confidence.to_string(),
        ])?;
        writer.flush()?;

        Ok(())
    }

    fn records(&self) -> Result<Vec<PredictionRecord>, Box<dyn std::error::Error + Send + Sync>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();

        for (index, result) in reader.records().enumerate() {
            // +1 for the header, +1 for 1-based lines
            let line = index + 2;
            let row = result.map_err(|e| format!("line {}: {}", line, e))?;

            if row.len() < HEADER.len() {
                return Err(format!(
                    "line {}: expected {} columns, found {}",
                    line,
                    HEADER.len(),
                    row.len()
                )
                .into());
            }

            let date = NaiveDate::parse_from_str(&row[0], DATE_FORMAT)
                .map_err(|e| format!("line {}: invalid date: {}", line, e))?;
            let time = NaiveTime::parse_from_str(&row[1], TIME_FORMAT)
                .map_err(|e| format!("line {}: invalid time: {}", line, e))?;
            let confidence: f32 = row[3]
                .parse()
                .map_err(|e| format!("line {}: invalid confidence: {}", line, e))?;

            records.push(PredictionRecord {
                date,
                time,
                activity: row[2].to_string(),
                confidence,
            });
        }

        Ok(records)
    }
}
