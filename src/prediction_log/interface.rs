use crate::activity_classifier::interface::ClassificationResult;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Timelike};
use std::collections::HashMap;

/// One row of the prediction history.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub date: NaiveDate,
    /// Whole seconds.
    pub time: NaiveTime,
    pub activity: String,
    pub confidence: f32,
}

impl PredictionRecord {
    pub fn new(at: DateTime<FixedOffset>, result: &ClassificationResult) -> Self {
        let time = at.time();
        Self {
            date: at.date_naive(),
            time: time.with_nanosecond(0).unwrap_or(time),
            activity: result.predicted_class.clone(),
            confidence: result.confidence,
        }
    }
}

/// Append-only history of classified runs.
pub trait PredictionLog: Send + Sync {
    fn append(&self, record: &PredictionRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Oldest first.
    fn records(&self) -> Result<Vec<PredictionRecord>, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityStats {
    pub activity: String,
    pub count: usize,
    pub mean_confidence: f32,
    pub min_confidence: f32,
    pub max_confidence: f32,
}

/// Per-activity totals, most frequent first. Ties are broken by name.
pub fn summarize(records: &[PredictionRecord]) -> Vec<ActivityStats> {
    let mut by_activity: HashMap<&str, Vec<f32>> = HashMap::new();
    for record in records {
        by_activity
            .entry(record.activity.as_str())
            .or_default()
            .push(record.confidence);
    }

    let mut stats: Vec<ActivityStats> = by_activity
        .into_iter()
        .map(|(activity, confidences)| {
            let count = confidences.len();
            let sum: f32 = confidences.iter().sum();
            ActivityStats {
                activity: activity.to_string(),
                count,
                mean_confidence: sum / count as f32,
                min_confidence: confidences.iter().copied().fold(f32::INFINITY, f32::min),
                max_confidence: confidences
                    .iter()
                    .copied()
                    .fold(f32::NEG_INFINITY, f32::max),
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.activity.cmp(&b.activity))
    });

    stats
}
