use crate::alerter::interface::Alerter;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::pipeline::main::{Pipeline, PipelineOutcome};
use crate::prediction_log::interface::{ActivityStats, PredictionLog, PredictionRecord};
use chrono::{DateTime, FixedOffset};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One prediction request end to end: the pipeline run, then the history
/// entry and any alert for it.
pub struct App {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    pipeline: Pipeline,
    prediction_log: Option<Arc<dyn PredictionLog>>,
    alerter: Arc<dyn Alerter>,
}

impl App {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        pipeline: Pipeline,
        prediction_log: Option<Arc<dyn PredictionLog>>,
        alerter: Arc<dyn Alerter>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("app"),
            pipeline,
            prediction_log,
            alerter,
        }
    }

    pub fn output_path_for(&self, output: Option<&Path>, now: DateTime<FixedOffset>) -> PathBuf {
        match output {
            Some(path) => path.to_path_buf(),
            None => Pipeline::default_output_path(&self.config.output_dir, now.timestamp()),
        }
    }

    /// Alert and history failures are logged but do not fail the request;
    /// the annotated video already exists by then.
    pub fn predict(
        &self,
        video_path: &Path,
        output: Option<&Path>,
        now: DateTime<FixedOffset>,
    ) -> Result<PipelineOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let output_path = self.output_path_for(output, now);

        let outcome = self.pipeline.run(video_path, &output_path)?;

        let result = match &outcome {
            PipelineOutcome::Classified { result, .. } => result,
            PipelineOutcome::TooShort { .. } => {
                let _ = self.logger.info("video too short, nothing logged");
                return Ok(outcome);
            }
        };

        if self.config.is_alert_label(&result.predicted_class) {
            if let Err(e) = self.alerter.alert(&result.predicted_class, result.confidence) {
                let _ = self.logger.error(&format!("failed to send alert: {}", e));
            }
        }

        if let Some(prediction_log) = &self.prediction_log {
            if let Err(e) = prediction_log.append(&PredictionRecord::new(now, result)) {
                let _ = self
                    .logger
                    .error(&format!("failed to append prediction log: {}", e));
            }
        }

        Ok(outcome)
    }
}

pub fn render_outcome(outcome: &PipelineOutcome) -> String {
    match outcome {
        PipelineOutcome::Classified {
            result,
            annotated,
            timings,
        } => {
            let total = timings.total().as_secs_f64();
            let fps = if total > 0.0 { 1.0 / total } else { 0.0 };
            format!(
                "Detected activity: {} with {:.2}% confidence\n\
                 Annotated video: {} ({} frames)\n\
                 Sampling time (s): {:.2}\n\
                 Inference time (s): {:.2}\n\
                 Annotation time (s): {:.2}\n\
                 FPS: {:.2}",
                result.predicted_class.to_uppercase(),
                result.confidence * 100.0,
                annotated.path.display(),
                annotated.frames_written,
                timings.sampling.as_secs_f64(),
                timings.inference.as_secs_f64(),
                timings.annotation.as_secs_f64(),
                fps
            )
        }
        PipelineOutcome::TooShort {
            collected,
            required,
        } => format!(
            "Video too short for prediction: {} of {} frames readable. Please provide a longer video.",
            collected, required
        ),
    }
}

pub fn render_logs(records: &[PredictionRecord]) -> String {
    if records.is_empty() {
        return "No logs found.".to_string();
    }

    let mut lines = vec![format!(
        "{:<10}  {:<8}  {:<12}  {}",
        "Date", "Time", "Activity", "Confidence"
    )];
    lines.extend(records.iter().map(|r| {
        format!(
            "{:<10}  {:<8}  {:<12}  {:.4}",
            r.date.format("%Y-%m-%d"),
            r.time.format("%H:%M:%S"),
            r.activity,
            r.confidence
        )
    }));
    lines.join("\n")
}

pub fn render_stats(stats: &[ActivityStats]) -> String {
    if stats.is_empty() {
        return "No logs to show yet.".to_string();
    }

    let mut lines = vec![format!(
        "{:<12}  {:>5}  {:>6}  {:>6}  {:>6}",
        "Activity", "Count", "Mean", "Min", "Max"
    )];
    lines.extend(stats.iter().map(|s| {
        format!(
            "{:<12}  {:>5}  {:>6.4}  {:>6.4}  {:>6.4}",
            s.activity, s.count, s.mean_confidence, s.min_confidence, s.max_confidence
        )
    }));
    lines.join("\n")
}
