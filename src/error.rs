use crate::activity_classifier::interface::ClassificationResult;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a single pipeline run can fail. None of these are retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Video too short: {collected} frames readable, {required} required")]
    InsufficientFrames { collected: usize, required: usize },

    #[error("Failed to open video source {}: {reason}", path.display())]
    SourceOpen { path: PathBuf, reason: String },

    #[error("Failed to read video source {}: {reason}", path.display())]
    SourceRead { path: PathBuf, reason: String },

    #[error("Model inference failed: {reason}")]
    ModelInference { reason: String },

    #[error("Failed to write annotated video {}: {reason}", path.display())]
    OutputWrite {
        path: PathBuf,
        reason: String,
        /// Set when classification finished before the write failed.
        classification: Option<ClassificationResult>,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Pipeline received {event} while {state}")]
    UnexpectedEvent {
        state: &'static str,
        event: &'static str,
    },
}

impl PipelineError {
    pub fn with_classification(self, result: ClassificationResult) -> Self {
        match self {
            PipelineError::OutputWrite { path, reason, .. } => PipelineError::OutputWrite {
                path,
                reason,
                classification: Some(result),
            },
            other => other,
        }
    }
}
