use crate::activity_classifier::interface::{ActivityModel, ClassificationResult};
use crate::config::Config;
use crate::error::PipelineError;
use crate::frame_sampler::frame_sequence::FrameSequence;
use crate::library::logger::interface::Logger;
use std::sync::Arc;

pub struct ActivityClassifier {
    class_labels: Vec<String>,
    batch_shape: [usize; 5],
    model: Arc<dyn ActivityModel>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ActivityClassifier {
    pub fn new(
        config: &Config,
        model: Arc<dyn ActivityModel>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, PipelineError> {
        if let Some(width) = model.output_width() {
            check_width(width, config.class_labels.len())?;
        }

        Ok(Self {
            class_labels: config.class_labels.clone(),
            batch_shape: config.batch_shape(),
            model,
            logger: logger.with_namespace("classifier"),
        })
    }

    pub fn classify(&self, sequence: &FrameSequence) -> Result<ClassificationResult, PipelineError> {
        let batch = sequence.to_batch();
        if batch.shape != self.batch_shape {
            return Err(PipelineError::ModelInference {
                reason: format!(
                    "batch shape {:?} does not match model input {:?}",
                    batch.shape, self.batch_shape
                ),
            });
        }

        let scores = self
            .model
            .score(&batch)
            .map_err(|e| PipelineError::ModelInference {
                reason: e.to_string(),
            })?;

        check_width(scores.len(), self.class_labels.len())?;

        let (class_index, confidence) = argmax(&scores).ok_or_else(|| {
            PipelineError::ModelInference {
                reason: format!("model produced non-finite scores {:?}", scores),
            }
        })?;

        let result = ClassificationResult {
            predicted_class: self.class_labels[class_index].clone(),
            class_index,
            confidence,
        };

        let _ = self.logger.info(&format!(
            "scores {:?} -> {} ({:.4})",
            scores, result.predicted_class, result.confidence
        ));

        Ok(result)
    }
}

fn check_width(width: usize, labels: usize) -> Result<(), PipelineError> {
    if width != labels {
        return Err(PipelineError::Configuration(format!(
            "model produces {} scores but {} class labels are configured",
            width, labels
        )));
    }
    Ok(())
}

/// First index of the largest score. `None` when any score is NaN or the slice is empty.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    if scores.iter().any(|score| score.is_nan()) {
        return None;
    }

    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((index, score)),
        })
}
