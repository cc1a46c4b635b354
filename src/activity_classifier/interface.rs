use crate::frame_sampler::frame_sequence::FrameBatch;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub predicted_class: String,
    pub class_index: usize,
    /// Raw model score of the predicted class, not renormalized.
    pub confidence: f32,
}

/// An opaque sequence classifier: one score per class, in class-label order.
///
/// Implementations must be safe to call from several pipelines at once.
pub trait ActivityModel: Send + Sync {
    fn score(&self, batch: &FrameBatch) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>>;

    /// Number of scores the model produces, when it can tell before running.
    fn output_width(&self) -> Option<usize> {
        None
    }
}
