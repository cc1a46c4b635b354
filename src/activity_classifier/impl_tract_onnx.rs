use crate::activity_classifier::interface::ActivityModel;
use crate::frame_sampler::frame_sequence::FrameBatch;
use std::path::Path;
use tract_onnx::prelude::*;

/// Runs an ONNX export of the sequence classifier on CPU.
pub struct ActivityModelTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    input_shape: [usize; 5],
    output_width: Option<usize>,
}

impl ActivityModelTractOnnx {
    /// `input_shape` is `[1, sequence_length, height, width, channels]`.
    pub fn new(
        model_path: &Path,
        input_shape: [usize; 5],
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let model = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(0, f32::fact(input_shape).into())?
            .into_optimized()?
            .into_runnable()?;

        let output_width = model
            .model()
            .output_fact(0)?
            .shape
            .as_concrete()
            .and_then(|shape| shape.last().copied());

        Ok(Self {
            model,
            input_shape,
            output_width,
        })
    }
}

impl ActivityModel for ActivityModelTractOnnx {
    fn score(
        &self,
        batch: &FrameBatch,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        if batch.shape != self.input_shape {
            return Err(format!(
                "model expects input {:?}, got {:?}",
                self.input_shape, batch.shape
            )
            .into());
        }

        let input = Tensor::from_shape::<f32>(&batch.shape, &batch.data)?;
        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs[0].to_array_view::<f32>()?;

        // Batch of one: the scores are the flattened output.
        Ok(output.iter().copied().collect())
    }

    fn output_width(&self) -> Option<usize> {
        self.output_width
    }
}
