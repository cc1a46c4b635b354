use crate::error::PipelineError;
use chrono::{Offset, Utc};
use std::collections::HashSet;
use std::path::PathBuf;

/// Channel order of the tensor handed to the model. Decoders yield BGR, and
/// the shipped model was trained on frames fed straight from the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChannelOrder {
    #[default]
    Bgr,
    Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    pub prefix: String,
    /// Baseline-left corner of the text, in source pixels.
    pub origin: (i32, i32),
    pub scale: f64,
    /// RGB.
    pub color: [u8; 3],
    pub thickness: i32,
}

impl CaptionStyle {
    pub fn text_for(&self, label: &str) -> String {
        format!("{}{}", self.prefix, label)
    }
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            prefix: "Prediction: ".to_string(),
            origin: (10, 30),
            scale: 1.0,
            color: [255, 0, 0],
            thickness: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sequence_length: usize,
    pub image_height: u32,
    pub image_width: u32,
    pub channel_order: ChannelOrder,
    /// Positional: index `i` names model output `i`.
    pub class_labels: Vec<String>,
    pub alert_labels: Vec<String>,
    pub caption: CaptionStyle,
    pub model_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_path: PathBuf,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sequence_length: 30,
            image_height: 64,
            image_width: 64,
            channel_order: ChannelOrder::Bgr,
            class_labels: vec![
                "walking".to_string(),
                "fight".to_string(),
                "running".to_string(),
            ],
            alert_labels: vec!["fight".to_string()],
            caption: CaptionStyle::default(),
            model_path: PathBuf::from("model/suspicious_activity_lrcn.onnx"),
            output_dir: PathBuf::from("output_videos"),
            log_path: PathBuf::from("prediction_logs.csv"),
            logger_timezone: Utc.fix(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.sequence_length == 0 {
            return Err(PipelineError::Configuration(
                "sequence_length must be positive".to_string(),
            ));
        }

        if self.image_height == 0 || self.image_width == 0 {
            return Err(PipelineError::Configuration(format!(
                "target size must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }

        if self.class_labels.is_empty() {
            return Err(PipelineError::Configuration(
                "class_labels must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for label in &self.class_labels {
            if !seen.insert(label.as_str()) {
                return Err(PipelineError::Configuration(format!(
                    "duplicate class label '{}'",
                    label
                )));
            }
        }

        if let Some(unknown) = self
            .alert_labels
            .iter()
            .find(|label| !seen.contains(label.as_str()))
        {
            return Err(PipelineError::Configuration(format!(
                "alert label '{}' is not a class label",
                unknown
            )));
        }

        Ok(())
    }

    pub fn is_alert_label(&self, label: &str) -> bool {
        self.alert_labels.iter().any(|alert| alert == label)
    }

    /// `[1, sequence_length, height, width, channels]`
    pub fn batch_shape(&self) -> [usize; 5] {
        [
            1,
            self.sequence_length,
            self.image_height as usize,
            self.image_width as usize,
            3,
        ]
    }
}
