use crate::config::{ChannelOrder, Config};
use crate::error::PipelineError;
use crate::frame_sampler::frame_sequence::{FrameSequence, FrameTensor};
use crate::library::logger::interface::Logger;
use crate::video_io::interface::VideoSource;
use std::path::Path;
use std::sync::Arc;

/// Spacing between sampled frames so the samples span the whole clip.
pub fn stride_for(total_frames: usize, sequence_length: usize) -> usize {
    (total_frames / sequence_length.max(1)).max(1)
}

pub struct FrameSampler {
    sequence_length: usize,
    height: u32,
    width: u32,
    channel_order: ChannelOrder,
    video_source: Arc<dyn VideoSource + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FrameSampler {
    pub fn new(
        config: &Config,
        video_source: Arc<dyn VideoSource + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            sequence_length: config.sequence_length,
            height: config.image_height,
            width: config.image_width,
            channel_order: config.channel_order,
            video_source,
            logger: logger.with_namespace("frame_sampler"),
        }
    }

    /// Reads `sequence_length` evenly spaced frames. Stops at the first frame
    /// that cannot be reached; a short clip is never padded or wrapped.
    pub fn sample(&self, path: &Path) -> Result<FrameSequence, PipelineError> {
        let mut reader = self
            .video_source
            .open(path)
            .map_err(|e| PipelineError::SourceOpen {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let read_error = |e: Box<dyn std::error::Error + Send + Sync>| PipelineError::SourceRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let properties = reader.properties();
        let stride = stride_for(properties.frame_count, self.sequence_length);

        let _ = self.logger.info(&format!(
            "Sampling {} frames from {} ({} frames @ {:.2} fps, stride {})",
            self.sequence_length,
            path.display(),
            properties.frame_count,
            properties.fps,
            stride
        ));

        let mut frames = Vec::with_capacity(self.sequence_length);
        let mut source_indices = Vec::with_capacity(self.sequence_length);

        for i in 0..self.sequence_length {
            let frame_index = i * stride;

            if !reader.seek(frame_index).map_err(read_error)? {
                break;
            }

            let Some(image) = reader.read_frame().map_err(read_error)? else {
                break;
            };

            frames.push(FrameTensor::from_image(
                &image,
                self.height,
                self.width,
                self.channel_order,
            ));
            source_indices.push(frame_index);
        }

        drop(reader);

        if frames.len() < self.sequence_length {
            let _ = self.logger.info(&format!(
                "Only {} of {} frames readable",
                frames.len(),
                self.sequence_length
            ));
        }

        FrameSequence::new(frames, source_indices, self.sequence_length)
    }
}
