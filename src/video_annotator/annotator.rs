use crate::caption_renderer::interface::CaptionRenderer;
use crate::config::{CaptionStyle, Config};
use crate::error::PipelineError;
use crate::library::logger::interface::Logger;
use crate::video_io::interface::{VideoProperties, VideoSink, VideoSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The written output. Same geometry, rate and frame count as its source.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedVideo {
    pub path: PathBuf,
    pub properties: VideoProperties,
    pub frames_written: usize,
}

pub struct VideoAnnotator {
    caption: CaptionStyle,
    video_source: Arc<dyn VideoSource + Send + Sync>,
    video_sink: Arc<dyn VideoSink + Send + Sync>,
    caption_renderer: Arc<dyn CaptionRenderer + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl VideoAnnotator {
    pub fn new(
        config: &Config,
        video_source: Arc<dyn VideoSource + Send + Sync>,
        video_sink: Arc<dyn VideoSink + Send + Sync>,
        caption_renderer: Arc<dyn CaptionRenderer + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            caption: config.caption.clone(),
            video_source,
            video_sink,
            caption_renderer,
            logger: logger.with_namespace("annotator"),
        }
    }

    /// Re-reads every frame of `source`, stamps `label` on it and streams it to
    /// `output`. One frame is held at a time.
    pub fn annotate(
        &self,
        source: &Path,
        output: &Path,
        label: &str,
    ) -> Result<AnnotatedVideo, PipelineError> {
        let mut reader = self
            .video_source
            .open(source)
            .map_err(|e| PipelineError::SourceOpen {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;

        let read_error = |reason: String| PipelineError::SourceRead {
            path: source.to_path_buf(),
            reason,
        };
        let write_error = |reason: String| PipelineError::OutputWrite {
            path: output.to_path_buf(),
            reason,
            classification: None,
        };

        let properties = reader.properties();
        if !(properties.fps.is_finite() && properties.fps > 0.0) {
            return Err(read_error(format!(
                "source reports no usable frame rate ({})",
                properties.fps
            )));
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        let mut writer = self
            .video_sink
            .create(output, &properties)
            .map_err(|e| write_error(e.to_string()))?;

        let text = self.caption.text_for(label);

        let mut stream = || -> Result<usize, PipelineError> {
            let mut frames_written = 0;

            while let Some(mut frame) = reader.read_frame().map_err(|e| read_error(e.to_string()))? {
                if frame.dimensions() != (properties.width, properties.height) {
                    return Err(read_error(format!(
                        "frame {} is {}x{}, stream declares {}x{}",
                        frames_written,
                        frame.width(),
                        frame.height(),
                        properties.width,
                        properties.height
                    )));
                }

                self.caption_renderer
                    .render(&mut frame, &text, &self.caption)
                    .map_err(|e| write_error(e.to_string()))?;

                writer
                    .write_frame(&frame)
                    .map_err(|e| write_error(e.to_string()))?;

                frames_written += 1;
            }

            Ok(frames_written)
        };

        let frames_written = match stream() {
            Ok(frames_written) => frames_written,
            Err(error) => {
                drop(reader);
                // A truncated file is never handed back as output.
                if let Err(e) = writer.discard() {
                    let _ = self.logger.error(&format!(
                        "failed to remove partial output {}: {}",
                        output.display(),
                        e
                    ));
                }
                return Err(error);
            }
        };

        drop(reader);
        writer.finish().map_err(|e| write_error(e.to_string()))?;

        if properties.frame_count != 0 && properties.frame_count != frames_written {
            let _ = self.logger.info(&format!(
                "{} reported {} frames, {} decoded",
                source.display(),
                properties.frame_count,
                frames_written
            ));
        }

        let _ = self.logger.info(&format!(
            "Wrote {} frames to {} ({}x{} @ {:.2} fps)",
            frames_written,
            output.display(),
            properties.width,
            properties.height,
            properties.fps
        ));

        Ok(AnnotatedVideo {
            path: output.to_path_buf(),
            properties,
            frames_written,
        })
    }
}
