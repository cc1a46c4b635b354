use crate::activity_classifier::classifier::ActivityClassifier;
use crate::activity_classifier::interface::{ActivityModel, ClassificationResult};
use crate::caption_renderer::interface::CaptionRenderer;
use crate::config::Config;
use crate::error::PipelineError;
use crate::frame_sampler::sampler::FrameSampler;
use crate::library::logger::interface::Logger;
use crate::pipeline::core::{init, transition, State};
use crate::video_annotator::annotator::{AnnotatedVideo, VideoAnnotator};
use crate::video_io::interface::{VideoSink, VideoSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timings {
    pub sampling: Duration,
    pub inference: Duration,
    pub annotation: Duration,
}

impl Timings {
    pub fn total(&self) -> Duration {
        self.sampling + self.inference + self.annotation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Classified {
        result: ClassificationResult,
        annotated: AnnotatedVideo,
        timings: Timings,
    },
    /// No classification and no output video were produced.
    TooShort { collected: usize, required: usize },
}

impl PipelineOutcome {
    pub fn label(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Classified { result, .. } => Some(&result.predicted_class),
            PipelineOutcome::TooShort { .. } => None,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            PipelineOutcome::Classified { result, .. } => result.confidence,
            PipelineOutcome::TooShort { .. } => 0.0,
        }
    }
}

pub(super) struct Run<'a> {
    pub video_path: &'a Path,
    pub output_path: &'a Path,
    pub timings: Timings,
}

pub struct Pipeline {
    pub(super) logger: Arc<dyn Logger + Send + Sync>,
    pub(super) frame_sampler: FrameSampler,
    pub(super) activity_classifier: ActivityClassifier,
    pub(super) video_annotator: VideoAnnotator,
}

impl Pipeline {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        video_source: Arc<dyn VideoSource + Send + Sync>,
        video_sink: Arc<dyn VideoSink + Send + Sync>,
        caption_renderer: Arc<dyn CaptionRenderer + Send + Sync>,
        model: Arc<dyn ActivityModel>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let logger = logger.with_namespace("pipeline");

        Ok(Self {
            frame_sampler: FrameSampler::new(&config, video_source.clone(), logger.clone()),
            activity_classifier: ActivityClassifier::new(&config, model, logger.clone())?,
            video_annotator: VideoAnnotator::new(
                &config,
                video_source,
                video_sink,
                caption_renderer,
                logger.clone(),
            ),
            logger,
        })
    }

    /// Samples, classifies and annotates one video. Blocks until done.
    pub fn run(&self, video_path: &Path, output_path: &Path) -> Result<PipelineOutcome, PipelineError> {
        let mut run = Run {
            video_path,
            output_path,
            timings: Timings::default(),
        };

        let (mut state, mut effects) = init();

        while let Some(effect) = effects.pop() {
            let _ = self.logger.info(&format!(
                "state: {}, running effect: {}",
                state.name(),
                effect.to_display_string()
            ));

            let event = self.run_effect(effect, &mut run);

            let _ = self
                .logger
                .info(&format!("event: {}", event.to_display_string()));

            let (new_state, new_effects) = transition(state, event);
            state = new_state;
            effects.extend(new_effects);
        }

        let _ = self.logger.info(&format!("finished in state: {}", state.name()));

        match state {
            State::Done { result, annotated } => Ok(PipelineOutcome::Classified {
                result,
                annotated,
                timings: run.timings,
            }),
            State::TooShort {
                collected,
                required,
            } => Ok(PipelineOutcome::TooShort {
                collected,
                required,
            }),
            State::Failed { error } => {
                let _ = self.logger.error(&error.to_string());
                Err(error)
            }
            state => Err(PipelineError::UnexpectedEvent {
                state: state.name(),
                event: "end_of_effects",
            }),
        }
    }

    pub fn default_output_path(output_dir: &Path, unix_seconds: i64) -> PathBuf {
        output_dir.join(format!("output_{}.avi", unix_seconds))
    }
}
