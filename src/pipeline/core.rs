use crate::activity_classifier::interface::ClassificationResult;
use crate::error::PipelineError;
use crate::frame_sampler::frame_sequence::FrameSequence;
use crate::video_annotator::annotator::AnnotatedVideo;

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Sampling,
    Classifying,
    Annotating {
        result: ClassificationResult,
    },
    Done {
        result: ClassificationResult,
        annotated: AnnotatedVideo,
    },
    TooShort {
        collected: usize,
        required: usize,
    },
    Failed {
        error: PipelineError,
    },
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Sampling => "sampling",
            State::Classifying => "classifying",
            State::Annotating { .. } => "annotating",
            State::Done { .. } => "done",
            State::TooShort { .. } => "too_short",
            State::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            State::Done { .. } | State::TooShort { .. } | State::Failed { .. }
        )
    }
}

#[derive(Debug)]
pub enum Event {
    SampleDone(Result<FrameSequence, PipelineError>),
    ClassifyDone(Result<ClassificationResult, PipelineError>),
    AnnotateDone(Result<AnnotatedVideo, PipelineError>),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SampleDone(_) => "sample_done",
            Event::ClassifyDone(_) => "classify_done",
            Event::AnnotateDone(_) => "annotate_done",
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            Event::SampleDone(Ok(frames)) => {
                format!("SampleDone(Ok({} frames at {:?}))", frames.len(), frames.source_indices())
            }
            event => format!("{:?}", event),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SampleFrames,
    ClassifyFrames { frames: FrameSequence },
    AnnotateVideo { label: String },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::ClassifyFrames { frames } => {
                format!("ClassifyFrames {{ {} frames }}", frames.len())
            }
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (State::Sampling, vec![Effect::SampleFrames])
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match (state, event) {
        (State::Sampling, Event::SampleDone(Ok(frames))) => {
            (State::Classifying, vec![Effect::ClassifyFrames { frames }])
        }
        (
            State::Sampling,
            Event::SampleDone(Err(PipelineError::InsufficientFrames {
                collected,
                required,
            })),
        ) => (
            State::TooShort {
                collected,
                required,
            },
            vec![],
        ),
        (State::Classifying, Event::ClassifyDone(Ok(result))) => {
            let label = result.predicted_class.clone();
            (
                State::Annotating { result },
                vec![Effect::AnnotateVideo { label }],
            )
        }
        (State::Annotating { result }, Event::AnnotateDone(Ok(annotated))) => {
            (State::Done { result, annotated }, vec![])
        }
        (State::Annotating { result }, Event::AnnotateDone(Err(error))) => (
            State::Failed {
                error: error.with_classification(result),
            },
            vec![],
        ),
        (State::Sampling, Event::SampleDone(Err(error)))
        | (State::Classifying, Event::ClassifyDone(Err(error))) => {
            (State::Failed { error }, vec![])
        }

        // Terminal states absorb anything.
        (state, _) if state.is_terminal() => (state, vec![]),

        (state, event) => (
            State::Failed {
                error: PipelineError::UnexpectedEvent {
                    state: state.name(),
                    event: event.name(),
                },
            },
            vec![],
        ),
    }
}
