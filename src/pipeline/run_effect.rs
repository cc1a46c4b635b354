use super::core::{Effect, Event};
use super::main::{Pipeline, Run};
use std::time::Instant;

impl Pipeline {
    pub(super) fn run_effect(&self, effect: Effect, run: &mut Run<'_>) -> Event {
        let started = Instant::now();

        match effect {
            Effect::SampleFrames => {
                let sampled = self.frame_sampler.sample(run.video_path);
                run.timings.sampling = started.elapsed();
                Event::SampleDone(sampled)
            }
            Effect::ClassifyFrames { frames } => {
                let classified = self.activity_classifier.classify(&frames);
                run.timings.inference = started.elapsed();
                Event::ClassifyDone(classified)
            }
            Effect::AnnotateVideo { label } => {
                let annotated =
                    self.video_annotator
                        .annotate(run.video_path, run.output_path, &label);
                run.timings.annotation = started.elapsed();
                Event::AnnotateDone(annotated)
            }
        }
    }
}
