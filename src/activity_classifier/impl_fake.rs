use crate::activity_classifier::interface::ActivityModel;
use crate::frame_sampler::frame_sequence::FrameBatch;

#[cfg(test)]
type Scorer = Box<dyn Fn(&FrameBatch) -> Vec<f32> + Send + Sync>;

enum Behavior {
    Fixed(Vec<f32>),
    #[cfg(test)]
    Computed(Scorer),
    #[cfg(test)]
    Failing(String),
}

/// Stand-in scorer for running without a model file.
pub struct ActivityModelFake {
    behavior: Behavior,
    declared_width: Option<usize>,
}

impl ActivityModelFake {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            behavior: Behavior::Fixed(scores),
            declared_width: None,
        }
    }

    #[cfg(test)]
    pub fn computed(scorer: impl Fn(&FrameBatch) -> Vec<f32> + Send + Sync + 'static) -> Self {
        Self {
            behavior: Behavior::Computed(Box::new(scorer)),
            declared_width: None,
        }
    }

    #[cfg(test)]
    pub fn failing(reason: &str) -> Self {
        Self {
            behavior: Behavior::Failing(reason.to_string()),
            declared_width: None,
        }
    }

    /// Advertise the fixed score count up front, like a loaded model would.
    pub fn with_declared_width(mut self) -> Self {
        if let Behavior::Fixed(scores) = &self.behavior {
            self.declared_width = Some(scores.len());
        }
        self
    }
}

impl ActivityModel for ActivityModelFake {
    fn score(
        &self,
        _batch: &FrameBatch,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        match &self.behavior {
            Behavior::Fixed(scores) => Ok(scores.clone()),
            #[cfg(test)]
            Behavior::Computed(scorer) => Ok(scorer(_batch)),
            #[cfg(test)]
            Behavior::Failing(reason) => Err(reason.clone().into()),
        }
    }

    fn output_width(&self) -> Option<usize> {
        self.declared_width
    }
}
