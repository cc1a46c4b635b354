use crate::config::{ChannelOrder, Config};
use crate::error::PipelineError;
use crate::frame_sampler::sampler::{stride_for, FrameSampler};
use crate::library::logger::impl_console::LoggerConsole;
use crate::video_io::impl_fake::{decode_index, FakeVideo, VideoSourceFake};
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct Fixture {
    config: Config,
    video_source: VideoSourceFake,
}

impl Fixture {
    fn new() -> Self {
        Self {
            config: Config {
                channel_order: ChannelOrder::Rgb,
                ..Config::default()
            },
            video_source: VideoSourceFake::new(),
        }
    }

    fn sampler(&self) -> FrameSampler {
        FrameSampler::new(
            &self.config,
            Arc::new(self.video_source.clone()),
            Arc::new(LoggerConsole::new(self.config.logger_timezone)),
        )
    }

    fn add_video(&self, name: &str, video: FakeVideo) -> PathBuf {
        let path = PathBuf::from(name);
        self.video_source.insert(path.clone(), video);
        path
    }
}

fn decoded_indices(sequence: &crate::frame_sampler::frame_sequence::FrameSequence) -> Vec<usize> {
    sequence
        .frames()
        .iter()
        .map(|frame| {
            let red = (frame.get(0, 0, 0) * 255.0).round() as u8;
            let green = (frame.get(0, 0, 1) * 255.0).round() as u8;
            decode_index(red, green)
        })
        .collect()
}

#[test]
fn test_stride() {
    assert_eq!(stride_for(300, 30), 10);
    assert_eq!(stride_for(59, 30), 1);
    assert_eq!(stride_for(10, 30), 1);
    assert_eq!(stride_for(0, 30), 1);
    assert_eq!(stride_for(31, 30), 1);
    assert_eq!(stride_for(90, 30), 3);
}

#[test]
fn test_300_frames_samples_every_tenth() {
    let f = Fixture::new();
    let path = f.add_video("walk.mp4", FakeVideo::new(300, 30.0, 32, 24));

    let sequence = f.sampler().sample(&path).unwrap();

    let expected: Vec<usize> = (0..30).map(|i| i * 10).collect();
    assert_eq!(sequence.len(), 30);
    assert_eq!(sequence.source_indices(), expected.as_slice());
    assert_eq!(decoded_indices(&sequence), expected);
    assert_eq!(f.video_source.seeks(), expected);
}

#[test]
fn test_frames_have_target_shape() {
    let f = Fixture::new();
    let path = f.add_video("wide.mp4", FakeVideo::new(45, 25.0, 160, 90));

    let sequence = f.sampler().sample(&path).unwrap();

    assert!(sequence.frames().iter().all(|frame| frame.shape() == (64, 64, 3)));
    assert_eq!(sequence.to_batch().shape, [1, 30, 64, 64, 3]);
}

#[test]
fn test_indices_strictly_increase_and_stay_in_bounds() {
    let f = Fixture::new();

    for total in [30, 31, 59, 61, 299, 301, 1000] {
        let path = f.add_video(&format!("clip_{}.mp4", total), FakeVideo::new(total, 30.0, 8, 8));

        let sequence = f.sampler().sample(&path).unwrap();
        let indices = sequence.source_indices();

        assert_eq!(indices.len(), 30);
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(indices.iter().all(|&index| index <= total - 1));
        assert_eq!(indices[1], stride_for(total, 30));
    }
}

#[test]
fn test_short_video_is_insufficient_without_padding() {
    let f = Fixture::new();
    let path = f.add_video("short.mp4", FakeVideo::new(10, 30.0, 8, 8));

    let result = f.sampler().sample(&path);

    assert_eq!(
        result,
        Err(PipelineError::InsufficientFrames {
            collected: 10,
            required: 30
        })
    );
    // Stops at the first unreachable frame instead of trying the rest.
    assert_eq!(f.video_source.seeks(), (0..=10).collect::<Vec<_>>());
}

#[test]
fn test_overreported_frame_count_stops_early() {
    let f = Fixture::new();
    let mut video = FakeVideo::new(300, 30.0, 8, 8);
    video.decodable_frames = 150;
    let path = f.add_video("truncated.mp4", video);

    let result = f.sampler().sample(&path);

    assert_eq!(
        result,
        Err(PipelineError::InsufficientFrames {
            collected: 15,
            required: 30
        })
    );
}

#[test]
fn test_missing_file_is_source_open_error() {
    let f = Fixture::new();

    let result = f.sampler().sample(Path::new("missing.mp4"));

    assert!(matches!(result, Err(PipelineError::SourceOpen { .. })));
}

#[test]
fn test_decode_failure_is_source_read_error() {
    let f = Fixture::new();
    let mut video = FakeVideo::new(300, 30.0, 8, 8);
    video.fail_read_at = Some(40);
    let path = f.add_video("corrupt.mp4", video);

    let result = f.sampler().sample(&path);

    assert!(matches!(
        result,
        Err(PipelineError::SourceRead { ref reason, .. }) if reason.contains("frame 40")
    ));
}

#[test]
fn test_sampling_is_repeatable() {
    let f = Fixture::new();
    let path = f.add_video("again.mp4", FakeVideo::new(120, 30.0, 16, 16));

    let first = f.sampler().sample(&path).unwrap();
    let second = f.sampler().sample(&path).unwrap();

    assert_eq!(first, second);
}
