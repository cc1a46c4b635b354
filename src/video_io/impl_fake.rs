use crate::video_io::interface::{
    VideoProperties, VideoReader, VideoSink, VideoSource, VideoWriter,
};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FakeContent {
    /// Frame `i` is filled with `[i % 256, i / 256, 0]` so tests can tell
    /// which source frame ended up where.
    IndexEncoded,
    /// Seeded per-frame noise.
    Noise { seed: u64 },
}

#[derive(Debug, Clone)]
pub struct FakeVideo {
    pub properties: VideoProperties,
    /// Frames actually decodable; may differ from `properties.frame_count`.
    pub decodable_frames: usize,
    pub content: FakeContent,
    pub fail_read_at: Option<usize>,
}

impl FakeVideo {
    pub fn new(frame_count: usize, fps: f64, width: u32, height: u32) -> Self {
        Self {
            properties: VideoProperties {
                frame_count,
                fps,
                width,
                height,
            },
            decodable_frames: frame_count,
            content: FakeContent::IndexEncoded,
            fail_read_at: None,
        }
    }

    pub fn with_content(mut self, content: FakeContent) -> Self {
        self.content = content;
        self
    }

    pub fn frame(&self, index: usize) -> RgbImage {
        let (width, height) = (self.properties.width, self.properties.height);
        match self.content {
            FakeContent::IndexEncoded => RgbImage::from_pixel(
                width,
                height,
                Rgb([(index % 256) as u8, (index / 256) as u8, 0]),
            ),
            FakeContent::Noise { seed } => {
                let mut rng = StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37));
                let mut buffer = vec![0u8; (width * height * 3) as usize];
                rng.fill(buffer.as_mut_slice());
                RgbImage::from_raw(width, height, buffer)
                    .unwrap_or_else(|| RgbImage::new(width, height))
            }
        }
    }
}

/// Decodes the source index back out of an `IndexEncoded` pixel.
pub fn decode_index(red: u8, green: u8) -> usize {
    green as usize * 256 + red as usize
}

#[derive(Clone, Default)]
pub struct VideoSourceFake {
    videos: Arc<Mutex<HashMap<PathBuf, FakeVideo>>>,
    seeks: Arc<Mutex<Vec<usize>>>,
    opens: Arc<Mutex<usize>>,
}

impl VideoSourceFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, video: FakeVideo) {
        self.videos.lock().unwrap().insert(path.into(), video);
    }

    pub fn seeks(&self) -> Vec<usize> {
        self.seeks.lock().unwrap().clone()
    }

    pub fn opens(&self) -> usize {
        *self.opens.lock().unwrap()
    }
}

impl VideoSource for VideoSourceFake {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoReader>, Box<dyn Error + Send + Sync>> {
        let video = self
            .videos
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or("no such file")?;

        *self.opens.lock().unwrap() += 1;

        Ok(Box::new(VideoReaderFake {
            video,
            position: 0,
            seeks: self.seeks.clone(),
        }))
    }
}

struct VideoReaderFake {
    video: FakeVideo,
    position: usize,
    seeks: Arc<Mutex<Vec<usize>>>,
}

impl VideoReader for VideoReaderFake {
    fn properties(&self) -> VideoProperties {
        self.video.properties
    }

    fn seek(&mut self, frame_index: usize) -> Result<bool, Box<dyn Error + Send + Sync>> {
        self.seeks.lock().unwrap().push(frame_index);
        self.position = frame_index;
        Ok(frame_index < self.video.decodable_frames)
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>, Box<dyn Error + Send + Sync>> {
        if self.video.fail_read_at == Some(self.position) {
            return Err(format!("corrupt packet at frame {}", self.position).into());
        }

        if self.position >= self.video.decodable_frames {
            return Ok(None);
        }

        let frame = self.video.frame(self.position);
        self.position += 1;
        Ok(Some(frame))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordedVideo {
    pub properties: Option<VideoProperties>,
    pub frames: Vec<RgbImage>,
    pub finished: bool,
}

#[derive(Clone, Default)]
pub struct VideoSinkFake {
    outputs: Arc<Mutex<HashMap<PathBuf, RecordedVideo>>>,
    fail_write_at: Option<usize>,
}

impl VideoSinkFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(frame_index: usize) -> Self {
        Self {
            fail_write_at: Some(frame_index),
            ..Self::default()
        }
    }

    pub fn output(&self, path: &Path) -> Option<RecordedVideo> {
        self.outputs.lock().unwrap().get(path).cloned()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.lock().unwrap().len()
    }
}

impl VideoSink for VideoSinkFake {
    fn create(
        &self,
        path: &Path,
        properties: &VideoProperties,
    ) -> Result<Box<dyn VideoWriter>, Box<dyn Error + Send + Sync>> {
        self.outputs.lock().unwrap().insert(
            path.to_path_buf(),
            RecordedVideo {
                properties: Some(*properties),
                ..RecordedVideo::default()
            },
        );

        Ok(Box::new(VideoWriterFake {
            path: path.to_path_buf(),
            outputs: self.outputs.clone(),
            fail_write_at: self.fail_write_at,
            written: 0,
        }))
    }
}

struct VideoWriterFake {
    path: PathBuf,
    outputs: Arc<Mutex<HashMap<PathBuf, RecordedVideo>>>,
    fail_write_at: Option<usize>,
    written: usize,
}

impl VideoWriter for VideoWriterFake {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.fail_write_at == Some(self.written) {
            return Err("disk full".into());
        }

        let mut outputs = self.outputs.lock().unwrap();
        let recorded = outputs.entry(self.path.clone()).or_default();
        recorded.frames.push(frame.clone());
        self.written += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut outputs = self.outputs.lock().unwrap();
        outputs.entry(self.path.clone()).or_default().finished = true;
        Ok(())
    }

    fn discard(self: Box<Self>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.outputs.lock().unwrap().remove(&self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_encoding_round_trips_past_255() {
        let video = FakeVideo::new(400, 30.0, 4, 4);

        let pixel = *video.frame(290).get_pixel(0, 0);

        assert_eq!(decode_index(pixel[0], pixel[1]), 290);
    }

    #[test]
    fn test_noise_is_deterministic_per_frame() {
        let video = FakeVideo::new(10, 30.0, 8, 8).with_content(FakeContent::Noise { seed: 7 });

        assert_eq!(video.frame(3), video.frame(3));
        assert_ne!(video.frame(3), video.frame(4));
    }

    #[test]
    fn test_reader_stops_at_decodable_frames() {
        let source = VideoSourceFake::new();
        source.insert("clip.mp4", FakeVideo::new(2, 30.0, 4, 4));

        let mut reader = source.open(Path::new("clip.mp4")).unwrap();

        assert!(reader.read_frame().unwrap().is_some());
        assert!(reader.read_frame().unwrap().is_some());
        assert!(reader.read_frame().unwrap().is_none());
        assert!(!reader.seek(2).unwrap());
    }
}
