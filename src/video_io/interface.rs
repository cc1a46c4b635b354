use image::RgbImage;
use std::error::Error;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProperties {
    /// As reported by the container. May be 0 when the container does not say.
    pub frame_count: usize,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
}

/// One read pass over a video. Dropping the reader releases the handle.
pub trait VideoReader {
    fn properties(&self) -> VideoProperties;

    /// Positions the reader so the next `read_frame` yields `frame_index`.
    /// `Ok(false)` means the position cannot be reached.
    fn seek(&mut self, frame_index: usize) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// `Ok(None)` once the stream is exhausted.
    fn read_frame(&mut self) -> Result<Option<RgbImage>, Box<dyn Error + Send + Sync>>;
}

pub trait VideoSource {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoReader>, Box<dyn Error + Send + Sync>>;
}

pub trait VideoWriter {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flushes and closes the output. The file is only complete after this.
    fn finish(self: Box<Self>) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Closes the output and removes whatever was written so far.
    fn discard(self: Box<Self>) -> Result<(), Box<dyn Error + Send + Sync>>;
}

pub trait VideoSink {
    fn create(
        &self,
        path: &Path,
        properties: &VideoProperties,
    ) -> Result<Box<dyn VideoWriter>, Box<dyn Error + Send + Sync>>;
}
