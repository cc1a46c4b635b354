use crate::video_io::interface::{
    VideoProperties, VideoReader, VideoSink, VideoSource, VideoWriter,
};
use image::RgbImage;
use opencv::core::{Mat, Scalar, Size, CV_8UC3};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Decoded frames come out of OpenCV as BGR; everything past this module is RGB.
pub fn mat_to_rgb(mat: &Mat) -> Result<RgbImage, Box<dyn Error + Send + Sync>> {
    if mat.typ() != CV_8UC3 {
        return Err(format!("unsupported frame type {}", mat.typ()).into());
    }

    let owned;
    let mat = if mat.is_continuous() {
        mat
    } else {
        owned = mat.try_clone()?;
        &owned
    };

    let bgr = mat.data_bytes()?;
    let mut rgb = Vec::with_capacity(bgr.len());
    for pixel in bgr.chunks_exact(3) {
        rgb.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
    }

    let image = RgbImage::from_raw(mat.cols() as u32, mat.rows() as u32, rgb)
        .ok_or("frame buffer does not match frame size")?;

    Ok(image)
}

pub fn rgb_to_mat(image: &RgbImage) -> Result<Mat, Box<dyn Error + Send + Sync>> {
    let mut mat = Mat::new_rows_cols_with_default(
        image.height() as i32,
        image.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;

    let bgr = mat.data_bytes_mut()?;
    for (dst, src) in bgr.chunks_exact_mut(3).zip(image.as_raw().chunks_exact(3)) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
    }

    Ok(mat)
}

fn path_str(path: &Path) -> Result<&str, Box<dyn Error + Send + Sync>> {
    let path = path.to_str().ok_or("path is not valid UTF-8")?;
    Ok(path)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VideoSourceOpenCv;

impl VideoSource for VideoSourceOpenCv {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoReader>, Box<dyn Error + Send + Sync>> {
        let capture = VideoCapture::from_file(path_str(path)?, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err("could not be decoded".into());
        }

        let properties = VideoProperties {
            frame_count: capture.get(videoio::CAP_PROP_FRAME_COUNT)?.max(0.0) as usize,
            fps: capture.get(videoio::CAP_PROP_FPS)?,
            width: capture.get(videoio::CAP_PROP_FRAME_WIDTH)?.max(0.0) as u32,
            height: capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?.max(0.0) as u32,
        };

        Ok(Box::new(VideoReaderOpenCv {
            capture,
            properties,
            frame: Mat::default(),
        }))
    }
}

struct VideoReaderOpenCv {
    capture: VideoCapture,
    properties: VideoProperties,
    frame: Mat,
}

impl VideoReader for VideoReaderOpenCv {
    fn properties(&self) -> VideoProperties {
        self.properties
    }

    fn seek(&mut self, frame_index: usize) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let positioned = self
            .capture
            .set(videoio::CAP_PROP_POS_FRAMES, frame_index as f64)?;
        Ok(positioned)
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>, Box<dyn Error + Send + Sync>> {
        if !self.capture.read(&mut self.frame)? || self.frame.empty() {
            return Ok(None);
        }

        Ok(Some(mat_to_rgb(&self.frame)?))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VideoSinkOpenCv {
    fourcc: [char; 4],
}

impl VideoSinkOpenCv {
    pub fn new(fourcc: [char; 4]) -> Self {
        Self { fourcc }
    }
}

impl Default for VideoSinkOpenCv {
    fn default() -> Self {
        Self::new(['X', 'V', 'I', 'D'])
    }
}

impl VideoSink for VideoSinkOpenCv {
    fn create(
        &self,
        path: &Path,
        properties: &VideoProperties,
    ) -> Result<Box<dyn VideoWriter>, Box<dyn Error + Send + Sync>> {
        let [c1, c2, c3, c4] = self.fourcc;
        let fourcc = videoio::VideoWriter::fourcc(c1, c2, c3, c4)?;

        let writer = videoio::VideoWriter::new(
            path_str(path)?,
            fourcc,
            properties.fps,
            Size::new(properties.width as i32, properties.height as i32),
            true,
        )?;

        if !writer.is_opened()? {
            return Err(format!(
                "encoder {}{}{}{} refused the output",
                c1, c2, c3, c4
            )
            .into());
        }

        Ok(Box::new(VideoWriterOpenCv {
            writer,
            path: path.to_path_buf(),
        }))
    }
}

struct VideoWriterOpenCv {
    writer: videoio::VideoWriter,
    path: PathBuf,
}

impl VideoWriter for VideoWriterOpenCv {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mat = rgb_to_mat(frame)?;
        self.writer.write(&mat)?;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.writer.release()?;
        Ok(())
    }

    fn discard(mut self: Box<Self>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.writer.release()?;
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
