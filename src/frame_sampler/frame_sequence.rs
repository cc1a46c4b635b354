use crate::config::ChannelOrder;
use crate::error::PipelineError;
use image::{Rgb, RgbImage};

pub const CHANNELS: usize = 3;

/// One frame resized to the model's input size, values in `[0, 1]`,
/// laid out height x width x channel.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTensor {
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl FrameTensor {
    pub fn from_image(image: &RgbImage, height: u32, width: u32, order: ChannelOrder) -> Self {
        let resized = resize_linear(image, width, height);

        let mut data = Vec::with_capacity((height * width) as usize * CHANNELS);
        for pixel in resized.pixels() {
            let [r, g, b] = pixel.0;
            let ordered = match order {
                ChannelOrder::Bgr => [b, g, r],
                ChannelOrder::Rgb => [r, g, b],
            };
            data.extend(ordered.iter().map(|&value| value as f32 / 255.0));
        }

        Self {
            height: height as usize,
            width: width as usize,
            data,
        }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, CHANNELS)
    }

    #[cfg(test)]
    pub fn get(&self, y: usize, x: usize, channel: usize) -> f32 {
        self.data[(y * self.width + x) * CHANNELS + channel]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Source taps for one destination coordinate: `(low, high, weight of high)`.
/// Pixel centres are aligned, `src = (dst + 0.5) * scale - 0.5`, and the
/// result is clamped to the edge.
fn linear_taps(dst: u32, src_len: u32, dst_len: u32) -> (u32, u32, f64) {
    let scale = src_len as f64 / dst_len as f64;
    let position = (dst as f64 + 0.5) * scale - 0.5;
    let low = position.floor();

    if low < 0.0 {
        return (0, 0, 0.0);
    }

    let low = low as u32;
    if low + 1 >= src_len {
        return (src_len - 1, src_len - 1, 0.0);
    }

    (low, low + 1, position - low as f64)
}

/// Two-tap bilinear resize, sampling the same source pixels OpenCV's
/// `INTER_LINEAR` does. No area averaging when shrinking.
pub fn resize_linear(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_width, src_height) = image.dimensions();
    if src_width == 0 || src_height == 0 {
        return RgbImage::new(width, height);
    }
    if (src_width, src_height) == (width, height) {
        return image.clone();
    }

    let columns: Vec<_> = (0..width)
        .map(|x| linear_taps(x, src_width, width))
        .collect();
    let rows: Vec<_> = (0..height)
        .map(|y| linear_taps(y, src_height, height))
        .collect();

    RgbImage::from_fn(width, height, |x, y| {
        let (x0, x1, wx) = columns[x as usize];
        let (y0, y1, wy) = rows[y as usize];

        let mut pixel = [0u8; 3];
        for (channel, value) in pixel.iter_mut().enumerate() {
            let sample = |sx: u32, sy: u32| image.get_pixel(sx, sy).0[channel] as f64;
            let top = sample(x0, y0) * (1.0 - wx) + sample(x1, y0) * wx;
            let bottom = sample(x0, y1) * (1.0 - wx) + sample(x1, y1) * wx;
            *value = (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0) as u8;
        }
        Rgb(pixel)
    })
}

/// Exactly `sequence_length` frames, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    frames: Vec<FrameTensor>,
    source_indices: Vec<usize>,
}

impl FrameSequence {
    /// Refuses anything shorter than `required`; the model takes a fixed-length input.
    pub fn new(
        frames: Vec<FrameTensor>,
        source_indices: Vec<usize>,
        required: usize,
    ) -> Result<Self, PipelineError> {
        if frames.len() < required {
            return Err(PipelineError::InsufficientFrames {
                collected: frames.len(),
                required,
            });
        }

        Ok(Self {
            frames,
            source_indices,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[cfg(test)]
    pub fn frames(&self) -> &[FrameTensor] {
        &self.frames
    }

    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    /// Stacks the frames into a batch of one: `[1, len, height, width, channels]`.
    pub fn to_batch(&self) -> FrameBatch {
        let (height, width, channels) = self
            .frames
            .first()
            .map(FrameTensor::shape)
            .unwrap_or((0, 0, CHANNELS));

        let mut data = Vec::with_capacity(self.len() * height * width * channels);
        for frame in &self.frames {
            data.extend_from_slice(frame.as_slice());
        }

        FrameBatch {
            shape: [1, self.len(), height, width, channels],
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBatch {
    pub shape: [usize; 5],
    pub data: Vec<f32>,
}
