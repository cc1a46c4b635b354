use crate::caption_renderer::interface::CaptionRenderer;
use crate::config::CaptionStyle;
use image::{Rgb, RgbImage};
use std::sync::{Arc, Mutex};

/// Paints the pixel at the caption origin and remembers every text it drew.
#[derive(Clone, Default)]
pub struct CaptionRendererFake {
    texts: Arc<Mutex<Vec<String>>>,
}

impl CaptionRendererFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

impl CaptionRenderer for CaptionRendererFake {
    fn render(
        &self,
        frame: &mut RgbImage,
        text: &str,
        style: &CaptionStyle,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (x, y) = (style.origin.0.max(0) as u32, style.origin.1.max(0) as u32);
        if x < frame.width() && y < frame.height() {
            frame.put_pixel(x, y, Rgb(style.color));
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
