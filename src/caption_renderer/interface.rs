use crate::config::CaptionStyle;
use image::RgbImage;

/// Burns a line of text into a frame in place.
pub trait CaptionRenderer {
    fn render(
        &self,
        frame: &mut RgbImage,
        text: &str,
        style: &CaptionStyle,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
