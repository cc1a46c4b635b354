use crate::caption_renderer::interface::CaptionRenderer;
use crate::config::CaptionStyle;
use crate::video_io::impl_opencv::{mat_to_rgb, rgb_to_mat};
use image::RgbImage;
use opencv::core::{Point, Scalar};
use opencv::imgproc;

/// Hershey simplex text, the same face the labels have always been drawn in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptionRendererOpenCv;

impl CaptionRenderer for CaptionRendererOpenCv {
    fn render(
        &self,
        frame: &mut RgbImage,
        text: &str,
        style: &CaptionStyle,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut mat = rgb_to_mat(frame)?;
        let [r, g, b] = style.color;

        imgproc::put_text(
            &mut mat,
            text,
            Point::new(style.origin.0, style.origin.1),
            imgproc::FONT_HERSHEY_SIMPLEX,
            style.scale,
            Scalar::new(b as f64, g as f64, r as f64, 0.0),
            style.thickness,
            imgproc::LINE_8,
            false,
        )?;

        *frame = mat_to_rgb(&mat)?;
        Ok(())
    }
}
