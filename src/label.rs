//! Renders short strings into small transparent PNGs, for score and slot
//! labels that the client turns into sprite textures.
//!
//! Glyphs come from the bundled DejaVu Sans face and are rasterized with
//! `ab_glyph`. The text baseline sits on the bottom edge of the image.

use std::{io::Cursor, sync::OnceLock};

use ab_glyph::{point, Font, FontRef, InvalidFont, PxScale, ScaleFont};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};
use log::{debug, trace};
use thiserror::Error;

static DEFAULT_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

const FOREGROUND: [u8; 3] = [0xff, 0xff, 0xff];

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("label must be at least 1x1 pixels, got {width}x{font_size}")]
    InvalidDimensions { width: u32, font_size: u32 },
    #[error("font face is unavailable: {0}")]
    RenderingUnavailable(String),
    #[error(transparent)]
    Encode(#[from] image::ImageError),
}

impl From<InvalidFont> for LabelError {
    fn from(value: InvalidFont) -> Self {
        Self::RenderingUnavailable(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequest {
    pub text: String,
    pub width: u32,
    /// Font size in points. Also the height of the image in pixels.
    pub font_size: u32,
    pub center: bool,
}

impl LabelRequest {
    pub fn new(text: impl Into<String>, width: u32, font_size: u32) -> Self {
        Self {
            text: text.into(),
            width,
            font_size,
            center: false,
        }
    }

    pub fn centered(mut self, center: bool) -> Self {
        self.center = center;
        self
    }
}

#[derive(Debug, Clone)]
pub struct LabelImage {
    pixels: RgbaImage,
}

impl LabelImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn to_png(&self) -> Result<Vec<u8>, LabelError> {
        let mut buf = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }

    /// Encodes the label as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> Result<String, LabelError> {
        let png = self.to_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

/// Renders labels with a single parsed font face.
#[derive(Clone)]
pub struct LabelRenderer<'a> {
    font: FontRef<'a>,
}

impl<'a> LabelRenderer<'a> {
    pub fn from_font_bytes(data: &'a [u8]) -> Result<Self, LabelError> {
        let font = FontRef::try_from_slice(data)?;
        Ok(Self { font })
    }

    /// `font_size` in CSS points. `PxScale` is relative to the face's line
    /// height rather than its em square, so convert through both.
    fn scale(&self, font_size: u32) -> PxScale {
        let px_per_em = font_size as f32 * 96.0 / 72.0;
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(px_per_em * self.font.height_unscaled() / units_per_em)
    }

    /// Width in pixels of `text` set at `font_size` points.
    pub fn measure_text(&self, text: &str, font_size: u32) -> f32 {
        let font = self.font.as_scaled(self.scale(font_size));
        let width: f64 = text
            .chars()
            .map(|c| font.h_advance(font.glyph_id(c)) as f64)
            .sum();
        width as f32
    }

    pub fn render(&self, request: &LabelRequest) -> Result<LabelImage, LabelError> {
        let LabelRequest {
            ref text,
            width,
            font_size,
            center,
        } = *request;
        if width == 0 || font_size == 0 {
            return Err(LabelError::InvalidDimensions { width, font_size });
        }

        let scale = self.scale(font_size);
        let font = self.font.as_scaled(scale);
        let mut x = 0.0;
        if center {
            let text_width = self.measure_text(text, font_size);
            x = width as f32 / 2.0 - text_width / 2.0;
        }
        debug!("rendering {text:?} into {width}x{font_size} at x = {x}");

        let (w, h) = (width as i64, font_size as i64);
        let mut coverage = vec![0.0f32; (width * font_size) as usize];
        for c in text.chars() {
            let id = font.glyph_id(c);
            let glyph = id.with_scale_and_position(scale, point(x, font_size as f32));
            x += font.h_advance(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                trace!("no outline for {c:?}");
                continue;
            };
            let bounds = outlined.px_bounds();
            let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);
            outlined.draw(|gx, gy, cov| {
                let (px, py) = (left + gx as i64, top + gy as i64);
                if (0..w).contains(&px) && (0..h).contains(&py) {
                    coverage[(py * w + px) as usize] += cov;
                }
            });
        }

        let [r, g, b] = FOREGROUND;
        let pixels = RgbaImage::from_fn(width, font_size, |px, py| {
            let cov = coverage[(py * width + px) as usize].clamp(0.0, 1.0);
            Rgba([r, g, b, (cov * 255.0).round() as u8])
        });

        Ok(LabelImage { pixels })
    }
}

fn default_renderer() -> Result<&'static LabelRenderer<'static>, LabelError> {
    static RENDERER: OnceLock<Result<LabelRenderer<'static>, InvalidFont>> = OnceLock::new();
    RENDERER
        .get_or_init(|| FontRef::try_from_slice(DEFAULT_FONT).map(|font| LabelRenderer { font }))
        .as_ref()
        .map_err(|e| LabelError::RenderingUnavailable(e.to_string()))
}

/// Renders `request` with the bundled sans-serif face.
pub fn render_label(request: &LabelRequest) -> Result<LabelImage, LabelError> {
    default_renderer()?.render(request)
}

/// Measures `text` with the bundled sans-serif face.
pub fn measure_text(text: &str, font_size: u32) -> Result<f32, LabelError> {
    Ok(default_renderer()?.measure_text(text, font_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Alpha-weighted mean x of the drawn pixels, in pixel-center coordinates.
    fn ink_midpoint(image: &LabelImage) -> f32 {
        let (mut sum, mut total) = (0.0, 0.0);
        for (x, _, px) in image.pixels().enumerate_pixels() {
            let alpha = px.0[3] as f32;
            sum += (x as f32 + 0.5) * alpha;
            total += alpha;
        }
        assert!(total > 0.0, "label has no ink");
        sum / total
    }

    fn decode_data_url(url: &str) -> image::DynamicImage {
        let payload = url
            .strip_prefix("data:image/png;base64,")
            .expect("not a png data url");
        let png = STANDARD.decode(payload).unwrap();
        image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap()
    }

    #[test]
    fn data_url_decodes_to_requested_size() {
        let label = render_label(&LabelRequest::new("Score", 200, 24)).unwrap();
        assert_eq!((label.width(), label.height()), (200, 24));

        let decoded = decode_data_url(&label.to_data_url().unwrap());
        assert_eq!((decoded.width(), decoded.height()), (200, 24));
    }

    #[test]
    fn centering_moves_text_to_the_middle() {
        let left = render_label(&LabelRequest::new("A", 100, 20)).unwrap();
        let centered = render_label(&LabelRequest::new("A", 100, 20).centered(true)).unwrap();

        let left_mid = ink_midpoint(&left);
        let centered_mid = ink_midpoint(&centered);
        assert!((centered_mid - 50.0).abs() < (left_mid - 50.0).abs());
        assert!((centered_mid - 50.0).abs() < 3.0, "midpoint at {centered_mid}");
    }

    #[test]
    fn left_aligned_text_starts_near_the_edge() {
        let label = render_label(&LabelRequest::new("Score", 120, 16)).unwrap();
        let first_ink = label
            .pixels()
            .enumerate_pixels()
            .filter(|(_, _, px)| px.0[3] > 0)
            .map(|(x, _, _)| x)
            .min()
            .unwrap();
        assert!(first_ink < 5, "first ink at column {first_ink}");
    }

    #[test]
    fn only_draws_white() {
        let label = render_label(&LabelRequest::new("Plinko!", 150, 18)).unwrap();
        assert!(label
            .pixels()
            .pixels()
            .all(|px| px.0[3] == 0 || px.0[..3] == FOREGROUND));
        assert!(label.pixels().pixels().any(|px| px.0[3] == 255));
    }

    #[test]
    fn empty_text_is_transparent() {
        let label = render_label(&LabelRequest::new("", 40, 12).centered(true)).unwrap();
        assert!(label.pixels().pixels().all(|px| px.0[3] == 0));
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            render_label(&LabelRequest::new("x", 0, 12)),
            Err(LabelError::InvalidDimensions { width: 0, font_size: 12 })
        ));
        assert!(matches!(
            render_label(&LabelRequest::new("x", 12, 0)),
            Err(LabelError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn overflowing_text_is_clipped() {
        let text = "remaining disks: 5";
        let request = LabelRequest::new(text, 30, 20).centered(true);
        assert!(measure_text(text, 20).unwrap() > 30.0);

        let label = render_label(&request).unwrap();
        assert_eq!((label.width(), label.height()), (30, 20));
        assert!(label.pixels().pixels().any(|px| px.0[3] > 0));
    }

    #[test]
    fn measuring_scales_with_font_size() {
        let small = measure_text("Score", 12).unwrap();
        let large = measure_text("Score", 24).unwrap();
        assert!(small > 0.0);
        assert!((large - 2.0 * small).abs() < 0.01);
        assert_eq!(measure_text("", 24).unwrap(), 0.0);
    }

    #[test]
    fn bad_font_bytes_are_reported() {
        assert!(matches!(
            LabelRenderer::from_font_bytes(b"definitely not a font"),
            Err(LabelError::RenderingUnavailable(_))
        ));
    }

    #[test]
    fn counters_stay_open() {
        let label = render_label(&LabelRequest::new("O", 60, 30).centered(true)).unwrap();
        let inked: Vec<u32> = (0..label.width())
            .filter(|&x| label.pixels().get_pixel(x, 25).0[3] > 128)
            .collect();
        let (first, last) = (inked[0], inked[inked.len() - 1]);
        assert!(last - first > 10, "O is {first}..{last} wide");
        let middle = (first + last) / 2;
        assert_eq!(label.pixels().get_pixel(middle, 25).0[3], 0);
    }

    #[test]
    fn descenders_are_cut_at_the_bottom_edge() {
        let label = render_label(&LabelRequest::new("g", 30, 24)).unwrap();
        let bottom = label.height() - 1;
        assert!((0..label.width()).any(|x| label.pixels().get_pixel(x, bottom).0[3] > 0));
        // nothing is drawn in the top few rows, x-height glyphs sit low
        assert!((0..label.width()).all(|x| label.pixels().get_pixel(x, 0).0[3] == 0));
    }

    #[test]
    fn measuring_long_text_does_not_overflow() {
        let single = measure_text("W", 24).unwrap();
        let count = 3_500_000;
        let total = measure_text(&"W".repeat(count), 24).unwrap();
        let expected = single * count as f32;
        assert!(total.is_finite());
        assert!((total - expected).abs() / expected < 1e-3, "{total} vs {expected}");
    }
}
