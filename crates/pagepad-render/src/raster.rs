//! CPU raster drawing surface.

use crate::error::RenderError;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Pixel, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use kurbo::{Line, ParamCurveNearest, Point, Rect};
use pagepad_core::{DrawingSurface, LineCap, Snapshot, StrokeStyle, TextAlign, TextStyle};
use std::path::Path;

/// Load a TrueType/OpenType font from disk for surface text.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontArc, RenderError> {
    let bytes = std::fs::read(path.as_ref())?;
    FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font(e.to_string()))
}

/// An RGBA8 bitmap implementing [`DrawingSurface`].
///
/// Strokes are rasterised without anti-aliasing: a pixel is painted when its
/// center lies inside the stroked shape. Text needs a font; without one,
/// `draw_text` does nothing.
pub struct RasterSurface {
    image: RgbaImage,
    font: Option<FontArc>,
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            font: None,
        }
    }

    /// Use `font` for text.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// The backing bitmap.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// View a snapshot as an `RgbaImage`.
pub(crate) fn snapshot_image(snapshot: &Snapshot) -> Option<RgbaImage> {
    RgbaImage::from_raw(snapshot.width(), snapshot.height(), snapshot.pixels().to_vec())
}

/// Whether the pixel center `p` lies inside the stroked segment.
fn stroke_covers(line: &Line, p: Point, radius: f64, cap: LineCap) -> bool {
    let d = line.p1 - line.p0;
    let len_sq = d.hypot2();
    if len_sq == 0.0 {
        // A zero-length segment only shows up with round caps
        return cap == LineCap::Round && p.distance(line.p0) <= radius;
    }
    if cap == LineCap::Butt {
        let t = (p - line.p0).dot(d) / len_sq;
        if !(0.0..=1.0).contains(&t) {
            return false;
        }
    }
    line.nearest(p, 1e-9).distance_sq <= radius * radius
}

impl DrawingSurface for RasterSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn snapshot(&self) -> Snapshot {
        let (width, height) = self.image.dimensions();
        Snapshot::from_rgba(width, height, self.image.as_raw().clone())
            .unwrap_or_else(|| Snapshot::blank(width, height))
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.width() == self.width() && snapshot.height() == self.height() {
            self.image.copy_from_slice(snapshot.pixels());
            return;
        }
        if let Some(source) = snapshot_image(snapshot) {
            imageops::replace(&mut self.image, &source, 0, 0);
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        let x0 = rect.x0.floor().max(0.0);
        let y0 = rect.y0.floor().max(0.0);
        let x1 = rect.x1.ceil().min(f64::from(self.width()));
        let y1 = rect.y1.ceil().min(f64::from(self.height()));
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let region = imageproc::rect::Rect::at(x0 as i32, y0 as i32)
            .of_size((x1 - x0) as u32, (y1 - y0) as u32);
        draw_filled_rect_mut(&mut self.image, region, Rgba([0, 0, 0, 0]));
    }

    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        let radius = style.width / 2.0;
        if radius <= 0.0 || self.image.width() == 0 || self.image.height() == 0 {
            return;
        }
        let bounds = Rect::from_points(from, to).inflate(radius, radius);
        let x0 = bounds.x0.floor().max(0.0) as u32;
        let y0 = bounds.y0.floor().max(0.0) as u32;
        let x1 = bounds.x1.ceil().min(f64::from(self.width())).max(0.0) as u32;
        let y1 = bounds.y1.ceil().min(f64::from(self.height())).max(0.0) as u32;

        let line = Line::new(from, to);
        let color = Rgba(style.color.to_array());
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if stroke_covers(&line, center, radius, style.cap) {
                    self.image.get_pixel_mut(x, y).blend(&color);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &Snapshot, origin: Point) {
        match snapshot_image(image) {
            Some(source) => imageops::overlay(
                &mut self.image,
                &source,
                origin.x.round() as i64,
                origin.y.round() as i64,
            ),
            None => log::warn!("Skipping malformed image {:?}", image),
        }
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        let Some(font) = &self.font else {
            log::debug!("No font loaded, skipping text {:?}", text);
            return;
        };
        let scale = PxScale::from(style.size);
        let (text_width, _) = text_size(scale, font, text);
        let ascent = f64::from(font.as_scaled(scale).ascent());
        let x = match style.align {
            TextAlign::Left => anchor.x,
            TextAlign::Center => anchor.x - f64::from(text_width) / 2.0,
            TextAlign::Right => anchor.x - f64::from(text_width),
        };
        // Anchor is on the baseline, imageproc positions by the top edge
        let y = anchor.y - ascent;
        draw_text_mut(
            &mut self.image,
            Rgba(style.color.to_array()),
            x.round() as i32,
            y.round() as i32,
            scale,
            font,
            text,
        );
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }
}
