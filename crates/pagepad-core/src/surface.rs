//! Drawing surface abstraction and bitmap snapshots.

use crate::color::Color;
use crate::tools::StrokeStyle;
use kurbo::{Point, Rect};
use std::sync::Arc;

/// An immutable RGBA8 capture of a whole surface.
///
/// Pixels are stored row-major, four bytes per pixel. Clones share the
/// buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Snapshot {
    /// Wrap raw RGBA8 pixels. Returns `None` if the buffer length does not
    /// match the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (pixels.len() == expected).then(|| Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// A fully transparent snapshot.
    pub fn blank(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 4;
        Self {
            width,
            height,
            pixels: vec![0; len].into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Horizontal alignment of text relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Style for `DrawingSurface::draw_text`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

/// A 2D raster drawing target.
///
/// Coordinates are surface-local pixels with the origin at the top-left.
/// Text anchors sit on the baseline.
pub trait DrawingSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Capture the full surface.
    fn snapshot(&self) -> Snapshot;

    /// Write a snapshot back at the origin, replacing pixels it covers.
    /// Snapshots of a different size are clipped to the surface.
    fn restore(&mut self, snapshot: &Snapshot);

    /// Blank a region to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Blank the whole surface.
    fn clear(&mut self) {
        let rect = Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()));
        self.clear_rect(rect);
    }

    /// Stroke a straight segment.
    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle);

    /// Composite an image over the surface with its top-left at `origin`.
    fn draw_image(&mut self, image: &Snapshot, origin: Point);

    /// Draw a line of text anchored at `anchor`.
    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle);

    /// Recreate the surface at a new size. Existing content is discarded.
    fn resize(&mut self, width: u32, height: u32);
}
