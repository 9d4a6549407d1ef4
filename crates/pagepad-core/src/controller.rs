//! The page canvas controller: owns the surface, history and pages.

use crate::codec::{CodecError, PageCodec};
use crate::color::{Color, ColorParseError};
use crate::config::CanvasConfig;
use crate::export::{ExportArtifact, ExportError, ExportSource, Exporter};
use crate::history::History;
use crate::input::{PointerAction, PointerInput, StrokeState, SurfaceBounds};
use crate::pages::{Page, PageBook};
use crate::surface::{DrawingSurface, Snapshot, TextAlign, TextStyle};
use crate::tools::{Tool, ToolSettings};
use kurbo::Point;
use thiserror::Error;

/// Controller errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Drawing surface is not mounted")]
    SurfaceNotMounted,
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Mediates between pointer input, the drawing surface, the undo/redo
/// history and the page book.
///
/// Until a surface is mounted every surface-dependent operation is a no-op
/// (or returns `ControllerError::SurfaceNotMounted`).
pub struct PageCanvasController<S, C> {
    surface: Option<S>,
    codec: C,
    history: History,
    pages: PageBook,
    stroke: StrokeState,
    tools: ToolSettings,
    config: CanvasConfig,
}

impl<S: DrawingSurface, C: PageCodec> PageCanvasController<S, C> {
    /// Create an unmounted controller with a single blank page.
    pub fn new(codec: C, config: CanvasConfig) -> Self {
        Self {
            surface: None,
            codec,
            history: History::new(config.history_limit),
            pages: PageBook::new(),
            stroke: StrokeState::Idle,
            tools: config.tool_settings(),
            config,
        }
    }

    /// Install the drawing surface and render the current page onto it.
    pub fn mount(&mut self, surface: S) {
        log::debug!("Mounting surface {}x{}", surface.width(), surface.height());
        self.surface = Some(surface);
        self.render_current_page();
    }

    /// Remove the drawing surface, ending any stroke in progress.
    pub fn unmount(&mut self) -> Option<S> {
        self.stroke.end();
        self.surface.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Capture the surface, if mounted.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.surface.as_ref().map(|surface| surface.snapshot())
    }

    // --- Tool controls ---

    pub fn tool_settings(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.tools.stroke_color = color;
    }

    /// Set the stroke color from a color-picker string.
    pub fn set_stroke_color_hex(&mut self, value: &str) -> Result<(), ColorParseError> {
        self.tools.stroke_color = Color::parse(value)?;
        Ok(())
    }

    /// Set the stroke width, clamped to the control range.
    pub fn set_stroke_width(&mut self, width: u32) {
        self.tools.set_stroke_width(width);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.tool = tool;
    }

    pub fn set_eraser(&mut self, enabled: bool) {
        self.tools.tool = if enabled { Tool::Eraser } else { Tool::Pen };
    }

    // --- Resize ---

    /// Recreate the surface at a new size and redraw the current page.
    ///
    /// The current page is saved first so unsaved strokes survive. Content
    /// is bitmap-only and is not rescaled.
    pub fn resize(&mut self, width: u32, height: u32) -> ControllerResult<()> {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized resize {}x{}", width, height);
            return Ok(());
        }
        self.save_page_state()?;
        let surface = self
            .surface
            .as_mut()
            .ok_or(ControllerError::SurfaceNotMounted)?;
        surface.resize(width, height);
        self.render_current_page();
        Ok(())
    }

    // --- Stroke input ---

    /// Route a raw pointer event through the stroke state machine.
    pub fn handle_input(&mut self, event: &PointerInput, bounds: SurfaceBounds) {
        match event.to_action(bounds) {
            Some(PointerAction::Down(at)) => self.pointer_down(at),
            Some(PointerAction::Move(to)) => self.pointer_move(to),
            Some(PointerAction::Release) => self.pointer_up(),
            None => log::debug!("Ignoring pointer event without position: {:?}", event),
        }
    }

    /// Start a stroke at a surface-local position.
    pub fn pointer_down(&mut self, at: Point) {
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("pointer_down ignored: no surface");
            return;
        };
        self.history.record(surface.snapshot());
        self.stroke.begin(at);
    }

    /// Extend the current stroke. Ignored unless a stroke is in progress.
    pub fn pointer_move(&mut self, to: Point) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Some((from, to)) = self.stroke.extend(to) {
            surface.stroke_segment(from, to, &self.tools.stroke_style());
        }
    }

    /// Finish the current stroke.
    pub fn pointer_up(&mut self) {
        self.stroke.end();
    }

    /// Pointer left the surface; same as releasing it.
    pub fn pointer_leave(&mut self) {
        self.stroke.end();
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_drawing()
    }

    // --- History ---

    /// Undo the last action. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        if !self.history.can_undo() {
            return false;
        }
        match self.history.undo(surface.snapshot()) {
            Some(previous) => {
                surface.restore(&previous);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone action. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        if !self.history.can_redo() {
            return false;
        }
        match self.history.redo(surface.snapshot()) {
            Some(next) => {
                surface.restore(&next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Blank the whole surface. Undoable.
    pub fn clear(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        self.history.record(surface.snapshot());
        surface.clear();
        true
    }

    // --- Pages ---

    pub fn current_page(&self) -> usize {
        self.pages.current_index()
    }

    pub fn page_count(&self) -> usize {
        self.pages.pages().len()
    }

    pub fn pages(&self) -> &[Page] {
        self.pages.pages()
    }

    /// Encode the surface into the current page slot.
    pub fn save_page_state(&mut self) -> ControllerResult<()> {
        let surface = self
            .surface
            .as_ref()
            .ok_or(ControllerError::SurfaceNotMounted)?;
        let image = self.codec.encode(&surface.snapshot())?;
        log::debug!(
            "Saved page {} ({} bytes)",
            self.pages.current_index() + 1,
            image.as_bytes().len()
        );
        self.pages.store_current(image);
        Ok(())
    }

    /// Save the current page and move to the next one, creating it if needed.
    pub fn next_page(&mut self) -> ControllerResult<()> {
        self.save_page_state()?;
        let created = self.pages.advance();
        log::info!(
            "Moved to page {} of {}{}",
            self.pages.current_index() + 1,
            self.pages.pages().len(),
            if created { " (new)" } else { "" }
        );
        self.render_current_page();
        Ok(())
    }

    /// Save the current page and move to the previous one. No-op on the
    /// first page.
    pub fn prev_page(&mut self) -> ControllerResult<()> {
        if self.pages.current_index() == 0 {
            return Ok(());
        }
        self.save_page_state()?;
        self.pages.retreat();
        log::info!(
            "Moved to page {} of {}",
            self.pages.current_index() + 1,
            self.pages.pages().len()
        );
        self.render_current_page();
        Ok(())
    }

    /// Blank the surface, draw the stored image of the current page and
    /// overlay the page-number label.
    ///
    /// Decoding is synchronous, so the page image is in place before this
    /// returns.
    pub fn render_current_page(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("render_current_page ignored: no surface");
            return;
        };
        surface.clear();

        if let Some(image) = self.pages.current().image() {
            match self.codec.decode(image) {
                Ok(snapshot) => surface.draw_image(&snapshot, Point::ZERO),
                Err(e) => log::warn!(
                    "Failed to decode page {}: {}",
                    self.pages.current_index() + 1,
                    e
                ),
            }
        }

        let label = &self.config.page_label;
        if label.enabled {
            let anchor = Point::new(
                f64::from(surface.width()) - label.offset,
                f64::from(surface.height()) - label.offset,
            );
            let style = TextStyle {
                size: label.font_size,
                color: label.color,
                align: TextAlign::Right,
            };
            let text = format!("Page {}", self.pages.current_index() + 1);
            surface.draw_text(&text, anchor, &style);
        }
    }

    // --- Export ---

    /// Save the current page, then run an exporter over all pages.
    pub fn export_with(&mut self, exporter: &dyn Exporter) -> ControllerResult<ExportArtifact> {
        self.save_page_state()?;
        let surface = self
            .surface
            .as_ref()
            .ok_or(ControllerError::SurfaceNotMounted)?;
        let source = ExportSource {
            pages: self.pages.pages(),
            width: surface.width(),
            height: surface.height(),
            codec: &self.codec,
        };
        let artifact = exporter.export(&source)?;
        log::info!(
            "Exported {} ({} bytes)",
            artifact.file_name,
            artifact.bytes.len()
        );
        Ok(artifact)
    }
}
