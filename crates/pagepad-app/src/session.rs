//! Scripted canvas sessions.

use pagepad_core::{
    CanvasConfig, ColorParseError, ConfigError, ControllerError, ExportArtifact,
    PageCanvasController, PointerInput, SurfaceBounds, Tool,
};
use pagepad_render::{
    CombinedImageExporter, PdfExporter, PngCodec, RasterSurface, RenderError, encode_png,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Canvas error: {0}")]
    Controller(#[from] ControllerError),
    #[error("Invalid color: {0}")]
    Color(#[from] ColorParseError),
    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
    #[error("Snapshot encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One step of a session script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Resize the surface, keeping the current page.
    Resize { width: u32, height: u32 },
    /// Feed a raw pointer event.
    Pointer {
        event: PointerInput,
        #[serde(default)]
        bounds: SurfaceBounds,
    },
    /// Set the pen color from a hex or `rgb()` string.
    SetColor { value: String },
    SetWidth { width: u32 },
    SetTool { tool: Tool },
    Undo,
    Redo,
    Clear,
    NextPage,
    PrevPage,
    ExportPdf,
    ExportImage,
    /// Write the visible surface to a PNG file.
    Snapshot { file_name: String },
}

/// Parse a session script: one JSON command per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_commands(script: &str) -> Result<Vec<Command>, AppError> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| AppError::Parse {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Outcome of a session run.
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    pub page_count: usize,
    pub current_page: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

/// A mounted canvas plus the directory exports are written to.
pub struct Session {
    controller: PageCanvasController<RasterSurface, PngCodec>,
    out_dir: PathBuf,
}

impl Session {
    pub fn new(surface: RasterSurface, config: CanvasConfig, out_dir: impl Into<PathBuf>) -> Self {
        let mut controller = PageCanvasController::new(PngCodec, config);
        controller.mount(surface);
        Self {
            controller,
            out_dir: out_dir.into(),
        }
    }

    pub fn controller(&self) -> &PageCanvasController<RasterSurface, PngCodec> {
        &self.controller
    }

    /// Apply every command in order, stopping at the first error.
    pub fn run(&mut self, commands: &[Command]) -> Result<SessionReport, AppError> {
        let mut written = Vec::new();
        for command in commands {
            if let Some(path) = self.apply(command)? {
                written.push(path);
            }
        }
        Ok(SessionReport {
            written,
            page_count: self.controller.page_count(),
            current_page: self.controller.current_page(),
            undo_depth: self.controller.undo_depth(),
            redo_depth: self.controller.redo_depth(),
        })
    }

    /// Apply one command. Returns the path of any file written.
    pub fn apply(&mut self, command: &Command) -> Result<Option<PathBuf>, AppError> {
        log::trace!("Applying {:?}", command);
        match command {
            Command::Resize { width, height } => self.controller.resize(*width, *height)?,
            Command::Pointer { event, bounds } => self.controller.handle_input(event, *bounds),
            Command::SetColor { value } => self.controller.set_stroke_color_hex(value)?,
            Command::SetWidth { width } => self.controller.set_stroke_width(*width),
            Command::SetTool { tool } => self.controller.set_tool(*tool),
            Command::Undo => {
                if !self.controller.undo() {
                    log::debug!("Nothing to undo");
                }
            }
            Command::Redo => {
                if !self.controller.redo() {
                    log::debug!("Nothing to redo");
                }
            }
            Command::Clear => {
                self.controller.clear();
            }
            Command::NextPage => self.controller.next_page()?,
            Command::PrevPage => self.controller.prev_page()?,
            Command::ExportPdf => {
                let exporter = PdfExporter::from_config(&self.controller.config().pdf);
                let artifact = self.controller.export_with(&exporter)?;
                return self.write_artifact(&artifact).map(Some);
            }
            Command::ExportImage => {
                let exporter =
                    CombinedImageExporter::from_config(&self.controller.config().combined_image);
                let artifact = self.controller.export_with(&exporter)?;
                return self.write_artifact(&artifact).map(Some);
            }
            Command::Snapshot { file_name } => {
                let snapshot = self
                    .controller
                    .snapshot()
                    .ok_or(ControllerError::SurfaceNotMounted)?;
                let bytes = encode_png(snapshot.width(), snapshot.height(), snapshot.pixels())?;
                return self.write_file(file_name, &bytes).map(Some);
            }
        }
        Ok(None)
    }

    fn write_artifact(&self, artifact: &ExportArtifact) -> Result<PathBuf, AppError> {
        self.write_file(&artifact.file_name, &artifact.bytes)
    }

    fn write_file(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        std::fs::create_dir_all(&self.out_dir)?;
        // Keep writes inside the output directory
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| std::io::Error::other(format!("invalid file name {:?}", file_name)))?;
        let path = self.out_dir.join(name);
        std::fs::write(&path, bytes)?;
        log::info!("Wrote {:?}", path);
        Ok(path)
    }
}
