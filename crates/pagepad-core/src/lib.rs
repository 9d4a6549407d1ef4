//! PagePad Core Library
//!
//! Platform-agnostic page, stroke and history model for the PagePad drawing
//! canvas. Rendering, image encoding and export formats plug in through the
//! [`DrawingSurface`], [`PageCodec`] and [`Exporter`] traits.

pub mod codec;
pub mod color;
pub mod config;
pub mod controller;
pub mod export;
pub mod history;
pub mod input;
pub mod pages;
pub mod surface;
pub mod tools;

pub use codec::{CodecError, PageCodec};
pub use color::{Color, ColorParseError};
pub use config::{CanvasConfig, CombinedImageConfig, ConfigError, LabelConfig, PdfConfig};
pub use controller::{ControllerError, ControllerResult, PageCanvasController};
pub use export::{ExportArtifact, ExportError, ExportSource, Exporter};
pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use input::{PointerAction, PointerInput, StrokeState, SurfaceBounds};
pub use pages::{EncodedImage, Page, PageBook};
pub use surface::{DrawingSurface, Snapshot, TextAlign, TextStyle};
pub use tools::{LineCap, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, StrokeStyle, Tool, ToolSettings};
