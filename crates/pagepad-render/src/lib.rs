//! PagePad Render Library
//!
//! CPU raster implementation of the core drawing surface, the PNG page codec
//! and the document/image exporters.

mod codec;
mod error;
pub mod export;
mod raster;

pub use codec::{PngCodec, decode_png, encode_png};
pub use error::RenderError;
pub use export::{CombinedImageExporter, PdfExporter};
pub use raster::{RasterSurface, load_font};
