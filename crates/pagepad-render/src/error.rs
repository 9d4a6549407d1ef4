//! Render errors.

use thiserror::Error;

/// Errors raised while setting up rendering resources.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Font load failed: {0}")]
    Font(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
