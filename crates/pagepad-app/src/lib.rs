//! PagePad Application
//!
//! Headless session runner: replays scripted pointer, tool, history, page
//! and export commands against a raster-backed page canvas.

mod session;

pub use session::{AppError, Command, Session, SessionReport, parse_commands};
