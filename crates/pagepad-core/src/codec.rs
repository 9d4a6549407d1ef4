//! Page image encoding seam.

use crate::pages::EncodedImage;
use crate::surface::Snapshot;
use thiserror::Error;

/// Page encode/decode errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Decoding failed: {0}")]
    Decode(String),
}

/// Converts surface snapshots to stored page images and back.
pub trait PageCodec {
    fn encode(&self, snapshot: &Snapshot) -> Result<EncodedImage, CodecError>;

    fn decode(&self, image: &EncodedImage) -> Result<Snapshot, CodecError>;
}
