//! PNG page codec.

use pagepad_core::{CodecError, EncodedImage, PageCodec, Snapshot};

/// Stores pages as RGBA PNG images.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl PageCodec for PngCodec {
    fn encode(&self, snapshot: &Snapshot) -> Result<EncodedImage, CodecError> {
        encode_png(snapshot.width(), snapshot.height(), snapshot.pixels())
            .map(EncodedImage::new)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, image: &EncodedImage) -> Result<Snapshot, CodecError> {
        decode_png(image.as_bytes())
    }
}

/// Encode RGBA8 pixels as a PNG file.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, png::EncodingError> {
    let mut bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut bytes, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    writer.finish()?;
    Ok(bytes)
}

/// Decode a PNG file of any color type into an RGBA8 snapshot.
pub fn decode_png(bytes: &[u8]) -> Result<Snapshot, CodecError> {
    let decode_err = |e: png::DecodingError| CodecError::Decode(e.to_string());

    let mut decoder = png::Decoder::new(bytes);
    // Expand palettes and strip 16-bit channels
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(decode_err)?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(decode_err)?;
    buf.truncate(info.buffer_size());

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(CodecError::Decode("palette was not expanded".to_string()));
        }
    };

    Snapshot::from_rgba(info.width, info.height, rgba)
        .ok_or_else(|| CodecError::Decode("pixel buffer does not match dimensions".to_string()))
}
