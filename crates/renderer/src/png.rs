//! PNG encoding for RGBA image data.
//!
//! Writes truecolor-with-alpha PNGs (color type 6). When a resolution is
//! given a `pHYs` chunk records it so viewers and print tools pick up the
//! intended DPI.

use std::io::Write;

use bathy_common::{BathyError, BathyResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
const METERS_PER_INCH: f32 = 0.0254;

/// Encode RGBA pixels (4 bytes per pixel, row-major) as a PNG file.
///
/// # Arguments
/// - `pixels`: RGBA pixel data, straight (not premultiplied) alpha
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
/// - `dpi`: Resolution to record in the file, if any
pub fn encode_png(pixels: &[u8], width: u32, height: u32, dpi: Option<f32>) -> BathyResult<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || pixels.len() != expected {
        return Err(BathyError::Render(format!(
            "{}x{} image needs {} bytes of RGBA data, got {}",
            width,
            height,
            expected,
            pixels.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&width.to_be_bytes());
    ihdr_data.extend_from_slice(&height.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    if let Some(dpi) = dpi.filter(|d| *d > 0.0) {
        let ppm = pixels_per_meter(dpi);
        let mut phys = Vec::with_capacity(9);
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.push(1); // unit: meter
        write_chunk(&mut png, b"pHYs", &phys);
    }

    let idat_data = deflate_idat_rgba(pixels, width as usize, height as usize)
        .map_err(|e| BathyError::Render(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    tracing::debug!(width, height, bytes = png.len(), "Encoded PNG");

    Ok(png)
}

/// DPI expressed in the pixels-per-meter unit PNG uses.
pub fn pixels_per_meter(dpi: f32) -> u32 {
    (dpi / METERS_PER_INCH).round() as u32
}

/// Write a PNG chunk: length, type, data, CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGBA image data for IDAT chunk.
fn deflate_idat_rgba(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let stride = width * 4;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_per_meter() {
        assert_eq!(pixels_per_meter(600.0), 23622);
        assert_eq!(pixels_per_meter(72.0), 2835);
    }

    #[test]
    fn test_chunk_layout() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, b"IEND", &[]);
        assert_eq!(&buf[0..4], &[0, 0, 0, 0]);
        assert_eq!(&buf[4..8], b"IEND");
        // well-known CRC of an empty IEND chunk
        assert_eq!(&buf[8..12], &[0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(encode_png(&[0; 12], 2, 2, None).is_err());
        assert!(encode_png(&[], 0, 0, None).is_err());
    }
}
