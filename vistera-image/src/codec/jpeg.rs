//! JPEG driver backed by `jpeg-decoder` / `jpeg-encoder`.
//!
//! Decode always yields a 3-channel buffer regardless of what the file
//! stores; greyscale is expanded and CMYK converted. Both read and write
//! paths flip, as with PNG.

use std::{fs::File, io::BufReader};

use jpeg_decoder::PixelFormat;
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};

use crate::{Error, PixelBuffer};

/// Chroma subsampling modes exposed by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsampling {
    /// 4:4:4 — no subsampling, used for in-memory export.
    None,
    /// 4:2:2 — horizontal subsampling, used for file export.
    Horizontal,
    /// 4:2:0 — horizontal and vertical subsampling.
    Both,
}

impl Subsampling {
    fn factor(self) -> SamplingFactor {
        match self {
            Self::None => SamplingFactor::R_4_4_4,
            Self::Horizontal => SamplingFactor::R_4_2_2,
            Self::Both => SamplingFactor::R_4_2_0,
        }
    }
}

/// JPEG encode configuration.
#[derive(Debug, Clone, Copy)]
pub struct JpegConfig {
    /// Quality 1..=100.
    pub quality: u8,
    /// Chroma subsampling mode.
    pub subsampling: Subsampling,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self { quality: 95, subsampling: Subsampling::Horizontal }
    }
}

pub(crate) fn decode(path: &str) -> Result<PixelBuffer, Error> {
    let file = File::open(path).map_err(|e| Error::file_open_failed(path, e))?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| Error::decode_failed(path, e))?;
    let info = decoder
        .info()
        .ok_or_else(|| Error::decode_failed(path, "missing image info"))?;

    let (width, height) = (u32::from(info.width), u32::from(info.height));
    let rgb = match info.pixel_format {
        PixelFormat::RGB24 => pixels,
        PixelFormat::L8 => pixels.iter().flat_map(|&l| [l, l, l]).collect(),
        PixelFormat::CMYK32 => cmyk_to_rgb(&pixels),
        PixelFormat::L16 => {
            return Err(Error::decode_failed(path, "16-bit luminance not supported"));
        },
    };
    tracing::debug!(path, width, height, "decoded JPEG image");

    let mut buffer = PixelBuffer::new(rgb, width, height, 3);
    buffer.flip_vertical();
    Ok(buffer)
}

pub(crate) fn encode(
    mut buffer: PixelBuffer,
    out: &mut Vec<u8>,
    config: &JpegConfig,
) -> Result<(), Error> {
    let color = match buffer.channels {
        1 => ColorType::Luma,
        3 => ColorType::Rgb,
        4 => ColorType::Rgba,
        c => return Err(Error::encode_failed(format!("invalid channel count {c}"))),
    };
    if buffer.width > u32::from(u16::MAX) || buffer.height > u32::from(u16::MAX) {
        return Err(Error::encode_failed("image too large for JPEG"));
    }

    buffer.flip_vertical();

    let mut encoder = Encoder::new(&mut *out, config.quality);
    encoder.set_sampling_factor(config.subsampling.factor());
    encoder
        .encode(
            buffer.data(),
            buffer.width as u16,
            buffer.height as u16,
            color,
        )
        .map_err(Error::encode_failed)?;
    Ok(())
}

fn cmyk_to_rgb(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(4)
        .flat_map(|px| {
            let (c, m, y, k) = (
                u16::from(px[0]),
                u16::from(px[1]),
                u16::from(px[2]),
                u16::from(px[3]),
            );
            [(c * k / 255) as u8, (m * k / 255) as u8, (y * k / 255) as u8]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_color(width: u32, height: u32, rgb: [u8; 3]) -> PixelBuffer {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        PixelBuffer::new(data, width, height, 3)
    }

    #[test]
    fn encode_decode_round_trip_preserves_geometry() {
        let original = flat_color(16, 8, [200, 60, 30]);
        let mut bytes = Vec::new();
        encode(original, &mut bytes, &JpegConfig::default()).unwrap();

        let path = std::env::temp_dir().join("vistera_roundtrip.jpg");
        std::fs::write(&path, &bytes).unwrap();
        let decoded = decode(path.to_str().unwrap()).unwrap();

        // Lossy codec: geometry is exact, pixel values are close.
        assert_eq!((decoded.width, decoded.height, decoded.channels), (16, 8, 3));
        for px in decoded.data().chunks(3) {
            assert!(px[0] > 150 && px[1] < 120 && px[2] < 100, "drifted: {px:?}");
        }
    }

    #[test]
    fn decode_always_produces_three_channels() {
        // Encode a single-channel buffer; decode must still yield RGB.
        let grey = PixelBuffer::new(vec![128; 64], 8, 8, 1);
        let mut bytes = Vec::new();
        encode(grey, &mut bytes, &JpegConfig::default()).unwrap();

        let path = std::env::temp_dir().join("vistera_grey.jpg");
        std::fs::write(&path, &bytes).unwrap();
        let decoded = decode(path.to_str().unwrap()).unwrap();
        assert_eq!(decoded.channels, 3);
    }

    #[test]
    fn encoded_bytes_carry_jpeg_signature() {
        let mut bytes = Vec::new();
        encode(
            flat_color(4, 4, [0, 0, 255]),
            &mut bytes,
            &JpegConfig::default(),
        )
        .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn garbage_input_is_a_recoverable_error() {
        let path = std::env::temp_dir().join("vistera_notjpeg.jpg");
        std::fs::write(&path, b"not a jpeg at all").unwrap();
        let err = decode(path.to_str().unwrap()).unwrap_err();
        assert!(!err.is_fatal());
    }
}
