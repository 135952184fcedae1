//! PNG driver backed by the `png` crate.
//!
//! This is the full-feature backend: palette images are expanded to RGB,
//! 16-bit depths are normalized to 8, interlacing is handled by the
//! library, and the decoded channel count is whatever the file actually
//! carries after expansion. Both directions flip, since the library and
//! the GPU disagree on which row is first.

use std::{fs::File, io::BufReader};

use crate::{Error, PixelBuffer};

pub(crate) fn decode(path: &str) -> Result<PixelBuffer, Error> {
    let file = File::open(path).map_err(|e| Error::file_open_failed(path, e))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder
        .read_info()
        .map_err(|e| Error::decode_failed(path, e))?;
    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| Error::decode_failed(path, "output size unavailable"))?;
    let mut raw = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut raw)
        .map_err(|e| Error::decode_failed(path, e))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(Error::decode_failed(
            path,
            format!("bit depth {:?} after normalization", info.bit_depth),
        ));
    }

    let channels = info.color_type.samples() as u8;
    let (width, height) = (info.width, info.height);
    tracing::debug!(path, width, height, channels, "decoded PNG image");

    // Repack row by row; line_size may exceed the tight scanline width.
    let scanline = width as usize * channels as usize;
    let mut data = Vec::with_capacity(scanline * height as usize);
    for y in 0..height as usize {
        data.extend_from_slice(&raw[y * info.line_size..y * info.line_size + scanline]);
    }

    let mut buffer = PixelBuffer::new(data, width, height, channels);
    buffer.flip_vertical();
    Ok(buffer)
}

pub(crate) fn encode(mut buffer: PixelBuffer, out: &mut Vec<u8>) -> Result<(), Error> {
    let color = match buffer.channels {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        c => return Err(Error::encode_failed(format!("invalid channel count {c}"))),
    };

    // Input arrives in GPU orientation; PNG stores the top row first.
    buffer.flip_vertical();

    let mut encoder = png::Encoder::new(&mut *out, buffer.width, buffer.height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    // Middle-of-the-road deflate level, the screenshot path's usual
    // speed/size tradeoff.
    encoder.set_compression(png::Compression::Balanced);

    let mut writer = encoder.write_header().map_err(Error::encode_failed)?;
    writer
        .write_image_data(buffer.data())
        .map_err(Error::encode_failed)?;
    writer.finish().map_err(Error::encode_failed)?;
    Ok(())
}
