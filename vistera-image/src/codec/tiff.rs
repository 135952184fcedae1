//! TIFF driver backed by the `tiff` crate, compiled in behind the `tiff`
//! feature. Decode normalizes to 4-channel RGBA; there is no encode path.

use std::{fs::File, io::BufReader};

use tiff::{ColorType, decoder::DecodingResult};

use crate::{Error, PixelBuffer};

pub(crate) fn decode(path: &str) -> Result<PixelBuffer, Error> {
    let file = File::open(path).map_err(|e| Error::file_open_failed(path, e))?;
    let mut decoder =
        tiff::decoder::Decoder::new(BufReader::new(file)).map_err(|e| Error::decode_failed(path, e))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::decode_failed(path, e))?;
    let color = decoder
        .colortype()
        .map_err(|e| Error::decode_failed(path, e))?;
    let image = decoder
        .read_image()
        .map_err(|e| Error::decode_failed(path, e))?;

    let DecodingResult::U8(samples) = image else {
        return Err(Error::decode_failed(path, "only 8-bit TIFF samples supported"));
    };

    let rgba = match color {
        ColorType::RGBA(8) => samples,
        ColorType::RGB(8) => samples
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        ColorType::Gray(8) => samples.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        ColorType::GrayA(8) => samples
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        other => {
            return Err(Error::decode_failed(
                path,
                format!("unsupported TIFF colour type {other:?}"),
            ));
        },
    };
    tracing::debug!(path, width, height, "decoded TIFF image");

    let mut buffer = PixelBuffer::new(rgba, width, height, 4);
    buffer.flip_vertical();
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use tiff::encoder::{TiffEncoder, colortype};

    use super::*;

    #[test]
    fn decode_normalizes_rgb_to_rgba() {
        let path = std::env::temp_dir().join("vistera_rgb.tiff");
        let pixels: Vec<u8> = [10u8, 20, 30].repeat(6);
        {
            // encoder and writer must go out of scope to flush the file
            let file = File::create(&path).unwrap();
            let mut encoder = TiffEncoder::new(std::io::BufWriter::new(file)).unwrap();
            encoder
                .write_image::<colortype::RGB8>(3, 2, &pixels)
                .unwrap();
        }

        let buf = decode(path.to_str().unwrap()).unwrap();
        assert_eq!((buf.width, buf.height, buf.channels), (3, 2, 4));
        for px in buf.data().chunks(4) {
            assert_eq!(px, &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn garbage_input_is_a_recoverable_error() {
        let path = std::env::temp_dir().join("vistera_nottiff.tif");
        std::fs::write(&path, b"II*\0 broken").unwrap();
        let err = decode(path.to_str().unwrap()).unwrap_err();
        assert!(!err.is_fatal());
    }
}
