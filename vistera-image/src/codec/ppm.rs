//! Binary portable pixmap (P6) driver.
//!
//! Only the P6 subtype with a max-color of 255 is accepted; anything else
//! is a fatal format error rather than a best-effort read. Scanlines are
//! read in reverse order so the resulting buffer is already in GPU
//! orientation and needs no separate flip.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
};

use crate::{Error, PixelBuffer};

/// Largest accepted edge length. Anything bigger is a corrupt or hostile
/// header; no real capture or screenshot comes close.
const MAX_DIMENSION: u32 = 32_768;

pub(crate) fn decode(path: &str) -> Result<PixelBuffer, Error> {
    let file = File::open(path).map_err(|e| Error::file_open_failed(path, e))?;
    let mut reader = BufReader::new(file);

    let tag = next_token(&mut reader, path)?;
    if tag != "P6" {
        return Err(Error::bad_header(
            path,
            format!("PPM subtype '{tag}' not supported, only P6"),
        ));
    }
    let width: u32 = parse_field(&mut reader, path, "width")?;
    let height: u32 = parse_field(&mut reader, path, "height")?;
    let max_color: u32 = parse_field(&mut reader, path, "max-color")?;
    if max_color != 255 {
        return Err(Error::bad_header(
            path,
            format!("PPM max-color {max_color} not supported, only 255"),
        ));
    }
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::bad_header(
            path,
            format!("PPM dimensions {width}x{height} out of range"),
        ));
    }

    let mut buffer = PixelBuffer::alloc(width, height, 3);
    let scanline = buffer.scanline();
    let data = buffer.data_mut();
    // The file stores the top row first; filling rows bottom-up leaves the
    // buffer in GPU orientation without a post-decode flip.
    for y in (0..height as usize).rev() {
        reader
            .read_exact(&mut data[y * scanline..(y + 1) * scanline])
            .map_err(|_| Error::truncated_pixels(path))?;
    }

    tracing::debug!(path, width, height, "decoded PPM image");
    Ok(buffer)
}

/// Reads the next whitespace-delimited header token, skipping `#` comments.
///
/// A `\r\n` pair counts as one separator, so a CRLF-terminated header
/// line never leaks its `\n` into the binary payload that follows the
/// max-color field.
fn next_token(reader: &mut impl BufRead, path: &str) -> Result<String, Error> {
    let mut token = Vec::new();
    let mut in_comment = false;
    loop {
        let next = reader
            .fill_buf()
            .map_err(|e| Error::decode_failed(path, e))?
            .first()
            .copied();
        let Some(b) = next else {
            if token.is_empty() {
                return Err(Error::bad_header(path, "unexpected end of PPM header"));
            }
            break;
        };
        if in_comment {
            reader.consume(1);
            in_comment = b != b'\n';
            continue;
        }
        match b {
            b'#' => {
                reader.consume(1);
                in_comment = true;
            },
            b' ' | b'\t' | b'\r' | b'\n' => {
                reader.consume(1);
                if b == b'\r' {
                    let follow = reader
                        .fill_buf()
                        .map_err(|e| Error::decode_failed(path, e))?
                        .first()
                        .copied();
                    if follow == Some(b'\n') {
                        reader.consume(1);
                    }
                }
                if !token.is_empty() {
                    break;
                }
            },
            _ => {
                reader.consume(1);
                token.push(b);
            },
        }
    }
    String::from_utf8(token).map_err(|_| Error::bad_header(path, "non-ASCII PPM header"))
}

fn parse_field(reader: &mut impl BufRead, path: &str, name: &str) -> Result<u32, Error> {
    let token = next_token(reader, path)?;
    token
        .parse()
        .map_err(|_| Error::bad_header(path, format!("invalid PPM {name} '{token}'")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(name: &str, bytes: &[u8]) -> String {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn red_ppm() -> Vec<u8> {
        let mut bytes = b"P6\n4 4\n255\n".to_vec();
        bytes.extend(std::iter::repeat_n([255u8, 0, 0], 16).flatten());
        bytes
    }

    #[test]
    fn decodes_p6_all_red() {
        let path = write_temp("vistera_red.ppm", &red_ppm());
        let buf = decode(&path).unwrap();
        assert_eq!((buf.width, buf.height, buf.channels), (4, 4, 3));
        for px in buf.data().chunks(3) {
            assert_eq!(px, &[255, 0, 0]);
        }
    }

    #[test]
    fn header_comments_are_skipped() {
        let mut bytes = b"P6\n# made by vistera\n2 1\n# colours\n255\n".to_vec();
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let path = write_temp("vistera_comment.ppm", &bytes);
        let buf = decode(&path).unwrap();
        assert_eq!((buf.width, buf.height), (2, 1));
    }

    #[test]
    fn scanlines_are_reversed() {
        let mut bytes = b"P6\n1 2\n255\n".to_vec();
        bytes.extend_from_slice(&[10, 10, 10, 20, 20, 20]);
        let path = write_temp("vistera_rows.ppm", &bytes);
        let buf = decode(&path).unwrap();
        // first file row ends up as the last buffer row
        assert_eq!(buf.data(), &[20, 20, 20, 10, 10, 10]);
    }

    #[test]
    fn rejects_oversized_dimensions() {
        // 65536 * 65536 * 3 wraps a 32-bit size computation to zero; the
        // header must be rejected, never allocated
        let path = write_temp("vistera_huge.ppm", b"P6\n65536 65536\n255\n");
        let err = decode(&path).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn rejects_zero_dimensions() {
        let path = write_temp("vistera_zero.ppm", b"P6\n0 4\n255\n");
        assert!(matches!(decode(&path).unwrap_err(), Error::Format(_)));
    }

    #[test]
    fn crlf_header_does_not_shift_pixel_data() {
        let mut bytes = b"P6\r\n2 1\r\n255\r\n".to_vec();
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let path = write_temp("vistera_crlf.ppm", &bytes);
        let buf = decode(&path).unwrap();
        assert_eq!(buf.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rejects_p3_subtype() {
        let path = write_temp("vistera_p3.ppm", b"P3\n4 4\n255\n");
        let err = decode(&path).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn rejects_non_255_max_color() {
        let path = write_temp("vistera_depth.ppm", b"P6\n4 4\n128\n");
        let err = decode(&path).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn truncated_pixel_data_is_fatal() {
        let mut bytes = b"P6\n4 4\n255\n".to_vec();
        bytes.extend_from_slice(&[255, 0, 0]); // one pixel of forty-eight bytes
        let path = write_temp("vistera_trunc.ppm", &bytes);
        let err = decode(&path).unwrap_err();
        assert!(matches!(err, Error::Truncated(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_file_is_recoverable() {
        let err = decode("/nonexistent/vistera.ppm").unwrap_err();
        assert!(matches!(err, Error::Read(_)));
        assert!(!err.is_fatal());
    }
}
