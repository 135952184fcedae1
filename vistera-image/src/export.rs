//! Image export: file writes and inline base64 data URIs.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    Error, FilePath, ImageFormat, PixelBuffer,
    codec::{self, JpegConfig, Subsampling},
};

/// Writes a pixel buffer to `path`, choosing the encoder from the
/// destination extension. PNG and JPEG are supported; any other extension
/// falls back to PNG with `.png` appended to the given path, retried once.
///
/// Returns the path actually written.
///
/// # Errors
/// Fails on encoder errors or when the file cannot be created.
pub fn write_image(buffer: PixelBuffer, path: &str) -> Result<String, Error> {
    let filepath = FilePath::new(path);
    let mut bytes = Vec::new();
    match filepath.format() {
        Some(ImageFormat::Png) => codec::encode_png(buffer, &mut bytes)?,
        Some(ImageFormat::Jpeg) => {
            // File export keeps the 4:2:2 subsampling the screenshot path
            // has always used.
            let config = JpegConfig { quality: 95, subsampling: Subsampling::Horizontal };
            codec::encode_jpeg(buffer, &mut bytes, &config)?;
        },
        _ => {
            let retry = format!("{path}.png");
            tracing::warn!(path, "unrecognized output extension, writing PNG");
            return write_image(buffer, &retry);
        },
    }

    std::fs::write(filepath.full(), &bytes)
        .map_err(|e| Error::encode_failed(format!("cannot write '{path}': {e}")))?;
    tracing::debug!(path = filepath.full(), "image file written");
    Ok(filepath.full().to_string())
}

/// Encodes a pixel buffer as an inline base64 data URI, MIME-tagged
/// `image/png` or `image/jpeg`, for embedding without a filesystem
/// reference.
///
/// # Errors
/// Fails for formats other than PNG/JPEG, on encoder errors, and fatally
/// when a JPEG exceeds its `width * height * channels` scratch reservation.
pub fn image_data_uri(buffer: PixelBuffer, format: ImageFormat) -> Result<String, Error> {
    let mut bytes = Vec::new();
    match format {
        ImageFormat::Png => codec::encode_png(buffer, &mut bytes)?,
        ImageFormat::Jpeg => {
            // Reservation matches the uncompressed image size, with a floor
            // for tiny images whose headers alone exceed their pixel data.
            let capacity = (buffer.width as usize
                * buffer.height as usize
                * buffer.channels as usize)
                .max(1024);
            bytes.reserve(capacity);
            // In-memory export skips subsampling; these images are usually
            // small and headed for further processing.
            let config = JpegConfig { quality: 95, subsampling: Subsampling::None };
            codec::encode_jpeg(buffer, &mut bytes, &config)?;
            if bytes.len() > capacity {
                return Err(Error::EncodeCapacity(format!(
                    "JPEG output {} exceeds reservation {capacity}",
                    bytes.len()
                )));
            }
            tracing::debug!(size = bytes.len(), "JPEG compressed for data URI");
        },
        other => {
            return Err(Error::encode_failed(format!(
                "data URIs support PNG and JPEG only, not {other:?}"
            )));
        },
    }

    Ok(format!("data:{};base64,{}", format.mime(), STANDARD.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red(width: u32, height: u32) -> PixelBuffer {
        let data = [255u8, 0, 0].repeat((width * height) as usize);
        PixelBuffer::new(data, width, height, 3)
    }

    #[test]
    fn png_data_uri_has_prefix_and_signature() {
        let uri = image_data_uri(red(4, 4), ImageFormat::Png).unwrap();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn jpeg_data_uri_has_prefix_and_signature() {
        let uri = image_data_uri(red(32, 32), ImageFormat::Jpeg).unwrap();
        let payload = uri.strip_prefix("data:image/jpeg;base64,").unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn ppm_is_not_a_data_uri_format() {
        assert!(image_data_uri(red(2, 2), ImageFormat::Ppm).is_err());
    }

    #[test]
    fn write_image_appends_png_for_unknown_extension() {
        let base = std::env::temp_dir().join("vistera_export.xyz");
        let written = write_image(red(4, 4), base.to_str().unwrap()).unwrap();
        assert!(written.ends_with(".xyz.png"));
        let bytes = std::fs::read(&written).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn write_image_honours_jpeg_extension() {
        let path = std::env::temp_dir().join("vistera_export.jpg");
        let written = write_image(red(8, 8), path.to_str().unwrap()).unwrap();
        let bytes = std::fs::read(&written).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn round_trip_through_export_preserves_red() {
        // The end-to-end check: PPM-shaped data out through PNG and back.
        let path = std::env::temp_dir().join("vistera_red_roundtrip.png");
        let written = write_image(red(4, 4), path.to_str().unwrap()).unwrap();
        let decoded = crate::decode(&FilePath::new(&written)).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 4));
        assert_eq!(&decoded.data()[..3], &[255, 0, 0]);
    }
}
