//! Format-specific decode/encode drivers.
//!
//! Every driver produces or consumes the same canonical [`PixelBuffer`]:
//! 8 bits per channel, row zero at the bottom (GPU orientation). Drivers
//! whose backing library uses the opposite origin flip on the way through.

mod jpeg;
mod png;
mod ppm;
#[cfg(feature = "tiff")]
mod tiff;

pub use jpeg::{JpegConfig, Subsampling};

use crate::{Error, FilePath, ImageFormat, PixelBuffer};

/// Decodes an image file, dispatching on the path's extension tag.
///
/// # Errors
/// Returns a recoverable [`Error::Read`] for missing files or undecodable
/// data, and fatal variants for corrupt PPM data or compiled-out TIFF
/// support. An extension outside the known set is a recoverable read error.
pub fn decode(path: &FilePath) -> Result<PixelBuffer, Error> {
    let format = path
        .format()
        .ok_or_else(|| Error::decode_failed(path.full(), "unrecognized extension"))?;
    match format {
        ImageFormat::Ppm => ppm::decode(path.full()),
        ImageFormat::Png => png::decode(path.full()),
        ImageFormat::Jpeg => jpeg::decode(path.full()),
        #[cfg(feature = "tiff")]
        ImageFormat::Tiff => tiff::decode(path.full()),
        #[cfg(not(feature = "tiff"))]
        ImageFormat::Tiff => Err(Error::tiff_unavailable()),
    }
}

/// Encodes a buffer as PNG into `out`. Flips internally; the input buffer
/// is in GPU orientation.
pub(crate) fn encode_png(buffer: PixelBuffer, out: &mut Vec<u8>) -> Result<(), Error> {
    png::encode(buffer, out)
}

/// Encodes a buffer as JPEG into `out`, with quality and chroma
/// subsampling from `config`.
pub(crate) fn encode_jpeg(
    buffer: PixelBuffer,
    out: &mut Vec<u8>,
    config: &JpegConfig,
) -> Result<(), Error> {
    jpeg::encode(buffer, out, config)
}
