//! CPU-side imaging for the vistera visualization renderer.
//!
//! Decodes file-backed images (PPM, PNG, JPEG, TIFF) into canonical
//! [`PixelBuffer`]s in GPU row order, and encodes buffers back out to
//! files or inline base64 data URIs. GPU upload lives in
//! `vistera-render`; nothing here touches GL.

pub mod codec;
mod error;
mod export;
mod path;
mod pixel;

pub use codec::{JpegConfig, Subsampling, decode};
pub use error::Error;
pub use export::{image_data_uri, write_image};
pub use path::{FilePath, ImageFormat};
pub use pixel::PixelBuffer;

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// 4x4 all-red P6 portable pixmap, the canonical end-to-end fixture.
    fn red_ppm_file() -> String {
        let path = std::env::temp_dir().join("vistera_e2e.ppm");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"P6\n4 4\n255\n").unwrap();
        file.write_all(&[255, 0, 0].repeat(16)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn ppm_to_png_and_back_stays_red() {
        init_logging();
        let ppm = decode(&FilePath::new(&red_ppm_file())).unwrap();
        assert_eq!((ppm.width, ppm.height, ppm.channels), (4, 4, 3));

        let out = std::env::temp_dir().join("vistera_e2e.png");
        let written = write_image(ppm, out.to_str().unwrap()).unwrap();

        let png = decode(&FilePath::new(&written)).unwrap();
        assert_eq!((png.width, png.height), (4, 4));
        assert!(png.channels == 3 || png.channels == 4);
        let ch = png.channels as usize;
        for px in png.data().chunks(ch) {
            assert_eq!(&px[..3], &[255, 0, 0]);
        }
    }

    #[test]
    fn decode_dispatches_by_extension_not_content() {
        // A PNG body behind a .ppm extension must hit the PPM driver and
        // fail its header check, not silently succeed.
        let path = std::env::temp_dir().join("vistera_mislabel.ppm");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();
        assert!(decode(&FilePath::new(path.to_str().unwrap())).is_err());
    }
}
