//! Lazy, memoized image-to-texture loading.

use vistera_image::{FilePath, PixelBuffer, decode};

use crate::{error::Error, gl::TextureHandle};

/// Where an [`ImageSource`] is in its load lifecycle. Both `Loaded` and
/// `Failed` are terminal; a source never retries a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
    Failed,
}

/// A file-backed, lazily-resolved texture source.
///
/// The first [`ImageSource::use_texture`] call with a non-empty path
/// decodes the file, uploads it, and drops the CPU pixels. Every later
/// call is a pure bind. A failed decode clears the file reference and
/// pins the source in `Failed`, so callers see "no texture" instead of a
/// retry every frame.
#[derive(Debug)]
pub struct ImageSource {
    path: FilePath,
    state: LoadState,
    texture: Option<TextureHandle>,
    unit: u32,
    mipmaps: bool,
}

impl ImageSource {
    pub fn new(path: &str) -> ImageSource {
        ImageSource {
            path: FilePath::new(path),
            state: LoadState::Unloaded,
            texture: None,
            unit: 0,
            mipmaps: false,
        }
    }

    /// Requests mipmap generation at upload time. Has no effect once the
    /// source has left `Unloaded`.
    pub fn with_mipmaps(mut self, mipmaps: bool) -> ImageSource {
        self.mipmaps = mipmaps;
        self
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The current file reference; empty after a failed load.
    pub fn path(&self) -> &str {
        self.path.full()
    }

    /// Resolves the texture, decoding and uploading on the first call.
    ///
    /// Returns `Ok(None)` when the source has no usable image (empty
    /// path, missing file, recoverable decode failure). Fatal codec
    /// errors (malformed headers, truncated pixel data, a format compiled
    /// out) propagate instead of being absorbed.
    pub fn use_texture(&mut self, gl: &glow::Context) -> Result<Option<&TextureHandle>, Error> {
        match self.state {
            LoadState::Loaded => {},
            LoadState::Failed => {
                TextureHandle::unbind_unit(gl, self.unit);
                return Ok(None);
            },
            LoadState::Unloaded => match self.load_pixels()? {
                Some(buffer) => {
                    let handle = TextureHandle::upload_2d(gl, buffer, self.unit, self.mipmaps)?;
                    self.texture = Some(handle);
                    self.state = LoadState::Loaded;
                },
                None => {
                    TextureHandle::unbind_unit(gl, self.unit);
                    return Ok(None);
                },
            },
        }

        let handle = self.texture.as_ref();
        if let Some(handle) = handle {
            handle.bind(gl);
        }
        Ok(handle)
    }

    /// The decode half of [`ImageSource::use_texture`], split out so the
    /// state machine is exercisable without a GL context. Transitions to
    /// `Failed` (and clears the path) on any recoverable failure. Once the
    /// source has reached a terminal state this returns `Ok(None)` without
    /// touching the filesystem.
    pub fn load_pixels(&mut self) -> Result<Option<PixelBuffer>, Error> {
        match self.state {
            LoadState::Loaded | LoadState::Failed => return Ok(None),
            LoadState::Unloaded => {},
        }

        if self.path.is_empty() {
            self.state = LoadState::Failed;
            return Ok(None);
        }

        match decode(&self.path) {
            Ok(buffer) => Ok(Some(buffer)),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                tracing::warn!(path = self.path.full(), error = %e, "texture load failed");
                self.state = LoadState::Failed;
                self.path = FilePath::new("");
                Ok(None)
            },
        }
    }

    /// Releases the GPU texture. The source stays in its terminal state;
    /// it is not reusable afterwards.
    pub fn delete(&mut self, gl: &glow::Context) {
        if let Some(handle) = self.texture.take() {
            handle.delete(gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn red_ppm(name: &str) -> String {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"P6\n2 2\n255\n").unwrap();
        file.write_all(&[255, 0, 0].repeat(4)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn empty_path_fails_without_decoding() {
        let mut source = ImageSource::new("");
        assert_eq!(source.state(), LoadState::Unloaded);
        assert!(source.load_pixels().unwrap().is_none());
        assert_eq!(source.state(), LoadState::Failed);
    }

    #[test]
    fn missing_file_is_terminal_and_clears_the_path() {
        let mut source = ImageSource::new("/nonexistent/grid.png");
        assert!(source.load_pixels().unwrap().is_none());
        assert_eq!(source.state(), LoadState::Failed);
        assert!(source.path().is_empty());
    }

    #[test]
    fn failed_source_stays_inert_on_repeated_calls() {
        let mut source = ImageSource::new("/nonexistent/streamlines.png");

        assert!(source.load_pixels().unwrap().is_none());
        assert_eq!(source.state(), LoadState::Failed);
        // the decode ran once; further calls see the recorded outcome
        for _ in 0..3 {
            assert!(source.load_pixels().unwrap().is_none());
            assert_eq!(source.state(), LoadState::Failed);
            assert!(source.path().is_empty());
        }
    }

    #[test]
    fn successful_decode_returns_pixels() {
        let path = red_ppm("vistera_loader_ok.ppm");
        let mut source = ImageSource::new(&path);
        let buffer = source.load_pixels().unwrap().unwrap();
        assert_eq!((buffer.width, buffer.height, buffer.channels), (2, 2, 3));
    }

    #[test]
    fn malformed_ppm_header_is_fatal() {
        let path = std::env::temp_dir().join("vistera_loader_p3.ppm");
        std::fs::write(&path, b"P3\n2 2\n255\n").unwrap();
        let mut source = ImageSource::new(path.to_str().unwrap());
        assert!(source.load_pixels().is_err());
    }
}
