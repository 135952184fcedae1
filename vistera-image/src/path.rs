use std::path::Path;

use compact_str::{CompactString, ToCompactString};

/// The closed set of image formats handled by the codec drivers.
///
/// Dispatch is by file extension only; file contents are never sniffed to
/// pick a driver (the PNG decoder still validates its signature after
/// dispatch, but that is a post-hoc check).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Binary P6 portable pixmap.
    Ppm,
    /// Portable network graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
    /// Tagged image file format (optional capability).
    Tiff,
}

impl ImageFormat {
    /// Maps a lowercase extension tag to a format, or `None` when the
    /// extension is not one of ours.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ppm" => Some(Self::Ppm),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// MIME type for the formats usable in data URIs.
    pub(crate) fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Ppm => "image/x-portable-pixmap",
            Self::Tiff => "image/tiff",
        }
    }
}

/// A file reference with its format tag derived once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    full: String,
    base: CompactString,
    ext: CompactString,
}

impl FilePath {
    /// Splits a path string into its full form, base name and lowercase
    /// extension tag.
    pub fn new(path: &str) -> Self {
        let p = Path::new(path);
        let base = p
            .file_stem()
            .map(|s| s.to_string_lossy().to_compact_string())
            .unwrap_or_default();
        let ext = p
            .extension()
            .map(|s| s.to_string_lossy().to_lowercase().to_compact_string())
            .unwrap_or_default();
        Self { full: path.to_string(), base, ext }
    }

    /// The original path string.
    pub fn full(&self) -> &str {
        &self.full
    }

    /// File name without directory or extension.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Lowercase extension tag ("png", "jpg", ...), empty when absent.
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// The codec format this path dispatches to, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_extension(&self.ext)
    }

    /// True for the empty path, which an image source treats as "no file".
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_tag_is_lowercased() {
        let fp = FilePath::new("/data/textures/Earth.PNG");
        assert_eq!(fp.ext(), "png");
        assert_eq!(fp.base(), "Earth");
        assert_eq!(fp.format(), Some(ImageFormat::Png));
    }

    #[test]
    fn jpeg_aliases_dispatch_to_one_driver() {
        assert_eq!(FilePath::new("a.jpg").format(), Some(ImageFormat::Jpeg));
        assert_eq!(FilePath::new("a.jpeg").format(), Some(ImageFormat::Jpeg));
        assert_eq!(FilePath::new("a.tif").format(), Some(ImageFormat::Tiff));
        assert_eq!(FilePath::new("a.tiff").format(), Some(ImageFormat::Tiff));
    }

    #[test]
    fn unknown_extension_has_no_format() {
        assert_eq!(FilePath::new("screenshot.webp").format(), None);
        assert_eq!(FilePath::new("noext").format(), None);
        assert!(FilePath::new("").is_empty());
    }
}
