/// Error categories for image decoding, encoding and export.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// File missing or unreadable; the owning image source falls back to
    /// "no texture" rather than terminating.
    #[error("Image read error: {0}")]
    Read(String),

    /// Malformed or unsupported image data with no safe partial result.
    #[error("Image format error: {0}")]
    Format(String),

    /// Partial pixel data during a binary transfer; never treated as valid.
    #[error("Truncated image data: {0}")]
    Truncated(String),

    /// A format was requested whose support is compiled out.
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    /// Encoder failure while producing output bytes.
    #[error("Image encode error: {0}")]
    Encode(String),

    /// In-memory encode output exceeded its reserved buffer.
    #[error("Encode capacity exceeded: {0}")]
    EncodeCapacity(String),
}

impl Error {
    /// Whether this error represents unrecoverable corruption or a build
    /// configuration problem, as opposed to "this one resource is unusable".
    ///
    /// Recoverable errors are absorbed by the image loader, which marks the
    /// source failed and renders without a texture. Fatal errors are expected
    /// to propagate out to program termination.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Format(_)
                | Error::Truncated(_)
                | Error::MissingCapability(_)
                | Error::EncodeCapacity(_)
        )
    }

    pub(crate) fn file_open_failed(path: &str, detail: impl std::fmt::Display) -> Self {
        Self::Read(format!("Cannot open '{path}': {detail}"))
    }

    pub(crate) fn decode_failed(path: &str, detail: impl std::fmt::Display) -> Self {
        Self::Read(format!("Decode failed for '{path}': {detail}"))
    }

    pub(crate) fn bad_header(path: &str, detail: impl std::fmt::Display) -> Self {
        Self::Format(format!("'{path}': {detail}"))
    }

    pub(crate) fn truncated_pixels(path: &str) -> Self {
        Self::Truncated(format!("'{path}': pixel data ended early"))
    }

    pub(crate) fn tiff_unavailable() -> Self {
        Self::MissingCapability(
            "TIFF support not compiled in; rebuild with the `tiff` feature".to_string(),
        )
    }

    pub(crate) fn encode_failed(detail: impl std::fmt::Display) -> Self {
        Self::Encode(format!("{detail}"))
    }
}
