//! GPU-facing layer of the vistera visualization engine.
//!
//! Turns decoded images into bound textures ([`ImageSource`],
//! [`TextureHandle`]), streams volume data slice by slice, and renders
//! bitmap and vector text labels ([`FontManager`]). All GL work runs on
//! the thread owning the context; nothing here is thread-safe.

mod error;
pub mod font;
mod gl;
mod loader;
pub mod mat4;

pub use error::Error;
pub use font::{ALIGN_CENTRE, ALIGN_LEFT, ALIGN_RIGHT, FONT_SCALE_3D, FontManager};
pub use gl::{TextureHandle, TextureKind, VOLUME_TEXTURE_UNIT, VoxelFormat};
pub use loader::{ImageSource, LoadState};

/// Target GLSL dialect, prepended to the embedded shader sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    /// WebGL2 / OpenGL ES 3.0: `#version 300 es`
    Es300,
    /// OpenGL 3.3 Core: `#version 330 core`
    Gl330,
}

impl GlslVersion {
    pub fn vertex_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision highp float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }

    pub fn fragment_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision mediump float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }
}
