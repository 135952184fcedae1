mod program;
mod texture;

pub(crate) use program::ShaderProgram;
pub use texture::{TextureHandle, TextureKind, VOLUME_TEXTURE_UNIT, VoxelFormat};
