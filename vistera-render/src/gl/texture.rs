//! GPU texture lifecycle for 2D images and 3D volumes.

use glow::HasContext;
use vistera_image::PixelBuffer;

use crate::error::Error;

/// Texture unit reserved for volume data; 2D image textures default to
/// unit 0 and must stay off this slot.
pub const VOLUME_TEXTURE_UNIT: u32 = 1;

/// What kind of GPU object a handle owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Image2D,
    Volume3D,
}

/// Internal storage for one voxel of a volume texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelFormat {
    Float32,
    Byte,
    CompressedByte,
    Rgb,
    CompressedRgb,
    Rgba,
    CompressedRgba,
}

impl VoxelFormat {
    /// (internal format, transfer format, component type) for allocation.
    fn gl_formats(self) -> (i32, u32, u32) {
        match self {
            VoxelFormat::Float32 => (glow::R32F as i32, glow::RED, glow::FLOAT),
            VoxelFormat::Byte => (glow::R8 as i32, glow::RED, glow::UNSIGNED_BYTE),
            VoxelFormat::CompressedByte => {
                (glow::COMPRESSED_RED as i32, glow::RED, glow::UNSIGNED_BYTE)
            },
            VoxelFormat::Rgb => (glow::RGB8 as i32, glow::RGB, glow::UNSIGNED_BYTE),
            VoxelFormat::CompressedRgb => {
                (glow::COMPRESSED_RGB as i32, glow::RGB, glow::UNSIGNED_BYTE)
            },
            VoxelFormat::Rgba => (glow::RGBA8 as i32, glow::RGBA, glow::UNSIGNED_BYTE),
            VoxelFormat::CompressedRgba => {
                (glow::COMPRESSED_RGBA as i32, glow::RGBA, glow::UNSIGNED_BYTE)
            },
        }
    }
}

/// (internal format, transfer format) keyed by image channel count.
fn channel_formats(channels: u8) -> (i32, u32) {
    match channels {
        1 => (glow::R8 as i32, glow::RED),
        2 => (glow::RG8 as i32, glow::RG),
        3 => (glow::RGB8 as i32, glow::RGB),
        _ => (glow::RGBA8 as i32, glow::RGBA),
    }
}

/// One GPU texture object with its dimensions and binding slot.
///
/// Handles are created by upload or allocation and released with
/// [`TextureHandle::delete`]; dropping a handle does not touch the GPU
/// because GL calls need the context reference.
#[derive(Debug)]
pub struct TextureHandle {
    texture: glow::Texture,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub channels: u8,
    pub unit: u32,
    pub kind: TextureKind,
    pub voxel_format: Option<VoxelFormat>,
}

impl TextureHandle {
    /// Uploads a decoded image as a 2D texture on the given unit:
    /// repeat wrapping, linear filtering, optional mipmap chain. The
    /// pixel buffer is consumed; the CPU copy is gone after this call.
    pub fn upload_2d(
        gl: &glow::Context,
        buffer: PixelBuffer,
        unit: u32,
        mipmaps: bool,
    ) -> Result<TextureHandle, Error> {
        let texture = unsafe { gl.create_texture() }.map_err(|_| Error::texture_creation_failed())?;

        let (internal, format) = channel_formats(buffer.channels);
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // decoded rows are tightly packed regardless of width
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            let min_filter =
                if mipmaps { glow::LINEAR_MIPMAP_LINEAR } else { glow::LINEAR };
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal,
                buffer.width as i32,
                buffer.height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(buffer.data())),
            );
            if mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
        }

        tracing::debug!(
            width = buffer.width,
            height = buffer.height,
            channels = buffer.channels,
            unit,
            mipmaps,
            "2D texture uploaded"
        );

        Ok(TextureHandle {
            texture,
            width: buffer.width,
            height: buffer.height,
            depth: 0,
            channels: buffer.channels,
            unit,
            kind: TextureKind::Image2D,
            voxel_format: None,
        })
    }

    /// Allocates an empty 3D texture on the reserved volume unit:
    /// clamped addressing, linear filtering, no mipmaps. Slices are
    /// filled afterwards with [`TextureHandle::upload_volume_slice`].
    pub fn allocate_volume(
        gl: &glow::Context,
        width: u32,
        height: u32,
        depth: u32,
        voxel_format: VoxelFormat,
    ) -> Result<TextureHandle, Error> {
        let texture = unsafe { gl.create_texture() }.map_err(|_| Error::texture_creation_failed())?;

        let (internal, format, component) = voxel_format.gl_formats();
        unsafe {
            gl.active_texture(glow::TEXTURE0 + VOLUME_TEXTURE_UNIT);
            gl.bind_texture(glow::TEXTURE_3D, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_parameter_i32(glow::TEXTURE_3D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_3D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_3D, glow::TEXTURE_WRAP_R, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_3D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_3D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_image_3d(
                glow::TEXTURE_3D,
                0,
                internal,
                width as i32,
                height as i32,
                depth as i32,
                0,
                format,
                component,
                glow::PixelUnpackData::Slice(None),
            );
        }

        tracing::debug!(width, height, depth, ?voxel_format, "volume texture allocated");

        Ok(TextureHandle {
            texture,
            width,
            height,
            depth,
            channels: match voxel_format {
                VoxelFormat::Rgb | VoxelFormat::CompressedRgb => 3,
                VoxelFormat::Rgba | VoxelFormat::CompressedRgba => 4,
                _ => 1,
            },
            unit: VOLUME_TEXTURE_UNIT,
            kind: TextureKind::Volume3D,
            voxel_format: Some(voxel_format),
        })
    }

    /// Streams one z-slice into an allocated volume without touching the
    /// rest of the texture, so large volumes never need a full-size CPU
    /// staging buffer.
    pub fn upload_volume_slice(
        &self,
        gl: &glow::Context,
        slice: u32,
        data: &[u8],
    ) -> Result<(), Error> {
        let Some(voxel_format) = self.voxel_format else {
            return Err(Error::Resource("slice upload on a 2D texture".to_string()));
        };
        if slice >= self.depth {
            return Err(Error::slice_out_of_range(slice, self.depth));
        }

        let (_, format, component) = voxel_format.gl_formats();
        unsafe {
            gl.active_texture(glow::TEXTURE0 + self.unit);
            gl.bind_texture(glow::TEXTURE_3D, Some(self.texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_sub_image_3d(
                glow::TEXTURE_3D,
                0,
                0,
                0,
                slice as i32,
                self.width as i32,
                self.height as i32,
                1,
                format,
                component,
                glow::PixelUnpackData::Slice(Some(data)),
            );
        }
        Ok(())
    }

    /// Activates the handle's unit and binds its object. 2D and 3D
    /// targets are mutually exclusive on a unit, so the other target is
    /// unbound in the same call.
    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + self.unit);
            match self.kind {
                TextureKind::Image2D => {
                    gl.bind_texture(glow::TEXTURE_3D, None);
                    gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
                },
                TextureKind::Volume3D => {
                    gl.bind_texture(glow::TEXTURE_2D, None);
                    gl.bind_texture(glow::TEXTURE_3D, Some(self.texture));
                },
            }
        }
    }

    /// The "no texture" state: both targets unbound on the given unit.
    pub fn unbind_unit(gl: &glow::Context, unit: u32) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.bind_texture(glow::TEXTURE_3D, None);
        }
    }

    pub fn delete(&self, gl: &glow::Context) {
        unsafe { gl.delete_texture(self.texture) };
    }
}
