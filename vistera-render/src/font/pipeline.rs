//! Shared GL plumbing for both text modes: one shader, one streamed
//! vertex buffer, drawn as textured triangles (raster) or plain lines
//! (vector).

use glow::HasContext;

use crate::{GlslVersion, error::Error, gl::ShaderProgram, mat4::Mat4};

/// Floats per vertex: x, y, z, u, v.
pub(crate) const VERTEX_FLOATS: usize = 5;
const STRIDE: i32 = (VERTEX_FLOATS * 4) as i32;

pub(crate) struct TextPipeline {
    shader: ShaderProgram,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    transform_loc: glow::UniformLocation,
    colour_loc: glow::UniformLocation,
    textured_loc: glow::UniformLocation,
}

impl TextPipeline {
    const FRAGMENT_GLSL: &'static str = include_str!("../shaders/text.frag");
    const VERTEX_GLSL: &'static str = include_str!("../shaders/text.vert");

    pub(crate) fn new(gl: &glow::Context, glsl_version: GlslVersion) -> Result<Self, Error> {
        let shader =
            ShaderProgram::create(gl, glsl_version, Self::VERTEX_GLSL, Self::FRAGMENT_GLSL)?;
        shader.use_program(gl);

        let vao =
            unsafe { gl.create_vertex_array() }.map_err(|_| Error::vertex_array_creation_failed())?;
        let vbo = unsafe { gl.create_buffer() }.map_err(|_| Error::buffer_creation_failed("text"))?;
        unsafe {
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, STRIDE, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, STRIDE, 12);
            gl.bind_vertex_array(None);
        }

        let transform_loc = shader.uniform(gl, "u_transform")?;
        let colour_loc = shader.uniform(gl, "u_colour")?;
        let textured_loc = shader.uniform(gl, "u_textured")?;
        let sampler_loc = shader.uniform(gl, "u_glyphs")?;
        unsafe { gl.uniform_1_i32(Some(&sampler_loc), 0) };

        Ok(TextPipeline { shader, vao, vbo, transform_loc, colour_loc, textured_loc })
    }

    /// Streams a vertex batch and draws it. `mode` is `glow::TRIANGLES`
    /// for glyph quads or `glow::LINES` for strokes.
    pub(crate) fn draw(
        &self,
        gl: &glow::Context,
        vertices: &[f32],
        mode: u32,
        transform: &Mat4,
        colour: [f32; 4],
        textured: bool,
    ) {
        if vertices.is_empty() {
            return;
        }
        self.shader.use_program(gl);
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            let bytes = std::slice::from_raw_parts(
                vertices.as_ptr() as *const u8,
                std::mem::size_of_val(vertices),
            );
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STREAM_DRAW);

            gl.uniform_matrix_4_f32_slice(Some(&self.transform_loc), false, transform);
            gl.uniform_4_f32_slice(Some(&self.colour_loc), &colour);
            gl.uniform_1_i32(Some(&self.textured_loc), i32::from(textured));

            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.draw_arrays(mode, 0, (vertices.len() / VERTEX_FLOATS) as i32);
            gl.bind_vertex_array(None);
        }
    }

    pub(crate) fn delete(&self, gl: &glow::Context) {
        self.shader.delete(gl);
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}
