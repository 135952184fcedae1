use glow::HasContext;

use crate::{GlslVersion, error::Error};

/// Linked vertex+fragment program for the text pipeline. Shader bodies
/// are stored without a `#version` line; the dialect preamble is
/// prepended here so one source pair serves both GL 3.3 and ES 3.0.
#[derive(Debug)]
pub(crate) struct ShaderProgram {
    pub(crate) program: glow::Program,
}

impl ShaderProgram {
    pub(crate) fn create(
        gl: &glow::Context,
        glsl_version: GlslVersion,
        vertex_body: &str,
        fragment_body: &str,
    ) -> Result<Self, Error> {
        let program =
            unsafe { gl.create_program() }.map_err(|_| Error::shader_program_creation_failed())?;

        let vertex_source = format!("{}{vertex_body}", glsl_version.vertex_preamble());
        let fragment_source = format!("{}{fragment_body}", glsl_version.fragment_preamble());
        let vertex = compile(gl, glow::VERTEX_SHADER, &vertex_source)?;
        let fragment = compile(gl, glow::FRAGMENT_SHADER, &fragment_source)?;

        unsafe {
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);
        }
        let linked = unsafe { gl.get_program_link_status(program) };
        if !linked {
            let log = unsafe { gl.get_program_info_log(program) };
            return Err(Error::shader_link_failed(log));
        }

        // shaders are baked into the program, the objects can go
        unsafe {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
        }

        Ok(ShaderProgram { program })
    }

    pub(crate) fn uniform(
        &self,
        gl: &glow::Context,
        name: &str,
    ) -> Result<glow::UniformLocation, Error> {
        unsafe { gl.get_uniform_location(self.program, name) }
            .ok_or_else(|| Error::uniform_location_failed(name))
    }

    pub(crate) fn use_program(&self, gl: &glow::Context) {
        unsafe { gl.use_program(Some(self.program)) };
    }

    pub(crate) fn delete(&self, gl: &glow::Context) {
        unsafe { gl.delete_program(self.program) };
    }
}

fn compile(gl: &glow::Context, stage: u32, source: &str) -> Result<glow::Shader, Error> {
    let shader = unsafe { gl.create_shader(stage) }
        .map_err(|_| Error::shader_compile_failed("cannot create shader object".to_string()))?;

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    let compiled = unsafe { gl.get_shader_compile_status(shader) };
    if !compiled {
        let log = unsafe { gl.get_shader_info_log(shader) };
        return Err(Error::shader_compile_failed(log));
    }

    Ok(shader)
}
