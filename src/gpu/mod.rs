//! Graphics backend abstraction.
//!
//! The pipeline talks to the GPU only through [`Backend`], which mirrors the
//! subset of an OpenGL context the viewer needs. [`glow::Context`] implements
//! it (see [`gl`]); unit tests use an in-memory recording backend.
//!
//! Handle types are associated types so a backend can use its native
//! program, shader, and buffer objects directly.

mod gl;
pub use gl::describe_context;
#[cfg(test)]
pub(crate) mod recording;

use std::fmt::Debug;

pub use crate::error::ShaderStage;

/// One vertex attribute fed from a tightly packed `f32` buffer.
#[derive(Debug, Clone, Copy)]
pub struct VertexStream<Buf> {
    pub location: u32,
    pub buffer: Buf,
    pub components: i32,
}

pub trait Backend {
    type Program: Copy + Debug;
    type Shader: Copy + Debug;
    type Buffer: Copy + Debug;
    type VertexArray: Copy + Debug;
    type UniformLocation: Clone + Debug;

    /// Compiles one stage. On failure returns the compiler's info log.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;
    fn delete_shader(&self, shader: Self::Shader);
    /// Links two compiled stages and releases them. On failure returns the
    /// linker's info log.
    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, String>;
    fn delete_program(&self, program: Self::Program);

    /// Location of an active vertex attribute, `None` if the linked program
    /// does not use it.
    fn attribute_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    /// Location of an active uniform, `None` if the linked program does not
    /// use it.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    fn use_program(&self, program: Option<Self::Program>);

    // Uploads target the program passed to the last `use_program`. A `None`
    // location is ignored.
    fn uniform_f32(&self, location: Option<&Self::UniformLocation>, value: f32);
    fn uniform_vec3(&self, location: Option<&Self::UniformLocation>, value: [f32; 3]);
    fn uniform_mat4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]);

    fn create_vertex_buffer(&self, data: &[f32]) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    /// Draws `vertex_count` vertices as a triangle list.
    fn draw_triangles(
        &self,
        vertex_array: Self::VertexArray,
        streams: &[VertexStream<Self::Buffer>],
        vertex_count: usize,
    );

    fn set_viewport(&self, width: u32, height: u32);
    fn set_clear_color(&self, rgba: [f32; 4]);
    fn clear(&self);
    fn set_depth_test(&self, enabled: bool);
    fn set_face_culling(&self, enabled: bool);
    fn set_wireframe(&self, enabled: bool);

    /// Reads the current framebuffer as tightly packed RGB rows, bottom row
    /// first.
    fn read_pixels_rgb(&self, width: u32, height: u32) -> Vec<u8>;

    /// Pops the next pending error code, if any.
    fn take_error(&self) -> Option<u32>;
}

/// Drains and logs every pending backend error.
///
/// Returns how many errors were reported. Backend errors never abort the
/// frame loop.
pub fn check_errors<B: Backend>(backend: &B, checkpoint: &str) -> usize {
    let mut count = 0;
    while let Some(code) = backend.take_error() {
        log::error!("backend error 0x{code:04X} at {checkpoint}");
        count += 1;
        // A lost context can keep reporting forever.
        if count >= 32 {
            break;
        }
    }
    count
}
