//! OpenGL 3.3 core implementation of [`Backend`] on top of `glow`.

use glow::HasContext;

use super::{Backend, ShaderStage, VertexStream};

impl Backend for glow::Context {
    type Program = glow::NativeProgram;
    type Shader = glow::NativeShader;
    type Buffer = glow::NativeBuffer;
    type VertexArray = glow::NativeVertexArray;
    type UniformLocation = glow::NativeUniformLocation;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.create_shader(kind)?;
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
            if !self.get_shader_compile_status(shader) {
                let log = self.get_shader_info_log(shader);
                HasContext::delete_shader(self, shader);
                return Err(log);
            }
            Ok(shader)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn link_program(
        &self,
        vertex: Self::Shader,
        fragment: Self::Shader,
    ) -> Result<Self::Program, String> {
        unsafe {
            let program = match self.create_program() {
                Ok(program) => program,
                Err(err) => {
                    HasContext::delete_shader(self, vertex);
                    HasContext::delete_shader(self, fragment);
                    return Err(err);
                }
            };
            self.attach_shader(program, vertex);
            self.attach_shader(program, fragment);
            HasContext::link_program(self, program);

            self.detach_shader(program, vertex);
            self.detach_shader(program, fragment);
            HasContext::delete_shader(self, vertex);
            HasContext::delete_shader(self, fragment);

            if !self.get_program_link_status(program) {
                let log = self.get_program_info_log(program);
                HasContext::delete_program(self, program);
                return Err(log);
            }
            Ok(program)
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn attribute_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_f32(&self, location: Option<&Self::UniformLocation>, value: f32) {
        unsafe { self.uniform_1_f32(location, value) }
    }

    fn uniform_vec3(&self, location: Option<&Self::UniformLocation>, value: [f32; 3]) {
        unsafe { self.uniform_3_f32(location, value[0], value[1], value[2]) }
    }

    fn uniform_mat4(&self, location: Option<&Self::UniformLocation>, value: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(location, false, value) }
    }

    fn create_vertex_buffer(&self, data: &[f32]) -> Result<Self::Buffer, String> {
        unsafe {
            let buffer = self.create_buffer()?;
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            self.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) }
    }

    fn draw_triangles(
        &self,
        vertex_array: Self::VertexArray,
        streams: &[VertexStream<Self::Buffer>],
        vertex_count: usize,
    ) {
        unsafe {
            self.bind_vertex_array(Some(vertex_array));
            for stream in streams {
                self.bind_buffer(glow::ARRAY_BUFFER, Some(stream.buffer));
                self.enable_vertex_attrib_array(stream.location);
                self.vertex_attrib_pointer_f32(
                    stream.location,
                    stream.components,
                    glow::FLOAT,
                    false,
                    0,
                    0,
                );
            }
            self.draw_arrays(
                glow::TRIANGLES,
                0,
                vertex_count.min(i32::MAX as usize) as i32,
            );
            for stream in streams {
                self.disable_vertex_attrib_array(stream.location);
            }
            self.bind_buffer(glow::ARRAY_BUFFER, None);
            self.bind_vertex_array(None);
        }
    }

    fn set_viewport(&self, width: u32, height: u32) {
        unsafe {
            self.viewport(
                0,
                0,
                width.min(i32::MAX as u32) as i32,
                height.min(i32::MAX as u32) as i32,
            )
        }
    }

    fn set_clear_color(&self, rgba: [f32; 4]) {
        unsafe { self.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn clear(&self) {
        unsafe { HasContext::clear(self, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT) }
    }

    fn set_depth_test(&self, enabled: bool) {
        set_capability(self, glow::DEPTH_TEST, enabled);
    }

    fn set_face_culling(&self, enabled: bool) {
        set_capability(self, glow::CULL_FACE, enabled);
    }

    fn set_wireframe(&self, enabled: bool) {
        let mode = if enabled { glow::LINE } else { glow::FILL };
        unsafe { self.polygon_mode(glow::FRONT_AND_BACK, mode) }
    }

    fn read_pixels_rgb(&self, width: u32, height: u32) -> Vec<u8> {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(3);
        let mut pixels = vec![0u8; len];
        unsafe {
            self.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            self.read_buffer(glow::BACK);
            self.read_pixels(
                0,
                0,
                width.min(i32::MAX as u32) as i32,
                height.min(i32::MAX as u32) as i32,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(pixels.as_mut_slice())),
            );
        }
        pixels
    }

    fn take_error(&self) -> Option<u32> {
        match unsafe { self.get_error() } {
            glow::NO_ERROR => None,
            code => Some(code),
        }
    }
}

fn set_capability(gl: &glow::Context, capability: u32, enabled: bool) {
    unsafe {
        if enabled {
            gl.enable(capability);
        } else {
            gl.disable(capability);
        }
    }
}

/// Renderer and version strings of the current context.
pub fn describe_context(gl: &glow::Context) -> (String, String) {
    unsafe {
        (
            gl.get_parameter_string(glow::VERSION),
            gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
        )
    }
}
