//! In-memory backend that records every call, for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use super::{Backend, ShaderStage, VertexStream};

pub const DEFAULT_ATTRIBUTES: &[&str] = &["aPos", "aNor"];
pub const DEFAULT_UNIFORMS: &[&str] = &[
    "MV",
    "P",
    "IT",
    "light1Pos",
    "light2Pos",
    "light1Color",
    "light2Color",
    "ka",
    "kd",
    "ks",
    "s",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(Option<u32>),
    UniformF32 {
        program: Option<u32>,
        name: String,
        value: f32,
    },
    UniformVec3 {
        program: Option<u32>,
        name: String,
        value: [f32; 3],
    },
    UniformMat4 {
        program: Option<u32>,
        name: String,
        value: [f32; 16],
    },
    Draw {
        program: Option<u32>,
        locations: Vec<u32>,
        vertex_count: usize,
    },
    Viewport(u32, u32),
    ClearColor([f32; 4]),
    Clear,
    DepthTest(bool),
    FaceCulling(bool),
    Wireframe(bool),
    ReadPixels(u32, u32),
}

pub struct RecordingBackend {
    attributes: Vec<String>,
    uniforms: Vec<String>,
    fail_compile: Option<ShaderStage>,
    fail_link: bool,
    next_id: Cell<u32>,
    current: Cell<Option<u32>>,
    live_programs: RefCell<Vec<u32>>,
    live_buffers: Cell<usize>,
    calls: RefCell<Vec<Call>>,
    errors: RefCell<VecDeque<u32>>,
}

impl RecordingBackend {
    /// A backend whose programs expose the standard viewer symbols.
    pub fn new() -> Self {
        Self::with_symbols(DEFAULT_ATTRIBUTES, DEFAULT_UNIFORMS)
    }

    pub fn with_symbols(attributes: &[&str], uniforms: &[&str]) -> Self {
        Self {
            attributes: attributes.iter().map(|s| s.to_string()).collect(),
            uniforms: uniforms.iter().map(|s| s.to_string()).collect(),
            fail_compile: None,
            fail_link: false,
            next_id: Cell::new(1),
            current: Cell::new(None),
            live_programs: RefCell::new(Vec::new()),
            live_buffers: Cell::new(0),
            calls: RefCell::new(Vec::new()),
            errors: RefCell::new(VecDeque::new()),
        }
    }

    pub fn failing_compile(mut self, stage: ShaderStage) -> Self {
        self.fail_compile = Some(stage);
        self
    }

    pub fn failing_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    pub fn push_error(&self, code: u32) {
        self.errors.borrow_mut().push_back(code);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn current_program(&self) -> Option<u32> {
        self.current.get()
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn live_buffers(&self) -> usize {
        self.live_buffers.get()
    }

    /// Every draw call recorded so far.
    pub fn draws(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Draw { .. }))
            .cloned()
            .collect()
    }

    /// Matrix uploads to `name`, in order.
    pub fn mat4_uploads(&self, name: &str) -> Vec<[f32; 16]> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::UniformMat4 { name: n, value, .. } if n == name => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Vector uploads to `name`, in order.
    pub fn vec3_uploads(&self, name: &str) -> Vec<[f32; 3]> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::UniformVec3 { name: n, value, .. } if n == name => Some(*value),
                _ => None,
            })
            .collect()
    }

    fn next(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn uniform_name(&self, location: Option<&u32>) -> Option<String> {
        location.and_then(|&l| self.uniforms.get(l as usize).cloned())
    }
}

impl Backend for RecordingBackend {
    type Program = u32;
    type Shader = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = u32;

    fn compile_shader(&self, stage: ShaderStage, _source: &str) -> Result<u32, String> {
        if self.fail_compile == Some(stage) {
            return Err(format!("0:1(1): error: {stage} stage rejected"));
        }
        Ok(self.next())
    }

    fn delete_shader(&self, _shader: u32) {}

    fn link_program(&self, _vertex: u32, _fragment: u32) -> Result<u32, String> {
        if self.fail_link {
            return Err(String::from("error: unresolved varying"));
        }
        let id = self.next();
        self.live_programs.borrow_mut().push(id);
        Ok(id)
    }

    fn delete_program(&self, program: u32) {
        self.live_programs.borrow_mut().retain(|&p| p != program);
    }

    fn attribute_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as u32)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.uniforms.iter().position(|u| u == name).map(|i| i as u32)
    }

    fn use_program(&self, program: Option<u32>) {
        self.current.set(program);
        self.record(Call::UseProgram(program));
    }

    fn uniform_f32(&self, location: Option<&u32>, value: f32) {
        if let Some(name) = self.uniform_name(location) {
            self.record(Call::UniformF32 {
                program: self.current.get(),
                name,
                value,
            });
        }
    }

    fn uniform_vec3(&self, location: Option<&u32>, value: [f32; 3]) {
        if let Some(name) = self.uniform_name(location) {
            self.record(Call::UniformVec3 {
                program: self.current.get(),
                name,
                value,
            });
        }
    }

    fn uniform_mat4(&self, location: Option<&u32>, value: &[f32; 16]) {
        if let Some(name) = self.uniform_name(location) {
            self.record(Call::UniformMat4 {
                program: self.current.get(),
                name,
                value: *value,
            });
        }
    }

    fn create_vertex_buffer(&self, _data: &[f32]) -> Result<u32, String> {
        self.live_buffers.set(self.live_buffers.get() + 1);
        Ok(self.next())
    }

    fn delete_buffer(&self, _buffer: u32) {
        self.live_buffers.set(self.live_buffers.get().saturating_sub(1));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        Ok(self.next())
    }

    fn delete_vertex_array(&self, _vertex_array: u32) {}

    fn draw_triangles(&self, _vertex_array: u32, streams: &[VertexStream<u32>], vertex_count: usize) {
        self.record(Call::Draw {
            program: self.current.get(),
            locations: streams.iter().map(|s| s.location).collect(),
            vertex_count,
        });
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn set_clear_color(&self, rgba: [f32; 4]) {
        self.record(Call::ClearColor(rgba));
    }

    fn clear(&self) {
        self.record(Call::Clear);
    }

    fn set_depth_test(&self, enabled: bool) {
        self.record(Call::DepthTest(enabled));
    }

    fn set_face_culling(&self, enabled: bool) {
        self.record(Call::FaceCulling(enabled));
    }

    fn set_wireframe(&self, enabled: bool) {
        self.record(Call::Wireframe(enabled));
    }

    fn read_pixels_rgb(&self, width: u32, height: u32) -> Vec<u8> {
        self.record(Call::ReadPixels(width, height));
        vec![0x80; (width * height * 3) as usize]
    }

    fn take_error(&self) -> Option<u32> {
        self.errors.borrow_mut().pop_front()
    }
}
