//! Shader programs with registered, pre-resolved symbol locations.
//!
//! A [`ShaderProgram`] goes through three phases:
//!
//! 1. [`ShaderProgram::init`] compiles and links both stages.
//! 2. Registration: [`ShaderProgram::add_attribute`] and
//!    [`ShaderProgram::add_uniform`] resolve each name against the linked
//!    program once and cache the location.
//! 3. Use: [`ShaderProgram::bind`] closes registration and returns a
//!    [`BoundProgram`] token. Uniform uploads are only available on the token,
//!    so they always target the program that is actually current.
//!
//! The token mutably borrows the backend for its whole lifetime, so a second
//! program cannot be bound until the first one is unbound.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::{debug, info, log, Level};

use crate::error::{ShaderError, ShaderStage, SymbolKind};
use crate::gpu::Backend;
use crate::math::{Mat4, Vec3};

/// Where a shader stage's source text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    File(PathBuf),
    Inline(String),
}

impl ShaderSource {
    fn load(&self, program: &str, stage: ShaderStage) -> Result<String, ShaderError> {
        match self {
            ShaderSource::Inline(text) => Ok(text.clone()),
            ShaderSource::File(path) => {
                fs::read_to_string(path).map_err(|source| ShaderError::Source {
                    program: program.to_string(),
                    stage,
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

pub struct ShaderProgram<B: Backend> {
    name: String,
    vertex: ShaderSource,
    fragment: ShaderSource,
    handle: Option<B::Program>,
    attributes: HashMap<String, u32>,
    // `None` marks an optional uniform the linked program does not use.
    uniforms: HashMap<String, Option<B::UniformLocation>>,
    sealed: bool,
    verbose: bool,
}

impl<B: Backend> ShaderProgram<B> {
    pub fn new(name: impl Into<String>, vertex: ShaderSource, fragment: ShaderSource) -> Self {
        Self {
            name: name.into(),
            vertex,
            fragment,
            handle: None,
            attributes: HashMap::new(),
            uniforms: HashMap::new(),
            sealed: false,
            verbose: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// When set, compile/link/registration results are logged at info level
    /// instead of debug.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    fn level(&self) -> Level {
        if self.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    /// Compiles both stages and links them.
    pub fn init(&mut self, backend: &B) -> Result<(), ShaderError> {
        if self.handle.is_some() {
            return Err(ShaderError::AlreadyInitialized {
                program: self.name.clone(),
            });
        }

        let vertex_src = self.vertex.load(&self.name, ShaderStage::Vertex)?;
        let fragment_src = self.fragment.load(&self.name, ShaderStage::Fragment)?;

        let vertex = self.compile(backend, ShaderStage::Vertex, &vertex_src)?;
        let fragment = match self.compile(backend, ShaderStage::Fragment, &fragment_src) {
            Ok(shader) => shader,
            Err(err) => {
                backend.delete_shader(vertex);
                return Err(err);
            }
        };

        let program = backend
            .link_program(vertex, fragment)
            .map_err(|log| ShaderError::Link {
                program: self.name.clone(),
                log,
            })?;
        log!(self.level(), "program `{}` linked", self.name);

        self.handle = Some(program);
        Ok(())
    }

    fn compile(
        &self,
        backend: &B,
        stage: ShaderStage,
        source: &str,
    ) -> Result<B::Shader, ShaderError> {
        let shader = backend
            .compile_shader(stage, source)
            .map_err(|log| ShaderError::Compile {
                program: self.name.clone(),
                stage,
                log,
            })?;
        log!(self.level(), "program `{}`: {stage} shader compiled", self.name);
        Ok(shader)
    }

    fn registrable(&self, kind: SymbolKind, name: &str) -> Result<B::Program, ShaderError> {
        let Some(handle) = self.handle else {
            return Err(ShaderError::NotInitialized {
                program: self.name.clone(),
            });
        };
        if self.sealed {
            return Err(ShaderError::RegistrationClosed {
                program: self.name.clone(),
                kind,
                name: name.to_string(),
            });
        }
        Ok(handle)
    }

    fn unknown(&self, kind: SymbolKind, name: &str) -> ShaderError {
        ShaderError::UnknownSymbol {
            program: self.name.clone(),
            kind,
            name: name.to_string(),
        }
    }

    fn unregistered(&self, kind: SymbolKind, name: &str) -> ShaderError {
        ShaderError::UnregisteredSymbol {
            program: self.name.clone(),
            kind,
            name: name.to_string(),
        }
    }

    /// Resolves and caches a vertex attribute location.
    pub fn add_attribute(&mut self, backend: &B, name: &str) -> Result<u32, ShaderError> {
        let handle = self.registrable(SymbolKind::Attribute, name)?;
        let location = backend
            .attribute_location(handle, name)
            .ok_or_else(|| self.unknown(SymbolKind::Attribute, name))?;
        log!(self.level(), "program `{}`: attribute {name} -> {location}", self.name);
        self.attributes.insert(name.to_string(), location);
        Ok(location)
    }

    /// Resolves and caches a uniform location. Fails if the linked program
    /// has no active uniform called `name`.
    pub fn add_uniform(&mut self, backend: &B, name: &str) -> Result<(), ShaderError> {
        let handle = self.registrable(SymbolKind::Uniform, name)?;
        let location = backend
            .uniform_location(handle, name)
            .ok_or_else(|| self.unknown(SymbolKind::Uniform, name))?;
        log!(self.level(), "program `{}`: uniform {name} -> {location:?}", self.name);
        self.uniforms.insert(name.to_string(), Some(location));
        Ok(())
    }

    /// Registers a uniform this program may not use.
    ///
    /// Compilers drop uniforms a shader never reads; such a name is kept as
    /// inactive and uploads to it do nothing. Returns whether it is active.
    pub fn add_optional_uniform(&mut self, backend: &B, name: &str) -> Result<bool, ShaderError> {
        let handle = self.registrable(SymbolKind::Uniform, name)?;
        let location = backend.uniform_location(handle, name);
        if location.is_none() {
            debug!("program `{}`: optional uniform {name} is inactive", self.name);
        }
        let active = location.is_some();
        self.uniforms.insert(name.to_string(), location);
        Ok(active)
    }

    /// Cached location of a registered attribute.
    pub fn attribute(&self, name: &str) -> Result<u32, ShaderError> {
        self.attributes
            .get(name)
            .copied()
            .ok_or_else(|| self.unregistered(SymbolKind::Attribute, name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Cached location of a registered uniform; `None` when it was
    /// registered as optional and is inactive.
    pub fn uniform(&self, name: &str) -> Result<Option<&B::UniformLocation>, ShaderError> {
        self.uniforms
            .get(name)
            .map(Option::as_ref)
            .ok_or_else(|| self.unregistered(SymbolKind::Uniform, name))
    }

    /// Makes this program current and closes registration.
    pub fn bind<'a>(&'a mut self, backend: &'a mut B) -> Result<BoundProgram<'a, B>, ShaderError> {
        let Some(handle) = self.handle else {
            return Err(ShaderError::NotInitialized {
                program: self.name.clone(),
            });
        };
        self.sealed = true;
        backend.use_program(Some(handle));
        Ok(BoundProgram {
            program: self,
            backend,
        })
    }

    /// Deletes the GPU program. Registrations are dropped with it.
    pub fn release(&mut self, backend: &B) {
        if let Some(handle) = self.handle.take() {
            backend.delete_program(handle);
            info!("program `{}` released", self.name);
        }
        self.attributes.clear();
        self.uniforms.clear();
        self.sealed = false;
    }
}

/// Proof that a program is current. Dropping it unbinds the program.
pub struct BoundProgram<'a, B: Backend> {
    program: &'a ShaderProgram<B>,
    backend: &'a mut B,
}

impl<'a, B: Backend> BoundProgram<'a, B> {
    pub fn program(&self) -> &ShaderProgram<B> {
        self.program
    }

    pub fn backend(&self) -> &B {
        &*self.backend
    }

    pub fn attribute(&self, name: &str) -> Result<u32, ShaderError> {
        self.program.attribute(name)
    }

    pub fn set_f32(&mut self, name: &str, value: f32) -> Result<(), ShaderError> {
        let location = self.program.uniform(name)?;
        self.backend.uniform_f32(location, value);
        Ok(())
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> Result<(), ShaderError> {
        let location = self.program.uniform(name)?;
        self.backend.uniform_vec3(location, value.to_array());
        Ok(())
    }

    pub fn set_mat4(&mut self, name: &str, value: &Mat4) -> Result<(), ShaderError> {
        let location = self.program.uniform(name)?;
        self.backend.uniform_mat4(location, &value.to_cols_array());
        Ok(())
    }

    /// Deactivates the program.
    pub fn unbind(self) {}
}

impl<B: Backend> Drop for BoundProgram<'_, B> {
    fn drop(&mut self) {
        self.backend.use_program(None);
    }
}
