//! Error types for every stage of the viewer.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The two programmable stages a [`crate::shader::ShaderProgram`] links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Kind of named shader input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Attribute,
    Uniform,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Attribute => write!(f, "attribute"),
            SymbolKind::Uniform => write!(f, "uniform"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("transform stack underflow: the base matrix cannot be popped")]
    Underflow,
    #[error("unbalanced transform stack: expected depth {expected}, found {found}")]
    Unbalanced { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("program `{program}`: failed to read {stage} shader {}", path.display())]
    Source {
        program: String,
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("program `{program}`: {stage} shader failed to compile:\n{log}")]
    Compile {
        program: String,
        stage: ShaderStage,
        log: String,
    },
    #[error("program `{program}` failed to link:\n{log}")]
    Link { program: String, log: String },
    #[error("program `{program}` has not been initialized")]
    NotInitialized { program: String },
    #[error("program `{program}` is already initialized")]
    AlreadyInitialized { program: String },
    #[error("program `{program}` has no active {kind} `{name}`")]
    UnknownSymbol {
        program: String,
        kind: SymbolKind,
        name: String,
    },
    #[error("program `{program}`: {kind} `{name}` was never registered")]
    UnregisteredSymbol {
        program: String,
        kind: SymbolKind,
        name: String,
    },
    #[error("program `{program}`: cannot register {kind} `{name}` after the program was bound")]
    RegistrationClosed {
        program: String,
        kind: SymbolKind,
        name: String,
    },
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to load mesh {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("mesh `{name}` contains no triangles")]
    Empty { name: String },
    #[error("mesh `{name}` has not been uploaded")]
    NotUploaded { name: String },
    #[error("mesh `{name}`: GPU upload failed: {message}")]
    Upload { name: String, message: String },
    #[error(transparent)]
    Binding(#[from] ShaderError),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("framebuffer of {width}x{height} does not match {len} bytes of pixel data")]
    InvalidFramebuffer { width: u32, height: u32, len: usize },
    #[error("failed to write {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Top-level error for viewer startup and the frame loop.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Window, GL context, or function loader failure.
    #[error("initialization failed: {0}")]
    Initialization(String),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("scene has no {what}")]
    EmptyScene { what: &'static str },
    #[error("{what} index {index} is out of range for {count} entries")]
    InvalidSelection {
        what: &'static str,
        index: usize,
        count: usize,
    },
}
