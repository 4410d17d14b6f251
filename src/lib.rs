//! An interactive OpenGL mesh viewer built around a hierarchical transform
//! stack and pre-resolved shader programs.
//!
//! SDL2 provides the window and GL context; everything else talks to the
//! GPU through the [`gpu::Backend`] trait, which `glow::Context` implements.
//!
//! # Quick Start
//!
//! ```ignore
//! use shadeview::prelude::*;
//!
//! let config = ViewerConfig::new("resources");
//! let mut window = Window::new(&config.window, config.offline)?;
//! let mut viewer = Viewer::load(config)?;
//! viewer.init(window.gl())?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod capture;
pub mod config;
pub mod error;
pub mod gpu;
pub mod input;
pub mod light;
pub mod logging;
pub mod material;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod scene;
pub mod shader;
pub mod transform_stack;
pub mod viewer;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use error::ViewerError;
pub use transform_stack::TransformStack;
pub use viewer::Viewer;

/// Prelude module for convenient imports.
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, Modifiers};
    pub use crate::projection::Projection;

    // Configuration
    pub use crate::config::{MeshSpec, ProgramSpec, ViewerConfig, WindowConfig};

    // Errors
    pub use crate::error::{CaptureError, MeshError, ShaderError, StackError, ViewerError};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::transform_stack::TransformStack;

    // Rendering
    pub use crate::gpu::Backend;
    pub use crate::mesh::Mesh;
    pub use crate::shader::{BoundProgram, ShaderProgram, ShaderSource};

    // Scene
    pub use crate::light::Light;
    pub use crate::material::Material;
    pub use crate::scene::{Cycle, LocalOp, SceneObject, SceneState};

    // Viewer, Window & Input
    pub use crate::input::{InputAction, KeyBindings, ToggleAction, Toggles, WindowEvent};
    pub use crate::viewer::{FrameInput, Viewer};
    pub use crate::window::Window;
}
