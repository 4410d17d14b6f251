//! Startup configuration for the viewer.
//!
//! Every field has a default matching the stock scene: four shading
//! programs, the bunny and teapot meshes, three materials, two lights.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use crate::math::Vec3;
use crate::scene::LocalOp;
use crate::shader::ShaderSource;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("shadeview"),
            width: 1920,
            height: 1080,
            vsync: true,
        }
    }
}

/// A shading program stored as `<stem>_vert.glsl` / `<stem>_frag.glsl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSpec {
    pub name: String,
    pub stem: String,
}

impl ProgramSpec {
    pub fn new(name: impl Into<String>, stem: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stem: stem.into(),
        }
    }

    pub fn vertex_source(&self, resource_dir: &Path) -> ShaderSource {
        ShaderSource::File(resource_dir.join(format!("{}_vert.glsl", self.stem)))
    }

    pub fn fragment_source(&self, resource_dir: &Path) -> ShaderSource {
        ShaderSource::File(resource_dir.join(format!("{}_frag.glsl", self.stem)))
    }
}

/// An OBJ file relative to the resource directory and where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSpec {
    pub path: PathBuf,
    pub placement: Vec<LocalOp>,
}

impl MeshSpec {
    pub fn new(path: impl Into<PathBuf>, placement: Vec<LocalOp>) -> Self {
        Self {
            path: path.into(),
            placement,
        }
    }

    /// Bunny on the left, spinning about Y.
    pub fn bunny() -> Self {
        Self::new(
            "bunny.obj",
            vec![
                LocalOp::Translate(Vec3::new(-0.5, -0.5, 0.0)),
                LocalOp::Scale(Vec3::splat(0.5)),
                LocalOp::Spin {
                    rate: 1.0,
                    axis: Vec3::Y,
                },
            ],
        )
    }

    /// Teapot on the right, facing backwards and shearing.
    pub fn teapot() -> Self {
        Self::new(
            "teapot.obj",
            vec![
                LocalOp::Translate(Vec3::new(0.5, 0.0, 0.0)),
                LocalOp::Scale(Vec3::splat(0.5)),
                LocalOp::Shear { amplitude: 0.5 },
                LocalOp::Rotate {
                    angle: PI,
                    axis: Vec3::Y,
                },
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub resource_dir: PathBuf,
    pub window: WindowConfig,
    /// Render a single frame, write it to `output`, and exit.
    pub offline: bool,
    pub output: PathBuf,
    pub clear_color: [f32; 4],
    pub camera_distance: f32,
    /// Distance a light moves per nudge key press.
    pub nudge_step: f32,
    pub initial_program: usize,
    pub programs: Vec<ProgramSpec>,
    /// Drawn in order.
    pub meshes: Vec<MeshSpec>,
    /// Log shader compilation and symbol registration at info level.
    pub verbose_shaders: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("."),
            window: WindowConfig::default(),
            offline: false,
            output: PathBuf::from("output.png"),
            clear_color: [0.0, 0.0, 0.0, 0.0],
            camera_distance: 2.0,
            nudge_step: 1.0,
            initial_program: 1,
            programs: vec![
                ProgramSpec::new("normal", "normal"),
                ProgramSpec::new("Blinn-Phong", "Blinn-Phong"),
                ProgramSpec::new("silhouette", "Silhouette"),
                ProgramSpec::new("cel", "Cel"),
            ],
            meshes: vec![MeshSpec::bunny(), MeshSpec::teapot()],
            verbose_shaders: true,
        }
    }
}

impl ViewerConfig {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn mesh_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.meshes.iter().map(|m| self.resource_dir.join(&m.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_blinn_phong() {
        let config = ViewerConfig::default();
        assert_eq!(config.programs[config.initial_program].name, "Blinn-Phong");
        assert_eq!(config.output, PathBuf::from("output.png"));
        assert_eq!((config.window.width, config.window.height), (1920, 1080));
    }

    #[test]
    fn sources_resolve_inside_resource_dir() {
        let spec = ProgramSpec::new("cel", "Cel");
        assert_eq!(
            spec.vertex_source(Path::new("res")),
            ShaderSource::File(PathBuf::from("res/Cel_vert.glsl"))
        );
        assert_eq!(
            spec.fragment_source(Path::new("res")),
            ShaderSource::File(PathBuf::from("res/Cel_frag.glsl"))
        );
    }

    #[test]
    fn mesh_paths_are_joined() {
        let config = ViewerConfig::new("/data").with_offline(true);
        let paths: Vec<_> = config.mesh_paths().collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/data/bunny.obj"), PathBuf::from("/data/teapot.obj")]
        );
        assert!(config.offline);
    }
}
