//! Triangle meshes: OBJ loading, GPU upload, and drawing.
//!
//! Geometry is stored as a non-indexed triangle list (three vertices per
//! face) with one position and one normal per vertex.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::MeshError;
use crate::gpu::{Backend, VertexStream};
use crate::math::Vec3;
use crate::shader::BoundProgram;

/// Attribute that receives vertex positions. Every program must register it.
pub const POSITION_ATTRIBUTE: &str = "aPos";
/// Attribute that receives vertex normals, when the program registered it.
pub const NORMAL_ATTRIBUTE: &str = "aNor";

struct GpuMesh<B: Backend> {
    vertex_array: B::VertexArray,
    positions: B::Buffer,
    normals: B::Buffer,
}

pub struct Mesh<B: Backend> {
    name: String,
    positions: Vec<f32>,
    normals: Vec<f32>,
    gpu: Option<GpuMesh<B>>,
}

impl<B: Backend> Mesh<B> {
    /// Builds a mesh from flat `xyz` arrays.
    ///
    /// When `normals` does not have one entry per position, flat face
    /// normals are generated instead.
    pub fn from_buffers(
        name: impl Into<String>,
        positions: Vec<f32>,
        normals: Vec<f32>,
    ) -> Result<Self, MeshError> {
        let name = name.into();
        let vertex_count = positions.len() / 3;
        if vertex_count < 3 || positions.len() % 9 != 0 {
            return Err(MeshError::Empty { name });
        }
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            debug!("mesh `{name}` has no usable normals, generating face normals");
            face_normals(&positions)
        };
        Ok(Self {
            name,
            positions,
            normals,
            gpu: None,
        })
    }

    /// Loads every object in an OBJ file into one mesh.
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        };
        let (models, _materials) =
            tobj::load_obj(path, &options).map_err(|source| MeshError::Load {
                path: PathBuf::from(path),
                source,
            })?;

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut has_normals = true;
        for model in &models {
            let mesh = &model.mesh;
            let with_normals = mesh.normals.len() == mesh.positions.len();
            has_normals &= with_normals;
            for &index in &mesh.indices {
                let i = index as usize * 3;
                positions.extend_from_slice(&mesh.positions[i..i + 3]);
                if with_normals {
                    normals.extend_from_slice(&mesh.normals[i..i + 3]);
                }
            }
        }
        if !has_normals {
            normals.clear();
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mesh = Self::from_buffers(name, positions, normals)?;
        info!(
            "loaded mesh `{}` ({} triangles) from {}",
            mesh.name,
            mesh.triangle_count(),
            path.display()
        );
        Ok(mesh)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Uploads vertex data to the GPU. Calling it again is a no-op.
    pub fn init(&mut self, backend: &B) -> Result<(), MeshError> {
        if self.gpu.is_some() {
            return Ok(());
        }
        let upload_error = |message: String| MeshError::Upload {
            name: self.name.clone(),
            message,
        };
        let positions = backend
            .create_vertex_buffer(&self.positions)
            .map_err(upload_error)?;
        let normals = match backend.create_vertex_buffer(&self.normals) {
            Ok(buffer) => buffer,
            Err(message) => {
                backend.delete_buffer(positions);
                return Err(upload_error(message));
            }
        };
        let vertex_array = match backend.create_vertex_array() {
            Ok(vertex_array) => vertex_array,
            Err(message) => {
                backend.delete_buffer(positions);
                backend.delete_buffer(normals);
                return Err(upload_error(message));
            }
        };
        self.gpu = Some(GpuMesh {
            vertex_array,
            positions,
            normals,
        });
        Ok(())
    }

    /// Draws the mesh with the currently bound program's attributes.
    pub fn draw(&self, program: &BoundProgram<'_, B>) -> Result<(), MeshError> {
        let gpu = self.gpu.as_ref().ok_or_else(|| MeshError::NotUploaded {
            name: self.name.clone(),
        })?;

        let mut streams = vec![VertexStream {
            location: program.attribute(POSITION_ATTRIBUTE)?,
            buffer: gpu.positions,
            components: 3,
        }];
        if program.program().has_attribute(NORMAL_ATTRIBUTE) {
            streams.push(VertexStream {
                location: program.attribute(NORMAL_ATTRIBUTE)?,
                buffer: gpu.normals,
                components: 3,
            });
        }

        program
            .backend()
            .draw_triangles(gpu.vertex_array, &streams, self.vertex_count());
        Ok(())
    }

    /// Frees the GPU buffers. The CPU copy stays, so `init` can upload again.
    pub fn release(&mut self, backend: &B) {
        if let Some(gpu) = self.gpu.take() {
            backend.delete_vertex_array(gpu.vertex_array);
            backend.delete_buffer(gpu.positions);
            backend.delete_buffer(gpu.normals);
        }
    }
}

fn face_normals(positions: &[f32]) -> Vec<f32> {
    let mut normals = Vec::with_capacity(positions.len());
    for tri in positions.chunks_exact(9) {
        let a = Vec3::new(tri[0], tri[1], tri[2]);
        let b = Vec3::new(tri[3], tri[4], tri[5]);
        let c = Vec3::new(tri[6], tri[7], tri[8]);
        let n = (b - a).cross(c - a).normalize();
        for _ in 0..3 {
            normals.extend_from_slice(&n.to_array());
        }
    }
    normals
}
