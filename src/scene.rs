//! Scene contents and the user's current selections.
//!
//! [`SceneState`] owns every shading program, material, light, and drawable
//! object, plus a wrapping [`Cycle`] cursor per selectable list. Input
//! actions mutate it between frames; the render loop reads it once per frame.

use log::info;

use crate::error::ViewerError;
use crate::gpu::Backend;
use crate::input::InputAction;
use crate::light::Light;
use crate::material::Material;
use crate::math::{Mat4, Vec3};
use crate::mesh::Mesh;
use crate::shader::ShaderProgram;
use crate::transform_stack::TransformStack;

/// A selection index over a non-empty list that wraps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    index: usize,
    count: usize,
}

impl Cycle {
    /// Fails with `EmptyScene` when `count` is zero and with
    /// `InvalidSelection` when `start` is out of range.
    pub fn new(what: &'static str, count: usize, start: usize) -> Result<Self, ViewerError> {
        if count == 0 {
            return Err(ViewerError::EmptyScene { what });
        }
        if start >= count {
            return Err(ViewerError::InvalidSelection {
                what,
                index: start,
                count,
            });
        }
        Ok(Self {
            index: start,
            count,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Advances, wrapping from the last entry to the first.
    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.count;
        self.index
    }

    /// Steps back, wrapping from the first entry to the last.
    pub fn previous(&mut self) -> usize {
        self.index = if self.index == 0 {
            self.count - 1
        } else {
            self.index - 1
        };
        self.index
    }
}

/// One step of an object's local transform, applied to the model-view
/// stack in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalOp {
    Translate(Vec3),
    Scale(Vec3),
    Rotate { angle: f32, axis: Vec3 },
    /// Rotation by `rate * t` radians.
    Spin { rate: f32, axis: Vec3 },
    /// Shear of x into y by `amplitude * cos(t)`.
    Shear { amplitude: f32 },
    Multiply(Mat4),
}

impl LocalOp {
    pub fn apply(&self, stack: &mut TransformStack, time: f32) {
        match *self {
            LocalOp::Translate(offset) => {
                stack.translate(offset);
            }
            LocalOp::Scale(factors) => {
                stack.scale(factors);
            }
            LocalOp::Rotate { angle, axis } => {
                stack.rotate(angle, axis);
            }
            LocalOp::Spin { rate, axis } => {
                stack.rotate(rate * time, axis);
            }
            LocalOp::Shear { amplitude } => {
                let mut shear = Mat4::identity();
                shear.set(1, 0, amplitude * time.cos());
                stack.multiply(&shear);
            }
            LocalOp::Multiply(m) => {
                stack.multiply(&m);
            }
        }
    }
}

/// A mesh and the local transform that places it.
pub struct SceneObject<B: Backend> {
    pub mesh: Mesh<B>,
    pub placement: Vec<LocalOp>,
}

impl<B: Backend> SceneObject<B> {
    pub fn new(mesh: Mesh<B>, placement: Vec<LocalOp>) -> Self {
        Self { mesh, placement }
    }

    /// Applies the placement to the top of `stack`.
    pub fn place(&self, stack: &mut TransformStack, time: f32) {
        for op in &self.placement {
            op.apply(stack, time);
        }
    }
}

/// Borrowed view of everything one frame draws with.
pub struct FrameScene<'a, B: Backend> {
    pub program: &'a mut ShaderProgram<B>,
    pub material: &'a Material,
    pub lights: &'a [Light],
    pub objects: &'a [SceneObject<B>],
}

pub struct SceneState<B: Backend> {
    programs: Vec<ShaderProgram<B>>,
    materials: Vec<Material>,
    lights: Vec<Light>,
    objects: Vec<SceneObject<B>>,
    program: Cycle,
    material: Cycle,
    light: Cycle,
    nudge_step: f32,
}

impl<B: Backend> SceneState<B> {
    pub fn new(
        programs: Vec<ShaderProgram<B>>,
        materials: Vec<Material>,
        lights: Vec<Light>,
        objects: Vec<SceneObject<B>>,
        initial_program: usize,
        nudge_step: f32,
    ) -> Result<Self, ViewerError> {
        let program = Cycle::new("shader programs", programs.len(), initial_program)?;
        let material = Cycle::new("materials", materials.len(), 0)?;
        let light = Cycle::new("lights", lights.len(), 0)?;
        Ok(Self {
            programs,
            materials,
            lights,
            objects,
            program,
            material,
            light,
            nudge_step,
        })
    }

    pub fn program_index(&self) -> usize {
        self.program.index()
    }

    pub fn material_index(&self) -> usize {
        self.material.index()
    }

    pub fn light_index(&self) -> usize {
        self.light.index()
    }

    pub fn active_program(&self) -> &ShaderProgram<B> {
        &self.programs[self.program.index()]
    }

    pub fn active_material(&self) -> &Material {
        &self.materials[self.material.index()]
    }

    pub fn selected_light(&self) -> &Light {
        &self.lights[self.light.index()]
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn objects(&self) -> &[SceneObject<B>] {
        &self.objects
    }

    pub fn programs(&self) -> &[ShaderProgram<B>] {
        &self.programs
    }

    pub fn programs_mut(&mut self) -> &mut [ShaderProgram<B>] {
        &mut self.programs
    }

    pub fn objects_mut(&mut self) -> &mut [SceneObject<B>] {
        &mut self.objects
    }

    /// Splits the scene into the parts a frame needs at once.
    pub fn frame(&mut self) -> FrameScene<'_, B> {
        FrameScene {
            program: &mut self.programs[self.program.index()],
            material: &self.materials[self.material.index()],
            lights: &self.lights,
            objects: &self.objects,
        }
    }

    /// Applies a selection or light action. Returns `false` for actions the
    /// scene does not handle.
    pub fn apply(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::NextProgram => {
                self.program.next();
                info!("program: {}", self.active_program().name());
            }
            InputAction::PreviousProgram => {
                self.program.previous();
                info!("program: {}", self.active_program().name());
            }
            InputAction::NextMaterial => {
                let index = self.material.next();
                info!("material: {index}");
            }
            InputAction::PreviousMaterial => {
                let index = self.material.previous();
                info!("material: {index}");
            }
            InputAction::NextLight => {
                let index = self.light.next();
                info!("light: {index}");
            }
            InputAction::PreviousLight => {
                let index = self.light.previous();
                info!("light: {index}");
            }
            InputAction::NudgeLight(direction) => {
                let step = direction * self.nudge_step;
                let light = &mut self.lights[self.light.index()];
                light.nudge(step);
                log::debug!("light {} moved to {:?}", self.light.index(), light.position);
            }
            InputAction::Toggle(_) | InputAction::Quit => return false,
        }
        true
    }
}
