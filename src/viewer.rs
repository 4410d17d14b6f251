//! The viewer application object and its per-frame render pass.
//!
//! [`Viewer`] owns the scene, camera, toggles, and key bindings. The binary
//! drives it with a blocking loop:
//!
//! ```ignore
//! viewer.init(&gl)?;
//! while !viewer.should_close() {
//!     viewer.render(&mut gl, window.frame_input())?;
//!     window.swap();
//!     for event in window.poll_events() {
//!         viewer.handle_event(event);
//!     }
//! }
//! viewer.release(&gl);
//! ```

use log::{debug, info, warn};

use crate::camera::Camera;
use crate::capture::capture_framebuffer;
use crate::config::ViewerConfig;
use crate::error::{ShaderError, ViewerError};
use crate::gpu::{check_errors, Backend};
use crate::input::{InputAction, KeyBindings, ToggleAction, Toggles, WindowEvent};
use crate::light::Light;
use crate::material::Material;
use crate::math::Mat4;
use crate::mesh::{Mesh, NORMAL_ATTRIBUTE, POSITION_ATTRIBUTE};
use crate::scene::{FrameScene, SceneObject, SceneState};
use crate::shader::{BoundProgram, ShaderProgram};
use crate::transform_stack::TransformStack;

/// Uniforms every program must use.
pub const REQUIRED_UNIFORMS: [&str; 3] = ["MV", "P", "IT"];
/// Material uniforms, which unlit programs may leave out.
pub const MATERIAL_UNIFORMS: [&str; 4] = ["ka", "kd", "ks", "s"];

/// What the window system reports for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Framebuffer size in pixels.
    pub width: u32,
    pub height: u32,
    /// Seconds since startup.
    pub time: f32,
}

pub struct Viewer<B: Backend> {
    config: ViewerConfig,
    scene: SceneState<B>,
    camera: Camera,
    toggles: Toggles,
    keys: KeyBindings,
    projection: TransformStack,
    model_view: TransformStack,
    should_close: bool,
}

impl<B: Backend> Viewer<B> {
    /// Loads meshes from the resource directory and sets up the stock scene.
    /// No GPU work happens until [`Viewer::init`].
    pub fn load(config: ViewerConfig) -> Result<Self, ViewerError> {
        let programs = config
            .programs
            .iter()
            .map(|spec| {
                ShaderProgram::new(
                    spec.name.clone(),
                    spec.vertex_source(&config.resource_dir),
                    spec.fragment_source(&config.resource_dir),
                )
            })
            .collect();

        let mut objects = Vec::with_capacity(config.meshes.len());
        for (spec, path) in config.meshes.iter().zip(config.mesh_paths()) {
            let mesh = Mesh::from_obj(path)?;
            objects.push(SceneObject::new(mesh, spec.placement.clone()));
        }

        let scene = SceneState::new(
            programs,
            Material::presets(),
            Light::presets(),
            objects,
            config.initial_program,
            config.nudge_step,
        )?;
        Ok(Self::from_scene(config, scene))
    }

    pub fn from_scene(config: ViewerConfig, scene: SceneState<B>) -> Self {
        let mut camera = Camera::new();
        camera.set_init_distance(config.camera_distance);
        Self {
            config,
            scene,
            camera,
            toggles: Toggles::new(),
            keys: KeyBindings::default(),
            projection: TransformStack::new(),
            model_view: TransformStack::new(),
            should_close: false,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneState<B> {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn toggles(&self) -> &Toggles {
        &self.toggles
    }

    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.keys
    }

    /// Projection stack. Holds only its base entry between frames.
    pub fn projection_stack(&self) -> &TransformStack {
        &self.projection
    }

    /// Model-view stack. Holds only its base entry between frames.
    pub fn model_view_stack(&self) -> &TransformStack {
        &self.model_view
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn request_close(&mut self) {
        self.should_close = true;
    }

    /// Compiles every program, registers its symbols, and uploads meshes.
    pub fn init(&mut self, backend: &B) -> Result<(), ViewerError> {
        backend.set_clear_color(self.config.clear_color);
        backend.set_depth_test(true);

        let light_count = self.scene.lights().len();
        let verbose = self.config.verbose_shaders;
        for program in self.scene.programs_mut() {
            program.set_verbose(verbose);
            program.init(backend)?;
            register_symbols(program, backend, light_count)?;
            program.set_verbose(false);
        }

        for object in self.scene.objects_mut() {
            object.mesh.init(backend)?;
        }

        check_errors(backend, "init");
        info!(
            "scene ready: {} programs, {} objects",
            self.scene.programs().len(),
            self.scene.objects().len()
        );
        Ok(())
    }

    /// Draws one frame. In offline mode the frame is also written to the
    /// configured output file and the viewer asks to close.
    pub fn render(&mut self, backend: &mut B, frame: FrameInput) -> Result<(), ViewerError> {
        backend.set_viewport(frame.width, frame.height);
        backend.clear();
        backend.set_face_culling(self.toggles.is_on(ToggleAction::Culling));
        backend.set_wireframe(self.toggles.is_on(ToggleAction::Wireframe));

        if frame.height > 0 {
            self.camera
                .set_aspect(frame.width as f32 / frame.height as f32);
        }
        let time = if self.toggles.is_on(ToggleAction::Animation) {
            frame.time
        } else {
            0.0
        };

        self.projection.push();
        self.camera.apply_projection_matrix(&mut self.projection);
        self.model_view.push();
        self.camera.apply_view_matrix(&mut self.model_view);

        {
            let FrameScene {
                program,
                material,
                lights,
                objects,
            } = self.scene.frame();
            let mut bound = program.bind(backend)?;

            upload_material(&mut bound, material)?;
            for (index, light) in lights.iter().enumerate() {
                bound.set_vec3(&Light::position_uniform(index), light.position)?;
                bound.set_vec3(&Light::color_uniform(index), light.color)?;
            }
            bound.set_mat4("P", self.projection.top())?;

            for object in objects {
                self.model_view.scoped(|mv| -> Result<(), ViewerError> {
                    object.place(mv, time);
                    bound.set_mat4("MV", mv.top())?;
                    let it = normal_matrix(mv.top(), object.mesh.name());
                    bound.set_mat4("IT", &it)?;
                    object.mesh.draw(&bound)?;
                    Ok(())
                })??;
            }

            bound.unbind();
        }

        self.model_view.pop()?;
        self.projection.pop()?;
        self.model_view.ensure_base()?;
        self.projection.ensure_base()?;
        check_errors(backend, "render");

        if self.config.offline {
            capture_framebuffer(backend, frame.width, frame.height, &self.config.output)?;
            check_errors(backend, "capture");
            self.request_close();
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Quit => self.request_close(),
            WindowEvent::Char(key) => match self.keys.action_for(key) {
                Some(InputAction::Toggle(action)) => {
                    let on = self.toggles.toggle(action);
                    info!("{action:?}: {}", if on { "on" } else { "off" });
                }
                Some(InputAction::Quit) => self.request_close(),
                Some(action) => {
                    self.scene.apply(action);
                }
                None => {}
            },
            WindowEvent::MousePressed { x, y, modifiers } => {
                self.camera.mouse_clicked(x, y, modifiers);
            }
            WindowEvent::MouseDragged { x, y } => self.camera.mouse_moved(x, y),
            WindowEvent::Resized { width, height } => {
                debug!("framebuffer resized to {width}x{height}");
            }
        }
    }

    /// Frees GPU programs and buffers.
    pub fn release(&mut self, backend: &B) {
        for object in self.scene.objects_mut() {
            object.mesh.release(backend);
        }
        for program in self.scene.programs_mut() {
            program.release(backend);
        }
    }
}

fn register_symbols<B: Backend>(
    program: &mut ShaderProgram<B>,
    backend: &B,
    light_count: usize,
) -> Result<(), ShaderError> {
    program.add_attribute(backend, POSITION_ATTRIBUTE)?;
    match program.add_attribute(backend, NORMAL_ATTRIBUTE) {
        Ok(_) => {}
        Err(ShaderError::UnknownSymbol { .. }) => {
            debug!("program `{}` does not read normals", program.name());
        }
        Err(err) => return Err(err),
    }

    for name in REQUIRED_UNIFORMS {
        program.add_uniform(backend, name)?;
    }
    for name in MATERIAL_UNIFORMS {
        program.add_optional_uniform(backend, name)?;
    }
    for index in 0..light_count {
        program.add_optional_uniform(backend, &Light::position_uniform(index))?;
        program.add_optional_uniform(backend, &Light::color_uniform(index))?;
    }
    Ok(())
}

fn upload_material<B: Backend>(
    bound: &mut BoundProgram<'_, B>,
    material: &Material,
) -> Result<(), ShaderError> {
    bound.set_vec3("ka", material.ka)?;
    bound.set_vec3("kd", material.kd)?;
    bound.set_vec3("ks", material.ks)?;
    bound.set_f32("s", material.shininess)
}

/// Inverse-transpose of `model_view`, or identity when it is singular.
fn normal_matrix(model_view: &Mat4, object: &str) -> Mat4 {
    model_view.inverse_transpose().unwrap_or_else(|| {
        warn!("model-view matrix of `{object}` is singular, using identity normals");
        Mat4::identity()
    })
}
