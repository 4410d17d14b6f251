//! Mouse-driven orbit camera.
//!
//! # Coordinate System
//!
//! Right-handed, GL style: X right, Y up, the camera looks down -Z. The view
//! transform is `T(translations) * Rx(pitch) * Ry(yaw)`, so the scene orbits
//! around the origin and the camera sits `-translations.z` units away.
//!
//! # Controls
//!
//! A press picks the drag mode from the held modifiers; later motion events
//! update the camera by the pointer delta since the previous event.
//!
//! - **Rotate** (no modifier): yaw from horizontal motion, pitch from vertical
//! - **Translate** (shift): pan, scaled by the current distance
//! - **Scale** (ctrl): zoom by moving vertically

use crate::math::vec3::Vec3;
use crate::projection::Projection;
use crate::transform_stack::TransformStack;

/// Modifier keys held when a mouse button was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Translate,
    Scale,
}

impl DragMode {
    fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.shift {
            DragMode::Translate
        } else if modifiers.ctrl {
            DragMode::Scale
        } else {
            DragMode::Rotate
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    projection: Projection,
    /// Yaw (x) and pitch (y) in radians.
    rotations: (f32, f32),
    translations: Vec3,
    rfactor: f32,
    tfactor: f32,
    sfactor: f32,
    mouse_prev: (f32, f32),
    mode: DragMode,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            projection: Projection::default(),
            rotations: (0.0, 0.0),
            translations: Vec3::new(0.0, 0.0, -5.0),
            rfactor: 0.01,
            tfactor: 0.001,
            sfactor: 0.005,
            mouse_prev: (0.0, 0.0),
            mode: DragMode::Rotate,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.projection.set_aspect_ratio(aspect);
    }

    /// Places the camera `distance` units in front of the origin.
    pub fn set_init_distance(&mut self, distance: f32) {
        self.translations.z = -distance.abs();
    }

    /// Returns `(yaw, pitch)` in radians.
    pub fn rotations(&self) -> (f32, f32) {
        self.rotations
    }

    pub fn translations(&self) -> Vec3 {
        self.translations
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Starts a drag at `(x, y)` in window pixels.
    pub fn mouse_clicked(&mut self, x: f32, y: f32, modifiers: Modifiers) {
        self.mouse_prev = (x, y);
        self.mode = DragMode::from_modifiers(modifiers);
    }

    /// Continues the current drag to `(x, y)`.
    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        let dx = x - self.mouse_prev.0;
        let dy = y - self.mouse_prev.1;
        match self.mode {
            DragMode::Rotate => {
                self.rotations.0 += self.rfactor * dx;
                self.rotations.1 += self.rfactor * dy;
            }
            DragMode::Translate => {
                let z = self.translations.z;
                self.translations.x -= z * self.tfactor * dx;
                self.translations.y += z * self.tfactor * dy;
            }
            DragMode::Scale => {
                self.translations.z *= 1.0 - self.sfactor * dy;
            }
        }
        self.mouse_prev = (x, y);
    }

    /// Multiplies the perspective matrix onto the top of `stack`.
    pub fn apply_projection_matrix(&self, stack: &mut TransformStack) {
        stack.multiply(&self.projection.matrix());
    }

    /// Composes the view transform onto the top of `stack`.
    pub fn apply_view_matrix(&self, stack: &mut TransformStack) {
        let (yaw, pitch) = self.rotations;
        stack
            .translate(self.translations)
            .rotate(pitch, Vec3::X)
            .rotate(yaw, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::mat4::Mat4;
    use approx::assert_relative_eq;

    #[test]
    fn init_distance_is_always_in_front() {
        let mut camera = Camera::new();
        camera.set_init_distance(2.0);
        assert_relative_eq!(camera.translations().z, -2.0);
        camera.set_init_distance(-3.0);
        assert_relative_eq!(camera.translations().z, -3.0);
    }

    #[test]
    fn plain_drag_rotates() {
        let mut camera = Camera::new();
        camera.mouse_clicked(100.0, 100.0, Modifiers::default());
        camera.mouse_moved(150.0, 80.0);
        let (yaw, pitch) = camera.rotations();
        assert_relative_eq!(yaw, 0.5);
        assert_relative_eq!(pitch, -0.2);
        assert_eq!(camera.mode(), DragMode::Rotate);
    }

    #[test]
    fn shift_drag_pans_by_distance() {
        let mut camera = Camera::new();
        camera.set_init_distance(2.0);
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        camera.mouse_clicked(0.0, 0.0, shift);
        camera.mouse_moved(10.0, 20.0);
        let t = camera.translations();
        assert_relative_eq!(t.x, 0.02, epsilon = 1e-6);
        assert_relative_eq!(t.y, -0.04, epsilon = 1e-6);
        assert_relative_eq!(t.z, -2.0);
    }

    #[test]
    fn ctrl_drag_zooms() {
        let mut camera = Camera::new();
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        camera.mouse_clicked(0.0, 0.0, ctrl);
        camera.mouse_moved(0.0, 100.0);
        assert_relative_eq!(camera.translations().z, -2.5, epsilon = 1e-5);
    }

    #[test]
    fn deltas_are_relative_to_previous_event() {
        let mut camera = Camera::new();
        camera.mouse_clicked(0.0, 0.0, Modifiers::default());
        camera.mouse_moved(10.0, 0.0);
        camera.mouse_moved(10.0, 0.0);
        assert_relative_eq!(camera.rotations().0, 0.1);
    }

    #[test]
    fn view_matrix_composes_translate_then_rotations() {
        let mut camera = Camera::new();
        camera.set_init_distance(2.0);
        camera.mouse_clicked(0.0, 0.0, Modifiers::default());
        camera.mouse_moved(30.0, 40.0);

        let mut stack = TransformStack::new();
        camera.apply_view_matrix(&mut stack);

        let expected = Mat4::translation(Vec3::new(0.0, 0.0, -2.0))
            * Mat4::rotation(0.4, Vec3::X)
            * Mat4::rotation(0.3, Vec3::Y);
        assert_relative_eq!(*stack.top(), expected, epsilon = 1e-6);
    }

    #[test]
    fn origin_ends_up_in_front_of_camera() {
        let mut camera = Camera::new();
        camera.set_init_distance(2.0);
        let mut stack = TransformStack::new();
        camera.apply_view_matrix(&mut stack);
        let origin = *stack.top() * Vec3::ZERO;
        assert_relative_eq!(origin.z, -2.0);
    }

    #[test]
    fn projection_uses_current_aspect() {
        let mut camera = Camera::new();
        camera.set_aspect(2.0);
        let mut stack = TransformStack::new();
        camera.apply_projection_matrix(&mut stack);
        assert_relative_eq!(*stack.top(), camera.projection().matrix());
        assert_relative_eq!(camera.projection().aspect_ratio(), 2.0);
    }
}
