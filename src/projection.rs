//! Perspective projection parameters.
//!
//! [`Projection`] owns the field of view, aspect ratio, and clip planes the
//! camera uses to build its GL-style projection matrix.

use crate::math::mat4::Mat4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
}

impl Default for Projection {
    /// 45 degree vertical field of view, square aspect, planes at 0.1 and 1000.
    fn default() -> Self {
        Self::from_degrees(45.0, 1.0, 0.1, 1000.0)
    }
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a projection from degrees instead of radians.
    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Updates the aspect ratio. Non-finite or non-positive ratios are
    /// ignored, which covers minimized windows reporting a zero height.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
    }

    /// Right-handed perspective matrix mapping view space to GL clip space.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn default_matches_viewer_camera() {
        let proj = Projection::default();
        assert_relative_eq!(proj.fov_y(), FRAC_PI_4, epsilon = 1e-6);
        assert_relative_eq!(proj.z_near(), 0.1);
        assert_relative_eq!(proj.z_far(), 1000.0);
    }

    #[test]
    fn zero_aspect_is_ignored() {
        let mut proj = Projection::default();
        proj.set_aspect_ratio(16.0 / 9.0);
        proj.set_aspect_ratio(0.0);
        proj.set_aspect_ratio(f32::NAN);
        assert_relative_eq!(proj.aspect_ratio(), 16.0 / 9.0);
    }

    #[test]
    fn wider_aspect_shrinks_x_scale() {
        let square = Projection::new(FRAC_PI_4, 1.0, 0.1, 100.0).matrix();
        let wide = Projection::new(FRAC_PI_4, 2.0, 0.1, 100.0).matrix();
        assert_relative_eq!(wide.get(0, 0) * 2.0, square.get(0, 0), epsilon = 1e-5);
        assert_relative_eq!(wide.get(1, 1), square.get(1, 1), epsilon = 1e-5);
    }
}
