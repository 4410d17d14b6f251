//! Point lights for the shading programs.

use crate::math::vec3::Vec3;

/// A point light. Its position is given in the same space the shaders
/// receive it in, so it does not follow the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl Light {
    pub const fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }

    /// Moves the light by `delta`.
    pub fn nudge(&mut self, delta: Vec3) {
        self.position = self.position + delta;
    }

    /// A bright white key light and a dim yellow fill light.
    pub fn presets() -> Vec<Light> {
        vec![
            Light::new(Vec3::new(1.0, 1.0, 1.0), Vec3::splat(0.8)),
            Light::new(Vec3::new(-1.0, 1.0, 1.0), Vec3::new(0.2, 0.2, 0.0)),
        ]
    }

    /// Name of the position uniform for the light at `index` (zero-based).
    pub fn position_uniform(index: usize) -> String {
        format!("light{}Pos", index + 1)
    }

    /// Name of the color uniform for the light at `index` (zero-based).
    pub fn color_uniform(index: usize) -> String {
        format!("light{}Color", index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_moves_position_only() {
        let mut light = Light::new(Vec3::new(1.0, 1.0, 1.0), Vec3::splat(0.8));
        light.nudge(Vec3::new(-1.0, 0.0, 0.0));
        light.nudge(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(light.position, Vec3::new(0.0, 3.0, 1.0));
        assert_eq!(light.color, Vec3::splat(0.8));
    }

    #[test]
    fn uniform_names_are_one_based() {
        assert_eq!(Light::position_uniform(0), "light1Pos");
        assert_eq!(Light::color_uniform(1), "light2Color");
    }
}
