//! Surface reflectance parameters uploaded as `ka`, `kd`, `ks`, and `s`.

use crate::math::vec3::Vec3;

/// Ambient, diffuse, and specular colors plus specular shininess.
///
/// The default material is all zeros, which renders black under every
/// lighting program.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Material {
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub shininess: f32,
}

impl Material {
    pub const fn new(ka: Vec3, kd: Vec3, ks: Vec3, shininess: f32) -> Self {
        Self {
            ka,
            kd,
            ks,
            shininess,
        }
    }

    /// The three materials the viewer starts with: warm shiny, blue with a
    /// green highlight, and matte lavender.
    pub fn presets() -> Vec<Material> {
        let ambient = Vec3::splat(0.2);
        vec![
            Material::new(
                ambient,
                Vec3::new(0.8, 0.7, 0.7),
                Vec3::new(1.0, 0.9, 0.8),
                200.0,
            ),
            Material::new(ambient, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0), 200.0),
            Material::new(ambient, Vec3::new(0.5, 0.5, 1.0), Vec3::splat(0.01), 200.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_black() {
        let m = Material::default();
        assert_eq!(m.ka, Vec3::ZERO);
        assert_eq!(m.kd, Vec3::ZERO);
        assert_eq!(m.ks, Vec3::ZERO);
        assert_eq!(m.shininess, 0.0);
    }

    #[test]
    fn presets_share_ambient() {
        let presets = Material::presets();
        assert_eq!(presets.len(), 3);
        assert!(presets.iter().all(|m| m.ka == Vec3::splat(0.2)));
    }
}
