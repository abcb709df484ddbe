//! Material properties

use serde::{Deserialize, Serialize};

/// Elastic material constants for frame members
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus)
    #[serde(rename = "E")]
    pub e: f64,
    /// Shear modulus
    #[serde(rename = "G")]
    pub g: f64,
}

impl Material {
    /// Create a new material from E and G
    pub fn new(e: f64, g: f64) -> Self {
        Self { e, g }
    }

    /// Create a new isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64) -> Self {
        Self::new(e, e / (2.0 * (1.0 + nu)))
    }

    /// Structural steel in Pa
    pub fn steel() -> Self {
        Self::new(200e9, 77e9)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isotropic_material() {
        let mat = Material::isotropic(200e9, 0.3);
        let expected_g = 200e9 / (2.0 * 1.3);
        assert!((mat.g - expected_g).abs() < 1.0);
    }

    #[test]
    fn test_deserialize_uppercase_keys() {
        let mat: Material = serde_json::from_str(r#"{"E":2.05e11,"G":7.9e10}"#).unwrap();
        assert_eq!(mat, Material::new(2.05e11, 7.9e10));
    }
}
