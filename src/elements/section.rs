//! Section properties for frame elements

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Cross-section properties for frame elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area
    #[serde(rename = "Ax")]
    pub ax: f64,
    /// Shear area in local y (zero = no shear deformation in y)
    #[serde(rename = "Ay", default)]
    pub ay: f64,
    /// Shear area in local z (zero = no shear deformation in z)
    #[serde(rename = "Az", default)]
    pub az: f64,
    /// Moment of inertia about local y-axis (strong axis for H shapes)
    #[serde(rename = "Iy")]
    pub iy: f64,
    /// Moment of inertia about local z-axis (weak axis for H shapes)
    #[serde(rename = "Iz")]
    pub iz: f64,
    /// Torsional constant
    #[serde(rename = "J")]
    pub j: f64,
    /// Elastic section modulus about y
    #[serde(rename = "Zy", default, skip_serializing_if = "Option::is_none")]
    pub zy: Option<f64>,
    /// Elastic section modulus about z
    #[serde(rename = "Zz", default, skip_serializing_if = "Option::is_none")]
    pub zz: Option<f64>,
    /// Centroid offset along the depth, measured from the flange face (tee)
    #[serde(rename = "Cy", default, skip_serializing_if = "Option::is_none")]
    pub cy: Option<f64>,
    /// Centroid offset along the width, measured from the web back (channel)
    #[serde(rename = "Cz", default, skip_serializing_if = "Option::is_none")]
    pub cz: Option<f64>,
}

impl Section {
    /// Create a new section with basic properties and no shear areas
    pub fn new(ax: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self {
            ax,
            ay: 0.0,
            az: 0.0,
            iy,
            iz,
            j,
            zy: None,
            zz: None,
            cy: None,
            cz: None,
        }
    }

    /// Set the shear areas used by the Timoshenko correction
    pub fn with_shear_areas(mut self, ay: f64, az: f64) -> Self {
        self.ay = ay;
        self.az = az;
        self
    }

    /// Radius of gyration about the y-axis
    pub fn ry(&self) -> f64 {
        (self.iy / self.ax).sqrt()
    }

    /// Radius of gyration about the z-axis
    pub fn rz(&self) -> f64 {
        (self.iz / self.ax).sqrt()
    }

    /// Polar moment of inertia
    pub fn ip(&self) -> f64 {
        self.iy + self.iz
    }

    /// Reject non-physical properties
    pub fn validate(&self) -> FrameResult<()> {
        let all = [self.ax, self.ay, self.az, self.iy, self.iz, self.j];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(FrameError::InvalidGeometry(
                "section properties must be finite".to_string(),
            ));
        }
        if self.ax <= 0.0 {
            return Err(FrameError::InvalidGeometry(format!(
                "section area must be positive, got {}",
                self.ax
            )));
        }
        if self.iy < 0.0 || self.iz < 0.0 || self.j < 0.0 || self.ay < 0.0 || self.az < 0.0 {
            return Err(FrameError::InvalidGeometry(
                "section inertias and shear areas must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_of_gyration() {
        let section = Section::new(4.0, 16.0, 36.0, 1.0);
        assert!((section.ry() - 2.0).abs() < 1e-12);
        assert!((section.rz() - 3.0).abs() < 1e-12);
        assert!((section.ip() - 52.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_zero_area() {
        assert!(matches!(
            Section::new(0.0, 1.0, 1.0, 1.0).validate(),
            Err(FrameError::InvalidGeometry(_))
        ));
        assert!(Section::new(1.0, 1.0, 1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_deserialize_explicit_properties() {
        let section: Section =
            serde_json::from_str(r#"{"Ax":0.01,"Iy":2e-4,"Iz":1e-4,"J":3e-5}"#).unwrap();
        assert_eq!(section.ay, 0.0);
        assert_eq!(section.zy, None);
        assert_eq!(section.ax, 0.01);
    }
}
