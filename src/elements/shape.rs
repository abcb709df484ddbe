//! Parametric cross-section shapes and their geometric properties
//!
//! Every shape is a closed variant holding its own dimensions, so resolving
//! properties is a plain `match`. Dimensions follow the usual steel-table
//! naming: `H` depth, `B` width, `tw` web thickness, `tf` flange thickness,
//! `r` fillet (or corner) radius, `D` diameter, `t` wall thickness.
//!
//! Local axes: bending about y uses the depth `H`, bending about z uses the
//! width `B`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::section::Section;
use crate::error::{FrameError, FrameResult};

/// Parametric cross-section shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum Shape {
    /// Symmetric wide-flange section with root fillets
    #[serde(rename = "H")]
    H {
        #[serde(rename = "H")]
        h: f64,
        #[serde(rename = "B")]
        b: f64,
        tw: f64,
        tf: f64,
        #[serde(default)]
        r: f64,
    },
    /// Tee section with root fillets
    #[serde(rename = "T")]
    T {
        #[serde(rename = "H")]
        h: f64,
        #[serde(rename = "B")]
        b: f64,
        tw: f64,
        tf: f64,
        #[serde(default)]
        r: f64,
    },
    /// Symmetric I section without fillets
    #[serde(rename = "I")]
    I {
        #[serde(rename = "H")]
        h: f64,
        #[serde(rename = "B")]
        b: f64,
        tw: f64,
        tf: f64,
    },
    /// Circular hollow section
    #[serde(rename = "O")]
    O {
        #[serde(rename = "D")]
        d: f64,
        t: f64,
    },
    /// Channel section without fillets
    #[serde(rename = "C")]
    C {
        #[serde(rename = "H")]
        h: f64,
        #[serde(rename = "B")]
        b: f64,
        tw: f64,
        tf: f64,
    },
    /// Rectangular hollow section with outer corner radius
    #[serde(rename = "R")]
    R {
        #[serde(rename = "H")]
        h: f64,
        #[serde(rename = "B")]
        b: f64,
        t: f64,
        #[serde(default)]
        r: f64,
    },
}

/// Area, centroidal inertia and centroid offset of one corner spandrel
/// (a square of side `r` minus the quarter circle inscribed in it). The
/// offset is measured from the square corner along either leg.
#[derive(Debug, Clone, Copy)]
struct Spandrel {
    area: f64,
    inertia: f64,
    offset: f64,
}

impl Spandrel {
    fn new(r: f64) -> Self {
        Self {
            area: (1.0 - PI / 4.0) * r * r,
            inertia: (1.0 / 3.0 - PI / 16.0 - 1.0 / (9.0 * (4.0 - PI))) * r.powi(4),
            offset: (1.0 - 2.0 / (3.0 * (4.0 - PI))) * r,
        }
    }

    /// Inertia about an axis at distance `distance` from the spandrel centroid
    fn inertia_at(&self, distance: f64) -> f64 {
        self.inertia + self.area * distance * distance
    }
}

impl Shape {
    /// Single-letter code of this shape
    pub fn code(&self) -> &'static str {
        match self {
            Shape::H { .. } => "H",
            Shape::T { .. } => "T",
            Shape::I { .. } => "I",
            Shape::O { .. } => "O",
            Shape::C { .. } => "C",
            Shape::R { .. } => "R",
        }
    }

    /// Build a shape from its code and ordered dimensions
    ///
    /// | code | parameters |
    /// |---|---|
    /// | H, T | H, B, tw, tf, [r] |
    /// | I, C | H, B, tw, tf |
    /// | O | D, t |
    /// | R | H, B, t, [r] |
    pub fn from_ordered(code: &str, params: &[f64]) -> FrameResult<Self> {
        let arity = |min: usize, max: usize| -> FrameResult<()> {
            if params.len() < min || params.len() > max {
                return Err(FrameError::InvalidInput(format!(
                    "shape '{}' takes {}..={} parameters, got {}",
                    code,
                    min,
                    max,
                    params.len()
                )));
            }
            Ok(())
        };
        let optional = |i: usize| params.get(i).copied().unwrap_or(0.0);

        match code {
            "H" | "T" => {
                arity(4, 5)?;
                let (h, b, tw, tf, r) = (params[0], params[1], params[2], params[3], optional(4));
                Ok(if code == "H" {
                    Shape::H { h, b, tw, tf, r }
                } else {
                    Shape::T { h, b, tw, tf, r }
                })
            }
            "I" | "C" => {
                arity(4, 4)?;
                let (h, b, tw, tf) = (params[0], params[1], params[2], params[3]);
                Ok(if code == "I" {
                    Shape::I { h, b, tw, tf }
                } else {
                    Shape::C { h, b, tw, tf }
                })
            }
            "O" => {
                arity(2, 2)?;
                Ok(Shape::O { d: params[0], t: params[1] })
            }
            "R" => {
                arity(3, 4)?;
                Ok(Shape::R {
                    h: params[0],
                    b: params[1],
                    t: params[2],
                    r: optional(3),
                })
            }
            other => Err(FrameError::InvalidInput(format!("unknown shape '{}'", other))),
        }
    }

    /// Compute the geometric properties of this shape
    pub fn properties(&self) -> FrameResult<Section> {
        self.check_dimensions()?;
        let section = match *self {
            Shape::H { h, b, tw, tf, r } => h_properties(h, b, tw, tf, r),
            Shape::T { h, b, tw, tf, r } => t_properties(h, b, tw, tf, r),
            Shape::I { h, b, tw, tf } => h_properties(h, b, tw, tf, 0.0),
            Shape::O { d, t } => o_properties(d, t),
            Shape::C { h, b, tw, tf } => c_properties(h, b, tw, tf),
            Shape::R { h, b, t, r } => r_properties(h, b, t, r),
        };
        section.validate()?;
        Ok(section)
    }

    fn check_dimensions(&self) -> FrameResult<()> {
        let invalid = |reason: &str| {
            Err(FrameError::InvalidGeometry(format!(
                "shape '{}': {}",
                self.code(),
                reason
            )))
        };

        let (positive, radius) = match *self {
            Shape::H { h, b, tw, tf, r } | Shape::T { h, b, tw, tf, r } => (vec![h, b, tw, tf], r),
            Shape::I { h, b, tw, tf } | Shape::C { h, b, tw, tf } => (vec![h, b, tw, tf], 0.0),
            Shape::O { d, t } => (vec![d, t], 0.0),
            Shape::R { h, b, t, r } => (vec![h, b, t], r),
        };
        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return invalid("dimensions must be positive");
        }
        if !radius.is_finite() || radius < 0.0 {
            return invalid("radius must not be negative");
        }

        match *self {
            Shape::H { h, b, tw, tf, .. }
            | Shape::I { h, b, tw, tf }
            | Shape::C { h, b, tw, tf } => {
                if 2.0 * tf >= h || tw > b {
                    return invalid("flanges or web do not fit the outline");
                }
            }
            Shape::T { h, b, tw, tf, .. } => {
                if tf >= h || tw > b {
                    return invalid("flange or web do not fit the outline");
                }
            }
            Shape::O { d, t } => {
                if 2.0 * t > d {
                    return invalid("wall thicker than half the diameter");
                }
            }
            Shape::R { h, b, t, r } => {
                if 2.0 * t > h.min(b) {
                    return invalid("wall thicker than half the outline");
                }
                if 2.0 * r > h.min(b) {
                    return invalid("corner radius larger than half the outline");
                }
            }
        }
        Ok(())
    }
}

fn h_properties(h: f64, b: f64, tw: f64, tf: f64, r: f64) -> Section {
    let fillet = Spandrel::new(r);
    let hw = h - 2.0 * tf;

    let ax = 2.0 * b * tf + hw * tw + 4.0 * fillet.area;

    let iz = 2.0 * tf * b.powi(3) / 12.0
        + hw * tw.powi(3) / 12.0
        + 4.0 * fillet.inertia_at(tw / 2.0 + fillet.offset);

    let iy = 2.0 * (b * tf.powi(3) / 12.0 + b * tf * (h - tf).powi(2) / 4.0)
        + tw * hw.powi(3) / 12.0
        + 4.0 * fillet.inertia_at(h / 2.0 - tf - fillet.offset);

    Section {
        ax,
        ay: 2.0 * tf * b,
        az: tw * h,
        iy,
        iz,
        j: (2.0 * b * tf.powi(3) + hw * tw.powi(3)) / 3.0,
        zy: Some(2.0 * iy / h),
        zz: Some(2.0 * iz / b),
        cy: None,
        cz: None,
    }
}

fn t_properties(h: f64, b: f64, tw: f64, tf: f64, r: f64) -> Section {
    let fillet = Spandrel::new(r);
    let hw = h - tf;

    let ax = b * tf + hw * tw + 2.0 * fillet.area;

    // First moment about the outer flange face
    let sy = ((b - tw) * tf * tf + h * h * tw) / 2.0 + 2.0 * fillet.area * (tf + fillet.offset);
    let cy = sy / ax;

    let iz = tf * b.powi(3) / 12.0
        + hw * tw.powi(3) / 12.0
        + 2.0 * fillet.inertia_at(tw / 2.0 + fillet.offset);

    let iy = b * tf.powi(3) / 12.0
        + b * tf * (cy - tf / 2.0).powi(2)
        + tw * hw.powi(3) / 12.0
        + tw * hw * ((h + tf) / 2.0 - cy).powi(2)
        + 2.0 * fillet.inertia_at(cy - tf - fillet.offset);

    Section {
        ax,
        ay: tf * b,
        az: tw * h,
        iy,
        iz,
        j: (b * tf.powi(3) + hw * tw.powi(3)) / 3.0,
        zy: Some(iy / cy.max(h - cy)),
        zz: Some(2.0 * iz / b),
        cy: Some(cy),
        cz: None,
    }
}

fn o_properties(d: f64, t: f64) -> Section {
    let di = d - 2.0 * t;
    let ax = PI / 4.0 * (d * d - di * di);
    let i = PI / 64.0 * (d.powi(4) - di.powi(4));

    Section {
        ax,
        ay: ax / 2.0,
        az: ax / 2.0,
        iy: i,
        iz: i,
        j: 2.0 * i,
        zy: Some(2.0 * i / d),
        zz: Some(2.0 * i / d),
        cy: None,
        cz: None,
    }
}

fn c_properties(h: f64, b: f64, tw: f64, tf: f64) -> Section {
    let hw = h - 2.0 * tf;
    let ax = 2.0 * b * tf + hw * tw;

    // Centroid measured from the back of the web
    let cz = (b * b * tf + hw * tw * tw / 2.0) / ax;

    let iy = (b * h.powi(3) - (b - tw) * hw.powi(3)) / 12.0;
    let iz = 2.0 * (tf * b.powi(3) / 12.0 + b * tf * (b / 2.0 - cz).powi(2))
        + hw * tw.powi(3) / 12.0
        + hw * tw * (tw / 2.0 - cz).powi(2);

    Section {
        ax,
        ay: 2.0 * tf * b,
        az: tw * h,
        iy,
        iz,
        j: (2.0 * b * tf.powi(3) + hw * tw.powi(3)) / 3.0,
        zy: Some(2.0 * iy / h),
        zz: Some(iz / cz.max(b - cz)),
        cy: None,
        cz: Some(cz),
    }
}

fn r_properties(h: f64, b: f64, t: f64, r: f64) -> Section {
    let outer = Spandrel::new(r);
    let inner = Spandrel::new((r - t).max(0.0));
    let (hi, bi) = (h - 2.0 * t, b - 2.0 * t);

    // Rounded corners remove material outside and add it back inside
    let ax = b * h - bi * hi - 4.0 * outer.area + 4.0 * inner.area;

    let iy = (b * h.powi(3) - bi * hi.powi(3)) / 12.0
        - 4.0 * outer.inertia_at(h / 2.0 - outer.offset)
        + 4.0 * inner.inertia_at(hi / 2.0 - inner.offset);
    let iz = (h * b.powi(3) - hi * bi.powi(3)) / 12.0
        - 4.0 * outer.inertia_at(b / 2.0 - outer.offset)
        + 4.0 * inner.inertia_at(bi / 2.0 - inner.offset);

    // Bredt's formula on the wall centre line
    let rm = (r - t / 2.0).max(0.0);
    let enclosed = (b - t) * (h - t) - (4.0 - PI) * rm * rm;
    let perimeter = 2.0 * ((b - t) + (h - t)) - 2.0 * (4.0 - PI) * rm;
    let j = 4.0 * enclosed * enclosed * t / perimeter;

    Section {
        ax,
        ay: 2.0 * t * b,
        az: 2.0 * t * h,
        iy,
        iz,
        j,
        zy: Some(2.0 * iy / h),
        zz: Some(2.0 * iz / b),
        cy: None,
        cz: None,
    }
}

/// A named section in the model: either a parametric shape or explicit properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionDefinition {
    /// Parametric shape resolved on demand
    Shape(Shape),
    /// Properties given directly
    Properties(Section),
}

impl SectionDefinition {
    /// Resolve to section properties
    pub fn resolve(&self) -> FrameResult<Section> {
        match self {
            SectionDefinition::Shape(shape) => shape.properties(),
            SectionDefinition::Properties(section) => {
                section.validate()?;
                Ok(*section)
            }
        }
    }
}

impl From<Shape> for SectionDefinition {
    fn from(shape: Shape) -> Self {
        SectionDefinition::Shape(shape)
    }
}

impl From<Section> for SectionDefinition {
    fn from(section: Section) -> Self {
        SectionDefinition::Properties(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_i_matches_h_without_fillet() {
        let h = Shape::H { h: 0.3, b: 0.15, tw: 0.0065, tf: 0.009, r: 0.0 }.properties().unwrap();
        let i = Shape::I { h: 0.3, b: 0.15, tw: 0.0065, tf: 0.009 }.properties().unwrap();
        assert_eq!(h, i);
    }

    #[test]
    fn test_i_closed_form() {
        let s = Shape::I { h: 0.2, b: 0.1, tw: 0.01, tf: 0.02 }.properties().unwrap();
        assert_relative_eq!(s.ax, 2.0 * 0.1 * 0.02 + 0.16 * 0.01, epsilon = 1e-15);
        let iy = (0.1 * 0.2_f64.powi(3) - 0.09 * 0.16_f64.powi(3)) / 12.0;
        assert_relative_eq!(s.iy, iy, max_relative = 1e-12);
    }

    #[test]
    fn test_fillet_adds_area_and_inertia() {
        let h_section = |r| Shape::H { h: 0.3, b: 0.3, tw: 0.01, tf: 0.015, r };
        let sharp = h_section(0.0).properties().unwrap();
        let filleted = h_section(0.018).properties().unwrap();
        assert!(filleted.ax > sharp.ax);
        assert!(filleted.iy > sharp.iy);
        assert!(filleted.iz > sharp.iz);
    }

    #[test]
    fn test_spandrel_centroidal_inertia() {
        // Parallel-axis check against the inertia about the square's edge: r^4 (1 - 5 pi / 16)
        let s = Spandrel::new(1.0);
        assert_relative_eq!(s.inertia_at(s.offset), 1.0 - 5.0 * PI / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tee_centroid_within_depth() {
        let s = Shape::T { h: 0.15, b: 0.15, tw: 0.007, tf: 0.01, r: 0.008 }.properties().unwrap();
        let cy = s.cy.unwrap();
        assert!(cy > 0.0 && cy < 0.15 / 2.0);
        assert!(s.j > 0.0);
    }

    #[test]
    fn test_pipe_closed_form() {
        let s = Shape::O { d: 0.2, t: 0.01 }.properties().unwrap();
        assert_relative_eq!(s.ax, PI / 4.0 * (0.04 - 0.0324), epsilon = 1e-15);
        assert_relative_eq!(s.j, s.iy + s.iz, epsilon = 1e-18);
    }

    #[test]
    fn test_channel_centroid() {
        let s = Shape::C { h: 0.2, b: 0.08, tw: 0.0075, tf: 0.011 }.properties().unwrap();
        let cz = s.cz.unwrap();
        assert!(cz > 0.0075 / 2.0 && cz < 0.08 / 2.0);
    }

    #[test]
    fn test_from_ordered() {
        assert_eq!(
            Shape::from_ordered("H", &[0.3, 0.3, 0.01, 0.015]).unwrap(),
            Shape::H { h: 0.3, b: 0.3, tw: 0.01, tf: 0.015, r: 0.0 }
        );
        assert_eq!(
            Shape::from_ordered("O", &[0.1, 0.005]).unwrap(),
            Shape::O { d: 0.1, t: 0.005 }
        );
        assert!(Shape::from_ordered("O", &[0.1]).is_err());
        assert!(Shape::from_ordered("X", &[1.0]).is_err());
    }

    #[test]
    fn test_rejects_non_physical_dimensions() {
        assert!(Shape::O { d: 0.1, t: 0.06 }.properties().is_err());
        assert!(Shape::I { h: 0.1, b: 0.1, tw: 0.01, tf: 0.05 }.properties().is_err());
        assert!(Shape::R { h: 0.1, b: -0.1, t: 0.01, r: 0.0 }.properties().is_err());
    }

    #[test]
    fn test_deserialize_tagged_shape() {
        let def: SectionDefinition =
            serde_json::from_str(r#"{"shape":"R","H":0.2,"B":0.1,"t":0.006}"#).unwrap();
        assert_eq!(def, SectionDefinition::Shape(Shape::R { h: 0.2, b: 0.1, t: 0.006, r: 0.0 }));

        let def: SectionDefinition =
            serde_json::from_str(r#"{"Ax":0.01,"Iy":1e-4,"Iz":1e-4,"J":2e-4}"#).unwrap();
        assert!(matches!(def, SectionDefinition::Properties(_)));
    }
}
