//! Boundary conditions (restraints) at a node

use serde::{Deserialize, Serialize};

use crate::dof::Axis;

/// Restraint value for one axis of a boundary record
///
/// Only `Flag(true)` fixes a degree of freedom. Numeric values are carried
/// through but do not restrain anything.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Restraint {
    /// Boolean marker; `true` means rigidly fixed
    Flag(bool),
    /// Numeric value of unspecified meaning, treated as free
    Value(f64),
    /// Not given
    #[default]
    Unset,
}

impl Restraint {
    /// Whether this value rigidly fixes the axis
    pub fn is_fixed(&self) -> bool {
        matches!(self, Restraint::Flag(true))
    }
}

/// A boundary record restraining some axes of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Name of the restrained node
    #[serde(deserialize_with = "super::node_ref::deserialize")]
    pub node: String,
    /// Translation in X
    #[serde(default)]
    pub x: Restraint,
    /// Translation in Y
    #[serde(default)]
    pub y: Restraint,
    /// Translation in Z
    #[serde(default)]
    pub z: Restraint,
    /// Rotation about X
    #[serde(default)]
    pub rx: Restraint,
    /// Rotation about Y
    #[serde(default)]
    pub ry: Restraint,
    /// Rotation about Z
    #[serde(default)]
    pub rz: Restraint,
}

impl Boundary {
    /// Create a boundary with no restraints
    pub fn new(node: &str) -> Self {
        Self {
            node: node.to_string(),
            x: Restraint::Unset,
            y: Restraint::Unset,
            z: Restraint::Unset,
            rx: Restraint::Unset,
            ry: Restraint::Unset,
            rz: Restraint::Unset,
        }
    }

    /// Create a fully fixed boundary (all six axes restrained)
    pub fn fixed(node: &str) -> Self {
        Self::with_restraints(node, [true; 6])
    }

    /// Create a pinned boundary (translations restrained, rotations free)
    pub fn pinned(node: &str) -> Self {
        Self::with_restraints(node, [true, true, true, false, false, false])
    }

    /// Create a boundary from six flags in axis order [X, Y, Z, RX, RY, RZ]
    pub fn with_restraints(node: &str, fixed: [bool; 6]) -> Self {
        let mut boundary = Self::new(node);
        for (axis, flag) in Axis::ALL.into_iter().zip(fixed) {
            boundary = boundary.with(axis, Restraint::Flag(flag));
        }
        boundary
    }

    /// Set the restraint for one axis
    pub fn with(mut self, axis: Axis, restraint: Restraint) -> Self {
        *self.restraint_mut(axis) = restraint;
        self
    }

    /// Get the restraint for one axis
    pub fn restraint(&self, axis: Axis) -> Restraint {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::Rx => self.rx,
            Axis::Ry => self.ry,
            Axis::Rz => self.rz,
        }
    }

    fn restraint_mut(&mut self, axis: Axis) -> &mut Restraint {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
            Axis::Rx => &mut self.rx,
            Axis::Ry => &mut self.ry,
            Axis::Rz => &mut self.rz,
        }
    }

    /// Whether the given axis is rigidly fixed
    pub fn is_fixed(&self, axis: Axis) -> bool {
        self.restraint(axis).is_fixed()
    }

    /// Axes rigidly fixed by this record, in axis order
    pub fn fixed_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(|&axis| self.is_fixed(axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_boundary() {
        let boundary = Boundary::fixed("N1");
        assert_eq!(boundary.fixed_axes().count(), 6);
    }

    #[test]
    fn test_pinned_boundary() {
        let boundary = Boundary::pinned("N1");
        assert!(boundary.is_fixed(Axis::Z));
        assert!(!boundary.is_fixed(Axis::Rx));
        assert_eq!(boundary.fixed_axes().count(), 3);
    }

    #[test]
    fn test_only_boolean_true_fixes() {
        let boundary: Boundary = serde_json::from_str(
            r#"{"node":"1","x":100,"y":0,"z":false,"rx":-15,"ry":true,"rz":null}"#,
        )
        .unwrap();
        assert_eq!(boundary.x, Restraint::Value(100.0));
        assert_eq!(boundary.z, Restraint::Flag(false));
        assert_eq!(boundary.rz, Restraint::Unset);
        assert_eq!(boundary.fixed_axes().collect::<Vec<_>>(), vec![Axis::Ry]);
    }

    #[test]
    fn test_missing_axes_are_unset() {
        let boundary: Boundary = serde_json::from_str(r#"{"node":"1","z":true}"#).unwrap();
        assert_eq!(boundary.x, Restraint::Unset);
        assert!(boundary.is_fixed(Axis::Z));
    }
}
