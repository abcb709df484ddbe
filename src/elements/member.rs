//! Member element - 3D line element (truss bar or frame beam/column)

use serde::{Deserialize, Serialize};

/// Stiffness description of a member
///
/// Deserialized without a tag: a record carrying `section` and `material` is a
/// frame member, a record carrying only `EA` is an axial bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberKind {
    /// Full space-frame member referencing a section and a material
    Frame {
        /// Name of the section
        section: String,
        /// Name of the material
        material: String,
        /// Rotation about the longitudinal axis (radians)
        #[serde(default)]
        theta: f64,
    },
    /// Axial-only bar with a given axial rigidity
    Axial {
        /// Axial rigidity E·A
        #[serde(rename = "EA")]
        ea: f64,
    },
}

/// A 3D member connecting two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Name of the start node
    #[serde(deserialize_with = "super::node_ref::deserialize")]
    pub n1: String,
    /// Name of the end node
    #[serde(deserialize_with = "super::node_ref::deserialize")]
    pub n2: String,
    /// Stiffness description
    #[serde(flatten)]
    pub kind: MemberKind,
}

impl Member {
    /// Create an axial-only (truss) member
    pub fn axial(n1: &str, n2: &str, ea: f64) -> Self {
        Self {
            n1: n1.to_string(),
            n2: n2.to_string(),
            kind: MemberKind::Axial { ea },
        }
    }

    /// Create a frame member referencing a section and a material
    pub fn frame(n1: &str, n2: &str, section: &str, material: &str) -> Self {
        Self {
            n1: n1.to_string(),
            n2: n2.to_string(),
            kind: MemberKind::Frame {
                section: section.to_string(),
                material: material.to_string(),
                theta: 0.0,
            },
        }
    }

    /// Set member rotation about its longitudinal axis.
    /// Has no effect on axial members.
    pub fn with_theta(mut self, rotation: f64) -> Self {
        if let MemberKind::Frame { theta, .. } = &mut self.kind {
            *theta = rotation;
        }
        self
    }

    /// End node names as an array [n1, n2]
    pub fn ends(&self) -> [&str; 2] {
        [&self.n1, &self.n2]
    }

    /// Rotation about the longitudinal axis (zero for axial members)
    pub fn theta(&self) -> f64 {
        match self.kind {
            MemberKind::Frame { theta, .. } => theta,
            MemberKind::Axial { .. } => 0.0,
        }
    }
}
