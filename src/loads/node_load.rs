//! Node loads - forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

use crate::dof::Axis;

/// A load applied directly to a node, in global axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Name of the loaded node
    #[serde(deserialize_with = "crate::elements::node_ref::deserialize")]
    pub node: String,
    /// Force in X direction
    #[serde(default)]
    pub x: f64,
    /// Force in Y direction
    #[serde(default)]
    pub y: f64,
    /// Force in Z direction
    #[serde(default)]
    pub z: f64,
    /// Moment about X axis
    #[serde(default)]
    pub rx: f64,
    /// Moment about Y axis
    #[serde(default)]
    pub ry: f64,
    /// Moment about Z axis
    #[serde(default)]
    pub rz: f64,
}

impl NodeLoad {
    /// Create a new node load with all components
    pub fn new(node: &str, components: [f64; 6]) -> Self {
        let [x, y, z, rx, ry, rz] = components;
        Self {
            node: node.to_string(),
            x,
            y,
            z,
            rx,
            ry,
            rz,
        }
    }

    /// Create a force-only node load
    pub fn force(node: &str, fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(node, [fx, fy, fz, 0.0, 0.0, 0.0])
    }

    /// Create a moment-only node load
    pub fn moment(node: &str, mx: f64, my: f64, mz: f64) -> Self {
        Self::new(node, [0.0, 0.0, 0.0, mx, my, mz])
    }

    /// Get the load as an array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.x, self.y, self.z, self.rx, self.ry, self.rz]
    }

    /// Component along one axis
    pub fn component(&self, axis: Axis) -> f64 {
        self.as_array()[axis.index()]
    }
}
