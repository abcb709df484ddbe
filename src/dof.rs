//! Degree-of-freedom bookkeeping
//!
//! Every node carries six DOFs in the fixed order X, Y, Z, RX, RY, RZ. A DOF
//! is active unless some boundary record marks it rigidly fixed. Active DOFs
//! are numbered in node order (the model's key order) times axis order, and
//! that numbering is shared by the stiffness matrix, the load vector and the
//! solution vector of one solve.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};
use crate::model::Model;

/// One of the six nodal axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
}

impl Axis {
    /// All axes in DOF order
    pub const ALL: [Axis; 6] = [Axis::X, Axis::Y, Axis::Z, Axis::Rx, Axis::Ry, Axis::Rz];

    /// Position of this axis within a node's six DOFs
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase axis name
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::Rx => "rx",
            Axis::Ry => "ry",
            Axis::Rz => "rz",
        }
    }

    /// Whether this is a translational axis
    pub fn is_translation(self) -> bool {
        matches!(self, Axis::X | Axis::Y | Axis::Z)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single degree of freedom: (node, axis)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dof<'a> {
    pub node: &'a str,
    pub axis: Axis,
}

impl fmt::Display for Dof<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node '{}' axis {}", self.node, self.axis)
    }
}

/// Active-DOF numbering for one solve
///
/// Borrows node names from the model it was built from.
#[derive(Debug, Clone)]
pub struct DofMap<'a> {
    dofs: Vec<Dof<'a>>,
    index: HashMap<&'a str, [Option<usize>; 6]>,
}

impl<'a> DofMap<'a> {
    /// Enumerate the active DOFs of `model`
    ///
    /// Fails with [`FrameError::NodeNotFound`] when a boundary names an
    /// unknown node.
    pub fn build(model: &'a Model) -> FrameResult<Self> {
        let mut fixed: HashSet<(&str, Axis)> = HashSet::new();
        for (name, boundary) in &model.boundaries {
            if !model.nodes.contains_key(&boundary.node) {
                return Err(FrameError::NodeNotFound {
                    node: boundary.node.clone(),
                    owner: format!("boundary '{}'", name),
                });
            }
            fixed.extend(boundary.fixed_axes().map(|axis| (boundary.node.as_str(), axis)));
        }

        let mut dofs = Vec::with_capacity(model.nodes.len() * 6);
        let mut index = HashMap::with_capacity(model.nodes.len());
        for node in model.nodes.keys() {
            let mut slots = [None; 6];
            for axis in Axis::ALL {
                if !fixed.contains(&(node.as_str(), axis)) {
                    slots[axis.index()] = Some(dofs.len());
                    dofs.push(Dof { node, axis });
                }
            }
            index.insert(node.as_str(), slots);
        }

        log::debug!(
            "enumerated {} active of {} DOFs",
            dofs.len(),
            model.nodes.len() * 6
        );
        Ok(Self { dofs, index })
    }

    /// Number of active DOFs
    pub fn len(&self) -> usize {
        self.dofs.len()
    }

    /// Whether no DOF is active
    pub fn is_empty(&self) -> bool {
        self.dofs.is_empty()
    }

    /// Active DOFs in equation order
    pub fn dofs(&self) -> &[Dof<'a>] {
        &self.dofs
    }

    /// Equation index of (node, axis), `None` when fixed or unknown
    pub fn index_of(&self, node: &str, axis: Axis) -> Option<usize> {
        self.index.get(node).and_then(|slots| slots[axis.index()])
    }

    /// Equation indices of all six axes of a node
    pub fn node_indices(&self, node: &str) -> FrameResult<[Option<usize>; 6]> {
        self.index
            .get(node)
            .copied()
            .ok_or_else(|| FrameError::NodeNotFound {
                node: node.to_string(),
                owner: "DOF lookup".to_string(),
            })
    }

    /// Human-readable label of an equation index
    pub fn label(&self, equation: usize) -> String {
        self.dofs
            .get(equation)
            .map(|dof| dof.to_string())
            .unwrap_or_else(|| format!("equation {}", equation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Boundary, Node, Restraint};

    /// Nodes 0, 1, 3 with one boolean-heavy boundary and one numeric-heavy boundary
    fn mixed_boundary_model() -> Model {
        Model::from_json(
            r#"{
                "nodes": {
                    "0": {"x": -5.4, "y": 3.2, "z": 4.2},
                    "1": {"x": 0, "y": -3.2, "z": 1.5},
                    "3": {"x": -2.4, "y": -3.8, "z": 9.9}
                },
                "boundaries": {
                    "0": {"node": "1", "x": 100, "y": 0, "z": false, "rx": -15, "ry": true, "rz": false},
                    "2": {"node": "0", "x": 0, "y": 0, "z": true, "rx": false, "ry": false, "rz": 1}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_enumeration_order_and_numeric_values_are_free() {
        let model = mixed_boundary_model();
        let map = DofMap::build(&model).unwrap();
        let got: Vec<(&str, &str)> = map.dofs().iter().map(|d| (d.node, d.axis.name())).collect();
        assert_eq!(
            got,
            vec![
                ("0", "x"), ("0", "y"), ("0", "rx"), ("0", "ry"), ("0", "rz"),
                ("1", "x"), ("1", "y"), ("1", "z"), ("1", "rx"), ("1", "rz"),
                ("3", "x"), ("3", "y"), ("3", "z"), ("3", "rx"), ("3", "ry"), ("3", "rz"),
            ]
        );
    }

    #[test]
    fn test_active_count_and_lookup() {
        let model = mixed_boundary_model();
        let map = DofMap::build(&model).unwrap();
        assert_eq!(map.len(), 6 * 3 - 2);
        assert_eq!(map.index_of("0", Axis::Z), None);
        assert_eq!(map.index_of("1", Axis::X), Some(5));
        assert_eq!(map.index_of("1", Axis::Ry), None);
        assert_eq!(map.index_of("9", Axis::X), None);
        assert_eq!(map.label(2), "node '0' axis rx");
    }

    #[test]
    fn test_enumeration_is_reproducible() {
        let model = mixed_boundary_model();
        let a = DofMap::build(&model).unwrap();
        let cloned = model.clone();
        let b = DofMap::build(&cloned).unwrap();
        assert_eq!(a.dofs(), b.dofs());
    }

    #[test]
    fn test_repeated_boundaries_on_one_node_union() {
        let mut model = Model::new();
        model.add_node("A", Node::new(0.0, 0.0, 0.0)).unwrap();
        model
            .add_boundary("b1", Boundary::new("A").with(Axis::X, Restraint::Flag(true)))
            .unwrap();
        model
            .add_boundary("b2", Boundary::new("A").with(Axis::X, Restraint::Flag(false)))
            .unwrap();
        let map = DofMap::build(&model).unwrap();
        assert_eq!(map.len(), 5);
        assert_eq!(map.index_of("A", Axis::X), None);
    }

    #[test]
    fn test_boundary_on_unknown_node() {
        let mut model = Model::new();
        model.add_node("A", Node::default()).unwrap();
        model.boundaries.insert("b".to_string(), Boundary::fixed("Z"));
        assert!(matches!(
            DofMap::build(&model),
            Err(FrameError::NodeNotFound { node, .. }) if node == "Z"
        ));
    }
}
