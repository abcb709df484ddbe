//! Result types for a linear static solve

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dof::{Axis, Dof};

/// Displacements of one node, keyed by active axis
pub type NodeDisplacements = BTreeMap<Axis, f64>;

/// Displacements of every active DOF
///
/// Fixed DOFs are omitted, and so is any node whose six DOFs are all fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub displacements: BTreeMap<String, NodeDisplacements>,
    #[serde(skip)]
    node_count: usize,
    #[serde(skip)]
    member_count: usize,
}

impl SolveResult {
    /// Map a solution vector back onto its DOFs
    pub(crate) fn from_solution<'a, I>(
        dofs: &[Dof<'_>],
        values: I,
        node_count: usize,
        member_count: usize,
    ) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let mut displacements: BTreeMap<String, NodeDisplacements> = BTreeMap::new();
        for (dof, &value) in dofs.iter().zip(values) {
            displacements
                .entry(dof.node.to_string())
                .or_default()
                .insert(dof.axis, value);
        }
        Self {
            displacements,
            node_count,
            member_count,
        }
    }

    /// Displacement of (node, axis), `None` when the DOF was fixed
    pub fn displacement(&self, node: &str, axis: Axis) -> Option<f64> {
        self.displacements.get(node)?.get(&axis).copied()
    }

    /// All active displacements of a node
    pub fn node(&self, node: &str) -> Option<&NodeDisplacements> {
        self.displacements.get(node)
    }

    /// Number of solved DOFs
    pub fn active_dofs(&self) -> usize {
        self.displacements.values().map(BTreeMap::len).sum()
    }

    /// Aggregate figures of the solve
    pub fn summary(&self) -> SolveSummary {
        let mut summary = SolveSummary {
            nodes: self.node_count,
            members: self.member_count,
            total_dofs: self.node_count * 6,
            active_dofs: self.active_dofs(),
            max_translation: 0.0,
            max_translation_node: None,
        };

        for (node, values) in &self.displacements {
            let translation = [Axis::X, Axis::Y, Axis::Z]
                .iter()
                .filter_map(|axis| values.get(axis))
                .map(|v| v * v)
                .sum::<f64>()
                .sqrt();
            if translation > summary.max_translation {
                summary.max_translation = translation;
                summary.max_translation_node = Some(node.clone());
            }
        }
        summary
    }
}

/// Aggregate figures of one solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Nodes in the model
    pub nodes: usize,
    /// Members in the model
    pub members: usize,
    /// Six DOFs per node
    pub total_dofs: usize,
    /// DOFs left after restraints
    pub active_dofs: usize,
    /// Largest translation magnitude over all nodes
    pub max_translation: f64,
    /// Node carrying the largest translation
    pub max_translation_node: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SolveResult {
        let dofs = [
            Dof { node: "1", axis: Axis::Z },
            Dof { node: "2", axis: Axis::X },
            Dof { node: "2", axis: Axis::Y },
            Dof { node: "2", axis: Axis::Rz },
        ];
        SolveResult::from_solution(&dofs, &[1.0, 3.0, -4.0, 100.0], 3, 2)
    }

    #[test]
    fn test_serializes_nested_map() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"displacements":{"1":{"z":1.0},"2":{"x":3.0,"y":-4.0,"rz":100.0}}}"#
        );
    }

    #[test]
    fn test_lookup() {
        let result = sample();
        assert_eq!(result.displacement("2", Axis::Y), Some(-4.0));
        assert_eq!(result.displacement("1", Axis::X), None);
        assert_eq!(result.displacement("0", Axis::X), None);
        assert_eq!(result.node("2").map(BTreeMap::len), Some(3));
    }

    #[test]
    fn test_summary_ignores_rotations() {
        let summary = sample().summary();
        assert_eq!(summary.total_dofs, 18);
        assert_eq!(summary.active_dofs, 4);
        assert_eq!(summary.max_translation, 5.0);
        assert_eq!(summary.max_translation_node.as_deref(), Some("2"));
    }
}
