//! Structural model - identity-keyed input container
//!
//! A [`Model`] is plain input data. Solving never mutates it; everything
//! derived from it (DOF numbering, matrices, results) lives in values created
//! per solve call.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::elements::{Boundary, Material, Member, MemberKind, Node, Section, SectionDefinition};
use crate::error::{FrameError, FrameResult};
use crate::loads::NodeLoad;
use crate::math::Vec3;

/// Members shorter than this are rejected as zero-length
pub const MIN_LENGTH: f64 = 1e-10;

/// The 3D structural model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Nodes in the model
    #[serde(default)]
    pub nodes: BTreeMap<String, Node>,
    /// Members (lines) in the model
    #[serde(default, alias = "lines")]
    pub members: BTreeMap<String, Member>,
    /// Boundary records
    #[serde(default)]
    pub boundaries: BTreeMap<String, Boundary>,
    /// Node loads
    #[serde(default)]
    pub node_loads: BTreeMap<String, NodeLoad>,
    /// Sections referenced by frame members
    #[serde(default)]
    pub sections: BTreeMap<String, SectionDefinition>,
    /// Materials referenced by frame members
    #[serde(default)]
    pub materials: BTreeMap<String, Material>,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model from JSON
    pub fn from_json(json: &str) -> FrameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the model
    pub fn add_node(&mut self, name: &str, node: Node) -> FrameResult<()> {
        if self.nodes.contains_key(name) {
            return Err(FrameError::DuplicateName(name.to_string()));
        }
        self.nodes.insert(name.to_string(), node);
        Ok(())
    }

    /// Add a material to the model
    pub fn add_material(&mut self, name: &str, material: Material) -> FrameResult<()> {
        if self.materials.contains_key(name) {
            return Err(FrameError::DuplicateName(name.to_string()));
        }
        self.materials.insert(name.to_string(), material);
        Ok(())
    }

    /// Add a section (shape or explicit properties) to the model
    pub fn add_section(
        &mut self,
        name: &str,
        section: impl Into<SectionDefinition>,
    ) -> FrameResult<()> {
        if self.sections.contains_key(name) {
            return Err(FrameError::DuplicateName(name.to_string()));
        }
        self.sections.insert(name.to_string(), section.into());
        Ok(())
    }

    /// Add a member to the model
    pub fn add_member(&mut self, name: &str, member: Member) -> FrameResult<()> {
        if self.members.contains_key(name) {
            return Err(FrameError::DuplicateName(name.to_string()));
        }
        self.check_member_references(name, &member)?;
        self.members.insert(name.to_string(), member);
        Ok(())
    }

    /// Add a boundary record
    pub fn add_boundary(&mut self, name: &str, boundary: Boundary) -> FrameResult<()> {
        if self.boundaries.contains_key(name) {
            return Err(FrameError::DuplicateName(name.to_string()));
        }
        self.require_node(&boundary.node, || format!("boundary '{}'", name))?;
        self.boundaries.insert(name.to_string(), boundary);
        Ok(())
    }

    /// Add a node load
    pub fn add_node_load(&mut self, name: &str, load: NodeLoad) -> FrameResult<()> {
        if self.node_loads.contains_key(name) {
            return Err(FrameError::DuplicateName(name.to_string()));
        }
        self.require_node(&load.node, || format!("node load '{}'", name))?;
        self.node_loads.insert(name.to_string(), load);
        Ok(())
    }

    // ========================
    // Validation
    // ========================

    fn require_node(&self, node: &str, owner: impl FnOnce() -> String) -> FrameResult<&Node> {
        self.nodes.get(node).ok_or_else(|| FrameError::NodeNotFound {
            node: node.to_string(),
            owner: owner(),
        })
    }

    fn check_member_references(&self, name: &str, member: &Member) -> FrameResult<()> {
        for end in member.ends() {
            self.require_node(end, || format!("member '{}'", name))?;
        }
        if let MemberKind::Frame { section, material, .. } = &member.kind {
            if !self.sections.contains_key(section) {
                return Err(FrameError::SectionNotFound {
                    section: section.clone(),
                    member: name.to_string(),
                });
            }
            if !self.materials.contains_key(material) {
                return Err(FrameError::MaterialNotFound {
                    material: material.clone(),
                    member: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check references, geometry and numeric input of the whole model
    pub fn validate(&self) -> FrameResult<()> {
        for (name, node) in &self.nodes {
            if !node.is_finite() {
                return Err(FrameError::InvalidInput(format!(
                    "node '{}' has non-finite coordinates",
                    name
                )));
            }
        }

        for (name, material) in &self.materials {
            if !(material.e.is_finite() && material.e > 0.0)
                || !(material.g.is_finite() && material.g >= 0.0)
            {
                return Err(FrameError::InvalidInput(format!(
                    "material '{}' needs E > 0 and G >= 0",
                    name
                )));
            }
        }

        for (name, member) in &self.members {
            self.check_member_references(name, member)?;
            if let MemberKind::Axial { ea } = member.kind {
                if !(ea.is_finite() && ea > 0.0) {
                    return Err(FrameError::InvalidInput(format!(
                        "member '{}' needs a positive EA, got {}",
                        name, ea
                    )));
                }
            }
            self.member_vector(name, member)?;
        }

        for (name, boundary) in &self.boundaries {
            self.require_node(&boundary.node, || format!("boundary '{}'", name))?;
        }

        for (name, load) in &self.node_loads {
            self.require_node(&load.node, || format!("node load '{}'", name))?;
            if load.as_array().iter().any(|v| !v.is_finite()) {
                return Err(FrameError::InvalidInput(format!(
                    "node load '{}' has non-finite components",
                    name
                )));
            }
        }

        Ok(())
    }

    // ========================
    // Derived Geometry
    // ========================

    /// Direction vector n2 - n1 of a member, rejecting zero-length members
    pub fn member_vector(&self, name: &str, member: &Member) -> FrameResult<Vec3> {
        let owner = || format!("member '{}'", name);
        let n1 = self.require_node(&member.n1, owner)?;
        let n2 = self.require_node(&member.n2, owner)?;
        let v = n1.vector_to(n2);
        if v.norm() < MIN_LENGTH {
            return Err(FrameError::InvalidGeometry(format!(
                "member '{}' has zero length: n1={}, n2={}",
                name, member.n1, member.n2
            )));
        }
        Ok(v)
    }

    /// Resolve every section definition to its properties
    pub fn resolve_sections(&self) -> FrameResult<HashMap<&str, Section>> {
        self.sections
            .iter()
            .map(|(name, definition)| definition.resolve().map(|section| (name.as_str(), section)))
            .collect()
    }
}
