//! Global stiffness and load assembly
//!
//! Each member is transformed to global axes and scattered onto the active
//! DOFs of its two end nodes. Member contributions may be computed in
//! parallel, but they are always merged in member order, so the summed
//! matrix is identical from run to run.

use std::collections::HashMap;

use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use rayon::prelude::*;

use crate::analysis::{Fidelity, SolveOptions};
use crate::dof::{Axis, DofMap};
use crate::elements::{Member, MemberKind, Section};
use crate::error::{FrameError, FrameResult};
use crate::math::{
    axial_local_stiffness, frame_local_stiffness, rotation_matrix, to_global, FrameProperties,
    Mat, Mat12, SparseMatrixBuilder,
};
use crate::model::Model;

type Triplet = (usize, usize, f64);

/// Assembled K and P over the active DOFs of one solve
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    stiffness: SparseMatrixBuilder,
    loads: DVector<f64>,
}

impl GlobalSystem {
    /// Number of equations
    pub fn size(&self) -> usize {
        self.loads.len()
    }

    /// Stiffness triplets in merge order
    pub fn stiffness(&self) -> &SparseMatrixBuilder {
        &self.stiffness
    }

    /// Dense global stiffness matrix
    pub fn stiffness_dense(&self) -> Mat {
        self.stiffness.to_dense()
    }

    /// Global stiffness matrix in CSR form
    pub fn stiffness_csr(&self) -> CsrMatrix<f64> {
        self.stiffness.to_csr()
    }

    /// Global load vector
    pub fn loads(&self) -> &DVector<f64> {
        &self.loads
    }
}

/// Assemble the global stiffness matrix and load vector
pub fn assemble(
    model: &Model,
    dof_map: &DofMap<'_>,
    options: &SolveOptions,
) -> FrameResult<GlobalSystem> {
    let sections = model.resolve_sections()?;
    let members: Vec<(&String, &Member)> = model.members.iter().collect();

    let contribution = |&(name, member): &(&String, &Member)| {
        member_triplets(model, dof_map, &sections, options, name, member)
    };
    let per_member: Vec<Vec<Triplet>> = if options.parallel {
        members.par_iter().map(contribution).collect::<FrameResult<_>>()?
    } else {
        members.iter().map(contribution).collect::<FrameResult<_>>()?
    };

    let mut stiffness = SparseMatrixBuilder::new(dof_map.len());
    for triplets in per_member {
        stiffness.extend(triplets);
    }
    log::debug!(
        "assembled {} members into {} triplets over {} equations",
        members.len(),
        stiffness.nnz(),
        dof_map.len()
    );

    let loads = load_vector(model, dof_map)?;
    Ok(GlobalSystem { stiffness, loads })
}

/// Global stiffness of one member scattered onto active DOFs
fn member_triplets(
    model: &Model,
    dof_map: &DofMap<'_>,
    sections: &HashMap<&str, Section>,
    options: &SolveOptions,
    name: &str,
    member: &Member,
) -> FrameResult<Vec<Triplet>> {
    let v = model.member_vector(name, member)?;
    let length = v.norm();
    let k_local = local_stiffness(model, sections, options, name, member, length)?;
    let r = rotation_matrix(&v, member.theta())?;
    let k = to_global(&k_local, &r);

    let mut dofs = [None; 12];
    dofs[..6].copy_from_slice(&dof_map.node_indices(&member.n1)?);
    dofs[6..].copy_from_slice(&dof_map.node_indices(&member.n2)?);

    let mut triplets = Vec::with_capacity(144);
    for (i, row) in dofs.iter().enumerate() {
        let Some(row) = *row else { continue };
        for (j, col) in dofs.iter().enumerate() {
            let Some(col) = *col else { continue };
            let value = k[(i, j)];
            if value != 0.0 {
                triplets.push((row, col, value));
            }
        }
    }
    Ok(triplets)
}

fn local_stiffness(
    model: &Model,
    sections: &HashMap<&str, Section>,
    options: &SolveOptions,
    name: &str,
    member: &Member,
    length: f64,
) -> FrameResult<Mat12> {
    let (section, material) = match &member.kind {
        MemberKind::Axial { ea } => return Ok(axial_local_stiffness(*ea, length)),
        MemberKind::Frame { section, material, .. } => (section, material),
    };

    let section = sections
        .get(section.as_str())
        .ok_or_else(|| FrameError::SectionNotFound {
            section: section.clone(),
            member: name.to_string(),
        })?;
    let material = model
        .materials
        .get(material)
        .ok_or_else(|| FrameError::MaterialNotFound {
            material: material.clone(),
            member: name.to_string(),
        })?;

    match options.fidelity {
        Fidelity::Axial => Ok(axial_local_stiffness(material.e * section.ax, length)),
        Fidelity::Frame => {
            let props = FrameProperties {
                e: material.e,
                g: material.g,
                ax: section.ax,
                ay: section.ay,
                az: section.az,
                iy: section.iy,
                iz: section.iz,
                j: section.j,
            };
            Ok(frame_local_stiffness(&props, length, options.shear_deformation))
        }
    }
}

/// Sum node loads onto active DOFs; components on fixed DOFs are dropped
fn load_vector(model: &Model, dof_map: &DofMap<'_>) -> FrameResult<DVector<f64>> {
    let mut p = DVector::zeros(dof_map.len());
    for (name, load) in &model.node_loads {
        if !model.nodes.contains_key(&load.node) {
            return Err(FrameError::NodeNotFound {
                node: load.node.clone(),
                owner: format!("node load '{}'", name),
            });
        }
        for axis in Axis::ALL {
            if let Some(i) = dof_map.index_of(&load.node, axis) {
                p[i] += load.component(axis);
            }
        }
    }
    Ok(p)
}
