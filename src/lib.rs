//! Frame Solver - static elastic displacements of 3D frames and trusses
//!
//! Given nodes, members, boundary restraints and nodal loads, the solver
//! assembles the global elastic stiffness matrix over the unrestrained
//! degrees of freedom, solves K · D = P and reports the displacement of every
//! active DOF. Supported member models:
//! - Axial (truss) members defined by EA
//! - Space-frame members defined by a section and a material (Euler-Bernoulli,
//!   optionally with Timoshenko shear correction)
//!
//! Solving is a pure function of the model; independent solves may run
//! concurrently.
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let mut model = Model::new();
//! model.add_node("0", Node::new(0.0, 0.0, 0.0)).unwrap();
//! model.add_node("1", Node::new(0.0, 0.0, 1.0)).unwrap();
//! model.add_member("0", Member::axial("0", "1", 1.0)).unwrap();
//! model.add_boundary("0", Boundary::fixed("0")).unwrap();
//! model
//!     .add_boundary("1", Boundary::with_restraints("1", [true, true, false, true, true, true]))
//!     .unwrap();
//! model.add_node_load("0", NodeLoad::new("1", [0.0, 1.0, 1.0, 0.0, 0.0, -1.0])).unwrap();
//!
//! let result = frame_solver::solve(&model).unwrap();
//! assert_eq!(result.displacement("1", Axis::Z), Some(1.0));
//! assert_eq!(result.displacement("1", Axis::Y), None);
//! ```

pub mod analysis;
pub mod assembly;
pub mod dof;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

use analysis::SolveOptions;
use error::FrameResult;
use model::Model;
use results::SolveResult;

pub use analysis::{solve_cancellable, solve_with};

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{Fidelity, SolveOptions, SolverKind};
    pub use crate::dof::{Axis, DofMap};
    pub use crate::elements::{
        Boundary, Material, Member, MemberKind, Node, Restraint, Section, SectionDefinition, Shape,
    };
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::loads::NodeLoad;
    pub use crate::model::Model;
    pub use crate::results::{SolveResult, SolveSummary};
}

/// Solve with full space-frame fidelity and default options
pub fn solve(model: &Model) -> FrameResult<SolveResult> {
    solve_with(model, &SolveOptions::frame())
}

/// Solve with axial-only member stiffness
///
/// Every member, frame members included, contributes only EA/L. Rotational
/// and transverse DOFs must be restrained or the system is singular.
pub fn solve_axial(model: &Model) -> FrameResult<SolveResult> {
    solve_with(model, &SolveOptions::axial())
}

#[cfg(feature = "wasm")]
pub mod wasm;
