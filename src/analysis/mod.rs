//! Analysis types and options

mod linear;

use serde::{Deserialize, Serialize};

pub use crate::math::solve::SolverKind;
pub use linear::{solve_cancellable, solve_with};

/// Element formulation used for every member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    /// 12x12 space-frame element with axial, torsion and biaxial bending
    #[default]
    Frame,
    /// Truss element, axial stiffness only
    Axial,
}

/// Options for a linear static solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Element formulation
    pub fidelity: Fidelity,
    /// Apply the Timoshenko shear correction to frame members
    pub shear_deformation: bool,
    /// Linear solver back-end
    pub solver: SolverKind,
    /// Minimum scaled pivot accepted by the factorization
    pub pivot_tolerance: f64,
    /// Compute member contributions on the rayon thread pool
    pub parallel: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            fidelity: Fidelity::Frame,
            shear_deformation: false,
            solver: SolverKind::Cholesky,
            pivot_tolerance: 1e-12,
            parallel: true,
        }
    }
}

impl SolveOptions {
    /// Options for full space-frame fidelity
    pub fn frame() -> Self {
        Self::default()
    }

    /// Options for the axial-only (truss) variant
    pub fn axial() -> Self {
        Self {
            fidelity: Fidelity::Axial,
            ..Self::default()
        }
    }

    /// Choose the solver back-end
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Enable or disable the shear deformation correction
    pub fn with_shear_deformation(mut self, enabled: bool) -> Self {
        self.shear_deformation = enabled;
        self
    }

    /// Set the minimum scaled pivot
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Assemble on the calling thread only
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
