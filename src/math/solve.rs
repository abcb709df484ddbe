//! Linear solver back-ends for K · D = P
//!
//! All back-ends share one failure contract: a non-positive (or zero) pivot
//! is a singular system, and a pivot that survives but is tiny relative to
//! its diagonal is an ill-conditioned one. Neither produces displacements.

use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use serde::{Deserialize, Serialize};

use super::sparse::SkylineCholesky;
use super::{Mat, Vec};
use crate::analysis::SolveOptions;
use crate::assembly::GlobalSystem;

/// Linear solver back-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Dense Cholesky factorization
    #[default]
    Cholesky,
    /// Dense LU with partial pivoting
    Lu,
    /// Sparse skyline Cholesky
    Skyline,
}

/// Why a system could not be solved, by equation index
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveFailure {
    /// Zero or negative pivot at `equation`
    Singular { equation: usize },
    /// Scaled pivot at `equation` fell below the tolerance
    IllConditioned { equation: usize, ratio: f64 },
}

/// Solve an assembled system with the back-end named in `options`
pub fn solve_system(
    system: &GlobalSystem,
    options: &SolveOptions,
) -> Result<DVector<f64>, SolveFailure> {
    log::debug!(
        "solving {} equations with {:?} ({} triplets)",
        system.size(),
        options.solver,
        system.stiffness().nnz()
    );
    let tolerance = options.pivot_tolerance;
    match options.solver {
        SolverKind::Cholesky => dense_cholesky(system.stiffness_dense(), system.loads(), tolerance),
        SolverKind::Lu => dense_lu(system.stiffness_dense(), system.loads(), tolerance),
        SolverKind::Skyline => {
            let factor = SkylineCholesky::factorize(&system.stiffness_csr(), tolerance)?;
            log::debug!("skyline profile holds {} entries", factor.profile_len());
            Ok(factor.solve(system.loads()))
        }
    }
}

/// Dense Cholesky solve; the scaled pivot of equation j is L_jj² / K_jj
fn dense_cholesky(a: Mat, b: &Vec, pivot_tolerance: f64) -> Result<Vec, SolveFailure> {
    let chol = match a.clone().cholesky() {
        Some(chol) => chol,
        None => return Err(locate_breakdown(&a, pivot_tolerance)),
    };

    let pivots = chol.l_dirty().diagonal();
    for (equation, (pivot, original)) in pivots.iter().zip(a.diagonal().iter()).enumerate() {
        let ratio = pivot * pivot / original;
        if ratio < pivot_tolerance {
            return Err(SolveFailure::IllConditioned { equation, ratio });
        }
    }
    Ok(chol.solve(b))
}

/// Equation at which a failed dense factorization broke down
///
/// nalgebra only reports that the factorization failed, so the profile
/// factorization is replayed to name the pivot.
fn locate_breakdown(a: &Mat, pivot_tolerance: f64) -> SolveFailure {
    match SkylineCholesky::factorize(&CsrMatrix::from(a), pivot_tolerance) {
        Err(failure) => failure,
        Ok(_) => {
            let equation = a
                .diagonal()
                .iter()
                .position(|d| !(*d > 0.0))
                .unwrap_or(a.nrows().saturating_sub(1));
            SolveFailure::Singular { equation }
        }
    }
}

fn dense_lu(a: Mat, b: &Vec, pivot_tolerance: f64) -> Result<Vec, SolveFailure> {
    let lu = a.lu();
    let u = lu.u();
    let largest = u.diagonal().amax();
    for (equation, pivot) in u.diagonal().iter().enumerate() {
        let magnitude = pivot.abs();
        if !(magnitude > 0.0) {
            return Err(SolveFailure::Singular { equation });
        }
        let ratio = magnitude / largest;
        if ratio < pivot_tolerance {
            return Err(SolveFailure::IllConditioned { equation, ratio });
        }
    }
    lu.solve(b).ok_or(SolveFailure::Singular { equation: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spd() -> Mat {
        Mat::from_row_slice(3, 3, &[
            4.0, 1.0, 0.5,
            1.0, 3.0, 0.2,
            0.5, 0.2, 2.0,
        ])
    }

    #[test]
    fn test_dense_cholesky_solves_spd_system() {
        let b = Vec::from_column_slice(&[1.0, -2.0, 0.5]);
        let x = dense_cholesky(spd(), &b, 1e-12).unwrap();
        assert_relative_eq!(spd() * &x, b, epsilon = 1e-14);
    }

    #[test]
    fn test_dense_cholesky_zero_diagonal() {
        let mut k = spd();
        k.row_mut(1).fill(0.0);
        k.column_mut(1).fill(0.0);
        let b = Vec::from_column_slice(&[1.0, 1.0, 1.0]);
        assert_eq!(
            dense_cholesky(k, &b, 1e-12).unwrap_err(),
            SolveFailure::Singular { equation: 1 }
        );
    }

    #[test]
    fn test_dense_cholesky_rank_deficient() {
        // Two springs in series with no support: rigid-body mode
        let k = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let b = Vec::from_column_slice(&[1.0, 0.0]);
        assert_eq!(
            dense_cholesky(k, &b, 1e-12).unwrap_err(),
            SolveFailure::Singular { equation: 1 }
        );
    }

    #[test]
    fn test_dense_cholesky_flags_tiny_pivot() {
        // Positive definite, but the second pivot is ~1e-15 of its diagonal
        let k = Mat::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0 + 1e-15]);
        let b = Vec::from_column_slice(&[1.0, 1.0]);
        match dense_cholesky(k, &b, 1e-12) {
            Err(SolveFailure::IllConditioned { equation, ratio }) => {
                assert_eq!(equation, 1);
                assert!(ratio > 0.0 && ratio < 1e-12);
            }
            other => panic!("expected ill-conditioned pivot, got {:?}", other),
        }
    }

    #[test]
    fn test_lu_agrees_with_cholesky() {
        let b = Vec::from_column_slice(&[3.0, 0.0, -1.0]);
        let x_lu = dense_lu(spd(), &b, 1e-12).unwrap();
        let x_chol = dense_cholesky(spd(), &b, 1e-12).unwrap();
        assert_relative_eq!(x_lu, x_chol, epsilon = 1e-13);
    }

    #[test]
    fn test_lu_flags_tiny_pivot() {
        let k = Mat::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0 + 1e-15]);
        let b = Vec::from_column_slice(&[1.0, 1.0]);
        assert!(matches!(
            dense_lu(k, &b, 1e-12),
            Err(SolveFailure::IllConditioned { equation: 1, .. })
                | Err(SolveFailure::Singular { equation: 1 })
        ));
    }
}
