//! Sparse storage for the global stiffness matrix
//!
//! Assembly collects COO triplets; the solver either densifies them or copies
//! them into a skyline (variable band) profile for an in-place Cholesky.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use super::solve::SolveFailure;

/// Sparse matrix builder using COO format
///
/// Duplicate (row, col) entries are kept and summed on conversion.
#[derive(Debug, Clone)]
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder
    pub fn new(size: usize) -> Self {
        // 6 DOFs per node, a handful of members per node
        Self {
            size,
            entries: Vec::with_capacity(size * 60),
        }
    }

    /// Matrix dimension
    pub fn size(&self) -> usize {
        self.size
    }

    /// Add a value to the matrix (accumulates if already exists)
    ///
    /// Exact zeros are skipped. Any other value, however small, is stored.
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    /// Append triplets in order
    pub fn extend<I>(&mut self, triplets: I)
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        for (row, col, value) in triplets {
            self.add(row, col, value);
        }
    }

    /// Stored triplets in insertion order
    pub fn triplets(&self) -> &[(usize, usize, f64)] {
        &self.entries
    }

    /// Convert to CSR format
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);
        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }
        CsrMatrix::from(&coo)
    }

    /// Convert to a dense matrix, summing in insertion order
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut mat = DMatrix::zeros(self.size, self.size);
        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }
        mat
    }

    /// Number of stored triplets
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Cholesky factorization in skyline storage for symmetric positive
/// definite matrices
///
/// Row `i` stores the lower triangle from its first non-zero column up to
/// and including the diagonal.
#[derive(Debug, Clone)]
pub struct SkylineCholesky {
    size: usize,
    rows: Vec<Vec<f64>>,
    first: Vec<usize>,
}

impl SkylineCholesky {
    /// Factorize a symmetric matrix given in CSR form
    ///
    /// Fails when a pivot is not positive, or when the squared pivot relative
    /// to the original diagonal drops below `pivot_tolerance`.
    pub fn factorize(csr: &CsrMatrix<f64>, pivot_tolerance: f64) -> Result<Self, SolveFailure> {
        let size = csr.nrows();

        let mut first: Vec<usize> = (0..size).collect();
        for (row, col, _) in csr.triplet_iter() {
            if col < row && col < first[row] {
                first[row] = col;
            }
        }

        let mut rows: Vec<Vec<f64>> = first
            .iter()
            .enumerate()
            .map(|(row, &start)| vec![0.0; row - start + 1])
            .collect();
        for (row, col, &val) in csr.triplet_iter() {
            if col <= row {
                rows[row][col - first[row]] += val;
            }
        }

        let mut factor = Self { size, rows, first };
        factor.decompose(pivot_tolerance)?;
        Ok(factor)
    }

    fn decompose(&mut self, pivot_tolerance: f64) -> Result<(), SolveFailure> {
        for i in 0..self.size {
            let start_i = self.first[i];

            for j in start_i..i {
                let start = start_i.max(self.first[j]);
                let sum: f64 = (start..j).map(|k| self.lower(i, k) * self.lower(j, k)).sum();
                let pivot = self.lower(j, j);
                self.rows[i][j - start_i] = (self.rows[i][j - start_i] - sum) / pivot;
            }

            let original = self.lower(i, i);
            if original <= 0.0 {
                return Err(SolveFailure::Singular { equation: i });
            }
            let sum: f64 = (start_i..i).map(|k| self.lower(i, k).powi(2)).sum();
            let diag = original - sum;
            if !(diag > 0.0) {
                return Err(SolveFailure::Singular { equation: i });
            }
            let ratio = diag / original;
            if ratio < pivot_tolerance {
                return Err(SolveFailure::IllConditioned { equation: i, ratio });
            }
            let last = i - start_i;
            self.rows[i][last] = diag.sqrt();
        }
        Ok(())
    }

    /// Entry (row, col) of the lower triangle, `col <= row`
    #[inline]
    fn lower(&self, row: usize, col: usize) -> f64 {
        let start = self.first[row];
        if col < start {
            0.0
        } else {
            self.rows[row][col - start]
        }
    }

    /// Number of stored entries in the profile
    pub fn profile_len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Solve L · Lᵀ · x = b
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        let mut x = b.clone();

        // Forward substitution: L · y = b
        for i in 0..self.size {
            let sum: f64 = (self.first[i]..i).map(|j| self.lower(i, j) * x[j]).sum();
            x[i] = (x[i] - sum) / self.lower(i, i);
        }

        // Backward substitution: Lᵀ · x = y
        for i in (0..self.size).rev() {
            x[i] /= self.lower(i, i);
            let xi = x[i];
            for j in self.first[i]..i {
                x[j] -= self.lower(i, j) * xi;
            }
        }

        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra_sparse::convert::serial::convert_csr_dense;

    fn banded_spd(n: usize) -> SparseMatrixBuilder {
        let mut builder = SparseMatrixBuilder::new(n);
        for i in 0..n {
            builder.add(i, i, 4.0);
            if i + 1 < n {
                builder.add(i, i + 1, -1.0);
                builder.add(i + 1, i, -1.0);
            }
        }
        builder
    }

    #[test]
    fn test_duplicates_accumulate_and_zeros_dropped() {
        let mut builder = SparseMatrixBuilder::new(2);
        builder.add(0, 0, 1.5);
        builder.add(0, 0, 2.5);
        builder.add(1, 0, 0.0);
        builder.add(1, 1, 1e-300);
        assert_eq!(builder.nnz(), 3);
        let dense = builder.to_dense();
        assert_eq!(dense[(0, 0)], 4.0);
        assert_eq!(dense[(1, 1)], 1e-300);
        assert_eq!(convert_csr_dense(&builder.to_csr()), dense);
    }

    #[test]
    fn test_skyline_matches_dense_cholesky() {
        let builder = banded_spd(8);
        let b = DVector::from_fn(8, |i, _| (i as f64 + 1.0).sin());
        let factor = SkylineCholesky::factorize(&builder.to_csr(), 1e-12).unwrap();
        let x = factor.solve(&b);
        let expected = builder.to_dense().cholesky().unwrap().solve(&b);
        assert_relative_eq!(x, expected, epsilon = 1e-12);
        assert_eq!(factor.profile_len(), 8 + 7);
    }

    #[test]
    fn test_skyline_reports_singular_equation() {
        let mut builder = SparseMatrixBuilder::new(3);
        builder.add(0, 0, 1.0);
        builder.add(2, 2, 1.0);
        assert_eq!(
            SkylineCholesky::factorize(&builder.to_csr(), 1e-12).unwrap_err(),
            SolveFailure::Singular { equation: 1 }
        );
    }

    #[test]
    fn test_skyline_reports_tiny_pivot() {
        let mut builder = SparseMatrixBuilder::new(2);
        builder.add(0, 0, 1.0);
        builder.add(0, 1, 1.0);
        builder.add(1, 0, 1.0);
        builder.add(1, 1, 1.0 + 1e-14);
        match SkylineCholesky::factorize(&builder.to_csr(), 1e-12) {
            Err(SolveFailure::IllConditioned { equation, ratio }) => {
                assert_eq!(equation, 1);
                assert!(ratio < 1e-12);
            }
            other => panic!("expected ill-conditioning, got {:?}", other),
        }
    }
}
