//! Singular value decomposition of trajectory matrices
//!
//! The decomposition itself is nalgebra's. What this module adds is a
//! deterministic presentation of it: singular triplets in descending
//! order and left singular vectors with a fixed sign.

use crate::{MathError, Result};
use nalgebra::{DMatrix, SVD};
use std::cmp::Ordering;

/// Iteration cap handed to the SVD; a zero cap would never give up.
const MAX_SVD_ITERATIONS: usize = 10_000;

/// Left singular vectors and singular values of a matrix.
///
/// `values` are sorted in descending order (ties broken by the index
/// nalgebra reports them at) and column `i` of `vectors` is the unit left
/// singular vector for `values[i]`, flipped so that its largest-magnitude
/// component is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct SingularSpectrum {
    pub values: Vec<f64>,
    pub vectors: DMatrix<f64>,
}

impl SingularSpectrum {
    /// Number of singular triplets
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the spectrum holds no triplets
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keep the leading `rank` triplets
    pub fn truncate(self, rank: usize) -> Result<Self> {
        if rank == 0 {
            return Err(MathError::InvalidInput(
                "At least one singular vector must be kept".to_string(),
            ));
        }
        if rank > self.len() {
            return Err(MathError::InsufficientData(format!(
                "Only {} singular vectors are available, {} requested",
                self.len(),
                rank
            )));
        }

        Ok(Self {
            values: self.values[..rank].to_vec(),
            vectors: self.vectors.columns(0, rank).into_owned(),
        })
    }
}

/// Thin SVD of `matrix`, keeping the left singular vectors.
///
/// For a `K x N` matrix this yields `min(K, N)` triplets.
pub fn singular_spectrum(matrix: &DMatrix<f64>) -> Result<SingularSpectrum> {
    if matrix.is_empty() {
        return Err(MathError::InvalidInput(
            "Cannot decompose an empty matrix".to_string(),
        ));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Matrix contains non-finite values".to_string(),
        ));
    }

    let svd = SVD::try_new(matrix.clone(), true, false, f64::EPSILON, MAX_SVD_ITERATIONS)
        .ok_or_else(|| {
            MathError::CalculationError(format!(
                "SVD did not converge in {} iterations",
                MAX_SVD_ITERATIONS
            ))
        })?;
    let u = svd.u.ok_or_else(|| {
        MathError::CalculationError("SVD returned no left singular vectors".to_string())
    })?;
    let singular = svd.singular_values;

    let mut order: Vec<usize> = (0..singular.len()).collect();
    order.sort_by(|&i, &j| {
        singular[j]
            .partial_cmp(&singular[i])
            .unwrap_or(Ordering::Equal)
            .then(i.cmp(&j))
    });

    let values = order.iter().map(|&i| singular[i]).collect();
    let mut vectors = u.select_columns(order.iter());
    for j in 0..vectors.ncols() {
        normalise_sign(&mut vectors, j);
    }

    Ok(SingularSpectrum { values, vectors })
}

/// Flip column `j` so that its largest-magnitude entry (first on ties) is
/// positive.
fn normalise_sign(matrix: &mut DMatrix<f64>, j: usize) {
    let pivot = matrix.column(j).iamax();
    if matrix[(pivot, j)] < 0.0 {
        matrix.column_mut(j).iter_mut().for_each(|v| *v = -*v);
    }
}

/// Build a matrix from equally long column vectors
pub fn matrix_from_columns(columns: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let rows = columns.first().map_or(0, Vec::len);
    if columns.is_empty() || rows == 0 {
        return Err(MathError::InvalidInput(
            "At least one non-empty column is required".to_string(),
        ));
    }
    if columns.iter().any(|c| c.len() != rows) {
        return Err(MathError::InvalidInput(
            "All columns must have the same length".to_string(),
        ));
    }

    Ok(DMatrix::from_fn(rows, columns.len(), |i, j| columns[j][i]))
}

/// Copy every column of `matrix` into its own vector
pub fn matrix_columns(matrix: &DMatrix<f64>) -> Vec<Vec<f64>> {
    matrix
        .column_iter()
        .map(|c| c.iter().copied().collect())
        .collect()
}
