//! Dense GF(256) matrices and the systematic Cauchy generator

use crate::coding::traits::{FecError, Result};
use crate::field::Gf256;
use tracing::debug;

/// Dense matrix over GF(256) using flat row-major storage
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    data: Vec<Gf256>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// All-zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![Gf256::ZERO; rows * cols],
            rows,
            cols,
        }
    }

    /// Square identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, Gf256::ONE);
        }
        m
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(row, col)`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Gf256 {
        debug_assert!(row < self.rows);
        debug_assert!(col < self.cols);
        self.data[row * self.cols + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: Gf256) {
        self.data[row * self.cols + col] = value;
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> &[Gf256] {
        debug_assert!(row < self.rows);
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Build a matrix from the given rows of `self`, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * self.cols);
        for &r in rows {
            data.extend_from_slice(self.row(r));
        }
        Self {
            data,
            rows: rows.len(),
            cols: self.cols,
        }
    }

    /// Whether this is a square identity matrix
    pub fn is_identity(&self) -> bool {
        self.rows == self.cols
            && (0..self.rows).all(|r| {
                self.row(r)
                    .iter()
                    .enumerate()
                    .all(|(c, v)| *v == if r == c { Gf256::ONE } else { Gf256::ZERO })
            })
    }

    /// Matrix product `self * rhs`
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(FecError::DimensionMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: rhs.rows,
                right_cols: rhs.cols,
            });
        }
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        for r in 0..self.rows {
            for c in 0..rhs.cols {
                let mut acc = Gf256::ZERO;
                for i in 0..self.cols {
                    acc += self.get(r, i) * rhs.get(i, c);
                }
                out.set(r, c, acc);
            }
        }
        Ok(out)
    }

    /// Invert a square matrix by Gauss-Jordan elimination on `[A | I]`
    pub fn invert(&self) -> Result<Matrix> {
        if self.rows != self.cols {
            return Err(FecError::SingularMatrix);
        }
        let n = self.rows;
        let mut work = self.clone();
        let mut inverse = Matrix::identity(n);

        for col in 0..n {
            // Find pivot
            let pivot_row = (col..n)
                .find(|&row| !work.get(row, col).is_zero())
                .ok_or(FecError::SingularMatrix)?;

            if pivot_row != col {
                work.swap_rows(col, pivot_row);
                inverse.swap_rows(col, pivot_row);
            }

            // Normalize pivot row
            let pivot_inv = work
                .get(col, col)
                .invert()
                .ok_or(FecError::ZeroInverse)?;
            work.scale_row(col, pivot_inv);
            inverse.scale_row(col, pivot_inv);

            // Eliminate other rows
            for row in 0..n {
                let factor = work.get(row, col);
                if row != col && !factor.is_zero() {
                    work.add_scaled_row(row, col, factor);
                    inverse.add_scaled_row(row, col, factor);
                }
            }
        }

        Ok(inverse)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    fn scale_row(&mut self, row: usize, factor: Gf256) {
        let start = row * self.cols;
        for v in &mut self.data[start..start + self.cols] {
            *v *= factor;
        }
    }

    /// `target += source * factor`
    fn add_scaled_row(&mut self, target: usize, source: usize, factor: Gf256) {
        for c in 0..self.cols {
            let v = self.get(source, c) * factor;
            self.data[target * self.cols + c] += v;
        }
    }
}

impl std::fmt::Debug for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Matrix {}x{} [", self.rows, self.cols)?;
        for r in 0..self.rows {
            let bytes: Vec<u8> = self.row(r).iter().map(|v| v.to_byte()).collect();
            writeln!(f, "  {bytes:02x?}")?;
        }
        write!(f, "]")
    }
}

/// Systematic `(k+m) x k` generator matrix with a Cauchy parity block.
///
/// Rows `0..k` are the identity. Parity row `k + i` holds `1 / (x_i + y_j)` in
/// column `j`, with `x_i = i` and `y_j = m + j`. The two point sets are disjoint
/// so every square submatrix of the Cauchy block is nonsingular, which makes any
/// `k` rows of the generator invertible.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratorMatrix {
    data_shards: usize,
    parity_shards: usize,
    matrix: Matrix,
}

impl GeneratorMatrix {
    /// Largest group size: all `x_i` and `y_j` must be distinct bytes.
    pub const MAX_TOTAL_SHARDS: usize = 256;

    /// Check `(k, m)` without building anything
    pub fn check_parameters(data_shards: usize, parity_shards: usize) -> Result<()> {
        if data_shards == 0 || data_shards + parity_shards > Self::MAX_TOTAL_SHARDS {
            return Err(FecError::InvalidParameters {
                data_shards,
                parity_shards,
            });
        }
        Ok(())
    }

    /// Build the generator for `(k, m)`
    pub fn new(data_shards: usize, parity_shards: usize) -> Result<Self> {
        Self::check_parameters(data_shards, parity_shards)?;

        let k = data_shards;
        let m = parity_shards;
        let mut matrix = Matrix::zeros(k + m, k);
        for i in 0..k {
            matrix.set(i, i, Gf256::ONE);
        }
        for i in 0..m {
            let x = Gf256::from(i as u8);
            for j in 0..k {
                let y = Gf256::from((m + j) as u8);
                let entry = (x + y).invert().ok_or(FecError::ZeroInverse)?;
                matrix.set(k + i, j, entry);
            }
        }

        debug!(k, m, "built cauchy generator matrix");

        Ok(Self {
            data_shards,
            parity_shards,
            matrix,
        })
    }

    /// Number of data shards (k)
    #[inline]
    pub fn data_shards(&self) -> usize {
        self.data_shards
    }

    /// Number of parity shards (m)
    #[inline]
    pub fn parity_shards(&self) -> usize {
        self.parity_shards
    }

    /// Number of rows (k + m)
    #[inline]
    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    /// Generator row for shard `index`
    #[inline]
    pub fn row(&self, index: usize) -> &[Gf256] {
        self.matrix.row(index)
    }

    /// Coefficients of parity shard `parity` (0-based within the parity block)
    #[inline]
    pub fn parity_row(&self, parity: usize) -> &[Gf256] {
        self.matrix.row(self.data_shards + parity)
    }

    /// The full matrix
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Inverse of the `k x k` submatrix formed by the given shard rows
    pub fn inverted_submatrix(&self, rows: &[usize]) -> Result<Matrix> {
        if rows.len() != self.data_shards {
            return Err(FecError::ShardCount {
                expected: self.data_shards,
                got: rows.len(),
            });
        }
        self.matrix.select_rows(rows).invert()
    }
}

impl std::fmt::Debug for GeneratorMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorMatrix")
            .field("data_shards", &self.data_shards)
            .field("parity_shards", &self.parity_shards)
            .field("matrix", &self.matrix)
            .finish()
    }
}
