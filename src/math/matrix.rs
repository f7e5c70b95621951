use rand::Rng;
use thiserror::Error;

/// Raised when two operands do not line up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shapes {left:?} and {right:?} not aligned for {op}")]
pub struct ShapeError {
    pub op: &'static str,
    pub left: (usize, usize),
    pub right: (usize, usize),
}

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Wraps `data` as a `rows x cols` matrix; `data.len()` must equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix, ShapeError> {
        if data.len() != rows * cols {
            return Err(ShapeError { op: "reshape", left: (1, data.len()), right: (rows, cols) });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// A single-row matrix holding `values`.
    pub fn row(values: &[f64]) -> Matrix {
        Matrix { rows: 1, cols: values.len(), data: values.to_vec() }
    }

    /// Glorot (Xavier) uniform initialization: `U(-l, l)` with
    /// `l = sqrt(6 / (rows + cols))`.
    ///
    /// `rows` is the fan-in and `cols` the fan-out of the layer the matrix
    /// feeds, matching the `input x output` weight layout used by `Dense`.
    pub fn glorot_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let limit = (6.0 / (rows + cols) as f64).sqrt();
        let data = (0..rows * cols).map(|_| rng.gen_range(-limit..limit)).collect();
        Matrix { rows, cols, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row_slice(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Gathers the listed rows into a new matrix, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row_slice(i));
        }
        Matrix { rows: indices.len(), cols: self.cols, data }
    }

    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix, ShapeError> {
        if self.cols != rhs.rows {
            return Err(ShapeError { op: "matmul", left: self.shape(), right: rhs.shape() });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == 0.0 {
                    continue;
                }
                let rhs_row = rhs.row_slice(k);
                let out = &mut res.data[i * rhs.cols..(i + 1) * rhs.cols];
                for (o, b) in out.iter_mut().zip(rhs_row) {
                    *o += a * b;
                }
            }
        }
        Ok(res)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Element-wise combination of two same-shape matrices.
    pub fn zip_map<F>(&self, rhs: &Matrix, functor: F) -> Result<Matrix, ShapeError>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(ShapeError { op: "elementwise", left: self.shape(), right: rhs.shape() });
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data).map(|(&a, &b)| functor(a, b)).collect(),
        })
    }

    /// Adds a `1 x cols` row vector to every row (bias broadcast).
    pub fn add_row(&self, bias: &Matrix) -> Result<Matrix, ShapeError> {
        if bias.rows != 1 || bias.cols != self.cols {
            return Err(ShapeError { op: "add_row", left: self.shape(), right: bias.shape() });
        }
        let mut res = self.clone();
        for chunk in res.data.chunks_mut(self.cols.max(1)) {
            for (x, b) in chunk.iter_mut().zip(&bias.data) {
                *x += b;
            }
        }
        Ok(res)
    }

    /// Column sums as a `1 x cols` matrix.
    pub fn sum_rows(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for i in 0..self.rows {
            for (acc, x) in res.data.iter_mut().zip(self.row_slice(i)) {
                *acc += x;
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn m(rows: usize, cols: usize, data: &[f64]) -> Matrix {
        Matrix::from_vec(rows, cols, data.to_vec()).unwrap()
    }

    #[test]
    fn matmul_multiplies() {
        let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = m(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c, m(2, 2, &[58.0, 64.0, 139.0, 154.0]));
    }

    #[test]
    fn matmul_rejects_misaligned_operands() {
        let a = Matrix::row(&[1.0, 2.0, 3.0]);
        let b = Matrix::zeros(10, 16);
        let err = a.matmul(&b).unwrap_err();
        assert_eq!(err.left, (1, 3));
        assert_eq!(err.right, (10, 16));
        assert!(err.to_string().contains("matmul"));
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 3]).is_err());
        assert!(Matrix::from_vec(0, 10, vec![]).is_ok());
    }

    #[test]
    fn transpose_swaps_axes() {
        let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(2, 1), 6.0);
        assert_eq!(t.get(0, 1), 4.0);
    }

    #[test]
    fn add_row_broadcasts_bias() {
        let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::row(&[10.0, 20.0]);
        assert_eq!(a.add_row(&b).unwrap(), m(2, 2, &[11.0, 22.0, 13.0, 24.0]));
        assert!(a.add_row(&Matrix::row(&[1.0])).is_err());
    }

    #[test]
    fn sum_rows_collapses_batch() {
        let a = m(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(a.sum_rows(), Matrix::row(&[9.0, 12.0]));
    }

    #[test]
    fn select_rows_keeps_order() {
        let a = m(3, 1, &[1.0, 2.0, 3.0]);
        assert_eq!(a.select_rows(&[2, 0]).data(), &[3.0, 1.0]);
    }

    #[test]
    fn glorot_uniform_stays_within_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = Matrix::glorot_uniform(10, 16, &mut rng);
        let limit = (6.0_f64 / 26.0).sqrt();
        assert_eq!(w.shape(), (10, 16));
        assert!(w.data().iter().all(|x| x.abs() < limit));
    }
}
