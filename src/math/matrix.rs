use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Dense 2-D grid of f64 values, addressed by (row, col), 0-indexed.
///
/// The shape is fixed for the value's lifetime: operations that would change
/// it always produce a new matrix. The matrix product (`matmul`) and the
/// element-wise product (`hadamard`) are deliberately separate operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Fresh matrix with every entry drawn uniformly from [-1, 1).
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        res.randomize(rng);
        res
    }

    /// Column vector: one row per input value, order preserved.
    pub fn from_vec(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        Matrix { rows, cols, data }
    }

    /// Row-major flatten into a Vec of length rows × cols. Pure read.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    /// Overwrites every entry with an independent uniform sample from [-1, 1).
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for row in &mut self.data {
            for x in row {
                *x = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }
    }

    /// Element-wise addition in place. Shapes must be identical.
    pub fn add_matrix(&mut self, other: &Matrix) -> Result<()> {
        self.check_same_shape(other)?;
        for (row, other_row) in self.data.iter_mut().zip(other.data.iter()) {
            for (x, y) in row.iter_mut().zip(other_row.iter()) {
                *x += y;
            }
        }
        Ok(())
    }

    /// Adds a scalar to every entry in place.
    pub fn add_scalar(&mut self, value: f64) {
        for row in &mut self.data {
            for x in row {
                *x += value;
            }
        }
    }

    /// Element-wise a − b into a new matrix.
    pub fn sub(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        a.check_same_shape(b)?;
        let mut res = Matrix::zeros(a.rows, a.cols);
        for i in 0..a.rows {
            for j in 0..a.cols {
                res.data[i][j] = a.data[i][j] - b.data[i][j];
            }
        }
        Ok(res)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }
        res
    }

    /// Standard matrix product via plain dot-product accumulation.
    /// Requires a.cols == b.rows.
    pub fn matmul(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        if a.cols != b.rows {
            return Err(Error::DimensionMismatch {
                left_rows: a.rows,
                left_cols: a.cols,
                right_rows: b.rows,
                right_cols: b.cols,
            });
        }

        let mut res = Matrix::zeros(a.rows, b.cols);
        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;
                for k in 0..a.cols {
                    sum += a.data[i][k] * b.data[k][j];
                }
                res.data[i][j] = sum;
            }
        }
        Ok(res)
    }

    /// Element-wise (Hadamard) product in place. Shapes must be identical.
    /// Not the matrix product; see `matmul`.
    pub fn hadamard(&mut self, other: &Matrix) -> Result<()> {
        self.check_same_shape(other)?;
        for (row, other_row) in self.data.iter_mut().zip(other.data.iter()) {
            for (x, y) in row.iter_mut().zip(other_row.iter()) {
                *x *= y;
            }
        }
        Ok(())
    }

    /// Scales every entry in place.
    pub fn scale(&mut self, factor: f64) {
        for row in &mut self.data {
            for x in row {
                *x *= factor;
            }
        }
    }

    /// Applies a scalar function to every entry, producing a new matrix.
    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_data(
            self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        )
    }

    /// Applies a scalar function to every entry in place.
    pub fn map_in_place<F>(&mut self, functor: F)
    where
        F: Fn(f64) -> f64,
    {
        for row in &mut self.data {
            for x in row {
                *x = functor(*x);
            }
        }
    }

    fn check_same_shape(&self, other: &Matrix) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(Error::ShapeMismatch {
                expected_rows: self.rows,
                expected_cols: self.cols,
                got_rows: other.rows,
                got_cols: other.cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zeros_shape_and_entries() {
        let m = Matrix::zeros(3, 2);
        assert_eq!((m.rows, m.cols), (3, 2));
        assert!(m.data.iter().flatten().all(|&x| x == 0.0));
    }

    #[test]
    fn from_vec_is_column_vector() {
        let m = Matrix::from_vec(&[1.0, 2.0, 3.0]);
        assert_eq!((m.rows, m.cols), (3, 1));
        assert_eq!(m.data, vec![vec![1.0], vec![2.0], vec![3.0]]);
    }

    #[test]
    fn to_vec_flattens_row_major() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(m.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        // Restartable: a second read yields the same sequence.
        assert_eq!(m.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn randomize_range_and_seeded_determinism() {
        let mut rng = StdRng::seed_from_u64(11);
        let m = Matrix::random(4, 5, &mut rng);
        assert!(m.data.iter().flatten().all(|&x| (-1.0..1.0).contains(&x)));

        let mut rng2 = StdRng::seed_from_u64(11);
        let m2 = Matrix::random(4, 5, &mut rng2);
        assert_eq!(m, m2);
    }

    #[test]
    fn add_matrix_in_place() {
        let mut a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![10.0, 20.0], vec![30.0, 40.0]]);
        a.add_matrix(&b).unwrap();
        assert_eq!(a.data, vec![vec![11.0, 22.0], vec![33.0, 44.0]]);
    }

    #[test]
    fn add_matrix_shape_mismatch() {
        let mut a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(2, 3);
        assert_eq!(
            a.add_matrix(&b),
            Err(Error::ShapeMismatch {
                expected_rows: 2,
                expected_cols: 2,
                got_rows: 2,
                got_cols: 3,
            })
        );
        // Failed ops leave the target untouched.
        assert_eq!(a, Matrix::zeros(2, 2));
    }

    #[test]
    fn add_scalar_in_place() {
        let mut a = Matrix::from_data(vec![vec![1.0, -1.0]]);
        a.add_scalar(0.5);
        assert_eq!(a.data, vec![vec![1.5, -0.5]]);
    }

    #[test]
    fn sub_element_wise() {
        let a = Matrix::from_data(vec![vec![5.0, 7.0]]);
        let b = Matrix::from_data(vec![vec![2.0, 3.0]]);
        let c = Matrix::sub(&a, &b).unwrap();
        assert_eq!(c.data, vec![vec![3.0, 4.0]]);
    }

    #[test]
    fn sub_shape_mismatch() {
        let a = Matrix::zeros(1, 2);
        let b = Matrix::zeros(2, 1);
        assert!(matches!(
            Matrix::sub(&a, &b),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn transpose_swaps_entries() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let t = m.transpose();
        assert_eq!((t.rows, t.cols), (3, 2));
        assert_eq!(
            t.data,
            vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]
        );
    }

    #[test]
    fn matmul_values() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![3.0, 2.0], vec![1.0, 3.0]]);
        let c = Matrix::matmul(&a, &b).unwrap();
        assert_eq!(c.data, vec![vec![5.0, 8.0], vec![13.0, 18.0]]);
    }

    #[test]
    fn matmul_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);
        assert_eq!(
            Matrix::matmul(&a, &b),
            Err(Error::DimensionMismatch {
                left_rows: 2,
                left_cols: 3,
                right_rows: 2,
                right_cols: 2,
            })
        );
    }

    #[test]
    fn hadamard_is_element_wise() {
        let mut a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![2.0, 2.0], vec![0.5, 0.0]]);
        a.hadamard(&b).unwrap();
        assert_eq!(a.data, vec![vec![2.0, 4.0], vec![1.5, 0.0]]);
    }

    #[test]
    fn hadamard_shape_mismatch() {
        let mut a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(3, 2);
        assert!(matches!(a.hadamard(&b), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn scale_in_place() {
        let mut a = Matrix::from_data(vec![vec![1.0, -2.0]]);
        a.scale(3.0);
        assert_eq!(a.data, vec![vec![3.0, -6.0]]);
    }

    #[test]
    fn map_preserves_shape() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let doubled = m.map(|x| x * 2.0);
        assert_eq!(doubled.data, vec![vec![2.0, 4.0], vec![6.0, 8.0]]);
        // Source untouched.
        assert_eq!(m.data[0][0], 1.0);

        let mut n = m.clone();
        n.map_in_place(|x| x + 1.0);
        assert_eq!(n.data, vec![vec![2.0, 3.0], vec![4.0, 5.0]]);
    }
}
