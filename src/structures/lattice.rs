// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the Lattice structure and conversions between Cartesian and fractional coordinates.

use nalgebra::{Matrix3, RowVector3};
use ndarray::{Array2, ArrayView2};

use crate::errors::LatticeError;

/// Scale constant of the lattice vectors. Materials Studio documents are always unscaled.
pub const BASIS_SCALE: f64 = 1.0;

/// Identifies one of the three lattice vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeVector {
    A,
    B,
    C,
}

impl LatticeVector {
    /// Get the row of the basis matrix holding this vector.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            LatticeVector::A => 0,
            LatticeVector::B => 1,
            LatticeVector::C => 2,
        }
    }
}

/// Lattice vectors of a periodic structure.
/// Row `i` of the basis matrix is the lattice vector `i` (a, b, c).
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    basis: Matrix3<f64>,
}

impl Default for Lattice {
    /// Identity basis.
    fn default() -> Self {
        Lattice {
            basis: Matrix3::identity(),
        }
    }
}

impl From<[[f64; 3]; 3]> for Lattice {
    /// Construct the lattice from three lattice vectors (a, b, c).
    fn from(vectors: [[f64; 3]; 3]) -> Self {
        Lattice {
            basis: Matrix3::from_rows(&vectors.map(|v| RowVector3::new(v[0], v[1], v[2]))),
        }
    }
}

impl Lattice {
    /// Create a new lattice from lengths of the lattice vectors and angles between them (in degrees).
    /// Vector a is oriented along x, vector b lies in the xy plane.
    ///
    /// ## Example
    /// ```
    /// # use matstudio_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let lattice = Lattice::from_lengths_angles([5.0, 4.0, 3.0], [80.0, 70.0, 120.0]);
    /// let [a, b, c] = lattice.vectors();
    ///
    /// assert_approx_eq!(f64, a[0],  5.000000, epsilon = 0.0001);
    /// assert_approx_eq!(f64, b[0], -2.000000, epsilon = 0.0001);
    /// assert_approx_eq!(f64, b[1],  3.464102, epsilon = 0.0001);
    /// assert_approx_eq!(f64, c[0],  1.026060, epsilon = 0.0001);
    /// assert_approx_eq!(f64, c[1],  1.193930, epsilon = 0.0001);
    /// assert_approx_eq!(f64, c[2],  2.553768, epsilon = 0.0001);
    /// ```
    pub fn from_lengths_angles(lengths: [f64; 3], angles: [f64; 3]) -> Self {
        if angles == [90.0, 90.0, 90.0] {
            return Lattice::from([
                [lengths[0], 0.0, 0.0],
                [0.0, lengths[1], 0.0],
                [0.0, 0.0, lengths[2]],
            ]);
        }

        let [alpha, beta, gamma] = angles.map(f64::to_radians);

        let b = [lengths[1] * gamma.cos(), lengths[1] * gamma.sin(), 0.0];

        let cx = lengths[2] * beta.cos();
        let cy = lengths[2] * (alpha.cos() - beta.cos() * gamma.cos()) / gamma.sin();
        let cz = (lengths[2] * lengths[2] - cx * cx - cy * cy).sqrt();

        Lattice::from([[lengths[0], 0.0, 0.0], b, [cx, cy, cz]])
    }

    /// Get the basis matrix. Row `i` is the lattice vector `i`.
    #[inline(always)]
    pub fn basis(&self) -> &Matrix3<f64> {
        &self.basis
    }

    /// Get mutable reference to the basis matrix.
    #[inline(always)]
    pub fn basis_mut(&mut self) -> &mut Matrix3<f64> {
        &mut self.basis
    }

    /// Get the scale constant of the basis.
    #[inline(always)]
    pub fn scale(&self) -> f64 {
        BASIS_SCALE
    }

    /// Get the lattice vectors a, b, c.
    pub fn vectors(&self) -> [[f64; 3]; 3] {
        let mut vectors = [[0.0; 3]; 3];
        for (i, vector) in vectors.iter_mut().enumerate() {
            for (j, item) in vector.iter_mut().enumerate() {
                *item = self.basis[(i, j)];
            }
        }

        vectors
    }

    /// Get a single lattice vector.
    pub fn vector(&self, which: LatticeVector) -> [f64; 3] {
        self.vectors()[which.index()]
    }

    /// Replace a single lattice vector.
    pub fn set_vector(&mut self, which: LatticeVector, vector: [f64; 3]) {
        self.basis.set_row(
            which.index(),
            &RowVector3::new(vector[0], vector[1], vector[2]),
        );
    }

    /// Calculate lengths of the lattice vectors and angles between them (in degrees).
    ///
    /// ## Returns
    /// (`lengths`, `angles`) where angles are alpha (b-c), beta (a-c), and gamma (a-b).
    pub fn lengths_angles(&self) -> ([f64; 3], [f64; 3]) {
        let rows = [self.basis.row(0), self.basis.row(1), self.basis.row(2)];
        let lengths = [rows[0].norm(), rows[1].norm(), rows[2].norm()];

        let angle = |i: usize, j: usize| -> f64 {
            let cos = rows[i].dot(&rows[j]) / (lengths[i] * lengths[j]);
            cos.clamp(-1.0, 1.0).acos().to_degrees()
        };

        (lengths, [angle(1, 2), angle(0, 2), angle(0, 1)])
    }

    /// Calculate the volume of the unit cell.
    #[inline(always)]
    pub fn volume(&self) -> f64 {
        self.basis.determinant().abs() * BASIS_SCALE.powi(3)
    }

    /// Convert Cartesian coordinates to fractional (direct) coordinates.
    ///
    /// ## Parameters
    /// `cartesian` must be an `[n, 3]` array, one row per atom.
    ///
    /// ## Returns
    /// - `[n, 3]` array of fractional coordinates.
    /// - `LatticeError::Singular` if the basis can't be inverted.
    /// - `LatticeError::InvalidShape` if the array does not have three columns.
    pub fn cart2dir(&self, cartesian: ArrayView2<f64>) -> Result<Array2<f64>, LatticeError> {
        transform(cartesian, &self.inverse()?)
    }

    /// Convert fractional (direct) coordinates to Cartesian coordinates.
    ///
    /// ## Returns
    /// - `[n, 3]` array of Cartesian coordinates.
    /// - `LatticeError::InvalidShape` if the array does not have three columns.
    pub fn dir2cart(&self, fractional: ArrayView2<f64>) -> Result<Array2<f64>, LatticeError> {
        transform(fractional, &(self.basis * BASIS_SCALE))
    }

    /// Get the inverse of the scaled basis.
    pub(crate) fn inverse(&self) -> Result<Matrix3<f64>, LatticeError> {
        (self.basis * BASIS_SCALE)
            .try_inverse()
            .ok_or(LatticeError::Singular)
    }
}

/// Multiply every row of `coordinates` by `matrix` from the right.
pub(crate) fn transform(
    coordinates: ArrayView2<f64>,
    matrix: &Matrix3<f64>,
) -> Result<Array2<f64>, LatticeError> {
    if coordinates.ncols() != 3 {
        return Err(LatticeError::InvalidShape(coordinates.ncols()));
    }

    let mut result = Array2::zeros(coordinates.raw_dim());
    for (row, mut out) in coordinates.rows().into_iter().zip(result.rows_mut()) {
        let transformed = RowVector3::new(row[0], row[1], row[2]) * matrix;
        for (item, value) in out.iter_mut().zip(transformed.iter()) {
            *item = *value;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use ndarray::array;

    fn triclinic() -> Lattice {
        Lattice::from([
            [12.8083, 0.0, 0.0],
            [-6.40415, 11.0923, 0.0],
            [0.5, 0.25, 28.1569],
        ])
    }

    #[test]
    fn vectors() {
        let lattice = triclinic();
        let [a, b, c] = lattice.vectors();
        assert_eq!(a, [12.8083, 0.0, 0.0]);
        assert_eq!(b, [-6.40415, 11.0923, 0.0]);
        assert_eq!(c, [0.5, 0.25, 28.1569]);
        assert_eq!(lattice.basis()[(1, 1)], 11.0923);
        assert_eq!(lattice.scale(), 1.0);
    }

    #[test]
    fn set_vector() {
        let mut lattice = triclinic();
        lattice.set_vector(LatticeVector::C, [0.0, 0.0, 30.0]);
        assert_eq!(lattice.vector(LatticeVector::C), [0.0, 0.0, 30.0]);
        assert_eq!(lattice.vector(LatticeVector::A), [12.8083, 0.0, 0.0]);

        lattice.set_vector(LatticeVector::B, [0.0, 8.0, 0.0]);
        assert_eq!(lattice.vectors()[1], [0.0, 8.0, 0.0]);
        assert_eq!(lattice.vector(LatticeVector::C), [0.0, 0.0, 30.0]);
    }

    #[test]
    fn cart2dir_orthogonal() {
        let lattice = Lattice::from([[10.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 2.0]]);
        let cartesian = array![[5.0, 2.5, 1.0], [0.0, 0.0, 0.0], [10.0, -5.0, 3.0]];

        let direct = lattice.cart2dir(cartesian.view()).unwrap();
        let expected = array![[0.5, 0.5, 0.5], [0.0, 0.0, 0.0], [1.0, -1.0, 1.5]];

        for (x, y) in direct.iter().zip(expected.iter()) {
            assert_approx_eq!(f64, *x, *y);
        }
    }

    #[test]
    fn cart2dir_dir2cart_triclinic() {
        let lattice = triclinic();
        let cartesian = array![[1.0, 2.0, 3.0], [-4.5, 7.25, 14.0], [12.0, 0.1, 27.9]];

        let direct = lattice.cart2dir(cartesian.view()).unwrap();
        let back = lattice.dir2cart(direct.view()).unwrap();

        for (x, y) in back.iter().zip(cartesian.iter()) {
            assert_approx_eq!(f64, *x, *y, epsilon = 1e-10);
        }
    }

    #[test]
    fn dir2cart_lattice_points() {
        let lattice = triclinic();
        let direct = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 1.0]];
        let cartesian = lattice.dir2cart(direct.view()).unwrap();

        assert_approx_eq!(f64, cartesian[[0, 0]], 12.8083);
        assert_approx_eq!(f64, cartesian[[1, 0]], -6.40415);
        assert_approx_eq!(f64, cartesian[[1, 1]], 11.0923);
        assert_approx_eq!(f64, cartesian[[2, 0]], 12.8083 - 6.40415 + 0.5);
        assert_approx_eq!(f64, cartesian[[2, 2]], 28.1569);
    }

    #[test]
    fn cart2dir_singular() {
        let lattice = Lattice::from([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(
            lattice.cart2dir(array![[1.0, 1.0, 1.0]].view()),
            Err(LatticeError::Singular)
        );
    }

    #[test]
    fn cart2dir_invalid_shape() {
        let lattice = triclinic();
        assert_eq!(
            lattice.cart2dir(array![[1.0, 1.0]].view()),
            Err(LatticeError::InvalidShape(2))
        );
    }

    #[test]
    fn cart2dir_empty() {
        let lattice = triclinic();
        let empty = Array2::<f64>::zeros((0, 3));
        assert_eq!(lattice.cart2dir(empty.view()).unwrap().shape(), &[0, 3]);
    }

    #[test]
    fn lengths_angles_roundtrip() {
        let lattice = Lattice::from_lengths_angles([12.8083, 12.8083, 28.1569], [90.0, 90.0, 120.0]);
        let (lengths, angles) = lattice.lengths_angles();

        assert_approx_eq!(f64, lengths[0], 12.8083, epsilon = 1e-8);
        assert_approx_eq!(f64, lengths[1], 12.8083, epsilon = 1e-8);
        assert_approx_eq!(f64, lengths[2], 28.1569, epsilon = 1e-8);
        assert_approx_eq!(f64, angles[0], 90.0, epsilon = 1e-8);
        assert_approx_eq!(f64, angles[1], 90.0, epsilon = 1e-8);
        assert_approx_eq!(f64, angles[2], 120.0, epsilon = 1e-8);
    }

    #[test]
    fn lengths_angles_orthogonal() {
        let lattice = Lattice::from_lengths_angles([3.0, 4.0, 5.0], [90.0, 90.0, 90.0]);
        assert_eq!(
            lattice.vectors(),
            [[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]]
        );
        assert_approx_eq!(f64, lattice.volume(), 60.0);
    }
}
