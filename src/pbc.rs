pub mod periodic_boundary_conditions {
    /*
    How do we handle periodic boundaries when all we have are snapshots?

    The cell is stored with the lattice vectors as rows, so a fractional row
    vector f maps to cartesian coordinates as  r = f . cell.  With nalgebra's
    column vectors that is  r = cell^T f,  and the way back is
    f = (cell^-1)^T r.  The inverse is computed once when the cell is built.

    Fractional coordinates wrap into [0, 1) at the box edge, so a naive
    difference between two snapshots shows a jump of almost a whole cell
    whenever an atom crosses a face. minimum_image_fractional folds those
    jumps back.
     */
    use nalgebra::{Matrix3, Vector3};

    use crate::error::{DosError, DosResult};

    #[derive(Clone, Debug, PartialEq)]
    pub struct Cell {
        matrix: Matrix3<f64>,
        inverse: Matrix3<f64>,
    }

    impl Cell {
        /// Build a cell from its three lattice vectors (rows).
        pub fn from_rows(rows: [[f64; 3]; 3]) -> DosResult<Self> {
            let matrix = Matrix3::from_row_slice(&[
                rows[0][0], rows[0][1], rows[0][2], //
                rows[1][0], rows[1][1], rows[1][2], //
                rows[2][0], rows[2][1], rows[2][2],
            ]);
            Self::new(matrix)
        }

        pub fn new(matrix: Matrix3<f64>) -> DosResult<Self> {
            if matrix.iter().any(|x| !x.is_finite()) {
                return Err(DosError::InvalidParameter(
                    "cell matrix contains non-finite entries".to_string(),
                ));
            }
            if matrix.determinant().abs() < 1e-12 {
                return Err(DosError::InvalidParameter(format!(
                    "cell matrix is singular (det = {:e})",
                    matrix.determinant()
                )));
            }
            let inverse = matrix.try_inverse().ok_or_else(|| {
                DosError::InvalidParameter("cell matrix cannot be inverted".to_string())
            })?;
            Ok(Cell { matrix, inverse })
        }

        pub fn cubic(side: f64) -> DosResult<Self> {
            Self::new(Matrix3::from_diagonal_element(side))
        }

        /// Matrix where lattice vectors are rows.
        pub fn matrix(&self) -> &Matrix3<f64> {
            &self.matrix
        }

        pub fn volume(&self) -> f64 {
            self.matrix.determinant().abs()
        }

        pub fn to_cartesian(&self, frac: &Vector3<f64>) -> Vector3<f64> {
            self.matrix.transpose() * frac
        }

        pub fn to_fractional(&self, cart: &Vector3<f64>) -> Vector3<f64> {
            self.inverse.transpose() * cart
        }

        /// Fractional coordinates of `cart`, wrapped into [0, 1).
        pub fn scaled_position(&self, cart: &Vector3<f64>) -> Vector3<f64> {
            self.to_fractional(cart).map(wrap_fractional)
        }

        /// Largest absolute difference between matching matrix entries.
        pub fn max_deviation(&self, other: &Cell) -> f64 {
            (self.matrix - other.matrix).amax()
        }

        pub fn approx_eq(&self, other: &Cell, tolerance: f64) -> bool {
            self.max_deviation(other) <= tolerance
        }
    }

    pub fn wrap_fractional(x: f64) -> f64 {
        let wrapped = x.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative inputs
        if wrapped >= 1.0 {
            0.0
        } else {
            wrapped
        }
    }

    /// Fold a fractional displacement component back into [-0.5, 0.5].
    pub fn minimum_image_fractional(d: f64) -> f64 {
        if d > 0.5 {
            d - 1.0
        } else if d < -0.5 {
            d + 1.0
        } else {
            d
        }
    }

}
