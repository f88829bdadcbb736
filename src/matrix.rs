use std::fmt;
use std::ops::{ Index, IndexMut, Mul };

use crate::feq;
use crate::error::{ Error, Result };
use crate::tuple::Tuple4D;

/// A 2x2 matrix, only used while expanding 3x3 determinants.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Matrix2D {
    data: [f64; 4],
}

/// A 3x3 matrix, only used while expanding 4x4 determinants.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Matrix3D {
    data: [f64; 9],
}

/// A 4x4 row-major transform matrix.
///
/// Every shape, pattern and camera owns one of these. Points and vectors are
/// multiplied on the right (`m * p`), and transforms compose right to left:
/// `translation * scaling` scales first.
///
/// # Examples
///
/// ```
/// # use pixie::tuple::Tuple4D;
/// # use pixie::matrix::Matrix4D;
/// let m = Matrix4D::translation(1.0, 0.0, 0.0) * Matrix4D::scaling(2.0, 2.0, 2.0);
/// assert_eq!(m * Tuple4D::point(1.0, 1.0, 1.0), Tuple4D::point(3.0, 2.0, 2.0));
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Matrix4D {
    data: [f64; 16],
}

impl From<[f64; 4]> for Matrix2D {
    fn from(data: [f64; 4]) -> Matrix2D {
        Matrix2D { data }
    }
}

impl From<[f64; 9]> for Matrix3D {
    fn from(data: [f64; 9]) -> Matrix3D {
        Matrix3D { data }
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        Matrix4D { data }
    }
}

impl Index<(usize, usize)> for Matrix2D {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.data[r * 2 + c]
    }
}

impl Index<(usize, usize)> for Matrix3D {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.data[r * 3 + c]
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.data[r * 4 + c]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.data[r * 4 + c]
    }
}

/// The sign a minor takes in the cofactor matrix.
fn cofactor_sign(row: usize, col: usize) -> f64 {
    if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
}

impl Matrix2D {
    fn determinant(&self) -> f64 {
        self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]
    }
}

impl Matrix3D {
    /// Drops `row` and `col`, keeping the remaining 2x2 block.
    fn submatrix(&self, row: usize, col: usize) -> Matrix2D {
        let mut buf = [0.0; 4];
        let kept = (0..3).filter(|&r| r != row)
            .flat_map(|r| (0..3).filter(move |&c| c != col).map(move |c| (r, c)));

        for (slot, (r, c)) in buf.iter_mut().zip(kept) {
            *slot = self[(r, c)];
        }

        Matrix2D { data: buf }
    }

    fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        self.minor(row, col) * cofactor_sign(row, col)
    }

    fn determinant(&self) -> f64 {
        (0..3).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }
}

/// Matrices are compared element-wise within `FEQ_EPSILON`.
impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Matrix4D {
    /// A matrix of zeros.
    pub fn new() -> Matrix4D {
        Matrix4D { data: [0.0; 16] }
    }

    pub fn identity() -> Matrix4D {
        let mut m = Self::new();
        for i in 0..4 {
            m[(i, i)] = 1.0;
        }

        m
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 3)] = x;
        m[(1, 3)] = y;
        m[(2, 3)] = z;

        m
    }

    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 0)] = x;
        m[(1, 1)] = y;
        m[(2, 2)] = z;

        m
    }

    /// Rotation about the X axis by `r` radians.
    pub fn rotation_x(r: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(1, 1)] =  r.cos();
        m[(1, 2)] = -r.sin();
        m[(2, 1)] =  r.sin();
        m[(2, 2)] =  r.cos();

        m
    }

    /// Rotation about the Y axis by `r` radians.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 0)] =  r.cos();
        m[(0, 2)] =  r.sin();
        m[(2, 0)] = -r.sin();
        m[(2, 2)] =  r.cos();

        m
    }

    /// Rotation about the Z axis by `r` radians.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 0)] =  r.cos();
        m[(0, 1)] = -r.sin();
        m[(1, 0)] =  r.sin();
        m[(1, 1)] =  r.cos();

        m
    }

    /// A shear where each parameter moves one axis in proportion to another,
    /// e.g. `xy` moves x in proportion to y.
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix4D {
        let mut m = Self::identity();
        m[(0, 1)] = xy;
        m[(0, 2)] = xz;
        m[(1, 0)] = yx;
        m[(1, 2)] = yz;
        m[(2, 0)] = zx;
        m[(2, 1)] = zy;

        m
    }

    /// Orients the world relative to an eye at `from` looking toward `to`.
    ///
    /// The result moves the *world*, not the eye; it is meant to be assigned
    /// to a `Camera`.
    pub fn view_transform(from: Tuple4D, to: Tuple4D, up: Tuple4D) -> Matrix4D {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);

        let orientation: Matrix4D = [
            left.x, left.y, left.z, 0.0,
            true_up.x, true_up.y, true_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ].into();

        orientation * Matrix4D::translation(-from.x, -from.y, -from.z)
    }

    pub fn transposition(&self) -> Matrix4D {
        let mut t = Matrix4D::new();
        for r in 0..4 {
            for c in 0..4 {
                t[(c, r)] = self[(r, c)];
            }
        }

        t
    }

    fn submatrix(&self, row: usize, col: usize) -> Matrix3D {
        let mut buf = [0.0; 9];
        let kept = (0..4).filter(|&r| r != row)
            .flat_map(|r| (0..4).filter(move |&c| c != col).map(move |c| (r, c)));

        for (slot, (r, c)) in buf.iter_mut().zip(kept) {
            *slot = self[(r, c)];
        }

        Matrix3D { data: buf }
    }

    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        self.minor(row, col) * cofactor_sign(row, col)
    }

    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self[(0, c)] * self.cofactor(0, c)).sum()
    }

    /// The inverse, or `None` when the determinant is zero.
    pub fn inverse(&self) -> Option<Matrix4D> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }

        let mut inv = Matrix4D::new();
        for r in 0..4 {
            for c in 0..4 {
                inv[(c, r)] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }

    /// Like `inverse`, but a singular matrix is a scene configuration error.
    pub fn try_inverse(&self) -> Result<Matrix4D> {
        self.inverse().ok_or(Error::SingularTransform)
    }
}

impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::new();

        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = (0..4).map(|k| self[(r, k)] * other[(k, c)]).sum();
            }
        }

        res
    }
}

impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        let row = |r: usize| self[(r, 0)] * t.x
            + self[(r, 1)] * t.y
            + self[(r, 2)] * t.z
            + self[(r, 3)] * t.w;

        Tuple4D::tuple(row(0), row(1), row(2), row(3))
    }
}

impl fmt::Display for Matrix4D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            write!(f, "|")?;
            for c in 0..4 {
                write!(f, " {} |", self[(r, c)])?;
            }

            if r != 3 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[test]
fn identity_leaves_matrix_unchanged() {
    let a: Matrix4D = [ 0.0, 1.0,  2.0,  4.0,
                        1.0, 2.0,  4.0,  8.0,
                        2.0, 4.0,  8.0, 16.0,
                        4.0, 8.0, 16.0, 32.0, ].into();

    assert_eq!(Matrix4D::identity() * a, a);
    assert_eq!(a * Matrix4D::identity(), a);
}

#[test]
fn transposition_swaps_rows_and_columns() {
    let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                        9.0, 8.0, 0.0, 8.0,
                        1.0, 8.0, 5.0, 3.0,
                        0.0, 0.0, 5.0, 8.0, ].into();

    let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                        9.0, 8.0, 8.0, 0.0,
                        3.0, 0.0, 5.0, 5.0,
                        0.0, 8.0, 3.0, 8.0, ].into();

    assert_eq!(a.transposition(), t);
    assert_eq!(Matrix4D::identity().transposition(), Matrix4D::identity());
}

#[test]
fn mat3_submatrix_minor_and_cofactor() {
    let a: Matrix3D = [ 3.0,  5.0,  0.0,
                        2.0, -1.0, -7.0,
                        6.0, -1.0,  5.0, ].into();

    assert_eq!(a.submatrix(1, 0).determinant(), 25.0);
    assert_eq!(a.minor(1, 0), 25.0);
    assert_eq!(a.minor(0, 0), -12.0);
    assert_eq!(a.cofactor(0, 0), -12.0);
    assert_eq!(a.cofactor(1, 0), -25.0);
}

#[test]
fn mat3_determinant() {
    let a: Matrix3D = [  1.0, 2.0,  6.0,
                        -5.0, 8.0, -4.0,
                         2.0, 6.0,  4.0, ].into();

    assert_eq!(a.cofactor(0, 0), 56.0);
    assert_eq!(a.cofactor(0, 1), 12.0);
    assert_eq!(a.cofactor(0, 2), -46.0);
    assert_eq!(a.determinant(), -196.0);
}

#[test]
fn mat4_submatrix_and_determinant() {
    let a: Matrix4D = [ -2.0, -8.0,  3.0,  5.0,
                        -3.0,  1.0,  7.0,  3.0,
                         1.0,  2.0, -9.0,  6.0,
                        -6.0,  7.0,  7.0, -9.0, ].into();

    let s: Matrix3D = [ -2.0, -8.0,  5.0,
                        -3.0,  1.0,  3.0,
                        -6.0,  7.0, -9.0, ].into();

    assert_eq!(a.submatrix(2, 2), s);
    assert_eq!(a.cofactor(0, 0), 690.0);
    assert_eq!(a.cofactor(0, 1), 447.0);
    assert_eq!(a.cofactor(0, 2), 210.0);
    assert_eq!(a.cofactor(0, 3), 51.0);
    assert_eq!(a.determinant(), -4071.0);
}

#[test]
fn inverse_undoes_a_product() {
    let a: Matrix4D = [  3.0, -9.0,  7.0,  3.0,
                         3.0,  8.0,  2.0, -9.0,
                        -4.0,  4.0,  4.0,  1.0,
                        -6.0,  5.0, -1.0,  1.0, ].into();

    let b: Matrix4D = [ 8.0,  2.0, 2.0, 2.0,
                        3.0, -1.0, 7.0, 0.0,
                        7.0,  0.0, 5.0, 4.0,
                        6.0, -2.0, 0.0, 5.0, ].into();

    let c = a * b;
    assert_eq!(c * b.inverse().unwrap(), a);
}

#[test]
fn singular_matrix_has_no_inverse() {
    let a: Matrix4D = [ -4.0,  2.0, -2.0, -3.0,
                         9.0,  6.0,  2.0,  6.0,
                         0.0, -5.0,  1.0, -5.0,
                         0.0,  0.0,  0.0,  0.0, ].into();

    assert_eq!(a.determinant(), 0.0);
    assert!(a.inverse().is_none());
    assert!(matches!(a.try_inverse(), Err(Error::SingularTransform)));
    assert!(Matrix4D::scaling(1.0, 0.0, 1.0).try_inverse().is_err());
}

#[test]
fn translation_moves_points_not_vectors() {
    let m = Matrix4D::translation(5.0, -3.0, 2.0);

    assert_eq!(m * Tuple4D::point(-3.0, 4.0, 5.0), Tuple4D::point(2.0, 1.0, 7.0));
    assert_eq!(m * Tuple4D::vector(-3.0, 4.0, 5.0), Tuple4D::vector(-3.0, 4.0, 5.0));
    assert_eq!(m.inverse().unwrap() * Tuple4D::point(-3.0, 4.0, 5.0),
        Tuple4D::point(-8.0, 7.0, 3.0));
}

#[test]
fn rotations_quarter_turn() {
    let quarter = std::f64::consts::FRAC_PI_2;

    assert_eq!(Matrix4D::rotation_x(quarter) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(Matrix4D::rotation_y(quarter) * Tuple4D::point(0.0, 0.0, 1.0),
        Tuple4D::point(1.0, 0.0, 0.0));
    assert_eq!(Matrix4D::rotation_z(quarter) * Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-1.0, 0.0, 0.0));
}

#[test]
fn shearing_moves_x_in_proportion_to_y() {
    let m = Matrix4D::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    assert_eq!(m * Tuple4D::point(2.0, 3.0, 4.0), Tuple4D::point(5.0, 3.0, 4.0));
}

#[test]
fn view_transform_looking_down_positive_z_mirrors() {
    let t = Matrix4D::view_transform(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::point(0.0, 0.0, 1.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    );

    assert_eq!(t, Matrix4D::scaling(-1.0, 1.0, -1.0));
}

#[test]
fn view_transform_moves_the_world() {
    let t = Matrix4D::view_transform(
        Tuple4D::point(0.0, 0.0, 8.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    );

    assert_eq!(t, Matrix4D::translation(0.0, 0.0, -8.0));
}
