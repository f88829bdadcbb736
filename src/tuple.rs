use std::ops::{ Add, AddAssign, Sub, Neg, Mul, Div, Index };

use crate::feq;

/// A homogeneous 4D tuple.
///
/// Points carry `w == 1.0` and directions (vectors) carry `w == 0.0`. A point
/// is moved by the translation part of a `Matrix4D`; a vector is not.
///
/// Arithmetic is permissive. Only `point - point`, `point +/- vector` and
/// `vector +/- vector` produce meaningful results, but the type does not stop
/// `point + point` from running; its `w` simply becomes `2.0`.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Tuples are compared component-wise, within `FEQ_EPSILON`.
impl PartialEq for Tuple4D {
    fn eq(&self, other: &Tuple4D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z) &&
            feq(self.w, other.w)
    }
}

impl Tuple4D {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Tuple4D {
        Tuple4D { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 1.0 }
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 0.0 }
    }

    /// The point at the origin of whatever space it is used in.
    pub fn origin() -> Tuple4D {
        Tuple4D::point(0.0, 0.0, 0.0)
    }

    pub fn is_point(&self) -> bool {
        self.w == 1.0
    }

    pub fn is_vector(&self) -> bool {
        self.w == 0.0
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Scales the tuple to unit length.
    ///
    /// A zero-length tuple has no direction; it is returned unchanged rather
    /// than filled with NaN.
    pub fn normalize(&self) -> Tuple4D {
        let mag = self.magnitude();
        if mag == 0.0 {
            return *self;
        }

        *self / mag
    }

    pub fn dot(&self, other: &Tuple4D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
            + self.w * other.w
    }

    /// Cross product of the xyz parts. The result is always a vector.
    pub fn cross(&self, other: &Tuple4D) -> Tuple4D {
        Tuple4D::vector(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Tuple4D) -> Tuple4D {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

/// Axis access by index: `0 => x`, `1 => y`, `2 => z`, `3 => w`.
///
/// Slab tests and box splitting loop over the three spatial axes with this.
impl Index<usize> for Tuple4D {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Tuple4D axis {} is out of range.", axis),
        }
    }
}

impl Add for Tuple4D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Tuple4D::tuple(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl AddAssign for Tuple4D {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Tuple4D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Tuple4D::tuple(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl Neg for Tuple4D {
    type Output = Self;

    fn neg(self) -> Self {
        Tuple4D::tuple(-self.x, -self.y, -self.z, -self.w)
    }
}

/// Scalar right-multiplication.
///
/// ```
/// use pixie::tuple::Tuple4D;
///
/// let t = Tuple4D::tuple(1.0, 2.0, 3.0, 4.0);
/// assert_eq!(t * 5.0, Tuple4D::tuple(5.0, 10.0, 15.0, 20.0));
/// ```
impl Mul<f64> for Tuple4D {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Tuple4D::tuple(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

/// Scalar left-multiplication, the mirror of `Tuple4D * f64`.
impl Mul<Tuple4D> for f64 {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        t * self
    }
}

impl Div<f64> for Tuple4D {
    type Output = Self;

    fn div(self, s: f64) -> Self {
        Tuple4D::tuple(self.x / s, self.y / s, self.z / s, self.w / s)
    }
}

#[test]
fn point_and_vector_are_told_apart_by_w() {
    let p = Tuple4D::point(4.3, -4.2, 3.1);
    let v = Tuple4D::vector(4.3, -4.2, 3.1);

    assert!(p.is_point() && !p.is_vector());
    assert!(v.is_vector() && !v.is_point());
}

#[test]
fn point_minus_point_is_a_vector() {
    let p1 = Tuple4D::point(3.0, 2.0, 1.0);
    let p2 = Tuple4D::point(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Tuple4D::vector(-2.0, -4.0, -6.0));
}

#[test]
fn point_plus_vector_is_a_point() {
    let p = Tuple4D::point(3.0, 2.0, 1.0);
    let v = Tuple4D::vector(5.0, 6.0, 7.0);

    assert_eq!(p + v, Tuple4D::point(8.0, 8.0, 8.0));
    assert_eq!(p - v, Tuple4D::point(-2.0, -4.0, -6.0));
}

#[test]
fn point_plus_point_runs_but_is_neither() {
    let sum = Tuple4D::point(1.0, 1.0, 1.0) + Tuple4D::point(1.0, 1.0, 1.0);

    assert_eq!(sum.w, 2.0);
    assert!(!sum.is_point() && !sum.is_vector());
}

#[test]
fn scaling_and_dividing() {
    let a = Tuple4D::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(a * 3.5, Tuple4D::tuple(3.5, -7.0, 10.5, -14.0));
    assert_eq!(0.5 * a, Tuple4D::tuple(0.5, -1.0, 1.5, -2.0));
    assert_eq!(a / 2.0, Tuple4D::tuple(0.5, -1.0, 1.5, -2.0));
    assert_eq!(-a, Tuple4D::tuple(-1.0, 2.0, -3.0, 4.0));
}

#[test]
fn magnitude_and_normalize() {
    let v = Tuple4D::vector(1.0, 2.0, 3.0);
    let root = 14.0f64.sqrt();

    assert_eq!(v.magnitude(), root);
    assert_eq!(v.normalize(), Tuple4D::vector(1.0 / root, 2.0 / root, 3.0 / root));
    assert!(crate::feq(v.normalize().magnitude(), 1.0));
}

#[test]
fn normalizing_zero_vector_does_not_produce_nan() {
    let zero = Tuple4D::vector(0.0, 0.0, 0.0).normalize();

    assert!(zero.x.is_finite() && zero.y.is_finite() && zero.z.is_finite());
}

#[test]
fn dot_and_cross() {
    let a = Tuple4D::vector(1.0, 2.0, 3.0);
    let b = Tuple4D::vector(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Tuple4D::vector(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple4D::vector(1.0, -2.0, 1.0));
}

#[test]
fn reflect_off_slanted_surface() {
    let v = Tuple4D::vector(0.0, -1.0, 0.0);
    let half = 2.0f64.sqrt() / 2.0;
    let n = Tuple4D::vector(half, half, 0.0);

    assert_eq!(v.reflect(&n), Tuple4D::vector(1.0, 0.0, 0.0));
}

#[test]
fn index_by_axis() {
    let p = Tuple4D::point(7.0, 8.0, 9.0);

    assert_eq!(p[0], 7.0);
    assert_eq!(p[1], 8.0);
    assert_eq!(p[2], 9.0);
    assert_eq!(p[3], 1.0);
}
