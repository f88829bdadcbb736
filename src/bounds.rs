use std::ops::{ Add, AddAssign };

use crate::consts::FEQ_EPSILON;
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;

/// An axis-aligned bounding box.
///
/// Boxes start out empty (minimum at +∞, maximum at -∞) and only ever grow,
/// either one point at a time with `add_point` or by union with another box.
/// Groups and CSG shapes cache one of these in their own space and test rays
/// against it before descending into their children.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub minimum: Tuple4D,
    pub maximum: Tuple4D,
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds::empty()
    }
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64)
        -> Bounds {
        Bounds {
            minimum: Tuple4D::point(min_x, min_y, min_z),
            maximum: Tuple4D::point(max_x, max_y, max_z),
        }
    }

    /// The box containing nothing; adding anything to it yields that thing.
    pub fn empty() -> Bounds {
        let inf = std::f64::INFINITY;
        Bounds::new(inf, inf, inf, -inf, -inf, -inf)
    }

    /// The box containing everything.
    pub fn infinite() -> Bounds {
        let inf = std::f64::INFINITY;
        Bounds::new(-inf, -inf, -inf, inf, inf, inf)
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.minimum[axis] > self.maximum[axis])
    }

    pub fn is_finite(&self) -> bool {
        (0..3).all(|axis| self.minimum[axis].is_finite() && self.maximum[axis].is_finite())
    }

    pub fn add_point(&mut self, p: Tuple4D) {
        self.minimum = Tuple4D::point(
            self.minimum.x.min(p.x),
            self.minimum.y.min(p.y),
            self.minimum.z.min(p.z),
        );
        self.maximum = Tuple4D::point(
            self.maximum.x.max(p.x),
            self.maximum.y.max(p.y),
            self.maximum.z.max(p.z),
        );
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut b = *self;
        b.add_point(other.minimum);
        b.add_point(other.maximum);

        b
    }

    /// Inclusive on every face.
    pub fn contains_point(&self, p: Tuple4D) -> bool {
        (0..3).all(|axis| self.minimum[axis] <= p[axis] && p[axis] <= self.maximum[axis])
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains_point(other.minimum) && self.contains_point(other.maximum)
    }

    /// Re-bounds the eight corners of this box after transforming them.
    ///
    /// A box with an infinite extent has no meaningful corners, so it maps to
    /// an infinite box.
    pub fn transform(&self, m: &Matrix4D) -> Bounds {
        if self.is_empty() {
            return *self;
        }

        if !self.is_finite() {
            return Bounds::infinite();
        }

        let (lo, hi) = (self.minimum, self.maximum);
        let corners = [
            Tuple4D::point(lo.x, lo.y, lo.z),
            Tuple4D::point(lo.x, lo.y, hi.z),
            Tuple4D::point(lo.x, hi.y, lo.z),
            Tuple4D::point(lo.x, hi.y, hi.z),
            Tuple4D::point(hi.x, lo.y, lo.z),
            Tuple4D::point(hi.x, lo.y, hi.z),
            Tuple4D::point(hi.x, hi.y, lo.z),
            Tuple4D::point(hi.x, hi.y, hi.z),
        ];

        let mut b = Bounds::empty();
        for corner in corners.iter() {
            b.add_point(*m * *corner);
        }

        b
    }

    /// Slab test. Only reports whether the ray's line meets the box; boxes
    /// behind the origin are not rejected.
    pub fn intersects(&self, ray: &Ray4D) -> bool {
        let mut tmin = std::f64::NEG_INFINITY;
        let mut tmax = std::f64::INFINITY;

        for axis in 0..3 {
            let (t0, t1) = check_axis(
                self.minimum[axis],
                self.maximum[axis],
                ray.origin[axis],
                ray.direction[axis],
            );

            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
        }

        tmin <= tmax
    }

    /// Splits the box at the midpoint of its longest axis.
    ///
    /// Ties go to x, then y, then z. The halves share the splitting plane.
    pub fn split(&self) -> (Bounds, Bounds) {
        let dx = self.maximum.x - self.minimum.x;
        let dy = self.maximum.y - self.minimum.y;
        let dz = self.maximum.z - self.minimum.z;
        let greatest = dx.max(dy).max(dz);

        let axis = if greatest == dx {
            0
        } else if greatest == dy {
            1
        } else {
            2
        };

        let mid = self.minimum[axis] + (self.maximum[axis] - self.minimum[axis]) / 2.0;

        let left = Bounds { minimum: self.minimum, maximum: with_axis(self.maximum, axis, mid) };
        let right = Bounds { minimum: with_axis(self.minimum, axis, mid), maximum: self.maximum };

        (left, right)
    }
}

/// Returns `t` where a ray crosses the `min` and `max` planes of one axis,
/// nearest first.
///
/// A direction component within `FEQ_EPSILON` of zero runs parallel to the
/// slab. Such a ray is either strictly between the planes for all `t`, or it
/// never enters the slab; a ray lying on one of the planes counts as outside.
pub(crate) fn check_axis(min: f64, max: f64, origin: f64, direction: f64) -> (f64, f64) {
    if direction.abs() < FEQ_EPSILON {
        return if min < origin && origin < max {
            (std::f64::NEG_INFINITY, std::f64::INFINITY)
        } else {
            (std::f64::INFINITY, std::f64::NEG_INFINITY)
        };
    }

    let tmin = (min - origin) / direction;
    let tmax = (max - origin) / direction;

    if tmin > tmax {
        (tmax, tmin)
    } else {
        (tmin, tmax)
    }
}

fn with_axis(mut t: Tuple4D, axis: usize, value: f64) -> Tuple4D {
    match axis {
        0 => t.x = value,
        1 => t.y = value,
        _ => t.z = value,
    }

    t
}

impl Add<Bounds> for Bounds {
    type Output = Bounds;

    fn add(self, other: Bounds) -> Bounds {
        self.union(&other)
    }
}

impl AddAssign<Bounds> for Bounds {
    fn add_assign(&mut self, other: Bounds) {
        *self = self.union(&other);
    }
}

#[test]
fn empty_box_grows_to_first_point() {
    let mut b = Bounds::empty();
    assert!(b.is_empty());

    b.add_point(Tuple4D::point(-5.0, 2.0, 0.0));
    assert_eq!(b, Bounds::new(-5.0, 2.0, 0.0, -5.0, 2.0, 0.0));

    b.add_point(Tuple4D::point(7.0, 0.0, -3.0));
    assert_eq!(b, Bounds::new(-5.0, 0.0, -3.0, 7.0, 2.0, 0.0));
    assert!(!b.is_empty());
}

#[test]
fn union_of_boxes() {
    let b1 = Bounds::new(-5.0, -2.0, 0.0, 7.0, 4.0, 4.0);
    let b2 = Bounds::new(8.0, -7.0, -2.0, 14.0, 2.0, 8.0);
    let expected = Bounds::new(-5.0, -7.0, -2.0, 14.0, 4.0, 8.0);

    assert_eq!(b1 + b2, expected);

    let mut b3 = b1;
    b3 += b2;
    assert_eq!(b3, expected);
    assert_eq!(Bounds::empty() + b1, b1);
}

#[test]
fn box_contains_point() {
    let b = Bounds::new(5.0, -2.0, 0.0, 11.0, 4.0, 7.0);
    let cases = [
        ((5.0, -2.0, 0.0), true),
        ((11.0, 4.0, 7.0), true),
        ((8.0, 1.0, 3.0), true),
        ((3.0, 0.0, 3.0), false),
        ((8.0, -4.0, 3.0), false),
        ((8.0, 1.0, -1.0), false),
        ((13.0, 1.0, 3.0), false),
        ((8.0, 5.0, 3.0), false),
        ((8.0, 1.0, 8.0), false),
    ];

    for ((x, y, z), expected) in cases.iter() {
        assert_eq!(b.contains_point(Tuple4D::point(*x, *y, *z)), *expected,
            "point ({}, {}, {})", x, y, z);
    }
}

#[test]
fn box_contains_box() {
    let b = Bounds::new(5.0, -2.0, 0.0, 11.0, 4.0, 7.0);
    let cases = [
        (Bounds::new(5.0, -2.0, 0.0, 11.0, 4.0, 7.0), true),
        (Bounds::new(6.0, -1.0, 1.0, 10.0, 3.0, 6.0), true),
        (Bounds::new(4.0, -3.0, -1.0, 10.0, 3.0, 6.0), false),
        (Bounds::new(6.0, -1.0, 1.0, 12.0, 5.0, 8.0), false),
    ];

    for (other, expected) in cases.iter() {
        assert_eq!(b.contains_bounds(other), *expected, "{:?}", other);
    }
}

#[test]
fn nonempty_box_contains_its_corners() {
    let boxes = [
        Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0),
        Bounds::new(5.0, -2.0, 0.0, 11.0, 4.0, 7.0),
        Bounds::new(0.5, 0.5, 0.5, 0.5, 0.5, 0.5),
    ];

    for b in boxes.iter() {
        assert!(b.contains_point(b.minimum));
        assert!(b.contains_point(b.maximum));
    }
}

#[test]
fn points_just_outside_are_rejected_on_every_axis() {
    let b = Bounds::new(5.0, -2.0, 0.0, 11.0, 4.0, 7.0);
    let step = 0.001;

    for axis in 0..3 {
        let below = with_axis(b.minimum, axis, b.minimum[axis] - step);
        let above = with_axis(b.maximum, axis, b.maximum[axis] + step);

        assert!(!b.contains_point(below), "axis {} below", axis);
        assert!(!b.contains_point(above), "axis {} above", axis);
    }
}

#[test]
fn transforming_a_box() {
    let b = Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0);
    let m = Matrix4D::rotation_x(std::f64::consts::FRAC_PI_4)
        * Matrix4D::rotation_y(std::f64::consts::FRAC_PI_4);

    let t = b.transform(&m);
    assert_eq!(t.minimum, Tuple4D::point(-1.41421, -1.70711, -1.70711));
    assert_eq!(t.maximum, Tuple4D::point(1.41421, 1.70711, 1.70711));
}

#[test]
fn transforming_an_infinite_box_stays_infinite() {
    let inf = std::f64::INFINITY;
    let plane = Bounds::new(-inf, 0.0, -inf, inf, 0.0, inf);

    assert_eq!(plane.transform(&Matrix4D::translation(1.0, 2.0, 3.0)), Bounds::infinite());
}

#[test]
fn ray_against_cubic_box() {
    let b = Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0);
    let cases = [
        ((5.0, 0.5, 0.0), (-1.0, 0.0, 0.0), true),
        ((-5.0, -0.5, 0.0), (1.0, 0.0, 0.0), true),
        ((0.5, 5.0, 0.0), (0.0, -1.0, 0.0), true),
        ((0.5, -5.0, 0.0), (0.0, 1.0, 0.0), true),
        ((0.5, 0.0, 5.0), (0.0, 0.0, -1.0), true),
        ((0.5, 0.0, -5.0), (0.0, 0.0, 1.0), true),
        ((0.0, 0.5, 0.0), (0.0, 0.0, 1.0), true),
        ((-2.0, 0.0, 0.0), (2.0, 4.0, 6.0), false),
        ((0.0, -2.0, 0.0), (6.0, 2.0, 4.0), false),
        ((0.0, 0.0, -2.0), (4.0, 6.0, 2.0), false),
        ((2.0, 0.0, 2.0), (0.0, 0.0, -1.0), false),
        ((0.0, 2.0, 2.0), (0.0, -1.0, 0.0), false),
        ((2.0, 2.0, 0.0), (-1.0, 0.0, 0.0), false),
    ];

    for ((ox, oy, oz), (dx, dy, dz), expected) in cases.iter() {
        let r = Ray4D::new(
            Tuple4D::point(*ox, *oy, *oz),
            Tuple4D::vector(*dx, *dy, *dz).normalize(),
        );
        assert_eq!(b.intersects(&r), *expected, "ray from ({}, {}, {})", ox, oy, oz);
    }
}

#[test]
fn ray_against_noncubic_box() {
    let b = Bounds::new(5.0, -2.0, 0.0, 11.0, 4.0, 7.0);
    let cases = [
        ((15.0, 1.0, 2.0), (-1.0, 0.0, 0.0), true),
        ((-5.0, -1.0, 4.0), (1.0, 0.0, 0.0), true),
        ((7.0, 6.0, 5.0), (0.0, -1.0, 0.0), true),
        ((9.0, -5.0, 6.0), (0.0, 1.0, 0.0), true),
        ((8.0, 2.0, 12.0), (0.0, 0.0, -1.0), true),
        ((6.0, 0.0, -5.0), (0.0, 0.0, 1.0), true),
        ((8.0, 1.0, 3.5), (0.0, 0.0, 1.0), true),
        ((9.0, -1.0, -8.0), (2.0, 4.0, 6.0), false),
        ((8.0, 3.0, -4.0), (6.0, 2.0, 4.0), false),
        ((9.0, -1.0, -2.0), (4.0, 6.0, 2.0), false),
        ((4.0, 0.0, 9.0), (0.0, 0.0, -1.0), false),
        ((8.0, 6.0, -1.0), (0.0, -1.0, 0.0), false),
        ((12.0, 5.0, 4.0), (-1.0, 0.0, 0.0), false),
    ];

    for ((ox, oy, oz), (dx, dy, dz), expected) in cases.iter() {
        let r = Ray4D::new(
            Tuple4D::point(*ox, *oy, *oz),
            Tuple4D::vector(*dx, *dy, *dz).normalize(),
        );
        assert_eq!(b.intersects(&r), *expected, "ray from ({}, {}, {})", ox, oy, oz);
    }
}

#[test]
fn ray_lying_on_a_face_plane_misses() {
    let b = Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0);
    let on_x_face = Ray4D::new(Tuple4D::point(1.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let on_y_face = Ray4D::new(Tuple4D::point(0.0, -1.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(!b.intersects(&on_x_face));
    assert!(!b.intersects(&on_y_face));
}

#[test]
fn parallel_axis_never_yields_nan() {
    for &origin in [-1.0, 1.0, 0.0, 3.0].iter() {
        let (t0, t1) = check_axis(-1.0, 1.0, origin, 0.0);

        assert!(!t0.is_nan() && !t1.is_nan());
    }
    assert_eq!(check_axis(-1.0, 1.0, 1.0, 0.0), (std::f64::INFINITY, std::f64::NEG_INFINITY));
    assert_eq!(check_axis(-1.0, 1.0, 0.0, 0.0), (std::f64::NEG_INFINITY, std::f64::INFINITY));
}

#[test]
fn split_perfect_cube_on_x() {
    let b = Bounds::new(-1.0, -4.0, -5.0, 9.0, 6.0, 5.0);
    let (left, right) = b.split();

    assert_eq!(left, Bounds::new(-1.0, -4.0, -5.0, 4.0, 6.0, 5.0));
    assert_eq!(right, Bounds::new(4.0, -4.0, -5.0, 9.0, 6.0, 5.0));
}

#[test]
fn split_along_widest_axis() {
    let (left, right) = Bounds::new(-1.0, -2.0, -3.0, 9.0, 5.5, 3.0).split();
    assert_eq!(left.maximum, Tuple4D::point(4.0, 5.5, 3.0));
    assert_eq!(right.minimum, Tuple4D::point(4.0, -2.0, -3.0));

    let (left, right) = Bounds::new(-1.0, -2.0, -3.0, 5.0, 8.0, 3.0).split();
    assert_eq!(left.maximum, Tuple4D::point(5.0, 3.0, 3.0));
    assert_eq!(right.minimum, Tuple4D::point(-1.0, 3.0, -3.0));

    let (left, right) = Bounds::new(-1.0, -2.0, -3.0, 5.0, 3.0, 7.0).split();
    assert_eq!(left.maximum, Tuple4D::point(5.0, 3.0, 2.0));
    assert_eq!(right.minimum, Tuple4D::point(-1.0, -2.0, 2.0));
}

#[test]
fn split_halves_reunite_and_touch_on_the_plane() {
    let boxes = [
        Bounds::new(-1.0, -4.0, -5.0, 9.0, 6.0, 5.0),
        Bounds::new(-1.0, -2.0, -3.0, 5.0, 8.0, 3.0),
        Bounds::new(-1.0, -2.0, -3.0, 5.0, 3.0, 7.0),
    ];

    for b in boxes.iter() {
        let (left, right) = b.split();
        assert_eq!(left + right, *b);
        assert!(b.contains_bounds(&left) && b.contains_bounds(&right));

        // The only shared coordinates lie on the splitting plane.
        let shared: Vec<usize> = (0..3)
            .filter(|&axis| left.maximum[axis] == right.minimum[axis])
            .collect();
        assert_eq!(shared.len(), 1);
    }
}
