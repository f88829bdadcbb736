use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;

/// A half-line starting at `origin` heading along `direction`.
///
/// The direction is not required to be unit length; object-space rays are
/// usually stretched by a shape's inverse transform, and intersection `t`
/// values stay comparable across spaces because of it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray4D {
    pub origin: Tuple4D,
    pub direction: Tuple4D,
}

impl Ray4D {
    /// Builds a ray, forcing `origin` to be a point and `direction` to be a
    /// vector.
    pub fn new(mut origin: Tuple4D, mut direction: Tuple4D) -> Ray4D {
        origin.w = 1.0;
        direction.w = 0.0;

        Ray4D { origin, direction }
    }

    pub fn position(&self, t: f64) -> Tuple4D {
        self.origin + (t * self.direction)
    }

    pub fn transform(&self, m: &Matrix4D) -> Ray4D {
        Ray4D {
            origin: *m * self.origin,
            direction: *m * self.direction,
        }
    }
}

#[test]
fn ray_position() {
    let r = Ray4D::new(
                Tuple4D::point(2.0, 3.0, 4.0),
                Tuple4D::vector(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Tuple4D::point(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Tuple4D::point(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple4D::point(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple4D::point(4.5, 3.0, 4.0));
}

#[test]
fn ray_new_coerces_homogeneous_component() {
    let r = Ray4D::new(
                Tuple4D::tuple(1.0, 2.0, 3.0, 0.0),
                Tuple4D::tuple(0.0, 0.0, 1.0, 1.0)
            );

    assert!(r.origin.is_point());
    assert!(r.direction.is_vector());
}

#[test]
fn ray_translation_moves_origin_only() {
    let r = Ray4D::new(
                Tuple4D::point(1.0, 2.0, 3.0),
                Tuple4D::vector(0.0, 1.0, 0.0)
            );
    let t = r.transform(&Matrix4D::translation(3.0, 4.0, 5.0));

    assert_eq!(t.origin, Tuple4D::point(4.0, 6.0, 8.0));
    assert_eq!(t.direction, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn ray_scaling_stretches_direction() {
    let r = Ray4D::new(
                Tuple4D::point(1.0, 2.0, 3.0),
                Tuple4D::vector(0.0, 1.0, 0.0)
            );
    let t = r.transform(&Matrix4D::scaling(2.0, 3.0, 4.0));

    assert_eq!(t.origin, Tuple4D::point(2.0, 6.0, 12.0));
    assert_eq!(t.direction, Tuple4D::vector(0.0, 3.0, 0.0));
}
