use crate::feq;
use crate::color::Color;
use crate::error::Result;
use crate::matrix::Matrix4D;
use crate::shape::Shape;
use crate::tuple::Tuple4D;

/// The color function of a pattern, with its two colors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Alternates between the colors along X, one unit per stripe.
    Stripe(Color, Color),

    /// Alternates in all three dimensions, like a 3D chess board.
    Checker(Color, Color),

    /// Blends from the first color to the second outward from the Y axis,
    /// restarting every unit of radius.
    RadialGradient(Color, Color),
}

/// A surface pattern with its own transform.
///
/// Patterns are evaluated in pattern space: a world point is taken into the
/// shape's object space, then through the pattern's inverse transform.
#[derive(Copy, Clone, Debug)]
pub struct Pattern {
    pub kind: PatternKind,
    transform: Matrix4D,
    inverse: Matrix4D,
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Pattern) -> bool {
        self.kind == other.kind && self.transform == other.transform
    }
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Pattern {
        Pattern {
            kind,
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
        }
    }

    pub fn stripe(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Stripe(a, b))
    }

    pub fn checker(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Checker(a, b))
    }

    pub fn radial_gradient(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::RadialGradient(a, b))
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Fails with `Error::SingularTransform` when `m` has no inverse.
    pub fn set_transform(&mut self, m: Matrix4D) -> Result<()> {
        self.inverse = m.try_inverse()?;
        self.transform = m;

        Ok(())
    }

    /// Color at a point already in pattern space.
    pub fn pattern_at(&self, p: Tuple4D) -> Color {
        match self.kind {
            PatternKind::Stripe(a, b) => {
                if feq(p.x.floor().rem_euclid(2.0), 0.0) { a } else { b }
            },
            PatternKind::Checker(a, b) => {
                let sum = p.x.floor() + p.y.floor() + p.z.floor();
                if feq(sum.rem_euclid(2.0), 0.0) { a } else { b }
            },
            PatternKind::RadialGradient(a, b) => {
                let r = (p.x * p.x + p.z * p.z).sqrt();
                a + (b - a) * (r - r.floor())
            },
        }
    }

    /// Color at a world-space point on `shape`.
    pub fn pattern_at_shape(&self, shape: &Shape, world_point: Tuple4D) -> Color {
        let object_point = shape.world_to_object(world_point);
        let pattern_point = self.inverse * object_point;

        self.pattern_at(pattern_point)
    }
}

#[test]
fn stripe_pattern_is_constant_along_y_and_z() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    for i in 0..3 {
        let i = i as f64;
        assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, i, 0.0)), Color::white());
        assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, i)), Color::white());
    }
}

#[test]
fn stripe_pattern_alternates_along_x() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point( 0.0, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point( 0.9, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point( 1.0, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-0.1, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-1.0, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-1.1, 0.0, 0.0)), Color::white());
}

#[test]
fn checkers_repeat_in_every_dimension() {
    let pattern = Pattern::checker(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.99, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(1.01, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 1.01, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 1.01)), Color::black());
}

#[test]
fn radial_gradient_restarts_each_unit() {
    let pattern = Pattern::radial_gradient(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.25, 0.0, 0.0)),
        Color::rgb(0.75, 0.75, 0.75));
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 7.0, 1.5)),
        Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 2.0)), Color::white());
}

#[test]
fn pattern_with_object_transform() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at_shape(&s, Tuple4D::point(1.5, 0.0, 0.0)), Color::white());
}

#[test]
fn pattern_with_pattern_transform() {
    let s = Shape::sphere();
    let mut pattern = Pattern::stripe(Color::white(), Color::black());
    pattern.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();

    assert_eq!(pattern.pattern_at_shape(&s, Tuple4D::point(1.5, 0.0, 0.0)), Color::white());
}

#[test]
fn pattern_with_both_transforms() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    let mut pattern = Pattern::stripe(Color::white(), Color::black());
    pattern.set_transform(Matrix4D::translation(0.5, 0.0, 0.0)).unwrap();

    assert_eq!(pattern.pattern_at_shape(&s, Tuple4D::point(2.5, 0.0, 0.0)), Color::white());
}

#[test]
fn singular_pattern_transform_is_rejected() {
    let mut pattern = Pattern::checker(Color::white(), Color::black());

    assert!(pattern.set_transform(Matrix4D::scaling(0.0, 1.0, 1.0)).is_err());
    assert_eq!(pattern.transform(), &Matrix4D::identity());
}
