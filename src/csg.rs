use std::fmt;
use std::str::FromStr;

use crate::error::{ Error, Result };
use crate::intersect::{ Intersection, Intersections };
use crate::ray::Ray4D;
use crate::shape::{ Shape, intersect };

/// How the two operands of a CSG shape are combined.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CsgOp {
    /// Everything inside either operand.
    Union,

    /// Only what is inside both operands.
    Intersect,

    /// The left operand with the right operand carved out of it.
    Difference,
}

impl FromStr for CsgOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<CsgOp> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(CsgOp::Union),
            "intersect" | "intersection" => Ok(CsgOp::Intersect),
            "difference" => Ok(CsgOp::Difference),
            other => Err(Error::InvalidArgument(
                format!("unknown CSG operation `{}`", other)
            )),
        }
    }
}

impl fmt::Display for CsgOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CsgOp::Union => "union",
            CsgOp::Intersect => "intersect",
            CsgOp::Difference => "difference",
        };

        write!(f, "{}", name)
    }
}

/// Constructive solid geometry: two shapes combined with an operation.
///
/// Both operands are owned; each keeps its own transform, which is relative
/// to the CSG shape's space.
#[derive(Clone, Debug, PartialEq)]
pub struct Csg {
    pub op: CsgOp,
    pub(crate) left: Box<Shape>,
    pub(crate) right: Box<Shape>,
}

impl Csg {
    pub fn new(op: CsgOp, left: Shape, right: Shape) -> Csg {
        Csg {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left(&self) -> &Shape {
        &self.left
    }

    pub fn right(&self) -> &Shape {
        &self.right
    }

    /// Decides whether an intersection survives the operation.
    ///
    /// `left_hit` is true when the intersection is on the left operand;
    /// `in_left` and `in_right` say whether the ray is currently inside each
    /// operand, just before this intersection.
    pub fn intersection_allowed(op: CsgOp, left_hit: bool, in_left: bool, in_right: bool)
        -> bool {
        match op {
            CsgOp::Union => (left_hit && !in_right) || (!left_hit && !in_left),
            CsgOp::Intersect => (left_hit && in_right) || (!left_hit && in_left),
            CsgOp::Difference => (left_hit && !in_right) || (!left_hit && in_left),
        }
    }

    /// Keeps the intersections that lie on the combined surface.
    ///
    /// `xs` must be sorted by `t`. An intersection belongs to the left operand
    /// when the left subtree contains that very shape instance.
    pub fn filter_intersections<'a>(&self, xs: &Intersections<'a>) -> Intersections<'a> {
        let mut in_left = false;
        let mut in_right = false;

        let mut kept: Vec<Intersection<'a>> = Vec::new();
        for i in xs.iter() {
            let left_hit = self.left.includes(i.what);

            if Csg::intersection_allowed(self.op, left_hit, in_left, in_right) {
                kept.push(*i);
            }

            if left_hit {
                in_left = !in_left;
            } else {
                in_right = !in_right;
            }
        }

        kept.into()
    }

    pub fn local_intersect<'a>(&'a self, ray: &Ray4D) -> Intersections<'a> {
        let all = Intersections::aggregate(vec![
            intersect(&self.left, ray),
            intersect(&self.right, ray),
        ]);

        self.filter_intersections(&all)
    }
}

#[test]
fn csg_op_parses_from_text() {
    assert_eq!("union".parse::<CsgOp>().unwrap(), CsgOp::Union);
    assert_eq!("Intersect".parse::<CsgOp>().unwrap(), CsgOp::Intersect);
    assert_eq!("intersection".parse::<CsgOp>().unwrap(), CsgOp::Intersect);
    assert_eq!(" difference ".parse::<CsgOp>().unwrap(), CsgOp::Difference);
    assert_eq!(CsgOp::Difference.to_string().parse::<CsgOp>().unwrap(), CsgOp::Difference);
}

#[test]
fn unknown_csg_op_is_invalid_argument() {
    match "xor".parse::<CsgOp>() {
        Err(Error::InvalidArgument(msg)) => assert!(msg.contains("xor")),
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn csg_is_created_with_an_operation_and_two_shapes() {
    let c = Shape::csg(CsgOp::Union, Shape::sphere(), Shape::cube());
    let csg = c.as_csg().unwrap();

    assert_eq!(csg.op, CsgOp::Union);
    assert_eq!(csg.left(), &Shape::sphere());
    assert_eq!(csg.right(), &Shape::cube());
}

#[test]
fn intersection_allowed_truth_table() {
    use CsgOp::*;

    // (op, left_hit, in_left, in_right, expected)
    let table = [
        (Union, true, true, true, false),
        (Union, true, true, false, true),
        (Union, true, false, true, false),
        (Union, true, false, false, true),
        (Union, false, true, true, false),
        (Union, false, true, false, false),
        (Union, false, false, true, true),
        (Union, false, false, false, true),

        (Intersect, true, true, true, true),
        (Intersect, true, true, false, false),
        (Intersect, true, false, true, true),
        (Intersect, true, false, false, false),
        (Intersect, false, true, true, true),
        (Intersect, false, true, false, true),
        (Intersect, false, false, true, false),
        (Intersect, false, false, false, false),

        (Difference, true, true, true, false),
        (Difference, true, true, false, true),
        (Difference, true, false, true, false),
        (Difference, true, false, false, true),
        (Difference, false, true, true, true),
        (Difference, false, true, false, true),
        (Difference, false, false, true, false),
        (Difference, false, false, false, false),
    ];

    for (op, left_hit, in_left, in_right, expected) in table.iter() {
        assert_eq!(
            Csg::intersection_allowed(*op, *left_hit, *in_left, *in_right),
            *expected,
            "{} lhit={} inl={} inr={}", op, left_hit, in_left, in_right
        );
    }
}

#[test]
fn filtering_a_list_of_intersections() {
    let cases = [
        (CsgOp::Union, 0, 3),
        (CsgOp::Intersect, 1, 2),
        (CsgOp::Difference, 0, 1),
    ];

    for &(op, x0, x1) in cases.iter() {
        let c = Shape::csg(op, Shape::sphere(), Shape::cube());
        let csg = c.as_csg().unwrap();
        let (s1, s2) = (csg.left(), csg.right());

        let xs: Intersections = vec![
            Intersection::new(1.0, s1),
            Intersection::new(2.0, s2),
            Intersection::new(3.0, s1),
            Intersection::new(4.0, s2),
        ].into();

        let result = csg.filter_intersections(&xs);
        assert_eq!(result.len(), 2, "{}", op);
        assert_eq!(result[0], xs[x0], "{}", op);
        assert_eq!(result[1], xs[x1], "{}", op);
    }
}

#[test]
fn filtering_uses_identity_not_equality() {
    // Both operands are unit spheres, so only identity tells them apart.
    let c = Shape::csg(CsgOp::Difference, Shape::sphere(), Shape::sphere());
    let csg = c.as_csg().unwrap();
    let (s1, s2) = (csg.left(), csg.right());

    let xs: Intersections = vec![
        Intersection::new(1.0, s1),
        Intersection::new(2.0, s2),
        Intersection::new(3.0, s1),
        Intersection::new(4.0, s2),
    ].into();

    let result = csg.filter_intersections(&xs);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0], xs[0]);
    assert_eq!(result[1], xs[1]);
}

#[test]
fn a_ray_misses_a_csg_object() {
    use crate::tuple::Tuple4D;

    let c = Shape::csg(CsgOp::Union, Shape::sphere(), Shape::cube());
    let r = Ray4D::new(Tuple4D::point(0.0, 2.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(c.local_intersect(&r).is_empty());
}

#[test]
fn a_ray_hits_a_csg_object() {
    use crate::matrix::Matrix4D;
    use crate::tuple::Tuple4D;

    let s1 = Shape::sphere();
    let mut s2 = Shape::sphere();
    s2.set_transform(Matrix4D::translation(0.0, 0.0, 0.5)).unwrap();

    let c = Shape::csg(CsgOp::Union, s1, s2);
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = c.local_intersect(&r);
    let csg = c.as_csg().unwrap();

    assert_eq!(xs.len(), 2);
    assert!(crate::feq(xs[0].t, 4.0));
    assert!(std::ptr::eq(xs[0].what, csg.left()));
    assert!(crate::feq(xs[1].t, 6.5));
    assert!(std::ptr::eq(xs[1].what, csg.right()));
}
