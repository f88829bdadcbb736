use std::ops::Index;

use crate::consts::FEQ_EPSILON;
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::shape::{ Shape, normal_at };

/// A ray hitting a primitive `what` at distance `t` along the ray.
///
/// `what` is always a leaf (sphere, plane or cube); groups and CSG shapes
/// forward their children's intersections rather than producing their own.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub what: &'a Shape,
}

/// Two intersections are equal when they have the same `t` and point at the
/// same shape *instance*; structurally equal shapes are still different
/// shapes.
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && std::ptr::eq(self.what, other.what)
    }
}

impl<'a> Intersection<'a> {
    pub fn new(t: f64, what: &'a Shape) -> Intersection<'a> {
        Intersection { t, what }
    }
}

/// An ordered collection of intersections.
#[derive(Clone, Debug, Default)]
pub struct Intersections<'a> {
    pub intersections: Vec<Intersection<'a>>,
}

impl<'a> From<Vec<Intersection<'a>>> for Intersections<'a> {
    fn from(intersections: Vec<Intersection<'a>>) -> Intersections<'a> {
        Intersections { intersections }
    }
}

impl<'a> Index<usize> for Intersections<'a> {
    type Output = Intersection<'a>;

    fn index(&self, i: usize) -> &Intersection<'a> {
        &self.intersections[i]
    }
}

impl<'a> Intersections<'a> {
    pub fn new() -> Intersections<'a> {
        Intersections { intersections: Vec::new() }
    }

    pub fn push(&mut self, i: Intersection<'a>) {
        self.intersections.push(i);
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intersection<'a>> {
        self.intersections.iter()
    }

    /// The visible intersection: lowest finite, non-negative `t`.
    ///
    /// Works on unsorted lists and does not reorder them.
    pub fn hit(&self) -> Option<Intersection<'a>> {
        self.intersections.iter()
            .filter(|i| i.t.is_finite() && i.t >= 0.0)
            .fold(None, |best: Option<Intersection<'a>>, i| match best {
                Some(b) if b.t <= i.t => Some(b),
                _ => Some(*i),
            })
    }

    /// Sorts by `t`. The sort is stable, so equal `t`s keep their order.
    pub fn sort(&mut self) {
        self.intersections.sort_by(|a, b|
            a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal)
        );
    }

    /// Merges several lists into one sorted list.
    pub fn aggregate(lists: Vec<Intersections<'a>>) -> Intersections<'a> {
        let mut merged = Intersections::new();
        for list in lists {
            merged.intersections.extend(list.intersections);
        }

        merged.sort();
        merged
    }
}

/// Everything shading needs to know about a hit, computed once.
#[derive(Clone, Debug)]
pub struct IntersectionComputation<'a> {
    pub t: f64,
    pub obj: &'a Shape,

    pub point: Tuple4D,

    /// Nudged off the surface along the normal so shadow rays do not
    /// immediately hit the surface they start on.
    pub over_point: Tuple4D,

    /// Nudged under the surface; refracted rays start here.
    pub under_point: Tuple4D,

    pub eyev: Tuple4D,

    /// Surface normal, flipped to face the eye when the hit is inside.
    pub normalv: Tuple4D,
    pub reflectv: Tuple4D,
    pub inside: bool,

    /// Refractive index of the material being exited.
    pub n1: f64,

    /// Refractive index of the material being entered.
    pub n2: f64,
}

impl<'a> IntersectionComputation<'a> {
    /// Prepares a hit for shading.
    ///
    /// `xs` is the full, sorted intersection list the hit came from. Without
    /// it both refractive indices are taken to be `1.0`.
    pub fn new(r: &Ray4D, hit: &Intersection<'a>, xs: Option<&Intersections<'a>>)
        -> IntersectionComputation<'a> {
        let t = hit.t;
        let obj = hit.what;
        let point = r.position(t);
        let eyev = -r.direction;
        let mut normalv = normal_at(obj, point);

        let inside = if normalv.dot(&eyev) < 0.0 {
            normalv = -normalv;
            true
        } else {
            false
        };

        let over_point = point + normalv * FEQ_EPSILON;
        let under_point = point - normalv * FEQ_EPSILON;
        let reflectv = r.direction.reflect(&normalv);

        let (n1, n2) = match xs {
            Some(xs) => Self::refraction_indices(hit, xs),
            None => (1.0, 1.0),
        };

        IntersectionComputation {
            t, obj,
            point, over_point, under_point,
            eyev, normalv, reflectv,
            inside,
            n1, n2,
        }
    }

    /// Walks the intersections up to the hit, tracking which shapes the ray
    /// is currently inside.
    fn refraction_indices(hit: &Intersection<'a>, xs: &Intersections<'a>) -> (f64, f64) {
        let mut containers: Vec<&'a Shape> = Vec::new();

        for i in xs.iter() {
            let is_hit = i == hit;
            let n1 = top_index(&containers);

            match containers.iter().position(|&s| std::ptr::eq(s, i.what)) {
                Some(j) => { containers.remove(j); },
                None => containers.push(i.what),
            }

            if is_hit {
                return (n1, top_index(&containers));
            }
        }

        (1.0, 1.0)
    }

    /// Schlick's approximation of the Fresnel reflectance at this hit, in
    /// `0.0..=1.0`.
    pub fn schlick(&self) -> f64 {
        let mut cos = self.eyev.dot(&self.normalv);

        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n.powi(2) * (1.0 - cos.powi(2));

            // Total internal reflection
            if sin2_t > 1.0 {
                return 1.0;
            }

            cos = (1.0 - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}

/// Refractive index of the innermost shape the ray is in, or vacuum.
fn top_index(containers: &[&Shape]) -> f64 {
    containers.last()
        .map(|s| s.material.refractive_index)
        .unwrap_or(1.0)
}

#[cfg(test)]
fn glass_sphere() -> Shape {
    let mut s = Shape::sphere();
    s.material.transparency = 1.0;
    s.material.refractive_index = 1.5;

    s
}

#[test]
fn hit_with_all_positive() {
    let s = Shape::sphere();
    let xs: Intersections = vec![Intersection::new(1.0, &s), Intersection::new(2.0, &s)].into();

    assert_eq!(xs.hit(), Some(Intersection::new(1.0, &s)));
}

#[test]
fn hit_with_some_negative() {
    let s = Shape::sphere();
    let xs: Intersections = vec![Intersection::new(-1.0, &s), Intersection::new(1.0, &s)].into();

    assert_eq!(xs.hit(), Some(Intersection::new(1.0, &s)));
}

#[test]
fn hit_with_all_negative() {
    let s = Shape::sphere();
    let xs: Intersections = vec![Intersection::new(-2.0, &s), Intersection::new(-1.0, &s)].into();

    assert_eq!(xs.hit(), None);
}

#[test]
fn hit_is_lowest_nonnegative_of_unsorted() {
    let s = Shape::sphere();
    let xs: Intersections = vec![
        Intersection::new(5.0, &s),
        Intersection::new(7.0, &s),
        Intersection::new(-3.0, &s),
        Intersection::new(2.0, &s),
        Intersection::new(std::f64::NAN, &s),
    ].into();

    assert_eq!(xs.hit(), Some(Intersection::new(2.0, &s)));
    assert_eq!(xs[0].t, 5.0);
}

#[test]
fn intersections_compare_by_identity() {
    let s1 = Shape::sphere();
    let s2 = Shape::sphere();

    assert_eq!(s1, s2);
    assert_ne!(Intersection::new(1.0, &s1), Intersection::new(1.0, &s2));
}

#[test]
fn aggregate_sorts_by_t() {
    let s = Shape::sphere();
    let a: Intersections = vec![Intersection::new(4.0, &s), Intersection::new(1.0, &s)].into();
    let b: Intersections = vec![Intersection::new(3.0, &s)].into();

    let ts: Vec<f64> = Intersections::aggregate(vec![a, b]).iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![1.0, 3.0, 4.0]);
}

#[test]
fn precompute_outside_hit() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let i = Intersection::new(4.0, &s);
    let comps = IntersectionComputation::new(&r, &i, None);

    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(!comps.inside);
}

#[test]
fn precompute_inside_hit_flips_normal() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();
    let i = Intersection::new(1.0, &s);
    let comps = IntersectionComputation::new(&r, &i, None);

    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(comps.normalv, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(comps.inside);
}

#[test]
fn over_and_under_points_straddle_the_surface() {
    use crate::matrix::Matrix4D;

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let mut s = glass_sphere();
    s.set_transform(Matrix4D::translation(0.0, 0.0, 1.0)).unwrap();
    let i = Intersection::new(5.0, &s);
    let xs: Intersections = vec![i].into();
    let comps = IntersectionComputation::new(&r, &i, Some(&xs));

    assert!(comps.over_point.z < -FEQ_EPSILON / 2.0);
    assert!(comps.under_point.z > FEQ_EPSILON / 2.0);
    assert!(comps.point.z > comps.over_point.z);
    assert!(comps.point.z < comps.under_point.z);
}

#[test]
fn precompute_reflection_vector() {
    let half = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(Tuple4D::point(0.0, 1.0, -1.0), Tuple4D::vector(0.0, -half, half));
    let p = Shape::plane();
    let i = Intersection::new(2.0f64.sqrt(), &p);
    let comps = IntersectionComputation::new(&r, &i, None);

    assert_eq!(comps.reflectv, Tuple4D::vector(0.0, half, half));
}

#[test]
fn refractive_indices_at_each_intersection() {
    use crate::matrix::Matrix4D;

    let mut a = glass_sphere();
    a.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    a.material.refractive_index = 1.5;

    let mut b = glass_sphere();
    b.set_transform(Matrix4D::translation(0.0, 0.0, -0.25)).unwrap();
    b.material.refractive_index = 2.0;

    let mut c = glass_sphere();
    c.set_transform(Matrix4D::translation(0.0, 0.0, 0.25)).unwrap();
    c.material.refractive_index = 2.5;

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -4.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs: Intersections = vec![
        Intersection::new(2.0, &a),
        Intersection::new(2.75, &b),
        Intersection::new(3.25, &c),
        Intersection::new(4.75, &b),
        Intersection::new(5.25, &c),
        Intersection::new(6.0, &a),
    ].into();

    let expected = [(1.0, 1.5), (1.5, 2.0), (2.0, 2.5), (2.5, 2.5), (2.5, 1.5), (1.5, 1.0)];
    for (index, (n1, n2)) in expected.iter().enumerate() {
        let comps = IntersectionComputation::new(&r, &xs[index], Some(&xs));
        assert_eq!(comps.n1, *n1, "n1 at {}", index);
        assert_eq!(comps.n2, *n2, "n2 at {}", index);
    }
}

#[test]
fn schlick_under_total_internal_reflection() {
    let half = 2.0f64.sqrt() / 2.0;
    let s = glass_sphere();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, half), Tuple4D::vector(0.0, 1.0, 0.0));
    let xs: Intersections = vec![
        Intersection::new(-half, &s),
        Intersection::new(half, &s),
    ].into();
    let comps = IntersectionComputation::new(&r, &xs[1], Some(&xs));

    assert_eq!(comps.schlick(), 1.0);
}

#[test]
fn schlick_with_perpendicular_ray() {
    let s = glass_sphere();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0));
    let xs: Intersections = vec![
        Intersection::new(-1.0, &s),
        Intersection::new(1.0, &s),
    ].into();
    let comps = IntersectionComputation::new(&r, &xs[1], Some(&xs));

    assert!(crate::feq(comps.schlick(), 0.04));
}

#[test]
fn schlick_with_small_angle_and_denser_second_medium() {
    let s = glass_sphere();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.99, -2.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs: Intersections = vec![Intersection::new(1.8589, &s)].into();
    let comps = IntersectionComputation::new(&r, &xs[0], Some(&xs));

    assert!(crate::feq(comps.schlick(), 0.48873));
}
