use crate::consts::FEQ_EPSILON;
use crate::bounds::{ Bounds, check_axis };
use crate::csg::{ Csg, CsgOp };
use crate::error::{ Error, Result };
use crate::intersect::{ Intersection, Intersections };
use crate::light::Material;
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeType {
    /// A unit sphere centered at the object-space origin.
    Sphere,

    /// The XZ plane through the object-space origin, normal pointing up +Y.
    Plane,

    /// An axis-aligned cube spanning `-1..=1` on every axis.
    Cube,

    /// A group of shapes, each placed by its own transform. Groups nest.
    Group(Vec<Shape>),

    /// Two shapes combined by a CSG operation.
    Csg(Csg),
}

/// A shape in a scene.
///
/// Every shape carries a local transform (relative to its parent, or the
/// world for top-level shapes) and a material. Two matrices are derived and
/// cached whenever the transform or the parent changes:
///
/// * `inverse`, taking rays from the parent's space into this shape's space;
/// * `world_inverse`, taking points from world space all the way down to this
///   shape's space, which is what normals and patterns need.
///
/// Groups and CSG shapes also cache their bounds in their own space.
#[derive(Clone, Debug)]
pub struct Shape {
    ty: ShapeType,
    pub material: Material,

    transform: Matrix4D,
    inverse: Matrix4D,
    parent_inverse: Matrix4D,
    world_inverse: Matrix4D,
    bounds: Bounds,
}

/// Shapes are equal when they have the same kind, transform and material.
/// Parents are not compared.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self.transform == other.transform
            && self.material == other.material
    }
}

impl Shape {
    fn new(ty: ShapeType, bounds: Bounds) -> Shape {
        Shape {
            ty,
            material: Material::default(),
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
            parent_inverse: Matrix4D::identity(),
            world_inverse: Matrix4D::identity(),
            bounds,
        }
    }

    pub fn sphere() -> Shape {
        Shape::new(ShapeType::Sphere, Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0))
    }

    pub fn plane() -> Shape {
        let inf = std::f64::INFINITY;
        Shape::new(ShapeType::Plane, Bounds::new(-inf, 0.0, -inf, inf, 0.0, inf))
    }

    pub fn cube() -> Shape {
        Shape::new(ShapeType::Cube, Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0))
    }

    /// An empty group.
    pub fn group() -> Shape {
        Shape::new(ShapeType::Group(Vec::new()), Bounds::empty())
    }

    pub fn csg(op: CsgOp, left: Shape, right: Shape) -> Shape {
        let bounds = left.parent_space_bounds() + right.parent_space_bounds();

        let mut shape = Shape::new(ShapeType::Csg(Csg::new(op, left, right)), bounds);
        shape.propagate(Matrix4D::identity());

        shape
    }

    pub fn csg_union(left: Shape, right: Shape) -> Shape {
        Shape::csg(CsgOp::Union, left, right)
    }

    pub fn csg_intersection(left: Shape, right: Shape) -> Shape {
        Shape::csg(CsgOp::Intersect, left, right)
    }

    pub fn csg_difference(left: Shape, right: Shape) -> Shape {
        Shape::csg(CsgOp::Difference, left, right)
    }

    pub fn ty(&self) -> &ShapeType {
        &self.ty
    }

    /// Children of a group, or `None` for any other shape.
    pub fn children(&self) -> Option<&[Shape]> {
        match self.ty {
            ShapeType::Group(ref children) => Some(children),
            _ => None,
        }
    }

    /// The CSG operation and operands, or `None` for any other shape.
    pub fn as_csg(&self) -> Option<&Csg> {
        match self.ty {
            ShapeType::Csg(ref csg) => Some(csg),
            _ => None,
        }
    }

    /// Moves `child` into this group.
    ///
    /// The child's transform becomes relative to the group. Fails with
    /// `Error::InvalidArgument` if `self` is not a group.
    pub fn add_child(&mut self, mut child: Shape) -> Result<()> {
        let children = match self.ty {
            ShapeType::Group(ref mut children) => children,
            _ => return Err(Error::InvalidArgument(
                "cannot add a child to a shape that is not a group".to_string()
            )),
        };

        child.propagate(self.world_inverse);
        self.bounds += child.parent_space_bounds();
        children.push(child);

        Ok(())
    }

    /// Whether `other` is this very shape, or sits somewhere inside it.
    ///
    /// Identity is by address, so two equal spheres are still distinct.
    pub fn includes(&self, other: &Shape) -> bool {
        match self.ty {
            ShapeType::Group(ref children) => children.iter().any(|c| c.includes(other)),
            ShapeType::Csg(ref csg) => csg.left.includes(other) || csg.right.includes(other),
            _ => std::ptr::eq(self, other),
        }
    }

    /// Bounds in this shape's own space.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Bounds in the parent's space.
    pub fn parent_space_bounds(&self) -> Bounds {
        self.bounds.transform(&self.transform)
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    pub fn inverse(&self) -> &Matrix4D {
        &self.inverse
    }

    /// Replaces the local transform.
    ///
    /// Fails with `Error::SingularTransform`, leaving the shape untouched, if
    /// `transform` cannot be inverted. Children see the new transform at once.
    pub fn set_transform(&mut self, transform: Matrix4D) -> Result<()> {
        self.inverse = transform.try_inverse()?;
        self.transform = transform;

        let parent_inverse = self.parent_inverse;
        self.propagate(parent_inverse);

        Ok(())
    }

    /// Replaces the local transform with one whose inverse is already known,
    /// e.g. a scale by `s` paired with a scale by `1 / s`.
    pub(crate) fn set_transform_with_inverse(&mut self, transform: Matrix4D, inverse: Matrix4D) {
        self.transform = transform;
        self.inverse = inverse;

        let parent_inverse = self.parent_inverse;
        self.propagate(parent_inverse);
    }

    /// Makes this a top-level shape again, e.g. after cloning it out of a
    /// group.
    pub(crate) fn detach(&mut self) {
        self.propagate(Matrix4D::identity());
    }

    /// Recomputes the world inverse from the parent's world inverse, then
    /// passes the result on to every descendant.
    fn propagate(&mut self, parent_inverse: Matrix4D) {
        self.parent_inverse = parent_inverse;
        self.world_inverse = self.inverse * parent_inverse;

        let world_inverse = self.world_inverse;
        match self.ty {
            ShapeType::Group(ref mut children) => {
                for child in children.iter_mut() {
                    child.propagate(world_inverse);
                }
            },
            ShapeType::Csg(ref mut csg) => {
                csg.left.propagate(world_inverse);
                csg.right.propagate(world_inverse);
            },
            _ => (),
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    /// Takes a world-space point into this shape's space, through every
    /// parent on the way.
    pub fn world_to_object(&self, point: Tuple4D) -> Tuple4D {
        self.world_inverse * point
    }

    /// Takes an object-space normal out to world space.
    pub fn normal_to_world(&self, normal: Tuple4D) -> Tuple4D {
        let mut n = self.world_inverse.transposition() * normal;
        n.w = 0.0;

        n.normalize()
    }

    /// Intersects a ray already in this shape's space.
    pub fn local_intersect<'a>(&'a self, ray: &Ray4D) -> Intersections<'a> {
        match self.ty {
            ShapeType::Sphere => self.intersect_sphere(ray),
            ShapeType::Plane => self.intersect_plane(ray),
            ShapeType::Cube => self.intersect_cube(ray),
            ShapeType::Group(ref children) => self.intersect_group(children, ray),
            ShapeType::Csg(ref csg) => csg.local_intersect(ray),
        }
    }

    /// Normal at a point already in this shape's space.
    ///
    /// Only primitives have normals; groups and CSG shapes never appear in an
    /// `Intersection`.
    pub fn local_normal_at(&self, at: Tuple4D) -> Tuple4D {
        match self.ty {
            ShapeType::Sphere => Tuple4D::vector(at.x, at.y, at.z),
            ShapeType::Plane => Tuple4D::vector(0.0, 1.0, 0.0),
            ShapeType::Cube => Self::normal_at_cube(at),
            ShapeType::Group(_) | ShapeType::Csg(_) => unreachable!(
                "normals are only computed on primitive shapes"
            ),
        }
    }

    fn intersect_sphere<'a>(&'a self, ray: &Ray4D) -> Intersections<'a> {
        // Subtracting the origin point leaves a vector
        let sphere_to_ray = ray.origin - Tuple4D::origin();

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

        let discriminant = b.powi(2) - 4.0 * a * c;
        if discriminant < 0.0 {
            return Intersections::new();
        }

        let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);

        vec![Intersection::new(t1, self), Intersection::new(t2, self)].into()
    }

    fn intersect_plane<'a>(&'a self, ray: &Ray4D) -> Intersections<'a> {
        if ray.direction.y.abs() < FEQ_EPSILON {
            return Intersections::new();
        }

        let t = -ray.origin.y / ray.direction.y;
        vec![Intersection::new(t, self)].into()
    }

    fn intersect_cube<'a>(&'a self, ray: &Ray4D) -> Intersections<'a> {
        let mut tmin = std::f64::NEG_INFINITY;
        let mut tmax = std::f64::INFINITY;

        for axis in 0..3 {
            let (t0, t1) = check_axis(-1.0, 1.0, ray.origin[axis], ray.direction[axis]);
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
        }

        if tmin > tmax {
            return Intersections::new();
        }

        vec![Intersection::new(tmin, self), Intersection::new(tmax, self)].into()
    }

    /// Picks the face by the largest coordinate. On edges and corners x wins
    /// over y, and y over z.
    fn normal_at_cube(p: Tuple4D) -> Tuple4D {
        let (xa, ya, za) = (p.x.abs(), p.y.abs(), p.z.abs());
        let max_component = xa.max(ya).max(za);

        if max_component == xa {
            Tuple4D::vector(p.x, 0.0, 0.0)
        } else if max_component == ya {
            Tuple4D::vector(0.0, p.y, 0.0)
        } else {
            Tuple4D::vector(0.0, 0.0, p.z)
        }
    }

    fn intersect_group<'a>(&'a self, children: &'a [Shape], ray: &Ray4D) -> Intersections<'a> {
        if children.is_empty() || !self.bounds.intersects(ray) {
            return Intersections::new();
        }

        let all = children.iter()
            .map(|child| intersect(child, ray))
            .collect();

        Intersections::aggregate(all)
    }
}

/// Intersects a ray given in the parent's space (world space for top-level
/// shapes) with `s`.
pub fn intersect<'a>(s: &'a Shape, r: &Ray4D) -> Intersections<'a> {
    let local_ray = r.transform(&s.inverse);
    s.local_intersect(&local_ray)
}

/// World-space normal of `s` at a world-space point on its surface.
pub fn normal_at(s: &Shape, world_point: Tuple4D) -> Tuple4D {
    let local_point = s.world_to_object(world_point);
    let local_normal = s.local_normal_at(local_point);

    s.normal_to_world(local_normal)
}

#[cfg(test)]
fn ts(xs: &Intersections) -> Vec<f64> {
    xs.iter().map(|i| i.t).collect()
}

#[test]
fn ray_intersects_sphere_at_two_points() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();

    assert_eq!(ts(&intersect(&s, &r)), vec![4.0, 6.0]);
}

#[test]
fn ray_is_tangent_to_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 1.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();

    assert_eq!(ts(&intersect(&s, &r)), vec![5.0, 5.0]);
}

#[test]
fn ray_misses_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 2.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();

    assert!(intersect(&s, &r).is_empty());
}

#[test]
fn ray_is_inside_sphere() {
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();

    assert_eq!(ts(&intersect(&s, &r)), vec![-1.0, 1.0]);
}

#[test]
fn sphere_is_behind_ray() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let s = Shape::sphere();

    assert_eq!(ts(&intersect(&s, &r)), vec![-6.0, -4.0]);
}

#[test]
fn ray_hits_scaled_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();

    assert_eq!(ts(&intersect(&s, &r)), vec![3.0, 7.0]);
}

#[test]
fn ray_misses_translated_sphere() {
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0)).unwrap();

    assert!(intersect(&s, &r).is_empty());
}

#[test]
fn singular_transform_is_rejected() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(1.0, 0.0, 0.0)).unwrap();

    let res = s.set_transform(Matrix4D::scaling(1.0, 0.0, 1.0));
    assert!(matches!(res, Err(Error::SingularTransform)));
    assert_eq!(s.transform(), &Matrix4D::translation(1.0, 0.0, 0.0));
}

#[test]
fn normals_on_sphere() {
    let s = Shape::sphere();
    let k = 3.0f64.sqrt() / 3.0;

    assert_eq!(normal_at(&s, Tuple4D::point(1.0, 0.0, 0.0)), Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(normal_at(&s, Tuple4D::point(0.0, 1.0, 0.0)), Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(normal_at(&s, Tuple4D::point(0.0, 0.0, 1.0)), Tuple4D::vector(0.0, 0.0, 1.0));
    assert_eq!(normal_at(&s, Tuple4D::point(k, k, k)), Tuple4D::vector(k, k, k));
}

#[test]
fn normal_on_translated_sphere() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(0.0, 1.0, 0.0)).unwrap();

    let n = normal_at(&s, Tuple4D::point(0.0, 1.70711, -0.70711));
    assert_eq!(n, Tuple4D::vector(0.0, 0.70711, -0.70711));
}

#[test]
fn normal_on_transformed_sphere() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(1.0, 0.5, 1.0)
        * Matrix4D::rotation_z(std::f64::consts::PI / 5.0)).unwrap();

    let half = 2.0f64.sqrt() / 2.0;
    let n = normal_at(&s, Tuple4D::point(0.0, half, -half));
    assert_eq!(n, Tuple4D::vector(0.0, 0.97014, -0.24254));
}

#[test]
fn normal_on_plane_is_constant() {
    let p = Shape::plane();

    for at in [
        Tuple4D::origin(),
        Tuple4D::point(10.0, 0.0, -10.0),
        Tuple4D::point(-5.0, 0.0, 150.0),
    ].iter() {
        assert_eq!(p.local_normal_at(*at), Tuple4D::vector(0.0, 1.0, 0.0));
    }
}

#[test]
fn ray_parallel_or_coplanar_to_plane() {
    let p = Shape::plane();
    let parallel = Ray4D::new(Tuple4D::point(0.0, 10.0, 0.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let coplanar = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(p.local_intersect(&parallel).is_empty());
    assert!(p.local_intersect(&coplanar).is_empty());
}

#[test]
fn ray_intersecting_plane_from_above_and_below() {
    let p = Shape::plane();
    let above = Ray4D::new(Tuple4D::point(0.0, 1.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0));
    let below = Ray4D::new(Tuple4D::point(0.0, -1.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0));

    assert_eq!(ts(&p.local_intersect(&above)), vec![1.0]);
    assert_eq!(ts(&p.local_intersect(&below)), vec![1.0]);
}

#[test]
fn ray_intersects_cube() {
    let c = Shape::cube();
    let cases = [
        ((5.0, 0.5, 0.0), (-1.0, 0.0, 0.0), 4.0, 6.0),
        ((-5.0, 0.5, 0.0), (1.0, 0.0, 0.0), 4.0, 6.0),
        ((0.5, 5.0, 0.0), (0.0, -1.0, 0.0), 4.0, 6.0),
        ((0.5, -5.0, 0.0), (0.0, 1.0, 0.0), 4.0, 6.0),
        ((0.5, 0.0, 5.0), (0.0, 0.0, -1.0), 4.0, 6.0),
        ((0.5, 0.0, -5.0), (0.0, 0.0, 1.0), 4.0, 6.0),
        ((0.0, 0.5, 0.0), (0.0, 0.0, 1.0), -1.0, 1.0),
    ];

    for ((ox, oy, oz), (dx, dy, dz), t1, t2) in cases.iter() {
        let r = Ray4D::new(Tuple4D::point(*ox, *oy, *oz), Tuple4D::vector(*dx, *dy, *dz));
        assert_eq!(ts(&c.local_intersect(&r)), vec![*t1, *t2], "from ({}, {}, {})", ox, oy, oz);
    }
}

#[test]
fn ray_misses_cube() {
    let c = Shape::cube();
    let cases = [
        ((-2.0, 0.0, 0.0), (0.2673, 0.5345, 0.8018)),
        ((0.0, -2.0, 0.0), (0.8018, 0.2673, 0.5345)),
        ((0.0, 0.0, -2.0), (0.5345, 0.8018, 0.2673)),
        ((2.0, 0.0, 2.0), (0.0, 0.0, -1.0)),
        ((0.0, 2.0, 2.0), (0.0, -1.0, 0.0)),
        ((2.0, 2.0, 0.0), (-1.0, 0.0, 0.0)),
    ];

    for ((ox, oy, oz), (dx, dy, dz)) in cases.iter() {
        let r = Ray4D::new(Tuple4D::point(*ox, *oy, *oz), Tuple4D::vector(*dx, *dy, *dz));
        assert!(c.local_intersect(&r).is_empty(), "from ({}, {}, {})", ox, oy, oz);
    }
}

#[test]
fn ray_lying_in_a_cube_face_misses() {
    let c = Shape::cube();
    let cases = [
        ((1.0, 0.0, -5.0), (0.0, 0.0, 1.0)),
        ((0.0, -1.0, -5.0), (0.0, 0.0, 1.0)),
        ((-5.0, -1.0, 0.5), (1.0, 0.0, 0.0)),
    ];

    for ((ox, oy, oz), (dx, dy, dz)) in cases.iter() {
        let r = Ray4D::new(Tuple4D::point(*ox, *oy, *oz), Tuple4D::vector(*dx, *dy, *dz));
        assert!(c.local_intersect(&r).is_empty(), "from ({}, {}, {})", ox, oy, oz);
    }
}

#[test]
fn cube_hits_are_symmetric_along_x() {
    let c = Shape::cube();

    for &(y, z) in [(0.0, 0.0), (0.5, -0.25), (-0.9, 0.9), (0.99, 0.0)].iter() {
        let from_right = Ray4D::new(Tuple4D::point(5.0, y, z), Tuple4D::vector(-1.0, 0.0, 0.0));
        let from_left = Ray4D::new(Tuple4D::point(-5.0, y, z), Tuple4D::vector(1.0, 0.0, 0.0));

        assert_eq!(ts(&c.local_intersect(&from_right)), ts(&c.local_intersect(&from_left)));
    }
}

#[test]
fn normals_on_cube_faces_edges_and_corners() {
    let c = Shape::cube();
    let cases = [
        ((1.0, 0.5, -0.8), (1.0, 0.0, 0.0)),
        ((-1.0, -0.2, 0.9), (-1.0, 0.0, 0.0)),
        ((-0.4, 1.0, -0.1), (0.0, 1.0, 0.0)),
        ((0.3, -1.0, -0.7), (0.0, -1.0, 0.0)),
        ((-0.6, 0.3, 1.0), (0.0, 0.0, 1.0)),
        ((0.4, 0.4, -1.0), (0.0, 0.0, -1.0)),
        ((1.0, 1.0, 1.0), (1.0, 0.0, 0.0)),
        ((-1.0, -1.0, -1.0), (-1.0, 0.0, 0.0)),
        ((0.0, 1.0, 1.0), (0.0, 1.0, 0.0)),
    ];

    for ((px, py, pz), (nx, ny, nz)) in cases.iter() {
        assert_eq!(c.local_normal_at(Tuple4D::point(*px, *py, *pz)),
            Tuple4D::vector(*nx, *ny, *nz));
    }
}

#[test]
fn primitive_bounds() {
    let inf = std::f64::INFINITY;

    assert_eq!(Shape::sphere().bounds(), Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0));
    assert_eq!(Shape::cube().bounds(), Bounds::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0));
    assert_eq!(Shape::plane().bounds(), Bounds::new(-inf, 0.0, -inf, inf, 0.0, inf));
    assert!(Shape::group().bounds().is_empty());
}

#[test]
fn adding_a_child_to_a_group() {
    let mut g = Shape::group();
    g.add_child(Shape::sphere()).unwrap();

    let children = g.children().unwrap();
    assert_eq!(children.len(), 1);
    assert!(g.includes(&children[0]));
}

#[test]
fn adding_a_child_to_a_primitive_fails() {
    let mut s = Shape::sphere();

    match s.add_child(Shape::cube()) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn group_bounds_follow_child_transforms() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(2.0, 5.0, -3.0)
        * Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    let mut c = Shape::cube();
    c.set_transform(Matrix4D::translation(-4.0, -1.0, 4.0)
        * Matrix4D::scaling(0.5, 1.0, 1.0)).unwrap();

    let mut g = Shape::group();
    g.add_child(s).unwrap();
    g.add_child(c).unwrap();

    assert_eq!(g.bounds(), Bounds::new(-4.5, -2.0, -5.0, 4.0, 7.0, 5.0));
}

#[test]
fn csg_bounds_cover_both_operands() {
    let left = Shape::sphere();
    let mut right = Shape::sphere();
    right.set_transform(Matrix4D::translation(2.0, 3.0, 4.0)).unwrap();

    let c = Shape::csg_difference(left, right);
    assert_eq!(c.bounds(), Bounds::new(-1.0, -1.0, -1.0, 3.0, 4.0, 5.0));
}

#[test]
fn intersecting_ray_with_empty_group() {
    let g = Shape::group();
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(g.local_intersect(&r).is_empty());
}

#[test]
fn intersecting_ray_with_nonempty_group() {
    let s1 = Shape::sphere();
    let mut s2 = Shape::sphere();
    s2.set_transform(Matrix4D::translation(0.0, 0.0, -3.0)).unwrap();
    let mut s3 = Shape::sphere();
    s3.set_transform(Matrix4D::translation(5.0, 0.0, 0.0)).unwrap();

    let mut g = Shape::group();
    g.add_child(s1).unwrap();
    g.add_child(s2).unwrap();
    g.add_child(s3).unwrap();

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = g.local_intersect(&r);
    let children = g.children().unwrap();

    assert_eq!(xs.len(), 4);
    assert!(std::ptr::eq(xs[0].what, &children[1]));
    assert!(std::ptr::eq(xs[1].what, &children[1]));
    assert!(std::ptr::eq(xs[2].what, &children[0]));
    assert!(std::ptr::eq(xs[3].what, &children[0]));
}

#[test]
fn intersecting_a_transformed_group() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0)).unwrap();

    let mut g = Shape::group();
    g.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    g.add_child(s).unwrap();

    let r = Ray4D::new(Tuple4D::point(10.0, 0.0, -10.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert_eq!(intersect(&g, &r).len(), 2);
}

#[test]
fn group_skips_children_when_bounds_are_missed() {
    let mut g = Shape::group();
    g.add_child(Shape::cube()).unwrap();

    let r = Ray4D::new(Tuple4D::point(0.0, 5.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert!(!g.bounds().intersects(&r));
    assert!(intersect(&g, &r).is_empty());
}

#[cfg(test)]
fn nested_sphere() -> Shape {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0)).unwrap();

    let mut g2 = Shape::group();
    g2.set_transform(Matrix4D::scaling(1.0, 2.0, 3.0)).unwrap();
    g2.add_child(s).unwrap();

    let mut g1 = Shape::group();
    g1.set_transform(Matrix4D::rotation_y(std::f64::consts::FRAC_PI_2)).unwrap();
    g1.add_child(g2).unwrap();

    g1
}

#[test]
fn converting_a_point_from_world_to_object_space() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0)).unwrap();

    let mut g2 = Shape::group();
    g2.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0)).unwrap();
    g2.add_child(s).unwrap();

    let mut g1 = Shape::group();
    g1.set_transform(Matrix4D::rotation_y(std::f64::consts::FRAC_PI_2)).unwrap();
    g1.add_child(g2).unwrap();

    let s = &g1.children().unwrap()[0].children().unwrap()[0];
    assert_eq!(s.world_to_object(Tuple4D::point(-2.0, 0.0, -10.0)),
        Tuple4D::point(0.0, 0.0, -1.0));
}

#[test]
fn converting_a_normal_from_object_to_world_space() {
    let g1 = nested_sphere();
    let s = &g1.children().unwrap()[0].children().unwrap()[0];
    let k = 3.0f64.sqrt() / 3.0;

    assert_eq!(s.normal_to_world(Tuple4D::vector(k, k, k)),
        Tuple4D::vector(0.2857, 0.4286, -0.8571));
}

#[test]
fn finding_the_normal_on_a_child_object() {
    let g1 = nested_sphere();
    let s = &g1.children().unwrap()[0].children().unwrap()[0];

    assert_eq!(normal_at(s, Tuple4D::point(1.7321, 1.1547, -5.5774)),
        Tuple4D::vector(0.2857, 0.4286, -0.8571));
}

#[test]
fn retransforming_a_group_updates_its_children() {
    let mut g = Shape::group();
    g.add_child(Shape::sphere()).unwrap();
    g.set_transform(Matrix4D::translation(0.0, 0.0, 10.0)).unwrap();

    let s = &g.children().unwrap()[0];
    assert_eq!(s.world_to_object(Tuple4D::point(0.0, 0.0, 10.0)), Tuple4D::origin());
    assert_eq!(normal_at(s, Tuple4D::point(0.0, 0.0, 9.0)), Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn includes_is_by_identity() {
    let c = Shape::csg_union(Shape::sphere(), Shape::cube());
    let csg = c.as_csg().unwrap();
    let lookalike = Shape::sphere();

    assert!(c.includes(csg.left()));
    assert!(c.includes(csg.right()));
    assert_eq!(csg.left(), &lookalike);
    assert!(!c.includes(&lookalike));
}
