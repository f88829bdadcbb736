use crate::consts::FEQ_EPSILON;
use crate::color::Color;
use crate::intersect::{ Intersections, IntersectionComputation };
use crate::light::{ PointLight, lighting };
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::shape::{ Shape, intersect };
use crate::tuple::Tuple4D;

/// Everything that is rendered: shapes, the lights shining on them and the
/// color seen where a ray hits nothing.
///
/// A world is built up front and then only read while rendering, so a single
/// `&World` is shared by every render thread.
#[derive(Clone, Debug)]
pub struct World {
    pub objects: Vec<Shape>,
    pub lights: Vec<PointLight>,
    pub background: Color,
}

/// Two concentric spheres lit from the upper left, a fixture for shading.
impl Default for World {
    fn default() -> World {
        let light = PointLight::new(Color::white(), Tuple4D::point(-10.0, 10.0, -10.0));

        let mut s1 = Shape::sphere();
        s1.material.color = Color::rgb(0.8, 1.0, 0.6);
        s1.material.diffuse = 0.7;
        s1.material.specular = 0.2;

        let mut s2 = Shape::sphere();
        s2.set_transform_with_inverse(
            Matrix4D::scaling(0.5, 0.5, 0.5),
            Matrix4D::scaling(2.0, 2.0, 2.0),
        );

        World {
            objects: vec![s1, s2],
            lights: vec![light],
            background: Color::black(),
        }
    }
}

impl World {
    /// A world with no objects, no lights and a black background.
    pub fn empty() -> World {
        World {
            objects: Vec::new(),
            lights: Vec::new(),
            background: Color::black(),
        }
    }

    pub fn add_object(&mut self, mut shape: Shape) {
        shape.detach();
        self.objects.push(shape);
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Intersects a world-space ray with every object, sorted by `t`.
    pub fn intersect<'a>(&'a self, r: &Ray4D) -> Intersections<'a> {
        let all = self.objects.iter()
            .map(|obj| intersect(obj, r))
            .collect();

        Intersections::aggregate(all)
    }

    /// Whether something sits between `point` and a light at
    /// `light_position`.
    pub fn is_shadowed(&self, light_position: Tuple4D, point: Tuple4D) -> bool {
        let v = light_position - point;
        let distance = v.magnitude();
        let r = Ray4D::new(point, v.normalize());

        self.intersect(&r).iter().any(|i| i.t > FEQ_EPSILON && i.t < distance)
    }

    /// Color of a prepared hit: direct light from every light, plus whatever
    /// is reflected and refracted, with `remaining` bounces left.
    pub fn shade_hit(&self, comps: &IntersectionComputation, remaining: usize) -> Color {
        let material = &comps.obj.material;

        let surface = self.lights.iter().fold(Color::black(), |acc, light| {
            let in_shadow = self.is_shadowed(light.position, comps.over_point);
            acc + lighting(material, comps.obj, light, comps.over_point,
                comps.eyev, comps.normalv, in_shadow)
        });

        let reflected = self.reflected_color(comps, remaining);
        let refracted = self.refracted_color(comps, remaining);

        if material.reflective > 0.0 && material.transparency > 0.0 {
            let reflectance = comps.schlick();
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        }
    }

    /// Traces `r` into the world. Misses see the background.
    pub fn color_at(&self, r: &Ray4D, remaining: usize) -> Color {
        let xs = self.intersect(r);

        match xs.hit() {
            None => self.background,
            Some(hit) => {
                let comps = IntersectionComputation::new(r, &hit, Some(&xs));
                self.shade_hit(&comps, remaining)
            },
        }
    }

    pub fn reflected_color(&self, comps: &IntersectionComputation, remaining: usize) -> Color {
        let reflective = comps.obj.material.reflective;
        if remaining == 0 || reflective.abs() < FEQ_EPSILON {
            return Color::black();
        }

        let r = Ray4D::new(comps.over_point, comps.reflectv);
        self.color_at(&r, remaining - 1) * reflective
    }

    pub fn refracted_color(&self, comps: &IntersectionComputation, remaining: usize) -> Color {
        let transparency = comps.obj.material.transparency;
        if remaining == 0 || transparency.abs() < FEQ_EPSILON {
            return Color::black();
        }

        // Snell's law
        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eyev.dot(&comps.normalv);
        let sin2_t = n_ratio.powi(2) * (1.0 - cos_i.powi(2));

        // Total internal reflection
        if sin2_t > 1.0 {
            return Color::black();
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = comps.normalv * (n_ratio * cos_i - cos_t) - comps.eyev * n_ratio;
        let r = Ray4D::new(comps.under_point, direction);

        self.color_at(&r, remaining - 1) * transparency
    }
}

#[cfg(test)]
use crate::consts::RECURSION_DEPTH;
#[cfg(test)]
use crate::intersect::Intersection;

#[test]
fn default_world_inner_sphere_is_half_size() {
    let w = World::default();
    let inner = &w.objects[1];

    assert_eq!(inner.transform(), &Matrix4D::scaling(0.5, 0.5, 0.5));
    assert_eq!(Some(*inner.inverse()), inner.transform().inverse());
    assert_eq!(inner.world_to_object(Tuple4D::point(0.5, 0.0, 0.0)), Tuple4D::point(1.0, 0.0, 0.0));
}

#[test]
fn intersect_default_world_with_ray() {
    let w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    let ts: Vec<f64> = w.intersect(&r).iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![4.0, 4.5, 5.5, 6.0]);
}

#[test]
fn shade_intersection_from_outside() {
    let w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(4.0, &w.objects[0]);

    let comps = IntersectionComputation::new(&r, &i, None);
    assert_eq!(w.shade_hit(&comps, RECURSION_DEPTH), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn shade_intersection_from_inside() {
    let mut w = World::default();
    w.lights = vec![PointLight::new(Color::white(), Tuple4D::point(0.0, 0.25, 0.0))];
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(0.5, &w.objects[1]);

    let comps = IntersectionComputation::new(&r, &i, None);
    assert_eq!(w.shade_hit(&comps, RECURSION_DEPTH), Color::rgb(0.90498, 0.90498, 0.90498));
}

#[test]
fn shade_intersection_in_shadow() {
    let mut w = World::empty();
    w.add_light(PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0)));
    w.add_object(Shape::sphere());

    let mut s2 = Shape::sphere();
    s2.set_transform(Matrix4D::translation(0.0, 0.0, 10.0)).unwrap();
    w.add_object(s2);

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(4.0, &w.objects[1]);
    let comps = IntersectionComputation::new(&r, &i, None);

    assert_eq!(w.shade_hit(&comps, RECURSION_DEPTH), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn every_light_contributes() {
    let mut w = World::default();
    let light = w.lights[0];
    w.add_light(light);

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert_eq!(w.color_at(&r, RECURSION_DEPTH), Color::rgb(0.76132, 0.95166, 0.5710));
}

#[test]
fn color_when_ray_misses() {
    let mut w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 1.0, 0.0));

    assert_eq!(w.color_at(&r, RECURSION_DEPTH), Color::black());

    w.background = Color::rgb(0.2, 0.3, 0.4);
    assert_eq!(w.color_at(&r, RECURSION_DEPTH), Color::rgb(0.2, 0.3, 0.4));
}

#[test]
fn color_when_ray_hits() {
    let w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r, RECURSION_DEPTH), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn color_with_intersection_behind_ray() {
    let mut w = World::default();
    w.objects[0].material.ambient = 1.0;
    w.objects[1].material.ambient = 1.0;

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 0.75), Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(w.color_at(&r, RECURSION_DEPTH), w.objects[1].material.color);
}

#[test]
fn no_shadow_when_nothing_is_collinear() {
    let w = World::default();
    let light = w.lights[0].position;

    assert!(!w.is_shadowed(light, Tuple4D::point(0.0, 10.0, 0.0)));
}

#[test]
fn shadow_when_object_is_between_point_and_light() {
    let w = World::default();
    let light = w.lights[0].position;

    assert!(w.is_shadowed(light, Tuple4D::point(10.0, -10.0, 10.0)));
}

#[test]
fn no_shadow_when_object_is_behind_light_or_point() {
    let w = World::default();
    let light = w.lights[0].position;

    assert!(!w.is_shadowed(light, Tuple4D::point(-20.0, 20.0, -20.0)));
    assert!(!w.is_shadowed(light, Tuple4D::point(-2.0, 2.0, -2.0)));
}

#[test]
fn reflected_color_of_nonreflective_material() {
    let mut w = World::default();
    w.objects[1].material.ambient = 1.0;

    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(1.0, &w.objects[1]);
    let comps = IntersectionComputation::new(&r, &i, None);

    assert_eq!(w.reflected_color(&comps, RECURSION_DEPTH), Color::black());
}

#[cfg(test)]
fn world_with_reflective_floor() -> World {
    let mut w = World::default();
    let mut floor = Shape::plane();
    floor.material.reflective = 0.5;
    floor.set_transform(Matrix4D::translation(0.0, -1.0, 0.0)).unwrap();
    w.add_object(floor);

    w
}

#[test]
fn reflected_color_of_reflective_material() {
    let w = world_with_reflective_floor();
    let half = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -half, half));
    let i = Intersection::new(2.0f64.sqrt(), &w.objects[2]);
    let comps = IntersectionComputation::new(&r, &i, None);

    assert_eq!(w.reflected_color(&comps, RECURSION_DEPTH), Color::rgb(0.19032, 0.2379, 0.14274));
}

#[test]
fn shade_hit_includes_reflection() {
    let w = world_with_reflective_floor();
    let half = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -half, half));
    let i = Intersection::new(2.0f64.sqrt(), &w.objects[2]);
    let comps = IntersectionComputation::new(&r, &i, None);

    assert_eq!(w.shade_hit(&comps, RECURSION_DEPTH), Color::rgb(0.87677, 0.92436, 0.82918));
}

#[test]
fn reflected_color_at_maximum_depth() {
    let w = world_with_reflective_floor();
    let half = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -half, half));
    let i = Intersection::new(2.0f64.sqrt(), &w.objects[2]);
    let comps = IntersectionComputation::new(&r, &i, None);

    assert_eq!(w.reflected_color(&comps, 0), Color::black());
}

#[test]
fn mutually_reflective_surfaces_terminate() {
    let mut w = World::empty();
    w.add_light(PointLight::new(Color::white(), Tuple4D::origin()));

    let mut lower = Shape::plane();
    lower.material.reflective = 1.0;
    lower.set_transform(Matrix4D::translation(0.0, -1.0, 0.0)).unwrap();
    w.add_object(lower);

    let mut upper = Shape::plane();
    upper.material.reflective = 1.0;
    upper.set_transform(Matrix4D::translation(0.0, 1.0, 0.0)).unwrap();
    w.add_object(upper);

    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 1.0, 0.0));
    let c = w.color_at(&r, RECURSION_DEPTH);

    assert!(c.r.is_finite() && c.g.is_finite() && c.b.is_finite());
}

#[test]
fn refracted_color_of_opaque_surface() {
    let w = World::default();
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs: Intersections = vec![
        Intersection::new(4.0, &w.objects[0]),
        Intersection::new(6.0, &w.objects[0]),
    ].into();
    let comps = IntersectionComputation::new(&r, &xs[0], Some(&xs));

    assert_eq!(w.refracted_color(&comps, RECURSION_DEPTH), Color::black());
}

#[test]
fn refracted_color_at_maximum_depth() {
    let mut w = World::default();
    w.objects[0].material.transparency = 1.0;
    w.objects[0].material.refractive_index = 1.5;

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs: Intersections = vec![
        Intersection::new(4.0, &w.objects[0]),
        Intersection::new(6.0, &w.objects[0]),
    ].into();
    let comps = IntersectionComputation::new(&r, &xs[0], Some(&xs));

    assert_eq!(w.refracted_color(&comps, 0), Color::black());
}

#[test]
fn refracted_color_under_total_internal_reflection() {
    let mut w = World::default();
    w.objects[0].material.transparency = 1.0;
    w.objects[0].material.refractive_index = 1.5;

    let half = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, half), Tuple4D::vector(0.0, 1.0, 0.0));
    let xs: Intersections = vec![
        Intersection::new(-half, &w.objects[0]),
        Intersection::new(half, &w.objects[0]),
    ].into();
    let comps = IntersectionComputation::new(&r, &xs[1], Some(&xs));

    assert_eq!(w.refracted_color(&comps, RECURSION_DEPTH), Color::black());
}

#[cfg(test)]
fn world_with_glass_floor_and_ball(reflective: f64) -> World {
    let mut w = World::default();

    let mut floor = Shape::plane();
    floor.set_transform(Matrix4D::translation(0.0, -1.0, 0.0)).unwrap();
    floor.material.reflective = reflective;
    floor.material.transparency = 0.5;
    floor.material.refractive_index = 1.5;
    w.add_object(floor);

    let mut ball = Shape::sphere();
    ball.set_transform(Matrix4D::translation(0.0, -3.5, -0.5)).unwrap();
    ball.material.color = Color::red();
    ball.material.ambient = 0.5;
    w.add_object(ball);

    w
}

#[test]
fn shade_hit_with_transparent_material() {
    let w = world_with_glass_floor_and_ball(0.0);
    let half = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -half, half));
    let xs: Intersections = vec![Intersection::new(2.0f64.sqrt(), &w.objects[2])].into();
    let comps = IntersectionComputation::new(&r, &xs[0], Some(&xs));

    assert_eq!(w.shade_hit(&comps, RECURSION_DEPTH), Color::rgb(0.93642, 0.68642, 0.68642));
}

#[test]
fn shade_hit_blends_reflection_and_refraction_with_schlick() {
    let w = world_with_glass_floor_and_ball(0.5);
    let half = 2.0f64.sqrt() / 2.0;
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -half, half));
    let xs: Intersections = vec![Intersection::new(2.0f64.sqrt(), &w.objects[2])].into();
    let comps = IntersectionComputation::new(&r, &xs[0], Some(&xs));

    assert_eq!(w.shade_hit(&comps, RECURSION_DEPTH), Color::rgb(0.93391, 0.69643, 0.69243));
}

#[test]
fn added_objects_are_top_level() {
    let mut g = Shape::group();
    g.set_transform(Matrix4D::translation(0.0, 0.0, 10.0)).unwrap();
    g.add_child(Shape::sphere()).unwrap();

    // A clone of a child still remembers its old parent until it is added
    let child = g.children().unwrap()[0].clone();
    let mut w = World::empty();
    w.add_object(child);

    assert_eq!(w.objects[0].world_to_object(Tuple4D::origin()), Tuple4D::origin());
}
