use crate::color::Color;
use crate::pattern::Pattern;
use crate::tuple::Tuple4D;
use crate::shape::Shape;

/// A point light: a position and the color it emits.
///
/// Light does not fall off with distance; the only thing that stops it is an
/// occluding shape.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Tuple4D,
}

impl PointLight {
    /// Creates a point light. `position` is coerced to a point.
    pub fn new(intensity: Color, mut position: Tuple4D) -> PointLight {
        position.w = 1.0;

        PointLight { intensity, position }
    }
}

/// Surface attributes of a shape.
///
/// `ambient`, `diffuse`, `specular` and `shininess` feed the Phong model;
/// `reflective` and `transparency` are in `0.0..=1.0` and scale the recursive
/// reflection and refraction contributions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub pattern: Option<Pattern>,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,

    pub reflective: f64,
    pub transparency: f64,
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::white(),
            pattern: None,

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,

            reflective: 0.0,
            transparency: 0.0,
            refractive_index: crate::consts::VACUUM_RI,
        }
    }
}

/// Phong shading of one light at one surface point.
///
/// `obj` is the shape being shaded; it is only consulted to evaluate the
/// material's pattern in the shape's own space. A point in shadow receives
/// ambient light only.
pub fn lighting(m: &Material, obj: &Shape, light: &PointLight,
    point: Tuple4D, eyev: Tuple4D, normalv: Tuple4D, in_shadow: bool) -> Color {
    let color = match m.pattern {
        Some(pattern) => pattern.pattern_at_shape(obj, point),
        None => m.color,
    };

    let effective_color = color * light.intensity;
    let ambient = effective_color * m.ambient;

    if in_shadow {
        return ambient;
    }

    let lightv = (light.position - point).normalize();
    let light_dot_normal = lightv.dot(&normalv);

    // Light is behind the surface
    if light_dot_normal < 0.0 {
        return ambient;
    }

    let diffuse = effective_color * m.diffuse * light_dot_normal;

    let reflectv = (-lightv).reflect(&normalv);
    let reflect_dot_eye = reflectv.dot(&eyev);

    let specular = if reflect_dot_eye <= 0.0 {
        Color::black()
    } else {
        light.intensity * m.specular * reflect_dot_eye.powf(m.shininess)
    };

    ambient + diffuse + specular
}

#[cfg(test)]
fn shade_origin(eyev: Tuple4D, light_position: Tuple4D, in_shadow: bool) -> Color {
    let s = Shape::sphere();
    let light = PointLight::new(Color::white(), light_position);

    lighting(&s.material, &s, &light, Tuple4D::origin(), eyev,
        Tuple4D::vector(0.0, 0.0, -1.0), in_shadow)
}

#[test]
fn eye_between_light_and_surface() {
    let res = shade_origin(
        Tuple4D::vector(0.0, 0.0, -1.0),
        Tuple4D::point(0.0, 0.0, -10.0),
        false,
    );

    assert_eq!(res, Color::rgb(1.9, 1.9, 1.9));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let half = 2.0f64.sqrt() / 2.0;
    let res = shade_origin(
        Tuple4D::vector(0.0, half, -half),
        Tuple4D::point(0.0, 0.0, -10.0),
        false,
    );

    assert_eq!(res, Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn eye_opposite_surface_light_offset_45() {
    let res = shade_origin(
        Tuple4D::vector(0.0, 0.0, -1.0),
        Tuple4D::point(0.0, 10.0, -10.0),
        false,
    );

    assert_eq!(res, Color::rgb(0.7364, 0.7364, 0.7364));
}

#[test]
fn eye_in_path_of_reflection() {
    let half = 2.0f64.sqrt() / 2.0;
    let res = shade_origin(
        Tuple4D::vector(0.0, -half, -half),
        Tuple4D::point(0.0, 10.0, -10.0),
        false,
    );

    assert_eq!(res, Color::rgb(1.6364, 1.6364, 1.6364));
}

#[test]
fn light_behind_surface() {
    let res = shade_origin(
        Tuple4D::vector(0.0, 0.0, -1.0),
        Tuple4D::point(0.0, 0.0, 10.0),
        false,
    );

    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn surface_in_shadow_is_ambient_only() {
    let res = shade_origin(
        Tuple4D::vector(0.0, 0.0, -1.0),
        Tuple4D::point(0.0, 0.0, -10.0),
        true,
    );

    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn lighting_with_stripe_pattern() {
    let mut s = Shape::sphere();
    s.material = Material {
        pattern: Some(Pattern::stripe(Color::white(), Color::black())),

        // Ambient only, so the pattern color comes through untouched
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,

        ..Default::default()
    };

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0));

    assert_eq!(
        lighting(&s.material, &s, &light, Tuple4D::point(0.9, 0.0, 0.0), eyev, normalv, false),
        Color::white()
    );
    assert_eq!(
        lighting(&s.material, &s, &light, Tuple4D::point(1.1, 0.0, 0.0), eyev, normalv, false),
        Color::black()
    );
}
