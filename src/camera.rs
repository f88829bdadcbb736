use crate::error::{ Error, Result };
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;

/// A pinhole camera.
///
/// The camera sits at the origin of its own space looking down -Z, with the
/// canvas one unit in front of it. `field_of_view` is the angle spanned by the
/// longer side of the canvas. The transform orients the world relative to the
/// camera, typically a `Matrix4D::view_transform`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    hsize: usize,
    vsize: usize,
    field_of_view: f64,

    half_width: f64,
    half_height: f64,
    pixel_size: f64,

    transform: Matrix4D,
    inverse: Matrix4D,
}

impl Camera {
    /// Fails with `Error::InvalidArgument` when either canvas side is zero.
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64) -> Result<Camera> {
        if hsize == 0 || vsize == 0 {
            return Err(Error::InvalidArgument(
                format!("camera canvas {}x{} has no pixels", hsize, vsize)));
        }

        let half_view = (field_of_view / 2.0).tan();
        let aspect = hsize as f64 / vsize as f64;

        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        let pixel_size = half_width * 2.0 / hsize as f64;

        Ok(Camera {
            hsize,
            vsize,
            field_of_view,
            half_width,
            half_height,
            pixel_size,
            transform: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
        })
    }

    pub fn hsize(&self) -> usize {
        self.hsize
    }

    pub fn vsize(&self) -> usize {
        self.vsize
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    /// Width of one pixel on the canvas, in camera-space units.
    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// Fails with `Error::SingularTransform` when `transform` has no inverse.
    pub fn set_transform(&mut self, transform: Matrix4D) -> Result<()> {
        self.inverse = transform.try_inverse()?;
        self.transform = transform;

        Ok(())
    }

    /// The ray through a point on the canvas given in (fractional) pixel
    /// coordinates, where `(0.0, 0.0)` is the top left corner of the top left
    /// pixel.
    pub fn ray_through(&self, fx: f64, fy: f64) -> Ray4D {
        let world_x = self.half_width - fx * self.pixel_size;
        let world_y = self.half_height - fy * self.pixel_size;

        let pixel = self.inverse * Tuple4D::point(world_x, world_y, -1.0);
        let origin = self.inverse * Tuple4D::origin();
        let direction = (pixel - origin).normalize();

        Ray4D::new(origin, direction)
    }

    /// The ray through the center of pixel `(px, py)`.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray4D {
        self.ray_through(px as f64 + 0.5, py as f64 + 0.5)
    }
}

#[test]
fn pixel_size_for_horizontal_and_vertical_canvas() {
    let half_pi = std::f64::consts::FRAC_PI_2;

    assert!(crate::feq(Camera::new(200, 125, half_pi).unwrap().pixel_size(), 0.01));
    assert!(crate::feq(Camera::new(125, 200, half_pi).unwrap().pixel_size(), 0.01));
}

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, std::f64::consts::FRAC_PI_2).unwrap();
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Tuple4D::origin());
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(201, 101, std::f64::consts::FRAC_PI_2).unwrap();
    let r = c.ray_for_pixel(0, 0);

    assert_eq!(r.origin, Tuple4D::origin());
    assert_eq!(r.direction, Tuple4D::vector(0.66519, 0.33259, -0.66851));
}

#[test]
fn ray_when_camera_transformed() {
    let mut c = Camera::new(201, 101, std::f64::consts::FRAC_PI_2).unwrap();
    c.set_transform(Matrix4D::rotation_y(std::f64::consts::FRAC_PI_4)
        * Matrix4D::translation(0.0, -2.0, 5.0)).unwrap();
    let r = c.ray_for_pixel(100, 50);
    let half = 2.0f64.sqrt() / 2.0;

    assert_eq!(r.origin, Tuple4D::point(0.0, 2.0, -5.0));
    assert_eq!(r.direction, Tuple4D::vector(half, 0.0, -half));
}

#[test]
fn ray_through_matches_pixel_center() {
    let c = Camera::new(11, 7, 1.2).unwrap();

    assert_eq!(c.ray_through(3.5, 2.5), c.ray_for_pixel(3, 2));
}

#[test]
fn singular_camera_transform_is_rejected() {
    let mut c = Camera::new(10, 10, 1.0).unwrap();

    assert!(c.set_transform(Matrix4D::scaling(0.0, 0.0, 0.0)).is_err());
    assert_eq!(c.transform(), &Matrix4D::identity());
}

#[test]
fn camera_without_pixels_is_rejected() {
    assert!(Camera::new(0, 10, 1.0).is_err());
    assert!(Camera::new(10, 0, 1.0).is_err());
}
