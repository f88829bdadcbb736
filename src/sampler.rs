use rand::{ Rng, SeedableRng };
use rand::rngs::StdRng;

use crate::camera::Camera;
use crate::color::Color;
use crate::ray::Ray4D;
use crate::stats::Stats;
use crate::tuple::Tuple4D;
use crate::world::World;

/// Turns a pixel coordinate into a color.
///
/// Samplers are shared by every render thread, so `sample` takes `&self` and
/// any randomness is derived per call.
pub trait Sampler: Sync {
    fn sample(&self, x: usize, y: usize) -> Color;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

/// A fresh RNG for one pixel of a seeded render.
///
/// The stream depends only on `(seed, x, y)`, never on which thread asks or in
/// which order pixels are visited.
pub fn pixel_rng(seed: u64, x: usize, y: usize) -> StdRng {
    let mixed = seed
        ^ (x as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (y as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f);

    StdRng::seed_from_u64(mixed)
}

/// A random point strictly inside the unit disk on the xy-plane, as a vector.
pub fn random_in_unit_disk<R: Rng>(rng: &mut R) -> Tuple4D {
    loop {
        let x: f64 = rng.gen_range(-1.0..1.0);
        let y: f64 = rng.gen_range(-1.0..1.0);

        if x * x + y * y < 1.0 {
            return Tuple4D::vector(x, y, 0.0);
        }
    }
}

/// One ray through the center of each pixel.
pub struct DefaultSampler<'a> {
    world: &'a World,
    camera: &'a Camera,
    stats: &'a Stats,
    depth: usize,
}

impl<'a> DefaultSampler<'a> {
    pub fn new(world: &'a World, camera: &'a Camera, stats: &'a Stats, depth: usize)
        -> DefaultSampler<'a>
    {
        DefaultSampler { world, camera, stats, depth }
    }
}

impl<'a> Sampler for DefaultSampler<'a> {
    fn sample(&self, x: usize, y: usize) -> Color {
        self.stats.record_primary_ray();
        self.world.color_at(&self.camera.ray_for_pixel(x, y), self.depth)
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

/// Depth of field.
///
/// Each sample shoots `samples` rays from points on a disk of radius
/// `aperture` around the camera origin, all aimed at the point
/// `focal_distance` along the pixel's primary ray. Objects at that distance
/// stay sharp, everything else blurs.
pub struct FocalBlurSampler<'a> {
    world: &'a World,
    camera: &'a Camera,
    stats: &'a Stats,
    depth: usize,

    focal_distance: f64,
    aperture: f64,
    samples: usize,
    seed: u64,
}

impl<'a> FocalBlurSampler<'a> {
    pub fn new(world: &'a World, camera: &'a Camera, stats: &'a Stats, depth: usize,
        focal_distance: f64, aperture: f64, samples: usize, seed: u64) -> FocalBlurSampler<'a>
    {
        let samples = if samples == 0 {
            log::warn!("focal blur needs at least one sample per pixel, using 1");
            1
        } else {
            samples
        };

        if samples == 1 && aperture > 0.0 {
            log::warn!("focal blur with a single sample per pixel will be noisy");
        }

        FocalBlurSampler {
            world,
            camera,
            stats,
            depth,
            focal_distance,
            aperture,
            samples,
            seed,
        }
    }

    pub fn focal_distance(&self) -> f64 {
        self.focal_distance
    }

    pub fn aperture(&self) -> f64 {
        self.aperture
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}

impl<'a> Sampler for FocalBlurSampler<'a> {
    fn sample(&self, x: usize, y: usize) -> Color {
        let mut rng = pixel_rng(self.seed, x, y);

        let primary = self.camera.ray_for_pixel(x, y);
        let focal_point = primary.position(self.focal_distance);

        let mut color = Color::black();
        for _ in 0..self.samples {
            let offset = random_in_unit_disk(&mut rng) * self.aperture;
            let origin = primary.origin + offset;
            let direction = (focal_point - origin).normalize();

            // Every lens ray counts as a primary ray
            self.stats.record_primary_ray();
            color += self.world.color_at(&Ray4D::new(origin, direction), self.depth);
        }

        color * (1.0 / self.samples as f64)
    }

    fn name(&self) -> &'static str {
        "focal_blur"
    }
}

/// Antialiasing by averaging rays jittered across the pixel footprint.
pub struct RandomSuperSampler<'a> {
    world: &'a World,
    camera: &'a Camera,
    stats: &'a Stats,
    depth: usize,

    samples: usize,
    seed: u64,
}

impl<'a> RandomSuperSampler<'a> {
    pub fn new(world: &'a World, camera: &'a Camera, stats: &'a Stats, depth: usize,
        samples: usize, seed: u64) -> RandomSuperSampler<'a>
    {
        let samples = if samples == 0 {
            log::warn!("super sampling needs at least one sample per pixel, using 1");
            1
        } else {
            samples
        };

        RandomSuperSampler { world, camera, stats, depth, samples, seed }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}

impl<'a> Sampler for RandomSuperSampler<'a> {
    fn sample(&self, x: usize, y: usize) -> Color {
        let mut rng = pixel_rng(self.seed, x, y);

        let mut color = Color::black();
        for _ in 0..self.samples {
            let fx = x as f64 + rng.gen::<f64>();
            let fy = y as f64 + rng.gen::<f64>();

            self.stats.record_primary_ray();
            color += self.world.color_at(&self.camera.ray_through(fx, fy), self.depth);
        }

        color * (1.0 / self.samples as f64)
    }

    fn name(&self) -> &'static str {
        "random_super"
    }
}

#[cfg(test)]
use crate::consts::RECURSION_DEPTH;
#[cfg(test)]
use crate::matrix::Matrix4D;

#[cfg(test)]
fn looking_at_default_world() -> (World, Camera) {
    let mut camera = Camera::new(11, 11, std::f64::consts::FRAC_PI_2).unwrap();
    camera.set_transform(Matrix4D::view_transform(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    )).unwrap();

    (World::default(), camera)
}

#[test]
fn default_sampler_traces_pixel_center() {
    let (world, camera) = looking_at_default_world();
    let stats = Stats::new();
    let sampler = DefaultSampler::new(&world, &camera, &stats, RECURSION_DEPTH);

    assert_eq!(sampler.sample(5, 5), Color::rgb(0.38066, 0.47583, 0.2855));
    assert_eq!(stats.primary_rays(), 1);
}

#[test]
fn default_sampler_is_bit_identical_across_calls() {
    let (world, camera) = looking_at_default_world();
    let stats = Stats::new();
    let sampler = DefaultSampler::new(&world, &camera, &stats, RECURSION_DEPTH);

    let first = sampler.sample(3, 7);
    let second = sampler.sample(3, 7);

    assert_eq!(first.r.to_bits(), second.r.to_bits());
    assert_eq!(first.g.to_bits(), second.g.to_bits());
    assert_eq!(first.b.to_bits(), second.b.to_bits());
}

#[test]
fn focal_blur_without_aperture_matches_default() {
    let (world, camera) = looking_at_default_world();
    let stats = Stats::new();
    let default = DefaultSampler::new(&world, &camera, &stats, RECURSION_DEPTH);
    let blur = FocalBlurSampler::new(&world, &camera, &stats, RECURSION_DEPTH,
        5.0, 0.0, 8, 42);

    for &(x, y) in [(5, 5), (0, 0), (2, 8), (10, 4)].iter() {
        assert_eq!(blur.sample(x, y), default.sample(x, y));
    }
}

#[test]
fn focal_blur_counts_every_lens_ray() {
    let (world, camera) = looking_at_default_world();
    let stats = Stats::new();
    let blur = FocalBlurSampler::new(&world, &camera, &stats, RECURSION_DEPTH,
        5.0, 0.1, 6, 7);

    blur.sample(5, 5);
    blur.sample(1, 2);

    assert_eq!(stats.primary_rays(), 12);
}

#[test]
fn zero_samples_are_clamped_to_one() {
    let (world, camera) = looking_at_default_world();
    let stats = Stats::new();

    let blur = FocalBlurSampler::new(&world, &camera, &stats, RECURSION_DEPTH,
        5.0, 0.1, 0, 7);
    let sup = RandomSuperSampler::new(&world, &camera, &stats, RECURSION_DEPTH, 0, 7);

    assert_eq!(blur.samples(), 1);
    assert_eq!(sup.samples(), 1);
}

#[test]
fn seeded_samplers_are_reproducible() {
    let (world, camera) = looking_at_default_world();
    let stats = Stats::new();

    let a = FocalBlurSampler::new(&world, &camera, &stats, RECURSION_DEPTH, 4.0, 0.3, 4, 99);
    let b = FocalBlurSampler::new(&world, &camera, &stats, RECURSION_DEPTH, 4.0, 0.3, 4, 99);
    assert_eq!(a.sample(4, 6), b.sample(4, 6));
    assert_eq!(a.sample(4, 6), a.sample(4, 6));

    let c = RandomSuperSampler::new(&world, &camera, &stats, RECURSION_DEPTH, 4, 99);
    let d = RandomSuperSampler::new(&world, &camera, &stats, RECURSION_DEPTH, 4, 99);
    assert_eq!(c.sample(6, 4), d.sample(6, 4));
}

#[test]
fn super_sampling_counts_every_ray() {
    let (world, camera) = looking_at_default_world();
    let stats = Stats::new();
    let sampler = RandomSuperSampler::new(&world, &camera, &stats, RECURSION_DEPTH, 4, 1);

    sampler.sample(5, 5);

    assert_eq!(stats.primary_rays(), 4);
    assert_eq!(sampler.name(), "random_super");
}

#[test]
fn disk_samples_stay_inside_unit_disk() {
    let mut rng = pixel_rng(0x5eed, 3, 4);

    for _ in 0..1000 {
        let v = random_in_unit_disk(&mut rng);

        assert!(v.x * v.x + v.y * v.y < 1.0);
        assert_eq!(v.z, 0.0);
        assert!(v.is_vector());
    }
}

#[test]
fn pixel_rngs_differ_between_pixels() {
    let a: u64 = pixel_rng(1, 0, 1).gen();
    let b: u64 = pixel_rng(1, 1, 0).gen();

    assert_ne!(a, b);
}
