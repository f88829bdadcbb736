use std::time::Instant;

use rayon::prelude::*;

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::error::{ Error, Result };
use crate::sampler::Sampler;
use crate::stats::Stats;

/// Renders every pixel of `camera` with `sampler` on rayon's global pool.
///
/// Rows are handed out to workers as disjoint slices of the canvas, so no
/// pixel is ever written by two threads.
pub fn render<S: Sampler + ?Sized>(camera: &Camera, sampler: &S, stats: &Stats) -> Canvas {
    let (hsize, vsize) = (camera.hsize(), camera.vsize());
    let mut canvas = Canvas::new(hsize, vsize);

    log::info!("Rendering {}x{} with the {} sampler on {} threads",
        hsize, vsize, sampler.name(), rayon::current_num_threads());
    let start = Instant::now();

    canvas.pixels_mut()
        .par_chunks_mut(hsize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = sampler.sample(x, y);
                stats.record_pixel();
            }
        });

    log::info!("Rendered {} pixels with {} primary rays in {:.2?}",
        stats.pixels(), stats.primary_rays(), start.elapsed());

    canvas
}

/// Like `render`, but on a dedicated pool of `threads` workers.
pub fn render_with_threads<S: Sampler + ?Sized>(camera: &Camera, sampler: &S, stats: &Stats,
    threads: usize) -> Result<Canvas>
{
    if threads == 0 {
        return Err(Error::InvalidArgument("thread count must be at least 1".to_string()));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| Error::InvalidArgument(format!("cannot start render threads: {}", e)))?;

    Ok(pool.install(|| render(camera, sampler, stats)))
}

#[cfg(test)]
use crate::color::Color;
#[cfg(test)]
use crate::consts::RECURSION_DEPTH;
#[cfg(test)]
use crate::matrix::Matrix4D;
#[cfg(test)]
use crate::sampler::DefaultSampler;
#[cfg(test)]
use crate::tuple::Tuple4D;
#[cfg(test)]
use crate::world::World;

#[cfg(test)]
fn camera_on_default_world() -> Camera {
    let mut camera = Camera::new(11, 11, std::f64::consts::FRAC_PI_2).unwrap();
    camera.set_transform(Matrix4D::view_transform(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    )).unwrap();

    camera
}

#[test]
fn render_world_with_camera() {
    let world = World::default();
    let camera = camera_on_default_world();
    let stats = Stats::new();
    let sampler = DefaultSampler::new(&world, &camera, &stats, RECURSION_DEPTH);

    let image = render(&camera, &sampler, &stats);

    assert_eq!(image.read_pixel(5, 5), Some(Color::rgb(0.38066, 0.47583, 0.2855)));
}

#[test]
fn render_counts_every_pixel() {
    let world = World::default();
    let camera = camera_on_default_world();
    let stats = Stats::new();
    let sampler = DefaultSampler::new(&world, &camera, &stats, RECURSION_DEPTH);

    render(&camera, &sampler, &stats);

    assert_eq!(stats.pixels(), 121);
    assert_eq!(stats.primary_rays(), 121);
}

#[test]
fn render_on_dedicated_pool_matches_global_pool() {
    let world = World::default();
    let camera = camera_on_default_world();
    let stats = Stats::new();
    let sampler = DefaultSampler::new(&world, &camera, &stats, RECURSION_DEPTH);

    let global = render(&camera, &sampler, &stats);
    let pooled = render_with_threads(&camera, &sampler, &stats, 2).unwrap();

    assert_eq!(global, pooled);
}

#[test]
fn zero_render_threads_are_rejected() {
    let world = World::default();
    let camera = camera_on_default_world();
    let stats = Stats::new();
    let sampler = DefaultSampler::new(&world, &camera, &stats, RECURSION_DEPTH);

    assert!(render_with_threads(&camera, &sampler, &stats, 0).is_err());
}
