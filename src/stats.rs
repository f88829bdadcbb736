use std::sync::atomic::{ AtomicU64, Ordering };

/// Counters for one render session.
///
/// A `Stats` is created per render and borrowed by the sampler and the render
/// driver. Counters only ever go up and are safe to bump from any thread.
#[derive(Debug, Default)]
pub struct Stats {
    primary_rays: AtomicU64,
    pixels: AtomicU64,
}

impl Stats {
    pub fn new() -> Stats {
        Default::default()
    }

    /// Counts one ray cast from the camera into the scene.
    pub fn record_primary_ray(&self) {
        self.primary_rays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pixel(&self) {
        self.pixels.fetch_add(1, Ordering::Relaxed);
    }

    pub fn primary_rays(&self) -> u64 {
        self.primary_rays.load(Ordering::Relaxed)
    }

    pub fn pixels(&self) -> u64 {
        self.pixels.load(Ordering::Relaxed)
    }
}

#[test]
fn counters_start_at_zero() {
    let stats = Stats::new();

    assert_eq!(stats.primary_rays(), 0);
    assert_eq!(stats.pixels(), 0);
}

#[test]
fn counters_are_shared_across_threads() {
    use rayon::prelude::*;

    let stats = Stats::new();

    (0..4).into_par_iter().for_each(|_| {
        for _ in 0..1000 {
            stats.record_primary_ray();
        }
        stats.record_pixel();
    });

    assert_eq!(stats.primary_rays(), 4000);
    assert_eq!(stats.pixels(), 4);
}
