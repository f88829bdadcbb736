pub mod consts;
pub mod error;

pub mod tuple;
pub mod matrix;
pub mod ray;
pub mod color;
pub mod bounds;

pub mod pattern;
pub mod light;
pub mod intersect;
pub mod csg;
pub mod shape;
pub mod world;
pub mod camera;

pub mod stats;
pub mod sampler;
pub mod canvas;
pub mod render;
pub mod config;

pub use error::{ Error, Result };

use consts::FEQ_EPSILON;

/// Approximate float equality used by every comparable record in the crate.
///
/// Identical values compare equal even when they are infinite.
pub fn feq(left: f64, right: f64) -> bool {
    left == right || (left - right).abs() < FEQ_EPSILON
}
