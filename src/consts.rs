// Floating point comparisons and surface offsets
pub const FEQ_EPSILON: f64 = 0.0001;

// Maximum depth for reflected and refracted rays
pub const RECURSION_DEPTH: usize = 5;

// Render defaults
pub const CANVAS_WIDTH: usize = 320;
pub const CANVAS_HEIGHT: usize = 240;
pub const FIELD_OF_VIEW: f64 = std::f64::consts::FRAC_PI_3;
pub const OUT_FILE: &str = "./out.ppm";
pub const SEED: u64 = 0x5eed;

// Sampler defaults
pub const FOCAL_DISTANCE: f64 = 1.0;
pub const APERTURE: f64 = 1.0;
pub const FOCAL_BLUR_SAMPLES: usize = 8;
pub const SUPER_SAMPLES: usize = 4;

// Common refraction indices
pub const VACUUM_RI: f64 = 1.0;
pub const GLASS_RI: f64 = 1.52;
