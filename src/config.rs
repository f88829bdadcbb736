use std::fs;
use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };

use crate::camera::Camera;
use crate::consts::{ APERTURE, CANVAS_HEIGHT, CANVAS_WIDTH, FIELD_OF_VIEW, FOCAL_BLUR_SAMPLES,
    FOCAL_DISTANCE, OUT_FILE, RECURSION_DEPTH, SEED, SUPER_SAMPLES };
use crate::error::{ Error, Result };
use crate::sampler::{ DefaultSampler, FocalBlurSampler, RandomSuperSampler, Sampler };
use crate::stats::Stats;
use crate::world::World;

fn default_focal_distance() -> f64 {
    FOCAL_DISTANCE
}

fn default_aperture() -> f64 {
    APERTURE
}

fn default_focal_blur_samples() -> usize {
    FOCAL_BLUR_SAMPLES
}

fn default_super_samples() -> usize {
    SUPER_SAMPLES
}

/// Which sampler turns pixels into colors, with its settings.
///
/// In JSON the variant is selected by a `kind` field:
///
/// ```json
/// { "kind": "focal_blur", "focal_distance": 5.0, "aperture": 0.1, "samples": 16 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplerConfig {
    Default,
    FocalBlur {
        #[serde(default = "default_focal_distance")]
        focal_distance: f64,
        #[serde(default = "default_aperture")]
        aperture: f64,
        #[serde(default = "default_focal_blur_samples")]
        samples: usize,
    },
    RandomSuper {
        #[serde(default = "default_super_samples")]
        samples: usize,
    },
}

impl Default for SamplerConfig {
    fn default() -> SamplerConfig {
        SamplerConfig::Default
    }
}

impl SamplerConfig {
    /// The sampler called `name`, with default settings.
    pub fn from_name(name: &str) -> Result<SamplerConfig> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "default" => Ok(SamplerConfig::Default),
            "focal_blur" => Ok(SamplerConfig::FocalBlur {
                focal_distance: FOCAL_DISTANCE,
                aperture: APERTURE,
                samples: FOCAL_BLUR_SAMPLES,
            }),
            "random_super" => Ok(SamplerConfig::RandomSuper { samples: SUPER_SAMPLES }),
            _ => Err(Error::InvalidArgument(format!("unknown sampler `{}`", name))),
        }
    }
}

/// Settings for one render. Missing fields take their defaults from
/// `consts`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub field_of_view: f64,
    pub max_depth: usize,
    pub threads: Option<usize>,
    pub output: PathBuf,
    pub seed: u64,
    pub sampler: SamplerConfig,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            field_of_view: FIELD_OF_VIEW,
            max_depth: RECURSION_DEPTH,
            threads: None,
            output: PathBuf::from(OUT_FILE),
            seed: SEED,
            sampler: SamplerConfig::Default,
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<RenderConfig> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RenderConfig> {
        let path = path.as_ref();
        log::debug!("Loading render config from {}", path.display());

        RenderConfig::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidArgument(
                format!("canvas size {}x{} has no pixels", self.width, self.height)));
        }

        if !(self.field_of_view > 0.0 && self.field_of_view < std::f64::consts::PI) {
            return Err(Error::InvalidArgument(
                format!("field of view {} is outside (0, pi)", self.field_of_view)));
        }

        if self.threads == Some(0) {
            return Err(Error::InvalidArgument("thread count must be at least 1".to_string()));
        }

        if let SamplerConfig::FocalBlur { focal_distance, aperture, .. } = self.sampler {
            if focal_distance <= 0.0 || aperture < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "focal distance {} and aperture {} must be positive",
                    focal_distance, aperture)));
            }
        }

        Ok(())
    }

    /// A camera of the configured size and field of view, without a view
    /// transform.
    pub fn camera(&self) -> Result<Camera> {
        Camera::new(self.width, self.height, self.field_of_view)
    }

    pub fn build_sampler<'a>(&self, world: &'a World, camera: &'a Camera, stats: &'a Stats)
        -> Box<dyn Sampler + 'a>
    {
        match self.sampler {
            SamplerConfig::Default => {
                Box::new(DefaultSampler::new(world, camera, stats, self.max_depth))
            },

            SamplerConfig::FocalBlur { focal_distance, aperture, samples } => {
                Box::new(FocalBlurSampler::new(world, camera, stats, self.max_depth,
                    focal_distance, aperture, samples, self.seed))
            },

            SamplerConfig::RandomSuper { samples } => {
                Box::new(RandomSuperSampler::new(world, camera, stats, self.max_depth,
                    samples, self.seed))
            },
        }
    }
}

#[test]
fn empty_json_gives_defaults() {
    assert_eq!(RenderConfig::from_json("{}").unwrap(), RenderConfig::default());
}

#[test]
fn json_overrides_fields() {
    let config = RenderConfig::from_json(r#"{
        "width": 64,
        "height": 48,
        "threads": 3,
        "output": "die.ppm",
        "sampler": { "kind": "focal_blur", "focal_distance": 5.0, "aperture": 0.1 }
    }"#).unwrap();

    assert_eq!(config.width, 64);
    assert_eq!(config.height, 48);
    assert_eq!(config.threads, Some(3));
    assert_eq!(config.output, PathBuf::from("die.ppm"));
    assert_eq!(config.max_depth, RECURSION_DEPTH);
    assert_eq!(config.sampler, SamplerConfig::FocalBlur {
        focal_distance: 5.0,
        aperture: 0.1,
        samples: FOCAL_BLUR_SAMPLES,
    });
}

#[test]
fn random_super_sampler_from_json() {
    let config = RenderConfig::from_json(
        r#"{ "sampler": { "kind": "random_super", "samples": 9 } }"#).unwrap();

    assert_eq!(config.sampler, SamplerConfig::RandomSuper { samples: 9 });
}

#[test]
fn unknown_sampler_kind_is_a_config_error() {
    match RenderConfig::from_json(r#"{ "sampler": { "kind": "path_tracer" } }"#) {
        Err(Error::Config(_)) => (),
        other => panic!("expected a config error, got {:?}", other),
    }
}

#[test]
fn zero_sized_canvas_is_rejected() {
    match RenderConfig::from_json(r#"{ "width": 0 }"#) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("expected an invalid argument, got {:?}", other),
    }
}

#[test]
fn zero_threads_are_rejected() {
    assert!(RenderConfig::from_json(r#"{ "threads": 0 }"#).is_err());
}

#[test]
fn sampler_names() {
    assert_eq!(SamplerConfig::from_name("default").unwrap(), SamplerConfig::Default);
    assert_eq!(SamplerConfig::from_name("Random-Super").unwrap(),
        SamplerConfig::RandomSuper { samples: SUPER_SAMPLES });
    assert!(matches!(SamplerConfig::from_name("focal_blur").unwrap(),
        SamplerConfig::FocalBlur { .. }));
    assert!(SamplerConfig::from_name("bogus").is_err());
}

#[test]
fn config_builds_the_selected_sampler() {
    let world = World::default();
    let stats = Stats::new();
    let mut config = RenderConfig::default();
    config.width = 4;
    config.height = 4;
    let camera = config.camera().unwrap();

    assert_eq!(config.build_sampler(&world, &camera, &stats).name(), "default");

    config.sampler = SamplerConfig::RandomSuper { samples: 2 };
    assert_eq!(config.build_sampler(&world, &camera, &stats).name(), "random_super");

    config.sampler = SamplerConfig::from_name("focal_blur").unwrap();
    assert_eq!(config.build_sampler(&world, &camera, &stats).name(), "focal_blur");
}

#[test]
fn load_reports_missing_file() {
    match RenderConfig::load("/nonexistent/pixie/render.json") {
        Err(Error::Io(_)) => (),
        other => panic!("expected an IO error, got {:?}", other),
    }
}
