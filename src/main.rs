use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use pixie::color::Color;
use pixie::config::{ RenderConfig, SamplerConfig };
use pixie::consts::GLASS_RI;
use pixie::light::PointLight;
use pixie::matrix::Matrix4D;
use pixie::pattern::Pattern;
use pixie::render::{ render, render_with_threads };
use pixie::shape::Shape;
use pixie::stats::Stats;
use pixie::tuple::Tuple4D;
use pixie::world::World;

/// Renders the built-in demo scene to a PPM image.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON render config; flags below override its values
    #[clap(long)]
    config: Option<PathBuf>,

    #[clap(long)]
    width: Option<usize>,

    #[clap(long)]
    height: Option<usize>,

    /// One of `default`, `focal_blur` or `random_super`
    #[clap(long)]
    sampler: Option<String>,

    /// Lens radius for focal blur
    #[clap(long)]
    aperture: Option<f64>,

    /// Distance from the camera that stays in focus
    #[clap(long)]
    focal_distance: Option<f64>,

    /// Rays per pixel for the stochastic samplers
    #[clap(long)]
    samples: Option<usize>,

    #[clap(long)]
    seed: Option<u64>,

    #[clap(long)]
    threads: Option<usize>,

    #[clap(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn resolve(&self) -> anyhow::Result<RenderConfig> {
        let mut config = match self.config {
            Some(ref path) => RenderConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(ref name) = self.sampler {
            config.sampler = SamplerConfig::from_name(name)?;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(threads) = self.threads {
            config.threads = Some(threads);
        }
        if let Some(ref output) = self.output {
            config.output = output.clone();
        }

        match config.sampler {
            SamplerConfig::FocalBlur { ref mut focal_distance, ref mut aperture, ref mut samples } => {
                if let Some(d) = self.focal_distance {
                    *focal_distance = d;
                }
                if let Some(a) = self.aperture {
                    *aperture = a;
                }
                if let Some(n) = self.samples {
                    *samples = n;
                }
            },

            SamplerConfig::RandomSuper { ref mut samples } => {
                if let Some(n) = self.samples {
                    *samples = n;
                }
            },

            SamplerConfig::Default => {
                if self.aperture.is_some() || self.focal_distance.is_some() || self.samples.is_some() {
                    log::warn!("sampler options are ignored by the default sampler");
                }
            },
        }

        config.validate()?;
        log::debug!("Resolved render config: {:?}", config);

        Ok(config)
    }
}

/// A checkered floor, a glass ball, a die carved out of a cube and a cluster
/// of small spheres.
fn demo_world() -> anyhow::Result<World> {
    let mut world = World::empty();
    world.add_light(PointLight::new(Color::rgb(0.9, 0.9, 0.9), Tuple4D::point(-10.0, 10.0, -10.0)));
    world.add_light(PointLight::new(Color::rgb(0.2, 0.2, 0.25), Tuple4D::point(8.0, 6.0, -4.0)));

    let mut floor = Shape::plane();
    let mut checker = Pattern::checker(Color::rgb(0.9, 0.9, 0.9), Color::rgb(0.15, 0.15, 0.15));
    checker.set_transform(Matrix4D::scaling(0.5, 0.5, 0.5))?;
    floor.material.pattern = Some(checker);
    floor.material.specular = 0.0;
    floor.material.reflective = 0.2;
    world.add_object(floor);

    let mut glass = Shape::sphere();
    glass.set_transform(Matrix4D::translation(-0.6, 1.0, 0.6))?;
    glass.material.color = Color::rgb(0.05, 0.05, 0.1);
    glass.material.diffuse = 0.1;
    glass.material.specular = 1.0;
    glass.material.shininess = 300.0;
    glass.material.reflective = 0.9;
    glass.material.transparency = 0.9;
    glass.material.refractive_index = GLASS_RI;
    world.add_object(glass);

    world.add_object(demo_die()?);
    world.add_object(demo_cluster()?);

    log::debug!("Built demo scene: {} objects, {} lights", world.objects.len(), world.lights.len());

    Ok(world)
}

/// A rounded cube with pips drilled into its top face.
fn demo_die() -> anyhow::Result<Shape> {
    let mut body = Shape::cube();
    body.material.color = Color::rgb(0.85, 0.1, 0.1);
    body.material.specular = 0.4;

    let mut rounding = Shape::sphere();
    rounding.set_transform(Matrix4D::scaling(1.4, 1.4, 1.4))?;
    rounding.material = body.material;

    let rounded = Shape::csg_intersection(body, rounding);

    let mut pips = Shape::group();
    for &(x, z) in [(-0.5, -0.5), (0.0, 0.0), (0.5, 0.5)].iter() {
        let mut pip = Shape::sphere();
        pip.set_transform(Matrix4D::translation(x, 1.0, z) * Matrix4D::scaling(0.2, 0.2, 0.2))?;
        pip.material.color = Color::white();
        pips.add_child(pip)?;
    }

    let mut die = Shape::csg_difference(rounded, pips);
    die.set_transform(Matrix4D::translation(1.5, 0.5, -0.5)
        * Matrix4D::rotation_y(std::f64::consts::PI / 6.0)
        * Matrix4D::scaling(0.5, 0.5, 0.5))?;

    Ok(die)
}

fn demo_cluster() -> anyhow::Result<Shape> {
    let colors = [
        Color::rgb(0.2, 0.6, 0.9),
        Color::rgb(0.3, 0.8, 0.3),
        Color::rgb(0.9, 0.8, 0.2),
    ];

    let mut cluster = Shape::group();
    for (i, color) in colors.iter().enumerate() {
        let angle = i as f64 * 2.0 * std::f64::consts::PI / 3.0;

        let mut ball = Shape::sphere();
        ball.set_transform(Matrix4D::translation(angle.cos() * 0.4, 0.25, angle.sin() * 0.4)
            * Matrix4D::scaling(0.25, 0.25, 0.25))?;
        ball.material.color = *color;
        ball.material.diffuse = 0.7;
        ball.material.specular = 0.3;
        cluster.add_child(ball)?;
    }
    cluster.set_transform(Matrix4D::translation(-2.0, 0.0, -1.0))?;

    Ok(cluster)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.resolve()?;

    let world = demo_world().context("failed to build the demo scene")?;

    let mut camera = config.camera()?;
    camera.set_transform(Matrix4D::view_transform(
        Tuple4D::point(0.0, 1.5, -5.0),
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
    ))?;

    let stats = Stats::new();
    let sampler = config.build_sampler(&world, &camera, &stats);

    let canvas = match config.threads {
        Some(threads) => render_with_threads(&camera, sampler.as_ref(), &stats, threads)?,
        None => render(&camera, sampler.as_ref(), &stats),
    };

    canvas.save(&config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;
    log::info!("Saved render to {}", config.output.display());

    Ok(())
}
