//! Render sessions: configuration, per-pixel sampling and iteration drivers.
//!
//! An iteration draws `samples_per_iteration` jittered camera rays for every
//! pixel, adds their radiance to the pixel's cell and then bumps the
//! iteration counter once for the whole buffer.

use crate::accumulator::AccumulationBuffer;
use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::error::{RenderError, RenderResult};
use crate::integrator::{radiance, RouletteConfig};
use crate::{Camera, Color, Scene};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Render configuration, fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Camera rays per pixel in each iteration
    pub samples_per_iteration: u32,
    /// Base seed for the random streams
    pub seed: u64,
    /// Tile edge length for the parallel backend
    pub bucket_size: u32,
    /// Russian roulette policy
    pub roulette: RouletteConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            max_depth: 10,
            samples_per_iteration: 1,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            roulette: RouletteConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Check the configuration before a session is built.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width < 2 || self.height < 2 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution must be at least 2x2, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_iteration == 0 {
            return Err(RenderError::InvalidConfig("samples_per_iteration must be positive".into()));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig("bucket_size must be positive".into()));
        }
        let p = self.roulette.survival_probability;
        if self.roulette.enabled && !(p > 0.0 && p <= 1.0) {
            return Err(RenderError::InvalidConfig(format!(
                "survival probability must be in (0, 1], got {p}"
            )));
        }
        Ok(())
    }

    /// Number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// How an iteration is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// One stream, pixels in row-major order
    Sequential,
    /// Buckets rendered on the rayon pool, then merged
    #[default]
    Parallel,
}

/// Sum the radiance of all samples for pixel (x, y).
///
/// The result is a sum, not an average; the buffer normalizes later.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_iteration {
        let ray = camera.get_pixel_ray(x, y, config.width, config.height, rng);
        pixel_color += radiance(&ray, scene, config.max_depth, &config.roulette, rng);
    }

    pixel_color
}

/// Seed for one bucket of one iteration.
fn bucket_seed(seed: u64, iteration: u32, index: usize) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ ((iteration as u64) << 32) ^ index as u64
}

/// A scene, camera and accumulation buffer driven one iteration at a time.
pub struct RenderSession {
    scene: Scene,
    camera: Camera,
    config: RenderConfig,
    buffer: AccumulationBuffer,
    rng: StdRng,
}

impl RenderSession {
    /// Create a session with a camera matching the configured aspect ratio.
    pub fn new(scene: Scene, camera: Camera, config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        let buffer = AccumulationBuffer::new(config.width, config.height, config.samples_per_iteration);
        let rng = StdRng::seed_from_u64(config.seed);

        log::info!(
            "Render session: {}x{}, {} spp/iteration, max depth {}",
            config.width,
            config.height,
            config.samples_per_iteration,
            config.max_depth
        );

        Ok(Self {
            scene,
            camera,
            config,
            buffer,
            rng,
        })
    }

    /// The Cornell box seen from the standard camera.
    pub fn cornell(config: RenderConfig) -> RenderResult<Self> {
        let camera = Camera::cornell(config.aspect_ratio());
        Self::new(crate::cornell_box(), camera, config)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn buffer(&self) -> &AccumulationBuffer {
        &self.buffer
    }

    /// Number of completed iterations.
    pub fn iterations(&self) -> u32 {
        self.buffer.iterations()
    }

    /// Current radiance estimate per pixel.
    pub fn normalized(&self) -> RenderResult<Vec<Color>> {
        self.buffer.normalized()
    }

    /// Run one iteration on the chosen backend.
    pub fn iterate(&mut self, backend: Backend) -> RenderResult<()> {
        match backend {
            Backend::Sequential => {
                // Take the stream out so it can be borrowed alongside self
                let mut rng = std::mem::replace(&mut self.rng, StdRng::seed_from_u64(0));
                self.iterate_with(&mut rng);
                self.rng = rng;
                Ok(())
            }
            Backend::Parallel => self.iterate_parallel(),
        }
    }

    /// Run one iteration drawing every sample from `rng`, pixel by pixel in
    /// row-major order.
    pub fn iterate_with(&mut self, rng: &mut dyn RngCore) {
        for y in 0..self.config.height {
            for x in 0..self.config.width {
                let color = render_pixel(&self.camera, &self.scene, x, y, &self.config, rng);
                self.buffer.add(x, y, color);
            }
        }
        self.buffer.finish_iteration();
    }

    /// Run one iteration with buckets rendered in parallel.
    ///
    /// Each bucket gets its own stream and a private partial-sum tile; the
    /// tiles are merged after all workers finish.
    pub fn iterate_parallel(&mut self) -> RenderResult<()> {
        let iteration = self.buffer.iterations();
        let buckets = generate_buckets(self.config.width, self.config.height, self.config.bucket_size);

        let results: Vec<BucketResult> = buckets
            .par_iter()
            .map(|bucket| {
                let mut rng = StdRng::seed_from_u64(bucket_seed(self.config.seed, iteration, bucket.index));
                render_bucket(bucket, &self.camera, &self.scene, &self.config, &mut rng)
            })
            .collect();

        for result in &results {
            let b = &result.bucket;
            self.buffer.add_tile(b.x, b.y, b.width, b.height, &result.pixels)?;
        }
        self.buffer.finish_iteration();

        log::debug!("Iteration {} merged {} buckets", iteration + 1, results.len());
        Ok(())
    }
}
