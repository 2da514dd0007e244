//! Accumulation buffer and convergence tracking.

use crate::error::{RenderError, RenderResult};
use crate::material::Color;

/// Per-pixel running radiance sums over completed iterations.
///
/// Row 0 is the top of the image. The buffer only ever grows by addition;
/// the normalized view is derived on demand.
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    width: u32,
    height: u32,
    samples_per_iteration: u32,
    cells: Vec<Color>,
    iterations: u32,
}

impl AccumulationBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_iteration: u32) -> Self {
        Self {
            width,
            height,
            samples_per_iteration,
            cells: vec![Color::ZERO; width as usize * height as usize],
            iterations: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Number of completed iterations.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Samples contributing to every pixel so far.
    pub fn total_samples(&self) -> u64 {
        self.iterations as u64 * self.samples_per_iteration as u64
    }

    /// Raw radiance sums in row-major order.
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Get the running sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.cells[self.index(x, y)]
    }

    /// Add a pixel's samples for the current iteration.
    pub fn add(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.cells[i] += color;
    }

    /// Add a rectangular tile of partial sums, row-major within the tile.
    pub fn add_tile(&mut self, x: u32, y: u32, width: u32, height: u32, sums: &[Color]) -> RenderResult<()> {
        let expected = width as usize * height as usize;
        if sums.len() != expected {
            return Err(RenderError::SizeMismatch {
                expected,
                actual: sums.len(),
            });
        }
        if x + width > self.width || y + height > self.height {
            return Err(RenderError::InvalidConfig(format!(
                "tile {}x{} at ({}, {}) exceeds {}x{} buffer",
                width, height, x, y, self.width, self.height
            )));
        }

        for (row, chunk) in sums.chunks(width as usize).enumerate() {
            let start = self.index(x, y + row as u32);
            for (cell, sum) in self.cells[start..start + width as usize].iter_mut().zip(chunk) {
                *cell += *sum;
            }
        }
        Ok(())
    }

    /// Mark one iteration over the whole buffer as complete.
    pub fn finish_iteration(&mut self) {
        self.iterations += 1;
    }

    /// Radiance estimates: each sum divided by the total sample count.
    ///
    /// Fails before the first iteration has completed.
    pub fn normalized(&self) -> RenderResult<Vec<Color>> {
        if self.total_samples() == 0 {
            return Err(RenderError::NoIterations);
        }
        let scale = 1.0 / self.total_samples() as f64;
        Ok(self.cells.iter().map(|c| *c * scale).collect())
    }
}

/// Mean squared Euclidean distance between two normalized buffers.
pub fn residual(a: &[Color], b: &[Color]) -> RenderResult<f64> {
    if a.len() != b.len() {
        return Err(RenderError::SizeMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    if a.is_empty() {
        return Err(RenderError::InvalidConfig("empty buffer".into()));
    }

    let sum: f64 = a.iter().zip(b).map(|(x, y)| (*x - *y).length_squared()).sum();
    Ok(sum / a.len() as f64)
}

/// Tracks the residual between successive normalized views.
///
/// The first observation is compared against an all-black image.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    previous: Vec<Color>,
    history: Vec<f64>,
}

impl ConvergenceMonitor {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            previous: vec![Color::ZERO; pixel_count],
            history: Vec::new(),
        }
    }

    /// Compare `current` with the previously observed view and keep it.
    pub fn observe(&mut self, current: Vec<Color>) -> RenderResult<f64> {
        let value = residual(&current, &self.previous)?;
        if !value.is_finite() {
            log::warn!("Non-finite residual after {} observations", self.history.len());
        }
        self.previous = current;
        self.history.push(value);
        Ok(value)
    }

    /// Residuals recorded so far, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Most recent residual.
    pub fn last(&self) -> Option<f64> {
        self.history.last().copied()
    }
}
