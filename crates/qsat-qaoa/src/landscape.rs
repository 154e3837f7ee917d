//! Single-round energy landscape scans.

use serde::Serialize;
use std::f64::consts::PI;
use tracing::debug;

use crate::error::{QaoaError, QaoaResult};
use crate::instance::QaoaInstance;
use crate::problem::TermGroups;

/// Default grid spacing.
pub const DEFAULT_STEP: f64 = 0.1;

/// Energy at one `(alpha, beta)` point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LandscapePoint {
    /// Phase angle.
    pub alpha: f64,
    /// Mixing angle.
    pub beta: f64,
    /// Energy.
    pub energy: f64,
}

/// Largest number of points per axis a scan accepts.
pub const MAX_AXIS_POINTS: usize = 10_000;

/// Points `start, start + step, ...` strictly below `stop`.
///
/// Fails if `step` is not positive and finite, or if the range would hold
/// more than [`MAX_AXIS_POINTS`] points.
pub fn axis(start: f64, stop: f64, step: f64) -> QaoaResult<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(QaoaError::InvalidStep(step));
    }
    let count = ((stop - start) / step).ceil().max(0.0);
    if count > MAX_AXIS_POINTS as f64 {
        return Err(QaoaError::InvalidStep(step));
    }
    Ok((0..count as usize).map(|i| start + i as f64 * step).collect())
}

/// Scan of `n_rounds = 1` energies over `[-π, π) × [-π, π)`.
#[derive(Debug, Clone)]
pub struct LandscapeScan {
    instance: QaoaInstance,
    values: Vec<f64>,
}

impl LandscapeScan {
    /// Create a scan with the default step.
    pub fn new(groups: TermGroups) -> QaoaResult<Self> {
        Ok(Self {
            instance: QaoaInstance::new(groups, 1, vec![0.0], vec![0.0])?,
            values: axis(-PI, PI, DEFAULT_STEP)?,
        })
    }

    /// Set the grid spacing.
    pub fn with_step(mut self, step: f64) -> QaoaResult<Self> {
        self.values = axis(-PI, PI, step)?;
        Ok(self)
    }

    /// The alpha (and beta) grid values.
    pub fn axis(&self) -> &[f64] {
        &self.values
    }

    /// Number of points the scan evaluates.
    pub fn len(&self) -> usize {
        self.values.len().pow(2)
    }

    /// True if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluate every point, alpha-major.
    pub fn run(&mut self) -> QaoaResult<Vec<LandscapePoint>> {
        self.run_with(|_| {})
    }

    /// Evaluate every point, calling `on_point` after each one.
    pub fn run_with(&mut self, mut on_point: impl FnMut(&LandscapePoint)) -> QaoaResult<Vec<LandscapePoint>> {
        let values = self.values.clone();
        let mut points = Vec::with_capacity(values.len() * values.len());
        for &alpha in &values {
            for &beta in &values {
                let energy = self.instance.evaluate(vec![alpha], vec![beta])?;
                let point = LandscapePoint {
                    alpha,
                    beta,
                    energy,
                };
                debug!(iteration = points.len() + 1, alpha, beta, energy, "landscape");
                on_point(&point);
                points.push(point);
            }
        }
        Ok(points)
    }
}
