//! Objective wrapper shared by every optimiser.

use crate::OptimizationResult;

/// Counts evaluations, records the value history and remembers the best point.
///
/// NaN objective values are recorded as `+∞` so they never win a comparison.
pub(crate) struct Tracked<F> {
    objective: F,
    limit: Option<usize>,
    history: Vec<f64>,
    best: Option<(Vec<f64>, f64)>,
}

impl<F> Tracked<F> {
    pub(crate) fn new(objective: F, limit: Option<usize>) -> Self {
        Self {
            objective,
            limit,
            history: Vec::new(),
            best: None,
        }
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.history.len()
    }

    /// True once the evaluation budget is spent.
    pub(crate) fn exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.history.len() >= limit)
    }

    pub(crate) fn call<E>(&mut self, x: &[f64]) -> Result<f64, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let raw = (self.objective)(x)?;
        let value = if raw.is_nan() { f64::INFINITY } else { raw };
        self.history.push(value);
        if self.best.as_ref().is_none_or(|(_, best)| value < *best) {
            self.best = Some((x.to_vec(), value));
        }
        Ok(value)
    }

    /// Package the run. `fallback` is used only if nothing was evaluated.
    pub(crate) fn finish(
        self,
        fallback: Vec<f64>,
        num_iterations: usize,
        converged: bool,
    ) -> OptimizationResult {
        let (optimal_params, optimal_value) = self.best.unwrap_or((fallback, f64::INFINITY));
        OptimizationResult {
            optimal_params,
            optimal_value,
            num_evaluations: self.history.len(),
            num_iterations,
            history: self.history,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_best_and_budget() {
        let mut t = Tracked::new(|x: &[f64]| Ok::<_, ()>(x[0]), Some(3));
        t.call(&[2.0]).unwrap();
        t.call(&[-1.0]).unwrap();
        assert!(!t.exhausted());
        t.call(&[5.0]).unwrap();
        assert!(t.exhausted());
        let res = t.finish(vec![0.0], 1, false);
        assert_eq!(res.optimal_params, vec![-1.0]);
        assert_eq!(res.optimal_value, -1.0);
        assert_eq!(res.history, vec![2.0, -1.0, 5.0]);
        assert_eq!(res.num_evaluations, 3);
    }

    #[test]
    fn test_nan_never_best() {
        let mut t = Tracked::new(
            |x: &[f64]| Ok::<_, ()>(if x[0] > 0.0 { f64::NAN } else { 1.0 }),
            None,
        );
        t.call(&[1.0]).unwrap();
        t.call(&[-1.0]).unwrap();
        let res = t.finish(vec![], 0, false);
        assert_eq!(res.optimal_params, vec![-1.0]);
        assert_eq!(res.history[0], f64::INFINITY);
    }

    #[test]
    fn test_error_propagates() {
        let mut t = Tracked::new(|_: &[f64]| Err::<f64, _>("boom"), None);
        assert_eq!(t.call(&[0.0]), Err("boom"));
        assert_eq!(t.evaluations(), 0);
    }
}
