//! Append-only record of cost-function evaluations.

use serde::Serialize;

/// Angles and energy of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryRow {
    /// Phase angles, one per round.
    pub alpha: Vec<f64>,
    /// Mixing angles, one per round.
    pub beta: Vec<f64>,
    /// Measured energy.
    pub energy: f64,
}

/// Evaluations in call order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory {
    rows: Vec<TrajectoryRow>,
}

impl Trajectory {
    /// Create an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an evaluation.
    pub fn push(&mut self, alpha: Vec<f64>, beta: Vec<f64>, energy: f64) {
        self.rows.push(TrajectoryRow {
            alpha,
            beta,
            energy,
        });
    }

    /// All rows.
    pub fn rows(&self) -> &[TrajectoryRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent row.
    pub fn last(&self) -> Option<&TrajectoryRow> {
        self.rows.last()
    }

    /// The row with the lowest energy; the earliest one on ties.
    pub fn min_energy_row(&self) -> Option<&TrajectoryRow> {
        self.rows
            .iter()
            .reduce(|best, row| if row.energy < best.energy { row } else { best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_energy_row() {
        let mut t = Trajectory::new();
        assert!(t.min_energy_row().is_none());
        t.push(vec![0.0], vec![0.0], 0.5);
        t.push(vec![0.1], vec![0.2], -0.3);
        t.push(vec![0.2], vec![0.4], -0.3);
        t.push(vec![0.3], vec![0.6], 0.1);
        let best = t.min_energy_row().unwrap();
        assert_eq!(best.alpha, vec![0.1]);
        assert_eq!(t.len(), 4);
        assert_eq!(t.last().unwrap().energy, 0.1);
    }

    #[test]
    fn test_serializes_as_rows() {
        let mut t = Trajectory::new();
        t.push(vec![1.0], vec![2.0], -1.0);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json[0]["alpha"][0], 1.0);
        assert_eq!(json[0]["energy"], -1.0);
    }
}
