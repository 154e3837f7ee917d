//! Gate types used by the QAOA ansatz.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard gates with known semantics.
///
/// Rotation angles are concrete radians. The ansatz is rebuilt from scratch
/// for every parameter vector, so there is no symbolic binding step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Rotation around X axis, `exp(-i θ X / 2)`.
    Rx(f64),
    /// Rotation around Z axis, `exp(-i θ Z / 2)`.
    Rz(f64),
    /// Controlled-X (CNOT) gate; operands are `[control, target]`.
    CX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::Rx(_) => "rx",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::H
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::Rx(_)
            | StandardGate::Rz(_) => 1,
            StandardGate::CX => 2,
        }
    }

    /// Rotation angle, if this is a rotation gate.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(theta) | StandardGate::Rz(theta) => Some(*theta),
            _ => None,
        }
    }

    /// Check if this gate carries an angle.
    pub fn is_rotation(&self) -> bool {
        self.angle().is_some()
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle() {
            Some(theta) => write!(f, "{}({})", self.name(), theta),
            None => f.write_str(self.name()),
        }
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: StandardGate,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: gate,
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::Rz(0.3).num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);

        assert!(!StandardGate::H.is_rotation());
        assert_eq!(StandardGate::Rx(PI).angle(), Some(PI));
        assert_eq!(StandardGate::CX.angle(), None);
    }

    #[test]
    fn test_gate_display() {
        assert_eq!(StandardGate::H.to_string(), "h");
        assert_eq!(StandardGate::Rz(-0.5).to_string(), "rz(-0.5)");
    }

    #[test]
    fn test_gate_creation() {
        let h = Gate::standard(StandardGate::H);
        assert_eq!(h.name(), "h");
        assert_eq!(h.num_qubits(), 1);
        assert!(h.label.is_none());

        let mixer = Gate::from(StandardGate::Rx(0.1)).with_label("mixer");
        assert_eq!(mixer.label.as_deref(), Some("mixer"));
    }
}
