//! Statevector simulation engine.
//!
//! Qubit `q` of an `n`-qubit register is bit `n - 1 - q` of the basis index,
//! so qubit 0 is the most-significant bit. This matches the tensor-product
//! order of [`crate::hamiltonian`] and the left-to-right reading of basis
//! labels such as `"101"`.

use ndarray::ArrayView1;
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use qsat_ir::{Circuit, Instruction, InstructionKind, StandardGate};

use crate::error::{SimError, SimResult};
use crate::hamiltonian::check_qubit_count;

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: u32,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: u32) -> SimResult<Self> {
        check_qubit_count(num_qubits)?;
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// The uniform superposition `2^(-n/2) · (1, 1, …, 1)`.
    pub fn uniform(num_qubits: u32) -> SimResult<Self> {
        check_qubit_count(num_qubits)?;
        let size = 1usize << num_qubits;
        let amp = Complex64::new((size as f64).sqrt().recip(), 0.0);
        Ok(Self {
            amplitudes: vec![amp; size],
            num_qubits,
        })
    }

    /// Wrap raw amplitudes. The length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if !len.is_power_of_two() || len < 2 {
            return Err(SimError::DimensionMismatch {
                expected: len.next_power_of_two().max(2),
                got: len,
            });
        }
        let num_qubits = len.trailing_zeros();
        check_qubit_count(num_qubits)?;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Simulate `circuit` from |0...0⟩, applying every instruction in order.
    pub fn from_circuit(circuit: &Circuit) -> SimResult<Self> {
        let mut sv = Self::new(circuit.num_qubits())?;
        for instruction in circuit.instructions() {
            sv.apply(instruction)?;
        }
        Ok(sv)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Length of the amplitude vector, `2^n`.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// The amplitudes as an `ndarray` view, for operator products.
    pub fn as_array(&self) -> ArrayView1<'_, Complex64> {
        ArrayView1::from(self.amplitudes.as_slice())
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        for q in &instruction.qubits {
            if q.0 >= self.num_qubits {
                return Err(SimError::QubitOutOfRange {
                    qubit: q.0,
                    n_qubits: self.num_qubits,
                });
            }
        }
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let masks: Vec<usize> = instruction.qubits.iter().map(|q| self.mask(q.0)).collect();
                self.apply_standard_gate(&gate.kind, &masks)
            }
            // No effect on the amplitudes.
            InstructionKind::Barrier => Ok(()),
        }
    }

    fn mask(&self, qubit: u32) -> usize {
        1usize << (self.num_qubits - 1 - qubit)
    }

    fn apply_standard_gate(&mut self, gate: &StandardGate, masks: &[usize]) -> SimResult<()> {
        let expected = gate.num_qubits() as usize;
        if masks.len() != expected {
            return Err(SimError::Ir(qsat_ir::IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: masks.len() as u32,
            }));
        }
        match *gate {
            StandardGate::H => self.apply_h(masks[0]),
            StandardGate::X => self.apply_x(masks[0]),
            StandardGate::Y => self.apply_y(masks[0]),
            StandardGate::Z => self.apply_z(masks[0]),
            StandardGate::Rx(theta) => self.apply_rx(masks[0], theta),
            StandardGate::Rz(theta) => self.apply_rz(masks[0], theta),
            StandardGate::CX => self.apply_cx(masks[0], masks[1]),
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, mask: usize) {
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, mask: usize) {
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, mask: usize) {
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, mask: usize) {
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    fn apply_rx(&mut self, mask: usize, theta: f64) {
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, mask: usize, theta: f64) {
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == 0 {
                *amp *= phase_0;
            } else {
                *amp *= phase_1;
            }
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, ctrl_mask: usize, tgt_mask: usize) {
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    // =========================================================================
    // Measurement statistics
    // =========================================================================

    /// Sum of squared amplitude magnitudes. 1 for a normalised state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// `|amplitude|²` for every basis index.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Probability of the basis state named by `label` (qubit 0 first).
    pub fn probability_of(&self, label: &str) -> SimResult<f64> {
        let index = basis_index(label, self.num_qubits)?;
        Ok(self.amplitudes[index].norm_sqr())
    }
}

/// Basis index of a bit-string label whose character `i` is qubit `i`.
pub fn basis_index(label: &str, num_qubits: u32) -> SimResult<usize> {
    let invalid = || SimError::InvalidBitstring {
        label: label.to_string(),
        n_qubits: num_qubits,
    };
    if label.len() != num_qubits as usize {
        return Err(invalid());
    }
    label.chars().try_fold(0usize, |acc, c| match c {
        '0' => Ok(acc << 1),
        '1' => Ok((acc << 1) | 1),
        _ => Err(invalid()),
    })
}

/// Bit-string label of a basis index, qubit 0 first.
pub fn basis_label(index: usize, num_qubits: u32) -> String {
    format!("{:0width$b}", index, width = num_qubits as usize)
}
