//! Single-qubit operators and basis states.
//!
//! All matrices are 2×2 and all states length-2, in the computational basis
//! `(|0⟩, |1⟩)`.

use ndarray::{Array1, Array2, array, linalg::kron};
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Identity.
pub fn identity() -> Array2<Complex64> {
    array![[ONE, ZERO], [ZERO, ONE]]
}

/// Pauli-X.
pub fn pauli_x() -> Array2<Complex64> {
    array![[ZERO, ONE], [ONE, ZERO]]
}

/// Pauli-Y.
pub fn pauli_y() -> Array2<Complex64> {
    array![[ZERO, -I], [I, ZERO]]
}

/// Pauli-Z. This is the factor placed at every qubit a cost term acts on.
pub fn pauli_z() -> Array2<Complex64> {
    array![[ONE, ZERO], [ZERO, -ONE]]
}

/// Hadamard.
pub fn hadamard() -> Array2<Complex64> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    array![[h, h], [h, -h]]
}

/// T gate, `diag(1, e^{iπ/4})`.
pub fn t_gate() -> Array2<Complex64> {
    array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, FRAC_PI_4)]]
}

/// `|0⟩`.
pub fn zero_state() -> Array1<Complex64> {
    array![ONE, ZERO]
}

/// `|1⟩`.
pub fn one_state() -> Array1<Complex64> {
    array![ZERO, ONE]
}

/// `|+⟩ = (|0⟩ + |1⟩)/√2`.
pub fn plus_state() -> Array1<Complex64> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    array![h, h]
}

/// `|−⟩ = (|0⟩ − |1⟩)/√2`.
pub fn minus_state() -> Array1<Complex64> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    array![h, -h]
}

/// Tensor product of a sequence of matrices, leftmost factor most significant.
///
/// An empty sequence yields the 1×1 identity.
pub fn kron_all<'a>(factors: impl IntoIterator<Item = &'a Array2<Complex64>>) -> Array2<Complex64> {
    factors
        .into_iter()
        .fold(array![[ONE]], |acc, factor| kron(&acc, factor))
}
