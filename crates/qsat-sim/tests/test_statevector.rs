//! Tests for statevector simulation and energies.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use qsat_ir::{Circuit, QubitId};
use qsat_sim::energy::energy;
use qsat_sim::hamiltonian::{Arity, Term, TermGroup};
use qsat_sim::operators::{plus_state, pauli_z};
use qsat_sim::statevector::{Statevector, basis_label};

#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    Rx(f64, u32),
    Rz(f64, u32),
    CX(u32, u32),
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=6).prop_flat_map(|n| {
        let op = prop_oneof![
            (0..n).prop_map(GateOp::H),
            (-3.2_f64..3.2, 0..n).prop_map(|(t, q)| GateOp::Rx(t, q)),
            (-3.2_f64..3.2, 0..n).prop_map(|(t, q)| GateOp::Rz(t, q)),
            (0..n, 0..n)
                .prop_filter("Control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| GateOp::CX(c, t)),
        ];
        prop::collection::vec(op, 1..=30).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("random", n);
            for op in ops {
                let applied = match op {
                    GateOp::H(q) => circuit.h(QubitId(q)),
                    GateOp::Rx(t, q) => circuit.rx(t, QubitId(q)),
                    GateOp::Rz(t, q) => circuit.rz(t, QubitId(q)),
                    GateOp::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)),
                };
                applied.unwrap();
            }
            circuit
        })
    })
}

// ---------------------------------------------------------------------------
// Closed forms
// ---------------------------------------------------------------------------

#[test]
fn single_qubit_z_after_rz_rx() {
    // H, Rz(θ), Rx(b) on one qubit gives ⟨Z⟩ = sin(θ)·sin(b).
    let (theta, b) = (0.8_f64, 1.1_f64);
    let mut circuit = Circuit::with_size("one", 1);
    circuit
        .h(QubitId(0))
        .unwrap()
        .rz(theta, QubitId(0))
        .unwrap()
        .rx(b, QubitId(0))
        .unwrap();
    let sv = Statevector::from_circuit(&circuit).unwrap();
    let mut g = TermGroup::new(Arity::Single, 1, vec![Term::new(1.0, vec![0])]).unwrap();
    let e = energy(g.build_hamiltonian(), &sv).unwrap();
    assert_abs_diff_eq!(e, theta.sin() * b.sin(), epsilon = 1e-12);
}

#[test]
fn zz_ladder_matches_exponential() {
    // CX · Rz(θ) · CX on |++⟩ must equal exp(-iθ/2 Z⊗Z)|++⟩.
    let theta = 0.9_f64;
    let mut circuit = Circuit::with_size("zz", 2);
    circuit
        .h(QubitId(0))
        .unwrap()
        .h(QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .rz(theta, QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap();
    let sv = Statevector::from_circuit(&circuit).unwrap();
    let z = pauli_z();
    for idx in 0..4usize {
        let parity = z[[idx >> 1, idx >> 1]].re * z[[idx & 1, idx & 1]].re;
        let expected = 0.5 * num_complex::Complex64::from_polar(1.0, -theta / 2.0 * parity);
        assert_abs_diff_eq!(sv.amplitudes()[idx].re, expected.re, epsilon = 1e-12);
        assert_abs_diff_eq!(sv.amplitudes()[idx].im, expected.im, epsilon = 1e-12);
    }
}

#[test]
fn one_qubit_uniform_is_plus_state() {
    let sv = Statevector::uniform(1).unwrap();
    for (a, b) in sv.amplitudes().iter().zip(plus_state().iter()) {
        assert_abs_diff_eq!((a - b).norm(), 0.0, epsilon = 1e-15);
    }
}

#[test]
fn probabilities_labelled_by_basis() {
    let mut circuit = Circuit::with_size("x", 4);
    circuit.x(QubitId(1)).unwrap().x(QubitId(3)).unwrap();
    let sv = Statevector::from_circuit(&circuit).unwrap();
    let probs = sv.probabilities();
    let peak = probs
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(basis_label(peak, 4), "0101");
    assert_abs_diff_eq!(sv.probability_of("0101").unwrap(), 1.0, epsilon = 1e-12);
}

proptest! {
    /// The Hadamard layer yields the uniform superposition for every size.
    #[test]
    fn hadamard_layer_is_uniform(n in 1_u32..=10) {
        let mut circuit = Circuit::with_size("h", n);
        for q in 0..n {
            circuit.h(QubitId(q)).unwrap();
        }
        let sv = Statevector::from_circuit(&circuit).unwrap();
        let amp = (f64::from(n) * -0.5).exp2();
        for a in sv.amplitudes() {
            prop_assert!((a.re - amp).abs() < 1e-12);
            prop_assert!(a.im.abs() < 1e-12);
        }
    }

    /// Gate application preserves the norm and probabilities sum to one.
    #[test]
    fn simulation_preserves_norm(circuit in arb_circuit()) {
        let sv = Statevector::from_circuit(&circuit).unwrap();
        prop_assert!((sv.norm_sqr() - 1.0).abs() < 1e-10);
        let total: f64 = sv.probabilities().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-10);
    }

    /// The success probability of a label is the squared amplitude at its index.
    #[test]
    fn probability_of_label_matches_amplitude(circuit in arb_circuit(), seed in any::<usize>()) {
        let sv = Statevector::from_circuit(&circuit).unwrap();
        let idx = seed % sv.dim();
        let label = basis_label(idx, sv.num_qubits());
        prop_assert_eq!(sv.probability_of(&label).unwrap(), sv.amplitudes()[idx].norm_sqr());
    }
}
