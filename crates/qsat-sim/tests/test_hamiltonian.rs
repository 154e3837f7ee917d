//! Tests for term groups and cost Hamiltonians.

use approx::assert_abs_diff_eq;
use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use qsat_sim::hamiltonian::{Arity, Term, TermGroup, cost_hamiltonian};
use qsat_sim::operators::{identity, kron_all, pauli_z};

fn arity_strategy() -> impl Strategy<Value = Arity> {
    prop_oneof![Just(Arity::Single), Just(Arity::Double), Just(Arity::Triple)]
}

/// A random group of distinct-qubit terms over `n_qubits ≥ arity`.
fn arb_group() -> impl Strategy<Value = TermGroup> {
    (arity_strategy(), 1_u32..=10)
        .prop_filter("register must fit the arity", |(arity, n)| {
            *n as usize >= arity.num_qubits()
        })
        .prop_flat_map(|(arity, n)| {
            let term = (
                -2.0_f64..2.0,
                Just((0..n).collect::<Vec<u32>>()).prop_shuffle(),
            )
                .prop_map(move |(c, qubits)| Term::new(c, qubits[..arity.num_qubits()].to_vec()));
            (Just(arity), Just(n), prop::collection::vec(term, 0..=4))
        })
        .prop_map(|(arity, n, terms)| TermGroup::new(arity, n, terms).unwrap())
}

fn max_hermitian_defect(h: &Array2<Complex64>) -> f64 {
    let n = h.nrows();
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in i..n {
            worst = worst.max((h[[i, j]] - h[[j, i]].conj()).norm());
        }
    }
    worst
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn term_operator_matches_explicit_kron() {
    let term = Term::new(0.5, vec![0, 2]);
    let expected = kron_all([&pauli_z(), &identity(), &pauli_z()]) * Complex64::new(0.5, 0.0);
    assert_eq!(term.operator(3), expected);
}

#[test]
fn term_qubit_order_does_not_change_operator() {
    assert_eq!(
        Term::new(1.0, vec![2, 0, 1]).operator(3),
        Term::new(1.0, vec![0, 1, 2]).operator(3)
    );
}

#[test]
fn group_accessors() {
    let g = TermGroup::new(
        Arity::Double,
        4,
        vec![Term::new(1.0, vec![0, 1]), Term::new(-1.0, vec![2, 3])],
    )
    .unwrap();
    assert_eq!(g.arity(), Arity::Double);
    assert_eq!(g.n_qubits(), 4);
    assert_eq!(g.len(), 2);
    assert_eq!(g.terms()[1].qubits, vec![2, 3]);
}

// ---------------------------------------------------------------------------
// Cost Hamiltonian
// ---------------------------------------------------------------------------

#[test]
fn three_group_cost_hamiltonian_diagonal() {
    let mut single = TermGroup::new(Arity::Single, 3, vec![Term::new(1.0, vec![0])]).unwrap();
    let mut double = TermGroup::new(Arity::Double, 3, vec![Term::new(0.5, vec![0, 1])]).unwrap();
    let mut triple =
        TermGroup::new(Arity::Triple, 3, vec![Term::new(0.25, vec![0, 1, 2])]).unwrap();
    let h = cost_hamiltonian(&mut [&mut single, &mut double, &mut triple]).unwrap();

    for idx in 0..8usize {
        let z = |q: u32| if idx & (1 << (2 - q)) == 0 { 1.0 } else { -1.0 };
        let expected = z(0) + 0.5 * z(0) * z(1) + 0.25 * z(0) * z(1) * z(2);
        assert_abs_diff_eq!(h[[idx, idx]].re, expected, epsilon = 1e-12);
        for col in 0..8usize {
            if col != idx {
                assert_eq!(h[[idx, col]].norm(), 0.0);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Every term-group Hamiltonian is Hermitian with zero imaginary part.
    #[test]
    fn hamiltonian_is_hermitian_and_real(mut group in arb_group()) {
        let dim = 1usize << group.n_qubits();
        let h = group.build_hamiltonian();
        prop_assert_eq!(h.dim(), (dim, dim));
        prop_assert!(max_hermitian_defect(h) < 1e-12);
        prop_assert!(h.iter().all(|c| c.im.abs() < 1e-12));
    }

    /// The dense matrix is diagonal and its diagonal matches the term parity sum.
    #[test]
    fn hamiltonian_diagonal_matches_terms(mut group in arb_group()) {
        let diag = group.diagonal();
        let h = group.build_hamiltonian();
        for (i, d) in diag.iter().enumerate() {
            prop_assert!((h[[i, i]].re - d).abs() < 1e-12);
        }
    }
}
