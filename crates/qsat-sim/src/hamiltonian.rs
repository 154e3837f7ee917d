//! Z-type cost Hamiltonians.
//!
//! A cost Hamiltonian is a sum of weighted Z-strings:
//!
//!   H = Σ_k  c_k · Z_{q_k1} ⊗ … ⊗ Z_{q_km}
//!
//! with identity on every qubit a term does not name. Terms are grouped by
//! arity ([`TermGroup`]) because each arity maps to a different gate
//! decomposition in the ansatz; the full cost Hamiltonian is the sum of the
//! groups' matrices.
//!
//! # Example
//!
//! ```rust
//! use qsat_sim::hamiltonian::{Arity, Term, TermGroup};
//!
//! let mut zz = TermGroup::new(Arity::Double, 2, vec![Term::new(0.5, vec![0, 1])]).unwrap();
//! assert!(!zz.is_built());
//! let h = zz.build_hamiltonian();
//! assert_eq!(h.dim(), (4, 4));
//! assert_eq!(h[[0, 0]].re, 0.5);
//! assert_eq!(h[[1, 1]].re, -0.5);
//! ```

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SimError, SimResult};
use crate::operators::{identity, kron_all, pauli_z};

/// Largest register the dense representation accepts.
///
/// A 12-qubit Hamiltonian is 4096×4096 complex entries (256 MiB).
pub const MAX_QUBITS: u32 = 12;

/// A weighted Z-string on a subset of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Real weight.
    pub coefficient: f64,
    /// Qubits carrying a Z factor, in the order the ansatz ladders over them.
    pub qubits: Vec<u32>,
}

impl Term {
    /// Create a new term.
    pub fn new(coefficient: f64, qubits: Vec<u32>) -> Self {
        Self {
            coefficient,
            qubits,
        }
    }

    /// Dense `2^n × 2^n` operator `coefficient · ⊗_i (Z if i ∈ qubits else I)`.
    ///
    /// Qubit 0 is the most-significant factor. Indices are not checked here;
    /// out-of-range qubits are simply absent from the product.
    pub fn operator(&self, n_qubits: u32) -> Array2<Complex64> {
        let (z, id) = (pauli_z(), identity());
        let factors = (0..n_qubits).map(|q| if self.qubits.contains(&q) { &z } else { &id });
        kron_all(factors) * Complex64::new(self.coefficient, 0.0)
    }

    /// Eigenvalue of this term on basis state `index`: `±coefficient`.
    pub fn diagonal_entry(&self, n_qubits: u32, index: usize) -> f64 {
        let parity = self
            .qubits
            .iter()
            .filter(|&&q| q < n_qubits && index & (1usize << (n_qubits - 1 - q)) != 0)
            .count();
        if parity % 2 == 0 {
            self.coefficient
        } else {
            -self.coefficient
        }
    }
}

/// Interaction arity shared by every term of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// One qubit per term.
    Single,
    /// Two qubits per term.
    Double,
    /// Three qubits per term.
    Triple,
}

impl Arity {
    /// Number of qubits per term.
    pub fn num_qubits(self) -> usize {
        match self {
            Arity::Single => 1,
            Arity::Double => 2,
            Arity::Triple => 3,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arity::Single => "single",
            Arity::Double => "double",
            Arity::Triple => "triple",
        })
    }
}

/// Check that a register size fits the dense representation.
pub fn check_qubit_count(n_qubits: u32) -> SimResult<()> {
    if n_qubits == 0 || n_qubits > MAX_QUBITS {
        return Err(SimError::UnsupportedQubitCount {
            n_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

/// Same-arity terms over a register, with a lazily built Hamiltonian.
#[derive(Debug, Clone)]
pub struct TermGroup {
    arity: Arity,
    n_qubits: u32,
    terms: Vec<Term>,
    hamiltonian: Option<Array2<Complex64>>,
}

impl TermGroup {
    /// Create a group after validating every term against `arity` and `n_qubits`.
    pub fn new(arity: Arity, n_qubits: u32, terms: Vec<Term>) -> SimResult<Self> {
        check_qubit_count(n_qubits)?;
        for term in &terms {
            validate_term(term, arity, n_qubits)?;
        }
        Ok(Self {
            arity,
            n_qubits,
            terms,
            hamiltonian: None,
        })
    }

    /// A group with no terms. Its Hamiltonian is the zero matrix.
    pub fn empty(arity: Arity, n_qubits: u32) -> SimResult<Self> {
        Self::new(arity, n_qubits, vec![])
    }

    /// Build the dense Hamiltonian, overwriting any cached matrix.
    pub fn build_hamiltonian(&mut self) -> &Array2<Complex64> {
        let h = assemble(self.arity, &self.terms, self.n_qubits);
        self.hamiltonian.insert(h)
    }

    /// The cached Hamiltonian, if built.
    pub fn hamiltonian(&self) -> Option<&Array2<Complex64>> {
        self.hamiltonian.as_ref()
    }

    /// The cached Hamiltonian, building it first if needed.
    pub fn hamiltonian_or_build(&mut self) -> &Array2<Complex64> {
        let (arity, terms, n_qubits) = (self.arity, &self.terms, self.n_qubits);
        self.hamiltonian
            .get_or_insert_with(|| assemble(arity, terms, n_qubits))
    }

    /// Whether the Hamiltonian has been built.
    pub fn is_built(&self) -> bool {
        self.hamiltonian.is_some()
    }

    /// Diagonal of the group's Hamiltonian, computed directly from the terms.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..1usize << self.n_qubits)
            .map(|idx| {
                self.terms
                    .iter()
                    .map(|t| t.diagonal_entry(self.n_qubits, idx))
                    .sum()
            })
            .collect()
    }

    /// Arity shared by every term.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Register size.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the group has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Running sum of term operators, starting from the zero matrix.
fn assemble(arity: Arity, terms: &[Term], n_qubits: u32) -> Array2<Complex64> {
    let dim = 1usize << n_qubits;
    let mut h = Array2::<Complex64>::zeros((dim, dim));
    for term in terms {
        h += &term.operator(n_qubits);
    }
    tracing::debug!(%arity, n_terms = terms.len(), dim, "built term-group hamiltonian");
    h
}

fn validate_term(term: &Term, arity: Arity, n_qubits: u32) -> SimResult<()> {
    if term.qubits.len() != arity.num_qubits() {
        return Err(SimError::WrongArity {
            expected: arity.num_qubits(),
            got: term.qubits.len(),
        });
    }
    if !term.coefficient.is_finite() {
        return Err(SimError::NonFiniteCoefficient(term.coefficient));
    }
    for (i, &q) in term.qubits.iter().enumerate() {
        if q >= n_qubits {
            return Err(SimError::QubitOutOfRange { qubit: q, n_qubits });
        }
        if term.qubits[..i].contains(&q) {
            return Err(SimError::DuplicateQubit { qubit: q });
        }
    }
    Ok(())
}

/// Sum of the groups' Hamiltonians, building any group that is not yet built.
///
/// All groups must share a register size.
pub fn cost_hamiltonian(groups: &mut [&mut TermGroup]) -> SimResult<Array2<Complex64>> {
    let Some(first) = groups.first() else {
        return Err(SimError::DimensionMismatch {
            expected: 1,
            got: 0,
        });
    };
    let n_qubits = first.n_qubits();
    let dim = 1usize << n_qubits;
    let mut total = Array2::<Complex64>::zeros((dim, dim));
    for group in groups.iter_mut() {
        if group.n_qubits() != n_qubits {
            return Err(SimError::DimensionMismatch {
                expected: dim,
                got: 1usize << group.n_qubits(),
            });
        }
        total += group.hamiltonian_or_build();
    }
    Ok(total)
}
