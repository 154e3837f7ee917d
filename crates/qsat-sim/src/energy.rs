//! Expectation values of cost Hamiltonians.

use ndarray::{Array2, ArrayView1};
use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// `⟨ψ|H|ψ⟩` as a complex number, computed as `conj(ψ) · (H · ψ)`.
pub fn expectation_value(
    hamiltonian: &Array2<Complex64>,
    psi: ArrayView1<'_, Complex64>,
) -> SimResult<Complex64> {
    let dim = psi.len();
    if hamiltonian.dim() != (dim, dim) {
        return Err(SimError::DimensionMismatch {
            expected: dim,
            got: hamiltonian.nrows().max(hamiltonian.ncols()),
        });
    }
    let h_psi = hamiltonian.dot(&psi);
    Ok(psi.iter().zip(h_psi.iter()).map(|(a, b)| a.conj() * b).sum())
}

/// Real energy `Re(⟨ψ|H|ψ⟩)` of a state under a Hermitian `hamiltonian`.
///
/// The imaginary part is discarded. Debug builds assert it is negligible.
pub fn energy(hamiltonian: &Array2<Complex64>, state: &Statevector) -> SimResult<f64> {
    let value = expectation_value(hamiltonian, state.as_array())?;
    debug_assert!(
        value.im.abs() <= 1e-9 * (1.0 + value.re.abs()),
        "non-negligible imaginary energy {value}"
    );
    Ok(value.re)
}

/// Energy from a precomputed Hamiltonian diagonal, `Σ_i d_i |ψ_i|²`.
///
/// Z-type cost Hamiltonians are diagonal, so this agrees with [`energy`].
pub fn diagonal_energy(diagonal: &[f64], state: &Statevector) -> SimResult<f64> {
    if diagonal.len() != state.dim() {
        return Err(SimError::DimensionMismatch {
            expected: state.dim(),
            got: diagonal.len(),
        });
    }
    Ok(diagonal
        .iter()
        .zip(state.amplitudes())
        .map(|(d, a)| d * a.norm_sqr())
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::{Arity, Term, TermGroup};

    #[test]
    fn test_z_on_basis_states() {
        let mut g = TermGroup::new(Arity::Single, 1, vec![Term::new(1.0, vec![0])]).unwrap();
        let h = g.build_hamiltonian().clone();

        let zero = Statevector::new(1).unwrap();
        assert_eq!(energy(&h, &zero).unwrap(), 1.0);

        let one = Statevector::from_amplitudes(vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)])
            .unwrap();
        assert_eq!(energy(&h, &one).unwrap(), -1.0);

        let plus = Statevector::uniform(1).unwrap();
        assert!(energy(&h, &plus).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_energy_is_idempotent() {
        let mut g = TermGroup::new(
            Arity::Double,
            3,
            vec![Term::new(0.7, vec![0, 2]), Term::new(-0.3, vec![1, 2])],
        )
        .unwrap();
        let h = g.build_hamiltonian().clone();
        let amps: Vec<Complex64> = (0..8)
            .map(|i| Complex64::new(f64::from(i) * 0.1, 0.05 * f64::from(8 - i)))
            .collect();
        let sv = Statevector::from_amplitudes(amps).unwrap();
        let first = energy(&h, &sv).unwrap();
        let second = energy(&h, &sv).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_diagonal_energy_agrees() {
        let mut g = TermGroup::new(Arity::Triple, 3, vec![Term::new(0.25, vec![0, 1, 2])]).unwrap();
        let h = g.build_hamiltonian().clone();
        let sv = Statevector::from_amplitudes(vec![
            Complex64::new(0.5, 0.0),
            Complex64::new(0.0, 0.5),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.5, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(-0.5, 0.0),
            Complex64::new(0.0, 0.0),
        ])
        .unwrap();
        let dense = energy(&h, &sv).unwrap();
        let diag = diagonal_energy(&g.diagonal(), &sv).unwrap();
        assert!((dense - diag).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut g = TermGroup::empty(Arity::Single, 2).unwrap();
        let h = g.build_hamiltonian().clone();
        let sv = Statevector::new(3).unwrap();
        assert!(matches!(
            energy(&h, &sv),
            Err(SimError::DimensionMismatch { expected: 8, got: 4 })
        ));
    }
}
