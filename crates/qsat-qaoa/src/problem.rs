//! Weighted 3-SAT problem instances.
//!
//! An instance lists Z-string terms by arity plus a known satisfying
//! assignment. On disk it is either a bare JSON object or a one-element JSON
//! array whose element is the object encoded as a string.

use serde::{Deserialize, Serialize};
use std::path::Path;

use qsat_sim::{Arity, Term, TermGroup, basis_index};

use crate::error::{QaoaError, QaoaResult};

/// Terms of one arity. Only the first entry of `rotations` is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationSet {
    /// Term lists; the first is the active one.
    #[serde(default)]
    pub rotations: Vec<Vec<Term>>,
}

impl RotationSet {
    /// A set holding a single term list.
    pub fn new(terms: Vec<Term>) -> Self {
        Self {
            rotations: vec![terms],
        }
    }

    /// The active term list, empty if none is given.
    pub fn terms(&self) -> &[Term] {
        self.rotations.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A parsed problem instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInstance {
    /// Register size.
    pub n_qubits: u32,
    /// One-qubit terms.
    #[serde(default)]
    pub single_qubit: RotationSet,
    /// Two-qubit terms.
    #[serde(default)]
    pub double_qubit: RotationSet,
    /// Three-qubit terms.
    #[serde(default)]
    pub triple_qubit: RotationSet,
    /// Known satisfying assignment, qubit 0 first.
    pub sat_assgn: String,
}

/// The three term groups of an instance.
#[derive(Debug, Clone)]
pub struct TermGroups {
    /// One-qubit terms.
    pub single: TermGroup,
    /// Two-qubit terms.
    pub double: TermGroup,
    /// Three-qubit terms.
    pub triple: TermGroup,
}

impl TermGroups {
    /// Register size shared by the groups.
    pub fn n_qubits(&self) -> u32 {
        self.single.n_qubits()
    }
}

impl ProblemInstance {
    /// Parse either on-disk layout.
    pub fn from_json_str(s: &str) -> QaoaResult<Self> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::from_json_value(value)
    }

    /// Interpret an already-parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> QaoaResult<Self> {
        let instance: Self = match value {
            serde_json::Value::Array(mut items) => {
                if items.len() != 1 {
                    return Err(QaoaError::InvalidParams(format!(
                        "instance array must hold exactly one encoded instance, found {}",
                        items.len()
                    )));
                }
                match items.remove(0) {
                    serde_json::Value::String(encoded) => serde_json::from_str(&encoded)?,
                    other => serde_json::from_value(other)?,
                }
            }
            other => serde_json::from_value(other)?,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Load an instance file.
    pub fn from_file(path: impl AsRef<Path>) -> QaoaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Check the satisfying assignment and every term against the register.
    pub fn validate(&self) -> QaoaResult<()> {
        basis_index(&self.sat_assgn, self.n_qubits)?;
        self.term_groups()?;
        Ok(())
    }

    /// Build the three term groups.
    pub fn term_groups(&self) -> QaoaResult<TermGroups> {
        Ok(TermGroups {
            single: TermGroup::new(Arity::Single, self.n_qubits, self.single_qubit.terms().to_vec())?,
            double: TermGroup::new(Arity::Double, self.n_qubits, self.double_qubit.terms().to_vec())?,
            triple: TermGroup::new(Arity::Triple, self.n_qubits, self.triple_qubit.terms().to_vec())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "n_qubits": 3,
        "single_qubit": {"rotations": [[{"coefficient": 1.0, "qubits": [0]}]]},
        "double_qubit": {"rotations": [[{"coefficient": 0.5, "qubits": [0, 1]}]]},
        "triple_qubit": {"rotations": [[{"coefficient": 0.25, "qubits": [0, 1, 2]}]]},
        "sat_assgn": "101"
    }"#;

    #[test]
    fn test_parse_bare_object() {
        let p = ProblemInstance::from_json_str(SAMPLE).unwrap();
        assert_eq!(p.n_qubits, 3);
        assert_eq!(p.double_qubit.terms()[0].qubits, vec![0, 1]);
        assert_eq!(p.sat_assgn, "101");
    }

    #[test]
    fn test_built_in_code_matches_parsed() {
        let built = ProblemInstance {
            n_qubits: 3,
            single_qubit: RotationSet::new(vec![Term::new(1.0, vec![0])]),
            double_qubit: RotationSet::new(vec![Term::new(0.5, vec![0, 1])]),
            triple_qubit: RotationSet::new(vec![Term::new(0.25, vec![0, 1, 2])]),
            sat_assgn: "101".to_string(),
        };
        assert_eq!(built, ProblemInstance::from_json_str(SAMPLE).unwrap());
        assert_eq!(built.term_groups().unwrap().triple.terms().len(), 1);
    }

    #[test]
    fn test_parse_encoded_array() {
        let wrapped = serde_json::to_string(&vec![SAMPLE.to_string()]).unwrap();
        let p = ProblemInstance::from_json_str(&wrapped).unwrap();
        assert_eq!(p, ProblemInstance::from_json_str(SAMPLE).unwrap());
    }

    #[test]
    fn test_missing_groups_are_empty() {
        let p = ProblemInstance::from_json_str(r#"{"n_qubits": 2, "sat_assgn": "01"}"#).unwrap();
        let groups = p.term_groups().unwrap();
        assert!(groups.single.is_empty() && groups.double.is_empty() && groups.triple.is_empty());
    }

    #[test]
    fn test_bad_assignment_rejected() {
        let bad = SAMPLE.replace("\"101\"", "\"10\"");
        assert!(matches!(
            ProblemInstance::from_json_str(&bad),
            Err(QaoaError::Sim(_))
        ));
    }

    #[test]
    fn test_out_of_range_qubit_rejected() {
        let bad = SAMPLE.replace("[0, 1, 2]", "[0, 1, 3]");
        assert!(ProblemInstance::from_json_str(&bad).is_err());
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let bad = SAMPLE.replace("\"qubits\": [0, 1]}", "\"qubits\": [0]}");
        assert!(ProblemInstance::from_json_str(&bad).is_err());
    }
}
