//! QAOA for weighted 3-SAT instances.
//!
//! - [`problem`]: instance files and their term groups
//! - [`instance`]: the ansatz, its simulation and the cost function
//! - [`trajectory`]: per-evaluation record of angles and energy
//! - [`experiment`]: one full optimisation run and its report
//! - [`landscape`]: `n_rounds = 1` energy grid
//! - [`params`]: run-parameter files and parameter grids
//!
//! # Example
//!
//! ```rust
//! use qsat_opt::{NelderMeadOptions, OptimiserConfig};
//! use qsat_qaoa::{ProblemInstance, QaoaInstance};
//!
//! let problem = ProblemInstance::from_json_str(r#"{
//!     "n_qubits": 2,
//!     "single_qubit": {"rotations": [[{"coefficient": 1.0, "qubits": [1]}]]},
//!     "double_qubit": {"rotations": [[{"coefficient": 0.5, "qubits": [0, 1]}]]},
//!     "sat_assgn": "11"
//! }"#).unwrap();
//!
//! let mut instance = QaoaInstance::from_problem(&problem, 1, vec![0.0], vec![0.0]).unwrap();
//! instance.build_circuit().unwrap();
//! let config = OptimiserConfig::NelderMead(NelderMeadOptions::default());
//! let result = instance.optimise_circuit(&config).unwrap();
//!
//! assert!(result.optimal_value <= 0.0);
//! assert_eq!(instance.trajectory().len(), instance.classical_iter());
//! ```

pub mod error;
pub mod experiment;
pub mod instance;
pub mod landscape;
pub mod params;
pub mod problem;
pub mod trajectory;

pub use error::{QaoaError, QaoaResult};
pub use experiment::{ExperimentReport, ExperimentRunner, MinEnergyRow};
pub use instance::{QaoaInstance, rotation_angle};
pub use landscape::{LandscapePoint, LandscapeScan};
pub use params::{AngleList, GridEntry, ParamsGrid, RunParams, RunParamsFile};
pub use problem::{ProblemInstance, RotationSet, TermGroups};
pub use trajectory::{Trajectory, TrajectoryRow};
