//! CLI argument parsing and file-loading tests.
//!
//! The CLI is a binary crate, so clap parsing is checked on a mirror of its
//! argument structs, and file handling through the library calls the
//! commands make.

// ============================================================================
// Clap argument parsing
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    #[derive(Parser)]
    #[command(name = "qsat")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Run {
            #[arg(short, long)]
            instance: String,
            #[arg(short, long)]
            params: String,
            #[arg(short, long)]
            output: Option<String>,
        },
        Landscape {
            #[arg(short, long)]
            instance: String,
            #[arg(short, long, default_value = "0.1")]
            step: f64,
            #[arg(short, long)]
            output: Option<String>,
        },
        Grid {
            #[arg(short, long)]
            grid: String,
            #[arg(short, long)]
            template: String,
            #[arg(short, long, default_value = "params/ready")]
            output_dir: String,
        },
        Version,
    }

    #[test]
    fn test_parse_run() {
        let cli = TestCli::try_parse_from([
            "qsat", "run", "-i", "inst.json", "-p", "params.yml", "-o", "out.json",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Run {
                instance,
                params,
                output,
            } => {
                assert_eq!(instance, "inst.json");
                assert_eq!(params, "params.yml");
                assert_eq!(output.as_deref(), Some("out.json"));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_requires_params() {
        assert!(TestCli::try_parse_from(["qsat", "run", "-i", "inst.json"]).is_err());
    }

    #[test]
    fn test_parse_landscape_default_step() {
        let cli = TestCli::try_parse_from(["qsat", "landscape", "-i", "inst.json"]).unwrap();
        match cli.command {
            TestCommands::Landscape { step, output, .. } => {
                assert_eq!(step, 0.1);
                assert!(output.is_none());
            }
            _ => panic!("expected landscape"),
        }
    }

    #[test]
    fn test_parse_grid_defaults() {
        let cli =
            TestCli::try_parse_from(["qsat", "grid", "-g", "grid.yml", "-t", "template.yml"])
                .unwrap();
        match cli.command {
            TestCommands::Grid { output_dir, .. } => assert_eq!(output_dir, "params/ready"),
            _ => panic!("expected grid"),
        }
    }

    #[test]
    fn test_verbose_count_is_global() {
        let cli = TestCli::try_parse_from(["qsat", "version", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(TestCli::try_parse_from(["qsat", "submit"]).is_err());
    }
}

// ============================================================================
// File loading
// ============================================================================

mod file_loading {
    use std::fs;

    use qsat_qaoa::{ExperimentRunner, ParamsGrid, ProblemInstance, RunParams, RunParamsFile};

    const INSTANCE: &str = r#"{
        "n_qubits": 2,
        "single_qubit": {"rotations": [[{"coefficient": 1.0, "qubits": [0]}]]},
        "double_qubit": {"rotations": [[{"coefficient": -0.5, "qubits": [0, 1]}]]},
        "triple_qubit": {"rotations": [[]]},
        "sat_assgn": "11"
    }"#;

    const PARAMS: &str = "
classical_optimisation:
  classical_opt_alg: cma-es
  optimisation_opts: {budget: 40, seed: 11}
  n_rounds: 1
  alpha_trial: '[0.5]'
  beta_trial: '[0.1]'
";

    #[test]
    fn test_load_encoded_instance_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instance.json");
        fs::write(&path, serde_json::to_string(&vec![INSTANCE]).unwrap()).unwrap();

        let problem = ProblemInstance::from_file(&path).unwrap();
        assert_eq!(problem.n_qubits, 2);
        assert_eq!(problem.sat_assgn, "11");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProblemInstance::from_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_run_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let params_path = dir.path().join("params.yml");
        fs::write(&params_path, PARAMS).unwrap();

        let problem = ProblemInstance::from_json_str(INSTANCE).unwrap();
        let params = RunParams::from_file(&params_path).unwrap();
        assert_eq!(params.config.budget(), Some(40));

        let report = ExperimentRunner::new(problem, params).run().unwrap();
        assert!(report.classical_iter <= 40);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["algorithm"], "cma-es");
        assert_eq!(json["optimiser_opts"]["classical_opt_alg"], "cma-es");
        assert_eq!(json["pdf"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_grid_files_round_trip_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let grid = ParamsGrid::from_yaml_str(
            "classical_opt_alg: [nelder-mead, bfgs]\nbudget: [25]\nn_rounds: [2]\n",
        )
        .unwrap();
        let template = RunParamsFile::from_yaml_str(PARAMS).unwrap();

        for entry in grid.expand(&template).unwrap() {
            let path = dir.path().join(&entry.file_name);
            fs::write(&path, serde_json::to_string_pretty(&entry.params).unwrap()).unwrap();
            let params = RunParams::from_file(&path).unwrap();
            assert_eq!(params.n_rounds, 2);
            assert_eq!(params.alpha, vec![0.0, 0.0]);
            assert_eq!(params.config.budget(), Some(25));
        }
        assert!(dir.path().join("nelder-mead_25_2.json").exists());
        assert!(dir.path().join("bfgs_25_2.json").exists());
    }
}
