use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileRunnerConfig, FileRunnerKind};
use super::models::{AppConfig, ConnectivitySettings};
use crate::cli::FragmentArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use fragforce::engine::config as core_config;

pub fn build_config(args: &FragmentArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let cutoff = args
        .cutoff
        .or(file_config.cutoff)
        .unwrap_or(defaults.cutoff);
    let cell = match args.cell.as_deref().or(file_config.cell.as_deref()) {
        Some(lengths) => parser::cell_from_slice(lengths).map_err(to_config_error)?,
        None => defaults.cell,
    };
    let pbc = args.pbc || file_config.pbc.unwrap_or(defaults.pbc);

    let runner = merge_runner(args, file_config.runner.take().unwrap_or_default(), &defaults)?;

    let qm_file = file_config.qm.take().unwrap_or_default();
    let qm = core_config::QmConfig {
        method: args
            .method
            .clone()
            .or(qm_file.method)
            .unwrap_or(defaults.method),
        basis: args
            .basis
            .clone()
            .or(qm_file.basis)
            .unwrap_or(defaults.basis),
        memory: args
            .memory
            .clone()
            .or(qm_file.memory)
            .unwrap_or(defaults.memory),
        nproc_per_job: args.nproc.or(qm_file.nproc).unwrap_or(defaults.nproc),
        one_body_keywords: qm_file
            .one_body_keywords
            .unwrap_or(defaults.one_body_keywords),
        two_body_keywords: qm_file
            .two_body_keywords
            .unwrap_or(defaults.two_body_keywords),
        extra_keywords: qm_file.extra_keywords.unwrap_or(defaults.extra_keywords),
        force_unit: qm_file.force_unit.unwrap_or(defaults.force_unit),
    };

    let files = file_config.files.take().unwrap_or_default();
    let connectivity = file_config.connectivity.take().unwrap_or_default();

    let core_config = core_config::FragmentationConfigBuilder::new()
        .cutoff(cutoff)
        .cell(cell)
        .pbc(pbc)
        .qm(qm)
        .runner(runner)
        .job_dir(
            args.job_dir
                .clone()
                .or(files.job_dir)
                .unwrap_or(defaults.job_dir),
        )
        .cache_path(args.cache.clone().or(files.cache).unwrap_or(defaults.cache))
        .output_path(
            args.output
                .clone()
                .or(files.output)
                .unwrap_or(defaults.output),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args
            .input
            .clone()
            .or(file_config.input)
            .unwrap_or(defaults.input),
        connectivity: ConnectivitySettings {
            command: connectivity
                .command
                .unwrap_or(defaults.connectivity_command),
            pdb_path: connectivity.pdb.unwrap_or(defaults.pdb),
        },
        core_config,
    })
}

/// `--delegate` selects the delegate runner with the given command; otherwise the file's
/// `runner.type` decides, and the pool runner is the default.
fn merge_runner(
    args: &FragmentArgs,
    file: FileRunnerConfig,
    defaults: &DefaultsConfig,
) -> Result<core_config::RunnerConfig> {
    if let Some(command) = &args.delegate {
        return Ok(core_config::RunnerConfig::Delegate {
            command: command.clone(),
            job_list: file.job_list.unwrap_or_else(|| defaults.job_list.clone()),
        });
    }

    match file.kind.unwrap_or_default() {
        FileRunnerKind::Pool => Ok(core_config::RunnerConfig::Pool {
            command: file
                .command
                .unwrap_or_else(|| defaults.engine_command.clone()),
            total_cores: args
                .total_cores
                .or(file.total_cores)
                .unwrap_or(defaults.total_cores),
        }),
        FileRunnerKind::Delegate => Ok(core_config::RunnerConfig::Delegate {
            command: file.command.ok_or_else(|| {
                CliError::Config("`runner.command` is required for the delegate runner".to_string())
            })?,
            job_list: file.job_list.unwrap_or_else(|| defaults.job_list.clone()),
        }),
    }
}

fn to_config_error(e: ParseError) -> CliError {
    CliError::Config(e.to_string())
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) = parser::parse_set_value(kv_pair).map_err(to_config_error)?;
        let float = |v: &str| parser::parse_value::<f64>(key, v, "float").map_err(to_config_error);
        let integer =
            |v: &str| parser::parse_value::<usize>(key, v, "integer").map_err(to_config_error);

        match key {
            "input" => config.input = Some(value_str.into()),
            "cutoff" => config.cutoff = Some(float(value_str)?),
            "cell" => {
                config.cell = Some(parser::parse_cell(value_str).map_err(to_config_error)?.to_vec())
            }
            "pbc" => {
                config.pbc = Some(
                    parser::parse_value(key, value_str, "boolean").map_err(to_config_error)?,
                )
            }
            "qm.method" => {
                config.qm.get_or_insert_with(Default::default).method = Some(value_str.to_string())
            }
            "qm.basis" => {
                config.qm.get_or_insert_with(Default::default).basis = Some(value_str.to_string())
            }
            "qm.memory" => {
                config.qm.get_or_insert_with(Default::default).memory = Some(value_str.to_string())
            }
            "qm.nproc" => {
                config.qm.get_or_insert_with(Default::default).nproc = Some(integer(value_str)?)
            }
            "qm.one-body-keywords" => {
                config
                    .qm
                    .get_or_insert_with(Default::default)
                    .one_body_keywords = Some(value_str.to_string())
            }
            "qm.two-body-keywords" => {
                config
                    .qm
                    .get_or_insert_with(Default::default)
                    .two_body_keywords = Some(value_str.to_string())
            }
            "qm.extra-keywords" => {
                config.qm.get_or_insert_with(Default::default).extra_keywords =
                    Some(value_str.to_string())
            }
            "qm.force-unit" => {
                config.qm.get_or_insert_with(Default::default).force_unit =
                    Some(float(value_str)?)
            }
            "runner.type" => {
                config.runner.get_or_insert_with(Default::default).kind =
                    Some(match value_str.trim() {
                        "pool" => FileRunnerKind::Pool,
                        "delegate" => FileRunnerKind::Delegate,
                        other => {
                            return Err(CliError::Config(format!(
                                "Unknown runner type '{}'. Expected 'pool' or 'delegate'.",
                                other
                            )));
                        }
                    })
            }
            "runner.command" => {
                config.runner.get_or_insert_with(Default::default).command =
                    Some(value_str.to_string())
            }
            "runner.total-cores" => {
                config.runner.get_or_insert_with(Default::default).total_cores =
                    Some(integer(value_str)?)
            }
            "runner.job-list" => {
                config.runner.get_or_insert_with(Default::default).job_list =
                    Some(value_str.into())
            }
            "files.job-dir" => {
                config.files.get_or_insert_with(Default::default).job_dir = Some(value_str.into())
            }
            "files.cache" => {
                config.files.get_or_insert_with(Default::default).cache = Some(value_str.into())
            }
            "files.output" => {
                config.files.get_or_insert_with(Default::default).output = Some(value_str.into())
            }
            "connectivity.command" => {
                config.connectivity.get_or_insert_with(Default::default).command =
                    Some(value_str.to_string())
            }
            "connectivity.pdb" => {
                config.connectivity.get_or_insert_with(Default::default).pdb =
                    Some(value_str.into())
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("fragforce.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let app = build_config(&FragmentArgs::default()).unwrap();
        let cfg = app.core_config;
        let defaults = DefaultsConfig::default();

        assert_eq!(app.input_path, PathBuf::from("comb.xyz"));
        assert_eq!(app.connectivity.command, "obabel");
        assert_eq!(app.connectivity.pdb_path, PathBuf::from("comb.pdb"));
        assert_eq!(cfg.cutoff, 3.5);
        assert_eq!(cfg.cell, [0.0; 3]);
        assert!(!cfg.pbc);
        assert_eq!(cfg.qm.method, "mn15");
        assert_eq!(cfg.qm.basis, "6-31g(d)");
        assert_eq!(cfg.qm.memory, "400MW");
        assert_eq!(cfg.qm.nproc_per_job, 4);
        assert_eq!(cfg.qm.force_unit, 1.0);
        assert_eq!(
            cfg.runner,
            core_config::RunnerConfig::Pool {
                command: "g16".to_string(),
                total_cores: defaults.total_cores,
            }
        );
        assert_eq!(cfg.files.job_dir, PathBuf::from("gaussian_files"));
        assert_eq!(cfg.files.cache, PathBuf::from("kbforce.dat"));
        assert_eq!(cfg.files.output, PathBuf::from("force.dat"));
    }

    #[test]
    fn file_values_override_defaults_and_flags_override_file() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            cutoff = 4.0
            cell = [10.0, 10.0, 10.0]

            [qm]
            method = "b3lyp"
            basis = "def2-svp"
            nproc = 2

            [files]
            output = "from-file.dat"
            "#,
        );
        let args = FragmentArgs {
            config: Some(path),
            method: Some("pbe0".to_string()),
            output: Some(PathBuf::from("from-cli.dat")),
            pbc: true,
            ..Default::default()
        };

        let cfg = build_config(&args).unwrap().core_config;

        assert_eq!(cfg.cutoff, 4.0);
        assert_eq!(cfg.cell, [10.0; 3]);
        assert!(cfg.pbc);
        assert_eq!(cfg.qm.method, "pbe0");
        assert_eq!(cfg.qm.basis, "def2-svp");
        assert_eq!(cfg.qm.nproc_per_job, 2);
        assert_eq!(cfg.files.output, PathBuf::from("from-cli.dat"));
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "[qm]\nnproc = 2\n");
        let args = FragmentArgs {
            config: Some(path),
            set_values: vec![
                "qm.nproc=16".to_string(),
                "qm.two-body-keywords=guess=mix".to_string(),
                "cell=8,9,10".to_string(),
                "connectivity.pdb=snap.pdb".to_string(),
            ],
            ..Default::default()
        };

        let app = build_config(&args).unwrap();

        assert_eq!(app.core_config.qm.nproc_per_job, 16);
        assert_eq!(app.core_config.qm.two_body_keywords, "guess=mix");
        assert_eq!(app.core_config.cell, [8.0, 9.0, 10.0]);
        assert_eq!(app.connectivity.pdb_path, PathBuf::from("snap.pdb"));
    }

    #[test]
    fn delegate_runner_comes_from_flag_or_file() {
        let args = FragmentArgs {
            delegate: Some("submit.sh --wait".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_config(&args).unwrap().core_config.runner,
            core_config::RunnerConfig::Delegate {
                command: "submit.sh --wait".to_string(),
                job_list: PathBuf::from("gaussianjobs"),
            }
        );

        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[runner]\ntype = \"delegate\"\ncommand = \"qsub-all\"\njob-list = \"jobs\"\n",
        );
        let args = FragmentArgs {
            config: Some(path),
            ..Default::default()
        };
        assert_eq!(
            build_config(&args).unwrap().core_config.runner,
            core_config::RunnerConfig::Delegate {
                command: "qsub-all".to_string(),
                job_list: PathBuf::from("jobs"),
            }
        );
    }

    #[test]
    fn delegate_runner_requires_a_command() {
        let args = FragmentArgs {
            set_values: vec!["runner.type=delegate".to_string()],
            ..Default::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_values_are_reported() {
        for set in ["cutoff=far", "qm.nproc=-1", "unknown.key=1", "cell=1,2", "novalue"] {
            let args = FragmentArgs {
                set_values: vec![set.to_string()],
                ..Default::default()
            };
            assert!(
                matches!(build_config(&args), Err(CliError::Config(_))),
                "'{}' should be rejected",
                set
            );
        }
    }

    #[test]
    fn core_validation_errors_surface_as_config_errors() {
        let args = FragmentArgs {
            cutoff: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let args = FragmentArgs {
            pbc: true,
            ..Default::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }
}
