use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "FragForce CLI - Fragment-based many-body forces for ab initio molecular dynamics snapshots.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Append logs to a file in addition to the console output.
    /// `run` defaults to `force.log`.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for pair screening and result collection.
    /// Defaults to the number of available logical cores. Does not limit engine
    /// concurrency: the local runner always runs `total-cores / nproc` jobs at once.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the fragment-based forces of one snapshot and write the force file.
    Run(FragmentArgs),
    /// Show the fragments and subsystem jobs of a snapshot without running any job.
    Plan(FragmentArgs),
}

/// Arguments shared by the `run` and `plan` subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct FragmentArgs {
    // --- Input ---
    /// Path to the input XYZ coordinate file [default: comb.xyz].
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Fragmentation ---
    /// Override the two-body screening distance in Angstrom.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Override the orthorhombic cell lengths, e.g. `--cell 12.4,12.4,12.4`.
    #[arg(long, value_name = "A,B,C", value_delimiter = ',')]
    pub cell: Option<Vec<f64>>,

    /// Treat the cell as periodic along every axis with a positive length.
    #[arg(long)]
    pub pbc: bool,

    // --- Electronic structure ---
    /// Override the electronic-structure method.
    #[arg(short, long, value_name = "NAME")]
    pub method: Option<String>,

    /// Override the basis set.
    #[arg(short, long, value_name = "NAME")]
    pub basis: Option<String>,

    /// Override the memory directive of every job (e.g. `400MW`).
    #[arg(long, value_name = "MEM")]
    pub memory: Option<String>,

    /// Override the number of processors per job.
    #[arg(long, value_name = "INT")]
    pub nproc: Option<usize>,

    // --- Execution ---
    /// Override the total number of cores shared by concurrently running jobs.
    #[arg(long, value_name = "INT")]
    pub total_cores: Option<usize>,

    /// Hand all jobs to this submission command instead of running them locally.
    #[arg(long, value_name = "COMMAND")]
    pub delegate: Option<String>,

    // --- Files ---
    /// Override the file the final forces are written to.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override the persistent force cache file.
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Override the directory job inputs and outputs are kept in.
    #[arg(long, value_name = "PATH")]
    pub job_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S qm.nproc=8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
