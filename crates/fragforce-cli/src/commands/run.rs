use crate::cli::FragmentArgs;
use crate::config::builder::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use fragforce::engine::error::EngineError;
use fragforce::engine::gateway::ComputationGateway;
use fragforce::engine::gateway::gaussian::GaussianGateway;
use fragforce::engine::progress::ProgressReporter;
use fragforce::workflows;
use tracing::{info, warn};

pub async fn run(args: FragmentArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app = build_config(&args)?;
    let (system, bonds) = super::load_system(&app)?;

    let gateway = GaussianGateway::from_config(&app.core_config).map_err(EngineError::from)?;
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Computing fragment forces for {} atoms...", system.len());
    info!("Invoking the core fragment workflow...");

    let result = tokio::task::block_in_place(|| {
        workflows::fragment::run(&system, &bonds, &app.core_config, &gateway, &reporter)
    })?;

    println!(
        "✓ {} fragments, {} one-body and {} two-body jobs (total multiplicity {}).",
        result.fragment_count, result.one_body_jobs, result.two_body_jobs, result.total_multiplicity
    );
    println!(
        "  Net force removed: {:16.9} {:16.9} {:16.9} (magnitude {:.9})",
        result.residual.x,
        result.residual.y,
        result.residual.z,
        result.residual.norm()
    );

    if !result.failed_jobs.is_empty() {
        warn!(
            "{} job(s) produced no forces; cached forces were used instead.",
            result.failed_jobs.len()
        );
        println!("Warning: the following job outputs contained no forces:");
        for job in &result.failed_jobs {
            println!("  {}", gateway.result_location(job));
        }
    }

    println!(
        "✓ Forces written to: {}",
        app.core_config.files.output.display()
    );
    Ok(())
}
