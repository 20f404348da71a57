use crate::cli::FragmentArgs;
use crate::config::builder::build_config;
use crate::error::Result;
use fragforce::workflows::fragment::{self, FragmentationPlan};
use tracing::info;

pub async fn run(args: FragmentArgs) -> Result<()> {
    let app = build_config(&args)?;
    let (system, bonds) = super::load_system(&app)?;

    info!("Computing fragmentation plan...");
    let plan = fragment::plan(&system, &bonds, &app.core_config)?;
    print!("{}", render_plan(&plan));
    Ok(())
}

fn render_plan(plan: &FragmentationPlan) -> String {
    let mut out = format!(
        "{} atoms, {} fragments, total multiplicity {}\n",
        plan.system.len(),
        plan.fragments.len(),
        plan.total_multiplicity
    );
    for job in plan.jobs.iter() {
        let atoms = job
            .atom_indices()
            .map(|i| (i + 1).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            "{:<10} multiplicity {:<3} atoms {}\n",
            job.name, job.multiplicity, atoms
        ));
    }
    out
}
