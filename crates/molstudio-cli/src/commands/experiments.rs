use super::context::CommandContext;
use super::output::print_record;
use anyhow::Result;
use colored::Colorize;
use molstudio_application::ExperimentWorkbench;
use molstudio_core::experiment::Experiment;

fn workbench(ctx: &CommandContext) -> ExperimentWorkbench {
    ExperimentWorkbench::new(ctx.gateway.clone(), ctx.config.selection.dual_eviction)
}

fn print_experiment(experiment: &Experiment) {
    println!(
        "{}  {}  {} run(s)",
        experiment.id.bold(),
        experiment.name,
        experiment.run_count
    );
    if let Some(description) = &experiment.description {
        println!("  {}", description.dimmed());
    }
}

pub async fn list(ctx: &CommandContext) -> Result<()> {
    let experiments = workbench(ctx).list().await?;
    ctx.output.emit(&experiments, || {
        if experiments.is_empty() {
            println!("No experiments yet.");
        }
        experiments.iter().for_each(print_experiment);
    })
}

pub async fn create(ctx: &CommandContext, name: &str, description: Option<&str>) -> Result<()> {
    let experiment = workbench(ctx).create(name, description).await?;
    ctx.output.emit(&experiment, || {
        println!("{}", "✓ Created".green().bold());
        print_experiment(&experiment);
    })
}

pub async fn runs(ctx: &CommandContext, experiment_id: &str) -> Result<()> {
    let mut bench = workbench(ctx);
    bench.open(experiment_id).await?;

    ctx.output.emit(bench.runs(), || {
        if let Some(experiment) = bench.experiment() {
            print_experiment(experiment);
        }
        for run in bench.runs() {
            print_record(run);
        }
    })
}
