use super::context::CommandContext;
use super::output::print_record;
use anyhow::Result;
use colored::Colorize;

pub async fn generate(
    ctx: &CommandContext,
    prompt: &str,
    models: Vec<String>,
    experiment: Option<&str>,
) -> Result<()> {
    let models = ctx.models_or_default(models);
    let state = ctx.state();
    let orchestrator = ctx.orchestrator(&state);

    let record = match experiment {
        Some(experiment_id) => {
            orchestrator
                .generate_in_experiment(experiment_id, prompt, &models)
                .await?
        }
        None => orchestrator.generate(prompt, &models).await?,
    };

    ctx.output.emit(&record, || {
        println!("{}", "✓ Generated".green().bold());
        print_record(&record);
    })
}

/// Loads history first: a record can only be regenerated when it is known locally.
pub async fn regenerate(ctx: &CommandContext, record_id: &str, models: Vec<String>) -> Result<()> {
    let models = ctx.models_or_default(models);
    let state = ctx.state();
    ctx.history(&state).refresh().await?;

    let record = ctx.orchestrator(&state).regenerate(record_id, &models).await?;

    ctx.output.emit(&record, || {
        println!(
            "{} {} from {}",
            "✓ Regenerated".green().bold(),
            record.id,
            record_id
        );
        print_record(&record);
    })
}

pub async fn describe(ctx: &CommandContext, record_id: &str, prompt: &str) -> Result<()> {
    let state = ctx.state();
    ctx.history(&state).refresh().await?;
    ctx.orchestrator(&state)
        .update_description(record_id, prompt)
        .await?;

    let updated = state.read().await.records.get(record_id).cloned();
    ctx.output.emit(&updated, || {
        println!("{} {}", "✓ Updated".green().bold(), record_id);
        if let Some(record) = &updated {
            print_record(record);
        }
    })
}
