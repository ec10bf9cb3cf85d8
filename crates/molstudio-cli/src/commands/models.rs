use super::context::CommandContext;
use anyhow::Result;
use colored::Colorize;
use molstudio_core::molecule::ModelCatalog;
use molstudio_core::simulation::docking_targets;
use serde_json::json;

pub fn models(ctx: &CommandContext) -> Result<()> {
    let catalog = ModelCatalog::builtin();
    let defaults = &ctx.config.models.default;

    ctx.output.emit(catalog.models(), || {
        for model in catalog.models() {
            let marker = if defaults.contains(&model.id) { "*" } else { " " };
            println!(
                "{} {:<12} {:<10} {}",
                marker.green(),
                model.id.bold(),
                model.name,
                model.description.dimmed()
            );
        }
    })
}

pub fn targets(ctx: &CommandContext) -> Result<()> {
    let targets: Vec<_> = docking_targets()
        .iter()
        .map(|t| json!({ "id": t.id, "pdb_id": t.pdb_id, "name": t.name }))
        .collect();

    ctx.output.emit(&targets, || {
        for target in docking_targets() {
            println!("{:<16} {}  {}", target.id.bold(), target.pdb_id, target.name);
        }
    })
}
