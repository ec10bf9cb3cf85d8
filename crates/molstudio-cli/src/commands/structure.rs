use super::context::CommandContext;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::path::Path;

pub async fn fetch(ctx: &CommandContext, smiles: &str, out: Option<&Path>) -> Result<()> {
    let smiles = smiles.trim();
    if smiles.is_empty() {
        anyhow::bail!("SMILES must not be empty");
    }
    let structure = ctx.gateway.fetch_3d(smiles).await?;

    match out {
        Some(path) => {
            tokio::fs::write(path, &structure.sdf)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.output.emit(
                &json!({ "smiles": smiles, "path": path.display().to_string() }),
                || {
                    println!(
                        "{} {} -> {}",
                        "✓ Wrote".green().bold(),
                        smiles,
                        path.display()
                    )
                },
            )
        }
        None => ctx.output.emit(
            &json!({ "smiles": smiles, "sdf": &structure.sdf }),
            || print!("{}", structure.sdf),
        ),
    }
}
