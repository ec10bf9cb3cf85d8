use super::context::CommandContext;
use anyhow::Result;
use colored::Colorize;
use molstudio_application::DockingService;

pub async fn run(ctx: &CommandContext, smiles: &str, target: &str) -> Result<()> {
    let result = DockingService::new(ctx.gateway.clone())
        .run(smiles, target)
        .await?;

    ctx.output.emit(&result, || {
        println!(
            "{} {:.2} kcal/mol",
            "Binding affinity:".bold(),
            result.affinity
        );
        let breakdown = &result.score_breakdown;
        println!("  van der Waals  {:>8.2}", breakdown.van_der_waals);
        println!("  electrostatic  {:>8.2}", breakdown.electrostatic);
        println!("  desolvation    {:>8.2}", breakdown.desolvation);
    })
}
