use super::context::CommandContext;
use super::output::print_record;
use anyhow::Result;

pub async fn list(ctx: &CommandContext, limit: usize) -> Result<()> {
    let state = ctx.state();
    ctx.history(&state).refresh().await?;

    let state = state.read().await;
    let records: Vec<_> = state.records.records().iter().take(limit).collect();

    ctx.output.emit(&records, || {
        if records.is_empty() {
            println!("No generations yet.");
            return;
        }
        for record in &records {
            print_record(record);
        }
        if state.records.len() > records.len() {
            println!("... {} more", state.records.len() - records.len());
        }
    })
}
