use super::context::CommandContext;
use anyhow::Result;
use colored::Colorize;
use molstudio_application::KnowledgeChat;

pub async fn ask(ctx: &CommandContext, query: &str, session: Option<&str>) -> Result<()> {
    let mut chat = KnowledgeChat::new(ctx.gateway.clone());
    if let Some(session_id) = session {
        chat = chat.with_session_id(session_id);
    }

    let reply = chat.send(query).await?;
    ctx.output.emit(&reply, || {
        println!("{}", reply.answer);
        if !reply.sources.is_empty() {
            println!("{} {}", "Sources:".dimmed(), reply.sources.join(", "));
        }
        println!("{} {}", "Session:".dimmed(), reply.session_id);
    })
}

pub async fn explain(ctx: &CommandContext, smiles: &str, info: Option<&str>) -> Result<()> {
    let chat = KnowledgeChat::new(ctx.gateway.clone());
    let description = chat.describe(smiles, info).await?;

    ctx.output.emit(&description, || {
        if description.success {
            println!("{}", description.description);
        } else {
            let reason = description.error.as_deref().unwrap_or("no description");
            println!("{} {}", "✗".red(), reason);
        }
    })
}
