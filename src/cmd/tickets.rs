use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct TicketsArgs {
    /// Maximum number of tickets to request from GLPI.
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,
}

pub async fn run(ctx: &AppContext, args: TicketsArgs) -> AppResult<()> {
    let tickets = ctx.tickets.fetch_open_tickets(args.limit).await?;

    if tickets.is_empty() {
        println!("No hay tickets abiertos.");
        return Ok(());
    }

    println!("Tickets abiertos ({}):", tickets.len());
    for ticket in &tickets {
        println!("#{} {}", ticket.id, ticket.name);
        if !ticket.content.is_empty() {
            println!("    {}", ticket.content);
        }
    }

    Ok(())
}
