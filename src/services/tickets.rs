use async_trait::async_trait;

use crate::domain::ticket::TicketSummary;
use crate::error::AppResult;

#[async_trait]
pub trait TicketService: Send + Sync {
    /// Fetches up to `limit` tickets and keeps only the open ones.
    async fn fetch_open_tickets(&self, limit: usize) -> AppResult<Vec<TicketSummary>>;
}
