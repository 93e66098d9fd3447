/// An open GLPI ticket, reduced to the fields the CLI displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSummary {
    pub id: u64,
    pub name: String,
    pub content: String,
}
