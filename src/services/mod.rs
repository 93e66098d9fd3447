pub mod classifier;
pub mod tickets;

pub use classifier::ClassifierService;
pub use tickets::TicketService;
