use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{ClassifierService, TicketService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub classifier: Arc<dyn ClassifierService>,
    pub tickets: Arc<dyn TicketService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        classifier: Arc<dyn ClassifierService>,
        tickets: Arc<dyn TicketService>,
    ) -> Self {
        Self {
            config,
            classifier,
            tickets,
        }
    }
}
