use async_trait::async_trait;

use crate::domain::classification::Classification;
use crate::error::AppResult;

#[async_trait]
pub trait ClassifierService: Send + Sync {
    /// Classifies one task description into a validated record.
    async fn classify(&self, tarea: &str) -> AppResult<Classification>;
}
