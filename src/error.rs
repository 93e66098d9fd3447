use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error("respuesta no es JSON válido: {raw}")]
    MalformedResponse { raw: String },
    #[error("invalid classification: {0}")]
    InvalidClassification(String),
    #[error("ticket system error: {0}")]
    TicketSystem(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
