/// Error types for the Campo core library
use thiserror::Error;

/// Main error type for dashboard data operations.
///
/// Display strings are the messages shown inline in the dashboard, so they
/// are written in the UI language.
#[derive(Error, Debug)]
pub enum CampoError {
    /// A fetch was attempted without a signed-in user
    #[error("El usuario no está autenticado")]
    Unauthenticated,

    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("Error de red: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("El servidor respondió {status} para {endpoint}")]
    Status { status: u16, endpoint: String },

    /// Response body was not the expected JSON
    #[error("Respuesta inválida: {0}")]
    Decode(#[from] serde_json::Error),

    /// Identity provider rejected the request
    #[error("Error de autenticación: {0}")]
    Identity(String),

    /// Missing or invalid configuration
    #[error("Configuración inválida: {0}")]
    Config(String),
}

/// Type alias for Results using CampoError
pub type Result<T> = std::result::Result<T, CampoError>;
