//! Error types for jobly

use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Error types for the data layer
#[derive(Debug, Error)]
pub enum JoblyError {
    /// User input failed a domain rule
    #[error("{0}")]
    Validation(String),

    /// A partial update was requested with no fields
    #[error("No data")]
    EmptyInput,

    /// Request conflicts with existing data or names an unknown field
    #[error("{0}")]
    BadRequest(String),

    /// Missing or insufficient credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Row not found
    #[error("{0}")]
    NotFound(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl JoblyError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the failure was caused by the client rather than the system.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// HTTP status the web layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::EmptyInput | Self::BadRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::BadRequest(format!("Duplicate value: {}", constraint)),
                "23503" => {
                    return Self::BadRequest(format!("{}: {}", constraint, message));
                }
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
