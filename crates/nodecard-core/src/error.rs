pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("entity JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid entity: {message}")]
    InvalidEntity { message: String },

    #[error("Invalid card config: {message}")]
    InvalidConfig { message: String },
}
