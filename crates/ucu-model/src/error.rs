use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown filter key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
