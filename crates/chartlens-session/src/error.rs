use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No chart image uploaded")]
    NoImage,

    #[error(transparent)]
    Model(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
