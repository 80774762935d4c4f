
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
