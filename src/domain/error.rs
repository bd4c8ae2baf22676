// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Package error: {0}")]
    PackageError(String),
    #[error("Config error: {0}")]
    ConfigError(String),
}
