use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] postboard_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("User ID must be a number, got `{0}`")]
    InvalidUserId(String),
    #[error("User not found for id: {0}")]
    UserNotFound(String),
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("Nothing to update: pass --name and/or --email")]
    NothingToUpdate,
}
