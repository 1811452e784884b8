use std::path::PathBuf;

use thiserror::Error;

use crate::models::{BookingId, EventId};

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to open database at {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to initialize database schema: {0}")]
    Schema(#[source] rusqlite::Error),
    #[error("connection task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
#[rustfmt::skip]
pub enum DataError {
    // --------
    // --- Validation errors, raised before anything is written
    // --------

    #[error("{0} is required and cannot be empty")]
    RequiredField(&'static str),
    #[error("invalid date format for Event.date: `{0}`")]
    InvalidDate(String),
    #[error("invalid time format for Event.time: `{0}`")]
    InvalidTime(String),
    #[error("email must be a valid email address, got `{0}`")]
    InvalidEmail(String),
    #[error("an event with slug `{0}` already exists")]
    Uniqueness(String),
    #[error("referenced event {0} does not exist")]
    DanglingReference(EventId),
    #[error("event lookup unavailable: {0}")]
    DependencyUnavailable(String),
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    // --------
    // --- Storage errors
    // --------

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("event {0} not found")]
    EventNotFound(EventId),
    #[error("booking {0} not found")]
    BookingNotFound(BookingId),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type DataResult<T = ()> = Result<T, DataError>;
