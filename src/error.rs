//! Error types for the contact store.
//!
//! Store failures are `StoreError`. Caller-side input problems are
//! `ValidationError` and never reach the store.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("contact store unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("migration to schema version {version} failed: {source}")]
    Migration {
        version: i32,
        #[source]
        source: rusqlite::Error,
    },

    #[error("schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: i32, supported: i32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Classify the underlying SQLite failure, if there is one.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unavailable { source, .. } => match source.downcast_ref::<rusqlite::Error>() {
                Some(e) => FailureKind::of(e),
                None => FailureKind::DiskIo,
            },
            Self::Migration { source, .. } => FailureKind::of(source),
            Self::Database(e) => FailureKind::of(e),
            Self::Io(_) => FailureKind::DiskIo,
            Self::UnsupportedVersion { .. } => FailureKind::Other,
        }
    }
}

/// Coarse classes of SQLite failure that decide how the store reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The contacts table is gone; recreate it and retry.
    MissingTable,
    /// Another connection holds the lock past the busy timeout.
    Locked,
    /// Disk I/O error or disk full.
    DiskIo,
    /// The file is not a usable database.
    Corrupt,
    Other,
}

impl FailureKind {
    pub fn of(err: &rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, _) = err {
            match e.code {
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => return Self::Locked,
                ErrorCode::SystemIoFailure | ErrorCode::DiskFull => return Self::DiskIo,
                ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase => return Self::Corrupt,
                _ => {}
            }
        }

        // "no such table" surfaces as a generic SQLITE_ERROR; only the message tells it apart
        if err.to_string().contains("no such table") {
            Self::MissingTable
        } else {
            Self::Other
        }
    }

    /// Whether reopening the file from scratch is the only way forward.
    pub fn needs_recreate(self) -> bool {
        matches!(self, Self::Corrupt)
    }
}

/// Rejected caller input, with the field it concerns.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
