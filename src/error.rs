use thiserror::Error;

/// Rejected poll creation input. Surfaced inline by the creation form; an
/// invalid poll is never persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("A poll needs at least 2 options, got {found}")]
    TooFewOptions { found: usize },

    #[error("Option {index} must not be empty")]
    EmptyOption { index: usize },
}

/// Rejected vote attempt. A rejected vote leaves the poll unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    #[error("Please enter your name")]
    EmptyName,

    #[error("Please select an option")]
    NoSelection,

    #[error("You have already voted")]
    DuplicateVoter,
}

/// Failure against the persistence layer. Write failures are reported to the
/// caller with no retry; read failures degrade to an absent record.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
