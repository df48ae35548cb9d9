use std::fmt;

use thiserror::Error;

/// Remote operations, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

/// Rejected before anything is sent to the remote resource.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("note title is empty")]
    EmptyTitle,
    #[error("note description is empty")]
    EmptyDescription,
}

#[derive(Debug, Error)]
pub enum RemoteCause {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("remote answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
#[error("{operation} failed: {cause}")]
pub struct RemoteError {
    pub operation: Operation,
    #[source]
    pub cause: RemoteCause,
}

impl RemoteError {
    pub fn new(operation: Operation, cause: RemoteCause) -> Self {
        RemoteError { operation, cause }
    }

    pub fn malformed(operation: Operation, details: impl Into<String>) -> Self {
        RemoteError::new(operation, RemoteCause::Malformed(details.into()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.cause, RemoteCause::Status { status: 404, .. })
    }
}

#[derive(Debug, Error)]
pub enum NotesError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("note {id} does not exist on the remote")]
    NotFound { id: String },
}
