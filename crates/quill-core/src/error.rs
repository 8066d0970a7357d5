//! Domain-level error types.

use thiserror::Error;

/// Failures of the post operations, as seen by the handler layer.
///
/// The `name`/`message` pair is the wire contract: clients discriminate on
/// `name` and display `message` verbatim, so the strings here are fixed.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("You cannot update a post that is not yours")]
    UnauthorizedUpdate,

    #[error("You cannot delete a post which is not yours")]
    UnauthorizedDelete,

    #[error("That post does not exist")]
    NotFound,

    #[error("no post has been created")]
    CreationFailed,

    #[error(transparent)]
    Store(#[from] RepoError),
}

impl PostError {
    /// The discriminating error name carried in responses.
    pub fn name(&self) -> &'static str {
        match self {
            PostError::UnauthorizedUpdate | PostError::UnauthorizedDelete => {
                "UnauthorizedUserError"
            }
            PostError::NotFound => "PostNotFoundError",
            PostError::CreationFailed => "CreationFailure",
            PostError::Store(err) => err.name(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    pub fn name(&self) -> &'static str {
        match self {
            RepoError::Connection(_) => "ConnectionError",
            RepoError::Query(_) => "QueryError",
            RepoError::NotFound => "NotFoundError",
            RepoError::Constraint(_) => "ConstraintError",
        }
    }
}
