//! Standardized error response body.

use serde::{Deserialize, Serialize};

/// Every error response carries a discriminating `name` and a human-readable
/// `message`; the HTTP status is chosen by the error middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub name: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}
