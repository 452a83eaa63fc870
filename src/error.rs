use thiserror::Error;

use crate::model::context::{ContentKind, Owner};
use crate::report::bold;

/// Everything that can end a run (or, for `FieldResolutionFailed`, skip one field).
#[derive(Debug, Error)]
pub enum ActionError {
    /// A required input is absent or unusable.
    #[error("{0}")]
    MissingInput(String),

    #[error("Inputs 'organization' and 'user' are mutually exclusive, set only one of them")]
    ConflictingInput,

    /// The event payload does not describe an issue or a pull request.
    #[error("{0}")]
    UnsupportedEvent(String),

    #[error(
        "Project number {} not found for login {}.\nCheck the number of the project and that it is owned by {}.\nEX: {} has the number {}.",
        bold(.number),
        bold(.owner.login()),
        bold(.owner.login()),
        bold(example_url(.owner)),
        bold(EXAMPLE_NUMBER)
    )]
    ProjectNotFound { number: u64, owner: Owner },

    #[error("Failed to add {kind} '{title}' to project '{project_title}'.")]
    InsertFailed {
        kind: ContentKind,
        title: String,
        project_title: String,
    },

    /// Soft failure: the field is skipped and the run continues.
    #[error("Field '{field}' skipped: {reason}")]
    FieldResolutionFailed { field: String, reason: String },

    #[error("GraphQL request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid GraphQL response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

const EXAMPLE_NUMBER: u64 = 1234;

fn example_url(owner: &Owner) -> String {
    owner.project_url(EXAMPLE_NUMBER)
}

impl ActionError {
    pub fn missing(input: &str) -> Self {
        Self::MissingInput(format!("No input '{input}'"))
    }
}
