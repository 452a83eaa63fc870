use serde::{Deserialize, Serialize};
use std::fmt;

/// Authentication token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Account owning a board. Exactly one kind is active per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Organization(String),
    User(String),
}

impl Owner {
    pub fn login(&self) -> &str {
        match self {
            Owner::Organization(login) | Owner::User(login) => login,
        }
    }

    /// Browser link to board `number` of this owner.
    pub fn project_url(&self, number: u64) -> String {
        let scope = match self {
            Owner::Organization(_) => "orgs",
            Owner::User(_) => "users",
        };
        format!(
            "https://github.com/{scope}/{}/projects/{number}",
            urlencoding::encode(self.login())
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Issue,
    PullRequest,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Issue => "issue",
            ContentKind::PullRequest => "pull_request",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Issue => f.write_str("issue"),
            ContentKind::PullRequest => f.write_str("pull request"),
        }
    }
}

/// The issue or pull request that triggered the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub node_id: String,
    pub kind: ContentKind,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub name: String,
    pub value: String,
}

impl FieldAssignment {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything one run needs, resolved once before any network call.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub token: Token,
    pub project_number: u64,
    pub owner: Owner,
    pub content: Content,
    pub fields: Vec<FieldAssignment>,
}
