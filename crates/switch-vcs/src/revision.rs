//! Revision specifications used to parameterize fetch and history queries

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a changeset/commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionToken(String);

impl RevisionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is a changeset number rather than a commit id.
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for RevisionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RevisionToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Either a concrete changeset or the symbolic latest revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RevisionSpec {
    #[default]
    Latest,
    Changeset(RevisionToken),
}

impl RevisionSpec {
    /// Parse a revision as build systems report it.
    ///
    /// `C12345` is changeset `12345`, `T` and `latest` are the latest
    /// revision, anything else is taken as an opaque token.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "T" || raw.eq_ignore_ascii_case("latest") {
            return Self::Latest;
        }
        match raw.strip_prefix('C') {
            Some(digits) if RevisionToken::new(digits).is_numeric() => {
                Self::Changeset(RevisionToken::new(digits))
            }
            _ => Self::Changeset(RevisionToken::new(raw)),
        }
    }

    pub fn token(&self) -> Option<&RevisionToken> {
        match self {
            Self::Latest => None,
            Self::Changeset(token) => Some(token),
        }
    }
}

impl From<RevisionToken> for RevisionSpec {
    fn from(token: RevisionToken) -> Self {
        Self::Changeset(token)
    }
}

impl fmt::Display for RevisionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Changeset(token) if token.is_numeric() => write!(f, "C{token}"),
            Self::Changeset(token) => write!(f, "{token}"),
        }
    }
}
