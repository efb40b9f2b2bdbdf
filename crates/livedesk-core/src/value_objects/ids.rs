//! Identifier newtypes for presence subjects, chats, and tenants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier of a user (visitor or commercial agent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

/// Unique identifier of a chat conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(Uuid);

/// Unique identifier of a tenant (company account)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl UserId {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random id (mainly useful in tests)
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn into_inner(self) -> Uuid {
        self.0
    }
}

impl ChatId {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn into_inner(self) -> Uuid {
        self.0
    }
}

impl TenantId {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn into_inner(self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<Uuid> for ChatId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<Uuid> for TenantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl FromStr for ChatId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The role a presence subject plays in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    /// A website visitor
    Visitor,
    /// A commercial agent handling visitor chats
    Commercial,
}

impl UserKind {
    /// The role on the other side of a chat
    #[must_use]
    pub fn counterpart(&self) -> Self {
        match self {
            Self::Visitor => Self::Commercial,
            Self::Commercial => Self::Visitor,
        }
    }
}

impl fmt::Display for UserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visitor => write!(f, "visitor"),
            Self::Commercial => write!(f, "commercial"),
        }
    }
}

impl FromStr for UserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "visitor" => Ok(Self::Visitor),
            "commercial" => Ok(Self::Commercial),
            _ => Err(format!("Invalid user kind: {s}")),
        }
    }
}

/// Error parsing a `UserRef` from its `kind:id` rendering
#[derive(Debug, thiserror::Error)]
#[error("Invalid user reference: {0}")]
pub struct ParseUserRefError(pub String);

/// A presence subject, keyed by `(kind, id)`.
///
/// The textual rendering `{kind}:{id}` doubles as the subject's own logical
/// room identifier for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub kind: UserKind,
    pub id: UserId,
}

impl UserRef {
    #[must_use]
    pub fn new(kind: UserKind, id: UserId) -> Self {
        Self { kind, id }
    }

    #[must_use]
    pub fn visitor(id: UserId) -> Self {
        Self::new(UserKind::Visitor, id)
    }

    #[must_use]
    pub fn commercial(id: UserId) -> Self {
        Self::new(UserKind::Commercial, id)
    }

    /// The logical room addressed when notifying this user
    #[must_use]
    pub fn room(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for UserRef {
    type Err = ParseUserRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| ParseUserRefError(s.to_string()))?;
        let kind = kind
            .parse::<UserKind>()
            .map_err(|_| ParseUserRefError(s.to_string()))?;
        let id = id
            .parse::<UserId>()
            .map_err(|_| ParseUserRefError(s.to_string()))?;
        Ok(Self { kind, id })
    }
}
