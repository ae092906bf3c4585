use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a user account, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new UserId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a UserId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
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

/// The capacity an account is operating in.
///
/// One account can act on both sides of the marketplace; the role selects
/// which side a given view or operation addresses. It is never a second
/// account.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (current_role IN ('customer', 'provider'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Provider,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Provider => write!(f, "provider"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "provider" => Ok(Role::Provider),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

/// A user account on the platform.
///
/// Accounts are unified: `is_provider` records whether a provider profile
/// exists for this account, and `current_role` remembers which side of the
/// marketplace the account last operated on. Operations that depend on the
/// acting capacity take an explicit [`Actor`] instead of reading this flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    /// Whether this account has a provider profile.
    pub is_provider: bool,
    /// Which view was last active for this account.
    pub current_role: Role,
}

impl UserProfile {
    /// Create a customer-only profile with the given identity fields.
    pub fn new(email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            phone: None,
            full_name: full_name.into(),
            avatar_url: None,
            location: None,
            is_provider: false,
            current_role: Role::Customer,
        }
    }
}

/// The identity and capacity a caller is invoking an operation with.
///
/// Lifecycle transitions are authorized against this value rather than the
/// mutable `current_role` flag on the profile, so role-dependent behavior is
/// testable in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Customer,
        }
    }

    pub fn provider(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Provider,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user_id, self.role)
    }
}
