//! Booking types and the status transition graph.
//!
//! A booking is created once and immutable thereafter except for `status`
//! (and the `version` stamp that guards concurrent status writes).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::user::{Role, UserId};

/// Unique identifier for a booking, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle stage of a booking.
///
/// The happy path is linear: `PENDING -> ACCEPTED -> IN_PROGRESS -> COMPLETED`.
/// `CANCELLED` is reachable from `PENDING` only. `DISPUTED` is reserved in the
/// vocabulary; no normal transition reaches it.
///
/// Maps to the CHECK constraint in the SQLite schema. The uppercase literals
/// are load-bearing: system messages embed them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
    Disputed,
}

impl BookingStatus {
    /// Whether the status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Disputed
        )
    }

    /// Whether `self -> to` is an edge of the transition graph, and if so,
    /// which role may apply it.
    ///
    /// `None` means the edge does not exist. `CANCELLED` from `PENDING` is
    /// open to both parties, so it is permitted for any role.
    pub fn transition_roles(self, to: BookingStatus) -> Option<&'static [Role]> {
        use BookingStatus::*;
        match (self, to) {
            (Pending, Accepted) => Some(&[Role::Provider]),
            (Pending, Cancelled) => Some(&[Role::Provider, Role::Customer]),
            (Accepted, InProgress) => Some(&[Role::Provider]),
            (InProgress, Completed) => Some(&[Role::Provider]),
            _ => None,
        }
    }

    /// Whether `self -> to` is an edge of the transition graph at all.
    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        self.transition_roles(to).is_some()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "PENDING"),
            BookingStatus::Accepted => write!(f, "ACCEPTED"),
            BookingStatus::InProgress => write!(f, "IN_PROGRESS"),
            BookingStatus::Completed => write!(f, "COMPLETED"),
            BookingStatus::Cancelled => write!(f, "CANCELLED"),
            BookingStatus::Disputed => write!(f, "DISPUTED"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BookingStatus::Pending),
            "ACCEPTED" => Ok(BookingStatus::Accepted),
            "IN_PROGRESS" => Ok(BookingStatus::InProgress),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            "DISPUTED" => Ok(BookingStatus::Disputed),
            other => Err(format!("invalid booking status: '{other}'")),
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

/// A single service engagement between one customer and one provider.
///
/// Display names are cached at creation so a booking stays renderable after
/// either party's profile changes or disappears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub customer_id: UserId,
    pub provider_id: UserId,
    pub customer_name: String,
    pub provider_name: String,
    /// Category id, e.g. "plumbing".
    pub service_category: String,
    pub status: BookingStatus,
    pub scheduled_at: DateTime<Utc>,
    /// Base price in whole rupees (the provider's hourly rate at creation).
    pub total_price: i64,
    pub address: Option<String>,
    /// Optimistic concurrency stamp; bumped on every status write.
    pub version: i64,
    pub created_at: DateTime<Utc>,
}
