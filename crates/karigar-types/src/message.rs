//! Per-booking chat message types.
//!
//! Threads are append-only and timestamp-ordered. `is_read` is the only
//! mutable field, and it only ever flips false -> true.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::booking::BookingId;
use crate::user::UserId;

/// Unique identifier for a message, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Who authored a message: a user, or the reserved `system` sender that
/// announces lifecycle events.
///
/// Persisted as a single text column: the literal `system`, or the user's
/// UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    System,
    User(UserId),
}

impl Sender {
    /// Whether this message was sent by the given user.
    pub fn is_user(&self, user_id: UserId) -> bool {
        matches!(self, Sender::User(id) if *id == user_id)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::System => write!(f, "system"),
            Sender::User(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "system" {
            return Ok(Sender::System);
        }
        s.parse::<UserId>()
            .map(Sender::User)
            .map_err(|e| format!("invalid sender: {e}"))
    }
}

/// A single chat entry within a booking's thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub booking_id: BookingId,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl Message {
    /// Build a user-authored message with the current timestamp, unread.
    pub fn from_user(booking_id: BookingId, sender: UserId, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            booking_id,
            sender: Sender::User(sender),
            content: content.into(),
            timestamp: Utc::now(),
            is_read: false,
        }
    }

    /// Build a system message with the current timestamp, unread.
    pub fn from_system(booking_id: BookingId, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            booking_id,
            sender: Sender::System,
            content: content.into(),
            timestamp: Utc::now(),
            is_read: false,
        }
    }
}
