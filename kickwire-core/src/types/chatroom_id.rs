//! Chatroom ID type for the numeric room a channel publishes into.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use super::ValidationError;

/// Chatroom ID - the numeric identifier behind a human-readable channel name.
///
/// Wraps a `NonZeroU64`; zero is what the channel API returns when a channel
/// has no chatroom, so it is rejected at construction.
///
/// # Examples
///
/// ```
/// use kickwire_core::types::ChatroomId;
///
/// let id = ChatroomId::new(42).unwrap();
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.subscription_channel(), "chatrooms.42.v2");
/// assert!(ChatroomId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatroomId(NonZeroU64);

impl ChatroomId {
    /// Creates a new `ChatroomId`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ZeroChatroomId` if the value is zero.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or(ValidationError::ZeroChatroomId)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Returns the Pusher channel name carrying this room's chat events.
    #[must_use]
    pub fn subscription_channel(self) -> String {
        format!("chatrooms.{}.v2", self.0)
    }
}

impl fmt::Display for ChatroomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatroomId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidChatroomId(s.to_string()))?;
        Self::new(value)
    }
}

impl From<ChatroomId> for u64 {
    fn from(id: ChatroomId) -> Self {
        id.get()
    }
}
