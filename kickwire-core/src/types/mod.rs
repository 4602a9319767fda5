//! NewType wrappers for protocol identifiers.
//!
//! # Types
//!
//! - [`ChatroomId`] - Numeric chatroom identifier resolved from a channel name

mod chatroom_id;

pub use chatroom_id::ChatroomId;

/// Validation error for `NewType` construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Chatroom ID is zero, which the channel API uses for "not found"
    #[error("chatroom ID cannot be zero")]
    ZeroChatroomId,

    /// Chatroom ID text is not a positive integer
    #[error("invalid chatroom ID: {0}")]
    InvalidChatroomId(String),
}
