//! Chat data structures.
//!
//! # Structures
//!
//! - ChatMessage - A single chat event delivered for a channel
//! - User - The sender embedded in every chat message

mod message;

pub use message::{ChatMessage, User};
