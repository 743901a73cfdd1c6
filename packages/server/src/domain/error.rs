//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// MessageId validation error
    #[error("MessageId cannot be empty")]
    MessageIdEmpty,

    /// RoomName validation error
    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("RoomName cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// Email validation error
    #[error("Email must contain '@' (got: {0})")]
    EmailInvalid(String),

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// User is already a participant of the room
    #[error("User '{0}' is already a participant of the room")]
    AlreadyParticipant(String),
}

/// Errors raised by the repository layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Room not found error
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// User not found error
    #[error("User '{0}' not found")]
    UserNotFound(String),

    /// Email already registered error
    #[error("Email '{0}' is already registered")]
    EmailAlreadyRegistered(String),

    /// User is already a participant of the room
    #[error("User '{0}' is already a participant of the room")]
    AlreadyParticipant(String),

    /// User is already blocked
    #[error("User '{0}' is already blocked")]
    AlreadyBlocked(String),

    /// Block not found error
    #[error("Block for user '{0}' not found")]
    BlockNotFound(String),
}
