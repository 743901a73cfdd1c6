//! Idobata chat server library.
//!
//! Group chat rooms, direct messaging, and a real-time presence and
//! message-fanout layer over WebSocket. Message bodies are persisted
//! through the repository layer; socket events are lightweight cues that
//! tell clients to refetch.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
