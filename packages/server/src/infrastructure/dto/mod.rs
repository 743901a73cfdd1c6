//! Data transfer objects crossing the process boundary.
//!
//! - `websocket`: the socket event vocabulary (inbound client events and
//!   outbound server events)
//! - `http`: request/response bodies for the REST API

pub mod http;
pub mod websocket;
