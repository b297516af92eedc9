//! Integration test utilities for the STOMP broker
//!
//! This crate provides helpers for running end-to-end tests against
//! the WebSocket endpoint and the admin HTTP surface.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
