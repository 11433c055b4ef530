//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Network events: backend round trips and session changes
//! - Terminal events: keyboard input and ticks

pub mod network;
pub mod terminal;
