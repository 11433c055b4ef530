//! Application state management module.
//!
//! This module contains the core state management for the application, including:
//! - Main `State` struct that holds all application data
//! - Per-view state (menu listing, menu detail, task list)
//! - Form types (auth form, task edit modal)
//! - Navigation types and state error handling

mod detail;
mod error;
mod form;
mod menu;
mod navigation;
mod request;
mod tasks;

pub use detail::MenuDetail;
pub use error::StateError;
pub use form::{AuthField, AuthForm, AuthMode, ModalField, TaskEditModal};
pub use menu::MenuListing;
pub use navigation::{Alert, Screen};
pub use request::LoadStatus;
pub use tasks::{ModalTarget, TaskList};

#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::State;
