//! One-shot request/response calls to the manager server.

pub mod client;
pub mod gate;

pub use client::{ApiClient, Lifecycle};
pub use gate::{Action, ActionGate};
