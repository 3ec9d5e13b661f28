//! Provider callback surface (axum).
//!
//! The provider drives the call through two webhooks:
//! - `POST /voice` when the placed call is answered: reply with markup that
//!   prompts for the code and collects a keypress
//! - `POST /gather` with the collected `Digits`: validate and send the alert

pub mod form;
pub mod handlers;
pub mod router;

pub use router::{build_router, serve, serve_on, AppState};
