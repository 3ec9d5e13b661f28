//! Core domain + application logic for the code-call service.
//!
//! This crate is intentionally framework-agnostic. The telephony provider and
//! the HTTP callback surface live behind ports (traits) implemented in adapter
//! crates.

pub mod alerts;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod markup;
pub mod ports;
pub mod scheduler;

pub use errors::{Error, Result};
