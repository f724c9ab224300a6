//! Core business logic for YellowShield.

pub mod services;

pub use services::*;
