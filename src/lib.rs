// ABOUTME: Library root for depotpush - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod action;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod manifest;
pub mod output;
pub mod platform;
pub mod process;
pub mod types;
