//! Common library for the invitation API server: configuration loading and
//! the domain types shared between the server crate and its tests.

pub mod config;
pub mod types;
