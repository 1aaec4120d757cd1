//! propsync CLI library.
//!
//! The binary in `main.rs` is a thin shell around these modules; they are
//! exposed here so integration tests can drive argument parsing and settings
//! resolution without a terminal.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod settings;
