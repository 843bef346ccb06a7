//! Command-line interface for the 2048 engine.
//! This module is not part of the public library API.

pub mod args;
pub mod commands;

pub use args::Twenty48;
