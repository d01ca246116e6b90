//! CLI, configuration and file adapters
//!
//! This crate provides the `calbridge` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod ics;
pub mod io;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
