//! # portaria-cli
//!
//! Command-line tools for the Portaria console.
//!
//! This crate provides:
//! - `serve`: runs the HTTP API against the configured backend
//! - `config`: inspects and edits the TOML configuration
//! - `check-status` and `bulk-check`: offline checks of the date rule and of
//!   bulk authorization files

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;
pub mod serve;
