//! postmgn - keep Postman collections and environments in version control
//!
//! This crate provides the core functionality for the `postmgn` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`app`] - One action against one project, from startup plan to save
//! - [`sync`] - Export, import, bootstrap and drift detection
//! - [`api`] - Postman API client
//! - [`config`] - Public, private and legacy config files
//! - [`model`] - Resource kinds and documents
//! - [`prompt`] - Operator prompts
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod prompt;
pub mod sync;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
