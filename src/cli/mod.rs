//! # CLI Module
//!
//! Command-line access to model documents: list configured operations,
//! classify a single declared type, and validate a document.
//!
//! ## Commands
//!
//! ### `inspect`
//!
//! Print every operation with its binding parameter and the resolved type and
//! optional flag of each parameter:
//!
//! ```bash
//! edmbuilder inspect --model model.yaml
//! edmbuilder inspect --model model.yaml --json
//! ```
//!
//! ### `classify`
//!
//! Resolve one declared type against the model and report its kind, full name
//! and whether a parameter of that type is optional. With `--binding` the type
//! is checked as a binding parameter and non-entity types fail:
//!
//! ```bash
//! edmbuilder classify --model model.yaml --type "IEnumerable<Color?>"
//! edmbuilder classify --model model.yaml --type Customer --binding
//! ```
//!
//! ### `validate`
//!
//! Load the document, print every issue, and exit non-zero if there are any:
//!
//! ```bash
//! edmbuilder validate --model model.yaml
//! ```
//!
//! ## Global Options
//!
//! - `--verbose` / `-v` - debug-level logging with source locations
//!
//! Logging otherwise follows the `EDMB_LOG_*` variables (see
//! [`crate::logging`]) and model loading follows `EDMB_NAMESPACE` /
//! `EDMB_STRICT` (see [`crate::runtime_config`]).

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
