//! Command modules for the drift CLI.
//!
//! - `check_cmd`: compares the configured desired state against Azure DevOps
//! - `validate_cmd`: checks a configuration file without contacting the service

pub mod check_cmd;
pub mod validate_cmd;
