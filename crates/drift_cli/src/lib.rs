//! Drift CLI library exports for integration testing.
//!
//! This module exposes the command implementations and report rendering used
//! by the `drift` binary.

pub mod commands;
pub mod config;
pub mod errors;
pub mod report;
