//! BMI Calculator terminal host
//!
//! Drives the shared BMI form from a line-oriented command stream, so the
//! calculator can be scripted or used interactively from a terminal.

pub mod commands;
pub mod config;
pub mod error;
pub mod session;
pub mod terminal;
