//! CLI and configuration

pub mod cli;
pub mod config;
