//! CLI commands

pub mod install;
