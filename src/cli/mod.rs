//! CLI command handlers

pub mod commands;

pub use commands::{columns, generate, init_config, synonyms, write};
