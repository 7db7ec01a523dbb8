//! CLI command handlers

pub mod commands;

pub use commands::{check, devices, load_config, match_sku, parse, prepare, repair, sort, ConfigOverrides};
