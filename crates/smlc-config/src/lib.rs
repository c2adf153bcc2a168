//! SMLC configuration management
//!
//! This crate provides configuration loading and parsing:
//! - TOML configuration file parsing
//! - The `cells` command grammar populating the cell location table

pub mod cells_cmd;
pub mod smlc_config;
pub mod toml_config;

pub use cells_cmd::{parse_cells_cmd, CellsCmd, CellsCmdErr};
pub use smlc_config::*;
pub use toml_config::*;
