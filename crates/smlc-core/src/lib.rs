//! Core utilities for the SMLC
//!
//! This crate provides fundamental types and utilities used across the stack

/// Git version string, set at compile time
pub const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");
/// Stack version followed by git version string, e.g., "0.1.0-aabbccdd"
pub const STACK_VERSION: &str = const_format::formatcp!("{}-{}", env!("CARGO_PKG_VERSION"), GIT_VERSION);

pub mod cell_id;
pub mod cell_locations;
pub mod debug;
pub mod gad;
pub mod identity;
pub mod octet_buffer;
pub mod pdu_parse_error;
pub mod tdefs;
pub mod use_count;

// Re-export commonly used items
pub use cell_id::{CellIdentifier, Plmn};
pub use cell_locations::{CellLocations, CellLocation};
pub use gad::Gad;
pub use identity::Imsi;
pub use octet_buffer::OctetBuffer;
pub use pdu_parse_error::PduParseErr;
pub use tdefs::Tdefs;
pub use use_count::UseCount;

/// SCCP connection identifiers are 24-bit values on the wire
pub type SccpConnId = u32;

/// Upper bound (exclusive) for SCCP connection ids
pub const SCCP_CONN_ID_MAX: u32 = 0x100_0000;
