//! The Lb request-handling engine
//!
//! Layering, outside in: `sccp_lb` translates SCCP-user primitives,
//! `lb_peer` runs the per-peer RESET state machine, `lb_conn` owns one
//! connection each, `loc_req` drives a single Perform Location Request to
//! its response. `smlc` ties everything to one process-wide context.

pub mod counters;
pub mod lb_conn;
pub mod lb_peer;
pub mod loc_req;
pub mod sccp_lb;
pub mod smlc;
pub mod subscr;

pub use counters::SmlcCounters;
pub use smlc::Smlc;
pub use subscr::SubscriberRegistry;
