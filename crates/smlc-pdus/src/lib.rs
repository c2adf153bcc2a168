//! BSSAP-LE / BSSMAP-LE / BSSLAP codecs (3GPP TS 49.031, TS 48.071)
//!
//! Every PDU type has a `from_buf` / `to_buf` pair over `OctetBuffer`. The
//! top-level entry points for whole messages live in `bssap_le`.

pub mod bssap_le;
pub mod bsslap;
pub mod bssmap_le;

pub use bssap_le::BssapLePdu;
pub use bsslap::{BsslapCause, BsslapPdu};
pub use bssmap_le::pdus::conn_oriented_info::ConnOrientedInfo;
pub use bssmap_le::pdus::perform_loc_req::PerformLocReq;
pub use bssmap_le::pdus::perform_loc_resp::PerformLocResp;
pub use bssmap_le::BssmapLePdu;
pub use bssmap_le::fields::lcs_cause::LcsCause;
pub use bssmap_le::fields::location_type::LocationType;
