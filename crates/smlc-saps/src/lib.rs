//! SCCP-user SAP for the Lb interface
//!
//! Primitive structs exchanged with the SCCP stack, SCCP addressing types and
//! the transport trait the Lb engine pushes downward primitives into. The
//! SCCP/M3UA stack itself lives behind that trait.

pub mod prim;
pub mod sccp;
pub mod transport;

pub use prim::{ScuPrimDown, ScuPrimUp};
pub use sccp::{PointCode, RemoteSccpStatus, SccpAddr, SccpReturnCause, SpStatus, SSN_SMLC_BSSAP_LE};
pub use transport::{NullTransport, SccpTransport, TransportErr};
