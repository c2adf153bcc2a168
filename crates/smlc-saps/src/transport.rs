use core::fmt;

use crate::prim::ScuPrimDown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErr {
    /// No SCCP user is bound yet
    NotReady,
    /// The stack accepted the primitive but could not send it
    SendFailed,
}

impl fmt::Display for TransportErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErr::NotReady => write!(f, "SCCP user not ready"),
            TransportErr::SendFailed => write!(f, "SCCP send failed"),
        }
    }
}

/// Downward half of the SCCP-user SAP. The Lb engine pushes primitives into
/// this; upward primitives are injected into the engine by whoever owns the
/// transport.
pub trait SccpTransport {
    fn sap_down(&mut self, prim: ScuPrimDown) -> Result<(), TransportErr>;
}

/// Transport stub for running without a signalling link. Every send fails
/// with NotReady.
#[derive(Debug, Default)]
pub struct NullTransport;

impl SccpTransport for NullTransport {
    fn sap_down(&mut self, prim: ScuPrimDown) -> Result<(), TransportErr> {
        tracing::warn!("no SCCP link, dropping {}", prim);
        Err(TransportErr::NotReady)
    }
}
