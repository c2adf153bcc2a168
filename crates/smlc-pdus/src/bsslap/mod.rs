//! BSSLAP APDUs (3GPP TS 48.071), carried inside the BSSMAP-LE APDU IE
//!
//! All elements this sub-protocol uses here are TV coded with fixed value
//! lengths per IEI.

use core::fmt;

use smlc_core::{OctetBuffer, PduParseErr};

mod iei {
    pub const TA: u8 = 0x01;
    pub const CELL_IDENTITY: u8 = 0x09;
    pub const CAUSE: u8 = 0x18;
}

/// BSSLAP message type octet (TS 48.071, 5.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsslapMsgType {
    TaRequest = 0x01,
    TaResponse = 0x02,
    Reject = 0x0a,
    Reset = 0x0b,
    Abort = 0x0c,
    TaLayer3 = 0x0d,
}

impl BsslapMsgType {
    pub fn try_from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x01 => Some(Self::TaRequest),
            0x02 => Some(Self::TaResponse),
            0x0a => Some(Self::Reject),
            0x0b => Some(Self::Reset),
            0x0c => Some(Self::Abort),
            0x0d => Some(Self::TaLayer3),
            _ => None,
        }
    }
}

impl fmt::Display for BsslapMsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaRequest => write!(f, "TA-REQUEST"),
            Self::TaResponse => write!(f, "TA-RESPONSE"),
            Self::Reject => write!(f, "REJECT"),
            Self::Reset => write!(f, "RESET"),
            Self::Abort => write!(f, "ABORT"),
            Self::TaLayer3 => write!(f, "TA-LAYER3"),
        }
    }
}

/// BSSLAP cause values (TS 48.071, 5.14)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsslapCause {
    Congestion,
    ChanModeNotSupported,
    PosProcNotSupported,
    OtherRadioReasons,
    IntraBssHo,
    SupervisionTimerExpired,
    InterBssHo,
    LossOfSignallingConn,
    Other(u8),
}

impl BsslapCause {
    pub fn to_raw(self) -> u8 {
        match self {
            BsslapCause::Congestion => 0x00,
            BsslapCause::ChanModeNotSupported => 0x01,
            BsslapCause::PosProcNotSupported => 0x02,
            BsslapCause::OtherRadioReasons => 0x03,
            BsslapCause::IntraBssHo => 0x04,
            BsslapCause::SupervisionTimerExpired => 0x05,
            BsslapCause::InterBssHo => 0x06,
            BsslapCause::LossOfSignallingConn => 0x07,
            BsslapCause::Other(raw) => raw,
        }
    }

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => BsslapCause::Congestion,
            0x01 => BsslapCause::ChanModeNotSupported,
            0x02 => BsslapCause::PosProcNotSupported,
            0x03 => BsslapCause::OtherRadioReasons,
            0x04 => BsslapCause::IntraBssHo,
            0x05 => BsslapCause::SupervisionTimerExpired,
            0x06 => BsslapCause::InterBssHo,
            0x07 => BsslapCause::LossOfSignallingConn,
            other => BsslapCause::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsslapPdu {
    /// Ask the BSC for the current timing advance
    TaRequest,
    /// Timing advance plus the CI of the serving cell
    TaResponse { cell_id: u16, ta: u8 },
    Reject { cause: BsslapCause },
    /// Sent by the BSC on handover; carries the new serving cell and TA
    Reset { cell_id: u16, ta: u8, cause: BsslapCause },
    Abort { cause: BsslapCause },
    /// TA known from layer 3 at the time of the location request
    TaLayer3 { ta: u8 },
}

impl BsslapPdu {
    pub fn msg_type(&self) -> BsslapMsgType {
        match self {
            BsslapPdu::TaRequest => BsslapMsgType::TaRequest,
            BsslapPdu::TaResponse { .. } => BsslapMsgType::TaResponse,
            BsslapPdu::Reject { .. } => BsslapMsgType::Reject,
            BsslapPdu::Reset { .. } => BsslapMsgType::Reset,
            BsslapPdu::Abort { .. } => BsslapMsgType::Abort,
            BsslapPdu::TaLayer3 { .. } => BsslapMsgType::TaLayer3,
        }
    }

    pub fn to_buf(&self, buf: &mut OctetBuffer) -> Result<(), PduParseErr> {
        buf.write_u8(self.msg_type() as u8);
        match *self {
            BsslapPdu::TaRequest => {}
            BsslapPdu::TaResponse { cell_id, ta } => {
                write_cell_identity(buf, cell_id);
                write_ta(buf, ta);
            }
            BsslapPdu::Reject { cause } => write_cause(buf, cause),
            BsslapPdu::Reset { cell_id, ta, cause } => {
                write_cell_identity(buf, cell_id);
                write_ta(buf, ta);
                write_cause(buf, cause);
            }
            BsslapPdu::Abort { cause } => write_cause(buf, cause),
            BsslapPdu::TaLayer3 { ta } => write_ta(buf, ta),
        }
        Ok(())
    }

    pub fn from_buf(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let raw = buf.read_u8("bsslap_msg_type")?;
        let msg_type =
            BsslapMsgType::try_from_raw(raw).ok_or(PduParseErr::UnknownMsgType { found: raw })?;

        let ies = Ies::read(buf)?;
        match msg_type {
            BsslapMsgType::TaRequest => Ok(BsslapPdu::TaRequest),
            BsslapMsgType::TaResponse => Ok(BsslapPdu::TaResponse {
                cell_id: ies.require_cell_identity()?,
                ta: ies.require_ta()?,
            }),
            BsslapMsgType::Reject => Ok(BsslapPdu::Reject { cause: ies.require_cause()? }),
            BsslapMsgType::Reset => Ok(BsslapPdu::Reset {
                cell_id: ies.require_cell_identity()?,
                ta: ies.require_ta()?,
                cause: ies.require_cause()?,
            }),
            BsslapMsgType::Abort => Ok(BsslapPdu::Abort { cause: ies.require_cause()? }),
            BsslapMsgType::TaLayer3 => Ok(BsslapPdu::TaLayer3 { ta: ies.require_ta()? }),
        }
    }
}

impl fmt::Display for BsslapPdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BSSLAP {}", self.msg_type())
    }
}

fn write_ta(buf: &mut OctetBuffer, ta: u8) {
    buf.write_u8(iei::TA);
    buf.write_u8(ta);
}

fn write_cell_identity(buf: &mut OctetBuffer, cell_id: u16) {
    buf.write_u8(iei::CELL_IDENTITY);
    buf.write_u16(cell_id);
}

fn write_cause(buf: &mut OctetBuffer, cause: BsslapCause) {
    buf.write_u8(iei::CAUSE);
    buf.write_u8(cause.to_raw());
}

/// Collected TV elements of one APDU
#[derive(Default)]
struct Ies {
    ta: Option<u8>,
    cell_identity: Option<u16>,
    cause: Option<BsslapCause>,
}

impl Ies {
    fn read(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let mut ies = Ies::default();
        while buf.remaining() > 0 {
            let tag = buf.read_u8("bsslap_iei")?;
            match tag {
                iei::TA => ies.ta = Some(buf.read_u8("ta")?),
                iei::CELL_IDENTITY => ies.cell_identity = Some(buf.read_u16("cell_identity")?),
                iei::CAUSE => ies.cause = Some(BsslapCause::from_raw(buf.read_u8("cause")?)),
                other => return Err(PduParseErr::UnknownIei { found: other }),
            }
        }
        Ok(ies)
    }

    fn require_ta(&self) -> Result<u8, PduParseErr> {
        self.ta.ok_or(PduParseErr::MissingIe { iei: iei::TA })
    }

    fn require_cell_identity(&self) -> Result<u16, PduParseErr> {
        self.cell_identity.ok_or(PduParseErr::MissingIe { iei: iei::CELL_IDENTITY })
    }

    fn require_cause(&self) -> Result<BsslapCause, PduParseErr> {
        self.cause.ok_or(PduParseErr::MissingIe { iei: iei::CAUSE })
    }
}
