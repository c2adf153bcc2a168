//! BSSMAP-LE messages (3GPP TS 49.031, clause 9)

pub mod fields;
pub mod pdus;

use core::fmt;

use smlc_core::{OctetBuffer, PduParseErr};

use self::pdus::conn_oriented_info::ConnOrientedInfo;
use self::pdus::perform_loc_abort::PerformLocAbort;
use self::pdus::perform_loc_req::PerformLocReq;
use self::pdus::perform_loc_resp::PerformLocResp;
use self::pdus::reset::Reset;

/// BSSMAP-LE message type octet (TS 49.031, 10.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BssmapLeMsgType {
    PerformLocReq = 0x2b,
    PerformLocResp = 0x2d,
    PerformLocAbort = 0x2e,
    ConnOrientedInfo = 0x2a,
    Reset = 0x30,
    ResetAck = 0x31,
}

impl BssmapLeMsgType {
    pub fn try_from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x2b => Some(Self::PerformLocReq),
            0x2d => Some(Self::PerformLocResp),
            0x2e => Some(Self::PerformLocAbort),
            0x2a => Some(Self::ConnOrientedInfo),
            0x30 => Some(Self::Reset),
            0x31 => Some(Self::ResetAck),
            _ => None,
        }
    }
}

impl fmt::Display for BssmapLeMsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerformLocReq => write!(f, "PERFORM-LOCATION-REQUEST"),
            Self::PerformLocResp => write!(f, "PERFORM-LOCATION-RESPONSE"),
            Self::PerformLocAbort => write!(f, "PERFORM-LOCATION-ABORT"),
            Self::ConnOrientedInfo => write!(f, "CONNECTION-ORIENTED-INFORMATION"),
            Self::Reset => write!(f, "RESET"),
            Self::ResetAck => write!(f, "RESET-ACKNOWLEDGE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BssmapLePdu {
    Reset(Reset),
    ResetAck,
    PerformLocReq(PerformLocReq),
    PerformLocResp(PerformLocResp),
    PerformLocAbort(PerformLocAbort),
    ConnOrientedInfo(ConnOrientedInfo),
}

impl BssmapLePdu {
    pub fn msg_type(&self) -> BssmapLeMsgType {
        match self {
            BssmapLePdu::Reset(_) => BssmapLeMsgType::Reset,
            BssmapLePdu::ResetAck => BssmapLeMsgType::ResetAck,
            BssmapLePdu::PerformLocReq(_) => BssmapLeMsgType::PerformLocReq,
            BssmapLePdu::PerformLocResp(_) => BssmapLeMsgType::PerformLocResp,
            BssmapLePdu::PerformLocAbort(_) => BssmapLeMsgType::PerformLocAbort,
            BssmapLePdu::ConnOrientedInfo(_) => BssmapLeMsgType::ConnOrientedInfo,
        }
    }

    pub fn from_buf(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let raw = buf.read_u8("msg_type")?;
        let msg_type =
            BssmapLeMsgType::try_from_raw(raw).ok_or(PduParseErr::UnknownMsgType { found: raw })?;
        match msg_type {
            BssmapLeMsgType::Reset => Ok(BssmapLePdu::Reset(Reset::from_buf(buf)?)),
            BssmapLeMsgType::ResetAck => Ok(BssmapLePdu::ResetAck),
            BssmapLeMsgType::PerformLocReq => {
                Ok(BssmapLePdu::PerformLocReq(PerformLocReq::from_buf(buf)?))
            }
            BssmapLeMsgType::PerformLocResp => {
                Ok(BssmapLePdu::PerformLocResp(PerformLocResp::from_buf(buf)?))
            }
            BssmapLeMsgType::PerformLocAbort => {
                Ok(BssmapLePdu::PerformLocAbort(PerformLocAbort::from_buf(buf)?))
            }
            BssmapLeMsgType::ConnOrientedInfo => {
                Ok(BssmapLePdu::ConnOrientedInfo(ConnOrientedInfo::from_buf(buf)?))
            }
        }
    }

    pub fn to_buf(&self, buf: &mut OctetBuffer) -> Result<(), PduParseErr> {
        buf.write_u8(self.msg_type() as u8);
        match self {
            BssmapLePdu::Reset(pdu) => pdu.to_buf(buf),
            BssmapLePdu::ResetAck => Ok(()),
            BssmapLePdu::PerformLocReq(pdu) => pdu.to_buf(buf),
            BssmapLePdu::PerformLocResp(pdu) => pdu.to_buf(buf),
            BssmapLePdu::PerformLocAbort(pdu) => pdu.to_buf(buf),
            BssmapLePdu::ConnOrientedInfo(pdu) => pdu.to_buf(buf),
        }
    }
}

impl fmt::Display for BssmapLePdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg_type())
    }
}
