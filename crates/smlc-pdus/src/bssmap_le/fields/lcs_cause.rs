use core::fmt;

use smlc_core::{OctetBuffer, PduParseErr};

use super::{iei, read_tlv_value, write_tlv};

/// LCS Cause values (TS 49.031, 10.13)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcsCause {
    Unspecified = 0x00,
    SystemFailure = 0x01,
    ProtocolError = 0x02,
    DataMissingInReq = 0x03,
    UnexpDataValue = 0x04,
    PosMethFailure = 0x05,
    TgtMsUnreachable = 0x06,
    RequestAborted = 0x07,
    FacilityNotsupp = 0x08,
    InterBscHo = 0x09,
    IntraBscHo = 0x0a,
    Congestion = 0x0b,
}

impl LcsCause {
    pub fn try_from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x00 => Some(Self::Unspecified),
            0x01 => Some(Self::SystemFailure),
            0x02 => Some(Self::ProtocolError),
            0x03 => Some(Self::DataMissingInReq),
            0x04 => Some(Self::UnexpDataValue),
            0x05 => Some(Self::PosMethFailure),
            0x06 => Some(Self::TgtMsUnreachable),
            0x07 => Some(Self::RequestAborted),
            0x08 => Some(Self::FacilityNotsupp),
            0x09 => Some(Self::InterBscHo),
            0x0a => Some(Self::IntraBscHo),
            0x0b => Some(Self::Congestion),
            _ => None,
        }
    }

    pub fn write(self, buf: &mut OctetBuffer) {
        write_tlv(buf, iei::LCS_CAUSE, &[self as u8]);
    }

    /// Read the element value, IEI already consumed. A diagnostic octet, if
    /// present, is ignored.
    pub fn read_value(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let value = read_tlv_value(buf, "lcs_cause")?;
        let raw = *value.first().ok_or(PduParseErr::BufferEnded { field: "lcs_cause" })?;
        Self::try_from_raw(raw)
            .ok_or(PduParseErr::InvalidValue { field: "lcs_cause", value: raw as u64 })
    }
}

impl fmt::Display for LcsCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => write!(f, "unspecified"),
            Self::SystemFailure => write!(f, "system-failure"),
            Self::ProtocolError => write!(f, "protocol-error"),
            Self::DataMissingInReq => write!(f, "data-missing-in-request"),
            Self::UnexpDataValue => write!(f, "unexpected-data-value"),
            Self::PosMethFailure => write!(f, "position-method-failure"),
            Self::TgtMsUnreachable => write!(f, "target-ms-unreachable"),
            Self::RequestAborted => write!(f, "request-aborted"),
            Self::FacilityNotsupp => write!(f, "facility-not-supported"),
            Self::InterBscHo => write!(f, "inter-bsc-handover"),
            Self::IntraBscHo => write!(f, "intra-bsc-handover"),
            Self::Congestion => write!(f, "congestion"),
        }
    }
}
