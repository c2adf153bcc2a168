use smlc_core::{OctetBuffer, PduParseErr};

use crate::bsslap::BsslapPdu;
use crate::bssmap_le::fields::{apdu, iei, skip_tlv};

/// CONNECTION ORIENTED INFORMATION (TS 49.031, 9.11): transparent container
/// for the BSSLAP sub-protocol on an established connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnOrientedInfo {
    pub apdu: BsslapPdu,
}

impl ConnOrientedInfo {
    pub fn to_buf(&self, buf: &mut OctetBuffer) -> Result<(), PduParseErr> {
        apdu::write_bsslap(buf, &self.apdu)
    }

    pub fn from_buf(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let mut bsslap = None;
        while buf.remaining() > 0 {
            let tag = buf.read_u8("iei")?;
            match tag {
                iei::APDU => bsslap = Some(apdu::read_bsslap_value(buf)?),
                other => skip_tlv(buf, other)?,
            }
        }
        Ok(ConnOrientedInfo { apdu: bsslap.ok_or(PduParseErr::MissingIe { iei: iei::APDU })? })
    }
}
