use smlc_core::{OctetBuffer, PduParseErr};

use crate::bssmap_le::fields::lcs_cause::LcsCause;
use crate::bssmap_le::fields::{iei, skip_tlv};

/// PERFORM LOCATION ABORT (TS 49.031, 9.4): the BSC cancels an ongoing
/// location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformLocAbort {
    pub lcs_cause: LcsCause,
}

impl PerformLocAbort {
    pub fn to_buf(&self, buf: &mut OctetBuffer) -> Result<(), PduParseErr> {
        self.lcs_cause.write(buf);
        Ok(())
    }

    pub fn from_buf(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let mut lcs_cause = None;
        while buf.remaining() > 0 {
            let tag = buf.read_u8("iei")?;
            match tag {
                iei::LCS_CAUSE => lcs_cause = Some(LcsCause::read_value(buf)?),
                other => skip_tlv(buf, other)?,
            }
        }
        Ok(PerformLocAbort {
            lcs_cause: lcs_cause.ok_or(PduParseErr::MissingIe { iei: iei::LCS_CAUSE })?,
        })
    }
}
