use smlc_core::gad::Gad;
use smlc_core::{OctetBuffer, PduParseErr};

use crate::bssmap_le::fields::lcs_cause::LcsCause;
use crate::bssmap_le::fields::{iei, location_estimate, skip_tlv};

/// PERFORM LOCATION RESPONSE (TS 49.031, 9.2): either a location estimate or
/// an LCS cause explaining its absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerformLocResp {
    pub location_estimate: Option<Gad>,
    pub lcs_cause: Option<LcsCause>,
}

impl PerformLocResp {
    pub fn to_buf(&self, buf: &mut OctetBuffer) -> Result<(), PduParseErr> {
        if let Some(estimate) = &self.location_estimate {
            location_estimate::write(buf, estimate)?;
        }
        if let Some(cause) = self.lcs_cause {
            cause.write(buf);
        }
        Ok(())
    }

    pub fn from_buf(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let mut resp = PerformLocResp::default();
        while buf.remaining() > 0 {
            let tag = buf.read_u8("iei")?;
            match tag {
                iei::LOCATION_ESTIMATE => {
                    resp.location_estimate = Some(location_estimate::read_value(buf)?)
                }
                iei::LCS_CAUSE => resp.lcs_cause = Some(LcsCause::read_value(buf)?),
                other => skip_tlv(buf, other)?,
            }
        }
        Ok(resp)
    }
}
