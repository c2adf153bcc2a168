use smlc_core::{OctetBuffer, PduParseErr};

use crate::bssmap_le::fields::cause::Cause;
use crate::bssmap_le::fields::{iei, skip_tlv};

/// RESET (TS 49.031, 9.12): global reset of the Lb interface. All connection
/// oriented state on both sides is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reset {
    pub cause: Cause,
}

impl Reset {
    pub fn to_buf(&self, buf: &mut OctetBuffer) -> Result<(), PduParseErr> {
        self.cause.write(buf);
        Ok(())
    }

    pub fn from_buf(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let mut cause = None;
        while buf.remaining() > 0 {
            let tag = buf.read_u8("iei")?;
            match tag {
                iei::CAUSE => cause = Some(Cause::read_value(buf)?),
                other => skip_tlv(buf, other)?,
            }
        }
        Ok(Reset { cause: cause.ok_or(PduParseErr::MissingIe { iei: iei::CAUSE })? })
    }
}
