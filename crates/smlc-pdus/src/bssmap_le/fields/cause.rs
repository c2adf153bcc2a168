use smlc_core::{expect_value, OctetBuffer, PduParseErr};

use super::{iei, read_tlv_value, write_tlv};

/// Cause values (TS 48.008, 3.2.2.5), only the ones this element emits or
/// inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    RadioInterfaceFailure,
    EquipmentFailure,
    ProtocolError,
    Other(u8),
}

impl Cause {
    pub fn to_raw(self) -> u8 {
        match self {
            Cause::RadioInterfaceFailure => 0x01,
            Cause::EquipmentFailure => 0x20,
            Cause::ProtocolError => 0x31,
            Cause::Other(raw) => raw,
        }
    }

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x01 => Cause::RadioInterfaceFailure,
            0x20 => Cause::EquipmentFailure,
            0x31 => Cause::ProtocolError,
            other => Cause::Other(other),
        }
    }

    pub fn write(self, buf: &mut OctetBuffer) {
        write_tlv(buf, iei::CAUSE, &[self.to_raw() & 0x7f]);
    }

    /// Read the element value, IEI already consumed.
    pub fn read_value(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let value = read_tlv_value(buf, "cause")?;
        expect_value!(value.len(), 1, "cause_len")?;
        Ok(Cause::from_raw(value[0] & 0x7f))
    }
}
