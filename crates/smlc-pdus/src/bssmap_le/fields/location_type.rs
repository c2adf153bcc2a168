use smlc_core::{OctetBuffer, PduParseErr};

use super::{iei, read_tlv_value, write_tlv};

/// Location Information values within the Location Type IE (TS 49.031, 10.18)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationInformation {
    CurrentGeographic = 0x00,
    AssistanceForTarget = 0x01,
    BcDecipheringKeys = 0x02,
}

impl LocationInformation {
    pub fn try_from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x00 => Some(Self::CurrentGeographic),
            0x01 => Some(Self::AssistanceForTarget),
            0x02 => Some(Self::BcDecipheringKeys),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationType {
    pub location_information: LocationInformation,
    /// Present when the location information asks for assistance data
    pub positioning_method: Option<u8>,
}

impl LocationType {
    /// The common case: where is the target right now.
    pub fn current_geographic() -> Self {
        Self {
            location_information: LocationInformation::CurrentGeographic,
            positioning_method: None,
        }
    }

    pub fn write(&self, buf: &mut OctetBuffer) {
        let mut value = vec![self.location_information as u8];
        if let Some(method) = self.positioning_method {
            value.push(method);
        }
        write_tlv(buf, iei::LOCATION_TYPE, &value);
    }

    /// Read the element value, IEI already consumed.
    pub fn read_value(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let value = read_tlv_value(buf, "location_type")?;
        let raw = *value.first().ok_or(PduParseErr::BufferEnded { field: "location_type" })?;
        let location_information = LocationInformation::try_from_raw(raw)
            .ok_or(PduParseErr::InvalidValue { field: "location_information", value: raw as u64 })?;
        Ok(Self { location_information, positioning_method: value.get(1).copied() })
    }
}
