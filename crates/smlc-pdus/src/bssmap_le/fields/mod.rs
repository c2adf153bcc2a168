//! Information elements shared between BSSMAP-LE messages

pub mod apdu;
pub mod cause;
pub mod cell_identifier;
pub mod lcs_cause;
pub mod location_estimate;
pub mod location_type;
pub mod mobile_identity;

use smlc_core::{OctetBuffer, PduParseErr};

/// IEI values (TS 49.031 clause 10; 48.008-inherited elements keep their
/// 48.008 codepoints)
pub mod iei {
    pub const IMSI: u8 = 0x00;
    pub const CAUSE: u8 = 0x04;
    pub const CELL_IDENTIFIER: u8 = 0x05;
    pub const LOCATION_TYPE: u8 = 0x44;
    pub const LOCATION_ESTIMATE: u8 = 0x45;
    pub const LCS_CAUSE: u8 = 0x47;
    pub const APDU: u8 = 0x49;
}

/// Write a TLV element with a one-octet length.
pub fn write_tlv(buf: &mut OctetBuffer, iei: u8, value: &[u8]) {
    buf.write_u8(iei);
    buf.write_u8(value.len() as u8);
    buf.write_bytes(value);
}

/// Read the length and value of a TLV element whose IEI has been consumed.
pub fn read_tlv_value(buf: &mut OctetBuffer, field: &'static str) -> Result<Vec<u8>, PduParseErr> {
    let len = buf.read_u8(field)? as usize;
    buf.read_bytes(len, field)
}

/// Skip over a TLV element we do not understand.
pub fn skip_tlv(buf: &mut OctetBuffer, iei: u8) -> Result<(), PduParseErr> {
    let len = buf.read_u8("skipped_ie_len")? as usize;
    buf.read_bytes(len, "skipped_ie_value")?;
    tracing::debug!("skipping unknown IE 0x{:02x} ({} octets)", iei, len);
    Ok(())
}
