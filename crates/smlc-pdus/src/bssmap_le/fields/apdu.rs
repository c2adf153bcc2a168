use smlc_core::{OctetBuffer, PduParseErr};

use crate::bsslap::BsslapPdu;

use super::iei;

/// Protocol ID octet inside the APDU IE
const APDU_PROT_BSSLAP: u8 = 0x01;

/// Write a BSSLAP PDU as the APDU IE (TS 49.031, 10.3). Unlike the common
/// TLV elements, the APDU IE carries a two-octet length.
pub fn write_bsslap(buf: &mut OctetBuffer, apdu: &BsslapPdu) -> Result<(), PduParseErr> {
    let mut inner = OctetBuffer::new();
    apdu.to_buf(&mut inner)?;

    buf.write_u8(iei::APDU);
    buf.write_u16(1 + inner.len() as u16);
    buf.write_u8(APDU_PROT_BSSLAP);
    buf.write_bytes(inner.as_slice());
    Ok(())
}

/// Read the element value, IEI already consumed.
pub fn read_bsslap_value(buf: &mut OctetBuffer) -> Result<BsslapPdu, PduParseErr> {
    let len = buf.read_u16("apdu_len")? as usize;
    let mut value = OctetBuffer::from_vec(buf.read_bytes(len, "apdu")?);

    let protocol = value.read_u8("apdu_protocol")? & 0x7f;
    if protocol != APDU_PROT_BSSLAP {
        return Err(PduParseErr::InvalidValue { field: "apdu_protocol", value: protocol as u64 });
    }
    BsslapPdu::from_buf(&mut value)
}
