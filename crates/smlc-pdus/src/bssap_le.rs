//! BSSAP-LE envelope (TS 49.031, clause 8)
//!
//! One octet message discriminator, one octet length, then the BSSMAP-LE or
//! DTAP-LE payload.

use core::fmt;

use smlc_core::{OctetBuffer, PduParseErr};

use crate::bssmap_le::{BssmapLeMsgType, BssmapLePdu};

const DISCR_BSSMAP_LE: u8 = 0x00;
const DISCR_DTAP_LE: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BssapLePdu {
    BssmapLe(BssmapLePdu),
    /// Not interpreted; kept raw so the dispatcher can name what it drops
    DtapLe { dlci: u8, l3: Vec<u8> },
}

impl fmt::Display for BssapLePdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BssapLePdu::BssmapLe(pdu) => write!(f, "BSSMAP-LE {}", pdu),
            BssapLePdu::DtapLe { dlci, l3 } => {
                write!(f, "DTAP-LE dlci={} ({} octets)", dlci, l3.len())
            }
        }
    }
}

/// Encode a whole BSSAP-LE message to its octet representation.
pub fn enc(pdu: &BssapLePdu) -> Result<Vec<u8>, PduParseErr> {
    let mut buf = OctetBuffer::new();
    match pdu {
        BssapLePdu::BssmapLe(bssmap_le) => {
            let mut payload = OctetBuffer::new();
            bssmap_le.to_buf(&mut payload)?;
            buf.write_u8(DISCR_BSSMAP_LE);
            buf.write_u8(payload.len() as u8);
            buf.write_bytes(payload.as_slice());
        }
        BssapLePdu::DtapLe { dlci, l3 } => {
            buf.write_u8(DISCR_DTAP_LE);
            buf.write_u8(*dlci);
            buf.write_u8(l3.len() as u8);
            buf.write_bytes(l3);
        }
    }
    Ok(buf.into_vec())
}

/// Decode a whole BSSAP-LE message from its octet representation.
pub fn dec(data: &[u8]) -> Result<BssapLePdu, PduParseErr> {
    let mut buf = OctetBuffer::from_bytes(data);
    let discr = buf.read_u8("bssap_le_discr")?;
    match discr {
        DISCR_BSSMAP_LE => {
            let len = buf.read_u8("bssmap_le_len")? as usize;
            if buf.remaining() != len {
                return Err(PduParseErr::InconsistentLength {
                    field: "bssmap_le_len",
                    expected: len,
                    found: buf.remaining(),
                });
            }
            let mut payload = OctetBuffer::from_vec(buf.read_rest());
            Ok(BssapLePdu::BssmapLe(BssmapLePdu::from_buf(&mut payload)?))
        }
        DISCR_DTAP_LE => {
            let dlci = buf.read_u8("dlci")?;
            let len = buf.read_u8("dtap_le_len")? as usize;
            let l3 = buf.read_bytes(len, "dtap_le_l3")?;
            Ok(BssapLePdu::DtapLe { dlci, l3 })
        }
        other => Err(PduParseErr::InvalidValue { field: "bssap_le_discr", value: other as u64 }),
    }
}

/// Peek at the BSSMAP-LE message type without a full decode. Used to
/// classify connectionless messages before routing them to a peer.
pub fn bssmap_le_msg_type(data: &[u8]) -> Option<BssmapLeMsgType> {
    if data.len() < 3 || data[0] != DISCR_BSSMAP_LE {
        return None;
    }
    BssmapLeMsgType::try_from_raw(data[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsslap::BsslapPdu;
    use crate::bssmap_le::fields::cause::Cause;
    use crate::bssmap_le::fields::lcs_cause::LcsCause;
    use crate::bssmap_le::fields::location_type::LocationType;
    use crate::bssmap_le::pdus::conn_oriented_info::ConnOrientedInfo;
    use crate::bssmap_le::pdus::perform_loc_abort::PerformLocAbort;
    use crate::bssmap_le::pdus::perform_loc_req::PerformLocReq;
    use crate::bssmap_le::pdus::perform_loc_resp::PerformLocResp;
    use crate::bssmap_le::pdus::reset::Reset;
    use smlc_core::cell_id::{CellIdentifier, Plmn};
    use smlc_core::gad::{self, Gad};
    use smlc_core::identity::Imsi;

    fn roundtrip(pdu: BssapLePdu) {
        let bytes = enc(&pdu).unwrap();
        assert_eq!(dec(&bytes).unwrap(), pdu);
    }

    #[test]
    fn reset_and_ack() {
        roundtrip(BssapLePdu::BssmapLe(BssmapLePdu::Reset(Reset {
            cause: Cause::EquipmentFailure,
        })));
        roundtrip(BssapLePdu::BssmapLe(BssmapLePdu::ResetAck));
    }

    #[test]
    fn perform_loc_req_with_imsi_and_apdu() {
        roundtrip(BssapLePdu::BssmapLe(BssmapLePdu::PerformLocReq(PerformLocReq {
            location_type: LocationType::current_geographic(),
            cell_id: CellIdentifier::WholeGlobal { plmn: Plmn::new(1, 1), lac: 23, ci: 42 },
            imsi: Some(Imsi::new("1234567890").unwrap()),
            apdu: Some(BsslapPdu::TaLayer3 { ta: 5 }),
        })));
    }

    #[test]
    fn perform_loc_resp_variants() {
        roundtrip(BssapLePdu::BssmapLe(BssmapLePdu::PerformLocResp(PerformLocResp {
            location_estimate: Some(Gad::EllipsoidPointUncCircle {
                lat: 23_000_000,
                lon: 42_000_000,
                // pick a representable uncertainty so equality holds
                unc_mm: gad::dec_unc(59),
            }),
            lcs_cause: None,
        })));
        roundtrip(BssapLePdu::BssmapLe(BssmapLePdu::PerformLocResp(PerformLocResp {
            location_estimate: None,
            lcs_cause: Some(LcsCause::SystemFailure),
        })));
    }

    #[test]
    fn conn_oriented_info_and_abort() {
        roundtrip(BssapLePdu::BssmapLe(BssmapLePdu::ConnOrientedInfo(ConnOrientedInfo {
            apdu: BsslapPdu::TaRequest,
        })));
        roundtrip(BssapLePdu::BssmapLe(BssmapLePdu::PerformLocAbort(PerformLocAbort {
            lcs_cause: LcsCause::Unspecified,
        })));
    }

    #[test]
    fn msg_type_peek() {
        let bytes =
            enc(&BssapLePdu::BssmapLe(BssmapLePdu::Reset(Reset { cause: Cause::EquipmentFailure })))
                .unwrap();
        assert_eq!(bssmap_le_msg_type(&bytes), Some(BssmapLeMsgType::Reset));
        assert_eq!(bssmap_le_msg_type(&[]), None);
    }

    #[test]
    fn dec_rejects_garbage() {
        assert!(dec(&[]).is_err());
        assert!(dec(&[0x00, 0x05, 0x30]).is_err()); // length beyond buffer
        assert!(dec(&[0x07, 0x00]).is_err()); // unknown discriminator
    }

    #[test]
    fn lat_lon_estimate_roundtrip_is_lossy_but_close() {
        let pdu = BssapLePdu::BssmapLe(BssmapLePdu::PerformLocResp(PerformLocResp {
            location_estimate: Some(Gad::EllipsoidPointUncCircle {
                lat: 52_521_918,
                lon: 13_413_215,
                unc_mm: gad::dec_unc(10),
            }),
            lcs_cause: None,
        }));
        let bytes = enc(&pdu).unwrap();
        let BssapLePdu::BssmapLe(BssmapLePdu::PerformLocResp(resp)) = dec(&bytes).unwrap() else {
            panic!("wrong message type");
        };
        let Some(Gad::EllipsoidPointUncCircle { lat, lon, .. }) = resp.location_estimate else {
            panic!("estimate missing");
        };
        assert!((lat - 52_521_918).abs() < 22);
        assert!((lon - 13_413_215).abs() < 43);
    }
}
