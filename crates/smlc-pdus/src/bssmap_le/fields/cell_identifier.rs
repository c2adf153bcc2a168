use smlc_core::cell_id::{CellIdentifier, Plmn};
use smlc_core::{OctetBuffer, PduParseErr};

use super::{iei, write_tlv};

/// Encode a PLMN identity as the 3-octet BCD coding of TS 24.008, 10.5.1.3.
pub fn enc_plmn(plmn: &Plmn) -> [u8; 3] {
    let mcc1 = (plmn.mcc / 100) % 10;
    let mcc2 = (plmn.mcc / 10) % 10;
    let mcc3 = plmn.mcc % 10;
    let (mnc1, mnc2, mnc3) = if plmn.mnc_3_digits {
        ((plmn.mnc / 100) % 10, (plmn.mnc / 10) % 10, plmn.mnc % 10)
    } else {
        ((plmn.mnc / 10) % 10, plmn.mnc % 10, 0xf)
    };
    [
        ((mcc2 << 4) | mcc1) as u8,
        ((mnc3 << 4) | mcc3) as u8,
        ((mnc2 << 4) | mnc1) as u8,
    ]
}

pub fn dec_plmn(octets: [u8; 3]) -> Plmn {
    let mcc1 = (octets[0] & 0x0f) as u16;
    let mcc2 = (octets[0] >> 4) as u16;
    let mcc3 = (octets[1] & 0x0f) as u16;
    let mnc3 = (octets[1] >> 4) as u16;
    let mnc1 = (octets[2] & 0x0f) as u16;
    let mnc2 = (octets[2] >> 4) as u16;

    let mcc = mcc1 * 100 + mcc2 * 10 + mcc3;
    if mnc3 == 0xf {
        Plmn { mcc, mnc: mnc1 * 10 + mnc2, mnc_3_digits: false }
    } else {
        Plmn { mcc, mnc: mnc1 * 100 + mnc2 * 10 + mnc3, mnc_3_digits: true }
    }
}

/// Write the Cell Identifier IE (TS 48.008, 3.2.2.17).
pub fn write(buf: &mut OctetBuffer, cell_id: &CellIdentifier) {
    let mut value = OctetBuffer::new();
    value.write_u8(cell_id.discriminator());
    match cell_id {
        CellIdentifier::WholeGlobal { plmn, lac, ci } => {
            value.write_bytes(&enc_plmn(plmn));
            value.write_u16(*lac);
            value.write_u16(*ci);
        }
        CellIdentifier::LacAndCi { lac, ci } => {
            value.write_u16(*lac);
            value.write_u16(*ci);
        }
        CellIdentifier::Ci(ci) => value.write_u16(*ci),
        CellIdentifier::Lac(lac) => value.write_u16(*lac),
        CellIdentifier::NoCell => {}
    }
    write_tlv(buf, iei::CELL_IDENTIFIER, value.as_slice());
}

/// Read the element value, IEI already consumed.
pub fn read_value(buf: &mut OctetBuffer) -> Result<CellIdentifier, PduParseErr> {
    let len = buf.read_u8("cell_id_len")? as usize;
    let mut value = OctetBuffer::from_vec(buf.read_bytes(len, "cell_id")?);

    let discr = value.read_u8("cell_id_discr")? & 0x0f;
    let cell_id = match discr {
        0x00 => {
            let plmn_raw = value.read_bytes(3, "cgi_plmn")?;
            let plmn = dec_plmn([plmn_raw[0], plmn_raw[1], plmn_raw[2]]);
            let lac = value.read_u16("cgi_lac")?;
            let ci = value.read_u16("cgi_ci")?;
            CellIdentifier::WholeGlobal { plmn, lac, ci }
        }
        0x01 => {
            let lac = value.read_u16("lac")?;
            let ci = value.read_u16("ci")?;
            CellIdentifier::LacAndCi { lac, ci }
        }
        0x02 => CellIdentifier::Ci(value.read_u16("ci")?),
        0x03 => CellIdentifier::NoCell,
        0x05 => CellIdentifier::Lac(value.read_u16("lac")?),
        other => {
            return Err(PduParseErr::InvalidValue { field: "cell_id_discr", value: other as u64 })
        }
    };
    if value.remaining() != 0 {
        return Err(PduParseErr::InconsistentLength {
            field: "cell_id",
            expected: len - value.remaining(),
            found: len,
        });
    }
    Ok(cell_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plmn_bcd() {
        let plmn = Plmn { mcc: 1, mnc: 1, mnc_3_digits: false };
        assert_eq!(dec_plmn(enc_plmn(&plmn)), plmn);

        let plmn = Plmn { mcc: 262, mnc: 42, mnc_3_digits: true };
        assert_eq!(dec_plmn(enc_plmn(&plmn)), plmn);

        // 2-digit MNC keeps the filler nibble
        assert_eq!(enc_plmn(&Plmn { mcc: 1, mnc: 1, mnc_3_digits: false })[1] >> 4, 0xf);
    }

    #[test]
    fn cell_id_roundtrip() {
        for cell_id in [
            CellIdentifier::WholeGlobal { plmn: Plmn::new(1, 1), lac: 23, ci: 42 },
            CellIdentifier::LacAndCi { lac: 23, ci: 42 },
            CellIdentifier::Ci(42),
            CellIdentifier::Lac(23),
            CellIdentifier::NoCell,
        ] {
            let mut buf = OctetBuffer::new();
            write(&mut buf, &cell_id);
            let mut rd = OctetBuffer::from_vec(buf.into_vec());
            assert_eq!(rd.read_u8("iei").unwrap(), iei::CELL_IDENTIFIER);
            assert_eq!(read_value(&mut rd).unwrap(), cell_id);
        }
    }
}
