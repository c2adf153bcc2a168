use smlc_core::identity::Imsi;
use smlc_core::{OctetBuffer, PduParseErr};

use super::{iei, read_tlv_value, write_tlv};

const MI_TYPE_IMSI: u8 = 0x01;

/// Write an IMSI as a Mobile Identity IE (TS 24.008, 10.5.1.4).
pub fn write_imsi(buf: &mut OctetBuffer, imsi: &Imsi) {
    let digits: Vec<u8> = imsi.digits().bytes().map(|b| b - b'0').collect();
    let odd = digits.len() % 2 == 1;

    let mut value = Vec::with_capacity(1 + digits.len() / 2);
    value.push((digits[0] << 4) | ((odd as u8) << 3) | MI_TYPE_IMSI);
    let mut rest = digits[1..].chunks_exact(2);
    for pair in &mut rest {
        value.push((pair[1] << 4) | pair[0]);
    }
    if let [last] = rest.remainder() {
        value.push(0xf0 | last);
    }
    write_tlv(buf, iei::IMSI, &value);
}

/// Read the element value, IEI already consumed.
pub fn read_imsi_value(buf: &mut OctetBuffer) -> Result<Imsi, PduParseErr> {
    let value = read_tlv_value(buf, "imsi")?;
    if value.is_empty() {
        return Err(PduParseErr::BufferEnded { field: "imsi" });
    }
    if value[0] & 0x07 != MI_TYPE_IMSI {
        return Err(PduParseErr::InvalidValue {
            field: "mobile_identity_type",
            value: (value[0] & 0x07) as u64,
        });
    }
    let odd = value[0] & 0x08 != 0;

    let mut digits = String::new();
    digits.push(char::from(b'0' + (value[0] >> 4)));
    for (i, octet) in value[1..].iter().enumerate() {
        digits.push(char::from(b'0' + (octet & 0x0f)));
        let hi = octet >> 4;
        let is_last = i == value.len() - 2;
        if is_last && !odd {
            if hi != 0xf {
                return Err(PduParseErr::InvalidValue { field: "imsi_filler", value: hi as u64 });
            }
        } else {
            digits.push(char::from(b'0' + hi));
        }
    }

    Imsi::new(&digits)
        .map_err(|_| PduParseErr::InvalidValue { field: "imsi", value: digits.len() as u64 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imsi_roundtrip() {
        for digits in ["1234567890", "123456789012345", "262420"] {
            let imsi = Imsi::new(digits).unwrap();
            let mut buf = OctetBuffer::new();
            write_imsi(&mut buf, &imsi);
            let mut rd = OctetBuffer::from_vec(buf.into_vec());
            assert_eq!(rd.read_u8("iei").unwrap(), iei::IMSI);
            assert_eq!(read_imsi_value(&mut rd).unwrap(), imsi);
        }
    }

    #[test]
    fn even_imsi_has_filler() {
        let imsi = Imsi::new("1234567890").unwrap();
        let mut buf = OctetBuffer::new();
        write_imsi(&mut buf, &imsi);
        let bytes = buf.into_vec();
        assert_eq!(bytes[bytes.len() - 1] >> 4, 0xf);
    }
}
