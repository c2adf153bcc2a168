use smlc_core::gad::{self, Gad, GAD_TYPE_ELL_POINT_UNC_CIRCLE};
use smlc_core::{OctetBuffer, PduParseErr};

use super::{iei, read_tlv_value, write_tlv};

/// Write a GAD shape as the Location Estimate IE (TS 49.031, 10.18 /
/// TS 23.032).
pub fn write(buf: &mut OctetBuffer, estimate: &Gad) -> Result<(), PduParseErr> {
    let mut value = OctetBuffer::new();
    match estimate {
        Gad::EllipsoidPointUncCircle { lat, lon, unc_mm } => {
            value.write_u8(GAD_TYPE_ELL_POINT_UNC_CIRCLE);
            value.write_u24(gad::enc_lat(*lat).map_err(|_| PduParseErr::InvalidValue {
                field: "latitude",
                value: *lat as u64,
            })?);
            value.write_u24(gad::enc_lon(*lon).map_err(|_| PduParseErr::InvalidValue {
                field: "longitude",
                value: *lon as u64,
            })?);
            value.write_u8(gad::enc_unc(*unc_mm));
        }
    }
    write_tlv(buf, iei::LOCATION_ESTIMATE, value.as_slice());
    Ok(())
}

/// Read the element value, IEI already consumed.
pub fn read_value(buf: &mut OctetBuffer) -> Result<Gad, PduParseErr> {
    let mut value = OctetBuffer::from_vec(read_tlv_value(buf, "location_estimate")?);
    let shape = value.read_u8("gad_type")?;
    match shape {
        GAD_TYPE_ELL_POINT_UNC_CIRCLE => {
            let lat = gad::dec_lat(value.read_u24("latitude")?);
            let lon = gad::dec_lon(value.read_u24("longitude")?);
            let unc_mm = gad::dec_unc(value.read_u8("uncertainty")?);
            Ok(Gad::EllipsoidPointUncCircle { lat, lon, unc_mm })
        }
        other => Err(PduParseErr::InvalidValue { field: "gad_type", value: other as u64 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_roundtrip() {
        let estimate = Gad::EllipsoidPointUncCircle {
            lat: 23_000_000,
            lon: 42_000_000,
            unc_mm: gad::dec_unc(gad::enc_unc(2_750_000)),
        };
        let mut buf = OctetBuffer::new();
        write(&mut buf, &estimate).unwrap();
        let mut rd = OctetBuffer::from_vec(buf.into_vec());
        assert_eq!(rd.read_u8("iei").unwrap(), iei::LOCATION_ESTIMATE);

        let Gad::EllipsoidPointUncCircle { lat, lon, unc_mm } = read_value(&mut rd).unwrap();
        assert!((lat - 23_000_000).abs() < 22);
        assert!((lon - 42_000_000).abs() < 43);
        // uncertainty was already representable, decode is exact
        let Gad::EllipsoidPointUncCircle { unc_mm: orig, .. } = estimate;
        assert_eq!(unc_mm, orig);
    }
}
