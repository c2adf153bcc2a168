use smlc_core::cell_id::CellIdentifier;
use smlc_core::identity::Imsi;
use smlc_core::{OctetBuffer, PduParseErr};

use crate::bsslap::BsslapPdu;
use crate::bssmap_le::fields::location_type::LocationType;
use crate::bssmap_le::fields::{apdu, cell_identifier, iei, mobile_identity, skip_tlv};

/// PERFORM LOCATION REQUEST (TS 49.031, 9.1): the BSC asks for a location
/// estimate for the subscriber behind this connection. A BSSLAP TA-LAYER3
/// APDU may piggy-back the timing advance the BSC already knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformLocReq {
    pub location_type: LocationType,
    pub cell_id: CellIdentifier,
    pub imsi: Option<Imsi>,
    pub apdu: Option<BsslapPdu>,
}

impl PerformLocReq {
    pub fn to_buf(&self, buf: &mut OctetBuffer) -> Result<(), PduParseErr> {
        self.location_type.write(buf);
        cell_identifier::write(buf, &self.cell_id);
        if let Some(imsi) = &self.imsi {
            mobile_identity::write_imsi(buf, imsi);
        }
        if let Some(pdu) = &self.apdu {
            apdu::write_bsslap(buf, pdu)?;
        }
        Ok(())
    }

    pub fn from_buf(buf: &mut OctetBuffer) -> Result<Self, PduParseErr> {
        let mut location_type = None;
        let mut cell_id = None;
        let mut imsi = None;
        let mut bsslap = None;

        while buf.remaining() > 0 {
            let tag = buf.read_u8("iei")?;
            match tag {
                iei::LOCATION_TYPE => location_type = Some(LocationType::read_value(buf)?),
                iei::CELL_IDENTIFIER => cell_id = Some(cell_identifier::read_value(buf)?),
                iei::IMSI => imsi = Some(mobile_identity::read_imsi_value(buf)?),
                iei::APDU => bsslap = Some(apdu::read_bsslap_value(buf)?),
                other => skip_tlv(buf, other)?,
            }
        }

        Ok(PerformLocReq {
            location_type: location_type
                .ok_or(PduParseErr::MissingIe { iei: iei::LOCATION_TYPE })?,
            cell_id: cell_id.ok_or(PduParseErr::MissingIe { iei: iei::CELL_IDENTIFIER })?,
            imsi,
            apdu: bsslap,
        })
    }
}
