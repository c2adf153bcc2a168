#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use smlc_core::debug;
use smlc_core::Tdefs;
use smlc_entities::{sccp_lb, Smlc};
use smlc_pdus::bssap_le::{self, BssapLePdu};
use smlc_pdus::bssmap_le::BssmapLePdu;
use smlc_saps::prim::{ScuPrimDown, ScuPrimUp};
use smlc_saps::sccp::{SccpAddr, SSN_SMLC_BSSAP_LE};
use smlc_saps::transport::{SccpTransport, TransportErr};

/// Transport sink for testing purposes
/// Collects all downward primitives for later inspection
pub struct Sink {
    sent: Rc<RefCell<Vec<ScuPrimDown>>>,
}

impl SccpTransport for Sink {
    fn sap_down(&mut self, prim: ScuPrimDown) -> Result<(), TransportErr> {
        tracing::debug!("sink: {}", prim);
        self.sent.borrow_mut().push(prim);
        Ok(())
    }
}

/// Quick setup of the full Lb engine over a recording transport
pub struct LbTest {
    pub smlc: Smlc,
    sent: Rc<RefCell<Vec<ScuPrimDown>>>,
}

pub fn local_addr() -> SccpAddr {
    SccpAddr::pc_ssn(190, SSN_SMLC_BSSAP_LE)
}

pub fn bsc_addr(pc: u32) -> SccpAddr {
    SccpAddr::pc_ssn(pc, 250)
}

impl LbTest {
    pub fn new() -> Self {
        debug::setup_logging_verbose();
        let sent = Rc::new(RefCell::new(Vec::new()));
        let smlc = Smlc::new(
            local_addr(),
            Tdefs::default(),
            Box::new(Sink { sent: Rc::clone(&sent) }),
        );
        Self { smlc, sent }
    }

    pub fn take_sent(&mut self) -> Vec<ScuPrimDown> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }

    pub fn rx_prim(&mut self, prim: ScuPrimUp) {
        sccp_lb::rx_prim(&mut self.smlc, prim);
    }

    pub fn rx_cl(&mut self, from: SccpAddr, pdu: BssmapLePdu) {
        self.rx_prim(ScuPrimUp::UnitdataInd {
            called_addr: local_addr(),
            calling_addr: from,
            data: enc(pdu),
        });
    }

    pub fn rx_co_initial(&mut self, from: SccpAddr, conn_id: u32, pdu: BssmapLePdu) {
        self.rx_prim(ScuPrimUp::ConnectInd {
            conn_id,
            called_addr: local_addr(),
            calling_addr: from,
            data: enc(pdu),
        });
    }

    pub fn rx_co(&mut self, conn_id: u32, pdu: BssmapLePdu) {
        self.rx_prim(ScuPrimUp::DataInd { conn_id, data: enc(pdu) });
    }

    /// Drive the peer through its inbound RESET handshake and drain the
    /// RESET ACKNOWLEDGE this produces.
    pub fn reset_handshake(&mut self, peer: SccpAddr) {
        self.rx_cl(peer, BssmapLePdu::Reset(smlc_pdus::bssmap_le::pdus::reset::Reset {
            cause: smlc_pdus::bssmap_le::fields::cause::Cause::EquipmentFailure,
        }));
        let sent = self.take_sent();
        let acks = unitdata_pdus(&sent);
        assert!(
            matches!(acks.as_slice(), [BssmapLePdu::ResetAck]),
            "expected RESET ACKNOWLEDGE, got {:?}",
            sent
        );
    }

    /// Move the clock and run due timers.
    pub fn elapse(&mut self, duration: Duration) {
        self.smlc.advance(duration);
        self.smlc.poll_timers();
    }
}

pub fn enc(pdu: BssmapLePdu) -> Vec<u8> {
    bssap_le::enc(&BssapLePdu::BssmapLe(pdu)).expect("encodable test PDU")
}

pub fn dec(data: &[u8]) -> BssmapLePdu {
    match bssap_le::dec(data).expect("decodable test PDU") {
        BssapLePdu::BssmapLe(pdu) => pdu,
        other => panic!("unexpected {:?}", other),
    }
}

/// Decoded payloads of all N-DATA.req primitives, in order
pub fn data_req_pdus(sent: &[ScuPrimDown]) -> Vec<BssmapLePdu> {
    sent.iter()
        .filter_map(|prim| match prim {
            ScuPrimDown::DataReq { data, .. } => Some(dec(data)),
            _ => None,
        })
        .collect()
}

/// Decoded payloads of all N-UNITDATA.req primitives, in order
pub fn unitdata_pdus(sent: &[ScuPrimDown]) -> Vec<BssmapLePdu> {
    sent.iter()
        .filter_map(|prim| match prim {
            ScuPrimDown::UnitdataReq { data, .. } => Some(dec(data)),
            _ => None,
        })
        .collect()
}

/// Conn ids of all N-DISCONNECT.req primitives, in order
pub fn disconnect_conn_ids(sent: &[ScuPrimDown]) -> Vec<u32> {
    sent.iter()
        .filter_map(|prim| match prim {
            ScuPrimDown::DisconnectReq { conn_id, .. } => Some(*conn_id),
            _ => None,
        })
        .collect()
}
