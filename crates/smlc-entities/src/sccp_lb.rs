//! SCCP user adapter for the Lb interface
//!
//! Owns the peer/connection/request stores, translates upward SCCP-user
//! primitives into peer events and pushes downward primitives into the
//! transport.

use smlc_core::{SccpConnId, SCCP_CONN_ID_MAX};
use smlc_saps::prim::{ScuPrimDown, ScuPrimUp};
use smlc_saps::sccp::SccpAddr;
use smlc_saps::transport::{SccpTransport, TransportErr};

use crate::lb_conn::LbConn;
use crate::lb_peer::{self, LbPeer, LbPeerEv};
use crate::loc_req::{LocReq, LocReqId};
use crate::smlc::Smlc;

/// All Lb-side state bound to one SCCP instance: peers, connections and the
/// location requests parented to the peers.
pub struct SccpLbInst {
    pub local_addr: SccpAddr,
    pub(crate) peers: Vec<LbPeer>,
    pub(crate) conns: Vec<LbConn>,
    pub(crate) loc_reqs: Vec<LocReq>,
    next_conn_id: u32,
    next_loc_req_id: LocReqId,
    pub(crate) transport: Box<dyn SccpTransport>,
}

/// The 24-bit connection id space is fully occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnIdExhausted;

impl SccpLbInst {
    pub fn new(local_addr: SccpAddr, transport: Box<dyn SccpTransport>) -> Self {
        Self {
            local_addr,
            peers: Vec::new(),
            conns: Vec::new(),
            loc_reqs: Vec::new(),
            next_conn_id: 1,
            next_loc_req_id: 1,
            transport,
        }
    }

    pub fn conn(&self, conn_id: SccpConnId) -> Option<&LbConn> {
        self.conns.iter().find(|c| c.sccp_conn_id == conn_id)
    }

    pub(crate) fn conn_mut(&mut self, conn_id: SccpConnId) -> Option<&mut LbConn> {
        self.conns.iter_mut().find(|c| c.sccp_conn_id == conn_id)
    }

    pub fn peer(&self, addr: &SccpAddr) -> Option<&LbPeer> {
        self.peers.iter().find(|p| p.peer_addr == *addr)
    }

    pub(crate) fn peer_mut(&mut self, addr: &SccpAddr) -> Option<&mut LbPeer> {
        self.peers.iter_mut().find(|p| p.peer_addr == *addr)
    }

    pub fn loc_req(&self, id: LocReqId) -> Option<&LocReq> {
        self.loc_reqs.iter().find(|l| l.id == id)
    }

    pub fn num_peers(&self) -> usize {
        self.peers.len()
    }

    pub fn num_conns(&self) -> usize {
        self.conns.len()
    }

    pub fn loc_reqs_is_empty(&self) -> bool {
        self.loc_reqs.is_empty()
    }

    pub(crate) fn loc_req_mut(&mut self, id: LocReqId) -> Option<&mut LocReq> {
        self.loc_reqs.iter_mut().find(|l| l.id == id)
    }

    pub(crate) fn alloc_loc_req_id(&mut self) -> LocReqId {
        let id = self.next_loc_req_id;
        self.next_loc_req_id = self.next_loc_req_id.wrapping_add(1).max(1);
        id
    }

    /// Pick an SCCP conn id unused across all connections. In most cases the
    /// running counter already points at a free id; the scan only confirms
    /// that.
    pub(crate) fn next_conn_id(&mut self) -> Result<SccpConnId, ConnIdExhausted> {
        for _ in 0..SCCP_CONN_ID_MAX {
            let conn_id = self.next_conn_id;
            self.next_conn_id = (self.next_conn_id + 1) & (SCCP_CONN_ID_MAX - 1);
            if self.conn(conn_id).is_none() {
                return Ok(conn_id);
            }
        }
        Err(ConnIdExhausted)
    }
}

/// Hand a primitive to the transport, keeping the Tx counters.
pub(crate) fn sap_down(smlc: &mut Smlc, prim: ScuPrimDown) -> Result<(), TransportErr> {
    match smlc.lb.transport.sap_down(prim) {
        Ok(()) => {
            smlc.ctrs.tx_success += 1;
            Ok(())
        }
        Err(TransportErr::NotReady) => {
            smlc.ctrs.tx_err_conn_not_ready += 1;
            Err(TransportErr::NotReady)
        }
        Err(err) => {
            smlc.ctrs.tx_err_send += 1;
            Err(err)
        }
    }
}

pub fn down_l2_co_initial(
    smlc: &mut Smlc,
    called_addr: SccpAddr,
    conn_id: SccpConnId,
    l2: Vec<u8>,
) -> Result<(), TransportErr> {
    let calling_addr = smlc.lb.local_addr;
    sap_down(smlc, ScuPrimDown::ConnectReq { conn_id, called_addr, calling_addr, data: l2 })
}

pub fn down_l2_co(smlc: &mut Smlc, conn_id: SccpConnId, l2: Vec<u8>) -> Result<(), TransportErr> {
    sap_down(smlc, ScuPrimDown::DataReq { conn_id, data: l2 })
}

pub fn down_l2_cl(
    smlc: &mut Smlc,
    called_addr: SccpAddr,
    l2: Vec<u8>,
) -> Result<(), TransportErr> {
    let calling_addr = smlc.lb.local_addr;
    sap_down(smlc, ScuPrimDown::UnitdataReq { called_addr, calling_addr, data: l2 })
}

pub fn tx_disconnect(smlc: &mut Smlc, conn_id: SccpConnId, cause: u8) -> Result<(), TransportErr> {
    sap_down(smlc, ScuPrimDown::DisconnectReq { conn_id, cause })
}

/// Entry point for all upward SCCP-user primitives.
pub fn rx_prim(smlc: &mut Smlc, prim: ScuPrimUp) {
    tracing::debug!("rx {}", prim);
    match prim {
        ScuPrimUp::ConnectInd { conn_id, called_addr, calling_addr, data } => {
            if data.is_empty() {
                tracing::warn!("(Lb-{} from {}) Received invalid N-CONNECT.ind", conn_id, calling_addr);
                return;
            }
            if called_addr != smlc.lb.local_addr {
                tracing::error!(
                    "Rx N-CONNECT: Called address is {} != local address {}",
                    called_addr,
                    smlc.lb.local_addr
                );
            }
            // ensure the local SCCP socket is ACTIVE
            let responding_addr = smlc.lb.local_addr;
            let _ = sap_down(smlc, ScuPrimDown::ConnectResp { conn_id, responding_addr });

            if lb_peer::up_l2(smlc, Some(calling_addr), true, conn_id, data).is_err() {
                let _ = tx_disconnect(smlc, conn_id, 0);
            }
        }
        ScuPrimUp::DataInd { conn_id, data } => {
            let _ = lb_peer::up_l2(smlc, None, true, conn_id, data);
        }
        ScuPrimUp::DisconnectInd { conn_id, cause, data } => {
            tracing::debug!("(Lb-{}) disconnected, cause {}", conn_id, cause);
            if !data.is_empty() {
                let _ = lb_peer::up_l2(smlc, None, true, conn_id, data);
            }
            // Drop the conn even if the dispatch above already caused
            // cleanup; the lookup below just finds nothing then.
            lb_peer::disconnect(smlc, conn_id);
        }
        ScuPrimUp::UnitdataInd { called_addr, calling_addr, data } => {
            if called_addr != smlc.lb.local_addr {
                tracing::error!(
                    "Rx N-UNITDATA: Called address is {} != local address {}",
                    called_addr,
                    smlc.lb.local_addr
                );
            }
            let _ = lb_peer::up_l2(smlc, Some(calling_addr), false, 0, data);
        }
        ScuPrimUp::NoticeInd { calling_addr, cause, importance } => {
            handle_notice_ind(smlc, calling_addr, cause, importance);
        }
        ScuPrimUp::PcstateInd { affected_pc, sp_status, remote_sccp_status } => {
            handle_pcstate_ind(smlc, affected_pc, sp_status, remote_sccp_status);
        }
    }
}

fn handle_notice_ind(
    smlc: &mut Smlc,
    calling_addr: SccpAddr,
    cause: smlc_saps::sccp::SccpReturnCause,
    importance: u8,
) {
    if smlc.lb.peer(&calling_addr).is_none() {
        tracing::debug!(
            "(calling_addr={}) N-NOTICE.ind cause={} importance={} didn't match any lb_peer, ignoring",
            calling_addr,
            cause,
            importance
        );
        return;
    }

    tracing::warn!("peer {}: N-NOTICE.ind cause={} importance={}", calling_addr, cause, importance);

    if cause.is_transient() {
        // Transient failures (hopefully), keep going.
        return;
    }

    // Messages are not arriving at the peer. Mark it unavailable.
    let _ = lb_peer::handle_event(smlc, calling_addr, LbPeerEv::Unavailable);
}

fn handle_pcstate_ind(
    smlc: &mut Smlc,
    affected_pc: u32,
    sp_status: smlc_saps::sccp::SpStatus,
    remote_sccp_status: smlc_saps::sccp::RemoteSccpStatus,
) {
    use smlc_saps::sccp::{RemoteSccpStatus, SpStatus};

    // If we don't care about that point-code, ignore the PCSTATE.
    let Some(peer_addr) = smlc
        .lb
        .peers
        .iter()
        .find(|p| p.peer_addr.pc.is_some_and(|pc| pc.0 == affected_pc))
        .map(|p| p.peer_addr)
    else {
        tracing::debug!("No lb_peer found under pc={}", affected_pc);
        return;
    };

    // Two separate indicators. A disconnection event needs only one of them
    // reporting loss; a connection event needs a positive indicator and no
    // loss. Congestion indicates neither.
    let mut connected = false;
    let mut disconnected = false;

    match sp_status {
        SpStatus::Accessible => connected = true,
        SpStatus::Inaccessible => disconnected = true,
        SpStatus::Congested => {}
    }

    match remote_sccp_status {
        RemoteSccpStatus::Available => {
            if !disconnected {
                connected = true;
            }
        }
        RemoteSccpStatus::UnavailableUnknown
        | RemoteSccpStatus::Unequipped
        | RemoteSccpStatus::Inaccessible => {
            disconnected = true;
            connected = false;
        }
        RemoteSccpStatus::Congested => {}
    }

    if disconnected {
        tracing::warn!(
            "peer {} now unreachable: N-PCSTATE sp_status={:?} remote_sccp_status={:?}",
            peer_addr,
            sp_status,
            remote_sccp_status
        );
        let _ = lb_peer::handle_event(smlc, peer_addr, LbPeerEv::Unavailable);
    } else if connected {
        tracing::info!(
            "peer {} now available: N-PCSTATE sp_status={:?} remote_sccp_status={:?}",
            peer_addr,
            sp_status,
            remote_sccp_status
        );
        let _ = lb_peer::handle_event(smlc, peer_addr, LbPeerEv::Available);
    }
}
