//! One connection-oriented SCCP conversation with a BSC

use core::fmt;

use smlc_core::identity::Imsi;
use smlc_core::{PduParseErr, SccpConnId, UseCount};
use smlc_pdus::bssap_le::{self, BssapLePdu};
use smlc_pdus::bssmap_le::fields::lcs_cause::LcsCause;
use smlc_pdus::bssmap_le::BssmapLePdu;
use smlc_saps::sccp::SccpAddr;
use smlc_saps::transport::TransportErr;

use crate::lb_peer::LbPeerState;
use crate::loc_req::{self, LocReqId, TermCause};
use crate::sccp_lb::{self, ConnIdExhausted};
use crate::smlc::Smlc;
use crate::subscr::SMLC_SUBSCR_USE_LB_CONN;

/// Use tag held by an active location request on its conn
pub const LB_CONN_USE_LOC_REQ: &str = "smlc_loc_req";

pub struct LbConn {
    /// Owning peer; None once the peer is gone and the conn only awaits
    /// cleanup
    pub peer: Option<SccpAddr>,
    pub sccp_conn_id: SccpConnId,
    pub closing: bool,
    pub use_count: UseCount,
    pub subscr: Option<Imsi>,
    pub loc_req: Option<LocReqId>,
}

impl fmt::Display for LbConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lb-{}", self.sccp_conn_id)?;
        match &self.subscr {
            Some(imsi) => write!(f, " {}", imsi)?,
            None => write!(f, " no-subscr")?,
        }
        write!(f, " [{}]", self.use_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendErr {
    /// Encoding the PDU failed; nothing was sent
    Encode,
    /// The owning peer is gone or not in a state to carry CO traffic
    ConnNotReady,
    Transport(TransportErr),
}

fn alloc(smlc: &mut Smlc, peer_addr: SccpAddr, sccp_conn_id: SccpConnId, use_token: &'static str) -> SccpConnId {
    let mut conn = LbConn {
        peer: Some(peer_addr),
        sccp_conn_id,
        closing: false,
        use_count: UseCount::new(),
        subscr: None,
        loc_req: None,
    };
    conn.use_count.get(use_token);
    smlc.lb.conns.push(conn);
    sccp_conn_id
}

pub fn create_incoming(
    smlc: &mut Smlc,
    peer_addr: SccpAddr,
    sccp_conn_id: SccpConnId,
    use_token: &'static str,
) -> SccpConnId {
    tracing::debug!("peer {}: incoming lb_conn id: {}", peer_addr, sccp_conn_id);
    alloc(smlc, peer_addr, sccp_conn_id, use_token)
}

pub fn create_outgoing(
    smlc: &mut Smlc,
    peer_addr: SccpAddr,
    use_token: &'static str,
) -> Result<SccpConnId, ConnIdExhausted> {
    let sccp_conn_id = smlc.lb.next_conn_id()?;
    tracing::debug!("peer {}: outgoing lb_conn id: {}", peer_addr, sccp_conn_id);
    Ok(alloc(smlc, peer_addr, sccp_conn_id, use_token))
}

/// Find another conn already bound to this subscriber.
pub fn find_by_subscr(smlc: &Smlc, imsi: &Imsi, exclude: SccpConnId) -> Option<SccpConnId> {
    smlc.lb
        .conns
        .iter()
        .find(|c| c.subscr.as_ref() == Some(imsi) && c.sccp_conn_id != exclude)
        .map(|c| c.sccp_conn_id)
}

pub fn get(smlc: &mut Smlc, conn_id: SccpConnId, tag: &'static str) {
    let conn = smlc.lb.conn_mut(conn_id).unwrap_or_else(|| panic!("get on unknown conn {}", conn_id));
    let total = conn.use_count.get(tag);
    tracing::trace!("{} + {} ({})", conn, tag, total);
}

/// Release one hold; the conn is closed once nothing holds it anymore.
pub fn put(smlc: &mut Smlc, conn_id: SccpConnId, tag: &'static str) {
    let conn = smlc.lb.conn_mut(conn_id).unwrap_or_else(|| panic!("put on unknown conn {}", conn_id));
    let total = conn.use_count.put(tag);
    tracing::trace!("{} - {} ({})", conn, tag, total);
    if total == 0 {
        close(smlc, conn_id);
    }
}

/// Receive path: decode BSSAP-LE and hand the PDU to the location request
/// engine.
pub fn rx(smlc: &mut Smlc, conn_id: SccpConnId, msg: &[u8]) -> Result<(), PduParseErr> {
    let pdu = match bssap_le::dec(msg) {
        Ok(pdu) => pdu,
        Err(err) => {
            smlc.ctrs.rx_dt1_err_invalid_msg += 1;
            tracing::error!("(Lb-{}) Rx BSSAP-LE with error: {}", conn_id, err);
            // A request in flight cannot complete on garbage input. The
            // stored request was well-formed, so a response can still go out.
            if smlc.lb.conn(conn_id).is_some_and(|c| c.loc_req.is_some()) {
                loc_req::fail_for_conn(
                    smlc,
                    conn_id,
                    LcsCause::RequestAborted,
                    "undecodable message on this conn",
                );
            }
            return Err(err);
        }
    };
    let _ = loc_req::rx_bssap_le(smlc, conn_id, pdu);
    Ok(())
}

/// Send path: wrap a BSSMAP-LE PDU in the BSSAP-LE envelope and push it down
/// as connection-oriented data.
pub fn send_bssmap_le(smlc: &mut Smlc, conn_id: SccpConnId, bssmap_le: BssmapLePdu) -> Result<(), SendErr> {
    let pdu = BssapLePdu::BssmapLe(bssmap_le);
    let l2 = match bssap_le::enc(&pdu) {
        Ok(l2) => l2,
        Err(err) => {
            smlc.ctrs.tx_err_invalid_msg += 1;
            tracing::error!("(Lb-{}) Unable to encode {}: {}", conn_id, pdu, err);
            return Err(SendErr::Encode);
        }
    };

    let Some(conn) = smlc.lb.conn(conn_id) else {
        return Err(SendErr::ConnNotReady);
    };
    let Some(peer_addr) = conn.peer else {
        tracing::error!("(Lb-{}) Unable to send {}: peer is gone", conn_id, pdu);
        return Err(SendErr::ConnNotReady);
    };
    if smlc.lb.peer(&peer_addr).map(|p| p.state) != Some(LbPeerState::Ready) {
        tracing::error!("(Lb-{}) Unable to send {}: peer not READY", conn_id, pdu);
        return Err(SendErr::ConnNotReady);
    }

    sccp_lb::down_l2_co(smlc, conn_id, l2).map_err(|err| {
        tracing::error!("(Lb-{}) Unable to send {}", conn_id, pdu);
        SendErr::Transport(err)
    })
}

/// Regularly close the conn: tell SCCP, terminate a bound request, release
/// the subscriber, unlink.
pub fn close(smlc: &mut Smlc, conn_id: SccpConnId) {
    let Some(conn) = smlc.lb.conn_mut(conn_id) else {
        return;
    };
    if conn.closing {
        return;
    }
    conn.closing = true;
    tracing::debug!("{}: closing", conn);

    if let Some(_peer_addr) = conn.peer.take() {
        // Todo: pass a useful SCCP cause?
        let _ = sccp_lb::tx_disconnect(smlc, conn_id, 0);
    }

    if let Some(loc_req_id) = smlc.lb.conn(conn_id).and_then(|c| c.loc_req) {
        loc_req::term(smlc, loc_req_id, TermCause::Regular);
    }

    if let Some(imsi) = smlc.lb.conn_mut(conn_id).and_then(|c| c.subscr.take()) {
        smlc.subscribers.put(&imsi, SMLC_SUBSCR_USE_LB_CONN);
    }

    smlc.lb.conns.retain(|c| c.sccp_conn_id != conn_id);
}

/// Same as close() but without any SCCP messages, for when the peer has
/// already dropped the connection (e.g. after RESET). A pending location
/// request is failed first so a response is at least attempted.
pub fn discard(smlc: &mut Smlc, conn_id: SccpConnId) {
    let Some(conn) = smlc.lb.conn_mut(conn_id) else {
        return;
    };
    conn.peer = None;
    if conn.loc_req.is_some() {
        loc_req::fail_for_conn(smlc, conn_id, LcsCause::SystemFailure, "RESET on Lb");
    }
    close(smlc, conn_id);
}
