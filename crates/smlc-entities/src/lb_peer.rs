//! Per-peer state machine for the Lb interface
//!
//! One instance per remote SCCP address. No connection-oriented traffic is
//! accepted until both sides have been through a BSSMAP-LE RESET / RESET
//! ACKNOWLEDGE exchange.

use core::fmt;
use std::time::Instant;

use smlc_core::SccpConnId;
use smlc_pdus::bssap_le::{self, BssapLePdu};
use smlc_pdus::bssmap_le::fields::cause::Cause;
use smlc_pdus::bssmap_le::pdus::reset::Reset;
use smlc_pdus::bssmap_le::{BssmapLeMsgType, BssmapLePdu};
use smlc_saps::sccp::SccpAddr;

use crate::lb_conn;
use crate::sccp_lb;
use crate::smlc::Smlc;

const USE_RX_CO_INITIAL: &str = "rx-co-initial";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LbPeerState {
    /// Waiting for the peer to open the interface with a RESET
    WaitRxReset,
    /// We sent a RESET and wait for the acknowledgement
    WaitRxResetAck,
    /// RESET procedure completed, CO traffic flows
    Ready,
    /// Peer became unreachable; cleanup after a grace period
    Discarding,
}

impl fmt::Display for LbPeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LbPeerState::WaitRxReset => write!(f, "WAIT_RX_RESET"),
            LbPeerState::WaitRxResetAck => write!(f, "WAIT_RX_RESET_ACK"),
            LbPeerState::Ready => write!(f, "READY"),
            LbPeerState::Discarding => write!(f, "DISCARDING"),
        }
    }
}

pub struct LbPeer {
    pub peer_addr: SccpAddr,
    pub state: LbPeerState,
    pub timeout_at: Option<Instant>,
}

#[derive(Debug)]
pub enum LbPeerEv {
    MsgUpCl(Vec<u8>),
    MsgUpCoInitial { conn_id: SccpConnId, msg: Vec<u8> },
    MsgUpCo { conn_id: SccpConnId, msg: Vec<u8> },
    MsgDownCl(Vec<u8>),
    MsgDownCoInitial { conn_id: SccpConnId, msg: Vec<u8> },
    MsgDownCo { conn_id: SccpConnId, msg: Vec<u8> },
    RxReset,
    RxResetAck,
    Available,
    Unavailable,
    Timeout,
}

impl LbPeerEv {
    fn name(&self) -> &'static str {
        match self {
            LbPeerEv::MsgUpCl(_) => "MSG_UP_CL",
            LbPeerEv::MsgUpCoInitial { .. } => "MSG_UP_CO_INITIAL",
            LbPeerEv::MsgUpCo { .. } => "MSG_UP_CO",
            LbPeerEv::MsgDownCl(_) => "MSG_DOWN_CL",
            LbPeerEv::MsgDownCoInitial { .. } => "MSG_DOWN_CO_INITIAL",
            LbPeerEv::MsgDownCo { .. } => "MSG_DOWN_CO",
            LbPeerEv::RxReset => "RX_RESET",
            LbPeerEv::RxResetAck => "RX_RESET_ACK",
            LbPeerEv::Available => "AVAILABLE",
            LbPeerEv::Unavailable => "UNAVAILABLE",
            LbPeerEv::Timeout => "TIMEOUT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpL2Err {
    /// CO-initial for a conn id that already exists
    DuplicateConnId,
    /// CO non-initial for a conn id nobody knows
    UnknownConnId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownErr {
    /// Down path used while the RESET handshake is not complete
    Blocked,
    Transport(smlc_saps::transport::TransportErr),
}

pub fn find_or_create(smlc: &mut Smlc, peer_addr: SccpAddr) -> SccpAddr {
    if smlc.lb.peer(&peer_addr).is_none() {
        tracing::info!("new Lb peer {}", peer_addr);
        smlc.lb.peers.push(LbPeer {
            peer_addr,
            state: LbPeerState::WaitRxReset,
            timeout_at: None,
        });
        smlc.stats.lb_peers_total += 1;
    }
    peer_addr
}

/// Route one upward L2 message to its peer. `calling_addr` is set for
/// connectionless messages and for the initial message of a connection.
pub fn up_l2(
    smlc: &mut Smlc,
    calling_addr: Option<SccpAddr>,
    co: bool,
    conn_id: SccpConnId,
    l2: Vec<u8>,
) -> Result<(), UpL2Err> {
    let mut peer_addr = None;

    if co {
        let known_conn = smlc.lb.conn(conn_id).and_then(|c| c.peer);
        if known_conn.is_some() && calling_addr.is_some() {
            tracing::error!(
                "(Lb-{}) Connection-Oriented Initial message for already existing conn_id. Dropping message.",
                conn_id
            );
            return Err(UpL2Err::DuplicateConnId);
        }
        if known_conn.is_none() && calling_addr.is_none() {
            tracing::error!(
                "(Lb-{}) Connection-Oriented non-Initial message for unknown conn_id. Dropping message.",
                conn_id
            );
            return Err(UpL2Err::UnknownConnId);
        }
        peer_addr = known_conn;
    }

    if let Some(calling) = calling_addr {
        peer_addr = Some(find_or_create(smlc, calling));
    }
    let peer_addr = peer_addr.expect("either an existing conn or a calling address");

    let ev = if co {
        if calling_addr.is_some() {
            LbPeerEv::MsgUpCoInitial { conn_id, msg: l2 }
        } else {
            LbPeerEv::MsgUpCo { conn_id, msg: l2 }
        }
    } else {
        LbPeerEv::MsgUpCl(l2)
    };
    let _ = handle_event(smlc, peer_addr, ev);
    Ok(())
}

/// Discard the local conn behind an SCCP conn id, if any.
pub fn disconnect(smlc: &mut Smlc, conn_id: SccpConnId) {
    if smlc.lb.conn(conn_id).is_some() {
        lb_conn::discard(smlc, conn_id);
    }
}

/// Main event dispatch. Down-direction events report whether anything was
/// sent; everything else is fire and forget.
pub fn handle_event(smlc: &mut Smlc, peer_addr: SccpAddr, ev: LbPeerEv) -> Result<(), DownErr> {
    let Some(peer) = smlc.lb.peer(&peer_addr) else {
        tracing::error!("event {} for unknown peer {}", ev.name(), peer_addr);
        return Err(DownErr::Blocked);
    };
    let state = peer.state;
    tracing::trace!("peer {} in {}: {}", peer_addr, state, ev.name());

    // Connectionless messages carry the RESET procedure in any state.
    let ev = match ev {
        LbPeerEv::MsgUpCl(l2) => match bssap_le::bssmap_le_msg_type(&l2) {
            Some(BssmapLeMsgType::Reset) => {
                smlc.ctrs.rx_udt_reset += 1;
                LbPeerEv::RxReset
            }
            Some(BssmapLeMsgType::ResetAck) => {
                smlc.ctrs.rx_udt_reset_ack += 1;
                LbPeerEv::RxResetAck
            }
            other => {
                smlc.ctrs.rx_udt_err_invalid_msg += 1;
                tracing::error!(
                    "peer {}: unhandled ConnectionLess message received: {:?}",
                    peer_addr,
                    other
                );
                return Ok(());
            }
        },
        ev => ev,
    };

    match state {
        LbPeerState::WaitRxReset | LbPeerState::WaitRxResetAck => match ev {
            LbPeerEv::RxReset => {
                rx_reset(smlc, peer_addr);
                Ok(())
            }
            LbPeerEv::RxResetAck if state == LbPeerState::WaitRxResetAck => {
                state_chg(smlc, peer_addr, LbPeerState::Ready);
                Ok(())
            }
            LbPeerEv::MsgUpCoInitial { conn_id, .. } | LbPeerEv::MsgUpCo { conn_id, .. } => {
                co_before_reset(smlc, peer_addr, conn_id);
                Ok(())
            }
            LbPeerEv::Timeout if state == LbPeerState::WaitRxResetAck => {
                tracing::warn!("peer {}: timeout waiting for RESET ACKNOWLEDGE", peer_addr);
                state_chg(smlc, peer_addr, LbPeerState::WaitRxReset);
                Ok(())
            }
            LbPeerEv::Unavailable => {
                state_chg(smlc, peer_addr, LbPeerState::Discarding);
                Ok(())
            }
            LbPeerEv::Available => Ok(()),
            LbPeerEv::MsgDownCl(_)
            | LbPeerEv::MsgDownCo { .. }
            | LbPeerEv::MsgDownCoInitial { .. } => {
                tracing::error!("peer {} in {}: down-direction message blocked", peer_addr, state);
                Err(DownErr::Blocked)
            }
            ev => {
                tracing::error!("peer {} in {}: unhandled event: {}", peer_addr, state, ev.name());
                Ok(())
            }
        },

        LbPeerState::Ready => match ev {
            LbPeerEv::RxReset => {
                rx_reset(smlc, peer_addr);
                Ok(())
            }
            LbPeerEv::MsgUpCoInitial { conn_id, msg } => {
                let conn_id = lb_conn::create_incoming(smlc, peer_addr, conn_id, USE_RX_CO_INITIAL);
                let _ = lb_conn::rx(smlc, conn_id, &msg);
                lb_conn::put(smlc, conn_id, USE_RX_CO_INITIAL);
                Ok(())
            }
            LbPeerEv::MsgUpCo { conn_id, msg } => {
                let _ = lb_conn::rx(smlc, conn_id, &msg);
                Ok(())
            }
            LbPeerEv::MsgDownCoInitial { conn_id, msg } => {
                sccp_lb::down_l2_co_initial(smlc, peer_addr, conn_id, msg)
                    .map_err(DownErr::Transport)
            }
            LbPeerEv::MsgDownCo { conn_id, msg } => {
                sccp_lb::down_l2_co(smlc, conn_id, msg).map_err(DownErr::Transport)
            }
            LbPeerEv::MsgDownCl(msg) => {
                sccp_lb::down_l2_cl(smlc, peer_addr, msg).map_err(DownErr::Transport)
            }
            LbPeerEv::Unavailable => {
                state_chg(smlc, peer_addr, LbPeerState::Discarding);
                Ok(())
            }
            LbPeerEv::Available => Ok(()),
            ev => {
                tracing::error!("peer {} in READY: unhandled event: {}", peer_addr, ev.name());
                Ok(())
            }
        },

        LbPeerState::Discarding => match ev {
            LbPeerEv::Timeout => {
                cleanup(smlc, peer_addr);
                Ok(())
            }
            ev => {
                tracing::debug!("peer {} in DISCARDING: dropping {}", peer_addr, ev.name());
                Err(DownErr::Blocked)
            }
        },
    }
}

fn allowed_transition(from: LbPeerState, to: LbPeerState) -> bool {
    use LbPeerState::*;
    match from {
        WaitRxReset | WaitRxResetAck | Ready => {
            matches!(to, WaitRxReset | WaitRxResetAck | Ready | Discarding)
        }
        Discarding => false,
    }
}

pub(crate) fn state_chg(smlc: &mut Smlc, peer_addr: SccpAddr, next: LbPeerState) {
    let now = smlc.now();
    let tdefs = smlc.tdefs;
    let Some(peer) = smlc.lb.peer_mut(&peer_addr) else {
        return;
    };
    debug_assert!(allowed_transition(peer.state, next), "{} -> {}", peer.state, next);
    tracing::debug!("peer {}: state {} -> {}", peer_addr, peer.state, next);
    peer.state = next;
    peer.timeout_at = match next {
        LbPeerState::WaitRxResetAck => Some(now + tdefs.t_reset_ack),
        LbPeerState::Discarding => Some(now + tdefs.t_discard),
        _ => None,
    };
}

pub fn discard_all_conns(smlc: &mut Smlc, peer_addr: SccpAddr) {
    let conn_ids: Vec<SccpConnId> = smlc
        .lb
        .conns
        .iter()
        .filter(|c| c.peer == Some(peer_addr))
        .map(|c| c.sccp_conn_id)
        .collect();
    for conn_id in conn_ids {
        lb_conn::discard(smlc, conn_id);
    }
}

/// Drop all SCCP connections for this peer, respond with RESET ACKNOWLEDGE
/// and move to READY.
fn rx_reset(smlc: &mut Smlc, peer_addr: SccpAddr) {
    discard_all_conns(smlc, peer_addr);

    let reset_ack = BssapLePdu::BssmapLe(BssmapLePdu::ResetAck);
    let Ok(resp) = bssap_le::enc(&reset_ack) else {
        tracing::error!("peer {}: failed to compose RESET ACKNOWLEDGE message", peer_addr);
        state_chg(smlc, peer_addr, LbPeerState::WaitRxReset);
        return;
    };

    smlc.ctrs.tx_udt_reset_ack += 1;
    if sccp_lb::down_l2_cl(smlc, peer_addr, resp).is_err() {
        tracing::error!("peer {}: failed to send RESET ACKNOWLEDGE message", peer_addr);
        state_chg(smlc, peer_addr, LbPeerState::WaitRxReset);
        return;
    }

    tracing::info!("peer {}: sent RESET ACKNOWLEDGE", peer_addr);
    state_chg(smlc, peer_addr, LbPeerState::Ready);
}

/// Start an outgoing RESET procedure: drop all conns, send RESET, await the
/// acknowledgement.
pub fn reset(smlc: &mut Smlc, peer_addr: SccpAddr) {
    state_chg(smlc, peer_addr, LbPeerState::WaitRxResetAck);
    discard_all_conns(smlc, peer_addr);

    let reset = BssapLePdu::BssmapLe(BssmapLePdu::Reset(Reset { cause: Cause::EquipmentFailure }));
    let Ok(msg) = bssap_le::enc(&reset) else {
        tracing::error!("peer {}: failed to compose RESET message", peer_addr);
        state_chg(smlc, peer_addr, LbPeerState::WaitRxReset);
        return;
    };

    smlc.ctrs.tx_udt_reset += 1;
    if sccp_lb::down_l2_cl(smlc, peer_addr, msg).is_err() {
        tracing::error!("peer {}: failed to send RESET message", peer_addr);
        state_chg(smlc, peer_addr, LbPeerState::WaitRxReset);
    }
}

/// A CO message on a peer that has not been through the RESET procedure is a
/// protocol violation. Usually we have just restarted: disconnect the
/// offending conn and tell the peer to start over with a local RESET.
fn co_before_reset(smlc: &mut Smlc, peer_addr: SccpAddr, conn_id: SccpConnId) {
    tracing::error!(
        "peer {}: receiving CO message without a proper RESET. Disconnecting on incoming message, sending RESET to Lb peer.",
        peer_addr
    );
    let _ = sccp_lb::tx_disconnect(smlc, conn_id, 0);
    disconnect(smlc, conn_id);
    reset(smlc, peer_addr);
}

/// Final cleanup once the DISCARDING grace period expired.
fn cleanup(smlc: &mut Smlc, peer_addr: SccpAddr) {
    tracing::info!("peer {}: cleaning up", peer_addr);
    discard_all_conns(smlc, peer_addr);
    // Location requests are parented to the peer; anything still here lost
    // its conn and goes down with the peer.
    let orphans: Vec<_> =
        smlc.lb.loc_reqs.iter().filter(|l| l.peer == peer_addr).map(|l| l.id).collect();
    for id in orphans {
        crate::loc_req::term(smlc, id, crate::loc_req::TermCause::Error);
    }
    smlc.lb.peers.retain(|p| p.peer_addr != peer_addr);
}
