//! Handle one BSSMAP-LE Perform Location Request
//!
//! A request either carries the timing advance inline (BSSLAP TA-LAYER3) or
//! the engine fetches it with a BSSLAP TA-REQUEST exchange. Once cell and TA
//! are known, the cell location table turns them into a GAD estimate for the
//! PERFORM LOCATION RESPONSE.

use core::fmt;
use std::time::Instant;

use smlc_core::cell_id::CellIdentifier;
use smlc_core::cell_locations::NotFound;
use smlc_core::SccpConnId;
use smlc_pdus::bssap_le::BssapLePdu;
use smlc_pdus::bsslap::BsslapPdu;
use smlc_pdus::bssmap_le::fields::lcs_cause::LcsCause;
use smlc_pdus::bssmap_le::pdus::conn_oriented_info::ConnOrientedInfo;
use smlc_pdus::bssmap_le::pdus::perform_loc_req::PerformLocReq;
use smlc_pdus::bssmap_le::pdus::perform_loc_resp::PerformLocResp;
use smlc_pdus::bssmap_le::BssmapLePdu;
use smlc_saps::sccp::SccpAddr;

use crate::lb_conn::{self, SendErr, LB_CONN_USE_LOC_REQ};
use crate::smlc::Smlc;
use crate::subscr::SMLC_SUBSCR_USE_LB_CONN;

const USE_LOC_REQ_START: &str = "loc-req-start";

pub type LocReqId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocReqState {
    Init,
    WaitTa,
    GotTa,
    Failed,
}

impl fmt::Display for LocReqState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocReqState::Init => write!(f, "INIT"),
            LocReqState::WaitTa => write!(f, "WAIT_TA"),
            LocReqState::GotTa => write!(f, "GOT_TA"),
            LocReqState::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermCause {
    Regular,
    Error,
    /// Silent termination on explicit request; no response is sent
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocReqErr {
    /// Another request is still pending on this conn
    Again,
    /// The conn is already bound to a different subscriber
    InvalidArg,
    /// Message or discriminator this engine does not handle
    NotSupported,
}

pub struct LocReq {
    pub id: LocReqId,
    /// Owning peer. The request is deliberately parented to the peer, not
    /// the conn: releasing the conn hold during cleanup must not free the
    /// request that is doing the releasing.
    pub peer: SccpAddr,
    pub conn_id: SccpConnId,
    pub req: PerformLocReq,
    pub ta: Option<u8>,
    pub latest_cell_id: CellIdentifier,
    pub lcs_cause: Option<LcsCause>,
    pub state: LocReqState,
    pub timeout_at: Option<Instant>,
}

/// Entry point for every BSSAP-LE PDU arriving on a conn.
pub fn rx_bssap_le(smlc: &mut Smlc, conn_id: SccpConnId, pdu: BssapLePdu) -> Result<(), LocReqErr> {
    let bssmap_le = match pdu {
        BssapLePdu::BssmapLe(bssmap_le) => bssmap_le,
        BssapLePdu::DtapLe { .. } => {
            tracing::error!("(Lb-{}) BSSAP-LE discriminator DTAP-LE not implemented", conn_id);
            return Err(LocReqErr::NotSupported);
        }
    };
    tracing::debug!("(Lb-{}) Rx {}", conn_id, bssmap_le);

    match bssmap_le {
        BssmapLePdu::PerformLocReq(req) => start(smlc, conn_id, req),
        BssmapLePdu::PerformLocAbort(_) => {
            let Some(id) = smlc.lb.conn(conn_id).and_then(|c| c.loc_req) else {
                tracing::error!("(Lb-{}) Rx Perform Location Abort without active request", conn_id);
                return Ok(());
            };
            tracing::info!("(Lb-{}) Rx Perform Location Abort, stopping this request dead", conn_id);
            term(smlc, id, TermCause::Request);
            Ok(())
        }
        BssmapLePdu::ConnOrientedInfo(coi) => rx_conn_oriented_info(smlc, conn_id, coi),
        other => {
            tracing::error!("(Lb-{}) Rx unsupported BSSMAP-LE message: {}", conn_id, other);
            Err(LocReqErr::NotSupported)
        }
    }
}

fn rx_conn_oriented_info(
    smlc: &mut Smlc,
    conn_id: SccpConnId,
    coi: ConnOrientedInfo,
) -> Result<(), LocReqErr> {
    let loc_req = smlc.lb.conn(conn_id).and_then(|c| c.loc_req);

    match coi.apdu {
        BsslapPdu::TaResponse { cell_id, ta } => {
            smlc.ctrs.rx_dt1_bsslap_ta_response += 1;
            wait_ta_update(smlc, conn_id, loc_req, cell_id, ta, "BSSLAP TA Response");
            Ok(())
        }
        BsslapPdu::Reset { cell_id, ta, .. } => {
            smlc.ctrs.rx_dt1_bsslap_reset += 1;
            wait_ta_update(smlc, conn_id, loc_req, cell_id, ta, "BSSLAP Reset");
            Ok(())
        }
        BsslapPdu::Abort { .. } => {
            smlc.ctrs.rx_dt1_bsslap_abort += 1;
            if let Some(id) = loc_req {
                fail(smlc, id, LcsCause::RequestAborted, "BSSLAP Abort");
            }
            Ok(())
        }
        BsslapPdu::Reject { .. } => {
            smlc.ctrs.rx_dt1_bsslap_reject += 1;
            if let Some(id) = loc_req {
                fail(smlc, id, LcsCause::RequestAborted, "BSSLAP Reject");
            }
            Ok(())
        }
        other => {
            tracing::error!(
                "(Lb-{}) rx BSSLAP APDU with unsupported message type {}",
                conn_id,
                other
            );
            Err(LocReqErr::NotSupported)
        }
    }
}

/// TA and serving cell arrived; only meaningful while waiting for them.
fn wait_ta_update(
    smlc: &mut Smlc,
    conn_id: SccpConnId,
    loc_req: Option<LocReqId>,
    new_ci: u16,
    ta: u8,
    what: &str,
) {
    let Some(id) = loc_req else {
        tracing::error!("(Lb-{}) Rx {} without active location request", conn_id, what);
        return;
    };
    let Some(lr) = smlc.lb.loc_req_mut(id) else {
        return;
    };
    if lr.state != LocReqState::WaitTa {
        tracing::error!("(Lb-{}) Rx {} in state {}, ignoring", conn_id, what, lr.state);
        return;
    }
    lr.ta = Some(ta);
    lr.latest_cell_id = lr.latest_cell_id.with_ci(new_ci);
    tracing::info!("(Lb-{}) Rx {}: cell id is now {}", conn_id, what, lr.latest_cell_id);
    state_chg(smlc, id, LocReqState::GotTa);
}

/// A new PERFORM LOCATION REQUEST on this conn.
fn start(smlc: &mut Smlc, conn_id: SccpConnId, req: PerformLocReq) -> Result<(), LocReqErr> {
    smlc.ctrs.rx_dt1_perform_location_request += 1;

    let Some(conn) = smlc.lb.conn(conn_id) else {
        return Err(LocReqErr::InvalidArg);
    };
    if conn.loc_req.is_some() {
        // Another request is already pending. If we sent Perform Location
        // Abort, the peer would not know which request we mean. Just drop
        // this on the floor.
        tracing::error!(
            "(Lb-{}) Ignoring Perform Location Request, another request is still pending",
            conn_id
        );
        return Err(LocReqErr::Again);
    }
    let peer_addr = conn.peer.ok_or(LocReqErr::InvalidArg)?;

    if let Some(req_imsi) = req.imsi.clone() {
        let bound = smlc.lb.conn(conn_id).and_then(|c| c.subscr.clone());
        if bound.as_ref() != Some(&req_imsi) {
            smlc.subscribers.find_or_create(&req_imsi, USE_LOC_REQ_START);

            if bound.is_some() {
                tracing::error!(
                    "(Lb-{}) IMSI mismatch: conn has {}, Rx Perform Location Request has {}",
                    conn_id,
                    bound.unwrap(),
                    req_imsi
                );
                smlc.subscribers.put(&req_imsi, USE_LOC_REQ_START);
                return Err(LocReqErr::InvalidArg);
            }

            // One active Lb dialogue per subscriber: a conn already bound to
            // this IMSI is superseded by the new one.
            let other_conn = lb_conn::find_by_subscr(smlc, &req_imsi, conn_id);

            if let Some(conn) = smlc.lb.conn_mut(conn_id) {
                conn.subscr = Some(req_imsi.clone());
            }
            smlc.subscribers.get(&req_imsi, SMLC_SUBSCR_USE_LB_CONN);

            if let Some(other_id) = other_conn {
                tracing::error!(
                    "(Lb-{}) another conn (Lb-{}) already active for {}, discarding the older one",
                    conn_id,
                    other_id,
                    req_imsi
                );
                lb_conn::close(smlc, other_id);
            }

            smlc.subscribers.put(&req_imsi, USE_LOC_REQ_START);
        }
    }

    let id = smlc.lb.alloc_loc_req_id();
    let latest_cell_id = req.cell_id;
    tracing::info!(
        "(Lb-{}) Rx Perform Location Request (BSSLAP APDU {}), cell id is {}",
        conn_id,
        req.apdu.as_ref().map(|a| a.msg_type().to_string()).unwrap_or_else(|| "omitted".into()),
        latest_cell_id
    );

    smlc.lb.loc_reqs.push(LocReq {
        id,
        peer: peer_addr,
        conn_id,
        req,
        ta: None,
        latest_cell_id,
        lcs_cause: None,
        state: LocReqState::Init,
        timeout_at: None,
    });
    if let Some(conn) = smlc.lb.conn_mut(conn_id) {
        conn.loc_req = Some(id);
    }
    lb_conn::get(smlc, conn_id, LB_CONN_USE_LOC_REQ);

    // state change to start the timeout
    state_chg(smlc, id, LocReqState::WaitTa);
    Ok(())
}

fn state_chg(smlc: &mut Smlc, id: LocReqId, next: LocReqState) {
    let now = smlc.now();
    let tdefs = smlc.tdefs;
    let Some(lr) = smlc.lb.loc_req_mut(id) else {
        return;
    };
    tracing::debug!("(Lb-{}) location request: {} -> {}", lr.conn_id, lr.state, next);
    lr.state = next;
    lr.timeout_at = match next {
        LocReqState::WaitTa => Some(now + tdefs.t_ta_response),
        _ => None,
    };
    match next {
        LocReqState::WaitTa => wait_ta_onenter(smlc, id),
        LocReqState::GotTa => got_ta_onenter(smlc, id),
        LocReqState::Failed => failed_onenter(smlc, id),
        LocReqState::Init => {}
    }
}

fn wait_ta_onenter(smlc: &mut Smlc, id: LocReqId) {
    let Some(lr) = smlc.lb.loc_req_mut(id) else {
        return;
    };
    // Did the original request contain a TA already?
    if let Some(BsslapPdu::TaLayer3 { ta }) = lr.req.apdu {
        lr.ta = Some(ta);
        tracing::info!("(Lb-{}) TA = {}", lr.conn_id, ta);
        state_chg(smlc, id, LocReqState::GotTa);
        return;
    }

    // No TA known yet, ask via BSSLAP
    let conn_id = lr.conn_id;
    smlc.ctrs.tx_dt1_bsslap_ta_request += 1;
    let msg =
        BssmapLePdu::ConnOrientedInfo(ConnOrientedInfo { apdu: BsslapPdu::TaRequest });
    // A failed send is left to the response timeout
    let _ = lb_conn::send_bssmap_le(smlc, conn_id, msg);
}

fn got_ta_onenter(smlc: &mut Smlc, id: LocReqId) {
    let Some(lr) = smlc.lb.loc_req(id) else {
        return;
    };
    let conn_id = lr.conn_id;
    let cell_id = lr.latest_cell_id;
    let Some(ta) = lr.ta else {
        fail(smlc, id, LcsCause::SystemFailure, "internal error: GOT_TA, but no TA present");
        return;
    };

    let location = match smlc.cells.gad_from_ta(&cell_id, ta) {
        Ok(location) => location,
        Err(NotFound) => {
            fail(
                smlc,
                id,
                LcsCause::FacilityNotsupp,
                "no location information for this cell",
            );
            return;
        }
    };

    tracing::info!(
        "(Lb-{}) Returning location estimate to BSC: {} TA={} --> {}",
        conn_id,
        cell_id,
        ta,
        location
    );

    smlc.ctrs.tx_dt1_perform_location_response += 1;
    let resp = BssmapLePdu::PerformLocResp(PerformLocResp {
        location_estimate: Some(location),
        lcs_cause: None,
    });
    match lb_conn::send_bssmap_le(smlc, conn_id, resp) {
        Ok(()) => term(smlc, id, TermCause::Regular),
        Err(SendErr::Encode) => {
            fail(smlc, id, LcsCause::FacilityNotsupp, "unable to encode Location Estimate");
        }
        Err(_) => {
            fail(
                smlc,
                id,
                LcsCause::SystemFailure,
                "unable to send BSSMAP-LE Perform Location Response",
            );
        }
    }
}

fn failed_onenter(smlc: &mut Smlc, id: LocReqId) {
    let Some(lr) = smlc.lb.loc_req(id) else {
        return;
    };
    let conn_id = lr.conn_id;
    let lcs_cause = lr.lcs_cause.unwrap_or(LcsCause::Unspecified);

    smlc.ctrs.tx_dt1_perform_location_response += 1;
    let resp = BssmapLePdu::PerformLocResp(PerformLocResp {
        location_estimate: None,
        lcs_cause: Some(lcs_cause),
    });
    let rc = lb_conn::send_bssmap_le(smlc, conn_id, resp);
    term(smlc, id, if rc.is_err() { TermCause::Error } else { TermCause::Regular });
}

/// Move to FAILED, which emits the response carrying `cause`.
fn fail(smlc: &mut Smlc, id: LocReqId, cause: LcsCause, msg: &str) {
    let state =
        smlc.lb.loc_req(id).map(|lr| lr.state.to_string()).unwrap_or_else(|| "gone".into());
    tracing::error!("Perform Location Request failed in state {}: {}", state, msg);
    if let Some(lr) = smlc.lb.loc_req_mut(id) {
        lr.lcs_cause = Some(cause);
    }
    state_chg(smlc, id, LocReqState::Failed);
}

/// Fail the request bound to a conn, e.g. when the Lb link underneath it is
/// reset. A response is still attempted, best effort.
pub fn fail_for_conn(smlc: &mut Smlc, conn_id: SccpConnId, cause: LcsCause, msg: &str) {
    let Some(id) = smlc.lb.conn(conn_id).and_then(|c| c.loc_req) else {
        return;
    };
    fail(smlc, id, cause, msg);
}

/// TA response timer fired.
pub fn timeout(smlc: &mut Smlc, id: LocReqId) {
    fail(smlc, id, LcsCause::SystemFailure, "timeout");
}

/// Tear the request down and release everything it holds. Runs for every
/// termination cause.
pub fn term(smlc: &mut Smlc, id: LocReqId, cause: TermCause) {
    let Some(idx) = smlc.lb.loc_reqs.iter().position(|l| l.id == id) else {
        return;
    };
    // Take the request out of the store first so nothing re-enters it while
    // the holds are released.
    let lr = smlc.lb.loc_reqs.remove(idx);
    tracing::debug!("(Lb-{}) location request terminated ({:?})", lr.conn_id, cause);

    let was_bound = smlc.lb.conn_mut(lr.conn_id).is_some_and(|conn| {
        if conn.loc_req == Some(id) {
            conn.loc_req = None;
            true
        } else {
            false
        }
    });
    if was_bound {
        lb_conn::put(smlc, lr.conn_id, LB_CONN_USE_LOC_REQ);
    }
}
