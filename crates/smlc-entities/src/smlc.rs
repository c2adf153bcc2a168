//! Process-wide SMLC context

use std::time::{Duration, Instant};

use smlc_core::cell_locations::CellLocations;
use smlc_core::Tdefs;
use smlc_saps::sccp::SccpAddr;
use smlc_saps::transport::SccpTransport;

use crate::counters::SmlcCounters;
use crate::lb_conn;
use crate::lb_peer::{self, LbPeerEv, LbPeerState};
use crate::loc_req::{self, TermCause};
use crate::sccp_lb::SccpLbInst;
use crate::subscr::SubscriberRegistry;

#[derive(Debug, Default)]
pub struct SmlcStats {
    /// Lb peers seen since startup
    pub lb_peers_total: u64,
}

/// Everything the SMLC process owns: the cell table, the subscriber
/// registry, the Lb-side SCCP state and the counters. All mutation happens
/// from the single event loop thread.
pub struct Smlc {
    pub cells: CellLocations,
    pub subscribers: SubscriberRegistry,
    pub lb: SccpLbInst,
    pub ctrs: SmlcCounters,
    pub stats: SmlcStats,
    pub tdefs: Tdefs,
    now: Instant,
}

impl Smlc {
    pub fn new(local_addr: SccpAddr, tdefs: Tdefs, transport: Box<dyn SccpTransport>) -> Self {
        Self {
            cells: CellLocations::new(),
            subscribers: SubscriberRegistry::new(),
            lb: SccpLbInst::new(local_addr, transport),
            ctrs: SmlcCounters::default(),
            stats: SmlcStats::default(),
            tdefs,
            now: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    /// The event loop stamps the current time before each dispatch; tests
    /// move it forward by hand.
    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
    }

    pub fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Currently active Lb peers (RESET procedure completed)
    pub fn lb_peers_active(&self) -> usize {
        self.lb.peers.iter().filter(|p| p.state == LbPeerState::Ready).count()
    }

    /// Dispatch all timers that are due at the current time.
    pub fn poll_timers(&mut self) {
        let now = self.now;

        let due_peers: Vec<SccpAddr> = self
            .lb
            .peers
            .iter()
            .filter(|p| p.timeout_at.is_some_and(|at| at <= now))
            .map(|p| p.peer_addr)
            .collect();
        for peer_addr in due_peers {
            if let Some(peer) = self.lb.peer_mut(&peer_addr) {
                peer.timeout_at = None;
            }
            let _ = lb_peer::handle_event(self, peer_addr, LbPeerEv::Timeout);
        }

        let due_reqs: Vec<loc_req::LocReqId> = self
            .lb
            .loc_reqs
            .iter()
            .filter(|l| l.timeout_at.is_some_and(|at| at <= now))
            .map(|l| l.id)
            .collect();
        for id in due_reqs {
            if let Some(lr) = self.lb.loc_req_mut(id) {
                lr.timeout_at = None;
            }
            loc_req::timeout(self, id);
        }
    }

    /// Explicit teardown: location requests first, then conns, peers and
    /// finally the tables.
    pub fn shutdown(&mut self) {
        let req_ids: Vec<_> = self.lb.loc_reqs.iter().map(|l| l.id).collect();
        for id in req_ids {
            loc_req::term(self, id, TermCause::Request);
        }
        let conn_ids: Vec<_> = self.lb.conns.iter().map(|c| c.sccp_conn_id).collect();
        for conn_id in conn_ids {
            lb_conn::discard(self, conn_id);
        }
        self.lb.peers.clear();
        self.subscribers.clear();
        self.cells.clear();
        tracing::info!(
            "shut down: {} location requests handled, {} peers seen",
            self.ctrs.rx_dt1_perform_location_request,
            self.stats.lb_peers_total
        );
    }
}
