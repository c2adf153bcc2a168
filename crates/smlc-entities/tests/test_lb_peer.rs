mod common;

use std::time::Duration;

use common::{bsc_addr, data_req_pdus, disconnect_conn_ids, unitdata_pdus, LbTest};
use smlc_entities::lb_peer::LbPeerState;
use smlc_pdus::bssmap_le::fields::cause::Cause;
use smlc_pdus::bssmap_le::fields::location_type::LocationType;
use smlc_pdus::bssmap_le::pdus::perform_loc_req::PerformLocReq;
use smlc_pdus::bssmap_le::pdus::reset::Reset;
use smlc_pdus::bssmap_le::BssmapLePdu;
use smlc_saps::prim::ScuPrimUp;
use smlc_saps::sccp::{RemoteSccpStatus, SccpReturnCause, SpStatus};
use smlc_core::cell_id::CellIdentifier;

fn loc_req_no_apdu() -> BssmapLePdu {
    BssmapLePdu::PerformLocReq(PerformLocReq {
        location_type: LocationType::current_geographic(),
        cell_id: CellIdentifier::LacAndCi { lac: 23, ci: 42 },
        imsi: None,
        apdu: None,
    })
}

#[test]
fn reset_handshake_reaches_ready() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);

    test.reset_handshake(bsc);

    let peer = test.smlc.lb.peer(&bsc).expect("peer created");
    assert_eq!(peer.state, LbPeerState::Ready);
    assert_eq!(test.smlc.stats.lb_peers_total, 1);
    assert_eq!(test.smlc.lb_peers_active(), 1);
}

#[test]
fn reset_in_ready_discards_conns_and_acks_again() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.reset_handshake(bsc);

    // Leave a connection with a pending TA exchange on the peer
    test.rx_co_initial(bsc, 7, loc_req_no_apdu());
    let sent = test.take_sent();
    assert!(matches!(
        data_req_pdus(&sent).as_slice(),
        [BssmapLePdu::ConnOrientedInfo(_)]
    ));
    assert!(test.smlc.lb.conn(7).is_some());

    // Another RESET: all conns dropped without SCCP disconnects, one more
    // RESET ACKNOWLEDGE, peer stays READY
    test.rx_cl(bsc, BssmapLePdu::Reset(Reset { cause: Cause::EquipmentFailure }));
    let sent = test.take_sent();
    assert!(matches!(unitdata_pdus(&sent).as_slice(), [BssmapLePdu::ResetAck]));
    assert!(disconnect_conn_ids(&sent).is_empty());
    assert!(test.smlc.lb.conn(7).is_none());
    assert!(test.smlc.lb.loc_reqs_is_empty());
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::Ready);
}

#[test]
fn co_before_reset_disconnects_and_resets() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);

    // No RESET yet: a CO-initial is a protocol violation
    test.rx_co_initial(bsc, 17, loc_req_no_apdu());

    let sent = test.take_sent();
    // exactly one SCCP disconnect on that conn id
    assert_eq!(disconnect_conn_ids(&sent), vec![17]);
    // and exactly one outgoing RESET
    let cl = unitdata_pdus(&sent);
    assert!(
        matches!(cl.as_slice(), [BssmapLePdu::Reset(_)]),
        "expected RESET, got {:?}",
        cl
    );
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::WaitRxResetAck);
    assert_eq!(test.smlc.ctrs.tx_udt_reset, 1);
}

#[test]
fn reset_ack_completes_outgoing_reset() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.rx_co_initial(bsc, 17, loc_req_no_apdu());
    test.take_sent();
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::WaitRxResetAck);

    test.rx_cl(bsc, BssmapLePdu::ResetAck);
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::Ready);
    assert_eq!(test.smlc.ctrs.rx_udt_reset_ack, 1);
}

#[test]
fn reset_ack_timeout_falls_back_to_wait_rx_reset() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.rx_co_initial(bsc, 17, loc_req_no_apdu());
    test.take_sent();
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::WaitRxResetAck);

    test.elapse(Duration::from_secs(6));
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::WaitRxReset);
}

#[test]
fn duplicate_co_initial_is_dropped() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.reset_handshake(bsc);

    test.rx_co_initial(bsc, 5, loc_req_no_apdu());
    test.take_sent();

    test.rx_co_initial(bsc, 5, loc_req_no_apdu());
    let sent = test.take_sent();
    // the adapter still confirms the SCCP connection, then drops the dup
    let data_reqs = data_req_pdus(&sent);
    assert!(data_reqs.is_empty(), "dup must not produce traffic: {:?}", data_reqs);
    assert_eq!(disconnect_conn_ids(&sent), vec![5]);
}

#[test]
fn co_non_initial_for_unknown_conn_is_dropped() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.reset_handshake(bsc);

    test.rx_co(99, loc_req_no_apdu());
    let sent = test.take_sent();
    assert!(sent.is_empty(), "unexpected traffic: {:?}", sent);
}

#[test]
fn pcstate_unreachable_discards_peer_after_grace_period() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.reset_handshake(bsc);

    test.rx_prim(ScuPrimUp::PcstateInd {
        affected_pc: 23,
        sp_status: SpStatus::Inaccessible,
        remote_sccp_status: RemoteSccpStatus::UnavailableUnknown,
    });
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::Discarding);
    assert_eq!(test.smlc.lb_peers_active(), 0);

    test.elapse(Duration::from_secs(6));
    assert!(test.smlc.lb.peer(&bsc).is_none());
}

#[test]
fn notice_congestion_keeps_peer() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.reset_handshake(bsc);

    test.rx_prim(ScuPrimUp::NoticeInd {
        calling_addr: bsc,
        cause: SccpReturnCause::NetworkCongestion,
        importance: 4,
    });
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::Ready);

    test.rx_prim(ScuPrimUp::NoticeInd {
        calling_addr: bsc,
        cause: SccpReturnCause::Unequipped,
        importance: 4,
    });
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::Discarding);
}

#[test]
fn empty_connect_ind_is_ignored() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);

    test.rx_prim(ScuPrimUp::ConnectInd {
        conn_id: 3,
        called_addr: common::local_addr(),
        calling_addr: bsc,
        data: Vec::new(),
    });
    assert!(test.take_sent().is_empty());
    assert!(test.smlc.lb.peer(&bsc).is_none());
}

#[test]
fn garbage_unitdata_counts_as_invalid() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);

    test.rx_prim(ScuPrimUp::UnitdataInd {
        called_addr: common::local_addr(),
        calling_addr: bsc,
        data: vec![0xff, 0xff],
    });
    assert_eq!(test.smlc.ctrs.rx_udt_err_invalid_msg, 1);
    // the peer is created on first CL arrival even when the message is junk
    assert_eq!(test.smlc.lb.peer(&bsc).unwrap().state, LbPeerState::WaitRxReset);
    assert!(test.take_sent().is_empty());
}

#[test]
fn outgoing_conn_ids_skip_used_ids() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.reset_handshake(bsc);

    // conn id 1 is taken by an incoming conn, the allocator steps over it
    smlc_entities::lb_conn::create_incoming(&mut test.smlc, bsc, 1, "test");
    let a = smlc_entities::lb_conn::create_outgoing(&mut test.smlc, bsc, "test").unwrap();
    let b = smlc_entities::lb_conn::create_outgoing(&mut test.smlc, bsc, "test").unwrap();
    assert_ne!(a, 1);
    assert_ne!(b, 1);
    assert_ne!(a, b);
    assert_eq!(test.smlc.lb.num_conns(), 3);

    for conn_id in [1, a, b] {
        smlc_entities::lb_conn::put(&mut test.smlc, conn_id, "test");
    }
    assert_eq!(test.smlc.lb.num_conns(), 0);
}

#[test]
fn conn_disconnect_ind_discards_conn() {
    let mut test = LbTest::new();
    let bsc = bsc_addr(23);
    test.reset_handshake(bsc);
    test.rx_co_initial(bsc, 5, loc_req_no_apdu());
    test.take_sent();
    assert!(test.smlc.lb.conn(5).is_some());

    test.rx_prim(ScuPrimUp::DisconnectInd { conn_id: 5, cause: 0, data: Vec::new() });
    let sent = test.take_sent();
    // the SCCP conn is gone already: a failed response attempt at most, no
    // disconnect of our own
    assert!(disconnect_conn_ids(&sent).is_empty());
    assert!(test.smlc.lb.conn(5).is_none());
    assert!(test.smlc.lb.loc_reqs_is_empty());
}
