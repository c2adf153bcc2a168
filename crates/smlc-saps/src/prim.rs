use core::fmt;

use smlc_core::SccpConnId;

use crate::sccp::{RemoteSccpStatus, SccpAddr, SccpReturnCause, SpStatus};

/// Upward SCCP-user primitives, delivered by the transport to the Lb engine.
#[derive(Debug)]
pub enum ScuPrimUp {
    /// N-CONNECT.ind: inbound connection request with user data
    ConnectInd {
        conn_id: SccpConnId,
        called_addr: SccpAddr,
        calling_addr: SccpAddr,
        data: Vec<u8>,
    },
    /// N-DATA.ind: connection-oriented data
    DataInd { conn_id: SccpConnId, data: Vec<u8> },
    /// N-DISCONNECT.ind: connection released by peer or network
    DisconnectInd { conn_id: SccpConnId, cause: u8, data: Vec<u8> },
    /// N-UNITDATA.ind: connectionless data
    UnitdataInd {
        called_addr: SccpAddr,
        calling_addr: SccpAddr,
        data: Vec<u8>,
    },
    /// N-NOTICE.ind: a message could not be delivered
    NoticeInd {
        calling_addr: SccpAddr,
        cause: SccpReturnCause,
        importance: u8,
    },
    /// N-PCSTATE.ind: reachability change for a point code
    PcstateInd {
        affected_pc: u32,
        sp_status: SpStatus,
        remote_sccp_status: RemoteSccpStatus,
    },
}

impl fmt::Display for ScuPrimUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScuPrimUp::ConnectInd { conn_id, .. } => write!(f, "N-CONNECT.ind({})", conn_id),
            ScuPrimUp::DataInd { conn_id, .. } => write!(f, "N-DATA.ind({})", conn_id),
            ScuPrimUp::DisconnectInd { conn_id, .. } => write!(f, "N-DISCONNECT.ind({})", conn_id),
            ScuPrimUp::UnitdataInd { calling_addr, .. } => {
                write!(f, "N-UNITDATA.ind(from {})", calling_addr)
            }
            ScuPrimUp::NoticeInd { calling_addr, cause, .. } => {
                write!(f, "N-NOTICE.ind(from {} cause {})", calling_addr, cause)
            }
            ScuPrimUp::PcstateInd { affected_pc, .. } => {
                write!(f, "N-PCSTATE.ind(pc {})", affected_pc)
            }
        }
    }
}

/// Downward SCCP-user primitives, handed from the Lb engine to the transport.
#[derive(Debug, PartialEq, Eq)]
pub enum ScuPrimDown {
    /// N-CONNECT.req: open an outgoing connection carrying user data
    ConnectReq {
        conn_id: SccpConnId,
        called_addr: SccpAddr,
        calling_addr: SccpAddr,
        data: Vec<u8>,
    },
    /// N-CONNECT.resp: accept an inbound connection
    ConnectResp { conn_id: SccpConnId, responding_addr: SccpAddr },
    /// N-DATA.req: connection-oriented data
    DataReq { conn_id: SccpConnId, data: Vec<u8> },
    /// N-UNITDATA.req: connectionless data
    UnitdataReq {
        called_addr: SccpAddr,
        calling_addr: SccpAddr,
        data: Vec<u8>,
    },
    /// N-DISCONNECT.req: release a connection
    DisconnectReq { conn_id: SccpConnId, cause: u8 },
}

impl fmt::Display for ScuPrimDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScuPrimDown::ConnectReq { conn_id, .. } => write!(f, "N-CONNECT.req({})", conn_id),
            ScuPrimDown::ConnectResp { conn_id, .. } => write!(f, "N-CONNECT.resp({})", conn_id),
            ScuPrimDown::DataReq { conn_id, .. } => write!(f, "N-DATA.req({})", conn_id),
            ScuPrimDown::UnitdataReq { called_addr, .. } => {
                write!(f, "N-UNITDATA.req(to {})", called_addr)
            }
            ScuPrimDown::DisconnectReq { conn_id, .. } => {
                write!(f, "N-DISCONNECT.req({})", conn_id)
            }
        }
    }
}
