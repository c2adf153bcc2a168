use std::time::Duration;

use serde::Deserialize;
use smlc_core::Tdefs;
use smlc_saps::sccp::SSN_SMLC_BSSAP_LE;

/// The SCCP link backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SccpBackend {
    Undefined,
    /// Run without a signalling link; primitives are dropped. Useful for
    /// bring-up and for driving the stack from tests.
    None,
}

/// SCCP / Lb link configuration
#[derive(Debug, Clone)]
pub struct CfgSccp {
    pub backend: SccpBackend,
    /// Local point code, 3-8-3 notation
    pub local_pc: String,
    pub ssn: u8,
}

impl Default for CfgSccp {
    fn default() -> Self {
        Self {
            backend: SccpBackend::Undefined,
            local_pc: "0.23.6".to_string(),
            ssn: SSN_SMLC_BSSAP_LE,
        }
    }
}

/// Timer overrides, in seconds. Anything unset keeps the 5 s default.
#[derive(Debug, Clone, Copy, Default)]
pub struct CfgTimers {
    pub t_ta_response: Option<u64>,
    pub t_reset_ack: Option<u64>,
    pub t_discard: Option<u64>,
}

impl CfgTimers {
    pub fn to_tdefs(self) -> Tdefs {
        let mut tdefs = Tdefs::default();
        if let Some(secs) = self.t_ta_response {
            tdefs.t_ta_response = Duration::from_secs(secs);
        }
        if let Some(secs) = self.t_reset_ack {
            tdefs.t_reset_ack = Duration::from_secs(secs);
        }
        if let Some(secs) = self.t_discard {
            tdefs.t_discard = Duration::from_secs(secs);
        }
        tdefs
    }
}

/// Top-level SMLC configuration
#[derive(Debug, Clone)]
pub struct SmlcConfig {
    /// Verbose log file, in addition to stdout logging
    pub debug_log: Option<String>,
    pub sccp: CfgSccp,
    pub timers: CfgTimers,
    /// Cell location commands, applied in order at startup
    pub cells: Vec<String>,
}

impl Default for SmlcConfig {
    fn default() -> Self {
        Self {
            debug_log: None,
            sccp: CfgSccp::default(),
            timers: CfgTimers::default(),
            cells: Vec::new(),
        }
    }
}
