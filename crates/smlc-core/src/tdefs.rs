use std::time::Duration;

/// Configurable protocol timers, all defaulting to 5 seconds.
#[derive(Debug, Clone, Copy)]
pub struct Tdefs {
    /// Timeout for BSSLAP TA Response from BSC
    pub t_ta_response: Duration,
    /// Timeout waiting for RESET ACKNOWLEDGE after sending RESET
    pub t_reset_ack: Duration,
    /// Grace period before cleaning up an unreachable Lb peer
    pub t_discard: Duration,
}

impl Default for Tdefs {
    fn default() -> Self {
        Self {
            t_ta_response: Duration::from_secs(5),
            t_reset_ack: Duration::from_secs(5),
            t_discard: Duration::from_secs(5),
        }
    }
}
