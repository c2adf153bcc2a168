/// Process-wide message counters, one per Rx/Tx message class.
#[derive(Debug, Default)]
pub struct SmlcCounters {
    /// Rx BSSMAP-LE Reset
    pub rx_udt_reset: u64,
    /// Rx BSSMAP-LE Reset Acknowledge
    pub rx_udt_reset_ack: u64,
    /// Receive invalid UnitData message
    pub rx_udt_err_invalid_msg: u64,
    /// Receive invalid DirectTransfer1 message
    pub rx_dt1_err_invalid_msg: u64,
    /// Receive Perform Location Request from BSC
    pub rx_dt1_perform_location_request: u64,
    /// Receive BSSLAP TA Response from BSC
    pub rx_dt1_bsslap_ta_response: u64,
    /// Rx BSSLAP Reject from BSC
    pub rx_dt1_bsslap_reject: u64,
    /// Rx BSSLAP Reset (handover) from BSC
    pub rx_dt1_bsslap_reset: u64,
    /// Rx BSSLAP Abort from BSC
    pub rx_dt1_bsslap_abort: u64,

    /// BSSMAP-LE send error: invalid message
    pub tx_err_invalid_msg: u64,
    /// BSSMAP-LE send error: conn not ready
    pub tx_err_conn_not_ready: u64,
    /// BSSMAP-LE send error
    pub tx_err_send: u64,
    /// BSSMAP-LE send success
    pub tx_success: u64,

    /// Transmit UnitData Reset
    pub tx_udt_reset: u64,
    /// Transmit UnitData Reset Acknowledge
    pub tx_udt_reset_ack: u64,
    /// Tx Perform Location Response to BSC
    pub tx_dt1_perform_location_response: u64,
    /// Tx BSSLAP TA Request to BSC
    pub tx_dt1_bsslap_ta_request: u64,
}
