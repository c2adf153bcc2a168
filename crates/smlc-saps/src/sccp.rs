use core::fmt;

/// SubSystem Number for SMLC (BSSAP-LE)
pub const SSN_SMLC_BSSAP_LE: u8 = 252;

/// ITU-T 14-bit signalling point code, printed in 3-8-3 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointCode(pub u32);

impl fmt::Display for PointCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", (self.0 >> 11) & 0x7, (self.0 >> 3) & 0xff, self.0 & 0x7)
    }
}

impl PointCode {
    /// Parse "a.b.c" 3-8-3 notation, or a plain integer.
    pub fn parse(s: &str) -> Option<PointCode> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [single] => single.parse::<u32>().ok().filter(|v| *v < (1 << 14)).map(PointCode),
            [a, b, c] => {
                let a: u32 = a.parse().ok()?;
                let b: u32 = b.parse().ok()?;
                let c: u32 = c.parse().ok()?;
                if a > 0x7 || b > 0xff || c > 0x7 {
                    return None;
                }
                Some(PointCode((a << 11) | (b << 3) | c))
            }
            _ => None,
        }
    }
}

/// SCCP address: point code and/or subsystem number. Peers on the Lb
/// interface are identified by this address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SccpAddr {
    pub pc: Option<PointCode>,
    pub ssn: Option<u8>,
}

impl SccpAddr {
    pub fn pc_ssn(pc: u32, ssn: u8) -> Self {
        Self { pc: Some(PointCode(pc)), ssn: Some(ssn) }
    }
}

impl fmt::Display for SccpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.pc, self.ssn) {
            (Some(pc), Some(ssn)) => write!(f, "PC:{}/SSN:{}", pc, ssn),
            (Some(pc), None) => write!(f, "PC:{}", pc),
            (None, Some(ssn)) => write!(f, "SSN:{}", ssn),
            (None, None) => write!(f, "addr:empty"),
        }
    }
}

/// SCCP return causes surfaced through N-NOTICE (ITU-T Q.713 subset)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SccpReturnCause {
    NoTranslationForNature,
    NoTranslationForAddr,
    SubsystemCongestion,
    SubsystemFailure,
    Unequipped,
    NetworkFailure,
    NetworkCongestion,
    Unqualified,
    Other(u8),
}

impl SccpReturnCause {
    /// Transient congestion: the peer is expected to recover without action.
    pub fn is_transient(&self) -> bool {
        matches!(self, SccpReturnCause::SubsystemCongestion | SccpReturnCause::NetworkCongestion)
    }
}

impl fmt::Display for SccpReturnCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SccpReturnCause::NoTranslationForNature => write!(f, "no-translation-for-nature"),
            SccpReturnCause::NoTranslationForAddr => write!(f, "no-translation-for-address"),
            SccpReturnCause::SubsystemCongestion => write!(f, "subsystem-congestion"),
            SccpReturnCause::SubsystemFailure => write!(f, "subsystem-failure"),
            SccpReturnCause::Unequipped => write!(f, "unequipped"),
            SccpReturnCause::NetworkFailure => write!(f, "network-failure"),
            SccpReturnCause::NetworkCongestion => write!(f, "network-congestion"),
            SccpReturnCause::Unqualified => write!(f, "unqualified"),
            SccpReturnCause::Other(v) => write!(f, "cause-{}", v),
        }
    }
}

/// Signalling point status reported in N-PCSTATE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpStatus {
    Accessible,
    Inaccessible,
    Congested,
}

/// Remote SCCP status reported in N-PCSTATE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteSccpStatus {
    Available,
    UnavailableUnknown,
    Unequipped,
    Inaccessible,
    Congested,
}
