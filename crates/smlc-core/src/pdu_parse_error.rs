use core::fmt;

/// Errors raised while decoding a PDU from its octet representation.
#[derive(Debug, PartialEq, Eq)]
pub enum PduParseErr {
    BufferEnded { field: &'static str },
    InvalidValue { field: &'static str, value: u64 },
    UnknownMsgType { found: u8 },
    UnknownIei { found: u8 },
    MissingIe { iei: u8 },
    InconsistentLength { field: &'static str, expected: usize, found: usize },
    TrailingOctets { count: usize },
}

impl fmt::Display for PduParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PduParseErr::BufferEnded { field } => {
                write!(f, "buffer ended while reading '{}'", field)
            }
            PduParseErr::InvalidValue { field, value } => {
                write!(f, "invalid value {} for '{}'", value, field)
            }
            PduParseErr::UnknownMsgType { found } => {
                write!(f, "unknown message type 0x{:02x}", found)
            }
            PduParseErr::UnknownIei { found } => write!(f, "unknown IEI 0x{:02x}", found),
            PduParseErr::MissingIe { iei } => write!(f, "mandatory IE 0x{:02x} missing", iei),
            PduParseErr::InconsistentLength { field, expected, found } => {
                write!(f, "inconsistent length for '{}': expected {}, found {}", field, expected, found)
            }
            PduParseErr::TrailingOctets { count } => {
                write!(f, "{} unexpected trailing octets", count)
            }
        }
    }
}

/// Checks that a decoded value matches an expected one, otherwise returns
/// PduParseErr::InvalidValue.
#[macro_export]
macro_rules! expect_value {
    ($value:expr, $expected:expr, $field:expr) => {{
        let val = $value;
        if val == $expected {
            Ok(())
        } else {
            Err($crate::pdu_parse_error::PduParseErr::InvalidValue {
                field: $field,
                value: val as u64,
            })
        }
    }};
}
