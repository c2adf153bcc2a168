//! Command grammar for the cell location table
//!
//! Recognized commands:
//!
//! ```text
//! lac-ci <0-65535> <0-65535> lat <LAT> lon <LON>
//! no lac-ci <LAC> <CI>
//! cgi <MCC> <MNC> <LAC> <CI> lat <LAT> lon <LON>
//! no cgi <MCC> <MNC> <LAC> <CI>
//! ```
//!
//! Latitude and longitude are decimal strings with up to six fractional
//! digits, -90.0 (S) to 90.0 (N) and -180.0 (W) to 180.0 (E).

use core::fmt;

use smlc_core::cell_id::{CellIdentifier, Plmn};
use smlc_core::cell_locations::CellLocations;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellsCmd {
    Set { cell_id: CellIdentifier, lat: i32, lon: i32 },
    Remove { cell_id: CellIdentifier },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellsCmdErr {
    UnknownCommand(String),
    WrongArgCount { expected: usize, found: usize },
    BadNumber(String),
    BadMcc(String),
    BadMnc(String),
    BadLatitude(String),
    BadLongitude(String),
    ExpectedKeyword { keyword: &'static str, found: String },
    NoSuchEntry,
}

impl fmt::Display for CellsCmdErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellsCmdErr::UnknownCommand(cmd) => write!(f, "unknown command: '{}'", cmd),
            CellsCmdErr::WrongArgCount { expected, found } => {
                write!(f, "expected {} arguments, found {}", expected, found)
            }
            CellsCmdErr::BadNumber(s) => write!(f, "invalid number: '{}'", s),
            CellsCmdErr::BadMcc(s) => write!(f, "invalid MCC: '{}'", s),
            CellsCmdErr::BadMnc(s) => write!(f, "invalid MNC: '{}'", s),
            CellsCmdErr::BadLatitude(s) => write!(f, "invalid latitude: '{}'", s),
            CellsCmdErr::BadLongitude(s) => write!(f, "invalid longitude: '{}'", s),
            CellsCmdErr::ExpectedKeyword { keyword, found } => {
                write!(f, "expected '{}', found '{}'", keyword, found)
            }
            CellsCmdErr::NoSuchEntry => write!(f, "cannot remove, no such entry"),
        }
    }
}

impl CellsCmd {
    pub fn apply(&self, cells: &mut CellLocations) -> Result<(), CellsCmdErr> {
        match self {
            CellsCmd::Set { cell_id, lat, lon } => {
                cells.set(*cell_id, *lat, *lon);
                Ok(())
            }
            CellsCmd::Remove { cell_id } => {
                cells.remove(cell_id).map_err(|_| CellsCmdErr::NoSuchEntry)
            }
        }
    }
}

/// Parse one command line of the `cells` configuration node.
pub fn parse_cells_cmd(line: &str) -> Result<CellsCmd, CellsCmdErr> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["lac-ci", lac, ci, rest @ ..] => {
            let cell_id = parse_lac_ci(lac, ci)?;
            let (lat, lon) = parse_lat_lon(rest)?;
            Ok(CellsCmd::Set { cell_id, lat, lon })
        }
        ["no", "lac-ci", lac, ci] => {
            Ok(CellsCmd::Remove { cell_id: parse_lac_ci(lac, ci)? })
        }
        ["cgi", mcc, mnc, lac, ci, rest @ ..] => {
            let cell_id = parse_cgi(mcc, mnc, lac, ci)?;
            let (lat, lon) = parse_lat_lon(rest)?;
            Ok(CellsCmd::Set { cell_id, lat, lon })
        }
        ["no", "cgi", mcc, mnc, lac, ci] => {
            Ok(CellsCmd::Remove { cell_id: parse_cgi(mcc, mnc, lac, ci)? })
        }
        [] => Err(CellsCmdErr::UnknownCommand(String::new())),
        _ => Err(CellsCmdErr::UnknownCommand(line.trim().to_string())),
    }
}

fn parse_u16(s: &str) -> Result<u16, CellsCmdErr> {
    s.parse::<u16>().map_err(|_| CellsCmdErr::BadNumber(s.to_string()))
}

fn parse_lac_ci(lac: &str, ci: &str) -> Result<CellIdentifier, CellsCmdErr> {
    Ok(CellIdentifier::LacAndCi { lac: parse_u16(lac)?, ci: parse_u16(ci)? })
}

fn parse_cgi(mcc: &str, mnc: &str, lac: &str, ci: &str) -> Result<CellIdentifier, CellsCmdErr> {
    // MCC is always three digits; a leading-zero MNC of length three is a
    // different network than its two-digit form
    if mcc.len() != 3 || !mcc.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CellsCmdErr::BadMcc(mcc.to_string()));
    }
    if !(2..=3).contains(&mnc.len()) || !mnc.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CellsCmdErr::BadMnc(mnc.to_string()));
    }
    let plmn = Plmn {
        mcc: mcc.parse().map_err(|_| CellsCmdErr::BadMcc(mcc.to_string()))?,
        mnc: mnc.parse().map_err(|_| CellsCmdErr::BadMnc(mnc.to_string()))?,
        mnc_3_digits: mnc.len() == 3,
    };
    Ok(CellIdentifier::WholeGlobal { plmn, lac: parse_u16(lac)?, ci: parse_u16(ci)? })
}

fn parse_lat_lon(tokens: &[&str]) -> Result<(i32, i32), CellsCmdErr> {
    match tokens {
        ["lat", lat, "lon", lon] => {
            let lat_udeg = parse_udeg(lat, 90_000_000)
                .ok_or_else(|| CellsCmdErr::BadLatitude(lat.to_string()))?;
            let lon_udeg = parse_udeg(lon, 180_000_000)
                .ok_or_else(|| CellsCmdErr::BadLongitude(lon.to_string()))?;
            Ok((lat_udeg, lon_udeg))
        }
        [first, ..] if *first != "lat" => {
            Err(CellsCmdErr::ExpectedKeyword { keyword: "lat", found: first.to_string() })
        }
        _ => Err(CellsCmdErr::WrongArgCount { expected: 4, found: tokens.len() }),
    }
}

/// Parse a decimal degree string with up to six fractional digits into
/// micro-degrees, range-checked to +/- `limit`.
fn parse_udeg(s: &str, limit: i64) -> Option<i32> {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, s),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty() || frac_part.len() > 6 {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let int_val: i64 = int_part.parse().ok()?;
    let frac_scaled: i64 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse::<i64>().ok()? * 10i64.pow(6 - frac_part.len() as u32)
    };
    let udeg = sign * (int_val * 1_000_000 + frac_scaled);
    if udeg < -limit || udeg > limit {
        return None;
    }
    Some(udeg as i32)
}
