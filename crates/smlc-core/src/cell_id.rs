use core::fmt;

/// PLMN identity (MCC + MNC). `mnc_3_digits` distinguishes e.g. MNC 01 from
/// MNC 001, which are different networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Plmn {
    pub mcc: u16,
    pub mnc: u16,
    pub mnc_3_digits: bool,
}

impl Plmn {
    pub fn new(mcc: u16, mnc: u16) -> Self {
        Self { mcc, mnc, mnc_3_digits: false }
    }
}

impl fmt::Display for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mnc_3_digits {
            write!(f, "{:03}-{:03}", self.mcc, self.mnc)
        } else {
            write!(f, "{:03}-{:02}", self.mcc, self.mnc)
        }
    }
}

/// Cell Identifier as carried in the Cell Identifier IE (3GPP TS 48.008,
/// 3.2.2.17), tagged by cell identification discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellIdentifier {
    /// Discriminator 0000: the whole Cell Global Identification
    WholeGlobal { plmn: Plmn, lac: u16, ci: u16 },
    /// Discriminator 0001: Location Area Code and Cell Identity
    LacAndCi { lac: u16, ci: u16 },
    /// Discriminator 0010: Cell Identity only
    Ci(u16),
    /// Discriminator 0011: no cell is associated with the transaction
    NoCell,
    /// Discriminator 0101: Location Area Code only
    Lac(u16),
}

/// A cell identifier projected onto CGI space; absent fields are fields the
/// discriminator does not carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CgiParts {
    pub plmn: Option<Plmn>,
    pub lac: Option<u16>,
    pub ci: Option<u16>,
}

impl CellIdentifier {
    pub fn discriminator(&self) -> u8 {
        match self {
            CellIdentifier::WholeGlobal { .. } => 0x00,
            CellIdentifier::LacAndCi { .. } => 0x01,
            CellIdentifier::Ci(_) => 0x02,
            CellIdentifier::NoCell => 0x03,
            CellIdentifier::Lac(_) => 0x05,
        }
    }

    pub fn cgi_parts(&self) -> CgiParts {
        match *self {
            CellIdentifier::WholeGlobal { plmn, lac, ci } => CgiParts {
                plmn: Some(plmn),
                lac: Some(lac),
                ci: Some(ci),
            },
            CellIdentifier::LacAndCi { lac, ci } => CgiParts {
                plmn: None,
                lac: Some(lac),
                ci: Some(ci),
            },
            CellIdentifier::Ci(ci) => CgiParts { plmn: None, lac: None, ci: Some(ci) },
            CellIdentifier::Lac(lac) => CgiParts { plmn: None, lac: Some(lac), ci: None },
            CellIdentifier::NoCell => CgiParts::default(),
        }
    }

    /// Compare two cell identifiers. With `exact`, discriminator and all
    /// fields must coincide. Without, both sides are projected onto CGI space
    /// and the fields present on both sides must be equal; identifiers that
    /// share no field at all never match.
    pub fn matches(&self, other: &CellIdentifier, exact: bool) -> bool {
        if exact {
            return self == other;
        }
        let a = self.cgi_parts();
        let b = other.cgi_parts();
        let mut have_common = false;
        if let (Some(x), Some(y)) = (a.plmn, b.plmn) {
            if x != y {
                return false;
            }
            have_common = true;
        }
        if let (Some(x), Some(y)) = (a.lac, b.lac) {
            if x != y {
                return false;
            }
            have_common = true;
        }
        if let (Some(x), Some(y)) = (a.ci, b.ci) {
            if x != y {
                return false;
            }
            have_common = true;
        }
        have_common
    }

    /// Replace the CI part while keeping the original discriminator, so a
    /// response refers to the cell in the same form the peer used. For
    /// discriminators that carry no CI the identifier is returned unchanged.
    pub fn with_ci(&self, new_ci: u16) -> CellIdentifier {
        let mut parts = self.cgi_parts();
        parts.ci = Some(new_ci);
        self.rebuild(parts)
    }

    /// Rebuild an identifier of this discriminator from CGI parts, keeping
    /// current values for any part that is absent.
    fn rebuild(&self, parts: CgiParts) -> CellIdentifier {
        match *self {
            CellIdentifier::WholeGlobal { plmn, lac, ci } => CellIdentifier::WholeGlobal {
                plmn: parts.plmn.unwrap_or(plmn),
                lac: parts.lac.unwrap_or(lac),
                ci: parts.ci.unwrap_or(ci),
            },
            CellIdentifier::LacAndCi { lac, ci } => CellIdentifier::LacAndCi {
                lac: parts.lac.unwrap_or(lac),
                ci: parts.ci.unwrap_or(ci),
            },
            CellIdentifier::Ci(ci) => CellIdentifier::Ci(parts.ci.unwrap_or(ci)),
            CellIdentifier::Lac(lac) => CellIdentifier::Lac(parts.lac.unwrap_or(lac)),
            CellIdentifier::NoCell => CellIdentifier::NoCell,
        }
    }
}

impl fmt::Display for CellIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellIdentifier::WholeGlobal { plmn, lac, ci } => {
                write!(f, "CGI:{}-{}-{}", plmn, lac, ci)
            }
            CellIdentifier::LacAndCi { lac, ci } => write!(f, "LAC-CI:{}-{}", lac, ci),
            CellIdentifier::Ci(ci) => write!(f, "CI:{}", ci),
            CellIdentifier::Lac(lac) => write!(f, "LAC:{}", lac),
            CellIdentifier::NoCell => write!(f, "no-cell"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cgi(mcc: u16, mnc: u16, lac: u16, ci: u16) -> CellIdentifier {
        CellIdentifier::WholeGlobal { plmn: Plmn::new(mcc, mnc), lac, ci }
    }

    #[test]
    fn relaxed_match_projects_to_common_fields() {
        let full = cgi(1, 1, 23, 42);
        let lac_ci = CellIdentifier::LacAndCi { lac: 23, ci: 42 };

        assert!(!full.matches(&lac_ci, true));
        assert!(full.matches(&lac_ci, false));
        assert!(lac_ci.matches(&full, false));

        assert!(!full.matches(&CellIdentifier::LacAndCi { lac: 23, ci: 43 }, false));
        assert!(full.matches(&CellIdentifier::Ci(42), false));
        assert!(full.matches(&CellIdentifier::Lac(23), false));

        // Nothing in common, no match
        assert!(!CellIdentifier::Lac(23).matches(&CellIdentifier::Ci(42), false));
        assert!(!full.matches(&CellIdentifier::NoCell, false));
    }

    #[test]
    fn with_ci_keeps_discriminator() {
        let full = cgi(1, 1, 23, 42);
        assert_eq!(full.with_ci(99), cgi(1, 1, 23, 99));

        let lac_ci = CellIdentifier::LacAndCi { lac: 23, ci: 42 };
        assert_eq!(lac_ci.with_ci(99), CellIdentifier::LacAndCi { lac: 23, ci: 99 });

        assert_eq!(CellIdentifier::Ci(42).with_ci(99), CellIdentifier::Ci(99));

        // LAC carries no CI, overlay leaves it alone
        assert_eq!(CellIdentifier::Lac(23).with_ci(99), CellIdentifier::Lac(23));
    }
}
