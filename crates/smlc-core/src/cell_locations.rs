//! Configured cell positions and the TA-based location estimate

use core::fmt;

use crate::cell_id::CellIdentifier;
use crate::gad::{self, Gad};

/// One TA step corresponds to roughly 550 m of GSM round-trip path.
pub fn ta_to_uncertainty_m(ta: u8) -> u32 {
    ta as u32 * 550
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocation {
    pub cell_id: CellIdentifier,
    /// latitude in micro degrees (degrees * 1e6)
    pub lat: i32,
    /// longitude in micro degrees (degrees * 1e6)
    pub lon: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no such entry")
    }
}

/// The cell location table, mutated only by configuration commands.
/// Kept in insertion order: lookups resolve ties by the earliest entry.
#[derive(Debug, Default)]
pub struct CellLocations {
    cells: Vec<CellLocation>,
}

impl CellLocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellLocation> {
        self.cells.iter()
    }

    /// Upsert by exact cell id equality, discriminator included.
    pub fn set(&mut self, cell_id: CellIdentifier, lat: i32, lon: i32) {
        match self.cells.iter_mut().find(|c| c.cell_id == cell_id) {
            Some(cell) => {
                cell.lat = lat;
                cell.lon = lon;
            }
            None => self.cells.push(CellLocation { cell_id, lat, lon }),
        }
    }

    pub fn remove(&mut self, cell_id: &CellIdentifier) -> Result<(), NotFound> {
        let len_before = self.cells.len();
        self.cells.retain(|c| c.cell_id != *cell_id);
        if self.cells.len() == len_before {
            return Err(NotFound);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Two-pass lookup: first exact discriminator match, then the relaxed
    /// common-subset comparison. First hit wins in each pass.
    pub fn find(&self, cell_id: &CellIdentifier) -> Option<&CellLocation> {
        self.cells
            .iter()
            .find(|c| c.cell_id.matches(cell_id, true))
            .or_else(|| self.cells.iter().find(|c| c.cell_id.matches(cell_id, false)))
    }

    /// Build the location estimate for a cell and a timing advance. The
    /// uncertainty is run through the GAD coding round-trip so the value
    /// matches what actually goes on the wire.
    pub fn gad_from_ta(&self, cell_id: &CellIdentifier, ta: u8) -> Result<Gad, NotFound> {
        let cell = self.find(cell_id).ok_or(NotFound)?;
        Ok(Gad::EllipsoidPointUncCircle {
            lat: cell.lat,
            lon: cell.lon,
            unc_mm: gad::dec_unc(gad::enc_unc(ta_to_uncertainty_m(ta) * 1000)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_id::Plmn;

    fn cgi(mcc: u16, mnc: u16, lac: u16, ci: u16) -> CellIdentifier {
        CellIdentifier::WholeGlobal { plmn: Plmn::new(mcc, mnc), lac, ci }
    }

    #[test]
    fn ta_steps() {
        assert_eq!(ta_to_uncertainty_m(0), 0);
        assert_eq!(ta_to_uncertainty_m(1), 550);
        assert_eq!(ta_to_uncertainty_m(63), 34650);
    }

    #[test]
    fn two_pass_lookup() {
        let mut cells = CellLocations::new();
        cells.set(cgi(1, 1, 23, 42), 23_000_000, 42_000_000);

        // relaxed pass resolves a LAC+CI query against the CGI entry
        let q = CellIdentifier::LacAndCi { lac: 23, ci: 42 };
        let hit = cells.find(&q).expect("relaxed match");
        assert_eq!(hit.cell_id, cgi(1, 1, 23, 42));

        assert!(cells.find(&CellIdentifier::LacAndCi { lac: 23, ci: 43 }).is_none());
    }

    #[test]
    fn exact_hit_wins_over_relaxed() {
        let mut cells = CellLocations::new();
        cells.set(cgi(1, 1, 23, 42), 1, 1);
        cells.set(CellIdentifier::LacAndCi { lac: 23, ci: 42 }, 2, 2);

        // the second entry relaxed-matches the first, but the exact pass wins
        let hit = cells.find(&CellIdentifier::LacAndCi { lac: 23, ci: 42 }).unwrap();
        assert_eq!(hit.lat, 2);

        // ties within a pass resolve by insertion order
        let hit = cells.find(&CellIdentifier::Ci(42)).unwrap();
        assert_eq!(hit.lat, 1);
    }

    #[test]
    fn set_remove() {
        let mut cells = CellLocations::new();
        let id = CellIdentifier::LacAndCi { lac: 1, ci: 2 };
        cells.set(id, 10, 20);
        cells.set(id, 30, 40);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells.find(&id).unwrap().lat, 30);

        assert!(cells.remove(&id).is_ok());
        assert_eq!(cells.remove(&id), Err(NotFound));
    }

    #[test]
    fn gad_from_ta() {
        let mut cells = CellLocations::new();
        cells.set(cgi(1, 1, 23, 42), 23_000_000, 42_000_000);

        let gad = cells.gad_from_ta(&cgi(1, 1, 23, 42), 5).unwrap();
        let Gad::EllipsoidPointUncCircle { lat, lon, unc_mm } = gad;
        assert_eq!(lat, 23_000_000);
        assert_eq!(lon, 42_000_000);
        // 5 TA steps = 2750 m, rounded up to the nearest representable value
        assert!(unc_mm >= 2_750_000);
        assert_eq!(unc_mm, crate::gad::dec_unc(crate::gad::enc_unc(2_750_000)));

        assert_eq!(cells.gad_from_ta(&CellIdentifier::Ci(7), 5), Err(NotFound));
    }
}
