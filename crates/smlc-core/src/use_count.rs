//! Tagged reference counting
//!
//! Instead of a bare counter, every hold on an object carries a diagnostic
//! label. A tag may be held more than once and must be released symmetrically;
//! releasing a tag that is not held is a programming error.

use core::fmt;

#[derive(Debug, Default)]
pub struct UseCount {
    entries: Vec<(&'static str, i32)>,
}

impl UseCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take one hold under `tag`. Returns the new total.
    pub fn get(&mut self, tag: &'static str) -> i32 {
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 += 1,
            None => self.entries.push((tag, 1)),
        }
        self.total()
    }

    /// Release one hold under `tag`. Returns the new total.
    ///
    /// Panics on underflow: a put without a matching get is a bug.
    pub fn put(&mut self, tag: &'static str) -> i32 {
        let entry = self
            .entries
            .iter_mut()
            .find(|(t, _)| *t == tag)
            .unwrap_or_else(|| panic!("use count put without get: {}", tag));
        entry.1 -= 1;
        assert!(entry.1 >= 0, "use count underflow: {}", tag);
        self.entries.retain(|(_, count)| *count > 0);
        self.total()
    }

    pub fn total(&self) -> i32 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn count(&self, tag: &'static str) -> i32 {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

impl fmt::Display for UseCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "-");
        }
        write!(f, "{}x ", self.total())?;
        for (i, (tag, count)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if *count == 1 {
                write!(f, "{}", tag)?;
            } else {
                write!(f, "{}x{}", count, tag)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_put_roundtrip() {
        let mut uc = UseCount::new();
        assert_eq!(uc.get("foo"), 1);
        assert_eq!(uc.get("bar"), 2);
        assert_eq!(uc.get("foo"), 3);
        assert_eq!(uc.count("foo"), 2);

        assert_eq!(uc.put("foo"), 2);
        assert_eq!(uc.put("bar"), 1);
        assert_eq!(uc.put("foo"), 0);
        assert_eq!(uc.count("foo"), 0);
    }

    #[test]
    #[should_panic(expected = "use count put without get")]
    fn put_without_get_panics() {
        let mut uc = UseCount::new();
        uc.get("foo");
        uc.put("bar");
    }

    #[test]
    fn display() {
        let mut uc = UseCount::new();
        assert_eq!(uc.to_string(), "-");
        uc.get("smlc_loc_req");
        uc.get("Lb-conn");
        uc.get("Lb-conn");
        assert_eq!(uc.to_string(), "3x smlc_loc_req,2xLb-conn");
    }
}
