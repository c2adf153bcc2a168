//! Subscriber records, interned by IMSI

use core::fmt;

use smlc_core::identity::Imsi;
use smlc_core::UseCount;

/// Use tag held by an LbConn on its bound subscriber
pub const SMLC_SUBSCR_USE_LB_CONN: &str = "Lb-conn";

#[derive(Debug)]
pub struct SmlcSubscriber {
    pub imsi: Imsi,
    pub use_count: UseCount,
}

impl fmt::Display for SmlcSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.imsi, self.use_count)
    }
}

/// Registry of all subscribers the SMLC currently knows. At most one record
/// exists per IMSI; a record lives for as long as anything holds a use tag
/// on it.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: Vec<SmlcSubscriber>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn contains(&self, imsi: &Imsi) -> bool {
        self.subscribers.iter().any(|s| s.imsi == *imsi)
    }

    /// Look up a subscriber; on a hit, one hold under `tag` is taken.
    pub fn find(&mut self, imsi: &Imsi, tag: &'static str) -> Option<&SmlcSubscriber> {
        let subscr = self.subscribers.iter_mut().find(|s| s.imsi == *imsi)?;
        subscr.use_count.get(tag);
        tracing::debug!("{} + {}", subscr, tag);
        Some(subscr)
    }

    /// Like `find`, but allocates the record when absent.
    pub fn find_or_create(&mut self, imsi: &Imsi, tag: &'static str) -> &SmlcSubscriber {
        if !self.contains(imsi) {
            tracing::info!("new subscriber {}", imsi);
            self.subscribers
                .push(SmlcSubscriber { imsi: imsi.clone(), use_count: UseCount::new() });
        }
        self.find(imsi, tag).expect("just inserted")
    }

    /// Take one more hold on an existing record. The record must exist.
    pub fn get(&mut self, imsi: &Imsi, tag: &'static str) {
        let subscr = self
            .subscribers
            .iter_mut()
            .find(|s| s.imsi == *imsi)
            .unwrap_or_else(|| panic!("get on unknown subscriber {}", imsi));
        subscr.use_count.get(tag);
        tracing::debug!("{} + {}", subscr, tag);
    }

    /// Release one hold. When the total reaches zero the record is freed.
    pub fn put(&mut self, imsi: &Imsi, tag: &'static str) {
        let idx = self
            .subscribers
            .iter()
            .position(|s| s.imsi == *imsi)
            .unwrap_or_else(|| panic!("put on unknown subscriber {}", imsi));
        let total = self.subscribers[idx].use_count.put(tag);
        tracing::debug!("{} - {}", self.subscribers[idx], tag);
        if total == 0 {
            tracing::info!("removing subscriber {}", self.subscribers[idx].imsi);
            self.subscribers.remove(idx);
        }
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}
