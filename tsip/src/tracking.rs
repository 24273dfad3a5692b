use log::warn;

use crate::error::TableError;

/// What a full table does with one more entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverflowPolicy {
    /// Discard the new entry (logged).
    Drop,
    /// Overwrite the last slot (logged).
    ClampLast,
    /// Refuse the entry with [`TableError::Full`].
    Reject,
}

/// Outcome of an accepted insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Appended(usize),
    Updated(usize),
    Clamped(usize),
    Dropped,
}

/// Entries keyed by satellite PRN.
pub trait PrnKeyed {
    fn prn(&self) -> u8;
}

/// A capacity-bounded list of per-satellite records.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundedTable<T> {
    entries: Vec<T>,
    capacity: usize,
    policy: OverflowPolicy,
    #[cfg_attr(feature = "serde", serde(skip))]
    label: &'static str,
}

impl<T> BoundedTable<T> {
    pub fn new(label: &'static str, capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            policy,
            label,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: OverflowPolicy) {
        self.policy = policy;
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Appends in arrival order.
    pub fn push(&mut self, entry: T) -> Result<Inserted, TableError> {
        if !self.is_full() {
            self.entries.push(entry);
            return Ok(Inserted::Appended(self.entries.len() - 1));
        }
        self.overflow(entry)
    }

    fn overflow(&mut self, entry: T) -> Result<Inserted, TableError> {
        match self.policy {
            OverflowPolicy::Drop => {
                warn!("{} table full ({}), dropping entry", self.label, self.capacity);
                Ok(Inserted::Dropped)
            },
            OverflowPolicy::ClampLast => {
                warn!(
                    "{} table full ({}), overwriting last slot",
                    self.label, self.capacity
                );
                match self.entries.last_mut() {
                    Some(last) => {
                        *last = entry;
                        Ok(Inserted::Clamped(self.entries.len() - 1))
                    },
                    // zero capacity: nothing to overwrite
                    None => Ok(Inserted::Dropped),
                }
            },
            OverflowPolicy::Reject => {
                warn!("{} table full ({}), entry rejected", self.label, self.capacity);
                Err(TableError::Full {
                    capacity: self.capacity,
                })
            },
        }
    }
}

impl<T: PrnKeyed> BoundedTable<T> {
    pub fn find_by_prn(&self, prn: u8) -> Option<usize> {
        self.entries.iter().position(|e| e.prn() == prn)
    }

    pub fn get_by_prn(&self, prn: u8) -> Option<&T> {
        self.find_by_prn(prn).map(|i| &self.entries[i])
    }

    /// Updates the entry with the same PRN in place, or appends a new one.
    pub fn upsert(&mut self, entry: T) -> Result<Inserted, TableError> {
        match self.find_by_prn(entry.prn()) {
            Some(index) => {
                self.entries[index] = entry;
                Ok(Inserted::Updated(index))
            },
            None => self.push(entry),
        }
    }
}

impl<'a, T> IntoIterator for &'a BoundedTable<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

pub(crate) const RAW_MEASUREMENT_LABEL: &str = "raw measurement";
pub(crate) const TRACKING_LABEL: &str = "tracking status";

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Sv(u8, u32);

    impl PrnKeyed for Sv {
        fn prn(&self) -> u8 {
            self.0
        }
    }

    #[test]
    fn push_drop_policy() {
        let mut table = BoundedTable::new("test", 2, OverflowPolicy::Drop);
        assert_eq!(table.push(Sv(1, 0)), Ok(Inserted::Appended(0)));
        assert_eq!(table.push(Sv(2, 0)), Ok(Inserted::Appended(1)));
        assert_eq!(table.push(Sv(3, 0)), Ok(Inserted::Dropped));
        assert_eq!(table.as_slice(), &[Sv(1, 0), Sv(2, 0)]);
    }

    #[test]
    fn upsert_updates_in_place() {
        let mut table = BoundedTable::new("test", 4, OverflowPolicy::ClampLast);
        table.upsert(Sv(7, 1)).unwrap();
        table.upsert(Sv(9, 1)).unwrap();
        assert_eq!(table.upsert(Sv(7, 2)), Ok(Inserted::Updated(0)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_by_prn(7), Some(&Sv(7, 2)));
        assert_eq!(table.find_by_prn(3), None);
    }

    #[test]
    fn upsert_clamps_to_last_slot() {
        let mut table = BoundedTable::new("test", 2, OverflowPolicy::ClampLast);
        table.upsert(Sv(1, 0)).unwrap();
        table.upsert(Sv(2, 0)).unwrap();
        assert_eq!(table.upsert(Sv(3, 0)), Ok(Inserted::Clamped(1)));
        assert_eq!(table.as_slice(), &[Sv(1, 0), Sv(3, 0)]);
    }

    #[test]
    fn reject_policy_reports_full() {
        let mut table = BoundedTable::new("test", 1, OverflowPolicy::Reject);
        table.upsert(Sv(1, 0)).unwrap();
        assert_eq!(
            table.upsert(Sv(2, 0)),
            Err(TableError::Full { capacity: 1 })
        );
        // updates of known PRNs still go through
        assert_eq!(table.upsert(Sv(1, 5)), Ok(Inserted::Updated(0)));
    }

    #[test]
    fn clear_forgets_prns() {
        let mut table = BoundedTable::new("test", 2, OverflowPolicy::Drop);
        table.push(Sv(4, 0)).unwrap();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.find_by_prn(4), None);
    }
}
