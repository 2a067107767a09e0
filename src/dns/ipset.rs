//! Order-preserving address deduplication.
//!
//! Tier order in the engine encodes preference, and callers dial index 0
//! first, so deduplication must keep first-seen order rather than sort.
//!
//! Two addresses are the same when their canonical text forms match. An
//! IPv4 address and its IPv4-mapped IPv6 form (`10.0.0.5` and
//! `::ffff:10.0.0.5`) print differently and are kept as distinct entries.

use std::{collections::HashSet, net::IpAddr};

/// Insertion-ordered set of addresses.
#[derive(Debug, Default, Clone)]
pub struct IpSet {
    seen: HashSet<IpAddr>,
    order: Vec<IpAddr>,
}

impl IpSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `addr` unless it is already present. Returns true if inserted.
    pub fn insert(&mut self, addr: IpAddr) -> bool {
        if self.seen.insert(addr) {
            self.order.push(addr);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[IpAddr] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<IpAddr> {
        self.order
    }
}

impl Extend<IpAddr> for IpSet {
    fn extend<T: IntoIterator<Item = IpAddr>>(&mut self, iter: T) {
        for addr in iter {
            self.insert(addr);
        }
    }
}

impl FromIterator<IpAddr> for IpSet {
    fn from_iter<T: IntoIterator<Item = IpAddr>>(iter: T) -> Self {
        let mut set = IpSet::new();
        set.extend(iter);
        set
    }
}

/// Removes duplicates from `addrs`, keeping the first occurrence of each.
///
/// Lists shorter than two are returned as-is.
pub fn dedupe(addrs: Vec<IpAddr>) -> Vec<IpAddr> {
    if addrs.len() < 2 {
        return addrs;
    }
    addrs.into_iter().collect::<IpSet>().into_vec()
}

/// Like [`dedupe`], but also drops missing entries.
pub fn dedupe_present<I>(addrs: I) -> Vec<IpAddr>
where
    I: IntoIterator<Item = Option<IpAddr>>,
{
    addrs.into_iter().flatten().collect::<IpSet>().into_vec()
}
