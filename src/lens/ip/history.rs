//! Session lookup history
//!
//! Most-recent-first, unique by address, bounded to [`HISTORY_LIMIT`] entries.
//! Entries leave only through overflow eviction.

use std::collections::VecDeque;
use std::sync::Arc;

use super::types::IpRecord;

/// Maximum number of records kept in history
pub const HISTORY_LIMIT: usize = 10;

/// Number of entries shown in the "recent lookups" listing
pub const RECENT_DISPLAY_LIMIT: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: VecDeque<Arc<IpRecord>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup result.
    ///
    /// An existing entry with the same address is removed first, so the new
    /// entry takes the front position with its own values.
    pub fn record(&mut self, entry: Arc<IpRecord>) {
        self.entries.retain(|e| e.ip != entry.ip);
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Entry at `index`, 0 being the most recent
    pub fn get(&self, index: usize) -> Option<&Arc<IpRecord>> {
        self.entries.get(index)
    }

    /// Up to `n` most recent entries
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Arc<IpRecord>> {
        self.entries.iter().take(n)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<IpRecord>> {
        self.entries.iter()
    }

    pub fn addresses(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.ip.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::ip::enrich::enrich;
    use crate::lens::ip::types::{LookupKind, RawIpInfo};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn record_for(ip: &str, city: &str, rng: &mut StdRng) -> Arc<IpRecord> {
        let raw = RawIpInfo {
            ip: Some(ip.to_string()),
            city: Some(city.to_string()),
            ..Default::default()
        };
        Arc::new(enrich(&raw, LookupKind::Address, rng))
    }

    #[test]
    fn test_eviction_keeps_ten_most_recent() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut history = HistoryStore::new();
        let ips: Vec<String> = (1..=11).map(|i| format!("10.0.0.{}", i)).collect();
        for ip in &ips {
            history.record(record_for(ip, "x", &mut rng));
        }

        assert_eq!(history.len(), HISTORY_LIMIT);
        let expected: Vec<&str> = ips.iter().rev().take(10).map(|s| s.as_str()).collect();
        assert_eq!(history.addresses(), expected);
        assert!(!history.addresses().contains(&"10.0.0.1"));
    }

    #[test]
    fn test_replacement_moves_to_front() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut history = HistoryStore::new();
        history.record(record_for("1.1.1.1", "old", &mut rng));
        history.record(record_for("8.8.8.8", "b", &mut rng));
        history.record(record_for("9.9.9.9", "c", &mut rng));
        assert_eq!(history.len(), 3);

        let replacement = record_for("1.1.1.1", "new", &mut rng);
        history.record(replacement.clone());

        assert_eq!(history.len(), 3);
        assert_eq!(history.addresses(), vec!["1.1.1.1", "9.9.9.9", "8.8.8.8"]);
        let front = history.get(0).unwrap();
        assert_eq!(front.city, "new");
        assert!(Arc::ptr_eq(front, &replacement));
    }

    #[test]
    fn test_invariants_hold_for_mixed_sequence() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut history = HistoryStore::new();
        let sequence = [
            "1.1.1.1", "2.2.2.2", "1.1.1.1", "3.3.3.3", "4.4.4.4", "5.5.5.5", "6.6.6.6",
            "2.2.2.2", "7.7.7.7", "8.8.8.8", "9.9.9.9", "10.10.10.10", "11.11.11.11",
            "3.3.3.3", "12.12.12.12",
        ];
        for (i, ip) in sequence.iter().enumerate() {
            history.record(record_for(ip, "x", &mut rng));
            assert!(history.len() <= HISTORY_LIMIT);
            assert_eq!(history.get(0).unwrap().ip, *ip, "step {i}");
            let unique: HashSet<&str> = history.addresses().into_iter().collect();
            assert_eq!(unique.len(), history.len());
        }
        assert_eq!(
            history.addresses(),
            vec![
                "12.12.12.12",
                "3.3.3.3",
                "11.11.11.11",
                "10.10.10.10",
                "9.9.9.9",
                "8.8.8.8",
                "7.7.7.7",
                "2.2.2.2",
                "6.6.6.6",
                "5.5.5.5",
            ]
        );
    }

    #[test]
    fn test_recent_view() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut history = HistoryStore::new();
        assert!(history.is_empty());
        for i in 0..8 {
            history.record(record_for(&format!("192.0.2.{}", i), "x", &mut rng));
        }
        let recent: Vec<&str> = history
            .recent(RECENT_DISPLAY_LIMIT)
            .map(|r| r.ip.as_str())
            .collect();
        assert_eq!(
            recent,
            vec!["192.0.2.7", "192.0.2.6", "192.0.2.5", "192.0.2.4", "192.0.2.3"]
        );
        assert!(history.get(8).is_none());
    }
}
