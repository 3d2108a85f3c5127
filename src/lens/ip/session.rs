//! Lookup session
//!
//! Holds the currently displayed record and the lookup history for one user
//! session. Only one lookup may be in flight at a time: a second request while
//! one is pending is rejected with [`LookupError::Busy`], never queued.
//! The current record and history are replaced together under one lock once
//! enrichment has finished; a failed lookup leaves both untouched.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use super::client::IpInfoSource;
use super::enrich::enrich;
use super::error::{ExportError, LookupError};
use super::export::{export, ExportArtifact};
use super::history::HistoryStore;
use super::types::{IpRecord, LookupKind};
use super::validate::validate_address;

#[derive(Debug, Default)]
struct SessionState {
    current: Option<Arc<IpRecord>>,
    history: HistoryStore,
}

/// Releases the session's busy flag when dropped
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct LookupSession {
    source: Box<dyn IpInfoSource>,
    busy: AtomicBool,
    rng: Mutex<StdRng>,
    state: Mutex<SessionState>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LookupSession {
    /// Session with an OS-seeded random source
    pub fn new(source: Box<dyn IpInfoSource>) -> Self {
        Self::with_rng(source, StdRng::from_os_rng())
    }

    /// Session whose enrichment values are reproducible
    pub fn with_seed(source: Box<dyn IpInfoSource>, seed: u64) -> Self {
        Self::with_rng(source, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(source: Box<dyn IpInfoSource>, rng: StdRng) -> Self {
        Self {
            source,
            busy: AtomicBool::new(false),
            rng: Mutex::new(rng),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Claim the single lookup slot
    pub fn try_begin(&self) -> Result<BusyGuard<'_>, LookupError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LookupError::Busy)?;
        Ok(BusyGuard { flag: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Look up the caller's own public address
    pub fn lookup_self(&self) -> Result<Arc<IpRecord>, LookupError> {
        self.run(None, LookupKind::SelfLookup)
    }

    /// Validate `input` and look it up. Invalid input never reaches the network.
    pub fn lookup_address(&self, input: &str) -> Result<Arc<IpRecord>, LookupError> {
        let address = validate_address(input)?;
        self.run(Some(address), LookupKind::Address)
    }

    fn run(&self, target: Option<&str>, kind: LookupKind) -> Result<Arc<IpRecord>, LookupError> {
        let _guard = self.try_begin()?;

        let raw = self.source.fetch(target).inspect_err(|e| {
            warn!("{} lookup of {} failed: {}", kind, target.unwrap_or("own address"), e);
        })?;

        let record = {
            let mut rng = lock(&self.rng);
            Arc::new(enrich(&raw, kind, &mut *rng))
        };

        {
            let mut state = lock(&self.state);
            state.current = Some(Arc::clone(&record));
            state.history.record(Arc::clone(&record));
        }

        info!("{} lookup completed for {}", kind, record.ip);
        Ok(record)
    }

    /// The record currently on display
    pub fn current(&self) -> Option<Arc<IpRecord>> {
        lock(&self.state).current.clone()
    }

    /// Re-display a history entry (0 = most recent) without a new lookup
    pub fn view(&self, index: usize) -> Option<Arc<IpRecord>> {
        let mut state = lock(&self.state);
        let entry = state.history.get(index).cloned()?;
        state.current = Some(Arc::clone(&entry));
        Some(entry)
    }

    /// Snapshot of the history, most recent first
    pub fn history(&self) -> Vec<Arc<IpRecord>> {
        lock(&self.state).history.entries().cloned().collect()
    }

    /// Up to `n` most recent history entries, newest first
    pub fn recent(&self, n: usize) -> Vec<Arc<IpRecord>> {
        lock(&self.state).history.recent(n).cloned().collect()
    }

    /// Export the current record, if any
    pub fn export_current(&self) -> Result<Option<ExportArtifact>, ExportError> {
        match self.current() {
            Some(record) => Ok(Some(export(&record)?)),
            None => Ok(None),
        }
    }
}
