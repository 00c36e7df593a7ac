//! Process-wide request counters
//!
//! Well-known counters live in a fixed table of atomic cells created at
//! construction. Any other name gets its own cell on first use. Every update
//! is a single atomic read-modify-write; there is no global lock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// Inbound requests seen by the dispatcher
pub const REQUESTS: &str = "requests";
/// Responses produced by the dispatcher
pub const RESPONSES: &str = "responses";
/// Failures caught outside the per-request boundary
pub const HIDDEN_ERRORS: &str = "hidden_errors";

const WELL_KNOWN: [&str; 14] = [
    REQUESTS,
    RESPONSES,
    HIDDEN_ERRORS,
    "GET",
    "POST",
    "PUT",
    "DELETE",
    "200",
    "204",
    "400",
    "403",
    "404",
    "405",
    "500",
];

const NEVER: i64 = i64::MIN;

/// Shared counter table
///
/// # Example
///
/// ```rust
/// use restmux::state::{ServiceState, REQUESTS};
///
/// let state = ServiceState::new();
/// state.increment(REQUESTS);
/// state.increment("cache_misses");
///
/// assert_eq!(state.get(REQUESTS), 1);
/// assert_eq!(state.get("cache_misses"), 1);
/// assert_eq!(state.get("never_touched"), 0);
/// ```
#[derive(Debug)]
pub struct ServiceState {
    started_at: DateTime<Utc>,
    last_request_ms: AtomicI64,
    fixed: [AtomicU64; WELL_KNOWN.len()],
    lazy: DashMap<String, AtomicU64>,
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceState {
    /// Create a counter table with every well-known counter at zero
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            last_request_ms: AtomicI64::new(NEVER),
            fixed: std::array::from_fn(|_| AtomicU64::new(0)),
            lazy: DashMap::new(),
        }
    }

    fn fixed_cell(&self, name: &str) -> Option<&AtomicU64> {
        WELL_KNOWN
            .iter()
            .position(|known| *known == name)
            .map(|idx| &self.fixed[idx])
    }

    /// Add one to a counter, returning the new value
    pub fn increment(&self, name: &str) -> u64 {
        self.add(name, 1)
    }

    /// Add `delta` to a counter, returning the new value
    pub fn add(&self, name: &str, delta: u64) -> u64 {
        if let Some(cell) = self.fixed_cell(name) {
            return cell.fetch_add(delta, Ordering::Relaxed) + delta;
        }
        if let Some(cell) = self.lazy.get(name) {
            return cell.fetch_add(delta, Ordering::Relaxed) + delta;
        }
        let cell = self
            .lazy
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        cell.fetch_add(delta, Ordering::Relaxed) + delta
    }

    /// Raise a counter to `value` if it is currently lower
    pub fn set_max(&self, name: &str, value: u64) {
        if let Some(cell) = self.fixed_cell(name) {
            cell.fetch_max(value, Ordering::Relaxed);
            return;
        }
        self.lazy
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_max(value, Ordering::Relaxed);
    }

    /// Current value; zero for names never incremented
    pub fn get(&self, name: &str) -> u64 {
        if let Some(cell) = self.fixed_cell(name) {
            return cell.load(Ordering::Relaxed);
        }
        self.lazy
            .get(name)
            .map(|cell| cell.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Count an inbound request and its method
    pub fn record_request(&self, method: &Method) {
        self.increment(REQUESTS);
        self.increment(method.as_str());
        self.last_request_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Count a produced response and its status code
    pub fn record_response(&self, status: StatusCode) {
        self.increment(RESPONSES);
        self.increment(status.as_str());
    }

    /// Count a failure caught outside the per-request boundary
    pub fn record_hidden_error(&self) {
        self.increment(HIDDEN_ERRORS);
    }

    /// When this table was created
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Arrival time of the most recent request
    pub fn last_request_at(&self) -> Option<DateTime<Utc>> {
        match self.last_request_ms.load(Ordering::Relaxed) {
            NEVER => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }

    /// Point-in-time copy of every counter
    ///
    /// Cells are read one by one, so counters updated concurrently may be
    /// off by in-flight requests relative to each other.
    pub fn snapshot(&self) -> CounterSnapshot {
        let mut counters: BTreeMap<String, u64> = WELL_KNOWN
            .iter()
            .zip(self.fixed.iter())
            .map(|(name, cell)| (name.to_string(), cell.load(Ordering::Relaxed)))
            .collect();
        for entry in self.lazy.iter() {
            counters.insert(entry.key().clone(), entry.value().load(Ordering::Relaxed));
        }

        let now = Utc::now();
        CounterSnapshot {
            started_at: self.started_at,
            last_request_at: self.last_request_at(),
            uptime_secs: (now - self.started_at).num_seconds().max(0) as u64,
            counters,
        }
    }
}

/// Serializable view of the counter table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// When counting started
    pub started_at: DateTime<Utc>,
    /// Arrival time of the most recent request
    pub last_request_at: Option<DateTime<Utc>>,
    /// Seconds since `started_at`
    pub uptime_secs: u64,
    /// Every counter by name
    pub counters: BTreeMap<String, u64>,
}
