//! Per-key single-flight gating for cache fills.
//!
//! Guarantees that for any given key, at most one fill future runs at a
//! time within this process; every concurrent caller for that key awaits
//! the same in-flight result (value or error). Callers for different keys
//! never block each other.
//!
//! The fill runs as a detached task: a caller that abandons its request
//! stops waiting, but the fill keeps running because other waiters may
//! still depend on it.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;

/// The in-flight fill registry.
///
/// `V` is the shared result type; it must be `Clone` so one fill outcome can
/// fan out to every waiter.
pub struct FlightGroup<V> {
    flights: Arc<DashMap<String, watch::Receiver<Option<V>>>>,
}

/// The fill task was dropped before producing a result (runtime shutdown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("in-flight fetch aborted before completing")]
pub struct FlightAborted;

impl<V> Default for FlightGroup<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Evicts a registry entry on drop, so a fill that panics (or a task that
/// is dropped at runtime shutdown) never leaves a dead flight behind.
struct FlightGuard<V> {
    flights: Arc<DashMap<String, watch::Receiver<Option<V>>>>,
    key: String,
}

impl<V> Drop for FlightGuard<V> {
    fn drop(&mut self) {
        self.flights.remove(&self.key);
    }
}

impl<V> FlightGroup<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flights: Arc::new(DashMap::new()),
        }
    }

    /// Number of fills currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }

    /// Runs `fill` under the single-flight gate for `key`.
    ///
    /// The first caller for a key becomes the leader: it registers the
    /// flight and spawns `fill` as a detached task. Every caller (leader
    /// included) then awaits the flight's result. The registry entry is
    /// removed *before* the result is broadcast, so a caller arriving after
    /// a failed fill starts a fresh flight instead of observing the stale
    /// error.
    pub async fn run<F>(&self, key: &str, fill: F) -> Result<V, FlightAborted>
    where
        F: Future<Output = V> + Send + 'static,
    {
        let rx = match self.flights.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let (tx, rx) = watch::channel(None);
                entry.insert(rx.clone());

                let evict = FlightGuard {
                    flights: Arc::clone(&self.flights),
                    key: key.to_string(),
                };
                tokio::spawn(async move {
                    let value = fill.await;
                    drop(evict);
                    // Waiters hold their own receiver clones; send after
                    // removal still reaches all of them.
                    let _ = tx.send(Some(value));
                });
                rx
            }
        };

        let mut rx = rx;
        let slot = rx
            .wait_for(|slot| slot.is_some())
            .await
            .map_err(|_| FlightAborted)?;
        match slot.as_ref() {
            Some(value) => Ok(value.clone()),
            None => Err(FlightAborted),
        }
    }
}
