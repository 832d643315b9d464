//! In-flight request coalescer.
//!
//! Concurrent requests for the same (kind, domain, key) share a single
//! provider refresh; every waiter receives the identical terminal outcome.

use identra_core::LookupKind;
use identra_store::{ProviderError, RefreshOutcome};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

/// Coalescing key: one provider call may be outstanding per key at a time.
pub type FlightKey = (LookupKind, String, String);

/// Table of provider calls currently in flight.
///
/// The first submitter for a key becomes the leader; its call runs in a
/// detached task so a cancelled waiter never aborts a refresh other waiters
/// (or the cache) still benefit from.
#[derive(Debug, Default)]
pub struct InflightTable {
    flights: Mutex<HashMap<FlightKey, broadcast::Sender<RefreshOutcome>>>,
}

impl InflightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins or starts the flight for `key`.
    ///
    /// If a flight is already outstanding the call future is dropped unused
    /// and the existing flight's outcome is awaited instead.
    pub async fn submit<F>(self: &Arc<Self>, key: FlightKey, call: F) -> RefreshOutcome
    where
        F: Future<Output = RefreshOutcome> + Send + 'static,
    {
        let mut rx = {
            let mut flights = self.flights.lock().await;
            match flights.get(&key) {
                Some(tx) => {
                    debug!(
                        kind = %key.0,
                        domain = %key.1,
                        identifier = %key.2,
                        "joining in-flight provider request"
                    );
                    tx.subscribe()
                }
                None => {
                    let (tx, rx) = broadcast::channel(1);
                    flights.insert(key.clone(), tx);
                    let table = Arc::clone(self);
                    let flight_key = key.clone();
                    tokio::spawn(async move {
                        let outcome = call.await;
                        table.complete(&flight_key, outcome).await;
                    });
                    rx
                }
            }
        };

        match rx.recv().await {
            Ok(outcome) => outcome,
            // The leader task was torn down before producing an outcome.
            Err(_) => Err(ProviderError::transient(
                "in-flight provider request ended without an outcome",
            )),
        }
    }

    async fn complete(&self, key: &FlightKey, outcome: RefreshOutcome) {
        let tx = self.flights.lock().await.remove(key);
        if let Some(tx) = tx {
            // Send after removal so late arrivals start a new flight rather
            // than observing a spent channel.
            let _ = tx.send(outcome);
        }
    }

    /// Number of flights currently outstanding.
    pub async fn outstanding(&self) -> usize {
        self.flights.lock().await.len()
    }
}
