//! Holds the current rate table and refreshes it from a [`RateProvider`].

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::core::currency::RateProvider;
use crate::core::error::FetchError;
use crate::core::rates::RateTable;

const EVENT_CAPACITY: usize = 16;

/// Change and error notifications for store listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum RateEvent {
    Loading,
    Updated {
        fetched_at: DateTime<Utc>,
        currencies: usize,
    },
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated { currencies: usize },
    /// Another refresh was already in flight; nothing was fetched.
    Skipped,
    Failed(FetchError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshStatus {
    pub last_fetched: Option<DateTime<Utc>>,
    /// Error of the most recent refresh, cleared by the next success.
    pub last_error: Option<FetchError>,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RateStore {
    provider: Arc<dyn RateProvider>,
    base: String,
    table: RwLock<Arc<RateTable>>,
    status: RwLock<RefreshStatus>,
    in_flight: AtomicBool,
    events: broadcast::Sender<RateEvent>,
}

impl RateStore {
    pub fn new(provider: Arc<dyn RateProvider>, base: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            provider,
            base: base.to_string(),
            table: RwLock::new(Arc::new(RateTable::empty(base))),
            status: RwLock::new(RefreshStatus::default()),
            in_flight: AtomicBool::new(false),
            events,
        }
    }

    /// Snapshot of the current table. Cheap; the table itself is shared.
    pub fn table(&self) -> Arc<RateTable> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&table)
    }

    pub fn status(&self) -> RefreshStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RateEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: RateEvent) {
        // No receivers is fine: one-shot commands never subscribe.
        let _ = self.events.send(event);
    }

    /// Fetches a fresh table and swaps it in.
    ///
    /// Returns [`RefreshOutcome::Skipped`] without touching the network when
    /// another refresh is in flight. A failed fetch keeps the previous table.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("Refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        }
        let guard = InFlightGuard(&self.in_flight);
        self.notify(RateEvent::Loading);

        let result = self.provider.fetch_rates().await;
        let mut status = self.status.write().unwrap_or_else(PoisonError::into_inner);

        match result {
            Ok(records) => {
                let table = RateTable::from_records(&self.base, records);
                let currencies = table.len();
                *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);

                let fetched_at = Utc::now();
                status.last_fetched = Some(fetched_at);
                status.last_error = None;
                drop(status);
                drop(guard);

                info!(currencies, "Exchange rates updated");
                self.notify(RateEvent::Updated {
                    fetched_at,
                    currencies,
                });
                RefreshOutcome::Updated { currencies }
            }
            Err(e) => {
                status.last_error = Some(e.clone());
                drop(status);
                drop(guard);

                warn!(error = %e, "Failed to refresh exchange rates");
                self.notify(RateEvent::Failed(e.clone()));
                RefreshOutcome::Failed(e)
            }
        }
    }
}
