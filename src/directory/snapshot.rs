//! Sequenced snapshot cell used for each cached resource.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// Immutable list as last returned by a service.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    /// When the list was fetched; `None` until the first successful load.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> Snapshot<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            fetched_at: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.fetched_at.is_some()
    }
}

/// Ticket taken when a load is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LoadTicket(u64);

/// Snapshot holder applying only the most recently issued load.
pub(crate) struct SequencedCell<T> {
    state: watch::Sender<Arc<Snapshot<T>>>,
    issued: AtomicU64,
}

impl<T> SequencedCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: watch::Sender::new(Arc::new(Snapshot::empty())),
            issued: AtomicU64::new(0),
        }
    }

    /// Register a new in-flight load, superseding any earlier one.
    pub(crate) fn issue(&self) -> LoadTicket {
        LoadTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the snapshot if `ticket` is still the latest issued load.
    /// Returns `false` when the result was superseded and discarded.
    pub(crate) fn commit(&self, ticket: LoadTicket, items: Vec<T>) -> bool {
        self.state.send_if_modified(move |current| {
            if self.issued.load(Ordering::SeqCst) != ticket.0 {
                return false;
            }
            *current = Arc::new(Snapshot {
                items,
                fetched_at: Some(Utc::now()),
            });
            true
        })
    }

    pub(crate) fn get(&self) -> Arc<Snapshot<T>> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<T>>> {
        self.state.subscribe()
    }
}
