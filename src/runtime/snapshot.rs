//! Current-value-plus-subscribe container for [`StateSnapshot`]s.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError};

use crate::state::StateSnapshot;

/// Failure to read the next snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ObserveError {
    /// The observer fell behind and this many snapshots were dropped.
    #[error("observer lagged by {0} snapshots")]
    Lagged(u64),
    /// No more snapshots will be published.
    #[error("snapshot channel closed")]
    Closed,
}

/// Holds the latest snapshot and fans out every replacement.
///
/// Replace and notify happen under the same lock as observer registration,
/// so a new observer sees each transition exactly once.
#[derive(Debug)]
pub struct SnapshotHub {
    current: Mutex<Arc<StateSnapshot>>,
    tx: broadcast::Sender<Arc<StateSnapshot>>,
}

impl SnapshotHub {
    /// Hub holding `initial`; `buffer` bounds how far an observer may lag.
    pub fn new(initial: StateSnapshot, buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            current: Mutex::new(Arc::new(initial)),
            tx,
        }
    }

    /// Latest snapshot.
    pub fn current(&self) -> Arc<StateSnapshot> {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Atomically replaces the current snapshot and notifies observers.
    pub fn publish(&self, next: StateSnapshot) -> Arc<StateSnapshot> {
        let next = Arc::new(next);
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::clone(&next);
        // No observers is fine.
        let _ = self.tx.send(Arc::clone(&next));
        next
    }

    /// Registers an observer starting at the current snapshot.
    pub fn observe(&self) -> SnapshotObserver {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        SnapshotObserver {
            pending: Some(Arc::clone(&*current)),
            rx: self.tx.subscribe(),
        }
    }
}

/// Stream of snapshots starting with the one current at subscription time.
#[derive(Debug)]
pub struct SnapshotObserver {
    pending: Option<Arc<StateSnapshot>>,
    rx: broadcast::Receiver<Arc<StateSnapshot>>,
}

impl SnapshotObserver {
    /// Next snapshot in emission order.
    pub async fn recv(&mut self) -> Result<Arc<StateSnapshot>, ObserveError> {
        if let Some(first) = self.pending.take() {
            return Ok(first);
        }
        match self.rx.recv().await {
            Ok(snapshot) => Ok(snapshot),
            Err(RecvError::Lagged(n)) => Err(ObserveError::Lagged(n)),
            Err(RecvError::Closed) => Err(ObserveError::Closed),
        }
    }

    /// Reads until a snapshot satisfies `pred`, returning it.
    pub async fn wait_for(
        &mut self,
        mut pred: impl FnMut(&StateSnapshot) -> bool,
    ) -> Result<Arc<StateSnapshot>, ObserveError> {
        loop {
            let snapshot = self.recv().await?;
            if pred(&snapshot) {
                return Ok(snapshot);
            }
        }
    }
}
