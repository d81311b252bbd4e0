use std::{collections::VecDeque, sync::Arc};

use serde::Deserialize;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    clock::Clock,
    entry::MoodEntry,
    intent::Intent,
    persist::{EntryStore, PersistResult, StorageError},
    state::StateSnapshot,
    types::{EntryId, Mood, RefreshSeq, TimestampMs},
};

use super::{
    events::{StoreOp, TrackerError, TrackerEvent},
    snapshot::{SnapshotHub, SnapshotObserver},
};

/// Channel sizing for the tracker task.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Snapshots buffered per observer before it lags.
    pub snapshot_buffer: usize,
    /// Events buffered per event subscriber before it lags.
    pub event_buffer: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            snapshot_buffer: 256,
            event_buffer: 256,
        }
    }
}

/// Cloneable front end of the tracker task.
#[derive(Clone)]
pub struct TrackerHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    snapshots: Arc<SnapshotHub>,
    events_tx: broadcast::Sender<TrackerEvent>,
}

enum Command {
    Intent(Intent),
    Settled {
        resp: oneshot::Sender<Arc<StateSnapshot>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

enum Completion {
    Inserted {
        mood: Mood,
        result: PersistResult<EntryId>,
    },
    Listed {
        seq: RefreshSeq,
        result: PersistResult<Vec<MoodEntry>>,
    },
}

/// Starts the tracker task and issues the initial refresh.
///
/// Must be called from within a tokio runtime.
pub fn spawn_tracker(
    store: Arc<dyn EntryStore>,
    clock: Arc<dyn Clock>,
    config: TrackerConfig,
) -> TrackerHandle {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (done_tx, done_rx) = mpsc::unbounded_channel::<Completion>();
    let (events_tx, _) = broadcast::channel::<TrackerEvent>(config.event_buffer.max(1));
    let snapshots = Arc::new(SnapshotHub::new(
        StateSnapshot::initial(),
        config.snapshot_buffer,
    ));

    let mut controller = Controller {
        store,
        clock,
        snapshots: Arc::clone(&snapshots),
        events_tx: events_tx.clone(),
        done_tx,
        issued_seq: 0,
        applied_seq: 0,
        lists_in_flight: 0,
        queued_inserts: VecDeque::new(),
        insert_running: false,
        settled_waiters: Vec::new(),
        shutdown_waiters: Vec::new(),
        shutting_down: false,
    };
    controller.begin_refresh();
    tokio::spawn(controller.run(cmd_rx, done_rx));

    TrackerHandle {
        cmd_tx,
        snapshots,
        events_tx,
    }
}

impl TrackerHandle {
    /// Queues an intent without waiting for the store.
    ///
    /// Outcomes arrive through [`Self::observe`] and [`Self::subscribe_events`];
    /// the only error here is a stopped tracker.
    pub fn handle_intent(&self, intent: Intent) -> Result<(), TrackerError> {
        self.cmd_tx
            .send(Command::Intent(intent))
            .map_err(|_| TrackerError::ChannelClosed)
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Arc<StateSnapshot> {
        self.snapshots.current()
    }

    /// Observer yielding the current snapshot, then every later one.
    pub fn observe(&self) -> SnapshotObserver {
        self.snapshots.observe()
    }

    /// Receiver for events published after this call.
    pub fn subscribe_events(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events_tx.subscribe()
    }

    /// Waits until no insert or refresh is in flight.
    pub async fn settled(&self) -> Result<Arc<StateSnapshot>, TrackerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Settled { resp: tx })
            .map_err(|_| TrackerError::ChannelClosed)?;
        rx.await.map_err(|_| TrackerError::ChannelClosed)
    }

    /// Stops accepting intents, lets in-flight store calls finish, then exits.
    ///
    /// Intents still queued behind the shutdown request are dropped.
    pub async fn shutdown(&self) -> Result<(), TrackerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .map_err(|_| TrackerError::ChannelClosed)?;
        rx.await.map_err(|_| TrackerError::ChannelClosed)
    }
}

struct Controller {
    store: Arc<dyn EntryStore>,
    clock: Arc<dyn Clock>,
    snapshots: Arc<SnapshotHub>,
    events_tx: broadcast::Sender<TrackerEvent>,
    done_tx: mpsc::UnboundedSender<Completion>,
    issued_seq: RefreshSeq,
    // Highest refresh whose completion has been applied; older ones are stale.
    applied_seq: RefreshSeq,
    lists_in_flight: usize,
    // Inserts run one at a time in intent order; ties on timestamp rely on it.
    queued_inserts: VecDeque<(Mood, TimestampMs)>,
    insert_running: bool,
    settled_waiters: Vec<oneshot::Sender<Arc<StateSnapshot>>>,
    shutdown_waiters: Vec<oneshot::Sender<()>>,
    shutting_down: bool,
}

impl Controller {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<Command>,
        mut done_rx: mpsc::UnboundedReceiver<Completion>,
    ) {
        loop {
            tokio::select! {
                cmd = cmd_rx.recv(), if !self.shutting_down => {
                    match cmd {
                        Some(cmd) => {
                            self.handle_command(cmd);
                            if self.shutting_down {
                                self.close_intake(&mut cmd_rx);
                            }
                        }
                        None => self.shutting_down = true,
                    }
                }
                Some(done) = done_rx.recv() => self.handle_completion(done),
            }

            if self.is_quiescent() {
                let snapshot = self.snapshots.current();
                for waiter in self.settled_waiters.drain(..) {
                    let _ = waiter.send(Arc::clone(&snapshot));
                }
                if self.shutting_down {
                    break;
                }
            }
        }

        drop(cmd_rx);
        tracing::debug!("tracker stopped");
        for waiter in self.shutdown_waiters.drain(..) {
            let _ = waiter.send(());
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Intent(Intent::SaveMood(raw)) => match Mood::new(raw) {
                Ok(mood) => self.begin_insert(mood),
                Err(err) => {
                    tracing::warn!(value = raw, "discarding save with invalid mood");
                    self.emit(TrackerEvent::Failed(err.into()));
                }
            },
            Command::Intent(Intent::LoadEntries) => self.begin_refresh(),
            Command::Settled { resp } => {
                if self.is_quiescent() {
                    let _ = resp.send(self.snapshots.current());
                } else {
                    self.settled_waiters.push(resp);
                }
            }
            Command::Shutdown { resp } => {
                self.shutting_down = true;
                self.shutdown_waiters.push(resp);
            }
        }
    }

    fn close_intake(&mut self, cmd_rx: &mut mpsc::UnboundedReceiver<Command>) {
        cmd_rx.close();
        let mut dropped = 0usize;
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                Command::Intent(_) => dropped += 1,
                other => self.handle_command(other),
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "intents dropped at shutdown");
        }
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Inserted { mood, result } => {
                self.insert_running = false;
                self.start_next_insert();
                match result {
                    Ok(id) => {
                        tracing::info!(id, mood = mood.value(), "mood saved");
                        self.emit(TrackerEvent::EntrySaved { id, mood });
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "insert failed");
                        self.emit(TrackerEvent::Failed(TrackerError::storage(
                            StoreOp::Insert,
                            err,
                        )));
                    }
                }
                // Refresh even after a failed insert so the view settles.
                self.begin_refresh();
            }
            Completion::Listed { seq, result } => {
                self.lists_in_flight -= 1;
                if seq <= self.applied_seq {
                    tracing::debug!(seq, applied = self.applied_seq, "discarding stale refresh");
                    self.emit(TrackerEvent::RefreshDiscarded { seq });
                    if let Err(err) = result {
                        self.report_list_failure(err);
                    }
                    return;
                }

                self.applied_seq = seq;
                let still_loading = self.issued_seq > seq;
                match result {
                    Ok(entries) => {
                        tracing::debug!(seq, count = entries.len(), "refresh applied");
                        self.snapshots
                            .publish(StateSnapshot::settled(entries, still_loading));
                    }
                    Err(err) => {
                        let previous = self.snapshots.current();
                        self.snapshots.publish(previous.recovered(still_loading));
                        self.report_list_failure(err);
                    }
                }
            }
        }
    }

    fn begin_insert(&mut self, mood: Mood) {
        let timestamp_ms = self.clock.now_ms();
        self.queued_inserts.push_back((mood, timestamp_ms));
        self.start_next_insert();
    }

    fn start_next_insert(&mut self) {
        if self.insert_running {
            return;
        }
        let Some((mood, timestamp_ms)) = self.queued_inserts.pop_front() else {
            return;
        };
        self.insert_running = true;
        let store = Arc::clone(&self.store);
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = run_blocking(move || store.insert(mood, timestamp_ms)).await;
            let _ = done_tx.send(Completion::Inserted { mood, result });
        });
    }

    fn begin_refresh(&mut self) {
        self.issued_seq += 1;
        self.lists_in_flight += 1;
        let seq = self.issued_seq;
        tracing::debug!(seq, "refresh issued");

        let current = self.snapshots.current();
        if !current.is_loading {
            self.snapshots.publish(current.loading());
        }

        let store = Arc::clone(&self.store);
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = run_blocking(move || store.list_all()).await;
            let _ = done_tx.send(Completion::Listed { seq, result });
        });
    }

    fn report_list_failure(&self, err: StorageError) {
        tracing::warn!(error = %err, "refresh failed, keeping last entries");
        self.emit(TrackerEvent::Failed(TrackerError::storage(
            StoreOp::ListAll,
            err,
        )));
    }

    fn is_quiescent(&self) -> bool {
        self.lists_in_flight == 0 && !self.insert_running && self.queued_inserts.is_empty()
    }

    fn emit(&self, event: TrackerEvent) {
        let _ = self.events_tx.send(event);
    }
}

async fn run_blocking<T, F>(f: F) -> PersistResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> PersistResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Unavailable(format!("join error: {e}")))?
}
