//! Mood history tracking with a single-writer intent → snapshot controller
//! over an append-only SQLite store.
//!
//! # Examples
//!
//! Direct store usage with [`persist::memory::MemoryEntryStore`]:
//! ```
//! use moodlog::{
//!     persist::{EntryStore, memory::MemoryEntryStore},
//!     types::Mood,
//! };
//!
//! let store = MemoryEntryStore::new();
//! store.insert(Mood::new(2).expect("mood"), 100).expect("insert");
//! store.insert(Mood::new(4).expect("mood"), 300).expect("insert");
//! let entries = store.list_all().expect("list");
//! assert_eq!(entries[0].timestamp_ms, 300);
//! ```
//!
//! Tracker usage with SQLite persistence:
//! ```no_run
//! use std::sync::Arc;
//!
//! use moodlog::{
//!     clock::SystemClock,
//!     intent::Intent,
//!     persist::sqlite::SqliteEntryStore,
//!     runtime::handle::{TrackerConfig, spawn_tracker},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = SqliteEntryStore::open("moods.db").expect("open sqlite");
//! let handle = spawn_tracker(Arc::new(store), Arc::new(SystemClock), TrackerConfig::default());
//! let mut snapshots = handle.observe();
//! handle.handle_intent(Intent::SaveMood(4)).expect("dispatch");
//! let settled = handle.settled().await.expect("settled");
//! assert!(!settled.is_loading);
//! let _latest = snapshots.recv().await.expect("snapshot");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Injectable time sources.
pub mod clock;
/// Binary configuration.
pub mod config;
/// Persisted entry record.
pub mod entry;
/// Intent model.
pub mod intent;
/// Tracing subscriber setup.
pub mod logging;
/// Entry store contract and implementations.
pub mod persist;
/// Single-writer tracker runtime.
pub mod runtime;
/// Render snapshot model.
pub mod state;
/// Shared primitive types.
pub mod types;
