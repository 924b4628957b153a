//! In-memory event log store
//!
//! Room-scoped, append-only sequences of draw commands. The store is the only
//! owner of room state; everything else goes through `append`, `read_all` and
//! `clear`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::DrawCommand;

/// Per-room log handle
type Log = Arc<RwLock<Vec<DrawCommand>>>;

/// Central store for all room event logs
///
/// Two-level locking: the outer map is read-locked on the hot path and
/// write-locked only to create a room lazily; each room carries its own lock,
/// so operations on different rooms never contend. All three operations on
/// the same room are linearizable with respect to each other.
pub struct EventLogStore {
    /// Map of room token to its event log
    logs: RwLock<HashMap<String, Log>>,
}

impl EventLogStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
        }
    }

    /// Get the log for a room, creating it on first access
    async fn log_for(&self, room: &str) -> Log {
        {
            let logs = self.logs.read().await;
            if let Some(log) = logs.get(room) {
                return log.clone();
            }
        }

        let mut logs = self.logs.write().await;
        logs.entry(room.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(Vec::new())))
            .clone()
    }

    /// Append a command to a room's log, returning the assigned index
    ///
    /// Room validation happens in the router; by the time a token reaches the
    /// store it is known-good, so append cannot fail.
    pub async fn append(&self, room: &str, command: DrawCommand) -> usize {
        let log = self.log_for(room).await;
        let mut commands = log.write().await;
        commands.push(command);
        let index = commands.len() - 1;

        tracing::debug!(room = %room, index, "Draw command appended");

        index
    }

    /// Read a point-in-time snapshot of a room's log
    ///
    /// A room that has never been written to reads as the empty sequence.
    /// The snapshot is cloned under the room lock and the lock released
    /// before the caller serializes anything; a concurrent append or clear
    /// is either fully reflected or not reflected at all.
    pub async fn read_all(&self, room: &str) -> Vec<DrawCommand> {
        let log = {
            let logs = self.logs.read().await;
            match logs.get(room) {
                Some(log) => log.clone(),
                None => return Vec::new(),
            }
        };

        let commands = log.read().await;
        commands.clone()
    }

    /// Atomically empty a room's log
    ///
    /// Idempotent: clearing an empty (or never-written) room is a no-op.
    pub async fn clear(&self, room: &str) {
        let log = {
            let logs = self.logs.read().await;
            match logs.get(room) {
                Some(log) => log.clone(),
                None => return,
            }
        };

        let mut commands = log.write().await;
        let cleared = commands.len();
        commands.clear();

        tracing::debug!(room = %room, cleared, "Room log cleared");
    }

    /// Number of rooms that have been written to at least once
    pub async fn room_count(&self) -> usize {
        self.logs.read().await.len()
    }

    /// Total number of stored commands across all rooms
    pub async fn event_count(&self) -> usize {
        let logs: Vec<Log> = self.logs.read().await.values().cloned().collect();

        let mut total = 0;
        for log in logs {
            total += log.read().await.len();
        }
        total
    }
}

impl Default for EventLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(n: u64) -> DrawCommand {
        DrawCommand::from_value(json!({"x": n, "y": n, "type": "line"})).expect("valid command")
    }

    #[tokio::test]
    async fn test_append_assigns_sequential_indexes() {
        let store = EventLogStore::new();

        assert_eq!(store.append("room_1", command(0)).await, 0);
        assert_eq!(store.append("room_1", command(1)).await, 1);
        assert_eq!(store.append("room_1", command(2)).await, 2);
    }

    #[tokio::test]
    async fn test_read_all_preserves_append_order() {
        let store = EventLogStore::new();

        for n in 0..10 {
            store.append("room_1", command(n)).await;
        }

        let commands = store.read_all("room_1").await;
        assert_eq!(commands.len(), 10);
        for (n, cmd) in commands.iter().enumerate() {
            assert_eq!(cmd.field("x"), Some(&json!(n)));
        }
    }

    #[tokio::test]
    async fn test_unwritten_room_reads_empty() {
        let store = EventLogStore::new();
        assert!(store.read_all("room_never_seen").await.is_empty());
        assert_eq!(store.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_clear_empties_log() {
        let store = EventLogStore::new();

        store.append("room_1", command(1)).await;
        store.append("room_1", command(2)).await;
        store.clear("room_1").await;

        assert!(store.read_all("room_1").await.is_empty());

        // Indexes restart from zero after a clear
        assert_eq!(store.append("room_1", command(3)).await, 0);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = EventLogStore::new();

        store.clear("room_1").await;
        store.clear("room_never_seen").await;
        store.append("room_1", command(1)).await;
        store.clear("room_1").await;
        store.clear("room_1").await;

        assert!(store.read_all("room_1").await.is_empty());
    }

    #[tokio::test]
    async fn test_rooms_are_independent() {
        let store = EventLogStore::new();

        store.append("room_a", command(1)).await;
        store.append("room_b", command(2)).await;
        store.clear("room_a").await;

        assert!(store.read_all("room_a").await.is_empty());
        assert_eq!(store.read_all("room_b").await.len(), 1);
        assert_eq!(store.room_count().await, 2);
        assert_eq!(store.event_count().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let store = EventLogStore::new();

        store.append("room_1", command(1)).await;
        let snapshot = store.read_all("room_1").await;
        store.clear("room_1").await;

        // The earlier snapshot is unaffected by the clear
        assert_eq!(snapshot.len(), 1);
        assert!(store.read_all("room_1").await.is_empty());
    }
}
