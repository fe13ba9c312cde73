//! In-memory task store.
//!
//! The store serializes concurrent writes for the same task id behind a
//! single lock; executors never share mutable task state directly.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::Task;

/// Shared, clonable in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the task with the given id.
    pub async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }

    /// Inserts or replaces a task.
    pub async fn upsert(&self, task: Task) {
        self.tasks.write().await.insert(task.id.clone(), task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, Part, Role, Task, TaskState};

    #[tokio::test]
    async fn upsert_then_get_roundtrips() {
        let store = TaskStore::new();
        let task = Task::submitted("t-1", "c-1", Message::new(Role::User, Part::text("hi")));
        store.upsert(task).await;

        let loaded = store.get("t-1").await.expect("stored task");
        assert_eq!(loaded.context_id, "c-1");
        assert_eq!(loaded.status.state, TaskState::Submitted);
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_existing_snapshot() {
        let store = TaskStore::new();
        let mut task = Task::submitted("t-1", "c-1", Message::new(Role::User, Part::text("hi")));
        store.upsert(task.clone()).await;

        task.status.state = TaskState::Completed;
        store.upsert(task).await;

        let loaded = store.get("t-1").await.unwrap();
        assert_eq!(loaded.status.state, TaskState::Completed);
    }
}
