use crate::{
    domain::{Task, TaskId, UpdateDiff},
    error::{BoardError, Result},
    storage::{PersistenceGateway, SnapshotLoader},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Task store kept in process memory.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks = tasks
            .into_iter()
            .map(|task| (task.id.clone(), task))
            .collect();
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
        }
    }

    pub async fn insert(&self, task: Task) {
        self.tasks.write().await.insert(task.id.clone(), task);
    }

    pub async fn remove(&self, id: &TaskId) -> Option<Task> {
        self.tasks.write().await.remove(id)
    }

    pub async fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl SnapshotLoader for MemoryStorage {
    async fn load_snapshot(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tasks)
    }
}

#[async_trait]
impl PersistenceGateway for MemoryStorage {
    async fn bulk_update(&self, diff: &UpdateDiff) -> Result<()> {
        let mut tasks = self.tasks.write().await;

        // Nothing is written unless every target exists
        if let Some(missing) = diff.iter().find(|update| !tasks.contains_key(&update.id)) {
            return Err(BoardError::TaskNotFound(missing.id.to_string()));
        }

        for update in diff {
            if let Some(task) = tasks.get_mut(&update.id) {
                task.apply_update(update)?;
            }
        }
        Ok(())
    }
}
