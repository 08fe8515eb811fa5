//! Integration tests for a board session backed by storage adapters

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taskboard_core::{
    BoardConfig, BoardError, BoardSession, DropResult, LaneSlot, MemoryStorage, PersistenceGateway,
    Result, Task, TaskId, TaskStatus, UpdateDiff,
};

fn task(id: &str, status: TaskStatus, position: i64) -> Task {
    Task::new(TaskId::new(id), format!("Task {}", id)).with_status(status, position)
}

fn drop_to(id: &str, from: (TaskStatus, usize), to: (TaskStatus, usize)) -> DropResult {
    DropResult {
        task_id: TaskId::new(id),
        source: LaneSlot::new(from.0, from.1),
        destination: Some(LaneSlot::new(to.0, to.1)),
    }
}

/// Gateway that rejects every write and counts attempts
#[derive(Clone, Default)]
struct UnavailableGateway {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl PersistenceGateway for UnavailableGateway {
    async fn bulk_update(&self, _diff: &UpdateDiff) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(BoardError::PersistenceError("backend unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_session_round_trip_through_memory_storage() -> anyhow::Result<()> {
    let storage = MemoryStorage::with_tasks(vec![
        task("A", TaskStatus::Todo, 1000),
        task("B", TaskStatus::Todo, 2000),
        task("C", TaskStatus::Todo, 3000),
        task("D", TaskStatus::Done, 1000),
    ]);
    let config = BoardConfig::default();
    let mut session = BoardSession::open(config, storage.clone(), storage.clone()).await?;

    session
        .drag_end(drop_to("C", (TaskStatus::Todo, 2), (TaskStatus::Todo, 0)))
        .await?;
    session
        .drag_end(drop_to("A", (TaskStatus::Todo, 1), (TaskStatus::Done, 0)))
        .await?;

    let live: Vec<String> = session
        .state()
        .lanes()
        .flat_map(|(_, order)| order.iter().map(TaskId::to_string))
        .collect();

    session.refresh().await?;
    let reloaded: Vec<String> = session
        .state()
        .lanes()
        .flat_map(|(_, order)| order.iter().map(TaskId::to_string))
        .collect();

    assert_eq!(live, reloaded);
    assert_eq!(live, vec!["C", "B", "A", "D"]);

    let a = storage.get(&TaskId::new("A")).await.expect("A stored");
    assert_eq!(a.status, TaskStatus::Done);
    assert_eq!(a.position, 1000);
    Ok(())
}

#[tokio::test]
async fn test_session_recovers_from_gateway_failure() -> anyhow::Result<()> {
    let storage = MemoryStorage::with_tasks(vec![
        task("X", TaskStatus::Backlog, 1000),
        task("Y", TaskStatus::Done, 1000),
    ]);
    let gateway = UnavailableGateway::default();
    let config = BoardConfig::default();
    let mut session = BoardSession::open(config, storage, gateway.clone()).await?;

    let result = session
        .drag_end(drop_to("X", (TaskStatus::Backlog, 0), (TaskStatus::Done, 1)))
        .await;

    assert!(matches!(result, Err(BoardError::PersistenceError(_))));
    assert_eq!(gateway.attempts.load(Ordering::SeqCst), 1);

    // The optimistic move was discarded in favour of the stored snapshot
    assert_eq!(session.state().lane_len(&TaskStatus::Backlog), 1);
    assert_eq!(session.state().lane_len(&TaskStatus::Done), 1);
    Ok(())
}

#[tokio::test]
async fn test_rejected_move_never_reaches_gateway() -> anyhow::Result<()> {
    let storage = MemoryStorage::with_tasks(vec![task("A", TaskStatus::Todo, 1000)]);
    let gateway = UnavailableGateway::default();
    let config = BoardConfig::default();
    let mut session = BoardSession::open(config, storage, gateway.clone()).await?;

    let diff = session
        .drag_end(drop_to("A", (TaskStatus::Todo, 5), (TaskStatus::Done, 0)))
        .await?;

    assert!(diff.is_empty());
    assert_eq!(gateway.attempts.load(Ordering::SeqCst), 0);
    Ok(())
}

#[cfg(feature = "file-storage")]
#[tokio::test]
async fn test_session_over_file_storage() -> anyhow::Result<()> {
    use taskboard_core::{FileStorage, SnapshotLoader};
    use tempfile::TempDir;

    let temp_dir = TempDir::new()?;
    let storage = FileStorage::new(temp_dir.path());
    storage.initialize().await?;
    for t in [
        task("P", TaskStatus::InProgress, 1000),
        task("Q", TaskStatus::InProgress, 2000),
    ] {
        storage.save_task(&t).await?;
    }

    let config = storage.load_config().await?;
    let loader = FileStorage::new(temp_dir.path());
    let mut session = BoardSession::open(config, loader, storage).await?;

    let diff = session
        .drag_end(drop_to("Q", (TaskStatus::InProgress, 1), (TaskStatus::InReview, 0)))
        .await?;
    assert_eq!(diff.len(), 1);

    let snapshot = session.loader().load_snapshot().await?;
    let q = snapshot
        .iter()
        .find(|t| t.id.as_str() == "Q")
        .expect("Q on disk");
    assert_eq!(q.status, TaskStatus::InReview);
    assert_eq!(q.position, 1000);
    Ok(())
}
