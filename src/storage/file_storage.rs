use crate::{
    domain::{BoardConfig, Task, TaskId, UpdateDiff},
    error::{BoardError, Result},
    storage::{PersistenceGateway, SnapshotLoader},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage: one JSON document per task plus the board config
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const BOARD_DIR: &'static str = ".taskboard";
    const TASKS_DIR: &'static str = "tasks";
    const BOARD_FILE: &'static str = "board.json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::BOARD_DIR),
        }
    }

    fn tasks_dir(&self) -> PathBuf {
        self.root_path.join(Self::TASKS_DIR)
    }

    fn board_file(&self) -> PathBuf {
        self.root_path.join(Self::BOARD_FILE)
    }

    fn task_file(&self, id: &TaskId) -> Result<PathBuf> {
        let raw = id.as_str();
        if raw.starts_with('.') || raw.contains(['/', '\\']) {
            return Err(BoardError::InvalidTaskId(raw.to_string()));
        }
        Ok(self.tasks_dir().join(format!("{}.json", raw)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Creates the directory layout and a default board config
    pub async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.tasks_dir()).await?;

        if !self.board_file().exists() {
            self.save_config(&BoardConfig::default()).await?;
        }
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.board_file().exists()
    }

    pub async fn save_task(&self, task: &Task) -> Result<()> {
        self.ensure_directory_exists(&self.tasks_dir()).await?;

        let json = serde_json::to_string_pretty(task)?;
        fs::write(self.task_file(&task.id)?, json).await?;
        Ok(())
    }

    pub async fn load_task(&self, id: &TaskId) -> Result<Task> {
        let file_path = self.task_file(id)?;

        if !file_path.exists() {
            return Err(BoardError::TaskNotFound(id.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<()> {
        let file_path = self.task_file(id)?;

        if !file_path.exists() {
            return Err(BoardError::TaskNotFound(id.to_string()));
        }

        fs::remove_file(file_path).await?;
        Ok(())
    }

    pub async fn list_task_ids(&self) -> Result<Vec<TaskId>> {
        let tasks_dir = self.tasks_dir();

        if !tasks_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&tasks_dir).await?;
        let mut ids: Vec<TaskId> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                // The stem is the id verbatim; it is the name save_task wrote
                match path.file_stem().and_then(|s| s.to_str()) {
                    Some(stem) if !stem.is_empty() => ids.push(TaskId::new(stem)),
                    _ => {}
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    pub async fn save_config(&self, config: &BoardConfig) -> Result<()> {
        config.validate()?;
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.board_file(), json).await?;
        Ok(())
    }

    pub async fn load_config(&self) -> Result<BoardConfig> {
        let board_file = self.board_file();

        if !board_file.exists() {
            return Err(BoardError::StorageError(format!(
                "board not initialized at {}",
                self.root_path.display()
            )));
        }

        let contents = fs::read_to_string(&board_file).await?;
        let config: BoardConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

#[async_trait]
impl SnapshotLoader for FileStorage {
    async fn load_snapshot(&self) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        for id in self.list_task_ids().await? {
            tasks.push(self.load_task(&id).await?);
        }
        Ok(tasks)
    }
}

#[async_trait]
impl PersistenceGateway for FileStorage {
    async fn bulk_update(&self, diff: &UpdateDiff) -> Result<()> {
        // Load every target first so a missing task aborts before any write
        let mut pending = Vec::with_capacity(diff.len());
        for update in diff {
            let mut task = self.load_task(&update.id).await?;
            task.apply_update(update)?;
            pending.push(task);
        }

        for task in &pending {
            self.save_task(task).await?;
        }
        Ok(())
    }
}
