use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash, str::FromStr};

use crate::domain::planner::PositionUpdate;
use crate::error::BoardError;

/// Opaque unique identifier for a task
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an identifier issued by the backing store
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TaskId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(BoardError::InvalidTaskId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Anything usable as a lane identifier
pub trait LaneKey: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T> LaneKey for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

/// Status of a task, one lane per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    /// All statuses in board order
    pub const ALL: [TaskStatus; 5] = [
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "BACKLOG",
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::InReview => "IN_REVIEW",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid task status '{}'. Valid statuses: BACKLOG, TODO, IN_PROGRESS, IN_REVIEW, DONE",
                    s
                )
            })
    }
}

/// The slice of a task the ordering engine looks at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card<S = TaskStatus> {
    pub id: TaskId,
    pub status: S,
    pub position: i64,
}

impl<S> Card<S> {
    pub fn new(id: impl Into<TaskId>, status: S, position: i64) -> Self {
        Self {
            id: id.into(),
            status,
            position,
        }
    }
}

impl From<&Task> for Card<TaskStatus> {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            status: task.status,
            position: task.position,
        }
    }
}

impl From<Task> for Card<TaskStatus> {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            status: task.status,
            position: task.position,
        }
    }
}

/// A task as stored by the surrounding application.
///
/// Workspace, project and assignee are held as references; the engine
/// never follows them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub position: i64,
    pub workspace_id: String,
    pub project_id: String,
    pub assignee_id: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task at the top of the backlog
    pub fn new(id: TaskId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            status: TaskStatus::Backlog,
            position: crate::domain::position::POSITION_STEP,
            workspace_id: String::new(),
            project_id: String::new(),
            assignee_id: String::new(),
            due_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: TaskStatus, position: i64) -> Self {
        self.status = status;
        self.position = position;
        self
    }

    /// Applies one entry of a board diff; entries for other tasks are rejected
    pub fn apply_update(&mut self, update: &PositionUpdate<TaskStatus>) -> Result<(), BoardError> {
        if update.id != self.id {
            return Err(BoardError::TaskNotFound(update.id.to_string()));
        }
        self.status = update.status;
        self.position = update.position;
        self.updated_at = Utc::now();
        Ok(())
    }
}
