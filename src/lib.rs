//! # Taskboard Core
//!
//! Ordering engine for drag-and-drop task boards.
//!
//! A [`BoardState`] holds every status lane as an ordered list of tasks,
//! rebuilt from a snapshot of stored tasks. Each drag is applied by the
//! [`ReorderPlanner`], which returns an [`UpdateDiff`] naming only the
//! records whose lane or position actually has to be written.
//!
//! ```
//! use taskboard_core::{BoardConfig, BoardState, Card, MoveInstruction, ReorderPlanner, TaskStatus};
//!
//! let mut board = BoardState::rebuild(
//!     BoardConfig::default(),
//!     vec![
//!         Card::new("A", TaskStatus::Todo, 1000),
//!         Card::new("B", TaskStatus::Todo, 2000),
//!     ],
//! );
//!
//! let diff = ReorderPlanner::new()
//!     .apply(&mut board, &MoveInstruction::new("B", TaskStatus::Todo, 1, TaskStatus::Todo, 0))
//!     .unwrap();
//!
//! assert_eq!(diff.len(), 2);
//! assert_eq!(board.lane_order(&TaskStatus::Todo)[0].as_str(), "B");
//! ```

pub mod domain;
pub mod error;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use domain::{
    board::{BoardConfig, BoardState},
    planner::{DropResult, LaneSlot, MoveInstruction, PositionUpdate, ReorderPlanner, UpdateDiff},
    position::{position_for, PositionScheme},
    task::{Card, LaneKey, Task, TaskId, TaskStatus},
};
pub use error::{BoardError, Result};
pub use session::BoardSession;
pub use storage::{MemoryStorage, PersistenceGateway, SnapshotLoader};

#[cfg(feature = "file-storage")]
pub use storage::FileStorage;
