pub mod board;
pub mod planner;
pub mod position;
pub mod sorting;
pub mod task;

pub use board::{BoardConfig, BoardState};
pub use planner::{
    BulkUpdate, DropResult, LaneSlot, MoveInstruction, PositionUpdate, ReorderPlanner, UpdateDiff,
};
pub use position::{position_for, PositionScheme, POSITION_CEILING, POSITION_STEP};
pub use sorting::{compare_board_order, sort_lane};
pub use task::{Card, LaneKey, Task, TaskId, TaskStatus};
