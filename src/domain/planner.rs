//! Drag-and-drop moves and the minimal set of position writes they imply.

use crate::domain::board::BoardState;
use crate::domain::position::PositionScheme;
use crate::domain::task::{LaneKey, TaskId, TaskStatus};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A lane plus an index within it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSlot<S = TaskStatus> {
    pub lane: S,
    pub index: usize,
}

impl<S> LaneSlot<S> {
    pub fn new(lane: S, index: usize) -> Self {
        Self { lane, index }
    }
}

/// One relocation of a task, as reported by a completed drag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInstruction<S = TaskStatus> {
    pub task_id: TaskId,
    pub source_lane: S,
    pub source_index: usize,
    pub destination_lane: S,
    pub destination_index: usize,
}

impl<S: LaneKey> MoveInstruction<S> {
    pub fn new(
        task_id: impl Into<TaskId>,
        source_lane: S,
        source_index: usize,
        destination_lane: S,
        destination_index: usize,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            source_lane,
            source_index,
            destination_lane,
            destination_index,
        }
    }

    pub fn is_cross_lane(&self) -> bool {
        self.source_lane != self.destination_lane
    }
}

/// Raw drag-end event. `destination` is `None` when the card was
/// released outside every lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropResult<S = TaskStatus> {
    pub task_id: TaskId,
    pub source: LaneSlot<S>,
    pub destination: Option<LaneSlot<S>>,
}

impl<S: LaneKey> DropResult<S> {
    pub fn into_instruction(self) -> Option<MoveInstruction<S>> {
        let destination = self.destination?;
        Some(MoveInstruction {
            task_id: self.task_id,
            source_lane: self.source.lane,
            source_index: self.source.index,
            destination_lane: destination.lane,
            destination_index: destination.index,
        })
    }
}

/// A single record write: `id` now lives in lane `status` at `position`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate<S = TaskStatus> {
    pub id: TaskId,
    pub status: S,
    pub position: i64,
}

/// Ordered writes produced by one move: the moved task first, then
/// destination-lane repairs, then source-lane repairs, each in lane order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateDiff<S = TaskStatus> {
    updates: Vec<PositionUpdate<S>>,
}

/// Payload shape accepted by the bulk task update endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpdate<S = TaskStatus> {
    pub tasks: Vec<PositionUpdate<S>>,
}

impl<S> UpdateDiff<S> {
    pub fn new() -> Self {
        Self {
            updates: Vec::new(),
        }
    }

    fn push(&mut self, update: PositionUpdate<S>) {
        self.updates.push(update);
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PositionUpdate<S>> {
        self.updates.iter()
    }

    pub fn as_slice(&self) -> &[PositionUpdate<S>] {
        &self.updates
    }

    /// Entry for the task that was dragged
    pub fn moved(&self) -> Option<&PositionUpdate<S>> {
        self.updates.first()
    }

    pub fn get(&self, id: &TaskId) -> Option<&PositionUpdate<S>> {
        self.updates.iter().find(|update| &update.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn into_inner(self) -> Vec<PositionUpdate<S>> {
        self.updates
    }

    pub fn into_bulk_update(self) -> BulkUpdate<S> {
        BulkUpdate {
            tasks: self.updates,
        }
    }
}

impl<S: Clone> UpdateDiff<S> {
    pub fn to_bulk_update(&self) -> BulkUpdate<S> {
        BulkUpdate {
            tasks: self.updates.clone(),
        }
    }
}

impl<S> Default for UpdateDiff<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> IntoIterator for UpdateDiff<S> {
    type Item = PositionUpdate<S>;
    type IntoIter = std::vec::IntoIter<PositionUpdate<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a UpdateDiff<S> {
    type Item = &'a PositionUpdate<S>;
    type IntoIter = std::slice::Iter<'a, PositionUpdate<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.iter()
    }
}

/// Applies moves to a [`BoardState`] and works out which records changed
#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderPlanner;

impl ReorderPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Applies `instruction` to `state` in place and returns the writes to
    /// persist.
    ///
    /// The task moved is whichever one sits at the source slot. Fails with
    /// [`BoardError::InvalidMove`] when that slot does not exist, leaving
    /// `state` untouched. An unknown destination lane is created, and a
    /// destination index past the end of the lane appends.
    pub fn apply<S: LaneKey>(
        &self,
        state: &mut BoardState<S>,
        instruction: &MoveInstruction<S>,
    ) -> Result<UpdateDiff<S>> {
        validate(state, instruction)?;

        let scheme = state.scheme();
        let source = &instruction.source_lane;
        let destination = &instruction.destination_lane;

        state.ensure_lane(destination);
        let mut moved = state.remove_from_lane(source, instruction.source_index)?;
        if moved.id != instruction.task_id {
            debug!(
                named = %instruction.task_id,
                found = %moved.id,
                "source slot holds another task, moving that one"
            );
        }
        if instruction.is_cross_lane() {
            moved.status = destination.clone();
        }
        let moved_id = moved.id.clone();

        let lane_len = state.lane_len(destination);
        let index = instruction.destination_index.min(lane_len);
        state.insert_into_lane(destination, index, moved)?;

        let mut diff = UpdateDiff::new();
        diff.push(PositionUpdate {
            id: moved_id.clone(),
            status: destination.clone(),
            position: scheme.position_for(index),
        });
        repair_lane(state, destination, Some(&moved_id), scheme, &mut diff);
        if instruction.is_cross_lane() {
            repair_lane(state, source, None, scheme, &mut diff);
        }

        state.record_updates(&diff);

        debug!(
            task = %moved_id,
            from = %source,
            from_index = instruction.source_index,
            to = %destination,
            to_index = index,
            writes = diff.len(),
            "applied board move"
        );

        Ok(diff)
    }

    /// Value form of [`ReorderPlanner::apply`]: returns the next state and
    /// its diff, or an unchanged copy and an empty diff if the move is
    /// rejected.
    pub fn plan<S: LaneKey>(
        &self,
        state: &BoardState<S>,
        instruction: &MoveInstruction<S>,
    ) -> (BoardState<S>, UpdateDiff<S>) {
        let mut next = state.clone();
        match self.apply(&mut next, instruction) {
            Ok(diff) => (next, diff),
            Err(err) => {
                warn!(error = %err, "rejected board move");
                (next, UpdateDiff::new())
            }
        }
    }
}

fn validate<S: LaneKey>(state: &BoardState<S>, instruction: &MoveInstruction<S>) -> Result<()> {
    let reject = |reason: String| BoardError::InvalidMove {
        task: instruction.task_id.to_string(),
        lane: instruction.source_lane.to_string(),
        index: instruction.source_index,
        reason,
    };

    if !state.has_lane(&instruction.source_lane) {
        return Err(reject("unknown source lane".to_string()));
    }

    let order = state.lane_order(&instruction.source_lane);
    match order.get(instruction.source_index) {
        Some(_) => Ok(()),
        None => Err(reject(format!("lane holds {} tasks", order.len()))),
    }
}

/// Appends an entry for every card in `lane` whose stored position no
/// longer matches its index.
fn repair_lane<S: LaneKey>(
    state: &BoardState<S>,
    lane: &S,
    skip: Option<&TaskId>,
    scheme: PositionScheme,
    diff: &mut UpdateDiff<S>,
) {
    for (index, id) in state.lane_order(lane).iter().enumerate() {
        if Some(id) == skip {
            continue;
        }
        let Some(card) = state.card(id) else {
            continue;
        };
        let expected = scheme.position_for(index);
        if card.position != expected {
            diff.push(PositionUpdate {
                id: id.clone(),
                status: lane.clone(),
                position: expected,
            });
        }
    }
}
