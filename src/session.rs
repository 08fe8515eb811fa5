//! One interactive board session: snapshot in, moves applied, diffs out.

use crate::{
    domain::{BoardConfig, BoardState, DropResult, MoveInstruction, ReorderPlanner, UpdateDiff},
    error::{BoardError, Result},
    storage::{PersistenceGateway, SnapshotLoader},
};
use tracing::{debug, warn};

/// Owns the board for a single session and forwards every move's writes
/// to the persistence gateway.
///
/// Moves are applied optimistically. When the gateway fails the board is
/// rebuilt from a fresh snapshot; nothing is rolled back by hand.
pub struct BoardSession<L, G> {
    state: BoardState,
    planner: ReorderPlanner,
    loader: L,
    gateway: G,
}

impl<L, G> BoardSession<L, G>
where
    L: SnapshotLoader,
    G: PersistenceGateway,
{
    /// Validates `config` and builds the board from the loader's first snapshot
    pub async fn open(config: BoardConfig, loader: L, gateway: G) -> Result<Self> {
        config.validate()?;
        let tasks = loader.load_snapshot().await?;
        let state = BoardState::rebuild(config, &tasks);

        Ok(Self {
            state,
            planner: ReorderPlanner::new(),
            loader,
            gateway,
        })
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Discards the current board and rebuilds it from a fresh snapshot
    pub async fn refresh(&mut self) -> Result<()> {
        let tasks = self.loader.load_snapshot().await?;
        self.state.refresh(&tasks);
        Ok(())
    }

    /// Handles a drag-end event. A drop outside every lane changes nothing.
    pub async fn drag_end(&mut self, drop: DropResult) -> Result<UpdateDiff> {
        match drop.into_instruction() {
            Some(instruction) => self.move_task(&instruction).await,
            None => {
                debug!("drop landed outside the board, ignoring");
                Ok(UpdateDiff::new())
            }
        }
    }

    /// Applies one move and persists its writes.
    ///
    /// A move that does not match the current board is logged and ignored
    /// with an empty diff. A gateway failure triggers a refresh and is then
    /// returned to the caller.
    pub async fn move_task(&mut self, instruction: &MoveInstruction) -> Result<UpdateDiff> {
        let diff = match self.planner.apply(&mut self.state, instruction) {
            Ok(diff) => diff,
            Err(err @ BoardError::InvalidMove { .. }) => {
                warn!(error = %err, "ignoring move that does not match the board");
                return Ok(UpdateDiff::new());
            }
            Err(err) => return Err(err),
        };

        if let Err(err) = self.gateway.bulk_update(&diff).await {
            warn!(
                error = %err,
                writes = diff.len(),
                "bulk update failed, rebuilding board from snapshot"
            );
            if let Err(refresh_err) = self.refresh().await {
                warn!(error = %refresh_err, "snapshot reload failed, board may be stale");
            }
            return Err(match err {
                persistence @ BoardError::PersistenceError(_) => persistence,
                other => BoardError::PersistenceError(other.to_string()),
            });
        }

        Ok(diff)
    }
}
