use crate::domain::planner::PositionUpdate;
use crate::domain::position::PositionScheme;
use crate::domain::sorting::sort_lane;
use crate::domain::task::{Card, LaneKey, TaskId, TaskStatus};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig<S = TaskStatus> {
    pub name: String,
    /// Lanes in display order
    pub lanes: Vec<S>,
    #[serde(default)]
    pub positions: PositionScheme,
}

impl<S: LaneKey> BoardConfig<S> {
    pub fn new(name: impl Into<String>, lanes: Vec<S>) -> Self {
        Self {
            name: name.into(),
            lanes,
            positions: PositionScheme::default(),
        }
    }

    pub fn with_positions(mut self, positions: PositionScheme) -> Self {
        self.positions = positions;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.positions.validate()?;

        let mut seen = HashSet::new();
        for lane in &self.lanes {
            if !seen.insert(lane) {
                return Err(BoardError::ConfigError(format!(
                    "lane {} is listed more than once",
                    lane
                )));
            }
        }
        Ok(())
    }
}

impl Default for BoardConfig<TaskStatus> {
    fn default() -> Self {
        Self::new("Default Board", TaskStatus::ALL.to_vec())
    }
}

/// Ordered view of every lane on the board.
///
/// The lane sequences are the source of truth for display order. Each
/// card keeps the status and position last loaded or last sent for
/// persistence, which is what the planner diffs against.
#[derive(Debug, Clone)]
pub struct BoardState<S: LaneKey = TaskStatus> {
    config: BoardConfig<S>,
    lane_keys: Vec<S>,
    configured_lanes: usize,
    lanes: HashMap<S, Vec<TaskId>>,
    cards: HashMap<TaskId, Card<S>>,
}

impl<S: LaneKey> BoardState<S> {
    /// Empty board with one lane per configured lane
    pub fn new(config: BoardConfig<S>) -> Self {
        Self::rebuild(config, Vec::<Card<S>>::new())
    }

    /// Builds the board from a full snapshot of tasks.
    ///
    /// Tasks are grouped by status and each lane is sorted by position,
    /// ties going to the smaller task id. A lane listed twice in the
    /// config is kept once. Statuses with no configured lane get lanes
    /// after the configured ones, ordered by their display name. If the
    /// snapshot lists a task id twice, the later record wins.
    pub fn rebuild<I>(config: BoardConfig<S>, tasks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Card<S>>,
    {
        let mut snapshot: Vec<Card<S>> = Vec::new();
        let mut seen: HashMap<TaskId, usize> = HashMap::new();
        for task in tasks {
            let card = task.into();
            match seen.get(&card.id) {
                Some(&slot) => {
                    debug!(
                        task = %card.id,
                        "duplicate task in snapshot, keeping the later record"
                    );
                    snapshot[slot] = card;
                }
                None => {
                    seen.insert(card.id.clone(), snapshot.len());
                    snapshot.push(card);
                }
            }
        }

        let mut lane_keys: Vec<S> = Vec::with_capacity(config.lanes.len());
        for lane in &config.lanes {
            if !lane_keys.contains(lane) {
                lane_keys.push(lane.clone());
            }
        }
        let configured_lanes = lane_keys.len();
        let mut grouped: HashMap<S, Vec<Card<S>>> = lane_keys
            .iter()
            .map(|lane| (lane.clone(), Vec::new()))
            .collect();

        let mut extra_lanes = Vec::new();
        for card in snapshot {
            if !grouped.contains_key(&card.status) {
                debug!(
                    lane = %card.status,
                    "snapshot status has no configured lane, adding one"
                );
                extra_lanes.push(card.status.clone());
            }
            grouped.entry(card.status.clone()).or_default().push(card);
        }
        extra_lanes.sort_by_key(|lane| lane.to_string());
        lane_keys.extend(extra_lanes);

        let mut lanes = HashMap::with_capacity(grouped.len());
        let mut cards = HashMap::new();
        for (lane, mut members) in grouped {
            sort_lane(&mut members);
            let order = members.iter().map(|card| card.id.clone()).collect();
            cards.extend(members.into_iter().map(|card| (card.id.clone(), card)));
            lanes.insert(lane, order);
        }

        debug!(
            lanes = lane_keys.len(),
            tasks = cards.len(),
            "rebuilt board state"
        );

        Self {
            config,
            lane_keys,
            configured_lanes,
            lanes,
            cards,
        }
    }

    /// Replaces the whole state with a fresh snapshot, keeping the config
    pub fn refresh<I>(&mut self, tasks: I)
    where
        I: IntoIterator,
        I::Item: Into<Card<S>>,
    {
        *self = Self::rebuild(self.config.clone(), tasks);
    }

    /// Adds an empty lane for `lane` unless one exists.
    ///
    /// New lanes sit after the configured ones, ordered by display name.
    pub fn ensure_lane(&mut self, lane: &S) {
        if self.lanes.contains_key(lane) {
            return;
        }
        let name = lane.to_string();
        let extras = &self.lane_keys[self.configured_lanes..];
        let slot = match extras.iter().position(|key| key.to_string() > name) {
            Some(offset) => self.configured_lanes + offset,
            None => self.lane_keys.len(),
        };
        self.lane_keys.insert(slot, lane.clone());
        self.lanes.insert(lane.clone(), Vec::new());
    }

    /// Removes and returns the task at `index` in `lane`
    pub fn remove_from_lane(&mut self, lane: &S, index: usize) -> Result<Card<S>> {
        let order = self
            .lanes
            .get_mut(lane)
            .ok_or_else(|| BoardError::LaneNotFound(lane.to_string()))?;

        if index >= order.len() {
            return Err(BoardError::IndexOutOfRange {
                lane: lane.to_string(),
                index,
                len: order.len(),
            });
        }

        let id = order.remove(index);
        self.cards
            .remove(&id)
            .ok_or_else(|| BoardError::TaskNotFound(id.to_string()))
    }

    /// Inserts `card` at `index` in `lane`, shifting later entries down.
    ///
    /// The card's status is set to `lane`. `index == len` appends.
    pub fn insert_into_lane(&mut self, lane: &S, index: usize, mut card: Card<S>) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(BoardError::DuplicateTask(card.id.to_string()));
        }

        let order = self
            .lanes
            .get_mut(lane)
            .ok_or_else(|| BoardError::LaneNotFound(lane.to_string()))?;

        if index > order.len() {
            return Err(BoardError::IndexOutOfRange {
                lane: lane.to_string(),
                index,
                len: order.len(),
            });
        }

        card.status = lane.clone();
        order.insert(index, card.id.clone());
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Current display order of `lane`; empty for an unknown lane
    pub fn lane_order(&self, lane: &S) -> &[TaskId] {
        self.lanes.get(lane).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cards of `lane` in display order
    pub fn lane_cards(&self, lane: &S) -> Vec<&Card<S>> {
        self.lane_order(lane)
            .iter()
            .filter_map(|id| self.cards.get(id))
            .collect()
    }

    /// Every lane in display order
    pub fn lanes(&self) -> impl Iterator<Item = (&S, &[TaskId])> {
        self.lane_keys
            .iter()
            .map(move |lane| (lane, self.lane_order(lane)))
    }

    pub fn lane_keys(&self) -> &[S] {
        &self.lane_keys
    }

    pub fn has_lane(&self, lane: &S) -> bool {
        self.lanes.contains_key(lane)
    }

    pub fn lane_len(&self, lane: &S) -> usize {
        self.lane_order(lane).len()
    }

    pub fn card(&self, id: &TaskId) -> Option<&Card<S>> {
        self.cards.get(id)
    }

    /// Lane and index currently holding `id`
    pub fn locate(&self, id: &TaskId) -> Option<(&S, usize)> {
        let card = self.cards.get(id)?;
        let index = self
            .lane_order(&card.status)
            .iter()
            .position(|candidate| candidate == id)?;
        Some((&card.status, index))
    }

    pub fn task_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn config(&self) -> &BoardConfig<S> {
        &self.config
    }

    pub fn scheme(&self) -> PositionScheme {
        self.config.positions
    }

    /// Records diff entries as the cards' stored status and position
    pub(crate) fn record_updates<'a, I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = &'a PositionUpdate<S>>,
        S: 'a,
    {
        for update in updates {
            if let Some(card) = self.cards.get_mut(&update.id) {
                card.status = update.status.clone();
                card.position = update.position;
            }
        }
    }
}
