use crate::domain::task::Card;
use std::cmp::Ordering;

/// Display order within a lane
///
/// Ascending stored position; equal positions fall back to the task id so
/// that a rebuild never depends on the order of the incoming snapshot.
pub fn compare_board_order<S>(a: &Card<S>, b: &Card<S>) -> Ordering {
    a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id))
}

/// Sorts one lane's cards in-place into display order
///
/// # Examples
/// ```
/// use taskboard_core::domain::sorting::sort_lane;
/// use taskboard_core::domain::task::{Card, TaskStatus};
///
/// let mut lane = vec![
///     Card::new("b", TaskStatus::Todo, 1000),
///     Card::new("c", TaskStatus::Todo, 500),
///     Card::new("a", TaskStatus::Todo, 1000),
/// ];
///
/// sort_lane(&mut lane);
/// assert_eq!(lane[0].id.as_str(), "c");
/// assert_eq!(lane[1].id.as_str(), "a");
/// ```
pub fn sort_lane<S>(cards: &mut [Card<S>]) {
    cards.sort_by(compare_board_order);
}

/// Whether `cards` is already in display order
pub fn is_board_ordered<S>(cards: &[Card<S>]) -> bool {
    cards
        .windows(2)
        .all(|pair| compare_board_order(&pair[0], &pair[1]) != Ordering::Greater)
}
