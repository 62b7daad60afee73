use std::collections::{HashSet, VecDeque};
use std::ops::Add;

use tracing::trace;

use crate::config::GridSize;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        self + direction.delta()
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

/// Segmented body with a heading, a pending turn, and pending growth.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Option<Direction>,
    pending_growth: u32,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self::with_length(start, direction, 1)
    }

    /// Creates a straight snake whose head is `head` and whose remaining
    /// `length - 1` segments trail behind it, opposite to `direction`.
    #[must_use]
    pub fn with_length(head: Position, direction: Direction, length: usize) -> Self {
        let back = direction.opposite();
        let body = std::iter::successors(Some(head), |cell| Some(cell.step(back)))
            .take(length.max(1))
            .collect();

        Self {
            body,
            direction,
            pending_direction: None,
            pending_growth: 0,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: None,
            pending_growth: 0,
        }
    }

    /// Records the turn to take on the next advance.
    ///
    /// Each call replaces the previous request. A reversal of the current
    /// heading, while the body has a neck to reverse into, replaces it with
    /// "keep going straight".
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if self.body.len() > 1 && direction.is_opposite(self.direction) {
            trace!(?direction, heading = ?self.direction, "discarding reversal");
            self.pending_direction = None;
            return;
        }

        self.pending_direction = Some(direction);
    }

    /// Heading the next advance will use.
    #[must_use]
    pub fn next_direction(&self) -> Direction {
        self.pending_direction.unwrap_or(self.direction)
    }

    /// Returns the head position for the next movement tick without moving.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().step(self.next_direction())
    }

    /// Moves one cell and returns the new head.
    ///
    /// Legality is not judged here; callers check `next_head_position`
    /// before committing.
    pub fn advance(&mut self) -> Position {
        self.direction = self.next_direction();
        self.pending_direction = None;

        let next_head = self.head().step(self.direction);
        self.body.push_front(next_head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            let _ = self.body.pop_back();
        }

        next_head
    }

    /// Queues `by` cells of growth, applied one per advance.
    pub fn grow(&mut self, by: u32) {
        self.pending_growth = self.pending_growth.saturating_add(by);
    }

    /// Growth still owed to future advances.
    #[cfg(test)]
    #[must_use]
    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    /// Returns true if moving into `cell` next tick would hit the body.
    ///
    /// The tail is excluded when it will be vacated by that same move.
    #[must_use]
    pub fn collides_with_self(&self, cell: Position) -> bool {
        let keep = if self.pending_growth > 0 {
            self.body.len()
        } else {
            self.body.len() - 1
        };

        self.body.iter().take(keep).any(|segment| *segment == cell)
    }

    /// Snapshot of every occupied cell, head and tail included.
    #[must_use]
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[cfg(test)]
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
