use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use crate::config::GridSize;
use crate::snake::Position;

/// Random probes tried before falling back to enumerating free cells.
pub const SPAWN_SAMPLE_ATTEMPTS: usize = 32;

/// Every cell of the board is occupied.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("no free cell left on a {}x{} board", .bounds.width, .bounds.height)]
pub struct NoSpaceAvailable {
    pub bounds: GridSize,
}

/// Picks a uniformly random cell inside `bounds` that is not in `occupied`.
///
/// Sparse boards are served by bounded rejection sampling; crowded boards
/// fall through to enumerating the free set, so this always terminates.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    occupied: &HashSet<Position>,
) -> Result<Position, NoSpaceAvailable> {
    let total = bounds.total_cells();
    let taken = occupied
        .iter()
        .filter(|cell| cell.is_within_bounds(bounds))
        .count();
    if taken >= total {
        return Err(NoSpaceAvailable { bounds });
    }

    for _ in 0..SPAWN_SAMPLE_ATTEMPTS {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };
        if !occupied.contains(&candidate) {
            return Ok(candidate);
        }
    }

    let candidates = free_cells(bounds, occupied);
    let index = rng.gen_range(0..candidates.len());
    Ok(candidates[index])
}

/// Lists every unoccupied cell in row-major order.
#[must_use]
pub fn free_cells(bounds: GridSize, occupied: &HashSet<Position>) -> Vec<Position> {
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(occupied.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !occupied.contains(&position) {
                candidates.push(position);
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::snake::Position;

    use super::{NoSpaceAvailable, free_cells, spawn_position};

    fn row(width: i32) -> HashSet<Position> {
        (0..width).map(|x| Position { x, y: 0 }).collect()
    }

    #[test]
    fn spawn_never_overlaps_occupied_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = GridSize {
            width: 8,
            height: 6,
        };
        let occupied = row(3);

        for _ in 0..100 {
            let cell = spawn_position(&mut rng, bounds, &occupied).expect("board has room");
            assert!(!occupied.contains(&cell));
            assert!(cell.is_within_bounds(bounds));
        }
    }

    #[test]
    fn crowded_board_finds_the_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = GridSize {
            width: 20,
            height: 1,
        };
        let mut occupied = row(20);
        occupied.remove(&Position { x: 13, y: 0 });

        for _ in 0..10 {
            assert_eq!(
                spawn_position(&mut rng, bounds, &occupied),
                Ok(Position { x: 13, y: 0 })
            );
        }
    }

    #[test]
    fn full_board_reports_no_space() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = GridSize {
            width: 3,
            height: 1,
        };

        assert_eq!(
            spawn_position(&mut rng, bounds, &row(3)),
            Err(NoSpaceAvailable { bounds })
        );
    }

    #[test]
    fn free_cells_excludes_occupied() {
        let bounds = GridSize {
            width: 2,
            height: 2,
        };
        let occupied: HashSet<_> = [Position { x: 0, y: 0 }, Position { x: 1, y: 1 }].into();

        assert_eq!(
            free_cells(bounds, &occupied),
            vec![Position { x: 1, y: 0 }, Position { x: 0, y: 1 }]
        );
    }
}
