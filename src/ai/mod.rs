use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::field::Board;
use crate::game::types::EngineError;

/// Pick a cell uniformly at random among the empty ones.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<usize, EngineError> {
    board
        .empty_indices()
        .choose(rng)
        .copied()
        .ok_or(EngineError::NoEmptyCell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Cell, Player};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn only_empty_cells_are_chosen() {
        let mut board = Board::new();
        for i in [0, 1, 2, 4, 5, 6, 8] {
            board.place(i, if i % 2 == 0 { Player::X } else { Player::O });
        }
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let idx = random_move(&board, &mut rng).unwrap();
            assert!(idx == 3 || idx == 7);
            assert_eq!(board.get(idx), Some(Cell::Empty));
        }
    }

    #[test]
    fn every_empty_cell_is_reachable() {
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 9];
        for _ in 0..1000 {
            seen[random_move(&board, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn full_board_is_an_error() {
        let mut board = Board::new();
        for i in 0..9 {
            board.place(i, Player::X);
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_move(&board, &mut rng), Err(EngineError::NoEmptyCell));
    }
}
