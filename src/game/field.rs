use super::types::{Cell, Player, WinLine};

pub const BOARD_SIDE: usize = 3;
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

/// The eight winning lines. Order matters: the first match wins.
pub const LINES: [[usize; 3]; 8] = [
    // rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// The 3×3 board, stored row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for indices outside 0..9.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Put `player`'s mark at `index`. Returns `false` (and leaves the board
    /// untouched) if the index is out of range or already taken.
    pub fn place(&mut self, index: usize, player: Player) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) if *cell == Cell::Empty => {
                *cell = player.mark();
                true
            }
            _ => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    #[cfg(test)]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

/// Find the first line completely held by `player`.
pub fn evaluate_win(board: &Board, player: Player) -> Option<WinLine> {
    let mark = player.mark();
    LINES
        .iter()
        .find(|line| line.iter().all(|&i| board.cells[i] == mark))
        .map(|&line| WinLine::new(line))
}
