use std::fmt;

use thiserror::Error;

/// The content of a single square on the 3×3 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

/// One of the two sides. X always opens a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// The mark this player leaves on the board.
    pub fn mark(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => f.write_str("X"),
            Player::O => f.write_str("O"),
        }
    }
}

/// Who drives O's turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Two humans share the board.
    #[default]
    PvP,
    /// O is played by the random-move computer.
    PvComputer,
}

/// Three board indices forming a completed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinLine([usize; 3]);

impl WinLine {
    pub fn new(indices: [usize; 3]) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> [usize; 3] {
        self.0
    }

    /// First and last cell of the line, used to place the overlay.
    pub fn endpoints(&self) -> (usize, usize) {
        (self.0[0], self.0[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    /// Game running; carries the player to move next.
    InProgress(Player),
    WonBy(Player, WinLine),
    Draw,
}

impl GameStatus {
    /// Terminal states accept no further moves until a restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::WonBy(..) | GameStatus::Draw)
    }
}

/// What the status line should currently say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    ChooseMode,
    Turn(Player),
    PlayerWins(Player),
    ComputerWins,
    Draw,
}

impl StatusMessage {
    pub fn fluent_id(&self) -> &'static str {
        match self {
            StatusMessage::ChooseMode => "status-choose-mode",
            StatusMessage::Turn(_) => "status-turn",
            StatusMessage::PlayerWins(_) => "status-wins",
            StatusMessage::ComputerWins => "status-computer-wins",
            StatusMessage::Draw => "status-draw",
        }
    }

    /// The player referenced by the message, if any.
    pub fn player(&self) -> Option<Player> {
        match self {
            StatusMessage::Turn(p) | StatusMessage::PlayerWins(p) => Some(*p),
            _ => None,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::ChooseMode => f.write_str("Choose a mode to start!"),
            StatusMessage::Turn(p) => write!(f, "Player {}'s turn", p),
            StatusMessage::PlayerWins(p) => write!(f, "Player {} wins!", p),
            StatusMessage::ComputerWins => f.write_str("Computer wins!"),
            StatusMessage::Draw => f.write_str("It's a draw!"),
        }
    }
}

/// Engine states that the public move API never exposes as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no empty cell left for the computer to play")]
    NoEmptyCell,
}

/// Win/draw tally for the running session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub x_wins: u32,
    pub o_wins: u32,
    pub computer_wins: u32,
    pub draws: u32,
}

impl Statistics {
    pub fn record(&mut self, status: GameStatus, mode: Mode) {
        match (status, mode) {
            (GameStatus::WonBy(Player::X, _), _) => self.x_wins += 1,
            (GameStatus::WonBy(Player::O, _), Mode::PvP) => self.o_wins += 1,
            (GameStatus::WonBy(Player::O, _), Mode::PvComputer) => self.computer_wins += 1,
            (GameStatus::Draw, _) => self.draws += 1,
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_display_texts() {
        assert_eq!(StatusMessage::ChooseMode.to_string(), "Choose a mode to start!");
        assert_eq!(StatusMessage::Turn(Player::O).to_string(), "Player O's turn");
        assert_eq!(StatusMessage::PlayerWins(Player::X).to_string(), "Player X wins!");
        assert_eq!(StatusMessage::ComputerWins.to_string(), "Computer wins!");
        assert_eq!(StatusMessage::Draw.to_string(), "It's a draw!");
    }

    #[test]
    fn win_line_endpoints_are_first_and_last() {
        let line = WinLine::new([2, 4, 6]);
        assert_eq!(line.endpoints(), (2, 6));
        assert_eq!(line.indices(), [2, 4, 6]);
    }

    #[test]
    fn statistics_credit_computer_only_in_pv_computer() {
        let mut stats = Statistics::default();
        let o_win = GameStatus::WonBy(Player::O, WinLine::new([0, 1, 2]));
        stats.record(o_win, Mode::PvP);
        stats.record(o_win, Mode::PvComputer);
        stats.record(GameStatus::Draw, Mode::PvComputer);
        stats.record(GameStatus::InProgress(Player::X), Mode::PvP);
        assert_eq!(stats.o_wins, 1);
        assert_eq!(stats.computer_wins, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.x_wins, 0);

        stats.reset();
        assert_eq!(stats, Statistics::default());
    }
}
