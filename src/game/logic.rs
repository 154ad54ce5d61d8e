use rand::Rng;
use tracing::{debug, trace, warn};

use super::field::{self, Board};
use super::types::{GameStatus, Mode, Player, Statistics, StatusMessage, WinLine};
use crate::ai;

/// Owns the state of one game and enforces the rules.
///
/// Every operation is a silent no-op when its preconditions do not hold; the
/// returned status is then simply the unchanged current one.
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    current: Player,
    status: GameStatus,
    mode: Mode,
    last_move: Option<(usize, Player)>,
    statistics: Statistics,
}

/// Everything a renderer needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub current_player: Player,
    pub status: GameStatus,
    pub mode: Mode,
    pub message: StatusMessage,
    pub win_endpoints: Option<(usize, usize)>,
    pub last_move: Option<(usize, Player)>,
    pub statistics: Statistics,
}

impl Snapshot {
    /// The computer owns the next move, so the board takes no clicks.
    pub fn awaits_computer(&self) -> bool {
        self.mode == Mode::PvComputer && self.status == GameStatus::InProgress(Player::O)
    }
}

impl GameEngine {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current: Player::X,
            status: GameStatus::NotStarted,
            mode: Mode::default(),
            last_move: None,
            statistics: Statistics::default(),
        }
    }

    /// Begin a fresh game in `mode`. X always opens.
    pub fn start(&mut self, mode: Mode) -> GameStatus {
        self.clear();
        self.mode = mode;
        self.status = GameStatus::InProgress(Player::X);
        debug!(?mode, "game started");
        self.status
    }

    /// Clear the board and wait for a mode choice. The mode is kept.
    pub fn reset(&mut self) -> GameStatus {
        self.clear();
        self.status = GameStatus::NotStarted;
        debug!("game reset");
        self.status
    }

    /// Place the current player's mark at `index`.
    pub fn apply_move(&mut self, index: usize) -> GameStatus {
        if !matches!(self.status, GameStatus::InProgress(_)) {
            trace!(index, status = ?self.status, "move ignored, game not running");
            return self.status;
        }
        if !self.board.place(index, self.current) {
            trace!(index, "move ignored, cell unavailable");
            return self.status;
        }
        self.after_placement(index)
    }

    /// Let the computer play O on a random empty cell.
    pub fn computer_move(&mut self) -> GameStatus {
        self.computer_move_with(&mut rand::thread_rng())
    }

    /// Like [`computer_move`](Self::computer_move) with a caller-supplied RNG.
    pub fn computer_move_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameStatus {
        if self.mode != Mode::PvComputer || self.status != GameStatus::InProgress(Player::O) {
            trace!(mode = ?self.mode, status = ?self.status, "computer move out of turn");
            return self.status;
        }
        match ai::random_move(&self.board, rng) {
            Ok(index) => {
                debug!(index, "computer picked cell");
                self.apply_move(index)
            }
            Err(e) => {
                warn!("computer move skipped: {}", e);
                self.status
            }
        }
    }

    /// The first line held entirely by `player`, if any.
    pub fn evaluate_win(&self, player: Player) -> Option<WinLine> {
        field::evaluate_win(&self.board, player)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[cfg(test)]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_move(&self) -> Option<(usize, Player)> {
        self.last_move
    }

    #[cfg(test)]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, GameStatus::InProgress(_))
    }

    /// True once at least one mark has been placed in a running game.
    pub fn has_moves(&self) -> bool {
        self.last_move.is_some()
    }

    /// Whether the next move belongs to the computer.
    pub fn awaits_computer(&self) -> bool {
        self.mode == Mode::PvComputer && self.status == GameStatus::InProgress(Player::O)
    }

    /// Endpoint cells of the winning line, for the overlay.
    pub fn win_endpoints(&self) -> Option<(usize, usize)> {
        match self.status {
            GameStatus::WonBy(_, line) => Some(line.endpoints()),
            _ => None,
        }
    }

    pub fn message(&self) -> StatusMessage {
        match self.status {
            GameStatus::NotStarted => StatusMessage::ChooseMode,
            GameStatus::InProgress(p) => StatusMessage::Turn(p),
            GameStatus::WonBy(Player::O, _) if self.mode == Mode::PvComputer => {
                StatusMessage::ComputerWins
            }
            GameStatus::WonBy(p, _) => StatusMessage::PlayerWins(p),
            GameStatus::Draw => StatusMessage::Draw,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current_player: self.current,
            status: self.status,
            mode: self.mode,
            message: self.message(),
            win_endpoints: self.win_endpoints(),
            last_move: self.last_move,
            statistics: self.statistics.clone(),
        }
    }

    fn after_placement(&mut self, index: usize) -> GameStatus {
        let mover = self.current;
        self.last_move = Some((index, mover));

        // Only the mover can have completed a line with this placement.
        if let Some(line) = self.evaluate_win(mover) {
            return self.finish(GameStatus::WonBy(mover, line));
        }
        if self.board.is_full() {
            return self.finish(GameStatus::Draw);
        }

        self.current = mover.opponent();
        self.status = GameStatus::InProgress(self.current);
        self.status
    }

    fn finish(&mut self, status: GameStatus) -> GameStatus {
        self.status = status;
        self.statistics.record(status, self.mode);
        debug!(?status, "game over");
        status
    }

    fn clear(&mut self) {
        self.board = Board::new();
        self.current = Player::X;
        self.last_move = None;
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
