use std::time::Duration;

use tracing::{debug, info, trace};

use crate::game::logic::{GameEngine, Snapshot};
use crate::game::types::{GameStatus, Mode};

/// Anything that can present engine state.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

/// A computer reply the host event loop must fire after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTurn {
    pub token: u64,
    pub delay: Duration,
}

/// Deferred computer move. Each schedule or cancel bumps the generation, so a
/// timer carrying an older token is recognised as stale when it fires.
#[derive(Debug, Default)]
pub struct ComputerTurn {
    generation: u64,
    pending: bool,
}

impl ComputerTurn {
    pub fn schedule(&mut self, delay: Duration) -> PendingTurn {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        PendingTurn {
            token: self.generation,
            delay,
        }
    }

    /// Claim the pending move. Only the live token succeeds, and only once.
    pub fn take(&mut self, token: u64) -> bool {
        if self.pending && token == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Routes user commands to the engine and pushes every resulting state to the
/// renderer. Board input is locked while a computer move is pending.
pub struct Controller<R: Renderer> {
    engine: GameEngine,
    turn: ComputerTurn,
    renderer: R,
    delay: Duration,
}

impl<R: Renderer> Controller<R> {
    pub fn new(renderer: R, delay: Duration) -> Self {
        Self {
            engine: GameEngine::new(),
            turn: ComputerTurn::default(),
            renderer,
            delay,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// A computer reply is scheduled and the board ignores clicks.
    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.turn.is_pending()
    }

    pub fn start(&mut self, mode: Mode) {
        self.turn.cancel();
        self.engine.start(mode);
        self.refresh();
    }

    pub fn reset(&mut self) {
        self.turn.cancel();
        self.engine.reset();
        self.refresh();
    }

    pub fn reset_statistics(&mut self) {
        self.engine.statistics_mut().reset();
        self.refresh();
    }

    /// A human clicked cell `index`. Returns the computer reply to schedule, if
    /// the move handed the turn to the computer.
    pub fn click(&mut self, index: usize) -> Option<PendingTurn> {
        if self.turn.is_pending() || self.engine.awaits_computer() {
            trace!(index, "click ignored, computer to move");
            return None;
        }
        let before = self.engine.board().clone();
        self.engine.apply_move(index);
        if *self.engine.board() == before {
            trace!(index, "click rejected");
            return None;
        }
        if self.engine.status().is_terminal() {
            info!(status = ?self.engine.status(), "game finished");
        } else {
            debug!(index, next = %self.engine.current_player(), "move applied");
        }
        self.refresh();

        if self.engine.awaits_computer() {
            let pending = self.turn.schedule(self.delay);
            debug!(token = pending.token, "computer move scheduled");
            Some(pending)
        } else {
            None
        }
    }

    /// Timer callback for a scheduled computer move.
    pub fn fire(&mut self, token: u64) -> GameStatus {
        self.fire_using(token, GameEngine::computer_move)
    }

    #[cfg(test)]
    fn fire_with<G: rand::Rng + ?Sized>(&mut self, token: u64, rng: &mut G) -> GameStatus {
        self.fire_using(token, |engine| engine.computer_move_with(rng))
    }

    fn fire_using(
        &mut self,
        token: u64,
        play: impl FnOnce(&mut GameEngine) -> GameStatus,
    ) -> GameStatus {
        if !self.turn.take(token) {
            debug!(token, "stale computer move dropped");
            return self.engine.status();
        }
        let status = play(&mut self.engine);
        self.refresh();
        status
    }

    pub fn refresh(&mut self) {
        let snapshot = self.engine.snapshot();
        self.renderer.render(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Cell, Player, StatusMessage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Snapshot>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, snapshot: &Snapshot) {
            self.frames.push(snapshot.clone());
        }
    }

    fn controller() -> Controller<Recorder> {
        Controller::new(Recorder::default(), Duration::from_millis(500))
    }

    #[test]
    fn stale_tokens_never_fire() {
        let mut turn = ComputerTurn::default();
        let first = turn.schedule(Duration::ZERO);
        turn.cancel();
        assert!(!turn.is_pending());
        assert!(!turn.take(first.token));

        let second = turn.schedule(Duration::ZERO);
        assert_ne!(first.token, second.token);
        assert!(turn.take(second.token));
        assert!(!turn.take(second.token));
    }

    #[test]
    fn pvp_clicks_never_schedule_the_computer() {
        let mut c = controller();
        c.start(Mode::PvP);
        assert_eq!(c.click(0), None);
        assert_eq!(c.click(4), None);
        assert_eq!(c.engine().board().get(4), Some(Cell::O));
        assert_eq!(
            c.renderer().frames.last().map(|f| f.message),
            Some(StatusMessage::Turn(Player::X))
        );
    }

    #[test]
    fn human_move_schedules_computer_and_locks_board() {
        let mut c = controller();
        c.start(Mode::PvComputer);
        let pending = c.click(4).expect("computer reply scheduled");
        assert_eq!(pending.delay, Duration::from_millis(500));
        assert!(c.is_busy());

        // Input is locked until the computer has played.
        assert_eq!(c.click(0), None);
        assert_eq!(c.engine().board().get(0), Some(Cell::Empty));

        let mut rng = StdRng::seed_from_u64(9);
        let status = c.fire_with(pending.token, &mut rng);
        assert_eq!(status, GameStatus::InProgress(Player::X));
        assert!(!c.is_busy());
        assert_eq!(c.engine().board().count(Cell::O), 1);
    }

    #[test]
    fn rejected_click_does_not_schedule_or_render() {
        let mut c = controller();
        c.start(Mode::PvComputer);
        let frames = c.renderer().frames.len();
        assert_eq!(c.click(12), None);
        assert!(!c.is_busy());
        assert_eq!(c.renderer().frames.len(), frames);
    }

    #[test]
    fn rejected_pvp_clicks_leave_frames_untouched() {
        let mut c = controller();
        c.click(0);
        assert_eq!(c.renderer().frames.len(), 0);

        c.start(Mode::PvP);
        c.click(0);
        let frames = c.renderer().frames.len();
        // Occupied cell, then a finished game.
        c.click(0);
        assert_eq!(c.renderer().frames.len(), frames);
        for i in [3, 1, 4, 2] {
            c.click(i);
        }
        let frames = c.renderer().frames.len();
        c.click(8);
        assert_eq!(c.renderer().frames.len(), frames);
        assert_eq!(c.engine().board().get(8), Some(Cell::Empty));
    }

    #[test]
    fn reset_cancels_pending_computer_move() {
        let mut c = controller();
        c.start(Mode::PvComputer);
        let pending = c.click(0).unwrap();
        c.reset();
        assert!(!c.is_busy());

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(c.fire_with(pending.token, &mut rng), GameStatus::NotStarted);
        assert_eq!(c.engine().board().count(Cell::O), 0);
        assert_eq!(
            c.renderer().frames.last().map(|f| f.message),
            Some(StatusMessage::ChooseMode)
        );
    }

    #[test]
    fn restart_drops_reply_from_previous_game() {
        let mut c = controller();
        c.start(Mode::PvComputer);
        let old = c.click(0).unwrap();
        c.start(Mode::PvComputer);
        let new = c.click(8).unwrap();

        let mut rng = StdRng::seed_from_u64(2);
        c.fire_with(old.token, &mut rng);
        assert_eq!(c.engine().board().count(Cell::O), 0);
        c.fire_with(new.token, &mut rng);
        assert_eq!(c.engine().board().count(Cell::O), 1);
        assert_eq!(c.engine().board().get(0), Some(Cell::Empty));
    }

    #[test]
    fn scoreboard_survives_restart_until_cleared() {
        let mut c = controller();
        c.start(Mode::PvP);
        for i in [0, 3, 1, 4, 2] {
            c.click(i);
        }
        c.start(Mode::PvP);
        assert_eq!(c.engine().statistics().x_wins, 1);
        c.reset_statistics();
        assert_eq!(c.engine().statistics().x_wins, 0);
    }
}
