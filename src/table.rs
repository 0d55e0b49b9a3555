//! The table: one game plus the player's settings and statistics.
//!
//! `SolitaireTable` is what a front end talks to. It forwards play to the
//! current `GameSession`, applies the settings (draw mode, hints), keeps
//! statistics in step with game starts and wins, and writes both back to
//! its `Storage` whenever they change. Persistence is best-effort: a failed
//! write is logged and play continues.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::assist::{self, AssistLimits, AutoComplete, Hint};
use crate::board::{Board, CardRef, PileRef};
use crate::deck::DealCode;
use crate::error::{DealCodeError, MoveError};
use crate::game::{GameSession, GameStatus, SessionSnapshot};
use crate::rules::accepting_foundation;
use crate::settings::{DrawMode, Settings};
use crate::stats::Statistics;
use crate::storage::{Storage, load_settings, load_statistics, save_settings, save_statistics};

pub struct SolitaireTable<S: Storage> {
    storage: S,
    settings: Settings,
    stats: Statistics,
    session: GameSession,
    /// Set once the current game's win has been counted.
    win_recorded: bool,
    rng: ChaCha8Rng,
}

impl<S: Storage> SolitaireTable<S> {
    /// Load settings and statistics from `storage` and deal a first game.
    pub fn open(storage: S) -> Self {
        Self::open_with_rng(storage, ChaCha8Rng::from_entropy())
    }

    /// Like `open`, but every shuffle comes from `rng`.
    pub fn open_with_rng(storage: S, rng: ChaCha8Rng) -> Self {
        let settings = load_settings(&storage);
        let stats = load_statistics(&storage);
        let session = GameSession::from_board(Board::new_empty(), settings.draw_mode);
        let mut table = SolitaireTable {
            storage,
            settings,
            stats,
            session,
            win_recorded: false,
            rng,
        };
        table.new_game();
        table
    }

    /// Abandon the current game and deal a fresh one.
    pub fn new_game(&mut self) {
        let session = GameSession::new_game_with_rng(self.settings.draw_mode, &mut self.rng);
        self.start_session(session);
    }

    /// Deal the layout for a fixed seed.
    pub fn new_game_with_seed(&mut self, seed: u64) {
        self.start_session(GameSession::from_seed(seed, self.settings.draw_mode));
    }

    /// Replay a shared deal. An unreadable code leaves the current game alone.
    pub fn replay_deal(&mut self, code: &str) -> Result<(), DealCodeError> {
        let code: DealCode = code.parse()?;
        let session = GameSession::from_deal_code(&code, self.settings.draw_mode)?;
        self.start_session(session);
        Ok(())
    }

    fn start_session(&mut self, session: GameSession) {
        if !self.win_recorded && self.session.move_count() > 0 {
            info!(moves = self.session.move_count(), "unfinished game abandoned");
            self.stats.record_abandoned();
        }
        self.stats.record_game_started();
        self.persist_stats();
        self.session = session;
        self.win_recorded = false;
    }

    pub fn draw(&mut self) -> bool {
        self.session.draw_from_stock()
    }

    pub fn recycle(&mut self) -> bool {
        self.session.recycle_waste()
    }

    /// A click on the stock slot: draw while there are cards, otherwise
    /// turn the waste over.
    pub fn click_stock(&mut self) -> bool {
        if self.session.board().stock.is_empty() {
            self.recycle()
        } else {
            self.draw()
        }
    }

    pub fn move_cards(
        &mut self,
        from: CardRef,
        to: PileRef,
        count: usize,
    ) -> Result<GameStatus, MoveError> {
        let status = self.session.move_cards(from, to, count)?;
        self.note_progress();
        Ok(status)
    }

    /// Send the top card of the waste or a tableau column to the first
    /// foundation that takes it. Returns the foundation, or `None` if the
    /// card has nowhere to go.
    pub fn quick_move_to_foundation(&mut self, source: PileRef) -> Option<PileRef> {
        if !matches!(source, PileRef::Waste | PileRef::Tableau(_)) {
            return None;
        }
        let pile = self.session.board().pile(source)?;
        let card = pile.top().filter(|c| c.is_face_up())?;
        let from = CardRef::new(source, pile.len() - 1);
        let to = PileRef::Foundation(accepting_foundation(self.session.board(), card)?);
        self.move_cards(from, to, 1).ok().map(|_| to)
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.session.redo();
        self.note_progress();
        redone
    }

    pub fn hint(&self) -> Hint {
        if !self.settings.hints_enabled {
            return Hint::Disabled;
        }
        assist::get_hint(self.session.board())
    }

    pub fn auto_complete(&mut self) -> AutoComplete {
        let result = assist::auto_complete(&mut self.session, AssistLimits::default());
        self.note_progress();
        result
    }

    /// Count the win the first time the game reaches it.
    fn note_progress(&mut self) {
        if self.session.is_won() && !self.win_recorded {
            self.win_recorded = true;
            self.stats.record_win(self.session.score());
            info!(
                score = self.session.score(),
                streak = self.stats.current_streak,
                rank = %self.stats.rank(),
                "win recorded"
            );
            self.persist_stats();
        }
    }

    /// Switch between draw-one and draw-three. The current game uses the
    /// new mode from its next draw.
    pub fn toggle_draw_mode(&mut self) -> DrawMode {
        self.settings.draw_mode = self.settings.draw_mode.toggled();
        self.session.set_draw_mode(self.settings.draw_mode);
        self.persist_settings();
        self.settings.draw_mode
    }

    /// Turn the timer on or off. Turning it on restarts the clock.
    pub fn toggle_timed(&mut self) -> bool {
        self.settings.timed = !self.settings.timed;
        if self.settings.timed {
            self.session.restart_clock();
        }
        self.persist_settings();
        self.settings.timed
    }

    pub fn toggle_hints(&mut self) -> bool {
        self.settings.hints_enabled = !self.settings.hints_enabled;
        self.persist_settings();
        self.settings.hints_enabled
    }

    pub fn toggle_animations(&mut self) -> bool {
        self.settings.animations_enabled = !self.settings.animations_enabled;
        self.persist_settings();
        self.settings.animations_enabled
    }

    pub fn reset_statistics(&mut self) {
        self.stats.reset();
        self.persist_stats();
    }

    fn persist_settings(&mut self) {
        if let Err(err) = save_settings(&mut self.storage, &self.settings) {
            warn!(%err, "settings not saved");
        }
    }

    fn persist_stats(&mut self) {
        if let Err(err) = save_statistics(&mut self.storage, &self.stats) {
            warn!(%err, "statistics not saved");
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn board(&self) -> &Board {
        self.session.board()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn moves(&self) -> u32 {
        self.session.move_count()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    pub fn can_auto_complete(&self) -> bool {
        self.session.can_auto_complete()
    }

    pub fn won(&self) -> bool {
        self.session.is_won()
    }

    /// Time on the clock, or `None` with the timer off.
    pub fn elapsed(&self) -> Option<Duration> {
        self.settings.timed.then(|| self.session.elapsed())
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        self.session.snapshot()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
