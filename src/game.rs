//! Game-level state: one session of Klondike.
//
//! `GameSession` is the single mutable root of a game. It owns the board,
//! the score, the move counter and the undo/redo history, and it is only
//! changed through its own methods:
//!   - `draw_from_stock`, `recycle_waste`, `move_cards` (this module)
//!   - `undo`, `redo` (`crate::history`)
//!
//! Each method either applies completely and records a `MoveRecord`, or
//! does nothing at all. After every change the session re-checks for a win.

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Board, CardRef, PileRef};
use crate::deck::{DealCode, Deck, deal_initial_tableau, shuffled_deck, shuffled_deck_from_seed};
use crate::error::{DealCodeError, MoveError};
use crate::history::History;
use crate::moves::{self, MoveKind, MoveRecord};
use crate::rules::{is_board_winnable, is_win};
use crate::settings::DrawMode;

/// Where a session stands.
///
/// `Won` is terminal for scoring purposes; gating further input is left to
/// the caller.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
}

/// Complete state of one game in progress.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub(crate) board: Board,
    pub(crate) score: u32,
    pub(crate) move_count: u32,
    pub(crate) history: History,
    pub(crate) draw_mode: DrawMode,
    pub(crate) status: GameStatus,
    started_at: Instant,
    /// The order the game was dealt from, when it came from a full deck.
    deal_code: Option<DealCode>,
}

/// Plain-data view of a session for a UI to render or serialize.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot<'a> {
    pub board: &'a Board,
    pub score: u32,
    pub moves: u32,
    pub can_undo: bool,
    pub can_redo: bool,
    pub status: GameStatus,
    pub draw_mode: DrawMode,
    pub deal_code: Option<String>,
}

impl GameSession {
    /// Start a game from a freshly shuffled deck, seeded from OS entropy.
    pub fn new_game(draw_mode: DrawMode) -> Self {
        let mut rng = ChaCha8Rng::from_entropy();
        Self::new_game_with_rng(draw_mode, &mut rng)
    }

    /// Start a game from a deck shuffled with the given generator.
    pub fn new_game_with_rng<R: Rng + ?Sized>(draw_mode: DrawMode, rng: &mut R) -> Self {
        Self::from_deck(shuffled_deck(rng), draw_mode)
    }

    /// Start a reproducible game: the same seed always deals the same layout.
    pub fn from_seed(seed: u64, draw_mode: DrawMode) -> Self {
        Self::from_deck(shuffled_deck_from_seed(seed), draw_mode)
    }

    /// Replay the deal named by a deal code.
    pub fn from_deal_code(code: &DealCode, draw_mode: DrawMode) -> Result<Self, DealCodeError> {
        Ok(Self::from_deck(code.to_deck()?, draw_mode))
    }

    /// Deal an already-ordered deck without reshuffling it.
    pub fn from_deck(deck: Deck, draw_mode: DrawMode) -> Self {
        let deal_code = DealCode::from_deck(&deck);
        let board = deal_initial_tableau(deck);
        info!(%deal_code, draw = draw_mode.count(), "new game dealt");
        let mut session = Self::from_board(board, draw_mode);
        session.deal_code = Some(deal_code);
        session
    }

    /// Start from an arbitrary position (puzzles, tests). Score and history
    /// start empty.
    pub fn from_board(board: Board, draw_mode: DrawMode) -> Self {
        let mut session = GameSession {
            board,
            score: 0,
            move_count: 0,
            history: History::default(),
            draw_mode,
            status: GameStatus::Playing,
            started_at: Instant::now(),
            deal_code: None,
        };
        session.refresh_status();
        session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Change the draw mode; it applies from the next draw on. Recorded
    /// draws keep the mode they were made with.
    pub fn set_draw_mode(&mut self, draw_mode: DrawMode) {
        self.draw_mode = draw_mode;
    }

    pub fn deal_code(&self) -> Option<&DealCode> {
        self.deal_code.as_ref()
    }

    /// Applied moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        self.history.done()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// True once no tableau card is face-down (the auto-complete gate).
    pub fn can_auto_complete(&self) -> bool {
        self.board.all_tableau_face_up()
    }

    /// The "no card is stuck" heuristic from `rules::is_board_winnable`.
    pub fn looks_winnable(&self) -> bool {
        is_board_winnable(&self.board)
    }

    /// Wall-clock time since the session was created.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn restart_clock(&mut self) {
        self.started_at = Instant::now();
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            board: &self.board,
            score: self.score,
            moves: self.move_count,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            status: self.status,
            draw_mode: self.draw_mode,
            deal_code: self.deal_code.as_ref().map(ToString::to_string),
        }
    }

    /// Draw up to `draw_mode` cards from the stock onto the waste.
    ///
    /// Returns `false` and changes nothing when the stock is empty; the
    /// caller should offer `recycle_waste` instead.
    pub fn draw_from_stock(&mut self) -> bool {
        match moves::draw(&mut self.board, self.draw_mode) {
            Some(kind) => {
                self.commit(kind);
                true
            }
            None => false,
        }
    }

    /// Turn the waste back over into the stock. No-op on an empty waste or
    /// while the stock still holds cards.
    pub fn recycle_waste(&mut self) -> bool {
        match moves::recycle(&mut self.board) {
            Some(kind) => {
                self.commit(kind);
                true
            }
            None => false,
        }
    }

    /// Move `count` cards starting at `from` onto the pile `to`.
    ///
    /// On rejection the session is untouched and the reason is returned.
    pub fn move_cards(
        &mut self,
        from: CardRef,
        to: PileRef,
        count: usize,
    ) -> Result<GameStatus, MoveError> {
        let kind = moves::transfer(&mut self.board, from, to, count).inspect_err(|err| {
            debug!(?from, %to, count, %err, "move rejected");
        })?;
        self.commit(kind);
        Ok(self.status)
    }

    /// Score, count and record a move that has just been applied to the board.
    fn commit(&mut self, kind: MoveKind) {
        let old_score = self.score;
        self.score = kind.score_after(old_score);
        self.move_count += 1;
        debug!(
            what = %kind.describe(),
            old_score,
            score = self.score,
            moves = self.move_count,
            "move applied"
        );
        self.history.record(MoveRecord { kind, old_score });
        self.refresh_status();
    }

    pub(crate) fn refresh_status(&mut self) {
        let status = if is_win(&self.board) {
            GameStatus::Won
        } else {
            GameStatus::Playing
        };
        if status == GameStatus::Won && self.status != GameStatus::Won {
            info!(score = self.score, moves = self.move_count, "game won");
        }
        self.status = status;
    }
}

/// Render a duration as `m:ss`, the way the timer shows it.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
