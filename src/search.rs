//! Hint-following autoplay.
//!
//! This is not a solver. It plays one game forward the way a patient player
//! who always takes the hint would:
//!   - auto-complete as soon as every tableau card is face-up,
//!   - otherwise play the best candidate move that leads to a position not
//!     seen before,
//!   - otherwise draw from the stock, or recycle the waste when the stock
//!     is empty.
//!
//! A visited set of board fingerprints keeps it from moving a card back and
//! forth, and a full trip through the stock without any card move ends the
//! run as stuck.

use std::collections::HashSet;

use tracing::debug;

use crate::assist::{AssistLimits, Candidate, auto_complete, candidate_moves};
use crate::board::{Board, PileRef};
use crate::game::GameSession;
use crate::moves;

/// Limits for an autoplay run.
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits {
    /// Hard cap on steps (one move, draw, recycle or auto-complete each).
    pub max_steps: u32,
    /// Bounds for each auto-complete step.
    pub assist: AssistLimits,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_steps: 1_000,
            assist: AssistLimits::default(),
        }
    }
}

/// Why an autoplay run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// All four foundations are complete.
    Won,
    /// A full pass through the stock produced no new card move.
    Stuck,
    /// `SearchLimits::max_steps` was reached first.
    StepLimit,
}

/// Summary of one autoplay run.
#[derive(Clone, Copy, Debug)]
pub struct PlayOutcome {
    pub termination: TerminationReason,
    /// Steps taken by this run.
    pub steps: u32,
    /// Distinct positions seen, counting the start.
    pub positions_seen: usize,
}

impl PlayOutcome {
    pub fn is_win(&self) -> bool {
        self.termination == TerminationReason::Won
    }
}

/// Play `session` forward until it is won, stuck, or out of steps.
pub fn autoplay(session: &mut GameSession, limits: SearchLimits) -> PlayOutcome {
    let mut visited: HashSet<u64> = HashSet::new();
    visited.insert(session.board().fingerprint());

    let mut steps = 0;
    // Stock/waste turns since the last card move.
    let mut idle_turns = 0usize;

    let termination = loop {
        if session.is_won() {
            break TerminationReason::Won;
        }
        if steps >= limits.max_steps {
            break TerminationReason::StepLimit;
        }

        if session.can_auto_complete() && auto_complete(session, limits.assist).moves() > 0 {
            steps += 1;
            idle_turns = 0;
            visited.insert(session.board().fingerprint());
            continue;
        }

        if let Some(c) = first_unvisited(session, &visited) {
            if session.move_cards(c.from, c.to, c.count).is_ok() {
                steps += 1;
                idle_turns = 0;
                visited.insert(session.board().fingerprint());
                continue;
            }
        }

        let cycle_len = session.board().stock.len() + session.board().waste.len() + 1;
        if idle_turns > cycle_len {
            break TerminationReason::Stuck;
        }
        if !session.draw_from_stock() && !session.recycle_waste() {
            break TerminationReason::Stuck;
        }
        steps += 1;
        idle_turns += 1;
        visited.insert(session.board().fingerprint());
    };

    debug!(?termination, steps, positions = visited.len(), "autoplay finished");
    PlayOutcome {
        termination,
        steps,
        positions_seen: visited.len(),
    }
}

/// Best candidate whose resulting position has not been visited yet.
///
/// Moving a whole column onto an empty one only swaps two columns, so those
/// candidates are skipped here even though hints still offer them.
fn first_unvisited(session: &GameSession, visited: &HashSet<u64>) -> Option<Candidate> {
    let board = session.board();
    candidate_moves(board).into_iter().find(|c| {
        if is_column_swap(board, c) {
            return false;
        }
        let mut next = board.clone();
        moves::transfer(&mut next, c.from, c.to, c.count).is_ok()
            && !visited.contains(&next.fingerprint())
    })
}

fn is_column_swap(board: &Board, c: &Candidate) -> bool {
    let PileRef::Tableau(dst) = c.to else {
        return false;
    };
    matches!(c.from.pile, PileRef::Tableau(_)) && c.from.index == 0 && board.tableau[dst].is_empty()
}
