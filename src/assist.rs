//! Hints and auto-complete.
//!
//! Both read the board through `crate::rules`; only `auto_complete` changes
//! anything, and it does so through `GameSession::move_cards` so every card
//! it plays is scored and recorded like a manual move.

use core::fmt;

use tracing::debug;

use crate::board::{Board, CardRef, PileRef};
use crate::card::Card;
use crate::game::GameSession;
use crate::moves::validate_transfer;
use crate::rules::accepting_foundation;

/// One legal move the assistant would suggest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub from: CardRef,
    pub to: PileRef,
    pub count: usize,
    /// The bottom card of the moving run.
    pub card: Card,
}

/// Every move worth suggesting, best first:
///
/// 1. waste top to a foundation
/// 2. each tableau top to a foundation, columns in order
/// 3. waste top to a tableau column, columns in order
/// 4. each face-up tableau card (with everything above it) to another
///    column, columns in order and each column from its deepest face-up
///    card upwards
pub fn candidate_moves(board: &Board) -> Vec<Candidate> {
    let mut out = Vec::new();

    if let Some(candidate) = waste_to_foundation(board) {
        out.push(candidate);
    }
    out.extend(tableau_to_foundation(board));

    if let Some(card) = board.waste.top() {
        let from = CardRef::new(PileRef::Waste, board.waste.len() - 1);
        for to in (0..board.tableau.len()).map(PileRef::Tableau) {
            if validate_transfer(board, from, to, 1).is_ok() {
                out.push(Candidate {
                    from,
                    to,
                    count: 1,
                    card,
                });
            }
        }
    }

    for (src, pile) in board.tableau.iter().enumerate() {
        let first_face_up = pile.len() - pile.face_up_len();
        for index in first_face_up..pile.len() {
            let Some(card) = pile.get(index) else { continue };
            let from = CardRef::new(PileRef::Tableau(src), index);
            let count = pile.len() - index;
            for dst in (0..board.tableau.len()).filter(|&dst| dst != src) {
                let to = PileRef::Tableau(dst);
                if validate_transfer(board, from, to, count).is_ok() {
                    out.push(Candidate {
                        from,
                        to,
                        count,
                        card,
                    });
                }
            }
        }
    }

    out
}

fn waste_to_foundation(board: &Board) -> Option<Candidate> {
    let card = board.waste.top()?;
    let slot = accepting_foundation(board, card)?;
    Some(Candidate {
        from: CardRef::new(PileRef::Waste, board.waste.len() - 1),
        to: PileRef::Foundation(slot),
        count: 1,
        card,
    })
}

fn tableau_to_foundation(board: &Board) -> impl Iterator<Item = Candidate> + '_ {
    board.tableau.iter().enumerate().filter_map(|(i, pile)| {
        let card = pile.top().filter(|c| c.is_face_up())?;
        let slot = accepting_foundation(board, card)?;
        Some(Candidate {
            from: CardRef::new(PileRef::Tableau(i), pile.len() - 1),
            to: PileRef::Foundation(slot),
            count: 1,
            card,
        })
    })
}

/// The first foundation move auto-complete would make.
fn next_foundation_move(board: &Board) -> Option<Candidate> {
    waste_to_foundation(board).or_else(|| tableau_to_foundation(board).next())
}

/// Advice for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    Move(Candidate),
    /// Nothing to move, but the stock still has cards.
    DrawFromStock,
    NoMoves,
    /// Hints are switched off in the settings.
    Disabled,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hint::Move(c) => {
                let from = match c.from.pile {
                    PileRef::Waste => "waste".to_string(),
                    other => other.to_string(),
                };
                let to = match c.to {
                    PileRef::Foundation(_) => "foundation".to_string(),
                    other => other.to_string(),
                };
                write!(f, "Move {} from {} to {}", c.card, from, to)
            }
            Hint::DrawFromStock => f.write_str("Try drawing from the stock"),
            Hint::NoMoves => f.write_str("No obvious moves available"),
            Hint::Disabled => f.write_str("Hints are disabled"),
        }
    }
}

/// The best suggestion for this board. Never changes anything.
pub fn get_hint(board: &Board) -> Hint {
    match candidate_moves(board).first() {
        Some(&candidate) => Hint::Move(candidate),
        None if !board.stock.is_empty() => Hint::DrawFromStock,
        None => Hint::NoMoves,
    }
}

/// Bounds for `auto_complete`.
#[derive(Clone, Copy, Debug)]
pub struct AssistLimits {
    /// Most foundation moves a single auto-complete will play.
    pub max_auto_moves: u32,
}

impl Default for AssistLimits {
    fn default() -> Self {
        AssistLimits {
            max_auto_moves: 100,
        }
    }
}

/// Result of an auto-complete request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoComplete {
    /// Some tableau card is still face-down; nothing was played.
    Refused,
    /// `moves` foundation moves were played (possibly zero).
    Completed { moves: u32 },
}

impl AutoComplete {
    pub fn moves(self) -> u32 {
        match self {
            AutoComplete::Refused => 0,
            AutoComplete::Completed { moves } => moves,
        }
    }
}

impl fmt::Display for AutoComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AutoComplete::Refused => f.write_str("Cannot auto-complete: cards still face down"),
            AutoComplete::Completed { moves: 0 } => {
                f.write_str("No moves available for auto-complete")
            }
            AutoComplete::Completed { moves } => write!(f, "Auto-completed {moves} moves"),
        }
    }
}

/// Play foundation moves until none is left or the cap is reached.
///
/// Each round tries the waste top first, then the tableau tops in column
/// order, plays the first legal one and starts over. Reaching the cap is a
/// normal stop.
pub fn auto_complete(session: &mut GameSession, limits: AssistLimits) -> AutoComplete {
    if !session.can_auto_complete() {
        debug!("auto-complete refused: face-down cards remain");
        return AutoComplete::Refused;
    }

    let mut moves = 0;
    while moves < limits.max_auto_moves {
        let Some(c) = next_foundation_move(session.board()) else {
            break;
        };
        if session.move_cards(c.from, c.to, c.count).is_err() {
            break;
        }
        moves += 1;
    }
    debug!(moves, "auto-complete finished");
    AutoComplete::Completed { moves }
}
