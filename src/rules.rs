//! Placement rules and whole-board predicates.
//!
//! Everything here is a pure function of the cards it is shown; the move
//! engine and the hint search both build on these checks.

use crate::board::{Board, NUM_FOUNDATIONS, Pile};
use crate::card::{Card, NUM_RANKS, Rank, is_one_lower_opposite_color};

/// True if `card` may be placed on the given foundation pile.
///
/// - The card must be face-up.
/// - An empty foundation accepts only an Ace.
/// - Otherwise the card must match the top card's suit and be exactly one
///   rank higher.
pub fn can_place_on_foundation(card: Card, foundation: &Pile) -> bool {
    if !card.is_face_up() {
        return false;
    }
    match foundation.top() {
        None => card.rank() == Rank::Ace,
        Some(top) => card.suit() == top.suit() && card.rank_number() == top.rank_number() + 1,
    }
}

/// True if `card` may be placed on the given tableau pile.
///
/// - The card must be face-up.
/// - An empty column accepts only a King.
/// - A column whose top card is face-down accepts nothing.
/// - Otherwise the card must be the opposite colour of the top card and
///   exactly one rank lower.
pub fn can_place_on_tableau(card: Card, pile: &Pile) -> bool {
    can_place_on_tableau_top(card, pile.top())
}

fn can_place_on_tableau_top(card: Card, top: Option<Card>) -> bool {
    if !card.is_face_up() {
        return false;
    }
    match top {
        None => card.rank() == Rank::King,
        Some(top) if !top.is_face_up() => false,
        Some(top) => is_one_lower_opposite_color(card, top),
    }
}

/// True if the slice of cards (bottom-most first) forms a run that may move
/// as a block: every card face-up and each card placeable, by the tableau
/// rule, on the one before it.
pub fn is_valid_run(cards: &[Card]) -> bool {
    let Some(&first) = cards.first() else {
        return false;
    };
    first.is_face_up()
        && cards
            .windows(2)
            .all(|pair| can_place_on_tableau_top(pair[1], Some(pair[0])))
}

/// True if the run may move onto the tableau pile: it must be a valid run
/// and its bottom-most card must be placeable on the pile.
pub fn can_move_run_to_tableau(run: &[Card], pile: &Pile) -> bool {
    match run.first() {
        Some(&first) => is_valid_run(run) && can_place_on_tableau(first, pile),
        None => false,
    }
}

/// First foundation (in index order) that accepts `card`.
pub fn accepting_foundation(board: &Board, card: Card) -> Option<usize> {
    board
        .foundations
        .iter()
        .position(|f| can_place_on_foundation(card, f))
}

/// First tableau column (in index order, skipping `except`) that accepts
/// `card`.
pub fn accepting_tableau(board: &Board, card: Card, except: Option<usize>) -> Option<usize> {
    board
        .tableau
        .iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != except)
        .find(|(_, pile)| can_place_on_tableau(card, pile))
        .map(|(i, _)| i)
}

/// Necessary-condition check used to gate "this game is as good as won".
///
/// True iff every tableau card is face-up and every card in the tableau and
/// the waste has at least one legal destination (some foundation or some
/// tableau column) under the current pile tops.
///
/// This is a heuristic, not a solver: it proves only that no card is stuck
/// right now. A board with a blocking order inside the tableau can pass the
/// check and still be unwinnable.
pub fn is_board_winnable(board: &Board) -> bool {
    if !board.all_tableau_face_up() {
        return false;
    }
    board
        .tableau
        .iter()
        .flat_map(Pile::iter)
        .chain(board.waste.iter())
        .all(|&card| {
            accepting_foundation(board, card).is_some()
                || accepting_tableau(board, card, None).is_some()
        })
}

/// True iff each of the four foundations holds a full suit.
pub fn is_win(board: &Board) -> bool {
    board.foundations.len() == NUM_FOUNDATIONS
        && board
            .foundations
            .iter()
            .all(|f| f.len() == NUM_RANKS as usize)
}
