//! Move records and the board mechanics behind them.
//
//! A `MoveRecord` is one reversible mutation of the board: a draw from the
//! stock, a recycle of the waste, or a transfer of cards between piles. Each
//! record keeps exactly what is needed to undo it (the cards involved, the
//! source position, whether a tableau card was flipped) plus the score the
//! session had before the move, so undo restores the score verbatim instead
//! of recomputing it.
//!
//! The functions here only touch a `Board`. Bookkeeping of score, move
//! count and the undo/redo stacks lives in `crate::game`.

use serde::Serialize;

use crate::board::{Board, CardRef, PileRef};
use crate::card::Card;
use crate::error::MoveError;
use crate::rules::{can_move_run_to_tableau, can_place_on_foundation, is_valid_run};
use crate::settings::DrawMode;

/// Points for each card that lands on a foundation.
pub const FOUNDATION_POINTS: u32 = 10;
/// Points for each card brought onto the tableau from the waste or a foundation.
pub const TO_TABLEAU_POINTS: u32 = 5;
/// Points for turning up a face-down tableau card.
pub const FLIP_POINTS: u32 = 5;
/// Penalty for recycling the waste back into the stock.
pub const RECYCLE_PENALTY: u32 = 100;

/// What a move did, with enough detail to invert it exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MoveKind {
    /// Cards taken from the stock top, in the order they were popped.
    Draw { cards: Vec<Card>, draw_mode: DrawMode },

    /// The waste, bottom to top, as it was before being turned over.
    Recycle { waste: Vec<Card> },

    /// A run of `cards` lifted from `from` (starting at `from.index`) onto
    /// the top of `to`. `flipped` is the tableau card turned face-up by
    /// uncovering it, if any.
    Transfer {
        from: CardRef,
        to: PileRef,
        cards: Vec<Card>,
        flipped: Option<Card>,
    },
}

/// One entry of the undo/redo history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub kind: MoveKind,
    /// Session score immediately before the move was first applied.
    pub old_score: u32,
}

/// Take up to `mode.count()` cards from the stock top, turn each face-up
/// and append it to the waste in popping order.
///
/// Returns `None` (and changes nothing) when the stock is empty.
pub fn draw(board: &mut Board, mode: DrawMode) -> Option<MoveKind> {
    if board.stock.is_empty() {
        return None;
    }
    let mut cards = Vec::with_capacity(mode.count());
    while cards.len() < mode.count() {
        let Some(mut card) = board.stock.pop() else { break };
        card.set_face_up(true);
        board.waste.push(card);
        cards.push(card);
    }
    Some(MoveKind::Draw {
        cards,
        draw_mode: mode,
    })
}

/// Turn the whole waste back into the stock, face-down.
///
/// The stock is built by popping the waste, so the card drawn first in the
/// previous pass is on top again and the next pass repeats the same order.
/// Returns `None` when the waste is empty or the stock still holds cards.
pub fn recycle(board: &mut Board) -> Option<MoveKind> {
    if board.waste.is_empty() || !board.stock.is_empty() {
        return None;
    }
    let snapshot = board.waste.cards().to_vec();
    turn_waste_over(board);
    Some(MoveKind::Recycle { waste: snapshot })
}

fn turn_waste_over(board: &mut Board) {
    while let Some(mut card) = board.waste.pop() {
        card.set_face_up(false);
        board.stock.push(card);
    }
}

/// Check that `count` cards starting at `from` may move onto `to`.
///
/// Pure: the board is only read.
pub fn validate_transfer(
    board: &Board,
    from: CardRef,
    to: PileRef,
    count: usize,
) -> Result<(), MoveError> {
    if count == 0 {
        return Err(MoveError::EmptyRun);
    }
    if from.pile == to {
        return Err(MoveError::SamePile(to));
    }
    if matches!(from.pile, PileRef::Stock) {
        return Err(MoveError::InvalidSource(from.pile));
    }
    if matches!(to, PileRef::Stock | PileRef::Waste) {
        return Err(MoveError::InvalidDestination(to));
    }
    if matches!((from.pile, to), (PileRef::Foundation(_), PileRef::Foundation(_))) {
        return Err(MoveError::BetweenFoundations);
    }

    let src = board.pile(from.pile).ok_or(MoveError::NoSuchPile(from.pile))?;
    let dst = board.pile(to).ok_or(MoveError::NoSuchPile(to))?;

    if from.index.checked_add(count) != Some(src.len()) {
        return Err(MoveError::NotTopRun {
            pile: from.pile,
            index: from.index,
            count,
            len: src.len(),
        });
    }
    if count > 1 && matches!(from.pile, PileRef::Waste | PileRef::Foundation(_)) {
        return Err(MoveError::SingleCardOnly(from.pile));
    }
    if count > 1 && matches!(to, PileRef::Foundation(_)) {
        return Err(MoveError::FoundationTakesOneCard);
    }

    let run = &src.cards()[from.index..];
    if run.iter().any(|c| !c.is_face_up()) {
        return Err(MoveError::FaceDown);
    }
    let first = run[0];
    let legal = match to {
        PileRef::Foundation(_) => can_place_on_foundation(first, dst),
        PileRef::Tableau(_) => {
            if !is_valid_run(run) {
                return Err(MoveError::BrokenRun);
            }
            can_move_run_to_tableau(run, dst)
        }
        PileRef::Stock | PileRef::Waste => false,
    };
    if !legal {
        return Err(MoveError::IllegalPlacement {
            card: first.label(),
            pile: to,
        });
    }
    Ok(())
}

/// Validate, then move `count` cards from `from` onto `to`.
///
/// If the source is a tableau column whose new top card is face-down, that
/// card is turned up. On error the board is unchanged.
pub fn transfer(
    board: &mut Board,
    from: CardRef,
    to: PileRef,
    count: usize,
) -> Result<MoveKind, MoveError> {
    validate_transfer(board, from, to, count)?;

    let (cards, flipped) = lift_run(board, from).ok_or(MoveError::NoSuchPile(from.pile))?;
    board
        .pile_mut(to)
        .ok_or(MoveError::NoSuchPile(to))?
        .extend(cards.iter().copied());

    Ok(MoveKind::Transfer {
        from,
        to,
        cards,
        flipped,
    })
}

/// Remove the run starting at `from` and uncover the source if needed.
fn lift_run(board: &mut Board, from: CardRef) -> Option<(Vec<Card>, Option<Card>)> {
    let src = board.pile_mut(from.pile)?;
    let cards = src.split_off(from.index);
    let mut flipped = None;
    if matches!(from.pile, PileRef::Tableau(_)) {
        if let Some(top) = src.top_mut() {
            if !top.is_face_up() {
                top.set_face_up(true);
                flipped = Some(*top);
            }
        }
    }
    Some((cards, flipped))
}

impl MoveKind {
    /// The score after applying this move to a session scoring `old`.
    ///
    /// Penalties clamp at zero; the same rule serves the first application
    /// and every redo.
    pub fn score_after(&self, old: u32) -> u32 {
        match self {
            MoveKind::Draw { draw_mode, .. } => old.saturating_sub(draw_mode.penalty()),
            MoveKind::Recycle { .. } => old.saturating_sub(RECYCLE_PENALTY),
            MoveKind::Transfer {
                from,
                to,
                cards,
                flipped,
            } => {
                let n = cards.len() as u32;
                let flip = if flipped.is_some() { FLIP_POINTS } else { 0 };
                let landing = match (from.pile, to) {
                    (_, PileRef::Foundation(_)) => FOUNDATION_POINTS * n,
                    (PileRef::Waste | PileRef::Foundation(_), PileRef::Tableau(_)) => {
                        TO_TABLEAU_POINTS * n
                    }
                    _ => 0,
                };
                old.saturating_add(flip).saturating_add(landing)
            }
        }
    }

    /// Reverse this move on a board that is exactly in its post-move state.
    pub fn undo(&self, board: &mut Board) {
        match self {
            MoveKind::Draw { cards, .. } => {
                for _ in cards.iter() {
                    if let Some(mut card) = board.waste.pop() {
                        card.set_face_up(false);
                        board.stock.push(card);
                    }
                }
            }
            MoveKind::Recycle { waste } => {
                // Only the recycled cards come back off the stock.
                board.stock.take_top(waste.len());
                board.waste.clear();
                board.waste.extend(waste.iter().copied());
            }
            MoveKind::Transfer {
                from,
                to,
                cards,
                flipped,
            } => {
                let run = match board.pile_mut(*to) {
                    Some(dst) => dst.take_top(cards.len()),
                    None => return,
                };
                debug_assert_eq!(run.len(), cards.len());
                if let Some(src) = board.pile_mut(from.pile) {
                    if flipped.is_some() {
                        if let Some(top) = src.top_mut() {
                            debug_assert_eq!(Some(top.id()), flipped.map(Card::id));
                            top.set_face_up(false);
                        }
                    }
                    src.extend(run);
                }
            }
        }
    }

    /// Re-apply this move on a board that is exactly in its pre-move state.
    pub fn redo(&self, board: &mut Board) {
        match self {
            MoveKind::Draw { cards, .. } => {
                for _ in cards.iter() {
                    if let Some(mut card) = board.stock.pop() {
                        card.set_face_up(true);
                        board.waste.push(card);
                    }
                }
            }
            MoveKind::Recycle { .. } => turn_waste_over(board),
            MoveKind::Transfer { from, to, .. } => {
                if let Some((run, _)) = lift_run(board, *from) {
                    if let Some(dst) = board.pile_mut(*to) {
                        dst.extend(run);
                    }
                }
            }
        }
    }

    /// Short human-readable description, e.g. "move 7♥ from column 2 to
    /// foundation 1".
    pub fn describe(&self) -> String {
        match self {
            MoveKind::Draw { cards, .. } => match cards.len() {
                1 => "draw 1 card".to_string(),
                n => format!("draw {n} cards"),
            },
            MoveKind::Recycle { waste } => format!("recycle {} waste cards", waste.len()),
            MoveKind::Transfer {
                from, to, cards, ..
            } => match cards.as_slice() {
                [one] => format!("move {} from {} to {}", one, from.pile, to),
                [first, .., last] => {
                    format!("move {}..{} from {} to {}", first, last, from.pile, to)
                }
                [] => format!("move nothing from {} to {}", from.pile, to),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pile;
    use crate::card::Rank::*;
    use crate::card::Suit::{self, *};
    use crate::card::Rank;

    fn up(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank).turned_up()
    }

    fn down(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn draw_three_takes_what_is_left() {
        let mut board = Board::new_empty();
        board.stock = Pile::from_cards(vec![down(Hearts, Two), down(Clubs, Nine)]);

        let kind = draw(&mut board, DrawMode::Three).expect("stock not empty");
        assert!(board.stock.is_empty());
        assert_eq!(board.waste.len(), 2);
        assert!(board.waste.iter().all(|c| c.is_face_up()));
        // Nine was on top of the stock, so it was drawn first.
        assert_eq!(board.waste.cards()[0].rank(), Nine);
        assert_eq!(board.waste.top().map(Card::rank), Some(Two));

        match kind {
            MoveKind::Draw { cards, draw_mode } => {
                assert_eq!(cards.len(), 2);
                assert_eq!(draw_mode, DrawMode::Three);
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(draw(&mut board, DrawMode::Three).is_none());
    }

    #[test]
    fn recycle_restores_previous_draw_order() {
        let mut board = Board::new_empty();
        board.stock = Pile::from_cards(vec![
            down(Hearts, Two),
            down(Clubs, Nine),
            down(Spades, Four),
        ]);
        let mut first_pass = Vec::new();
        while let Some(MoveKind::Draw { cards, .. }) = draw(&mut board, DrawMode::One) {
            first_pass.extend(cards.iter().map(|c| c.id()));
        }

        recycle(&mut board).expect("waste not empty");
        assert!(board.waste.is_empty());
        assert!(board.stock.iter().all(|c| !c.is_face_up()));

        let mut second_pass = Vec::new();
        while let Some(MoveKind::Draw { cards, .. }) = draw(&mut board, DrawMode::One) {
            second_pass.extend(cards.iter().map(|c| c.id()));
        }
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn recycle_waits_for_an_empty_stock() {
        let mut board = Board::new_empty();
        board.stock = Pile::from_cards(vec![down(Hearts, Two), down(Clubs, Nine)]);
        draw(&mut board, DrawMode::One).expect("stock not empty");
        let before = board.clone();

        assert!(recycle(&mut board).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn recycle_undo_leaves_the_rest_of_the_stock_alone() {
        let mut board = Board::new_empty();
        board.waste = Pile::from_cards(vec![up(Hearts, Two), up(Clubs, Nine)]);
        let kind = recycle(&mut board).expect("waste to turn over");
        // A card that reached the stock some other way must survive undo.
        let mut cards = vec![down(Spades, Four)];
        cards.extend(board.stock.cards().iter().copied());
        board.stock = Pile::from_cards(cards);

        kind.undo(&mut board);
        assert_eq!(board.waste.len(), 2);
        assert_eq!(board.stock.len(), 1);
        assert_eq!(board.stock.top().map(Card::rank), Some(Four));
    }

    #[test]
    fn foundation_cards_cannot_hop_between_foundations() {
        let mut board = Board::new_empty();
        board.foundations[0] = Pile::from_cards(vec![up(Hearts, Ace)]);
        let before = board.clone();
        assert_eq!(
            transfer(&mut board, CardRef::new(PileRef::Foundation(0), 0), PileRef::Foundation(1), 1),
            Err(MoveError::BetweenFoundations)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn transfer_flips_uncovered_card_and_undo_hides_it_again() {
        let mut board = Board::new_empty();
        board.tableau[0] = Pile::from_cards(vec![down(Hearts, Ace), up(Clubs, Four)]);
        board.tableau[1] = Pile::from_cards(vec![up(Diamonds, Five)]);
        let before = board.clone();

        let kind = transfer(&mut board, CardRef::new(PileRef::Tableau(0), 1), PileRef::Tableau(1), 1)
            .expect("4♣ on 5♦ is legal");
        assert!(board.tableau[0].top().is_some_and(|c| c.is_face_up()));
        assert_eq!(board.tableau[1].len(), 2);
        assert_eq!(kind.score_after(0), FLIP_POINTS);

        kind.undo(&mut board);
        assert_eq!(board, before);

        kind.redo(&mut board);
        assert!(board.tableau[0].top().is_some_and(|c| c.is_face_up()));
        assert_eq!(board.tableau[1].len(), 2);
    }

    #[test]
    fn rejected_transfers_leave_the_board_alone() {
        let mut board = Board::new_empty();
        board.tableau[0] = Pile::from_cards(vec![up(Spades, Eight), up(Hearts, Seven)]);
        board.tableau[1] = Pile::from_cards(vec![up(Spades, Nine)]);
        board.waste = Pile::from_cards(vec![up(Hearts, Three)]);
        let before = board.clone();

        let from = CardRef::new(PileRef::Tableau(0), 0);
        assert!(matches!(
            transfer(&mut board, from, PileRef::Tableau(1), 2),
            Err(MoveError::IllegalPlacement { .. })
        ));
        assert_eq!(
            transfer(&mut board, from, PileRef::Tableau(1), 1),
            Err(MoveError::NotTopRun {
                pile: PileRef::Tableau(0),
                index: 0,
                count: 1,
                len: 2
            })
        );
        assert_eq!(
            transfer(&mut board, from, PileRef::Foundation(0), 2),
            Err(MoveError::FoundationTakesOneCard)
        );
        assert_eq!(
            transfer(&mut board, CardRef::new(PileRef::Waste, 0), PileRef::Waste, 1),
            Err(MoveError::SamePile(PileRef::Waste))
        );
        assert_eq!(
            transfer(&mut board, CardRef::new(PileRef::Stock, 0), PileRef::Tableau(2), 1),
            Err(MoveError::InvalidSource(PileRef::Stock))
        );
        assert_eq!(
            transfer(&mut board, from, PileRef::Tableau(9), 2),
            Err(MoveError::NoSuchPile(PileRef::Tableau(9)))
        );
        assert_eq!(
            transfer(&mut board, from, PileRef::Tableau(1), 0),
            Err(MoveError::EmptyRun)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn broken_run_is_rejected() {
        let mut board = Board::new_empty();
        board.tableau[0] = Pile::from_cards(vec![up(Spades, Eight), up(Clubs, Seven)]);
        board.tableau[1] = Pile::from_cards(vec![up(Hearts, Nine)]);
        assert_eq!(
            transfer(&mut board, CardRef::new(PileRef::Tableau(0), 0), PileRef::Tableau(1), 2),
            Err(MoveError::BrokenRun)
        );
    }

    #[test]
    fn scoring_by_destination_and_origin() {
        let from_waste = MoveKind::Transfer {
            from: CardRef::new(PileRef::Waste, 0),
            to: PileRef::Tableau(0),
            cards: vec![up(Hearts, Queen)],
            flipped: None,
        };
        assert_eq!(from_waste.score_after(7), 7 + TO_TABLEAU_POINTS);

        let between_columns = MoveKind::Transfer {
            from: CardRef::new(PileRef::Tableau(1), 3),
            to: PileRef::Tableau(0),
            cards: vec![up(Hearts, Queen), up(Spades, Jack)],
            flipped: None,
        };
        assert_eq!(between_columns.score_after(7), 7);

        let to_foundation = MoveKind::Transfer {
            from: CardRef::new(PileRef::Tableau(1), 0),
            to: PileRef::Foundation(2),
            cards: vec![up(Hearts, Ace)],
            flipped: Some(up(Clubs, Two)),
        };
        assert_eq!(to_foundation.score_after(0), FOUNDATION_POINTS + FLIP_POINTS);

        let recycle = MoveKind::Recycle { waste: vec![] };
        assert_eq!(recycle.score_after(40), 0);
        assert_eq!(recycle.score_after(140), 40);

        let draw_three = MoveKind::Draw {
            cards: vec![up(Hearts, Two)],
            draw_mode: DrawMode::Three,
        };
        assert_eq!(draw_three.score_after(10), 7);
    }

    #[test]
    fn describe_names_cards_and_piles() {
        let kind = MoveKind::Transfer {
            from: CardRef::new(PileRef::Tableau(1), 0),
            to: PileRef::Foundation(0),
            cards: vec![up(Hearts, Seven)],
            flipped: None,
        };
        assert_eq!(kind.describe(), "move 7♥ from column 2 to foundation 1");
    }
}
