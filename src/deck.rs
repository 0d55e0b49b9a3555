//! Building, shuffling, dealing and naming decks.
//!
//! A fresh deck is suit-major, rank-minor in `Suit::ALL` / `Rank::ALL`
//! order. Shuffling is an unbiased Fisher-Yates over any `rand::Rng`;
//! dealing lays out the 28-card triangular tableau and leaves the other
//! 24 cards, untouched, as the stock.
//!
//! Every dealt order also has a *deal code*: its lexicographic permutation
//! rank in `[0, 52!)`, written as a decimal number, so a deal can be shared
//! and replayed.

use core::fmt;
use core::str::FromStr;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, NUM_TABLEAU, Pile};
use crate::card::{CARDS_PER_DECK, Card, NUM_RANKS, Rank, Suit};
use crate::error::DealCodeError;

/// Local convenience: our deck length as `usize`.
pub const DECK_LEN: usize = CARDS_PER_DECK as usize;

/// Cards consumed by the initial tableau: 1 + 2 + ... + 7.
pub const TABLEAU_DEAL_LEN: usize = NUM_TABLEAU * (NUM_TABLEAU + 1) / 2;

/// A full deck in dealing order (index 0 is dealt first).
pub type Deck = [Card; DECK_LEN];

/// Generate a standard 52-card deck in a fixed order, every card face-down
/// and carrying a fresh identity.
pub fn create_deck() -> Deck {
    std::array::from_fn(|i| card_for_deck_index(i as u8))
}

fn card_for_deck_index(index: u8) -> Card {
    Card::new(
        Suit::from_u8(index / NUM_RANKS),
        Rank::from_u8(index % NUM_RANKS),
    )
}

/// Shuffle in place: walk from the last index down to 1, swapping each slot
/// with a uniformly chosen index in `[0, i]`.
pub fn shuffle<R: Rng + ?Sized>(deck: &mut [Card], rng: &mut R) {
    for i in (1..deck.len()).rev() {
        let j = rng.gen_range(0..=i);
        deck.swap(i, j);
    }
}

/// A freshly created deck shuffled with the given generator.
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Deck {
    let mut deck = create_deck();
    shuffle(&mut deck, rng);
    deck
}

/// Return a deterministically shuffled deck for a 64-bit seed.
///
/// The same seed always yields the same suit/rank order (identities are
/// still fresh).
pub fn shuffled_deck_from_seed(seed: u64) -> Deck {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    shuffled_deck(&mut rng)
}

/// Deal the initial layout from a shuffled deck.
///
/// Column `i` (0-based) receives `i + 1` cards in deck order; only the last
/// card dealt to each column is face-up. The remaining 24 cards become the
/// stock in their existing order, face-down; the last deck card is the
/// stock top. Waste and foundations start empty.
pub fn deal_initial_tableau(deck: Deck) -> Board {
    let mut board = Board::new_empty();
    let mut cards = deck.into_iter();

    for (col, pile) in board.tableau.iter_mut().enumerate() {
        for row in 0..=col {
            // The iterator holds 52 cards and the triangle consumes 28.
            let Some(mut card) = cards.next() else { break };
            card.set_face_up(row == col);
            pile.push(card);
        }
    }

    board.stock = Pile::from_cards(
        cards
            .map(|mut card| {
                card.set_face_up(false);
                card
            })
            .collect(),
    );
    board
}

/// The permutation rank of a 52-card order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DealCode(BigUint);

impl DealCode {
    /// Compute the code of a deck order (suit/rank only; face and identity
    /// are ignored).
    pub fn from_deck(deck: &Deck) -> Self {
        let mut used = [false; DECK_LEN];
        let mut code = BigUint::zero();
        for (pos, card) in deck.iter().enumerate() {
            let value = card.deck_index() as usize;
            let digit = used[..value].iter().filter(|&&u| !u).count();
            used[value] = true;
            code *= (DECK_LEN - pos) as u32;
            code += digit as u32;
        }
        DealCode(code)
    }

    /// Rebuild the deck order this code names, with fresh face-down cards.
    pub fn to_deck(&self) -> Result<Deck, DealCodeError> {
        let order = self.order()?;
        Ok(std::array::from_fn(|i| card_for_deck_index(order[i])))
    }

    /// Decode to fresh-deck indices in dealing order.
    fn order(&self) -> Result<[u8; DECK_LEN], DealCodeError> {
        let mut rest = self.0.clone();
        let mut digits = [0usize; DECK_LEN];
        for pos in (0..DECK_LEN).rev() {
            let radix = (DECK_LEN - pos) as u32;
            digits[pos] = (&rest % radix).to_usize().ok_or(DealCodeError::OutOfRange)?;
            rest /= radix;
        }
        if !rest.is_zero() {
            return Err(DealCodeError::OutOfRange);
        }

        let mut available: Vec<u8> = (0..CARDS_PER_DECK).collect();
        let mut order = [0u8; DECK_LEN];
        for (slot, &digit) in order.iter_mut().zip(digits.iter()) {
            *slot = available.remove(digit);
        }
        Ok(order)
    }
}

impl fmt::Display for DealCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for DealCode {
    type Err = DealCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | ',' | ' '))
            .collect();
        if cleaned.is_empty() {
            return Err(DealCodeError::Empty);
        }
        if !cleaned.chars().all(|c| c.is_ascii_digit()) {
            return Err(DealCodeError::NotDecimal(s.to_string()));
        }
        let n = BigUint::parse_bytes(cleaned.as_bytes(), 10)
            .ok_or_else(|| DealCodeError::NotDecimal(s.to_string()))?;
        let code = DealCode(n);
        // Reject codes at or beyond 52! up front.
        code.order()?;
        Ok(code)
    }
}
