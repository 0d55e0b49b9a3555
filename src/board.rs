//! Piles and the full Klondike board.
//
//! A `Pile` is an ordered run of cards stored bottom-to-top: index 0 is the
//! card resting on the table, the last element is the playable top. The
//! `Board` holds the stock, the waste, the 7 tableau columns and the 4
//! foundations; together they always hold the full 52-card deck exactly once.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{CARDS_PER_DECK, Card};

/// 64-bit FNV-1a parameters.
const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Mix a single byte into an FNV-1a hash.
#[inline]
fn fnv1a_mix_byte(mut h: u64, byte: u8) -> u64 {
    h ^= byte as u64;
    h = h.wrapping_mul(FNV_PRIME);
    h
}

/// Number of tableau columns.
pub const NUM_TABLEAU: usize = 7;
/// Number of foundation piles.
pub const NUM_FOUNDATIONS: usize = 4;

/// An ordered sequence of cards, bottom (index 0) to top (last).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Pile { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Pile { cards }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The playable top card, if any.
    #[inline]
    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    #[inline]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Number of face-up cards counted down from the top.
    pub fn face_up_len(&self) -> usize {
        self.cards.iter().rev().take_while(|c| c.is_face_up()).count()
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub(crate) fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub(crate) fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    /// Remove and return every card from `at` to the top.
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<Card> {
        self.cards.split_off(at)
    }

    /// Remove and return the top `count` cards, bottom-most first.
    pub(crate) fn take_top(&mut self, count: usize) -> Vec<Card> {
        let at = self.cards.len().saturating_sub(count);
        self.cards.split_off(at)
    }

    pub(crate) fn clear(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Card> {
        self.cards.last_mut()
    }
}

/// Names one pile on the board.
///
/// Tableau and foundation indices are 0-based internally and shown
/// 1-based to a human.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "pile", rename_all = "lowercase")]
pub enum PileRef {
    Stock,
    Waste,
    Tableau(usize),
    Foundation(usize),
}

impl fmt::Display for PileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PileRef::Stock => f.write_str("stock"),
            PileRef::Waste => f.write_str("waste"),
            PileRef::Tableau(i) => write!(f, "column {}", i + 1),
            PileRef::Foundation(i) => write!(f, "foundation {}", i + 1),
        }
    }
}

/// Names one card position: a pile plus an index counted from its bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRef {
    pub pile: PileRef,
    pub index: usize,
}

impl CardRef {
    pub fn new(pile: PileRef, index: usize) -> Self {
        CardRef { pile, index }
    }
}

/// The complete layout of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub stock: Pile,
    pub waste: Pile,
    pub tableau: [Pile; NUM_TABLEAU],
    pub foundations: [Pile; NUM_FOUNDATIONS],
}

impl Board {
    /// A board with every pile empty. Mostly useful for building test positions.
    pub fn new_empty() -> Self {
        Board::default()
    }

    /// Look up a pile; `None` when a tableau/foundation index is out of range.
    pub fn pile(&self, pile: PileRef) -> Option<&Pile> {
        match pile {
            PileRef::Stock => Some(&self.stock),
            PileRef::Waste => Some(&self.waste),
            PileRef::Tableau(i) => self.tableau.get(i),
            PileRef::Foundation(i) => self.foundations.get(i),
        }
    }

    pub(crate) fn pile_mut(&mut self, pile: PileRef) -> Option<&mut Pile> {
        match pile {
            PileRef::Stock => Some(&mut self.stock),
            PileRef::Waste => Some(&mut self.waste),
            PileRef::Tableau(i) => self.tableau.get_mut(i),
            PileRef::Foundation(i) => self.foundations.get_mut(i),
        }
    }

    /// Every card on the board, pile by pile.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.stock
            .iter()
            .chain(self.waste.iter())
            .chain(self.tableau.iter().flat_map(Pile::iter))
            .chain(self.foundations.iter().flat_map(Pile::iter))
    }

    /// True if no tableau column holds a face-down card.
    pub fn all_tableau_face_up(&self) -> bool {
        self.tableau
            .iter()
            .all(|pile| pile.iter().all(|c| c.is_face_up()))
    }

    /// True if the board holds each of the 52 suit/rank pairs exactly once,
    /// under 52 distinct identities.
    pub fn is_complete_deck(&self) -> bool {
        let mut seen = [false; CARDS_PER_DECK as usize];
        let mut ids = std::collections::HashSet::new();
        let mut count = 0usize;
        for card in self.all_cards() {
            let idx = card.deck_index() as usize;
            if seen[idx] || !ids.insert(card.id()) {
                return false;
            }
            seen[idx] = true;
            count += 1;
        }
        count == CARDS_PER_DECK as usize
    }

    /// A 64-bit hash of the position: every pile's cards in order, with
    /// their face, but not their identities. Two boards that look the same
    /// to a player hash the same.
    pub fn fingerprint(&self) -> u64 {
        fn mix_pile(mut h: u64, tag: u8, pile: &Pile) -> u64 {
            h = fnv1a_mix_byte(h, tag);
            h = fnv1a_mix_byte(h, pile.len() as u8);
            for card in pile.iter() {
                let face = if card.is_face_up() { 0x80 } else { 0 };
                h = fnv1a_mix_byte(h, card.deck_index() | face);
            }
            h
        }

        let mut h = FNV_OFFSET_BASIS;
        h = mix_pile(h, b'S', &self.stock);
        h = mix_pile(h, b'W', &self.waste);
        for pile in &self.foundations {
            h = mix_pile(h, 0xF0, pile);
        }
        for pile in &self.tableau {
            h = mix_pile(h, 0xC0, pile);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    #[test]
    fn pile_top_and_take_top() {
        let mut pile = Pile::from_cards(vec![
            Card::new(Suit::Spades, Rank::King),
            Card::new(Suit::Hearts, Rank::Queen).turned_up(),
            Card::new(Suit::Clubs, Rank::Jack).turned_up(),
        ]);
        assert_eq!(pile.top().map(Card::rank), Some(Rank::Jack));
        assert_eq!(pile.face_up_len(), 2);

        let taken = pile.take_top(2);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].rank(), Rank::Queen);
        assert_eq!(pile.len(), 1);
    }

    #[test]
    fn pile_lookup_rejects_out_of_range_indices() {
        let board = Board::new_empty();
        assert!(board.pile(PileRef::Tableau(6)).is_some());
        assert!(board.pile(PileRef::Tableau(7)).is_none());
        assert!(board.pile(PileRef::Foundation(4)).is_none());
    }

    #[test]
    fn duplicate_cards_fail_the_deck_check() {
        let mut board = Board::new_empty();
        for &suit in Suit::ALL.iter() {
            for &rank in Rank::ALL.iter() {
                board.stock.push(Card::new(suit, rank));
            }
        }
        assert!(board.is_complete_deck());

        let dup = board.stock.top().expect("stock is full");
        board.waste.push(dup);
        assert!(!board.is_complete_deck());
    }

    #[test]
    fn fingerprint_ignores_identity_but_not_face() {
        let mut a = Board::new_empty();
        a.tableau[2] = Pile::from_cards(vec![Card::new(Suit::Hearts, Rank::Five).turned_up()]);
        let mut b = Board::new_empty();
        b.tableau[2] = Pile::from_cards(vec![Card::new(Suit::Hearts, Rank::Five).turned_up()]);
        assert_ne!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.tableau[2] = Pile::from_cards(vec![Card::new(Suit::Hearts, Rank::Five)]);
        assert_ne!(a.fingerprint(), b.fingerprint());

        let mut c = Board::new_empty();
        c.tableau[3] = a.tableau[2].clone();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn pile_refs_display_one_based() {
        assert_eq!(PileRef::Tableau(0).to_string(), "column 1");
        assert_eq!(PileRef::Foundation(3).to_string(), "foundation 4");
        assert_eq!(PileRef::Waste.to_string(), "waste");
    }
}
