//! Card, Suit, and Rank types for a standard 52-card deck.
//!
//! - `Suit` and `Rank` give the fixed 4 x 13 structure of the deck.
//! - `Card` is one physical card: immutable suit and rank, a face-up flag
//!   that flips in place, and an opaque identity that stays with the card
//!   across every move, undo and redo.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// The four suits, in the order the site assigns them to foundation slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

/// Card colour; tableau builds must alternate between the two.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Red,
    Black,
}

/// The thirteen ranks in a standard deck.
///
/// Ace is the lowest rank (discriminant 0); `number()` gives 1..=13.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King, // 12
}

/// Opaque card identity.
///
/// It has no gameplay meaning; a UI uses it to correlate a card between
/// two snapshots (animations, drag previews).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CardId(Uuid);

impl CardId {
    /// A fresh identity, unique across decks.
    pub fn fresh() -> Self {
        CardId(Uuid::new_v4())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A playing card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    suit: Suit,
    rank: Rank,
    face_up: bool,
    id: CardId,
}

impl Card {
    /// Create a new face-down card with a fresh identity.
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card {
            suit,
            rank,
            face_up: false,
            id: CardId::fresh(),
        }
    }

    /// Builder-style helper: the same card, turned face-up.
    #[inline]
    pub fn turned_up(mut self) -> Self {
        self.face_up = true;
        self
    }

    #[inline]
    pub fn suit(self) -> Suit {
        self.suit
    }

    #[inline]
    pub fn rank(self) -> Rank {
        self.rank
    }

    #[inline]
    pub fn id(self) -> CardId {
        self.id
    }

    #[inline]
    pub fn is_face_up(self) -> bool {
        self.face_up
    }

    #[inline]
    pub(crate) fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn rank_number(self) -> u8 {
        self.rank.number()
    }

    #[inline]
    pub fn color(self) -> Color {
        self.suit.color()
    }

    /// Position of this suit/rank in the fresh-deck order (0..=51).
    ///
    /// ```text
    /// index = suit as u8 * 13 + rank as u8
    /// ```
    #[inline]
    pub fn deck_index(self) -> u8 {
        self.suit as u8 * NUM_RANKS + self.rank as u8
    }

    /// Label like "A♥", "10♣", "K♠".
    pub fn label(self) -> String {
        format!("{}{}", self.rank.label(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Suit {
    /// All suits in a fixed, reproducible order.
    pub const ALL: [Suit; NUM_SUITS as usize] =
        [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Construct a suit from a small integer 0..=3.
    ///
    /// # Panics
    ///
    /// Panics if `v >= 4`.
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Suit::Hearts,
            1 => Suit::Diamonds,
            2 => Suit::Clubs,
            3 => Suit::Spades,
            _ => panic!("invalid suit: {v}"),
        }
    }

    #[inline]
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

impl Rank {
    /// All ranks in a fixed, reproducible order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Construct a rank from a small integer 0..=12.
    ///
    /// # Panics
    ///
    /// Panics if `v >= 13`.
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        Rank::ALL
            .get(v as usize)
            .copied()
            .unwrap_or_else(|| panic!("invalid rank: {v}"))
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Helper for tableau rules: can `upper` be placed on `lower`?
///
/// In Klondike, this is true if:
/// - `upper` is exactly one rank lower than `lower`, and
/// - `upper` is opposite color from `lower`.
#[inline]
pub fn is_one_lower_opposite_color(upper: Card, lower: Card) -> bool {
    upper.rank_number() + 1 == lower.rank_number() && upper.color() != lower.color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_index_covers_every_suit_and_rank_once() {
        let mut seen = [false; CARDS_PER_DECK as usize];
        for &suit in Suit::ALL.iter() {
            for &rank in Rank::ALL.iter() {
                let idx = Card::new(suit, rank).deck_index() as usize;
                assert!(!seen[idx], "duplicate deck index {idx}");
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn rank_from_u8_and_number() {
        for (i, &rank) in Rank::ALL.iter().enumerate() {
            assert_eq!(Rank::from_u8(i as u8), rank);
            assert_eq!(rank.number(), i as u8 + 1);
        }
    }

    #[test]
    fn suit_from_u8_matches_all_order() {
        for (i, &suit) in Suit::ALL.iter().enumerate() {
            assert_eq!(Suit::from_u8(i as u8), suit);
        }
    }

    #[test]
    fn card_colors_are_correct() {
        for rank in Rank::ALL.iter().copied() {
            assert_eq!(Card::new(Suit::Hearts, rank).color(), Color::Red);
            assert_eq!(Card::new(Suit::Diamonds, rank).color(), Color::Red);
            assert_eq!(Card::new(Suit::Clubs, rank).color(), Color::Black);
            assert_eq!(Card::new(Suit::Spades, rank).color(), Color::Black);
        }
    }

    #[test]
    fn labels_and_display() {
        let ah = Card::new(Suit::Hearts, Rank::Ace);
        let td = Card::new(Suit::Diamonds, Rank::Ten);
        let ks = Card::new(Suit::Spades, Rank::King);

        assert_eq!(ah.label(), "A♥");
        assert_eq!(td.label(), "10♦");
        assert_eq!(format!("{ks}"), "K♠");
    }

    #[test]
    fn fresh_cards_have_distinct_identities() {
        let a = Card::new(Suit::Clubs, Rank::Seven);
        let b = Card::new(Suit::Clubs, Rank::Seven);
        assert_ne!(a.id(), b.id());
        assert_eq!((a.suit(), a.rank()), (b.suit(), b.rank()));
        assert_ne!(a, b);
    }

    #[test]
    fn turning_up_keeps_identity() {
        let c = Card::new(Suit::Spades, Rank::Queen);
        let up = c.turned_up();
        assert!(!c.is_face_up());
        assert!(up.is_face_up());
        assert_eq!(c.id(), up.id());
    }

    #[test]
    fn klondike_run_rule_helper() {
        let eight_hearts = Card::new(Suit::Hearts, Rank::Eight);
        let seven_spades = Card::new(Suit::Spades, Rank::Seven);
        let seven_hearts = Card::new(Suit::Hearts, Rank::Seven);

        assert!(is_one_lower_opposite_color(seven_spades, eight_hearts));
        assert!(!is_one_lower_opposite_color(seven_hearts, eight_hearts));
    }
}
