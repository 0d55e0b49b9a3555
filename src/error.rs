//! Error types.
//!
//! Illegal moves are ordinary, recoverable outcomes: the engine reports why
//! it refused and leaves the session untouched. Nothing in the core is fatal.

use thiserror::Error;

use crate::board::PileRef;

/// Why `move_cards` refused a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cards cannot be taken from the {0}")]
    InvalidSource(PileRef),
    #[error("cards cannot be placed on the {0}")]
    InvalidDestination(PileRef),
    #[error("source and destination are the same pile ({0})")]
    SamePile(PileRef),
    #[error("no such pile: {0}")]
    NoSuchPile(PileRef),
    #[error("a move must carry at least one card")]
    EmptyRun,
    #[error("{count} card(s) from index {index} do not end at the top of the {pile} ({len} cards)")]
    NotTopRun {
        pile: PileRef,
        index: usize,
        count: usize,
        len: usize,
    },
    #[error("only one card at a time may leave the {0}")]
    SingleCardOnly(PileRef),
    #[error("only one card at a time may go onto a foundation")]
    FoundationTakesOneCard,
    #[error("cards cannot move from one foundation to another")]
    BetweenFoundations,
    #[error("the moving run contains a face-down card")]
    FaceDown,
    #[error("the moving cards are not a descending, alternating-colour run")]
    BrokenRun,
    #[error("{card} cannot be placed on the {pile}")]
    IllegalPlacement { card: String, pile: PileRef },
}

/// Why a deal code could not be turned back into a deck order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealCodeError {
    #[error("deal code is empty")]
    Empty,
    #[error("deal code must be a decimal number: {0:?}")]
    NotDecimal(String),
    #[error("deal code is larger than the number of possible deals")]
    OutOfRange,
}

/// Failures writing persisted settings or statistics.
///
/// Reads never fail: unreadable data falls back to defaults.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
