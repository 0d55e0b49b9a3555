//! Table geometry and pointer hit-testing.
//!
//! Everything is measured in CSS-style pixels for a table `width` wide. The
//! design size is 1100 units: cards are 110×158 at scale 1 and every gap
//! scales with them. The stock and waste sit at the left of the top row,
//! the four foundations start in the fourth column, and the seven tableau
//! columns fan downward below them.

use serde::Serialize;

use crate::board::{Board, NUM_FOUNDATIONS, NUM_TABLEAU};

const DESIGN_WIDTH: f64 = 1100.0;
const CARD_WIDTH: f64 = 110.0;
const CARD_HEIGHT: f64 = 158.0;
const PADDING: f64 = 8.0;
const TOP_ROW_Y: f64 = 12.0;
const ROW_GAP: f64 = 20.0;
const FAN_OFFSET: f64 = 28.0;

/// What lies under a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HitTarget {
    /// The stock, while it still holds cards.
    Stock,
    /// The empty stock slot while the waste can be turned over.
    Recycle,
    /// The waste top card.
    Waste { index: usize },
    Foundation { pile: usize },
    /// The topmost tableau card under the pointer.
    Tableau { pile: usize, index: usize },
}

/// Where a dragged run would be dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DropTarget {
    Foundation { pile: usize },
    Tableau { pile: usize },
}

/// Card positions for one table width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub scale: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub spacing: f64,
    pub stock_x: f64,
    pub waste_x: f64,
    pub foundation_x: f64,
    pub top_row_y: f64,
    pub tableau_x: f64,
    pub tableau_y: f64,
    pub fan_offset: f64,
}

impl Layout {
    pub fn new(width: f64) -> Self {
        let scale = width / DESIGN_WIDTH;
        let card_width = CARD_WIDTH * scale;
        let card_height = CARD_HEIGHT * scale;
        let padding = PADDING * scale;
        let spacing = card_width + padding;
        let start_x = (width - (spacing * NUM_TABLEAU as f64 - padding)) / 2.0;
        let top_row_y = TOP_ROW_Y * scale;

        Layout {
            scale,
            card_width,
            card_height,
            spacing,
            stock_x: start_x,
            waste_x: start_x + spacing,
            foundation_x: start_x + spacing * 3.0,
            top_row_y,
            tableau_x: start_x,
            tableau_y: top_row_y + card_height + ROW_GAP * scale,
            fan_offset: FAN_OFFSET * scale,
        }
    }

    /// Table height for this width (4:3).
    pub fn height(&self) -> f64 {
        DESIGN_WIDTH * self.scale * 0.75
    }

    /// Top-left corner of a tableau card.
    pub fn tableau_card_origin(&self, pile: usize, index: usize) -> (f64, f64) {
        (
            self.tableau_x + pile as f64 * self.spacing,
            self.tableau_y + index as f64 * self.fan_offset,
        )
    }

    fn foundation_origin(&self, pile: usize) -> (f64, f64) {
        (self.foundation_x + pile as f64 * self.spacing, self.top_row_y)
    }

    fn in_card(&self, x: f64, y: f64, (bx, by): (f64, f64)) -> bool {
        in_bounds(x, y, bx, by, self.card_width, self.card_height)
    }

    /// What a click at `(x, y)` lands on, if anything.
    ///
    /// Checked in order: stock slot, waste, foundations, then each tableau
    /// column from its top card down so overlapping cards resolve to the
    /// one drawn last.
    pub fn card_at(&self, board: &Board, x: f64, y: f64) -> Option<HitTarget> {
        if self.in_card(x, y, (self.stock_x, self.top_row_y)) {
            if !board.stock.is_empty() {
                return Some(HitTarget::Stock);
            }
            if !board.waste.is_empty() {
                return Some(HitTarget::Recycle);
            }
        }

        if self.in_card(x, y, (self.waste_x, self.top_row_y)) && !board.waste.is_empty() {
            return Some(HitTarget::Waste {
                index: board.waste.len() - 1,
            });
        }

        if let Some(pile) = self.foundation_at(x, y) {
            return Some(HitTarget::Foundation { pile });
        }

        for (pile, cards) in board.tableau.iter().enumerate() {
            for index in (0..cards.len()).rev() {
                if self.in_card(x, y, self.tableau_card_origin(pile, index)) {
                    return Some(HitTarget::Tableau { pile, index });
                }
            }
        }
        None
    }

    /// Which pile a run dropped at `(x, y)` would go to.
    ///
    /// A tableau column catches drops anywhere along its fanned length,
    /// or over a single card slot when empty.
    pub fn drop_target(&self, board: &Board, x: f64, y: f64) -> Option<DropTarget> {
        if let Some(pile) = self.foundation_at(x, y) {
            return Some(DropTarget::Foundation { pile });
        }

        board.tableau.iter().enumerate().find_map(|(pile, cards)| {
            let (tx, _) = self.tableau_card_origin(pile, 0);
            let extent = cards.len() as f64 * self.fan_offset + self.card_height;
            in_bounds(x, y, tx, self.tableau_y, self.card_width, extent)
                .then_some(DropTarget::Tableau { pile })
        })
    }

    fn foundation_at(&self, x: f64, y: f64) -> Option<usize> {
        (0..NUM_FOUNDATIONS).find(|&i| self.in_card(x, y, self.foundation_origin(i)))
    }
}

/// Inclusive rectangle test.
fn in_bounds(x: f64, y: f64, bx: f64, by: f64, bw: f64, bh: f64) -> bool {
    x >= bx && x <= bx + bw && y >= by && y <= by + bh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pile;
    use crate::card::Rank::{Eight, Four, Seven, Two};
    use crate::card::Suit::{Clubs, Hearts};
    use crate::card::{Card, Rank, Suit};

    fn up(suit: Suit, rank: Rank) -> Card {
        Card::new(suit, rank).turned_up()
    }

    #[test]
    fn design_width_geometry() {
        let layout = Layout::new(1100.0);
        assert_eq!(layout.scale, 1.0);
        assert_eq!(layout.spacing, 118.0);
        // 7 * 118 - 8 = 818 wide, centred in 1100.
        assert_eq!(layout.stock_x, 141.0);
        assert_eq!(layout.waste_x, 259.0);
        assert_eq!(layout.foundation_x, 495.0);
        assert_eq!(layout.tableau_y, 12.0 + 158.0 + 20.0);
        assert_eq!(layout.height(), 825.0);
    }

    #[test]
    fn stock_slot_is_stock_then_recycle_then_nothing() {
        let layout = Layout::new(1100.0);
        let (x, y) = (layout.stock_x + 5.0, layout.top_row_y + 5.0);
        let mut board = Board::new_empty();
        assert_eq!(layout.card_at(&board, x, y), None);

        board.waste = Pile::from_cards(vec![up(Hearts, Two), up(Clubs, Four)]);
        assert_eq!(layout.card_at(&board, x, y), Some(HitTarget::Recycle));

        board.stock = Pile::from_cards(vec![Card::new(Suit::Spades, Rank::Nine)]);
        assert_eq!(layout.card_at(&board, x, y), Some(HitTarget::Stock));

        let waste_hit = layout.card_at(&board, layout.waste_x + 50.0, y);
        assert_eq!(waste_hit, Some(HitTarget::Waste { index: 1 }));
    }

    #[test]
    fn foundations_are_hit_even_when_empty() {
        let layout = Layout::new(550.0);
        let board = Board::new_empty();
        let x = layout.foundation_x + layout.spacing * 2.0 + 1.0;
        let y = layout.top_row_y + 1.0;
        assert_eq!(layout.card_at(&board, x, y), Some(HitTarget::Foundation { pile: 2 }));
        assert_eq!(layout.drop_target(&board, x, y), Some(DropTarget::Foundation { pile: 2 }));
    }

    #[test]
    fn overlapping_tableau_cards_resolve_to_the_topmost() {
        let layout = Layout::new(1100.0);
        let mut board = Board::new_empty();
        board.tableau[1] = Pile::from_cards(vec![
            Card::new(Suit::Spades, Rank::Nine),
            up(Hearts, Eight),
            up(Clubs, Seven),
        ]);
        let (x, y) = layout.tableau_card_origin(1, 1);

        // The strip of card 1 not covered by card 2.
        assert_eq!(
            layout.card_at(&board, x + 10.0, y + 10.0),
            Some(HitTarget::Tableau { pile: 1, index: 1 })
        );
        // Lower down, card 2 lies on top.
        assert_eq!(
            layout.card_at(&board, x + 10.0, y + layout.fan_offset + 10.0),
            Some(HitTarget::Tableau { pile: 1, index: 2 })
        );
        // Empty columns hold nothing to pick up but still take drops.
        let (ex, ey) = layout.tableau_card_origin(4, 0);
        assert_eq!(layout.card_at(&board, ex + 1.0, ey + 1.0), None);
        assert_eq!(
            layout.drop_target(&board, ex + 1.0, ey + 1.0),
            Some(DropTarget::Tableau { pile: 4 })
        );
    }

    #[test]
    fn drop_zone_covers_the_fanned_column() {
        let layout = Layout::new(1100.0);
        let mut board = Board::new_empty();
        board.tableau[0] = Pile::from_cards(vec![up(Hearts, Eight)]);
        let (x, _) = layout.tableau_card_origin(0, 0);
        let bottom = layout.tableau_y + layout.fan_offset + layout.card_height;
        assert_eq!(
            layout.drop_target(&board, x + 1.0, bottom - 1.0),
            Some(DropTarget::Tableau { pile: 0 })
        );
        assert_eq!(layout.drop_target(&board, x + 1.0, bottom + 1.0), None);
    }
}
