//! Human-readable rendering of a Klondike board.
//!
//! Face-down cards are shown as "XX" and face-up cards by their label
//! ("A♥", "10♣", "K♠"). The CLI prints these; tests use them to eyeball
//! positions with `-- --nocapture`.

use crate::board::{Board, NUM_TABLEAU, Pile};
use crate::card::Card;

/// Text for one card as a player would see it.
pub fn format_card_visible(card: Card) -> String {
    if card.is_face_up() {
        card.label()
    } else {
        "XX".to_string()
    }
}

fn format_top(pile: &Pile) -> String {
    match pile.top() {
        Some(card) => format!("[{}]", format_card_visible(card)),
        None => "[  ]".to_string(),
    }
}

/// The foundation row, top card of each pile: `Foundations: [A♥] [  ] ...`.
pub fn render_foundations(board: &Board) -> String {
    let tops: Vec<String> = board.foundations.iter().map(format_top).collect();
    format!("Foundations: {}", tops.join(" "))
}

/// Stock count plus waste top and count on one line.
///
/// The stock order is never revealed.
pub fn render_stock_and_waste(board: &Board) -> String {
    let stock = match board.stock.len() {
        0 => "Stock: [empty]".to_string(),
        n => format!("Stock: [{n} cards]"),
    };
    let waste = match board.waste.top() {
        None => "Waste: [empty]".to_string(),
        Some(top) => format!(
            "Waste: [{}] ({} cards)",
            format_card_visible(top),
            board.waste.len()
        ),
    };
    format!("{stock}    {waste}")
}

/// All tableau columns, top-justified, one four-character cell per column.
///
/// Row 0 is the card resting on the table; the last row of each column is
/// its playable card.
pub fn render_columns(board: &Board) -> String {
    let mut s = String::from("Columns:\n      ");
    for col in 1..=NUM_TABLEAU {
        s.push_str(&format!(" C{col} "));
    }
    s.push('\n');

    let max_height = board.tableau.iter().map(Pile::len).max().unwrap_or(0);
    for row in 0..max_height {
        s.push_str("      ");
        for pile in &board.tableau {
            match pile.get(row) {
                Some(card) => s.push_str(&format!("{:>3} ", format_card_visible(card))),
                None => s.push_str("    "),
            }
        }
        s.push('\n');
    }
    s
}

/// Foundations, stock/waste and columns.
pub fn render_board(board: &Board) -> String {
    format!(
        "{}\n{}\n\n{}",
        render_foundations(board),
        render_stock_and_waste(board),
        render_columns(board)
    )
}

/// The playable card of each column: `C1: K♠  C2: --  C3: XX ...`.
pub fn render_playing_edge(board: &Board) -> String {
    let cells: Vec<String> = board
        .tableau
        .iter()
        .enumerate()
        .map(|(i, pile)| {
            let top = pile
                .top()
                .map(format_card_visible)
                .unwrap_or_else(|| "--".to_string());
            format!("C{}: {:>3}", i + 1, top)
        })
        .collect();
    cells.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};
    use crate::deck::{deal_initial_tableau, shuffled_deck_from_seed};

    /// Split rendered column rows back into cells, counting characters
    /// rather than bytes because suit symbols are multi-byte.
    fn parse_rendered_column_grid(rendered: &str) -> Vec<Vec<String>> {
        rendered
            .lines()
            .skip(2)
            .map(|line| {
                let chars: Vec<char> = line.chars().skip(6).collect();
                (0..NUM_TABLEAU)
                    .map(|col| {
                        let start = (4 * col).min(chars.len());
                        let end = (start + 4).min(chars.len());
                        chars[start..end].iter().collect::<String>().trim().to_string()
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn rendered_columns_match_the_board() {
        let board = deal_initial_tableau(shuffled_deck_from_seed(123_456_789));
        let rendered = render_columns(&board);
        println!("{rendered}");

        let grid = parse_rendered_column_grid(&rendered);
        assert_eq!(grid.len(), NUM_TABLEAU);
        for (col, pile) in board.tableau.iter().enumerate() {
            for row in 0..NUM_TABLEAU {
                let expected = pile.get(row).map(format_card_visible).unwrap_or_default();
                assert_eq!(grid[row][col], expected, "row {row} col {col}");
            }
        }
        // Only the last card of each column is visible after the deal.
        assert_ne!(grid[0][0], "XX");
        assert_eq!(grid[0][1], "XX");
    }

    #[test]
    fn stock_and_waste_line() {
        let mut board = Board::new_empty();
        let line = render_stock_and_waste(&board);
        assert!(line.contains("Stock: [empty]"));
        assert!(line.contains("Waste: [empty]"));

        board.stock.push(Card::new(Suit::Hearts, Rank::Ace));
        board.stock.push(Card::new(Suit::Clubs, Rank::Two));
        board.waste.push(Card::new(Suit::Spades, Rank::Three).turned_up());
        board.waste.push(Card::new(Suit::Diamonds, Rank::Ten).turned_up());
        let line = render_stock_and_waste(&board);
        assert!(line.contains("Stock: [2 cards]"));
        assert!(line.contains("Waste: [10♦] (2 cards)"));
    }

    #[test]
    fn foundations_show_top_cards_only() {
        let mut board = Board::new_empty();
        board.foundations[1] = Pile::from_cards(vec![
            Card::new(Suit::Clubs, Rank::Ace).turned_up(),
            Card::new(Suit::Clubs, Rank::Two).turned_up(),
        ]);
        assert_eq!(
            render_foundations(&board),
            "Foundations: [  ] [2♣] [  ] [  ]"
        );
    }

    #[test]
    fn playing_edge_marks_empty_and_hidden_columns() {
        let mut board = Board::new_empty();
        board.tableau[0] = Pile::from_cards(vec![Card::new(Suit::Spades, Rank::King).turned_up()]);
        board.tableau[2] = Pile::from_cards(vec![Card::new(Suit::Hearts, Rank::Four)]);
        let edge = render_playing_edge(&board);
        assert!(edge.starts_with("C1:  K♠  C2:  --  C3:  XX"));
    }
}
