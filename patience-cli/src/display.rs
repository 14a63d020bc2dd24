use patience_engine::{Board, Card};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const FACE_DOWN: &str = "??";

fn paint(card: Card) -> String {
    let text = card.to_pretty_string();
    if card.is_red() {
        format!("{RED}{text}{RESET}")
    } else {
        text
    }
}

/// Renders the board for the player, masking face-down cards.
pub fn render(board: &Board) -> String {
    let mut out = String::new();

    out.push_str(&format!("Stockpile: {} cards\n", board.stock.len()));

    out.push_str("Waste: ");
    match board.waste.last() {
        Some(&card) => {
            out.push_str(&format!("{} ({} cards)\n", paint(card), board.waste.len()))
        }
        None => out.push_str("empty\n"),
    }

    out.push_str("Foundations:");
    for foundation in &board.foundations {
        match foundation.last() {
            Some(&card) => out.push_str(&format!(" [{}]", paint(card))),
            None => out.push_str(" [--]"),
        }
    }
    out.push('\n');

    for (i, tableau) in board.tableaus.iter().enumerate() {
        out.push_str(&format!("Pile {}:", i + 1));
        for (j, &card) in tableau.cards.iter().enumerate() {
            out.push(' ');
            if tableau.is_face_up(j) {
                out.push_str(&paint(card));
            } else {
                out.push_str(FACE_DOWN);
            }
        }
        out.push('\n');
    }

    out
}
