use anyhow::{Context, Result};
use smallvec::SmallVec;

use crate::card::{self, Card, MAX_CARD, MAX_RANK};

pub const TOTAL_FOUNDATIONS: usize = 4;
pub const TOTAL_TABLEAUS: usize = 7;
pub const TALON_SIZE: usize = 24;

const FOUNDATION_SIZE: usize = MAX_RANK as usize;
const TABLEAU_SIZE: usize = 19;

/// One of the seven main piles: a face-down prefix under a face-up suffix.
///
/// Visibility lives here rather than on the cards, so a card moving between
/// containers can never smuggle a stale flag along.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tableau {
    pub cards: SmallVec<[Card; TABLEAU_SIZE]>,
    pub face_up_count: usize,
}

impl Tableau {
    pub fn new(cards: Vec<Card>, face_up_count: usize) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            face_up_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn face_down_count(&self) -> usize {
        self.cards.len() - self.face_up_count
    }

    /// Whether the card at `index` (counted from the bottom) lies face up.
    pub fn is_face_up(&self, index: usize) -> bool {
        index >= self.face_down_count()
    }

    pub fn push_face_up(&mut self, card: Card) {
        self.face_up_count += 1;
        self.cards.push(card);
    }

    pub fn extend_face_up<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        for card in cards {
            self.push_face_up(card);
        }
    }

    pub(crate) fn pop_unchecked(&mut self) -> Card {
        let card = self.cards.pop().expect("pop on an empty tableau");
        self.face_up_count = self.face_up_count.saturating_sub(1);
        card
    }

    pub(crate) fn drain_unchecked(&mut self, count: usize) -> Vec<Card> {
        let at = self.cards.len() - count;
        let cards = self.cards.drain(at..).collect();
        self.face_up_count = self.face_up_count.saturating_sub(count);
        cards
    }

    /// Turns the top card face up if the pile has one and it lies face down.
    /// Returns whether a flip happened.
    pub(crate) fn flip_top_if_hidden(&mut self) -> bool {
        if !self.cards.is_empty() && self.face_up_count == 0 {
            self.face_up_count = 1;
            true
        } else {
            false
        }
    }

    /// Reverses [`Tableau::flip_top_if_hidden`]: turns the lone face-up top
    /// card face down again.
    pub(crate) fn hide_top(&mut self) {
        debug_assert_eq!(self.face_up_count, 1);
        self.face_up_count = 0;
    }
}

/// The full table: stock, waste, four foundations and seven tableaus.
///
/// Stock cards are implicitly face down and waste cards face up; in every
/// pile the top card is the last element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub stock: SmallVec<[Card; TALON_SIZE]>,
    pub waste: SmallVec<[Card; TALON_SIZE]>,
    pub foundations: [SmallVec<[Card; FOUNDATION_SIZE]>; TOTAL_FOUNDATIONS],
    pub tableaus: [Tableau; TOTAL_TABLEAUS],
}

impl Board {
    /// Triangular deal: tableau `i` takes `i + 1` cards in deck order with a
    /// single face-up card on top; the remaining cards form the stock.
    pub fn deal(deck: &[Card]) -> Self {
        debug_assert_eq!(deck.len(), MAX_CARD as usize);
        let mut board = Board::default();
        let mut m = 0;
        for (i, tableau) in board.tableaus.iter_mut().enumerate() {
            for _ in 0..=i {
                tableau.cards.push(deck[m]);
                m += 1;
            }
            tableau.face_up_count = 1;
        }
        board.stock.extend_from_slice(&deck[m..]);
        board
    }

    /// Total number of cards on the foundations.
    pub fn score(&self) -> usize {
        self.foundations.iter().map(|f| f.len()).sum()
    }

    pub(crate) fn draw_unchecked(&mut self) {
        let card = self.stock.pop().expect("draw from an empty stock");
        self.waste.push(card);
    }

    pub(crate) fn undo_draw_unchecked(&mut self) {
        let card = self.waste.pop().expect("no drawn card to return");
        self.stock.push(card);
    }

    /// Turns the waste over to refill the stock: the waste's top ends up at
    /// the stock's bottom, the waste's bottom becomes the next card drawn.
    pub(crate) fn redeal_unchecked(&mut self) {
        self.stock.extend(self.waste.drain(..).rev());
    }

    pub(crate) fn undo_redeal_unchecked(&mut self) {
        self.waste.extend(self.stock.drain(..).rev());
    }

    /// Checks every structural invariant: the 52 distinct cards partitioned
    /// across the piles, foundations ascending same-suit runs from Ace, and
    /// tableau face-up suffixes descending with alternating colors.
    pub fn is_valid(&self) -> bool {
        let mut seen = [false; MAX_CARD as usize];
        let mut count = 0;
        let mut check_cards = |cards: &[Card]| -> bool {
            for &card in cards {
                let id = card.id() as usize;
                if id >= MAX_CARD as usize || seen[id] {
                    return false;
                }
                seen[id] = true;
                count += 1;
            }
            true
        };

        if !check_cards(&self.stock) {
            return false;
        }
        if !check_cards(&self.waste) {
            return false;
        }
        for foundation in &self.foundations {
            if !check_cards(foundation) {
                return false;
            }
        }
        for tableau in &self.tableaus {
            if !check_cards(&tableau.cards) {
                return false;
            }
        }
        if count != MAX_CARD as usize {
            return false;
        }

        for foundation in &self.foundations {
            for (rank, &c) in foundation.iter().enumerate() {
                if c.rank() as usize != rank || !c.is_same_suit(foundation[0]) {
                    return false;
                }
            }
        }
        for tableau in &self.tableaus {
            if tableau.face_up_count > tableau.len() {
                return false;
            }
            if !tableau.is_empty() && tableau.face_up_count == 0 {
                return false;
            }
            let face_up = &tableau.cards[tableau.face_down_count()..];
            for pair in face_up.windows(2) {
                if !card::can_stack_descending(pair[0], pair[1]) {
                    return false;
                }
            }
        }
        true
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut board: Self = Default::default();

        for line in content
            .split('\n')
            .map(|v| v.trim())
            .filter(|l| !l.is_empty())
        {
            let line_context = || format!("Failed to parse at '{line}'");
            if let Some(rest) = line.strip_prefix("Stock:") {
                for card in Self::parse_cards(rest.trim()).with_context(line_context)? {
                    board.stock.push(card);
                }
            } else if let Some(rest) = line.strip_prefix("Waste:") {
                for card in Self::parse_cards(rest.trim()).with_context(line_context)? {
                    board.waste.push(card);
                }
            } else if let Some(rest) = line.strip_prefix("Foundation") {
                let mut parts = rest.splitn(2, ':');
                let idx = parts
                    .next()
                    .unwrap_or("")
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|idx| (1..=TOTAL_FOUNDATIONS).contains(idx))
                    .context("Invalid foundation index")
                    .with_context(line_context)?
                    - 1;
                let cards =
                    Self::parse_cards(parts.next().unwrap_or("").trim()).with_context(line_context)?;
                // A lone top card stands for its whole run.
                match cards.as_slice() {
                    [] => {}
                    [top] => {
                        for rank in 0..=top.rank() {
                            board.foundations[idx].push(Card::new_with_rank_suit(rank, top.suit()));
                        }
                    }
                    run => board.foundations[idx].extend_from_slice(run),
                }
            } else if let Some(rest) = line.strip_prefix("Tableau") {
                let mut parts = rest.splitn(2, ':');
                let idx = parts
                    .next()
                    .unwrap_or("")
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|idx| (1..=TOTAL_TABLEAUS).contains(idx))
                    .context("Invalid tableau index")
                    .with_context(line_context)?
                    - 1;
                let cards_str = parts.next().unwrap_or("").trim();
                let (face_down, face_up) = if let Some(sep) = cards_str.find('|') {
                    let (b, a) = cards_str.split_at(sep);
                    (b, &a[1..])
                } else {
                    (cards_str, "")
                };
                let face_up = Self::parse_cards(face_up.trim()).with_context(line_context)?;
                board.tableaus[idx].face_up_count = face_up.len();
                for c in Self::parse_cards(face_down.trim())
                    .with_context(line_context)?
                    .into_iter()
                    .chain(face_up)
                {
                    board.tableaus[idx].cards.push(c);
                }
            }
        }

        Ok(board)
    }

    fn parse_cards(s: &str) -> Result<Vec<Card>> {
        let mut cards = Vec::new();
        let mut chars = s.chars().filter(|c| !c.is_whitespace());
        while let Some(rank) = chars.next() {
            let Some(suit) = chars.next() else { break };
            cards.push(Card::parse(rank, suit)?);
        }
        Ok(cards)
    }

    pub fn to_pretty_string(&self) -> String {
        let mut lines = Vec::new();

        if !self.stock.is_empty() {
            let mut line = String::from("Stock: ");
            for card in &self.stock {
                line.push_str(&card.to_pretty_string());
            }
            lines.push(line);
        }

        if !self.waste.is_empty() {
            let mut line = String::from("Waste: ");
            for card in &self.waste {
                line.push_str(&card.to_pretty_string());
            }
            lines.push(line);
        }

        for (i, foundation) in self.foundations.iter().enumerate() {
            if foundation.is_empty() {
                continue;
            }
            let mut line = format!("Foundation{}: ", i + 1);
            for card in foundation {
                line.push_str(&card.to_pretty_string());
            }
            lines.push(line);
        }

        for (i, tableau) in self.tableaus.iter().enumerate() {
            if tableau.is_empty() {
                continue;
            }
            let mut line = format!("Tableau{}: ", i + 1);
            for (j, card) in tableau.cards.iter().enumerate() {
                if j == tableau.face_down_count() && tableau.face_up_count > 0 {
                    line.push('|');
                }
                line.push_str(&card.to_pretty_string());
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}
