use anyhow::{Context, Result};

pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const MAX_CARD: u8 = MAX_SUIT * MAX_RANK;

const SUITS: [char; 4] = ['♥', '♦', '♣', '♠'];
const RANKS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];

/// A playing card packed into a single id: `suit * 13 + rank`.
///
/// Rank 0 is the Ace, rank 12 the King. Suits 0 and 1 (Hearts, Diamonds)
/// are red, suits 2 and 3 (Clubs, Spades) are black. The card carries no
/// visibility flag; whether a card lies face up is owned by the pile slot
/// holding it (see [`crate::board::Tableau`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    pub fn new_with_id(id: u8) -> Self {
        debug_assert!(id < MAX_CARD);
        Self(id)
    }

    pub fn new_with_rank_suit(rank: u8, suit: u8) -> Self {
        Self(suit * MAX_RANK + rank)
    }

    pub fn parse(rank: char, suit: char) -> Result<Self> {
        let rank = RANKS
            .iter()
            .position(|&r| r == rank)
            .with_context(|| format!("Invalid rank at card {rank}{suit}"))?;
        let suit = SUITS
            .iter()
            .position(|&s| s == suit)
            .with_context(|| format!("Invalid suit at card {rank}{suit}"))?;
        Ok(Card::new_with_rank_suit(rank as u8, suit as u8))
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn rank(&self) -> u8 {
        self.0 % MAX_RANK
    }

    pub fn suit(&self) -> u8 {
        self.0 / MAX_RANK
    }

    pub fn is_ace(&self) -> bool {
        self.rank() == 0
    }

    pub fn is_king(&self) -> bool {
        self.rank() == MAX_RANK - 1
    }

    pub fn is_red(&self) -> bool {
        self.suit() < 2
    }

    pub fn is_black(&self) -> bool {
        !self.is_red()
    }

    pub fn is_same_suit(&self, other: Card) -> bool {
        self.suit() == other.suit()
    }

    pub fn is_alternate_color(&self, other: Card) -> bool {
        self.is_black() != other.is_black()
    }

    pub fn symbols(&self) -> (char, char) {
        (RANKS[self.rank() as usize], SUITS[self.suit() as usize])
    }

    pub fn to_pretty_string(&self) -> String {
        let (rank, suit) = self.symbols();
        format!("{rank}{suit}")
    }
}

/// True iff `higher` ranks exactly one above `lower`, regardless of suit.
pub fn is_in_sequence(lower: Card, higher: Card) -> bool {
    higher.rank() == lower.rank() + 1
}

/// Tableau stacking rule: `child` may go onto `parent` when the colors
/// alternate and `child` ranks one below `parent`.
pub fn can_stack_descending(parent: Card, child: Card) -> bool {
    parent.is_alternate_color(child) && is_in_sequence(child, parent)
}

/// Foundation building rule: an Ace opens an empty foundation; otherwise the
/// candidate must follow the top card in rank within the same suit.
pub fn can_extend_foundation(top: Option<Card>, candidate: Card) -> bool {
    match top {
        None => candidate.is_ace(),
        Some(top) => top.is_same_suit(candidate) && is_in_sequence(top, candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        let mut chars = s.chars();
        Card::parse(chars.next().unwrap(), chars.next().unwrap()).unwrap()
    }

    #[test]
    fn test_colors() {
        assert!(card("6♠").is_black());
        assert!(card("K♣").is_black());
        assert!(card("6♦").is_red());
        assert!(card("A♥").is_red());
        assert!(!card("6♠").is_red());
        assert!(!card("A♥").is_black());
    }

    #[test]
    fn test_alternate_color() {
        assert!(card("7♠").is_alternate_color(card("2♥")));
        assert!(!card("7♠").is_alternate_color(card("2♣")));
    }

    #[test]
    fn test_same_suit() {
        assert!(card("7♠").is_same_suit(card("2♠")));
        assert!(!card("7♠").is_same_suit(card("2♦")));
    }

    #[test]
    fn test_in_sequence_ignores_suit() {
        assert!(is_in_sequence(card("7♠"), card("8♠")));
        assert!(is_in_sequence(card("7♠"), card("8♣")));
        assert!(is_in_sequence(card("7♠"), card("8♥")));
        assert!(!is_in_sequence(card("8♠"), card("7♠")));
        assert!(!is_in_sequence(card("7♠"), card("9♣")));
    }

    #[test]
    fn test_can_stack_descending() {
        assert!(can_stack_descending(card("7♠"), card("6♦")));
        // same color
        assert!(!can_stack_descending(card("7♠"), card("6♠")));
        // out of sequence, any suit
        assert!(!can_stack_descending(card("7♠"), card("T♣")));
        assert!(!can_stack_descending(card("7♠"), card("A♥")));
        assert!(!can_stack_descending(card("7♠"), card("5♦")));
    }

    #[test]
    fn test_can_extend_foundation() {
        assert!(can_extend_foundation(Some(card("7♠")), card("8♠")));
        assert!(!can_extend_foundation(Some(card("7♠")), card("8♣")));
        assert!(!can_extend_foundation(Some(card("4♠")), card("7♠")));
        assert!(can_extend_foundation(None, card("A♦")));
        assert!(!can_extend_foundation(None, card("2♦")));
    }

    #[test]
    fn test_rank_suit_accessors() {
        let king_of_spades = Card::new_with_rank_suit(12, 3);
        assert!(king_of_spades.is_king());
        assert_eq!(king_of_spades.id(), MAX_CARD - 1);
        assert_eq!(king_of_spades.rank(), 12);
        assert_eq!(king_of_spades.suit(), 3);
        assert!(Card::new_with_id(0).is_ace());
    }

    #[test]
    fn test_parse_pretty_round_trip() {
        for id in 0..MAX_CARD {
            let card = Card::new_with_id(id);
            let s = card.to_pretty_string();
            let mut chars = s.chars();
            let parsed = Card::parse(chars.next().unwrap(), chars.next().unwrap()).unwrap();
            assert_eq!(parsed, card);
        }
        assert!(Card::parse('X', '♠').is_err());
        assert!(Card::parse('A', 'x').is_err());
    }
}
