use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::{Card, MAX_CARD};

/// The 52 cards in canonical order: Hearts A..K, then Diamonds, Clubs,
/// Spades.
pub fn standard_deck() -> Vec<Card> {
    (0..MAX_CARD).map(Card::new_with_id).collect()
}

/// Returns a fresh Fisher-Yates shuffle of `deck`; the input is left as is.
pub fn shuffle<R: Rng + ?Sized>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut shuffled = deck.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
