use log::debug;
use rand::Rng;

use crate::action::Action;
use crate::board::{Board, TOTAL_FOUNDATIONS, TOTAL_TABLEAUS};
use crate::card::{self, Card, MAX_CARD};
use crate::deck;
use crate::error::MoveError;

/// A parsed move intent, referencing containers by index.
///
/// A `None` foundation asks the engine to pick the first foundation that
/// accepts the card, scanning in index order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Move {
    Draw,
    WasteToFoundation(Option<usize>),
    WasteToTableau(usize),
    TableauToFoundation(usize, Option<usize>),
    TableauToTableau {
        from: usize,
        to: usize,
        count: usize,
    },
    FoundationToTableau(usize, usize),
}

/// The aggregate game state: the board plus the action log that makes every
/// applied move reversible.
///
/// Every fallible operation is atomic: either the cards move and the log
/// grows, or a [`MoveError`] comes back and the board is untouched.
#[derive(Debug, Clone, Default)]
pub struct Game {
    board: Board,
    log: Vec<Action>,
    redo_stack: Vec<Action>,
}

impl Game {
    /// Deals a fresh game from a shuffle drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let deck = deck::shuffle(&deck::standard_deck(), rng);
        Self::from_board(Board::deal(&deck))
    }

    /// Adopts an existing position, e.g. one loaded via [`Board::parse`].
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            log: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of successfully applied moves currently on the log.
    pub fn moves(&self) -> usize {
        self.log.len()
    }

    pub fn actions(&self) -> &[Action] {
        &self.log
    }

    /// All four foundations are complete.
    pub fn is_won(&self) -> bool {
        self.board.score() == MAX_CARD as usize
    }

    pub fn apply(&mut self, mov: Move) -> Result<(), MoveError> {
        match mov {
            Move::Draw => {
                self.draw();
                Ok(())
            }
            Move::WasteToFoundation(foundation) => self.waste_to_foundation(foundation),
            Move::WasteToTableau(tableau) => self.waste_to_tableau(tableau),
            Move::TableauToFoundation(tableau, foundation) => {
                self.tableau_to_foundation(tableau, foundation)
            }
            Move::TableauToTableau { from, to, count } => self.tableau_to_tableau(from, to, count),
            Move::FoundationToTableau(foundation, tableau) => {
                self.foundation_to_tableau(foundation, tableau)
            }
        }
    }

    /// Draws the stock's top card onto the waste. An exhausted stock is
    /// first redealt from the reversed waste; when both piles are empty this
    /// is a no-op and nothing is logged.
    pub fn draw(&mut self) {
        if self.board.stock.is_empty() {
            if self.board.waste.is_empty() {
                return;
            }
            self.board.redeal_unchecked();
            self.record(Action::Redeal);
        }
        self.board.draw_unchecked();
        self.record(Action::Draw);
    }

    fn waste_to_foundation(&mut self, which: Option<usize>) -> Result<(), MoveError> {
        let card = *self.board.waste.last().ok_or(MoveError::EmptyWaste)?;
        let foundation = self.resolve_foundation(which, card)?;
        self.board.waste.pop();
        self.board.foundations[foundation].push(card);
        self.record(Action::WasteToFoundation(foundation));
        Ok(())
    }

    fn waste_to_tableau(&mut self, tableau: usize) -> Result<(), MoveError> {
        if tableau >= TOTAL_TABLEAUS {
            return Err(MoveError::InvalidDestination);
        }
        let card = *self.board.waste.last().ok_or(MoveError::EmptyWaste)?;
        self.check_tableau_accepts(tableau, card)?;
        self.board.waste.pop();
        self.board.tableaus[tableau].push_face_up(card);
        self.record(Action::WasteToTableau(tableau));
        Ok(())
    }

    fn tableau_to_foundation(
        &mut self,
        tableau: usize,
        which: Option<usize>,
    ) -> Result<(), MoveError> {
        if tableau >= TOTAL_TABLEAUS {
            return Err(MoveError::InvalidTarget);
        }
        let pile = &self.board.tableaus[tableau];
        let card = *pile.peek_top().ok_or(MoveError::InvalidTarget)?;
        if pile.face_up_count == 0 {
            return Err(MoveError::CardNotRevealed);
        }
        let foundation = self.resolve_foundation(which, card)?;
        self.board.tableaus[tableau].pop_unchecked();
        let flipped = self.board.tableaus[tableau].flip_top_if_hidden();
        self.board.foundations[foundation].push(card);
        self.record(Action::TableauToFoundation {
            tableau,
            foundation,
            flipped,
        });
        Ok(())
    }

    fn tableau_to_tableau(&mut self, from: usize, to: usize, count: usize) -> Result<(), MoveError> {
        if from >= TOTAL_TABLEAUS {
            return Err(MoveError::InvalidTarget);
        }
        if to >= TOTAL_TABLEAUS || from == to {
            return Err(MoveError::InvalidDestination);
        }
        let source = &self.board.tableaus[from];
        if source.is_empty() {
            return Err(MoveError::InvalidTarget);
        }
        if count == 0 || count > source.len() {
            return Err(MoveError::InvalidIndex);
        }
        let bottom = source.len() - count;
        if !source.is_face_up(bottom) {
            return Err(MoveError::CardNotRevealed);
        }
        self.check_tableau_accepts(to, source.cards[bottom])?;
        let cards = self.board.tableaus[from].drain_unchecked(count);
        let flipped = self.board.tableaus[from].flip_top_if_hidden();
        self.board.tableaus[to].extend_face_up(cards);
        self.record(Action::TableauToTableau {
            from,
            to,
            count,
            flipped,
        });
        Ok(())
    }

    fn foundation_to_tableau(&mut self, foundation: usize, tableau: usize) -> Result<(), MoveError> {
        if foundation >= TOTAL_FOUNDATIONS {
            return Err(MoveError::InvalidTarget);
        }
        if tableau >= TOTAL_TABLEAUS {
            return Err(MoveError::InvalidDestination);
        }
        let card = *self.board.foundations[foundation]
            .last()
            .ok_or(MoveError::InvalidMove)?;
        if self.check_tableau_accepts(tableau, card).is_err() {
            return Err(MoveError::InvalidMove);
        }
        self.board.foundations[foundation].pop();
        self.board.tableaus[tableau].push_face_up(card);
        self.record(Action::FoundationToTableau {
            foundation,
            tableau,
        });
        Ok(())
    }

    /// Chooses the foundation for `card`: either the named one, validated
    /// with a specific rejection reason, or the first accepting one in index
    /// order.
    fn resolve_foundation(&self, which: Option<usize>, card: Card) -> Result<usize, MoveError> {
        match which {
            Some(idx) => {
                if idx >= TOTAL_FOUNDATIONS {
                    return Err(MoveError::InvalidDestination);
                }
                match self.board.foundations[idx].last() {
                    None if card.is_ace() => Ok(idx),
                    None => Err(MoveError::EmptyFoundation),
                    Some(&top) if !top.is_same_suit(card) => Err(MoveError::SuitMismatch),
                    Some(&top) if !card::is_in_sequence(top, card) => Err(MoveError::NotInSequence),
                    Some(_) => Ok(idx),
                }
            }
            None => (0..TOTAL_FOUNDATIONS)
                .find(|&idx| {
                    card::can_extend_foundation(self.board.foundations[idx].last().copied(), card)
                })
                .ok_or(MoveError::InvalidMove),
        }
    }

    /// Whether `card` may land on tableau `idx`. An empty pile accepts any
    /// card; rank is checked before color.
    fn check_tableau_accepts(&self, idx: usize, card: Card) -> Result<(), MoveError> {
        match self.board.tableaus[idx].peek_top() {
            None => Ok(()),
            Some(&top) if !card::is_in_sequence(card, top) => Err(MoveError::NotInSequence),
            Some(&top) if !top.is_alternate_color(card) => Err(MoveError::NotAlternatingColor),
            Some(_) => Ok(()),
        }
    }

    fn record(&mut self, action: Action) {
        debug!("applied {action:?}");
        self.log.push(action);
        self.redo_stack.clear();
    }

    /// Reverses the most recent action and parks it on the redo stack.
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.log.pop() else {
            return false;
        };
        self.revert(action);
        self.redo_stack.push(action);
        debug!("undid {action:?}");
        true
    }

    /// Re-applies the most recently undone action. Returns `false` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.redo_stack.pop() else {
            return false;
        };
        self.replay(action);
        self.log.push(action);
        debug!("redid {action:?}");
        true
    }

    fn revert(&mut self, action: Action) {
        match action {
            Action::Draw => self.board.undo_draw_unchecked(),
            Action::Redeal => self.board.undo_redeal_unchecked(),
            Action::WasteToFoundation(foundation) => {
                let card = self.board.foundations[foundation]
                    .pop()
                    .expect("foundation must hold the moved card");
                self.board.waste.push(card);
            }
            Action::WasteToTableau(tableau) => {
                let card = self.board.tableaus[tableau].pop_unchecked();
                self.board.waste.push(card);
            }
            Action::TableauToFoundation {
                tableau,
                foundation,
                flipped,
            } => {
                if flipped {
                    self.board.tableaus[tableau].hide_top();
                }
                let card = self.board.foundations[foundation]
                    .pop()
                    .expect("foundation must hold the moved card");
                self.board.tableaus[tableau].push_face_up(card);
            }
            Action::TableauToTableau {
                from,
                to,
                count,
                flipped,
            } => {
                if flipped {
                    self.board.tableaus[from].hide_top();
                }
                let cards = self.board.tableaus[to].drain_unchecked(count);
                self.board.tableaus[from].extend_face_up(cards);
            }
            Action::FoundationToTableau {
                foundation,
                tableau,
            } => {
                let card = self.board.tableaus[tableau].pop_unchecked();
                self.board.foundations[foundation].push(card);
            }
        }
    }

    fn replay(&mut self, action: Action) {
        match action {
            Action::Draw => self.board.draw_unchecked(),
            Action::Redeal => self.board.redeal_unchecked(),
            Action::WasteToFoundation(foundation) => {
                let card = self.board.waste.pop().expect("waste must hold the card");
                self.board.foundations[foundation].push(card);
            }
            Action::WasteToTableau(tableau) => {
                let card = self.board.waste.pop().expect("waste must hold the card");
                self.board.tableaus[tableau].push_face_up(card);
            }
            Action::TableauToFoundation {
                tableau,
                foundation,
                flipped,
            } => {
                let card = self.board.tableaus[tableau].pop_unchecked();
                let now_flipped = self.board.tableaus[tableau].flip_top_if_hidden();
                debug_assert_eq!(now_flipped, flipped);
                self.board.foundations[foundation].push(card);
            }
            Action::TableauToTableau {
                from,
                to,
                count,
                flipped,
            } => {
                let cards = self.board.tableaus[from].drain_unchecked(count);
                let now_flipped = self.board.tableaus[from].flip_top_if_hidden();
                debug_assert_eq!(now_flipped, flipped);
                self.board.tableaus[to].extend_face_up(cards);
            }
            Action::FoundationToTableau {
                foundation,
                tableau,
            } => {
                let card = self.board.foundations[foundation]
                    .pop()
                    .expect("foundation must hold the card");
                self.board.tableaus[tableau].push_face_up(card);
            }
        }
    }
}
