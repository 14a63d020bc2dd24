use thiserror::Error;

/// Why a move was rejected. Every variant is recoverable: the engine returns
/// the reason with the board untouched, and the controller decides how to
/// surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("That was not a valid move")]
    InvalidMove,
    #[error("That was not a valid target")]
    InvalidTarget,
    #[error("That was not a valid destination")]
    InvalidDestination,
    #[error("That was not a valid index")]
    InvalidIndex,
    #[error("Suit does not match")]
    SuitMismatch,
    #[error("Cards are not in sequence")]
    NotInSequence,
    #[error("Can't move a card onto another card if they share a color")]
    NotAlternatingColor,
    #[error("Can't move a card that has not been revealed yet")]
    CardNotRevealed,
    #[error("Can't move a card that's not an Ace onto an empty foundation")]
    EmptyFoundation,
    #[error("Can't move from an empty waste")]
    EmptyWaste,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            MoveError::EmptyWaste.to_string(),
            "Can't move from an empty waste"
        );
        assert_eq!(
            MoveError::NotInSequence.to_string(),
            "Cards are not in sequence"
        );
    }
}
