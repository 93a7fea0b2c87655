use crate::types::ItemId;

/// Errors raised by the ranking core.
///
/// Both variants signal a caller bug. Nothing in the core performs I/O,
/// so there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    /// An operation was called in a state that does not allow it, or
    /// `score` was given an order that is not a permutation of the items.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The item set handed to `initialize` is malformed.
    #[error("invalid item {id}: {reason}")]
    InvalidItem { id: ItemId, reason: String },
}

pub type Result<T> = std::result::Result<T, RankError>;
