/// pairsort-core: Pure-computation preference ranking.
///
/// Pairwise decisions → binary-insertion total order → per-category scores.
/// No IO, no UI, no global state — the caller owns the session and asks the
/// questions however it likes.
///
/// Items are identified by caller-provided `i64` IDs and tagged with a category.
///
/// # Quick start
///
/// ```rust
/// use pairsort_core::{ComparisonTarget, Item, RankingSession};
///
/// let items = vec![
///     Item::new(1, "I like clear procedures", "Stability"),
///     Item::new(2, "I like trying new things", "Novelty"),
///     Item::new(3, "I want a predictable job", "Stability"),
/// ];
///
/// let mut session = RankingSession::initialize(&items, Some(7)).unwrap();
/// loop {
///     session.advance();
///     match session.current_comparison_target() {
///         ComparisonTarget::Finished => break,
///         ComparisonTarget::InsertImmediately { .. } => session.insert_immediate().unwrap(),
///         // Ask the user here. This one always prefers the lower id.
///         ComparisonTarget::Compare { current, opponent, .. } if current < opponent => {
///             session.decide_current_preferred().unwrap()
///         }
///         _ => session.decide_mid_preferred().unwrap(),
///     }
/// }
///
/// let result = session.results().unwrap();
/// assert_eq!(result.rows[0].item.id, 1);
/// for c in &result.categories {
///     println!("{}: {:.2}%", c.category, c.score_percent);
/// }
/// ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod scoring;
pub mod types;

// Re-export primary public API at crate root.
pub use engine::{
    worst_case_comparisons, ComparisonTarget, Decision, Progress, RankingSession, SessionState,
};
pub use error::{RankError, Result};
pub use scoring::{category_max_points, score};
pub use types::{CategoryScore, Item, ItemId, RankedResult, RankedRow};
