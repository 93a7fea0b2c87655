/// Binary-insertion ranking session.
///
/// Pure computation — no async, no IO. The caller shows each pending
/// comparison to a human, then feeds the answer back as a decision.
///
/// Items are identified by caller-provided `i64` IDs.
use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{RankError, Result};
use crate::scoring::score_with_map;
use crate::types::{IdMap, Item, ItemId, RankedResult};

/// Coarse lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    /// No item is being placed, but some are still queued. Call `advance()`.
    Idle,
    /// An item is being placed.
    Comparing,
    /// Every item is placed. Terminal.
    Finished,
}

/// What the caller has to ask next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonTarget {
    Idle,
    Finished,
    /// Nothing is sorted yet; place `current` without asking.
    InsertImmediately { current: ItemId },
    /// Ask whether `current` is preferred over `opponent`, found at `mid` in the sorted order.
    Compare { current: ItemId, opponent: ItemId, mid: usize },
    /// The midpoint fell outside the sorted order; only head/tail placement is offered.
    Boundary { current: ItemId },
}

/// A user judgment, as consumed by `RankingSession::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decision {
    CurrentPreferred,
    MidPreferred,
    Equivalent,
    InsertImmediate,
    PlaceAtHead,
    PlaceAtTail,
}

/// Read-only progress snapshot for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub comparisons: usize,
    pub placed: usize,
    pub pending: usize,
    pub total: usize,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct RankingSession {
    id_map: IdMap,

    /// Placed ids, most preferred first.
    sorted_order: Vec<ItemId>,
    /// Ids not yet placed, in presentation order.
    pending_queue: VecDeque<ItemId>,
    current_item: Option<ItemId>,

    /// Half-open slot range `[low, high)` still open for `current_item`.
    low: usize,
    high: usize,

    comparisons_count: usize,
    finished: bool,
}

impl RankingSession {
    /// Create a session with the pending queue shuffled.
    ///
    /// With `seed` the shuffle is reproducible; without it the thread RNG is used.
    pub fn initialize(items: &[Item], seed: Option<u64>) -> Result<Self> {
        let id_map = IdMap::from_items(items)?;
        let order = shuffled_ids(&id_map, seed);
        Ok(Self::from_parts(id_map, order))
    }

    /// Create a session that presents items in exactly `order`.
    ///
    /// `order` must be a permutation of the item ids.
    pub fn with_order(items: &[Item], order: &[ItemId]) -> Result<Self> {
        let id_map = IdMap::from_items(items)?;
        if order.len() != id_map.len() {
            return Err(RankError::InvalidState(format!(
                "presentation order has {} ids but the item set has {}",
                order.len(),
                id_map.len()
            )));
        }
        let mut seen = HashSet::with_capacity(order.len());
        for &id in order {
            if !id_map.contains(id) || !seen.insert(id) {
                return Err(RankError::InvalidState(format!(
                    "presentation order is not a permutation of the items (id {id})"
                )));
            }
        }
        Ok(Self::from_parts(id_map, order.to_vec()))
    }

    fn from_parts(id_map: IdMap, order: Vec<ItemId>) -> Self {
        let finished = order.is_empty();
        tracing::debug!(num_items = order.len(), "ranking session created");
        RankingSession {
            id_map,
            sorted_order: Vec::with_capacity(order.len()),
            pending_queue: order.into(),
            current_item: None,
            low: 0,
            high: 0,
            comparisons_count: 0,
            finished,
        }
    }

    /// Throw away all decisions and start over on the same items.
    pub fn restart(&mut self, seed: Option<u64>) {
        let id_map = self.id_map.clone();
        let order = shuffled_ids(&id_map, seed);
        *self = Self::from_parts(id_map, order);
    }

    /// Start placing the next queued item, or mark the session finished.
    ///
    /// No-op while an item is being placed or once finished.
    pub fn advance(&mut self) {
        if self.finished || self.current_item.is_some() {
            return;
        }
        match self.pending_queue.pop_front() {
            Some(id) => {
                self.current_item = Some(id);
                self.low = 0;
                self.high = self.sorted_order.len();
                tracing::trace!(item = id, slots = self.high + 1, "placing next item");
            }
            None => {
                self.finished = true;
                tracing::debug!(comparisons = self.comparisons_count, "ranking finished");
            }
        }
    }

    pub fn state(&self) -> SessionState {
        if self.finished {
            SessionState::Finished
        } else if self.current_item.is_some() {
            SessionState::Comparing
        } else {
            SessionState::Idle
        }
    }

    fn mid(&self) -> usize {
        (self.low + self.high) / 2
    }

    /// The pending question. Never mutates.
    pub fn current_comparison_target(&self) -> ComparisonTarget {
        if self.finished {
            return ComparisonTarget::Finished;
        }
        let Some(current) = self.current_item else {
            return ComparisonTarget::Idle;
        };
        if self.sorted_order.is_empty() {
            return ComparisonTarget::InsertImmediately { current };
        }
        let mid = self.mid();
        match self.sorted_order.get(mid) {
            Some(&opponent) => ComparisonTarget::Compare { current, opponent, mid },
            None => ComparisonTarget::Boundary { current },
        }
    }

    /// Dispatch a decision to the matching operation.
    pub fn apply(&mut self, decision: Decision) -> Result<()> {
        match decision {
            Decision::CurrentPreferred => self.decide_current_preferred(),
            Decision::MidPreferred => self.decide_mid_preferred(),
            Decision::Equivalent => self.decide_equivalent(),
            Decision::InsertImmediate => self.insert_immediate(),
            Decision::PlaceAtHead => self.place_at_head(),
            Decision::PlaceAtTail => self.place_at_tail(),
        }
    }

    /// The current item beats the one at `mid`: its slot is at or before `mid`.
    ///
    /// The order stays most-preferred first, so this narrows with `high = mid`.
    pub fn decide_current_preferred(&mut self) -> Result<()> {
        let mid = self.expect_compare("decide_current_preferred")?;
        self.comparisons_count += 1;
        self.high = mid;
        if self.low >= self.high {
            self.place_current(self.low);
        }
        Ok(())
    }

    /// The item at `mid` beats the current one: its slot is after `mid`.
    pub fn decide_mid_preferred(&mut self) -> Result<()> {
        let mid = self.expect_compare("decide_mid_preferred")?;
        self.comparisons_count += 1;
        self.low = mid + 1;
        if self.low >= self.high {
            self.place_current(self.low);
        }
        Ok(())
    }

    /// The two are equivalent: stop searching and place the current item
    /// right before its peer at `mid`.
    pub fn decide_equivalent(&mut self) -> Result<()> {
        let mid = self.expect_compare("decide_equivalent")?;
        self.comparisons_count += 1;
        self.place_current(mid);
        Ok(())
    }

    /// Place the current item into an empty sorted order. Not a comparison.
    pub fn insert_immediate(&mut self) -> Result<()> {
        match self.current_comparison_target() {
            ComparisonTarget::InsertImmediately { .. } => {
                self.place_current(0);
                Ok(())
            }
            other => Err(unexpected("insert_immediate", other)),
        }
    }

    pub fn place_at_head(&mut self) -> Result<()> {
        self.place_at_boundary("place_at_head", 0)
    }

    pub fn place_at_tail(&mut self) -> Result<()> {
        let tail = self.sorted_order.len();
        self.place_at_boundary("place_at_tail", tail)
    }

    fn place_at_boundary(&mut self, operation: &str, position: usize) -> Result<()> {
        match self.current_comparison_target() {
            ComparisonTarget::Boundary { .. } => {
                self.comparisons_count += 1;
                self.place_current(position);
                Ok(())
            }
            other => Err(unexpected(operation, other)),
        }
    }

    /// Returns `mid` when a comparison is pending.
    fn expect_compare(&self, operation: &str) -> Result<usize> {
        match self.current_comparison_target() {
            ComparisonTarget::Compare { mid, .. } => Ok(mid),
            other => Err(unexpected(operation, other)),
        }
    }

    fn place_current(&mut self, position: usize) {
        let id = self
            .current_item
            .take()
            .expect("place_current called without a current item");
        self.sorted_order.insert(position, id);
        tracing::trace!(item = id, position, placed = self.sorted_order.len(), "item placed");
        self.advance();
    }

    pub fn current_item(&self) -> Option<ItemId> {
        self.current_item
    }

    /// `(low, high)` while an item is being placed.
    pub fn bounds(&self) -> Option<(usize, usize)> {
        self.current_item.map(|_| (self.low, self.high))
    }

    pub fn sorted_order(&self) -> &[ItemId] {
        &self.sorted_order
    }

    pub fn pending_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.pending_queue.iter().copied()
    }

    pub fn sorted_len(&self) -> usize {
        self.sorted_order.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending_queue.len()
    }

    pub fn comparisons_count(&self) -> usize {
        self.comparisons_count
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn num_items(&self) -> usize {
        self.id_map.len()
    }

    pub fn items(&self) -> &[Item] {
        self.id_map.items()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.id_map.get(id)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            comparisons: self.comparisons_count,
            placed: self.sorted_order.len(),
            pending: self.pending_queue.len(),
            total: self.id_map.len(),
            finished: self.finished,
        }
    }

    /// Items placed so far, most preferred first.
    pub fn provisional_order(&self) -> Vec<&Item> {
        self.sorted_order
            .iter()
            .filter_map(|&id| self.id_map.get(id))
            .collect()
    }

    /// Score the finished order against this session's items.
    pub fn results(&self) -> Result<RankedResult> {
        if !self.finished {
            return Err(RankError::InvalidState(format!(
                "results requested before ranking finished ({} of {} placed)",
                self.sorted_order.len(),
                self.id_map.len()
            )));
        }
        score_with_map(&self.sorted_order, &self.id_map)
    }
}

fn shuffled_ids(id_map: &IdMap, seed: Option<u64>) -> Vec<ItemId> {
    let mut ids = id_map.ids();
    match seed {
        Some(seed) => ids.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => ids.shuffle(&mut rand::rng()),
    }
    ids
}

fn unexpected(operation: &str, target: ComparisonTarget) -> RankError {
    let found = match target {
        ComparisonTarget::Idle => "no item is being placed (call advance first)",
        ComparisonTarget::Finished => "the session is finished",
        ComparisonTarget::InsertImmediately { .. } => "the sorted order is empty",
        ComparisonTarget::Compare { .. } => "a comparison is pending",
        ComparisonTarget::Boundary { .. } => "a boundary placement is pending",
    };
    RankError::InvalidState(format!("{operation} not allowed: {found}"))
}

/// `ceil(log2(slots))`: comparisons needed to pick one of `slots` positions.
fn comparisons_for_slots(slots: usize) -> usize {
    if slots <= 1 {
        0
    } else {
        (usize::BITS - (slots - 1).leading_zeros()) as usize
    }
}

/// Upper bound on decisions needed to rank `num_items` items when no
/// equivalence shortcut is taken.
pub fn worst_case_comparisons(num_items: usize) -> usize {
    (0..num_items).map(|k| comparisons_for_slots(k + 1)).sum()
}
