use std::collections::HashMap;

use crate::error::{RankError, Result};

/// Caller-provided item identifier.
pub type ItemId = i64;

/// A single statement to be ranked, tagged with the category it scores for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub category: String,
}

impl Item {
    pub fn new(id: ItemId, text: impl Into<String>, category: impl Into<String>) -> Self {
        Item {
            id,
            text: text.into(),
            category: category.into(),
        }
    }
}

/// One line of the final ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedRow {
    pub item: Item,
    /// 1 = most preferred.
    pub rank: usize,
    /// Linear weight: N for rank 1 down to 1 for rank N.
    pub points: usize,
}

/// Aggregated score for one category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryScore {
    pub category: String,
    /// Number of items tagged with this category.
    pub members: usize,
    pub points_obtained: usize,
    /// Sum of the `members` largest point values, i.e. the best this category could do.
    pub max_points: usize,
    /// `points_obtained / max_points * 100`, rounded to two decimals.
    pub score_percent: f64,
}

/// Output of `score()`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedResult {
    /// Sorted by rank ascending.
    pub rows: Vec<RankedRow>,
    /// Sorted by score descending, ties by category name.
    pub categories: Vec<CategoryScore>,
}

impl RankedResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.rows.iter().map(|r| r.points).sum()
    }

    pub fn category(&self, name: &str) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == name)
    }
}

/// Validated, id-indexed view over a closed item set.
#[derive(Debug, Clone)]
pub(crate) struct IdMap {
    items: Vec<Item>,
    id_to_idx: HashMap<ItemId, usize>,
}

impl IdMap {
    /// Rejects duplicate ids and blank categories.
    pub fn from_items(items: &[Item]) -> Result<Self> {
        let mut id_to_idx = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if item.category.trim().is_empty() {
                return Err(RankError::InvalidItem {
                    id: item.id,
                    reason: "category is empty".to_string(),
                });
            }
            if id_to_idx.insert(item.id, idx).is_some() {
                return Err(RankError::InvalidItem {
                    id: item.id,
                    reason: "duplicate item id".to_string(),
                });
            }
        }
        Ok(IdMap {
            items: items.to_vec(),
            id_to_idx,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.id_to_idx.get(&id).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.id_to_idx.contains_key(&id)
    }
}
