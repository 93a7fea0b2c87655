/// Linear rank weighting and per-category aggregation.
///
/// Pure function — no IO, no state. Items are identified by caller-provided `i64` IDs.
use std::collections::{BTreeMap, HashSet};

use crate::constants::{PERCENT_SCALE, SCORE_PERCENT_DECIMALS};
use crate::error::{RankError, Result};
use crate::types::{CategoryScore, IdMap, Item, ItemId, RankedResult, RankedRow};

/// Score a finished total order.
///
/// `sorted_ids` must hold every id of `items` exactly once, most preferred
/// first. Anything else is an `InvalidState` error: the caller handed over an
/// unfinished or corrupted order.
pub fn score(sorted_ids: &[ItemId], items: &[Item]) -> Result<RankedResult> {
    let id_map = IdMap::from_items(items)?;
    score_with_map(sorted_ids, &id_map)
}

pub(crate) fn score_with_map(sorted_ids: &[ItemId], id_map: &IdMap) -> Result<RankedResult> {
    let num_items = id_map.len();
    if sorted_ids.len() != num_items {
        return Err(RankError::InvalidState(format!(
            "order has {} ids but the item set has {}",
            sorted_ids.len(),
            num_items
        )));
    }

    let mut seen = HashSet::with_capacity(num_items);
    let mut rows = Vec::with_capacity(num_items);
    for (position, &id) in sorted_ids.iter().enumerate() {
        let item = id_map.get(id).ok_or_else(|| {
            RankError::InvalidState(format!("order contains unknown item id {id}"))
        })?;
        if !seen.insert(id) {
            return Err(RankError::InvalidState(format!(
                "order contains item id {id} more than once"
            )));
        }
        rows.push(RankedRow {
            item: item.clone(),
            rank: position + 1,
            points: num_items - position,
        });
    }

    // (members, points) per category; BTreeMap fixes the tie order by name.
    let mut totals: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for row in &rows {
        let entry = totals.entry(row.item.category.as_str()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += row.points;
    }

    let mut categories: Vec<CategoryScore> = totals
        .into_iter()
        .map(|(category, (members, points_obtained))| {
            let max_points = category_max_points(num_items, members);
            CategoryScore {
                category: category.to_string(),
                members,
                points_obtained,
                max_points,
                score_percent: round_percent(points_obtained as f64 / max_points as f64),
            }
        })
        .collect();

    // Stable sort: equal scores keep name order.
    categories.sort_by(|a, b| b.score_percent.total_cmp(&a.score_percent));

    tracing::debug!(num_items, num_categories = categories.len(), "scored ranking");

    Ok(RankedResult { rows, categories })
}

/// Best achievable points for a category of `members` items out of `num_items`:
/// `N + (N-1) + ... + (N-k+1)`.
pub fn category_max_points(num_items: usize, members: usize) -> usize {
    let k = members.min(num_items);
    k * num_items - k * k.saturating_sub(1) / 2
}

/// Halves go to the even neighbour: 3.125 becomes 3.12.
fn round_percent(ratio: f64) -> f64 {
    let factor = 10f64.powi(SCORE_PERCENT_DECIMALS);
    (ratio * PERCENT_SCALE * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_items() -> Vec<Item> {
        vec![
            Item::new(1, "one", "A"),
            Item::new(2, "two", "A"),
            Item::new(3, "three", "B"),
            Item::new(4, "four", "B"),
        ]
    }

    #[test]
    fn test_score_two_category_scenario() {
        let result = score(&[1, 3, 2, 4], &four_items()).unwrap();

        let points: Vec<(ItemId, usize)> = result.rows.iter().map(|r| (r.item.id, r.points)).collect();
        assert_eq!(points, vec![(1, 4), (3, 3), (2, 2), (4, 1)]);

        let a = result.category("A").unwrap();
        assert_eq!(a.points_obtained, 6);
        assert_eq!(a.max_points, 7);
        assert!((a.score_percent - 85.71).abs() < 1e-9);

        let b = result.category("B").unwrap();
        assert_eq!(b.points_obtained, 4);
        assert!((b.score_percent - 57.14).abs() < 1e-9);

        assert_eq!(result.categories[0].category, "A");
    }

    #[test]
    fn test_rows_sorted_by_rank() {
        let result = score(&[4, 2, 3, 1], &four_items()).unwrap();
        let ranks: Vec<usize> = result.rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(result.rows[0].item.id, 4);
    }

    #[test]
    fn test_points_are_linear_bijection() {
        let items: Vec<Item> = (1..=35).map(|i| Item::new(i, format!("q{i}"), format!("C{}", (i - 1) / 5))).collect();
        let order: Vec<ItemId> = (1..=35).rev().collect();
        let result = score(&order, &items).unwrap();

        for (p, row) in result.rows.iter().enumerate() {
            assert_eq!(row.rank, p + 1);
            assert_eq!(row.points, 35 - p);
        }
        assert_eq!(result.total_points(), 35 * 36 / 2);
    }

    #[test]
    fn test_top_ranked_category_scores_full() {
        let items: Vec<Item> = (1..=35).map(|i| Item::new(i, format!("q{i}"), format!("C{}", (i - 1) / 5))).collect();
        let order: Vec<ItemId> = (1..=35).collect();
        let result = score(&order, &items).unwrap();

        let top = &result.categories[0];
        assert_eq!(top.category, "C0");
        assert_eq!(top.max_points, 35 + 34 + 33 + 32 + 31);
        assert_eq!(top.score_percent, 100.0);
        assert_eq!(result.categories.len(), 7);
    }

    #[test]
    fn test_uneven_category_sizes_use_own_maximum() {
        let items = vec![
            Item::new(1, "a", "Solo"),
            Item::new(2, "b", "Trio"),
            Item::new(3, "c", "Trio"),
            Item::new(4, "d", "Trio"),
        ];
        let result = score(&[2, 3, 4, 1], &items).unwrap();
        let trio = result.category("Trio").unwrap();
        assert_eq!(trio.max_points, 4 + 3 + 2);
        assert_eq!(trio.score_percent, 100.0);
        let solo = result.category("Solo").unwrap();
        assert_eq!(solo.max_points, 4);
        assert_eq!(solo.score_percent, 25.0);
    }

    #[test]
    fn test_tied_scores_keep_name_order() {
        let items = vec![
            Item::new(1, "a", "Zeta"),
            Item::new(2, "b", "Alpha"),
            Item::new(3, "c", "Zeta"),
            Item::new(4, "d", "Alpha"),
        ];
        // Zeta: 4+1 = 5, Alpha: 3+2 = 5, both out of 7.
        let result = score(&[1, 2, 4, 3], &items).unwrap();
        let names: Vec<&str> = result.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_score_is_deterministic() {
        let items = four_items();
        let first = score(&[3, 1, 4, 2], &items).unwrap();
        let second = score(&[3, 1, 4, 2], &items).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_order_scores_empty() {
        let result = score(&[], &[]).unwrap();
        assert!(result.is_empty());
        assert!(result.categories.is_empty());
    }

    #[test]
    fn test_rejects_incomplete_order() {
        let err = score(&[1, 2, 3], &four_items()).unwrap_err();
        assert!(matches!(err, RankError::InvalidState(_)));
    }

    #[test]
    fn test_rejects_duplicate_in_order() {
        let err = score(&[1, 1, 2, 3], &four_items()).unwrap_err();
        assert!(matches!(err, RankError::InvalidState(msg) if msg.contains("more than once")));
    }

    #[test]
    fn test_rejects_unknown_id_in_order() {
        let err = score(&[1, 2, 3, 99], &four_items()).unwrap_err();
        assert!(matches!(err, RankError::InvalidState(msg) if msg.contains("unknown item id 99")));
    }

    #[test]
    fn test_half_step_score_rounds_to_even() {
        let mut items: Vec<Item> = (1..=31).map(|i| Item::new(i, format!("q{i}"), "Rest")).collect();
        items.push(Item::new(32, "q32", "Solo"));
        let order: Vec<ItemId> = (1..=32).collect();
        let result = score(&order, &items).unwrap();

        // 1 / 32 = 3.125%
        let solo = result.category("Solo").unwrap();
        assert_eq!(solo.points_obtained, 1);
        assert_eq!(solo.max_points, 32);
        assert_eq!(solo.score_percent, 3.12);
    }

    #[test]
    fn test_category_max_points() {
        assert_eq!(category_max_points(35, 5), 165);
        assert_eq!(category_max_points(4, 2), 7);
        assert_eq!(category_max_points(4, 0), 0);
        assert_eq!(category_max_points(3, 3), 6);
    }
}
