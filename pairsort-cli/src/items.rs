/// Item loading: built-in questionnaire or a user file (JSON or TOML).
use pairsort_core::{Item, RankError, RankingSession};
use serde::Deserialize;
use std::path::Path;

use crate::bail;

/// The 35-statement work-motivation questionnaire, 5 statements in each of 7 categories.
const BUILTIN_QUESTIONS: &str = include_str!("questions.json");

#[derive(Deserialize)]
struct ItemFile {
    items: Vec<Item>,
}

pub fn builtin_items() -> Vec<Item> {
    serde_json::from_str(BUILTIN_QUESTIONS)
        .unwrap_or_else(|e| bail(format!("Failed to parse embedded questionnaire: {e}")))
}

/// Parse an item file.
///
/// Accepted shapes: a JSON array of `{id, text, category}`, a JSON object with
/// an `items` array, or TOML with an `[[items]]` table array.
pub fn parse_items_from_str(content: &str) -> Result<Vec<Item>, String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') && !trimmed.starts_with("[[") {
        serde_json::from_str(trimmed)
            .map_err(|e| format!("File looks like a JSON array but failed to parse: {e}"))
    } else if trimmed.starts_with('{') {
        serde_json::from_str::<ItemFile>(trimmed)
            .map(|f| f.items)
            .map_err(|e| format!("File looks like JSON but failed to parse: {e}"))
    } else {
        toml::from_str::<ItemFile>(trimmed)
            .map(|f| f.items)
            .map_err(|e| format!("Failed to parse TOML item file: {e}"))
    }
}

/// Load items from `path`, or the built-in questionnaire when no path is given.
pub fn load_items(path: Option<&Path>) -> Vec<Item> {
    let Some(path) = path else {
        tracing::debug!("using built-in questionnaire");
        return builtin_items();
    };

    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
    let items = parse_items_from_str(&content)
        .unwrap_or_else(|e| bail(format!("{}: {e}", path.display())));

    tracing::info!(path = %path.display(), count = items.len(), "loaded items");
    items
}

/// One line per item, after the same validation `rank` applies.
pub fn format_question_list(items: &[Item]) -> Result<String, RankError> {
    let session = RankingSession::initialize(items, Some(0))?;
    Ok(session
        .items()
        .iter()
        .map(|item| format!("{:>4} | {} | {}\n", item.id, item.category, item.text))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_builtin_questionnaire_shape() {
        let items = builtin_items();
        assert_eq!(items.len(), 35);

        let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &items {
            *per_category.entry(item.category.as_str()).or_default() += 1;
        }
        assert_eq!(per_category.len(), 7);
        assert!(per_category.values().all(|&n| n == 5));
        assert_eq!(per_category.get("Autonomie"), Some(&5));
    }

    #[test]
    fn test_parse_json_array() {
        let items = parse_items_from_str(
            r#"[{"id": 1, "text": "a", "category": "X"}, {"id": 2, "text": "b", "category": "Y"}]"#,
        )
        .unwrap();
        assert_eq!(items, vec![Item::new(1, "a", "X"), Item::new(2, "b", "Y")]);
    }

    #[test]
    fn test_parse_json_object() {
        let items = parse_items_from_str(r#"{"items": [{"id": 7, "text": "a", "category": "X"}]}"#).unwrap();
        assert_eq!(items, vec![Item::new(7, "a", "X")]);
    }

    #[test]
    fn test_parse_toml() {
        let content = "\
[[items]]
id = 1
text = \"Stable job\"
category = \"Stability\"

[[items]]
id = 2
text = \"New projects\"
category = \"Novelty\"
";
        let items = parse_items_from_str(content).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], Item::new(2, "New projects", "Novelty"));
    }

    #[test]
    fn test_question_list_keeps_file_order() {
        let items = vec![Item::new(2, "b", "Y"), Item::new(1, "a", "X")];
        assert_eq!(format_question_list(&items).unwrap(), "   2 | Y | b\n   1 | X | a\n");
    }

    #[test]
    fn test_question_list_rejects_invalid_items() {
        let duplicate = vec![Item::new(1, "a", "X"), Item::new(1, "b", "Y")];
        assert!(matches!(format_question_list(&duplicate), Err(RankError::InvalidItem { id: 1, .. })));

        let blank = vec![Item::new(1, "a", " ")];
        assert!(format_question_list(&blank).is_err());
    }

    #[test]
    fn test_parse_reports_bad_json() {
        let err = parse_items_from_str(r#"[{"id": 1, "text": "a"}]"#).unwrap_err();
        assert!(err.contains("JSON array"));
    }
}
