/// Output formatting: terminal tables, JSON, and CSV exports.
use pairsort_core::{CategoryScore, RankedResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::bail;

pub const DETAILS_CSV_NAME: &str = "ranking_details.csv";
pub const CATEGORIES_CSV_NAME: &str = "category_scores.csv";

/// Width of a 100% bar in the category chart.
const BAR_WIDTH: usize = 40;

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    id: i64,
    category: &'a str,
    text: &'a str,
    points: usize,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    categories: &'a [CategoryScore],
    items: Vec<JsonRankedItem<'a>>,
    total_comparisons: usize,
}

/// Category scores with a text bar chart, then the full ranking.
pub fn render_table(result: &RankedResult, total_comparisons: usize) -> String {
    let mut out = String::new();

    let cat_width = result
        .categories
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(8)
        .max(8); // at least "Category"

    out.push_str("Category scores\n\n");
    out.push_str(&format!(
        "{:<cat_width$} |  Points |     Max | Score %\n",
        "Category"
    ));
    out.push_str(&format!("{}-|---------|---------|--------\n", "-".repeat(cat_width)));
    for c in &result.categories {
        out.push_str(&format!(
            "{:<cat_width$} | {:>7} | {:>7} | {:>7.2}\n",
            c.category,
            c.points_obtained,
            c.max_points,
            c.score_percent,
        ));
    }

    out.push('\n');
    for c in &result.categories {
        let filled = ((c.score_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "{:<cat_width$} {}{} {:>6.2}%\n",
            c.category,
            "#".repeat(filled.min(BAR_WIDTH)),
            ".".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
            c.score_percent,
        ));
    }

    out.push_str("\nFull ranking\n\n");
    out.push_str(&format!(
        "Rank | Points | {:<cat_width$} | Statement\n",
        "Category"
    ));
    out.push_str(&format!("-----|--------|-{}-|----------\n", "-".repeat(cat_width)));
    for row in &result.rows {
        out.push_str(&format!(
            "{:>4} | {:>6} | {:<cat_width$} | {}\n",
            row.rank,
            row.points,
            row.item.category,
            row.item.text,
        ));
    }

    out.push_str(&format!(
        "\n{} statements ranked with {} comparisons\n",
        result.rows.len(),
        total_comparisons,
    ));
    out
}

pub fn print_table(result: &RankedResult, total_comparisons: usize) {
    if result.categories.is_empty() {
        println!("Nothing to score: the item set was empty.");
        return;
    }
    print!("{}", render_table(result, total_comparisons));
}

pub fn render_json(result: &RankedResult, total_comparisons: usize) -> String {
    let items = result
        .rows
        .iter()
        .map(|r| JsonRankedItem {
            rank: r.rank,
            id: r.item.id,
            category: &r.item.category,
            text: &r.item.text,
            points: r.points,
        })
        .collect();

    let output = JsonOutput {
        categories: &result.categories,
        items,
        total_comparisons,
    };

    serde_json::to_string_pretty(&output)
        .unwrap_or_else(|e| bail(format!("Failed to serialize results: {e}")))
}

pub fn print_json(result: &RankedResult, total_comparisons: usize) {
    println!("{}", render_json(result, total_comparisons));
}

/// Explanation of the scoring method, with the numbers for this item set.
pub fn method_text(result: &RankedResult) -> String {
    let n = result.rows.len();
    let mut text = format!(
        "Weighting is linear: rank 1 earns {n} points, rank {n} earns 1 point.\n\
         A category's score is the sum of its statements' points divided by the\n\
         best it could have scored (its k statements holding the top k ranks),\n\
         as a percentage.\n",
    );
    if let Some(c) = result.categories.first() {
        let top: Vec<String> = (0..c.members).map(|i| (n - i).to_string()).collect();
        text.push_str(&format!(
            "For a category of {} statements: max = {} = {}.\n",
            c.members,
            top.join(" + "),
            c.max_points,
        ));
    }
    text
}

/// Quote a CSV field when it contains a separator, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn details_csv(result: &RankedResult) -> String {
    let mut out = String::from("rank,id,category,text,points\n");
    for row in &result.rows {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            row.rank,
            row.item.id,
            csv_field(&row.item.category),
            csv_field(&row.item.text),
            row.points,
        ));
    }
    out
}

pub fn categories_csv(result: &RankedResult) -> String {
    let mut out = String::from("category,points_obtained,max_points,score_percent\n");
    for c in &result.categories {
        out.push_str(&format!(
            "{},{},{},{:.2}\n",
            csv_field(&c.category),
            c.points_obtained,
            c.max_points,
            c.score_percent,
        ));
    }
    out
}

/// Write both CSV exports into `dir`, creating it if needed.
pub fn write_exports(dir: &Path, result: &RankedResult) -> std::io::Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let details_path = dir.join(DETAILS_CSV_NAME);
    let categories_path = dir.join(CATEGORIES_CSV_NAME);
    std::fs::write(&details_path, details_csv(result))?;
    std::fs::write(&categories_path, categories_csv(result))?;
    tracing::info!(dir = %dir.display(), "exported results");
    Ok((details_path, categories_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairsort_core::{score, Item};

    fn sample_result() -> RankedResult {
        let items = vec![
            Item::new(1, "Stable, predictable work", "Stabilité"),
            Item::new(2, "Clear \"rules\"", "Stabilité"),
            Item::new(3, "New projects", "Nouveauté"),
            Item::new(4, "Change", "Nouveauté"),
        ];
        score(&[1, 3, 2, 4], &items).unwrap()
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_details_csv() {
        let csv = details_csv(&sample_result());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "rank,id,category,text,points");
        assert_eq!(lines[1], "1,1,Stabilité,\"Stable, predictable work\",4");
        assert_eq!(lines[3], "3,2,Stabilité,\"Clear \"\"rules\"\"\",2");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_categories_csv() {
        let csv = categories_csv(&sample_result());
        assert_eq!(
            csv,
            "category,points_obtained,max_points,score_percent\n\
             Stabilité,6,7,85.71\n\
             Nouveauté,4,7,57.14\n"
        );
    }

    #[test]
    fn test_render_table_lists_everything() {
        let table = render_table(&sample_result(), 5);
        assert!(table.contains("Stabilité"));
        assert!(table.contains("85.71"));
        assert!(table.contains("New projects"));
        assert!(table.contains("4 statements ranked with 5 comparisons"));
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&sample_result(), 5)).unwrap();
        assert_eq!(json["total_comparisons"], 5);
        assert_eq!(json["items"][0]["id"], 1);
        assert_eq!(json["items"][0]["points"], 4);
        assert_eq!(json["categories"][0]["category"], "Stabilité");
        assert_eq!(json["categories"][1]["max_points"], 7);
    }

    #[test]
    fn test_method_text_shows_maximum() {
        let text = method_text(&sample_result());
        assert!(text.contains("rank 1 earns 4 points"));
        assert!(text.contains("max = 4 + 3 = 7"));
    }

    #[test]
    fn test_write_exports() {
        let dir = std::env::temp_dir().join(format!("pairsort-export-{}", std::process::id()));
        let (details, categories) = write_exports(&dir, &sample_result()).unwrap();
        assert!(std::fs::read_to_string(&details).unwrap().starts_with("rank,id,"));
        assert!(std::fs::read_to_string(&categories).unwrap().contains("85.71"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
