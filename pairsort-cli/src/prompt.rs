/// Text shown at the interactive prompt.
use pairsort_core::{Item, Progress};

pub const HELP_TEXT: &str = "\
Answers:
  1  the first statement matters more
  2  the second statement matters more
  =  both matter about the same
  h / t  place at head / tail (only offered when no comparison is possible)
  p  show the provisional order
  r  restart from scratch
  q  quit without results
";

/// Build the question for one comparison.
pub fn build_question(current: &Item, opponent: &Item) -> String {
    format!(
        "Which matters more to you?\n\n  \
         1) {}\n  \
         2) {}\n\n\
         [1] first  [2] second  [=] equivalent  [?] help\n",
        current.text, opponent.text,
    )
}

/// Build the fallback question when the midpoint is past either end of the order.
pub fn build_boundary_question(current: &Item) -> String {
    format!(
        "Placing:\n\n  {}\n\n\
         [h] place at head  [t] place at tail\n",
        current.text,
    )
}

pub fn progress_line(progress: &Progress, worst_case: usize) -> String {
    format!(
        "Comparisons: {} (at most {}) | Placed: {} / {}",
        progress.comparisons, worst_case, progress.placed, progress.total,
    )
}

/// Numbered provisional order, or "(empty)".
pub fn format_provisional(order: &[&Item]) -> String {
    if order.is_empty() {
        return "(empty)\n".to_string();
    }
    order
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{:>3}. {}\n", i + 1, item.text))
        .collect()
}
