/// Parsing of the answers typed at the interactive prompt.
use pairsort_core::{ComparisonTarget, Decision};

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Decision(Decision),
    ShowOrder,
    Restart,
    Quit,
    Help,
}

/// Map a typed line to an answer, given the question on screen.
///
/// Decision keys only count when they fit the question: `1`/`2`/`=` while
/// comparing, `h`/`t` on a boundary placement. Returns `None` otherwise.
pub fn parse_answer(line: &str, target: &ComparisonTarget) -> Option<Answer> {
    let key = line.trim().to_lowercase();

    match key.as_str() {
        "p" | "order" => return Some(Answer::ShowOrder),
        "r" | "restart" => return Some(Answer::Restart),
        "q" | "quit" => return Some(Answer::Quit),
        "?" | "help" => return Some(Answer::Help),
        _ => {}
    }

    let decision = match target {
        ComparisonTarget::Compare { .. } => match key.as_str() {
            "1" | "a" => Decision::CurrentPreferred,
            "2" | "b" => Decision::MidPreferred,
            "=" | "e" | "0" => Decision::Equivalent,
            _ => return None,
        },
        ComparisonTarget::Boundary { .. } => match key.as_str() {
            "h" | "head" => Decision::PlaceAtHead,
            "t" | "tail" => Decision::PlaceAtTail,
            _ => return None,
        },
        _ => return None,
    };
    Some(Answer::Decision(decision))
}
