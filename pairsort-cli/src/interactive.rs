/// The question/answer loop driving a ranking session from a terminal.
///
/// Generic over reader and writer so tests can script a whole session.
use pairsort_core::{worst_case_comparisons, ComparisonTarget, Item, ItemId, RankingSession};
use std::io::{self, BufRead, Write};

use crate::parse::{parse_answer, Answer};
use crate::prompt::{
    build_boundary_question, build_question, format_provisional, progress_line, HELP_TEXT,
};

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    /// The user quit, or input ran out, before every item was placed.
    Quit,
}

fn lookup(session: &RankingSession, id: ItemId) -> io::Result<&Item> {
    session
        .item(id)
        .ok_or_else(|| io::Error::other(format!("session lost track of item {id}")))
}

/// Ask questions until the session is finished or the user quits.
///
/// `restart_seed` is reused for every restart, so a seeded run replays the
/// same presentation order.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut RankingSession,
    input: &mut R,
    out: &mut W,
    restart_seed: Option<u64>,
) -> io::Result<Outcome> {
    let worst_case = worst_case_comparisons(session.num_items());

    loop {
        session.advance();
        let target = session.current_comparison_target();

        match target {
            ComparisonTarget::Finished => return Ok(Outcome::Finished),
            ComparisonTarget::Idle => continue,
            ComparisonTarget::InsertImmediately { .. } => {
                session.insert_immediate().map_err(io::Error::other)?;
                continue;
            }
            ComparisonTarget::Compare { current, opponent, .. } => {
                let question = build_question(lookup(session, current)?, lookup(session, opponent)?);
                writeln!(out, "\n{question}")?;
            }
            ComparisonTarget::Boundary { current } => {
                writeln!(out, "\n{}", build_boundary_question(lookup(session, current)?))?;
            }
        }

        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            tracing::warn!("input closed before ranking finished");
            return Ok(Outcome::Quit);
        }

        match parse_answer(&line, &target) {
            Some(Answer::Decision(decision)) => {
                session.apply(decision).map_err(io::Error::other)?;
                tracing::debug!(?decision, comparisons = session.comparisons_count(), "decision applied");
                writeln!(out, "{}", progress_line(&session.progress(), worst_case))?;
            }
            Some(Answer::ShowOrder) => {
                writeln!(out, "\nProvisional order:")?;
                write!(out, "{}", format_provisional(&session.provisional_order()))?;
            }
            Some(Answer::Restart) => {
                session.restart(restart_seed);
                writeln!(out, "Restarted. Here we go again!")?;
            }
            Some(Answer::Quit) => return Ok(Outcome::Quit),
            Some(Answer::Help) => write!(out, "{HELP_TEXT}")?,
            None => writeln!(out, "Unrecognized answer {:?}. Type ? for help.", line.trim())?,
        }
    }
}
