//! # Market Evaluators
//!
//! Pure functions from a validated [`Wager`] and a [`MatchResult`] to a
//! [`Verdict`]. Every market reduces to one of two primitives, a result
//! category match or a total compared against a line, applied to a period
//! view and optionally filtered to one side.
//!
//! Evaluators never fail: missing data settles as `pending` (or
//! `not_supported` when the provider does not track it), and a wager handed
//! to the wrong evaluator settles as `not_supported`.

use crate::fixture::{MatchResult, Period, Score, Side, Unavailable, Winner};
use crate::outcome::{SettlementStatus, Verdict};
use crate::selection::{Half, Margin, OverUnder, Parity, Wager};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Evaluator signature stored in the registry.
pub type Evaluator = fn(&Wager, &MatchResult) -> Verdict;

/// Compare an integer total with a decimal line.
///
/// A total exactly on the line is a push for both directions.
pub fn compare_line(total: u32, pick: OverUnder, line: Decimal) -> SettlementStatus {
    match (Decimal::from(total).cmp(&line), pick) {
        (Ordering::Equal, _) => SettlementStatus::Push,
        (Ordering::Greater, OverUnder::Over) | (Ordering::Less, OverUnder::Under) => {
            SettlementStatus::Won
        }
        _ => SettlementStatus::Lost,
    }
}

/// Strictly past the line, used by combo markets that never push.
fn beats_line(total: u32, pick: OverUnder, line: Decimal) -> bool {
    compare_line(total, pick, line) == SettlementStatus::Won
}

fn evaluate(f: impl FnOnce() -> Result<Verdict, Unavailable>) -> Verdict {
    f().unwrap_or_else(Verdict::from)
}

fn mismatch(wager: &Wager) -> Verdict {
    Verdict::not_supported(format!("No evaluator for wager {:?}", wager))
}

fn period_scores(result: &MatchResult) -> Result<(Score, Score), Unavailable> {
    Ok((
        result.score(Period::HalfTime)?,
        result.score(Period::SecondHalf)?,
    ))
}

pub fn match_winner(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::MatchWinner { period, pick } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(period)?;
        Ok(Verdict::decide(
            score.winner() == pick,
            format!("{} score {}", period, score),
        ))
    })
}

pub fn double_chance(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::DoubleChance { period, pick } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(period)?;
        Ok(Verdict::decide(
            pick.covers(score.winner()),
            format!("{} score {}", period, score),
        ))
    })
}

pub fn draw_no_bet(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::DrawNoBet { period, side } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(period)?;
        let reason = format!("{} score {}", period, score);
        Ok(match score.winner() {
            Winner::Draw => Verdict::new(SettlementStatus::Push, format!("{}, draw", reason)),
            winner => Verdict::decide(winner == Winner::from(side), reason),
        })
    })
}

pub fn total_goals(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::TotalGoals { period, pick, line } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let total = result.score(period)?.total();
        Ok(Verdict::new(
            compare_line(total, pick, line),
            format!("{} total goals {} vs line {}", period, total, line),
        ))
    })
}

pub fn team_goals(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::TeamGoals { side, pick, line } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let goals = result.score(Period::FullTime)?.side(side);
        Ok(Verdict::new(
            compare_line(goals, pick, line),
            format!("{} goals {} vs line {}", side, goals, line),
        ))
    })
}

pub fn both_teams_to_score(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::BothTeamsToScore { period, yes } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(period)?;
        let both = score.home > 0 && score.away > 0;
        Ok(Verdict::decide(
            both == yes,
            format!("{} score {}", period, score),
        ))
    })
}

pub fn odd_even(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::OddEven { period, pick } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let total = result.score(period)?.total();
        let actual = if total % 2 == 0 { Parity::Even } else { Parity::Odd };
        Ok(Verdict::decide(
            actual == pick,
            format!("{} total goals {}", period, total),
        ))
    })
}

pub fn correct_score(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::CorrectScore { period, score: picked } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(period)?;
        Ok(Verdict::decide(
            score == picked,
            format!("{} score {}", period, score),
        ))
    })
}

pub fn asian_handicap(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::AsianHandicap { period, side, line } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(period)?;
        let Some(adjusted) = shifted(score.side(side), line) else {
            return Ok(line_out_of_range(line));
        };
        let against = Decimal::from(score.against(side));
        let reason = format!(
            "{} score {}, {} adjusted {} vs {}",
            period, score, side, adjusted, against
        );
        Ok(match adjusted.cmp(&against) {
            Ordering::Greater => Verdict::new(SettlementStatus::Won, reason),
            Ordering::Equal => Verdict::new(SettlementStatus::Push, reason),
            Ordering::Less => Verdict::new(SettlementStatus::Lost, reason),
        })
    })
}

pub fn handicap_result(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::HandicapResult { pick, line } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(Period::FullTime)?;
        let Some(home) = shifted(score.home, line) else {
            return Ok(line_out_of_range(line));
        };
        let away = Decimal::from(score.away);
        let actual = match home.cmp(&away) {
            Ordering::Greater => Winner::Home,
            Ordering::Equal => Winner::Draw,
            Ordering::Less => Winner::Away,
        };
        Ok(Verdict::decide(
            actual == pick,
            format!("FT score {}, adjusted home {} vs away {}", score, home, away),
        ))
    })
}

pub fn exact_goals(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::ExactGoals { side, count } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let goals = side_total(result.score(Period::FullTime)?, side);
        let reason = match side {
            Some(side) => format!("{} goals {}", side, goals),
            None => format!("FT total goals {}", goals),
        };
        Ok(Verdict::decide(count.matches(goals), reason))
    })
}

pub fn multi_goals(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::MultiGoals { range } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let total = result.score(Period::FullTime)?.total();
        Ok(Verdict::decide(
            range.contains(total),
            format!("FT total goals {}", total),
        ))
    })
}

pub fn clean_sheet(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::CleanSheet { side, yes } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(Period::FullTime)?;
        Ok(Verdict::decide(
            (score.against(side) == 0) == yes,
            format!("FT score {}", score),
        ))
    })
}

pub fn win_to_nil(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::WinToNil { side } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(Period::FullTime)?;
        Ok(Verdict::decide(
            score.winner() == Winner::from(side) && score.against(side) == 0,
            format!("FT score {}", score),
        ))
    })
}

pub fn result_btts(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::ResultBtts { result: pick, yes } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(Period::FullTime)?;
        let both = score.home > 0 && score.away > 0;
        Ok(Verdict::decide(
            score.winner() == pick && both == yes,
            format!("FT score {}", score),
        ))
    })
}

pub fn result_total(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::ResultTotal { result: pick, pick: direction, line } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(Period::FullTime)?;
        Ok(Verdict::decide(
            score.winner() == pick && beats_line(score.total(), direction, line),
            format!("FT score {}, total {} vs line {}", score, score.total(), line),
        ))
    })
}

pub fn winning_margin(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::WinningMargin { margin } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let score = result.score(Period::FullTime)?;
        let won = match margin {
            Margin::Draw => score.winner() == Winner::Draw,
            Margin::Side(side, count) => score
                .side(side)
                .checked_sub(score.against(side))
                .is_some_and(|lead| lead > 0 && count.matches(lead)),
        };
        Ok(Verdict::decide(won, format!("FT score {}", score)))
    })
}

pub fn half_time_full_time(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::HalfTimeFullTime { half_time, full_time } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let ht = result.score(Period::HalfTime)?;
        let ft = result.score(Period::FullTime)?;
        Ok(Verdict::decide(
            ht.winner() == half_time && ft.winner() == full_time,
            format!("HT/FT {}/{} (HT {}, FT {})", ht.winner(), ft.winner(), ht, ft),
        ))
    })
}

pub fn score_in_both_halves(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::ScoreInBothHalves { side, yes } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let (first, second) = period_scores(result)?;
        let scored = first.side(side) > 0 && second.side(side) > 0;
        Ok(Verdict::decide(
            scored == yes,
            format!("HT {}, 2H {}", first, second),
        ))
    })
}

pub fn win_either_half(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::WinEitherHalf { side } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let (first, second) = period_scores(result)?;
        let target = Winner::from(side);
        Ok(Verdict::decide(
            first.winner() == target || second.winner() == target,
            format!("HT {}, 2H {}", first, second),
        ))
    })
}

pub fn win_both_halves(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::WinBothHalves { side } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let (first, second) = period_scores(result)?;
        let target = Winner::from(side);
        Ok(Verdict::decide(
            first.winner() == target && second.winner() == target,
            format!("HT {}, 2H {}", first, second),
        ))
    })
}

pub fn highest_scoring_half(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::HighestScoringHalf { pick } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let (first, second) = period_scores(result)?;
        let actual = match first.total().cmp(&second.total()) {
            Ordering::Greater => Half::First,
            Ordering::Less => Half::Second,
            Ordering::Equal => Half::Equal,
        };
        Ok(Verdict::decide(
            actual == pick,
            format!("HT total {}, 2H total {}", first.total(), second.total()),
        ))
    })
}

pub fn both_halves_total(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::BothHalvesTotal { pick, line } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let (first, second) = period_scores(result)?;
        Ok(Verdict::decide(
            beats_line(first.total(), pick, line) && beats_line(second.total(), pick, line),
            format!(
                "HT total {}, 2H total {} vs line {}",
                first.total(),
                second.total(),
                line
            ),
        ))
    })
}

pub fn stat_total(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::StatTotal { stat, pick, line } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let total = result.statistic(stat)?.total();
        Ok(Verdict::new(
            compare_line(total, pick, line),
            format!("Total {} {} vs line {}", stat.label(), total, line),
        ))
    })
}

pub fn team_stat_total(wager: &Wager, result: &MatchResult) -> Verdict {
    let &Wager::TeamStatTotal { stat, side, pick, line } = wager else {
        return mismatch(wager);
    };
    evaluate(|| {
        let value = result.statistic(stat)?.side(side);
        Ok(Verdict::new(
            compare_line(value, pick, line),
            format!("{} {} {} vs line {}", side, stat.label(), value, line),
        ))
    })
}

pub fn unsupported(wager: &Wager, _result: &MatchResult) -> Verdict {
    match wager {
        Wager::Unsupported { name } => {
            Verdict::not_supported(format!("Market '{}' is not supported", name))
        }
        other => mismatch(other),
    }
}

/// Goals plus a handicap line, `None` when the sum leaves the decimal range.
fn shifted(goals: u32, line: Decimal) -> Option<Decimal> {
    Decimal::from(goals).checked_add(line)
}

fn line_out_of_range(line: Decimal) -> Verdict {
    Verdict::not_supported(format!("Handicap line {} is out of range", line))
}

/// One side's count, or both sides combined.
fn side_total(score: Score, side: Option<Side>) -> u32 {
    side.map_or(score.total(), |side| score.side(side))
}
