//! # Selections
//!
//! A [`Selection`] is one leg of a slip as it arrives on the wire. Before
//! anything is fetched it is validated into a [`Wager`], a closed sum type
//! whose variants carry exactly the parameters their market needs.

use crate::error::SelectionError;
use crate::fixture::{FixtureId, Period, Score, Side, StatKind, Winner};
use crate::market::Market;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One leg of a bet slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub fixture_id: FixtureId,
    pub market: Market,
    /// Pick in the market's canonical vocabulary
    pub pick: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Side>,
    /// Original market name when normalization left the market unmapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_market: Option<String>,
}

/// Over/under direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverUnder {
    Over,
    Under,
}

/// Double chance coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleChance {
    HomeOrDraw,
    DrawOrAway,
    HomeOrAway,
}

impl DoubleChance {
    pub fn covers(&self, winner: Winner) -> bool {
        match self {
            DoubleChance::HomeOrDraw => winner != Winner::Away,
            DoubleChance::DrawOrAway => winner != Winner::Home,
            DoubleChance::HomeOrAway => winner != Winner::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Odd,
    Even,
}

/// Which half produced more goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    First,
    Second,
    Equal,
}

/// `N` (exactly) or `N+` (at least).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalCount {
    Exactly(u32),
    AtLeast(u32),
}

impl GoalCount {
    pub fn matches(&self, value: u32) -> bool {
        match *self {
            GoalCount::Exactly(n) => value == n,
            GoalCount::AtLeast(n) => value >= n,
        }
    }
}

/// `A-B` (inclusive) or `N+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalRange {
    Between(u32, u32),
    AtLeast(u32),
}

impl GoalRange {
    pub fn contains(&self, value: u32) -> bool {
        match *self {
            GoalRange::Between(low, high) => (low..=high).contains(&value),
            GoalRange::AtLeast(low) => value >= low,
        }
    }
}

/// Winning margin pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    Draw,
    Side(Side, GoalCount),
}

/// A validated selection, ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wager {
    MatchWinner { period: Period, pick: Winner },
    DoubleChance { period: Period, pick: DoubleChance },
    DrawNoBet { period: Period, side: Side },
    TotalGoals { period: Period, pick: OverUnder, line: Decimal },
    TeamGoals { side: Side, pick: OverUnder, line: Decimal },
    BothTeamsToScore { period: Period, yes: bool },
    OddEven { period: Period, pick: Parity },
    CorrectScore { period: Period, score: Score },
    AsianHandicap { period: Period, side: Side, line: Decimal },
    HandicapResult { pick: Winner, line: Decimal },
    ExactGoals { side: Option<Side>, count: GoalCount },
    MultiGoals { range: GoalRange },
    CleanSheet { side: Side, yes: bool },
    WinToNil { side: Side },
    ResultBtts { result: Winner, yes: bool },
    ResultTotal { result: Winner, pick: OverUnder, line: Decimal },
    WinningMargin { margin: Margin },
    HalfTimeFullTime { half_time: Winner, full_time: Winner },
    ScoreInBothHalves { side: Side, yes: bool },
    WinEitherHalf { side: Side },
    WinBothHalves { side: Side },
    HighestScoringHalf { pick: Half },
    BothHalvesTotal { pick: OverUnder, line: Decimal },
    StatTotal { stat: StatKind, pick: OverUnder, line: Decimal },
    TeamStatTotal { stat: StatKind, side: Side, pick: OverUnder, line: Decimal },
    /// Market the engine cannot settle
    Unsupported { name: String },
}

impl Selection {
    pub fn new(fixture_id: u64, market: Market, pick: impl Into<String>) -> Self {
        Self {
            fixture_id: FixtureId(fixture_id),
            market,
            pick: pick.into(),
            line: None,
            team: None,
            raw_market: None,
        }
    }

    pub fn with_line(mut self, line: Decimal) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_team(mut self, team: Side) -> Self {
        self.team = Some(team);
        self
    }

    /// Market name as reported back: the raw name for unmapped markets.
    pub fn market_label(&self) -> String {
        match (&self.market, &self.raw_market) {
            (Market::Unmapped, Some(raw)) => raw.clone(),
            (market, _) => market.as_str().to_string(),
        }
    }

    /// Validate the selection against its market's parameter requirements.
    pub fn wager(&self) -> Result<Wager, SelectionError> {
        use Market::*;

        if self.fixture_id.0 == 0 {
            return Err(SelectionError::InvalidFixtureId);
        }

        let market = self.market;
        let line = match (market.requires_line(), self.line) {
            (true, None) => {
                return Err(SelectionError::MissingLine {
                    market: market.to_string(),
                })
            }
            (_, line) => line.unwrap_or_default(),
        };
        let team = match (market.requires_team(), self.team) {
            (true, None) => {
                return Err(SelectionError::MissingTeam {
                    market: market.to_string(),
                })
            }
            (_, team) => team.unwrap_or(Side::Home),
        };

        let picks = PickParser::new(market, &self.pick);
        let wager = match market {
            MatchWinner => Wager::MatchWinner { period: Period::FullTime, pick: picks.winner()? },
            HtMatchWinner => Wager::MatchWinner { period: Period::HalfTime, pick: picks.winner()? },
            SecondHalfMatchWinner => {
                Wager::MatchWinner { period: Period::SecondHalf, pick: picks.winner()? }
            }
            DoubleChance => {
                Wager::DoubleChance { period: Period::FullTime, pick: picks.double_chance()? }
            }
            HtDoubleChance => {
                Wager::DoubleChance { period: Period::HalfTime, pick: picks.double_chance()? }
            }
            SecondHalfDoubleChance => {
                Wager::DoubleChance { period: Period::SecondHalf, pick: picks.double_chance()? }
            }
            DrawNoBet => Wager::DrawNoBet { period: Period::FullTime, side: picks.side()? },
            HtDrawNoBet => Wager::DrawNoBet { period: Period::HalfTime, side: picks.side()? },
            SecondHalfDrawNoBet => {
                Wager::DrawNoBet { period: Period::SecondHalf, side: picks.side()? }
            }
            OverUnder => {
                Wager::TotalGoals { period: Period::FullTime, pick: picks.over_under()?, line }
            }
            HtOverUnder => {
                Wager::TotalGoals { period: Period::HalfTime, pick: picks.over_under()?, line }
            }
            SecondHalfOverUnder => {
                Wager::TotalGoals { period: Period::SecondHalf, pick: picks.over_under()?, line }
            }
            TeamOverUnder => Wager::TeamGoals { side: team, pick: picks.over_under()?, line },
            Btts => Wager::BothTeamsToScore { period: Period::FullTime, yes: picks.yes_no()? },
            HtBtts => Wager::BothTeamsToScore { period: Period::HalfTime, yes: picks.yes_no()? },
            SecondHalfBtts => {
                Wager::BothTeamsToScore { period: Period::SecondHalf, yes: picks.yes_no()? }
            }
            OddEven => Wager::OddEven { period: Period::FullTime, pick: picks.parity()? },
            HtOddEven => Wager::OddEven { period: Period::HalfTime, pick: picks.parity()? },
            SecondHalfOddEven => Wager::OddEven { period: Period::SecondHalf, pick: picks.parity()? },
            CorrectScore => Wager::CorrectScore { period: Period::FullTime, score: picks.score()? },
            HtCorrectScore => {
                Wager::CorrectScore { period: Period::HalfTime, score: picks.score()? }
            }
            SecondHalfCorrectScore => {
                Wager::CorrectScore { period: Period::SecondHalf, score: picks.score()? }
            }
            AsianHandicap => {
                Wager::AsianHandicap { period: Period::FullTime, side: picks.side()?, line }
            }
            HtAsianHandicap => {
                Wager::AsianHandicap { period: Period::HalfTime, side: picks.side()?, line }
            }
            HandicapResult => Wager::HandicapResult { pick: picks.winner()?, line },
            ExactGoals => Wager::ExactGoals { side: None, count: picks.goal_count()? },
            TeamExactGoals => Wager::ExactGoals { side: Some(team), count: picks.goal_count()? },
            MultiGoals => Wager::MultiGoals { range: picks.goal_range()? },
            CleanSheet => Wager::CleanSheet { side: team, yes: picks.yes_no()? },
            WinToNil => Wager::WinToNil { side: picks.side()? },
            ResultBtts => {
                let (result, yes) = picks.result_btts()?;
                Wager::ResultBtts { result, yes }
            }
            ResultOverUnder => {
                let (result, pick) = picks.result_over_under()?;
                Wager::ResultTotal { result, pick, line }
            }
            MarginOfVictory => Wager::WinningMargin { margin: picks.margin()? },
            HtFt => {
                let (half_time, full_time) = picks.half_time_full_time()?;
                Wager::HalfTimeFullTime { half_time, full_time }
            }
            ToScoreInBothHalves => Wager::ScoreInBothHalves { side: team, yes: picks.yes_no()? },
            ToWinEitherHalf => Wager::WinEitherHalf { side: picks.side()? },
            ToWinBothHalves => Wager::WinBothHalves { side: picks.side()? },
            HighestScoringHalf => Wager::HighestScoringHalf { pick: picks.half()? },
            BothHalvesOverUnder => Wager::BothHalvesTotal { pick: picks.over_under()?, line },
            CornersOverUnder => stat_total(StatKind::Corners, &picks, line)?,
            CardsOverUnder => stat_total(StatKind::Cards, &picks, line)?,
            ShotsOverUnder => stat_total(StatKind::Shots, &picks, line)?,
            ShotsOnTargetOverUnder => stat_total(StatKind::ShotsOnTarget, &picks, line)?,
            FoulsOverUnder => stat_total(StatKind::Fouls, &picks, line)?,
            OffsidesOverUnder => stat_total(StatKind::Offsides, &picks, line)?,
            TeamCornersOverUnder => Wager::TeamStatTotal {
                stat: StatKind::Corners,
                side: team,
                pick: picks.over_under()?,
                line,
            },
            TeamCardsOverUnder => Wager::TeamStatTotal {
                stat: StatKind::Cards,
                side: team,
                pick: picks.over_under()?,
                line,
            },
            Unmapped => Wager::Unsupported {
                name: self.market_label(),
            },
        };
        Ok(wager)
    }
}

fn stat_total(stat: StatKind, picks: &PickParser<'_>, line: Decimal) -> Result<Wager, SelectionError> {
    Ok(Wager::StatTotal {
        stat,
        pick: picks.over_under()?,
        line,
    })
}

/// Parses a canonical pick for one market.
struct PickParser<'a> {
    market: Market,
    raw: &'a str,
    pick: String,
}

impl<'a> PickParser<'a> {
    fn new(market: Market, raw: &'a str) -> Self {
        Self {
            market,
            raw,
            pick: raw.trim().to_ascii_uppercase(),
        }
    }

    fn invalid(&self) -> SelectionError {
        SelectionError::InvalidPick {
            market: self.market.to_string(),
            pick: self.raw.to_string(),
            expected: self.market.pick_format(),
        }
    }

    fn winner(&self) -> Result<Winner, SelectionError> {
        parse_winner(&self.pick).ok_or_else(|| self.invalid())
    }

    fn side(&self) -> Result<Side, SelectionError> {
        parse_side(&self.pick).ok_or_else(|| self.invalid())
    }

    fn over_under(&self) -> Result<OverUnder, SelectionError> {
        parse_over_under(&self.pick).ok_or_else(|| self.invalid())
    }

    fn yes_no(&self) -> Result<bool, SelectionError> {
        parse_yes_no(&self.pick).ok_or_else(|| self.invalid())
    }

    fn double_chance(&self) -> Result<DoubleChance, SelectionError> {
        match self.pick.as_str() {
            "1X" => Ok(DoubleChance::HomeOrDraw),
            "X2" => Ok(DoubleChance::DrawOrAway),
            "12" => Ok(DoubleChance::HomeOrAway),
            _ => Err(self.invalid()),
        }
    }

    fn parity(&self) -> Result<Parity, SelectionError> {
        match self.pick.as_str() {
            "ODD" => Ok(Parity::Odd),
            "EVEN" => Ok(Parity::Even),
            _ => Err(self.invalid()),
        }
    }

    fn half(&self) -> Result<Half, SelectionError> {
        match self.pick.as_str() {
            "FIRST" => Ok(Half::First),
            "SECOND" => Ok(Half::Second),
            "EQUAL" => Ok(Half::Equal),
            _ => Err(self.invalid()),
        }
    }

    fn score(&self) -> Result<Score, SelectionError> {
        let (home, away) = self.pick.split_once(':').ok_or_else(|| self.invalid())?;
        match (parse_count(home), parse_count(away)) {
            (Some(home), Some(away)) => Ok(Score::new(home, away)),
            _ => Err(self.invalid()),
        }
    }

    fn goal_count(&self) -> Result<GoalCount, SelectionError> {
        parse_goal_count(&self.pick).ok_or_else(|| self.invalid())
    }

    fn goal_range(&self) -> Result<GoalRange, SelectionError> {
        if let Some(low) = self.pick.strip_suffix('+') {
            return parse_count(low).map(GoalRange::AtLeast).ok_or_else(|| self.invalid());
        }
        let (low, high) = self.pick.split_once('-').ok_or_else(|| self.invalid())?;
        match (parse_count(low), parse_count(high)) {
            (Some(low), Some(high)) if low <= high => Ok(GoalRange::Between(low, high)),
            _ => Err(self.invalid()),
        }
    }

    fn margin(&self) -> Result<Margin, SelectionError> {
        if self.pick == "DRAW" {
            return Ok(Margin::Draw);
        }
        let (side, count) = self.pick.split_once(':').ok_or_else(|| self.invalid())?;
        match (parse_side(side), parse_goal_count(count)) {
            (Some(side), Some(count)) if !count.matches(0) => Ok(Margin::Side(side, count)),
            _ => Err(self.invalid()),
        }
    }

    fn result_btts(&self) -> Result<(Winner, bool), SelectionError> {
        let (result, btts) = self.pick.split_once('/').ok_or_else(|| self.invalid())?;
        match (parse_winner(result), parse_yes_no(btts)) {
            (Some(result), Some(yes)) => Ok((result, yes)),
            _ => Err(self.invalid()),
        }
    }

    fn result_over_under(&self) -> Result<(Winner, OverUnder), SelectionError> {
        let (result, total) = self.pick.split_once('/').ok_or_else(|| self.invalid())?;
        match (parse_winner(result), parse_over_under(total)) {
            (Some(result), Some(pick)) => Ok((result, pick)),
            _ => Err(self.invalid()),
        }
    }

    fn half_time_full_time(&self) -> Result<(Winner, Winner), SelectionError> {
        let (ht, ft) = self.pick.split_once('/').ok_or_else(|| self.invalid())?;
        match (parse_result_token(ht), parse_result_token(ft)) {
            (Some(ht), Some(ft)) => Ok((ht, ft)),
            _ => Err(self.invalid()),
        }
    }
}

fn parse_winner(token: &str) -> Option<Winner> {
    match token {
        "HOME" => Some(Winner::Home),
        "DRAW" => Some(Winner::Draw),
        "AWAY" => Some(Winner::Away),
        _ => None,
    }
}

/// HOME/DRAW/AWAY or the 1/X/2 shorthand.
fn parse_result_token(token: &str) -> Option<Winner> {
    match token {
        "1" => Some(Winner::Home),
        "X" => Some(Winner::Draw),
        "2" => Some(Winner::Away),
        other => parse_winner(other),
    }
}

fn parse_side(token: &str) -> Option<Side> {
    match token {
        "HOME" => Some(Side::Home),
        "AWAY" => Some(Side::Away),
        _ => None,
    }
}

fn parse_over_under(token: &str) -> Option<OverUnder> {
    match token {
        "OVER" => Some(OverUnder::Over),
        "UNDER" => Some(OverUnder::Under),
        _ => None,
    }
}

fn parse_yes_no(token: &str) -> Option<bool> {
    match token {
        "YES" => Some(true),
        "NO" => Some(false),
        _ => None,
    }
}

fn parse_count(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn parse_goal_count(token: &str) -> Option<GoalCount> {
    match token.strip_suffix('+') {
        Some(n) => parse_count(n).map(GoalCount::AtLeast),
        None => parse_count(token).map(GoalCount::Exactly),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_fixture_id_rejected() {
        let err = Selection::new(0, Market::MatchWinner, "HOME").wager().unwrap_err();
        assert_eq!(err, SelectionError::InvalidFixtureId);
    }

    #[test]
    fn test_team_deserializes_case_insensitively() {
        let selection: Selection = serde_json::from_value(serde_json::json!({
            "fixture_id": 1035037,
            "market": "CLEAN_SHEET",
            "pick": "YES",
            "team": "home"
        }))
        .unwrap();
        assert_eq!(selection.team, Some(Side::Home));
        assert_eq!(
            selection.wager().unwrap(),
            Wager::CleanSheet {
                side: Side::Home,
                yes: true
            }
        );

        let bad = serde_json::from_value::<Selection>(serde_json::json!({
            "fixture_id": 1,
            "market": "CLEAN_SHEET",
            "pick": "YES",
            "team": "middle"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_match_winner_wager() {
        let wager = Selection::new(1, Market::MatchWinner, "home").wager().unwrap();
        assert_eq!(
            wager,
            Wager::MatchWinner {
                period: Period::FullTime,
                pick: Winner::Home
            }
        );
    }

    #[test]
    fn test_missing_line() {
        let err = Selection::new(1, Market::OverUnder, "OVER").wager().unwrap_err();
        assert_eq!(
            err,
            SelectionError::MissingLine {
                market: "OVER_UNDER".to_string()
            }
        );
    }

    #[test]
    fn test_missing_team() {
        let err = Selection::new(1, Market::TeamOverUnder, "OVER")
            .with_line(dec!(1.5))
            .wager()
            .unwrap_err();
        assert!(matches!(err, SelectionError::MissingTeam { .. }));
    }

    #[test]
    fn test_invalid_pick_reports_vocabulary() {
        let err = Selection::new(1, Market::DoubleChance, "2X").wager().unwrap_err();
        match err {
            SelectionError::InvalidPick { pick, expected, .. } => {
                assert_eq!(pick, "2X");
                assert_eq!(expected, "1X, X2 or 12");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_team_market_wagers() {
        let wager = Selection::new(1, Market::TeamCardsOverUnder, "UNDER")
            .with_line(dec!(2.5))
            .with_team(Side::Away)
            .wager()
            .unwrap();
        assert_eq!(
            wager,
            Wager::TeamStatTotal {
                stat: StatKind::Cards,
                side: Side::Away,
                pick: OverUnder::Under,
                line: dec!(2.5)
            }
        );
    }

    #[test]
    fn test_score_and_combo_picks() {
        let wager = Selection::new(1, Market::CorrectScore, "2:1").wager().unwrap();
        assert_eq!(
            wager,
            Wager::CorrectScore {
                period: Period::FullTime,
                score: Score::new(2, 1)
            }
        );

        let wager = Selection::new(1, Market::HtFt, "1/X").wager().unwrap();
        assert_eq!(
            wager,
            Wager::HalfTimeFullTime {
                half_time: Winner::Home,
                full_time: Winner::Draw
            }
        );

        assert!(Selection::new(1, Market::CorrectScore, "2-1").wager().is_err());
        assert!(Selection::new(1, Market::CorrectScore, "a:1").wager().is_err());
    }

    #[test]
    fn test_count_and_range_picks() {
        let wager = Selection::new(1, Market::MultiGoals, "2-3").wager().unwrap();
        assert_eq!(wager, Wager::MultiGoals { range: GoalRange::Between(2, 3) });

        let wager = Selection::new(1, Market::ExactGoals, "4+").wager().unwrap();
        assert_eq!(
            wager,
            Wager::ExactGoals {
                side: None,
                count: GoalCount::AtLeast(4)
            }
        );

        assert!(Selection::new(1, Market::MultiGoals, "3-2").wager().is_err());
        assert!(Selection::new(1, Market::MarginOfVictory, "HOME:0").wager().is_err());

        let wager = Selection::new(1, Market::MarginOfVictory, "AWAY:2+").wager().unwrap();
        assert_eq!(
            wager,
            Wager::WinningMargin {
                margin: Margin::Side(Side::Away, GoalCount::AtLeast(2))
            }
        );
    }

    #[test]
    fn test_unmapped_market_is_unsupported() {
        let mut selection = Selection::new(9, Market::Unmapped, "HOME");
        selection.raw_market = Some("First Goal Scorer".to_string());
        assert_eq!(
            selection.wager().unwrap(),
            Wager::Unsupported {
                name: "First Goal Scorer".to_string()
            }
        );
        assert_eq!(selection.market_label(), "First Goal Scorer");
    }

    #[test]
    fn test_selection_json() {
        let json = r#"{"fixture_id": 42, "market": "OVER_UNDER", "pick": "OVER", "line": 2.5}"#;
        let selection: Selection = serde_json::from_str(json).unwrap();
        assert_eq!(selection.fixture_id, FixtureId(42));
        assert_eq!(selection.line, Some(dec!(2.5)));
        assert_eq!(selection.team, None);
    }
}
