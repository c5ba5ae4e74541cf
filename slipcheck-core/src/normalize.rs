//! # Alias normalization
//!
//! Turns free-form market and pick names (bookmaker catalogue names, `1X2`
//! shorthand, `GG`/`NG`, ...) into canonical [`Selection`]s. Runs strictly
//! before the engine; the engine itself only accepts canonical input.

use crate::error::SelectionError;
use crate::fixture::{FixtureId, Side};
use crate::market::Market;
use crate::selection::Selection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A slip row with free-form market and pick names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub fixture_id: FixtureId,
    pub market: String,
    pub pick: String,
    #[serde(default)]
    pub line: Option<Decimal>,
    #[serde(default)]
    pub team: Option<String>,
}

/// Upper-case, fold separators to `_`, collapse repeats and trim.
fn market_key(name: &str) -> String {
    let mapped: String = name
        .trim()
        .to_uppercase()
        .chars()
        .map(|c| match c {
            '-' | '/' | ' ' | '(' | ')' | '.' | ',' | '?' | '\'' => '_',
            c => c,
        })
        .collect();

    let mut key = String::with_capacity(mapped.len());
    for c in mapped.chars() {
        if c == '_' && key.ends_with('_') {
            continue;
        }
        key.push(c);
    }
    key.trim_matches('_').to_string()
}

/// Resolve a market name or alias. Unknown names map to [`Market::Unmapped`].
pub fn normalize_market(name: &str) -> Market {
    use Market::*;
    match market_key(name).as_str() {
        "MATCH_WINNER" | "1X2" | "MONEYLINE" | "HOME_AWAY" | "FULL_TIME_RESULT" | "FT_RESULT" => {
            MatchWinner
        }
        "DOUBLE_CHANCE" | "DC" => DoubleChance,
        "DRAW_NO_BET" | "DNB" => DrawNoBet,
        "OVER_UNDER" | "GOALS_OVER_UNDER" | "OU" | "TOTAL_GOALS" | "GOALS_OVER_UNDER_ALTERNATIVE" => {
            OverUnder
        }
        "BTTS" | "BOTH_TEAMS_SCORE" | "BOTH_TEAMS_TO_SCORE" | "GGNG" | "GG_NG" => Btts,
        "TEAM_OVER_UNDER" | "TEAM_TOTAL_GOALS" | "TOTAL_HOME" | "TOTAL_AWAY" | "HOME_TEAM_GOALS"
        | "AWAY_TEAM_GOALS" | "HOME_TEAM_OVER_UNDER" | "AWAY_TEAM_OVER_UNDER" => TeamOverUnder,
        "EXACT_GOALS" | "EXACT_GOALS_NUMBER" | "TOTAL_GOALS_EXACT" => ExactGoals,
        "TEAM_EXACT_GOALS" | "HOME_TEAM_EXACT_GOALS" | "AWAY_TEAM_EXACT_GOALS" => TeamExactGoals,
        "MULTI_GOALS" | "MULTIGOALS" | "TOTAL_GOALS_RANGE" => MultiGoals,
        "ODD_EVEN" => OddEven,
        "CORRECT_SCORE" | "EXACT_SCORE" | "CS" => CorrectScore,
        "ASIAN_HANDICAP" | "HANDICAP" | "AH" | "ASIAN_HANDICAP_ALTERNATIVE" => AsianHandicap,
        "HANDICAP_RESULT" | "EUROPEAN_HANDICAP" | "3_WAY_HANDICAP" => HandicapResult,
        "CLEAN_SHEET" | "CLEAN_SHEET_HOME" | "CLEAN_SHEET_AWAY" | "HOME_CLEAN_SHEET"
        | "AWAY_CLEAN_SHEET" => CleanSheet,
        "WIN_TO_NIL" | "HOME_WIN_TO_NIL" | "AWAY_WIN_TO_NIL" | "WIN_TO_NIL_HOME"
        | "WIN_TO_NIL_AWAY" => WinToNil,
        "RESULT_BTTS" | "RESULT_BOTH_TEAMS_SCORE" | "RESULT_BOTH_TEAMS_TO_SCORE"
        | "MATCH_RESULT_AND_BTTS" => ResultBtts,
        "RESULT_OVER_UNDER" | "RESULT_TOTAL_GOALS" | "HOME_AWAY_TOTAL" | "MATCH_RESULT_AND_TOTAL" => {
            ResultOverUnder
        }
        "MARGIN_OF_VICTORY" | "WINNING_MARGIN" => MarginOfVictory,
        "HT_MATCH_WINNER" | "HT_1X2" | "1H_1X2" | "FIRST_HALF_WINNER" | "1ST_HALF_RESULT" => {
            HtMatchWinner
        }
        "HT_OVER_UNDER" | "HT_OU" | "GOALS_OVER_UNDER_FIRST_HALF" | "FIRST_HALF_OVER_UNDER" => {
            HtOverUnder
        }
        "HT_BTTS" | "BOTH_TEAMS_SCORE_FIRST_HALF" | "BOTH_TEAMS_TO_SCORE_FIRST_HALF"
        | "BTTS_FIRST_HALF" | "1H_BTTS" => HtBtts,
        "HT_DOUBLE_CHANCE" | "DOUBLE_CHANCE_FIRST_HALF" | "1H_DOUBLE_CHANCE" => HtDoubleChance,
        "HT_DRAW_NO_BET" | "DRAW_NO_BET_1ST_HALF" | "DNB_1ST_HALF" | "1H_DNB" => HtDrawNoBet,
        "HT_ODD_EVEN" | "ODD_EVEN_FIRST_HALF" | "1H_ODD_EVEN" => HtOddEven,
        "HT_CORRECT_SCORE" | "CORRECT_SCORE_FIRST_HALF" | "EXACT_SCORE_FIRST_HALF" => {
            HtCorrectScore
        }
        "HT_ASIAN_HANDICAP" | "ASIAN_HANDICAP_FIRST_HALF" | "1H_ASIAN_HANDICAP" => HtAsianHandicap,
        "SECOND_HALF_MATCH_WINNER" | "2H_1X2" | "2H_MATCH_WINNER" | "SECOND_HALF_WINNER"
        | "2ND_HALF_RESULT" => SecondHalfMatchWinner,
        "SECOND_HALF_OVER_UNDER" | "2H_OU" | "2H_OVER_UNDER" | "GOALS_OVER_UNDER_SECOND_HALF" => {
            SecondHalfOverUnder
        }
        "SECOND_HALF_BTTS" | "2H_BTTS" | "BOTH_TEAMS_SCORE_SECOND_HALF"
        | "BOTH_TEAMS_TO_SCORE_SECOND_HALF" | "BTTS_SECOND_HALF" => SecondHalfBtts,
        "SECOND_HALF_DOUBLE_CHANCE" | "2H_DOUBLE_CHANCE" | "DOUBLE_CHANCE_SECOND_HALF" => {
            SecondHalfDoubleChance
        }
        "SECOND_HALF_DRAW_NO_BET" | "2H_DNB" | "DRAW_NO_BET_2ND_HALF" | "DNB_2ND_HALF" => {
            SecondHalfDrawNoBet
        }
        "SECOND_HALF_ODD_EVEN" | "2H_ODD_EVEN" | "ODD_EVEN_SECOND_HALF" => SecondHalfOddEven,
        "SECOND_HALF_CORRECT_SCORE" | "2H_CORRECT_SCORE" | "CORRECT_SCORE_SECOND_HALF"
        | "EXACT_SCORE_SECOND_HALF" => SecondHalfCorrectScore,
        "HT_FT" | "HTFT" | "HT_FT_DOUBLE" | "HALF_TIME_FULL_TIME" => HtFt,
        "TO_SCORE_IN_BOTH_HALVES" | "SCORE_BOTH_HALVES_BY_TEAMS" | "TEAM_TO_SCORE_IN_BOTH_HALVES"
        | "SCORE_IN_BOTH_HALVES" => ToScoreInBothHalves,
        "TO_WIN_EITHER_HALF" | "WIN_EITHER_HALF" => ToWinEitherHalf,
        "TO_WIN_BOTH_HALVES" | "WIN_BOTH_HALVES" => ToWinBothHalves,
        "HIGHEST_SCORING_HALF" | "HIGHEST_SCORING_HALF_HOME" | "HIGHEST_SCORING_HALF_AWAY" => {
            HighestScoringHalf
        }
        "BOTH_HALVES_OVER_UNDER" | "BOTH_HALVES_OVER" | "BOTH_HALVES_UNDER" => BothHalvesOverUnder,
        "CORNERS_OVER_UNDER" | "TOTAL_CORNERS" | "CORNERS_OU" => CornersOverUnder,
        "TEAM_CORNERS_OVER_UNDER" | "TEAM_CORNERS_OU" | "HOME_CORNERS_OVER_UNDER"
        | "AWAY_CORNERS_OVER_UNDER" | "HOME_TOTAL_CORNERS" | "AWAY_TOTAL_CORNERS"
        | "HOME_TEAM_TOTAL_CORNERS" | "AWAY_TEAM_TOTAL_CORNERS" => TeamCornersOverUnder,
        "CARDS_OVER_UNDER" | "CARDS_OU" | "TOTAL_CARDS" => CardsOverUnder,
        "TEAM_CARDS_OVER_UNDER" | "TEAM_CARDS_OU" | "HOME_TEAM_TOTAL_CARDS"
        | "AWAY_TEAM_TOTAL_CARDS" => TeamCardsOverUnder,
        "SHOTS_OVER_UNDER" | "TOTAL_SHOTS" | "SHOTS_OU" => ShotsOverUnder,
        "SHOTS_ON_TARGET_OVER_UNDER" | "SHOTS_ON_TARGET" | "TOTAL_SHOTS_ON_TARGET" => {
            ShotsOnTargetOverUnder
        }
        "FOULS_OVER_UNDER" | "TOTAL_FOULS" | "FOULS_OU" => FoulsOverUnder,
        "OFFSIDES_OVER_UNDER" | "TOTAL_OFFSIDES" | "OFFSIDES_OU" => OffsidesOverUnder,
        _ => Unmapped,
    }
}

fn lookup(
    market: Market,
    raw: &str,
    key: &str,
    table: &[(&str, &'static str)],
) -> Result<String, SelectionError> {
    table
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .ok_or_else(|| SelectionError::InvalidPick {
            market: market.to_string(),
            pick: raw.to_string(),
            expected: market.pick_format(),
        })
}

/// Normalize both halves of a `A/B` (or `A-B`) combo pick.
fn combo(
    market: Market,
    raw: &str,
    key: &str,
    left: &[(&str, &'static str)],
    right: &[(&str, &'static str)],
) -> Result<String, SelectionError> {
    let joined = key.replace('-', "/");
    let (a, b) = joined
        .split_once('/')
        .ok_or_else(|| SelectionError::InvalidPick {
            market: market.to_string(),
            pick: raw.to_string(),
            expected: market.pick_format(),
        })?;
    Ok(format!(
        "{}/{}",
        lookup(market, raw, a, left)?,
        lookup(market, raw, b, right)?
    ))
}

const RESULT_ALIASES: &[(&str, &str)] = &[
    ("1", "HOME"),
    ("H", "HOME"),
    ("HOME", "HOME"),
    ("X", "DRAW"),
    ("D", "DRAW"),
    ("DRAW", "DRAW"),
    ("2", "AWAY"),
    ("A", "AWAY"),
    ("AWAY", "AWAY"),
];

const SIDE_ALIASES: &[(&str, &str)] = &[("1", "HOME"), ("HOME", "HOME"), ("2", "AWAY"), ("AWAY", "AWAY")];

const OVER_UNDER_ALIASES: &[(&str, &str)] =
    &[("OVER", "OVER"), ("O", "OVER"), ("UNDER", "UNDER"), ("U", "UNDER")];

const YES_NO_ALIASES: &[(&str, &str)] = &[
    ("YES", "YES"),
    ("Y", "YES"),
    ("GG", "YES"),
    ("NO", "NO"),
    ("N", "NO"),
    ("NG", "NO"),
];

const HALF_ALIASES: &[(&str, &str)] = &[
    ("FIRST", "FIRST"),
    ("1ST", "FIRST"),
    ("1", "FIRST"),
    ("SECOND", "SECOND"),
    ("2ND", "SECOND"),
    ("2", "SECOND"),
    ("EQUAL", "EQUAL"),
    ("TIE", "EQUAL"),
    ("X", "EQUAL"),
];

/// Map a free-form pick to the market's canonical vocabulary.
///
/// Combo picks accept `-` as well as `/` between parts; scores accept `2-1`.
pub fn normalize_pick(market: Market, pick: &str) -> Result<String, SelectionError> {
    use Market::*;

    let key: String = pick.trim().to_uppercase().replace(' ', "");
    let invalid = || SelectionError::InvalidPick {
        market: market.to_string(),
        pick: pick.to_string(),
        expected: market.pick_format(),
    };
    match market {
        MatchWinner | HtMatchWinner | SecondHalfMatchWinner | HandicapResult => {
            lookup(market, pick, &key, RESULT_ALIASES)
        }
        DoubleChance | HtDoubleChance | SecondHalfDoubleChance => {
            let key = match key.as_str() {
                "X1" => "1X",
                "2X" => "X2",
                "21" => "12",
                other => other,
            };
            lookup(market, pick, key, &[("1X", "1X"), ("X2", "X2"), ("12", "12")])
        }
        DrawNoBet | HtDrawNoBet | SecondHalfDrawNoBet | WinToNil | AsianHandicap
        | HtAsianHandicap | ToWinEitherHalf | ToWinBothHalves => {
            lookup(market, pick, &key, SIDE_ALIASES)
        }
        OverUnder | HtOverUnder | SecondHalfOverUnder | TeamOverUnder | BothHalvesOverUnder
        | CornersOverUnder | TeamCornersOverUnder | CardsOverUnder | TeamCardsOverUnder
        | ShotsOverUnder | ShotsOnTargetOverUnder | FoulsOverUnder | OffsidesOverUnder => {
            lookup(market, pick, &key, OVER_UNDER_ALIASES)
        }
        Btts | HtBtts | SecondHalfBtts | CleanSheet | ToScoreInBothHalves => {
            lookup(market, pick, &key, YES_NO_ALIASES)
        }
        OddEven | HtOddEven | SecondHalfOddEven => {
            lookup(market, pick, &key, &[("ODD", "ODD"), ("EVEN", "EVEN")])
        }
        HighestScoringHalf => lookup(market, pick, &key, HALF_ALIASES),
        CorrectScore | HtCorrectScore | SecondHalfCorrectScore => {
            let score = key.replace('-', ":");
            match score.split_once(':') {
                Some((h, a))
                    if !h.is_empty()
                        && !a.is_empty()
                        && h.bytes().chain(a.bytes()).all(|b| b.is_ascii_digit()) =>
                {
                    Ok(score)
                }
                _ => Err(invalid()),
            }
        }
        HtFt => combo(market, pick, &key, RESULT_ALIASES, RESULT_ALIASES),
        ResultBtts => combo(market, pick, &key, RESULT_ALIASES, YES_NO_ALIASES),
        ResultOverUnder => combo(market, pick, &key, RESULT_ALIASES, OVER_UNDER_ALIASES),
        MarginOfVictory => match key.as_str() {
            "DRAW" | "X" => Ok("DRAW".to_string()),
            _ => {
                let joined = key.replace('-', ":");
                let (side, count) = joined.split_once(':').ok_or_else(invalid)?;
                Ok(format!("{}:{}", lookup(market, pick, side, SIDE_ALIASES)?, count))
            }
        },
        ExactGoals | TeamExactGoals | MultiGoals | Unmapped => Ok(key),
    }
}

fn normalize_team(team: Option<&str>) -> Result<Option<Side>, SelectionError> {
    let Some(team) = team.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    match team.to_uppercase().as_str() {
        "HOME" | "H" | "1" => Ok(Some(Side::Home)),
        "AWAY" | "A" | "2" => Ok(Some(Side::Away)),
        _ => Err(SelectionError::InvalidTeam(team.to_string())),
    }
}

impl TableRow {
    /// Normalize into a canonical selection.
    ///
    /// Unknown markets stay `Unmapped` (settled as `not_supported`) and keep
    /// the raw name. Unknown picks and missing line/team are errors.
    pub fn into_selection(self) -> Result<Selection, SelectionError> {
        let market = normalize_market(&self.market);
        if market == Market::Unmapped {
            return Ok(Selection {
                fixture_id: self.fixture_id,
                market,
                pick: self.pick.trim().to_uppercase(),
                line: self.line,
                team: normalize_team(self.team.as_deref()).ok().flatten(),
                raw_market: Some(self.market),
            });
        }

        let pick = normalize_pick(market, &self.pick)?;
        if market.requires_line() && self.line.is_none() {
            return Err(SelectionError::MissingLine {
                market: market.to_string(),
            });
        }

        let team = if market.requires_team() {
            match normalize_team(self.team.as_deref())? {
                Some(side) => Some(side),
                None => {
                    return Err(SelectionError::MissingTeam {
                        market: market.to_string(),
                    })
                }
            }
        } else {
            None
        };

        Ok(Selection {
            fixture_id: self.fixture_id,
            market,
            pick,
            line: self.line,
            team,
            raw_market: None,
        })
    }
}

/// Normalize every row, reporting the first failing row index.
pub fn normalize_rows(rows: Vec<TableRow>) -> crate::error::Result<Vec<Selection>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            row.into_selection()
                .map_err(|source| crate::error::SettlementError::InvalidSelection { index, source })
        })
        .collect()
}
