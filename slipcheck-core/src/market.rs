//! # Markets
//!
//! Canonical market identifiers and the parameters each one needs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! markets {
    ($($variant:ident => $name:literal,)+) => {
        /// Canonical market identifier.
        ///
        /// `Unmapped` marks a market name the normalizer could not resolve; it
        /// always settles as `not_supported`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Market {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl Market {
            /// Every canonical market, `Unmapped` included.
            pub const ALL: &'static [Market] = &[$(Market::$variant),+];

            /// Wire name of the market
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Market::$variant => $name,)+
                }
            }
        }
    };
}

markets! {
    MatchWinner => "MATCH_WINNER",
    DoubleChance => "DOUBLE_CHANCE",
    DrawNoBet => "DRAW_NO_BET",
    OverUnder => "OVER_UNDER",
    Btts => "BTTS",
    TeamOverUnder => "TEAM_OVER_UNDER",
    ExactGoals => "EXACT_GOALS",
    TeamExactGoals => "TEAM_EXACT_GOALS",
    MultiGoals => "MULTI_GOALS",
    OddEven => "ODD_EVEN",
    CorrectScore => "CORRECT_SCORE",
    AsianHandicap => "ASIAN_HANDICAP",
    HandicapResult => "HANDICAP_RESULT",
    CleanSheet => "CLEAN_SHEET",
    WinToNil => "WIN_TO_NIL",
    ResultBtts => "RESULT_BTTS",
    ResultOverUnder => "RESULT_OVER_UNDER",
    MarginOfVictory => "MARGIN_OF_VICTORY",
    HtMatchWinner => "HT_MATCH_WINNER",
    HtOverUnder => "HT_OVER_UNDER",
    HtBtts => "HT_BTTS",
    HtDoubleChance => "HT_DOUBLE_CHANCE",
    HtDrawNoBet => "HT_DRAW_NO_BET",
    HtOddEven => "HT_ODD_EVEN",
    HtCorrectScore => "HT_CORRECT_SCORE",
    HtAsianHandicap => "HT_ASIAN_HANDICAP",
    SecondHalfMatchWinner => "SECOND_HALF_MATCH_WINNER",
    SecondHalfOverUnder => "SECOND_HALF_OVER_UNDER",
    SecondHalfBtts => "SECOND_HALF_BTTS",
    SecondHalfDoubleChance => "SECOND_HALF_DOUBLE_CHANCE",
    SecondHalfDrawNoBet => "SECOND_HALF_DRAW_NO_BET",
    SecondHalfOddEven => "SECOND_HALF_ODD_EVEN",
    SecondHalfCorrectScore => "SECOND_HALF_CORRECT_SCORE",
    HtFt => "HT_FT",
    ToScoreInBothHalves => "TO_SCORE_IN_BOTH_HALVES",
    ToWinEitherHalf => "TO_WIN_EITHER_HALF",
    ToWinBothHalves => "TO_WIN_BOTH_HALVES",
    HighestScoringHalf => "HIGHEST_SCORING_HALF",
    BothHalvesOverUnder => "BOTH_HALVES_OVER_UNDER",
    CornersOverUnder => "CORNERS_OVER_UNDER",
    TeamCornersOverUnder => "TEAM_CORNERS_OVER_UNDER",
    CardsOverUnder => "CARDS_OVER_UNDER",
    TeamCardsOverUnder => "TEAM_CARDS_OVER_UNDER",
    ShotsOverUnder => "SHOTS_OVER_UNDER",
    ShotsOnTargetOverUnder => "SHOTS_ON_TARGET_OVER_UNDER",
    FoulsOverUnder => "FOULS_OVER_UNDER",
    OffsidesOverUnder => "OFFSIDES_OVER_UNDER",
    Unmapped => "UNMAPPED",
}

impl Market {
    /// Markets that can actually be settled (everything except `Unmapped`).
    pub fn supported() -> impl Iterator<Item = Market> {
        Self::ALL.iter().copied().filter(|m| m.is_supported())
    }

    pub fn is_supported(&self) -> bool {
        *self != Market::Unmapped
    }

    /// Whether the selection must carry a numeric `line`.
    pub fn requires_line(&self) -> bool {
        use Market::*;
        matches!(
            self,
            OverUnder
                | HtOverUnder
                | SecondHalfOverUnder
                | TeamOverUnder
                | BothHalvesOverUnder
                | AsianHandicap
                | HtAsianHandicap
                | HandicapResult
                | ResultOverUnder
                | CornersOverUnder
                | TeamCornersOverUnder
                | CardsOverUnder
                | TeamCardsOverUnder
                | ShotsOverUnder
                | ShotsOnTargetOverUnder
                | FoulsOverUnder
                | OffsidesOverUnder
        )
    }

    /// Whether the selection must carry `team` (HOME or AWAY).
    pub fn requires_team(&self) -> bool {
        use Market::*;
        matches!(
            self,
            TeamOverUnder
                | TeamExactGoals
                | CleanSheet
                | ToScoreInBothHalves
                | TeamCornersOverUnder
                | TeamCardsOverUnder
        )
    }

    /// Whether settling needs match statistics in addition to the score.
    pub fn uses_statistics(&self) -> bool {
        use Market::*;
        matches!(
            self,
            CornersOverUnder
                | TeamCornersOverUnder
                | CardsOverUnder
                | TeamCardsOverUnder
                | ShotsOverUnder
                | ShotsOnTargetOverUnder
                | FoulsOverUnder
                | OffsidesOverUnder
        )
    }

    /// Canonical pick vocabulary, as shown to users.
    pub fn pick_format(&self) -> &'static str {
        use Market::*;
        match self {
            MatchWinner | HtMatchWinner | SecondHalfMatchWinner | HandicapResult => {
                "HOME, DRAW or AWAY"
            }
            DoubleChance | HtDoubleChance | SecondHalfDoubleChance => "1X, X2 or 12",
            DrawNoBet | HtDrawNoBet | SecondHalfDrawNoBet | AsianHandicap | HtAsianHandicap
            | WinToNil | ToWinEitherHalf | ToWinBothHalves => "HOME or AWAY",
            Btts | HtBtts | SecondHalfBtts | CleanSheet | ToScoreInBothHalves => "YES or NO",
            OddEven | HtOddEven | SecondHalfOddEven => "ODD or EVEN",
            CorrectScore | HtCorrectScore | SecondHalfCorrectScore => "a score such as 2:1",
            ExactGoals | TeamExactGoals => "a goal count such as 2 or 3+",
            MultiGoals => "a range such as 2-3 or a threshold such as 4+",
            ResultBtts => "RESULT/BTTS such as HOME/YES",
            ResultOverUnder => "RESULT/OVER or RESULT/UNDER such as DRAW/UNDER",
            MarginOfVictory => "DRAW or SIDE:N such as HOME:2 or AWAY:3+",
            HtFt => "HT/FT such as HOME/DRAW or 1/X",
            HighestScoringHalf => "FIRST, SECOND or EQUAL",
            OverUnder | HtOverUnder | SecondHalfOverUnder | TeamOverUnder
            | BothHalvesOverUnder | CornersOverUnder | TeamCornersOverUnder
            | CardsOverUnder | TeamCardsOverUnder | ShotsOverUnder
            | ShotsOnTargetOverUnder | FoulsOverUnder | OffsidesOverUnder => "OVER or UNDER",
            Unmapped => "any",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        for market in Market::ALL {
            let json = serde_json::to_string(market).unwrap();
            assert_eq!(json, format!("\"{}\"", market.as_str()));
        }
    }

    #[test]
    fn test_supported_excludes_unmapped() {
        assert_eq!(Market::supported().count(), Market::ALL.len() - 1);
        assert!(Market::supported().all(|m| m != Market::Unmapped));
    }

    #[test]
    fn test_parameter_requirements() {
        assert!(Market::OverUnder.requires_line());
        assert!(!Market::OverUnder.requires_team());
        assert!(Market::TeamCardsOverUnder.requires_line());
        assert!(Market::TeamCardsOverUnder.requires_team());
        assert!(Market::CleanSheet.requires_team());
        assert!(!Market::CleanSheet.requires_line());
        assert!(!Market::MatchWinner.requires_line());
        assert!(Market::CornersOverUnder.uses_statistics());
        assert!(!Market::HtOverUnder.uses_statistics());
    }
}
