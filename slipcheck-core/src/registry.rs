//! Evaluator registry: a total map from canonical market to evaluator.

use crate::evaluator::{self, Evaluator};
use crate::fixture::MatchResult;
use crate::market::Market;
use crate::outcome::{SettlementStatus, Verdict};
use crate::selection::Wager;

/// Evaluator for a market. Never fails; `Unmapped` gets the unsupported evaluator.
pub fn resolve(market: Market) -> Evaluator {
    use Market::*;
    match market {
        MatchWinner | HtMatchWinner | SecondHalfMatchWinner => evaluator::match_winner,
        DoubleChance | HtDoubleChance | SecondHalfDoubleChance => evaluator::double_chance,
        DrawNoBet | HtDrawNoBet | SecondHalfDrawNoBet => evaluator::draw_no_bet,
        OverUnder | HtOverUnder | SecondHalfOverUnder => evaluator::total_goals,
        TeamOverUnder => evaluator::team_goals,
        Btts | HtBtts | SecondHalfBtts => evaluator::both_teams_to_score,
        OddEven | HtOddEven | SecondHalfOddEven => evaluator::odd_even,
        CorrectScore | HtCorrectScore | SecondHalfCorrectScore => evaluator::correct_score,
        AsianHandicap | HtAsianHandicap => evaluator::asian_handicap,
        HandicapResult => evaluator::handicap_result,
        ExactGoals | TeamExactGoals => evaluator::exact_goals,
        MultiGoals => evaluator::multi_goals,
        CleanSheet => evaluator::clean_sheet,
        WinToNil => evaluator::win_to_nil,
        ResultBtts => evaluator::result_btts,
        ResultOverUnder => evaluator::result_total,
        MarginOfVictory => evaluator::winning_margin,
        HtFt => evaluator::half_time_full_time,
        ToScoreInBothHalves => evaluator::score_in_both_halves,
        ToWinEitherHalf => evaluator::win_either_half,
        ToWinBothHalves => evaluator::win_both_halves,
        HighestScoringHalf => evaluator::highest_scoring_half,
        BothHalvesOverUnder => evaluator::both_halves_total,
        CornersOverUnder | CardsOverUnder | ShotsOverUnder | ShotsOnTargetOverUnder
        | FoulsOverUnder | OffsidesOverUnder => evaluator::stat_total,
        TeamCornersOverUnder | TeamCardsOverUnder => evaluator::team_stat_total,
        Unmapped => evaluator::unsupported,
    }
}

/// Settle one wager against a fixture result.
///
/// Cancelled and postponed fixtures settle every market as cancelled before
/// any evaluator runs.
pub fn settle(market: Market, wager: &Wager, result: &MatchResult) -> Verdict {
    if result.status.is_void() {
        return Verdict::new(
            SettlementStatus::Cancelled,
            format!(
                "Fixture {} cancelled or postponed (status {})",
                result.fixture_id, result.status_code
            ),
        );
    }
    resolve(market)(wager, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{FixtureStatus, Side, StatKind, StatLine};
    use crate::selection::Selection;
    use crate::test_utils::{finished, with_stat};
    use rust_decimal_macros::dec;

    fn sample_selection(market: Market) -> Selection {
        use Market::*;
        let pick = match market {
            MatchWinner | HtMatchWinner | SecondHalfMatchWinner | HandicapResult => "HOME",
            DoubleChance | HtDoubleChance | SecondHalfDoubleChance => "1X",
            Btts | HtBtts | SecondHalfBtts | CleanSheet | ToScoreInBothHalves => "YES",
            OddEven | HtOddEven | SecondHalfOddEven => "ODD",
            CorrectScore | HtCorrectScore | SecondHalfCorrectScore => "1:0",
            ExactGoals | TeamExactGoals => "1+",
            MultiGoals => "1-3",
            ResultBtts => "HOME/NO",
            ResultOverUnder => "HOME/UNDER",
            MarginOfVictory => "HOME:1+",
            HtFt => "HOME/HOME",
            HighestScoringHalf => "FIRST",
            m if m.pick_format() == "HOME or AWAY" => "HOME",
            m if m.pick_format() == "OVER or UNDER" => "OVER",
            _ => "ANY",
        };
        let mut selection = Selection::new(1, market, pick)
            .with_line(dec!(0.5))
            .with_team(Side::Home);
        selection.raw_market = Some("Player Cards".to_string());
        selection
    }

    #[test]
    fn test_every_supported_market_settles() {
        let mut result = finished(2, 0, 1, 0);
        for kind in StatKind::ALL {
            result = with_stat(result, kind, StatLine::Recorded { home: 3, away: 1 });
        }

        for market in Market::supported() {
            let selection = sample_selection(market);
            let wager = selection
                .wager()
                .unwrap_or_else(|e| panic!("{market}: {e}"));
            let verdict = settle(market, &wager, &result);
            assert!(
                matches!(
                    verdict.status,
                    SettlementStatus::Won | SettlementStatus::Lost | SettlementStatus::Push
                ),
                "{market} settled as {} ({})",
                verdict.status,
                verdict.reason
            );
        }
    }

    #[test]
    fn test_unmapped_resolves_to_not_supported() {
        let selection = sample_selection(Market::Unmapped);
        let wager = selection.wager().unwrap();
        let verdict = settle(Market::Unmapped, &wager, &finished(1, 0, 0, 0));
        assert_eq!(verdict.status, SettlementStatus::NotSupported);
        assert!(verdict.reason.contains("Player Cards"));
    }

    #[test]
    fn test_cancelled_fixture_overrides_evaluation() {
        let mut result = finished(2, 0, 1, 0);
        result.status = FixtureStatus::Postponed;
        result.status_code = "PST".to_string();

        let wager = sample_selection(Market::MatchWinner).wager().unwrap();
        let verdict = settle(Market::MatchWinner, &wager, &result);
        assert_eq!(verdict.status, SettlementStatus::Cancelled);
        assert!(verdict.reason.contains("PST"));
    }

    #[test]
    fn test_total_on_the_line_pushes() {
        // 2-1 at FT, 1-0 at HT, 1-1 in the second half
        let mut result = finished(2, 1, 1, 0);
        for kind in StatKind::ALL {
            result = with_stat(result, kind, StatLine::Recorded { home: 4, away: 2 });
        }

        let line_markets: Vec<Market> = Market::supported()
            .filter(|m| m.requires_line() && m.pick_format() == "OVER or UNDER")
            .filter(|m| *m != Market::BothHalvesOverUnder)
            .collect();
        assert!(line_markets.len() >= 12);

        for market in line_markets {
            let line = match market {
                Market::OverUnder => dec!(3),
                Market::HtOverUnder => dec!(1),
                Market::SecondHalfOverUnder => dec!(2),
                Market::TeamOverUnder => dec!(2),
                m if m.requires_team() => dec!(4),
                _ => dec!(6),
            };
            for pick in ["OVER", "UNDER"] {
                let wager = Selection::new(1, market, pick)
                    .with_line(line)
                    .with_team(Side::Home)
                    .wager()
                    .unwrap_or_else(|e| panic!("{market}: {e}"));
                let verdict = settle(market, &wager, &result);
                assert_eq!(
                    verdict.status,
                    SettlementStatus::Push,
                    "{market} {pick} on line {line}: {}",
                    verdict.reason
                );
            }
        }
    }
}
