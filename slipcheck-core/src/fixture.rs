//! # Match Result Model
//!
//! Provider-independent snapshot of what happened in a fixture, plus the
//! period views (full time, first half, second half) markets are settled on.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque fixture identifier issued by the data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(pub u64);

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FixtureId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Lifecycle state of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixtureStatus {
    NotStarted,
    InPlay,
    Finished,
    Postponed,
    Cancelled,
    Unknown,
}

impl FixtureStatus {
    /// Map an API-Sports short status code.
    pub fn from_short_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "TBD" | "NS" => Self::NotStarted,
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "SUSP" | "INT" | "LIVE" => Self::InPlay,
            "FT" | "AET" | "PEN" | "AWD" | "WO" => Self::Finished,
            "PST" => Self::Postponed,
            "CANC" | "ABD" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    /// Fixtures that will never produce a result; every market settles as cancelled.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Postponed)
    }
}

/// Whether a short status code says the first half is over.
pub fn first_half_complete(code: &str) -> bool {
    matches!(
        code.trim().to_ascii_uppercase().as_str(),
        "HT" | "2H" | "ET" | "BT" | "P" | "FT" | "AET" | "PEN"
    )
}

/// Goals (or any per-side count) for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    pub fn total(&self) -> u32 {
        self.home + self.away
    }

    /// Result category of this score
    pub fn winner(&self) -> Winner {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Winner::Home,
            std::cmp::Ordering::Equal => Winner::Draw,
            std::cmp::Ordering::Less => Winner::Away,
        }
    }

    pub fn side(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// Count for the opponent of `side`.
    pub fn against(&self, side: Side) -> u32 {
        self.side(side.opponent())
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Team side of a fixture. Deserializes case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Home,
    Away,
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_uppercase().as_str() {
            "HOME" => Ok(Side::Home),
            "AWAY" => Ok(Side::Away),
            _ => Err(de::Error::unknown_variant(&raw, &["HOME", "AWAY"])),
        }
    }
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "HOME",
            Side::Away => "AWAY",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result category of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Winner {
    Home,
    Draw,
    Away,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::Home => "HOME",
            Winner::Draw => "DRAW",
            Winner::Away => "AWAY",
        }
    }
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Home => Winner::Home,
            Side::Away => Winner::Away,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window a market is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    FullTime,
    HalfTime,
    SecondHalf,
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::FullTime => "FT",
            Period::HalfTime => "HT",
            Period::SecondHalf => "2H",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Match statistics the provider may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Corners,
    Cards,
    Shots,
    ShotsOnTarget,
    Fouls,
    Offsides,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Corners,
        StatKind::Cards,
        StatKind::Shots,
        StatKind::ShotsOnTarget,
        StatKind::Fouls,
        StatKind::Offsides,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Corners => "corners",
            StatKind::Cards => "cards",
            StatKind::Shots => "shots",
            StatKind::ShotsOnTarget => "shots on target",
            StatKind::Fouls => "fouls",
            StatKind::Offsides => "offsides",
        }
    }
}

/// Availability of one statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatLine {
    Recorded { home: u32, away: u32 },
    /// Not populated yet; may appear on a later request.
    #[default]
    Pending,
    /// Not tracked by the provider for this competition.
    Untracked,
}

/// Per-fixture statistics, one line per [`StatKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub corners: StatLine,
    pub cards: StatLine,
    pub shots: StatLine,
    pub shots_on_target: StatLine,
    pub fouls: StatLine,
    pub offsides: StatLine,
}

impl Statistics {
    pub fn get(&self, kind: StatKind) -> StatLine {
        match kind {
            StatKind::Corners => self.corners,
            StatKind::Cards => self.cards,
            StatKind::Shots => self.shots,
            StatKind::ShotsOnTarget => self.shots_on_target,
            StatKind::Fouls => self.fouls,
            StatKind::Offsides => self.offsides,
        }
    }

    pub fn set(&mut self, kind: StatKind, line: StatLine) {
        let slot = match kind {
            StatKind::Corners => &mut self.corners,
            StatKind::Cards => &mut self.cards,
            StatKind::Shots => &mut self.shots,
            StatKind::ShotsOnTarget => &mut self.shots_on_target,
            StatKind::Fouls => &mut self.fouls,
            StatKind::Offsides => &mut self.offsides,
        };
        *slot = line;
    }
}

/// Why a view of the match cannot be computed yet (or at all).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// Transient: a later request may succeed.
    Pending(String),
    /// Permanent: the provider does not carry this data.
    Untracked(String),
}

/// Immutable snapshot of a fixture's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub fixture_id: FixtureId,
    pub status: FixtureStatus,
    /// Raw provider status code (e.g. `FT`, `AET`, `HT`)
    pub status_code: String,
    /// Full-time score, or the running score while in play
    pub fulltime: Option<Score>,
    pub halftime: Option<Score>,
    /// Provider reports the first half as over
    pub halftime_complete: bool,
    #[serde(default)]
    pub statistics: Statistics,
}

impl MatchResult {
    /// Score for a period view.
    ///
    /// Full-time and second-half views require a finished fixture. The
    /// half-time view also resolves in play once the first half is over.
    pub fn score(&self, period: Period) -> Result<Score, Unavailable> {
        match period {
            Period::FullTime => {
                self.require_finished(period)?;
                self.fulltime
                    .ok_or_else(|| Unavailable::Pending("Missing fulltime score".to_string()))
            }
            Period::HalfTime => {
                let in_play_break = self.status == FixtureStatus::InPlay && self.halftime_complete;
                if self.status != FixtureStatus::Finished && !in_play_break {
                    return Err(Unavailable::Pending(format!(
                        "First half not complete (status {})",
                        self.status_code
                    )));
                }
                self.halftime
                    .ok_or_else(|| Unavailable::Pending("Missing halftime score".to_string()))
            }
            Period::SecondHalf => {
                self.require_finished(period)?;
                let (Some(ft), Some(ht)) = (self.fulltime, self.halftime) else {
                    return Err(Unavailable::Pending(
                        "Missing halftime/fulltime score for 2H".to_string(),
                    ));
                };
                match (ft.home.checked_sub(ht.home), ft.away.checked_sub(ht.away)) {
                    (Some(home), Some(away)) => Ok(Score::new(home, away)),
                    _ => Err(Unavailable::Pending(format!(
                        "Corrupt period data: FT {} below HT {}",
                        ft, ht
                    ))),
                }
            }
        }
    }

    /// Home/away values of a statistic once the fixture is finished.
    pub fn statistic(&self, kind: StatKind) -> Result<Score, Unavailable> {
        self.require_finished(Period::FullTime)?;
        match self.statistics.get(kind) {
            StatLine::Recorded { home, away } => Ok(Score::new(home, away)),
            StatLine::Pending => Err(Unavailable::Pending(format!(
                "Statistics for {} not available yet",
                kind.label()
            ))),
            StatLine::Untracked => Err(Unavailable::Untracked(format!(
                "Provider does not track {} for this fixture",
                kind.label()
            ))),
        }
    }

    fn require_finished(&self, period: Period) -> Result<(), Unavailable> {
        if self.status == FixtureStatus::Finished {
            Ok(())
        } else {
            Err(Unavailable::Pending(format!(
                "Fixture not finished (status {}), {} data unavailable",
                self.status_code, period
            )))
        }
    }
}
