//! Core types for the review scheduler.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScheduleError;

/// Stable, opaque card identifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    /// Generate a fresh random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for CardId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Card learning status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

impl CardStatus {
    /// Whether the card is walking a step ladder.
    pub fn is_stepped(self) -> bool {
        matches!(self, Self::Learning | Self::Relearning)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Relearning => "relearning",
        }
    }
}

/// Rating for a review, one per answer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = ScheduleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            other => Err(ScheduleError::InvalidGrade(other)),
        }
    }
}

impl FromStr for Rating {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            _ => Err(ScheduleError::UnknownGrade(s.to_string())),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time until the next review.
///
/// Ladder steps are measured in minutes and graduated reviews in days; the
/// unit travels with the value so the two can never be confused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Interval {
    Minutes(f64),
    Days(f64),
}

impl Interval {
    pub const ZERO: Interval = Interval::Days(0.0);

    pub fn as_minutes(&self) -> f64 {
        match *self {
            Self::Minutes(m) => m,
            Self::Days(d) => d * 24.0 * 60.0,
        }
    }

    pub fn as_days(&self) -> f64 {
        match *self {
            Self::Minutes(m) => m / (24.0 * 60.0),
            Self::Days(d) => d,
        }
    }

    /// Convert to a chrono duration, rounded to whole seconds.
    pub fn to_duration(&self) -> Duration {
        Duration::seconds((self.as_minutes() * 60.0).round() as i64)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::ZERO
    }
}

/// One learner's review history for one vocabulary item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub status: CardStatus,
    pub ease_factor: f64,
    pub interval: Interval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_step: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    pub reviews_count: u32,
    pub lapses: u32,
    pub is_suspended: bool,
    /// Review interval held when the card last lapsed; set only while relearning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lapsed_interval_days: Option<f64>,
}

impl Card {
    /// A never-reviewed card, due immediately.
    pub fn new(id: CardId) -> Self {
        Self {
            id,
            status: CardStatus::New,
            ease_factor: crate::settings::DEFAULT_EASE,
            interval: Interval::ZERO,
            learning_step: None,
            next_review_date: None,
            last_review_date: None,
            reviews_count: 0,
            lapses: 0,
            is_suspended: false,
            lapsed_interval_days: None,
        }
    }

    /// Whether the card should be offered for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_suspended && self.next_review_date.map_or(true, |due| due <= now)
    }
}

/// Prospective interval for every answer button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonIntervals {
    pub again: Interval,
    pub hard: Interval,
    pub good: Interval,
    pub easy: Interval,
}

impl ButtonIntervals {
    pub fn select(&self, rating: Rating) -> Interval {
        match rating {
            Rating::Again => self.again,
            Rating::Hard => self.hard,
            Rating::Good => self.good,
            Rating::Easy => self.easy,
        }
    }

    /// Short labels in button order, e.g. `[(Again, "1m"), (Good, "1d"), ..]`.
    pub fn labels(&self) -> [(Rating, String); 4] {
        Rating::ALL.map(|rating| (rating, crate::format::format_interval(self.select(rating))))
    }
}
