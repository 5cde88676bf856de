//! Scheduler and session configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Starting ease for every card.
pub const DEFAULT_EASE: f64 = 2.5;

/// Tunable constants of the stepped SM-2 scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Learning ladder, in minutes.
    pub learning_steps_minutes: Vec<f64>,
    /// Relearning ladder after a lapse, in minutes.
    pub relearning_steps_minutes: Vec<f64>,
    pub graduating_interval_days: f64,
    pub easy_interval_days: f64,
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub again_ease_penalty: f64,
    pub hard_ease_penalty: f64,
    pub easy_ease_bonus: f64,
    /// Applied on top of the ease factor for Hard; below 1.
    pub hard_interval_factor: f64,
    /// Applied on top of the ease factor for Easy; above 1.
    pub easy_bonus: f64,
    /// Share of the pre-lapse interval restored when relearning graduates.
    pub relearn_interval_multiplier: f64,
    pub maximum_interval_days: f64,
    /// Ladder cards due sooner than this are requeued in the running session.
    pub requeue_threshold_minutes: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            learning_steps_minutes: vec![1.0, 10.0],
            relearning_steps_minutes: vec![10.0],
            graduating_interval_days: 1.0,
            easy_interval_days: 4.0,
            initial_ease: DEFAULT_EASE,
            minimum_ease: 1.3,
            again_ease_penalty: 0.20,
            hard_ease_penalty: 0.15,
            easy_ease_bonus: 0.15,
            hard_interval_factor: 0.48,
            easy_bonus: 1.3,
            relearn_interval_multiplier: 1.0,
            maximum_interval_days: 36500.0,
            requeue_threshold_minutes: 20.0,
        }
    }
}

impl SchedulerConfig {
    /// Check that every constant keeps the scheduler well defined.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let ladders = [
            ("learning_steps_minutes", &self.learning_steps_minutes),
            ("relearning_steps_minutes", &self.relearning_steps_minutes),
        ];
        for (name, steps) in ladders {
            if steps.is_empty() {
                return Err(SettingsError::Invalid(format!("{name} must not be empty")));
            }
            if steps.iter().any(|m| !m.is_finite() || *m <= 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must contain positive minutes"
                )));
            }
        }

        let positive = [
            ("graduating_interval_days", self.graduating_interval_days),
            ("easy_interval_days", self.easy_interval_days),
            ("minimum_ease", self.minimum_ease),
            ("relearn_interval_multiplier", self.relearn_interval_multiplier),
            ("maximum_interval_days", self.maximum_interval_days),
            ("requeue_threshold_minutes", self.requeue_threshold_minutes),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::Invalid(format!("{name} must be positive")));
            }
        }

        let penalties = [
            ("again_ease_penalty", self.again_ease_penalty),
            ("hard_ease_penalty", self.hard_ease_penalty),
            ("easy_ease_bonus", self.easy_ease_bonus),
        ];
        for (name, value) in penalties {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Invalid(format!("{name} must not be negative")));
            }
        }

        if self.initial_ease < self.minimum_ease {
            return Err(SettingsError::Invalid(
                "initial_ease must not be below minimum_ease".to_string(),
            ));
        }
        if !(self.hard_interval_factor > 0.0 && self.hard_interval_factor < 1.0) {
            return Err(SettingsError::Invalid(
                "hard_interval_factor must be between 0 and 1".to_string(),
            ));
        }
        if !(self.easy_bonus > 1.0 && self.easy_bonus.is_finite()) {
            return Err(SettingsError::Invalid("easy_bonus must exceed 1".to_string()));
        }
        Ok(())
    }

    /// Clamp an ease factor to the configured floor.
    pub fn clamp_ease(&self, ease: f64) -> f64 {
        ease.max(self.minimum_ease)
    }
}

/// How many cards a session may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SessionLimitRepr", into = "SessionLimitRepr")]
pub enum SessionLimit {
    Ten,
    #[default]
    Twenty,
    Thirty,
    Fifty,
    Hundred,
    All,
}

impl SessionLimit {
    /// Maximum cards per session, `None` when unbounded.
    pub fn max_cards(self) -> Option<usize> {
        match self {
            Self::Ten => Some(10),
            Self::Twenty => Some(20),
            Self::Thirty => Some(30),
            Self::Fifty => Some(50),
            Self::Hundred => Some(100),
            Self::All => None,
        }
    }

    /// Truncate a card list to this limit.
    pub fn apply<T>(self, items: &mut Vec<T>) {
        if let Some(max) = self.max_cards() {
            items.truncate(max);
        }
    }
}

impl TryFrom<u32> for SessionLimit {
    type Error = SettingsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(Self::Ten),
            20 => Ok(Self::Twenty),
            30 => Ok(Self::Thirty),
            50 => Ok(Self::Fifty),
            100 => Ok(Self::Hundred),
            other => Err(SettingsError::InvalidSessionLimit(other.to_string())),
        }
    }
}

impl FromStr for SessionLimit {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<u32>()
            .map_err(|_| SettingsError::InvalidSessionLimit(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for SessionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_cards() {
            Some(n) => write!(f, "{n}"),
            None => f.write_str("all"),
        }
    }
}

/// Wire form of [`SessionLimit`]: a count or the word "all".
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SessionLimitRepr {
    Count(u32),
    Word(String),
}

impl TryFrom<SessionLimitRepr> for SessionLimit {
    type Error = SettingsError;

    fn try_from(repr: SessionLimitRepr) -> Result<Self, Self::Error> {
        match repr {
            SessionLimitRepr::Count(n) => Self::try_from(n),
            SessionLimitRepr::Word(word) => word.parse(),
        }
    }
}

impl From<SessionLimit> for SessionLimitRepr {
    fn from(limit: SessionLimit) -> Self {
        match limit.max_cards() {
            Some(n) => Self::Count(n as u32),
            None => Self::Word("all".to_string()),
        }
    }
}

/// Learner-facing study configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudySettings {
    pub session_limit: SessionLimit,
    /// Show the translation side first. Display-only; the scheduler ignores it.
    pub reversed: bool,
    pub scheduler: SchedulerConfig,
}

impl StudySettings {
    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.scheduler.validate()?;
        Ok(settings)
    }
}
