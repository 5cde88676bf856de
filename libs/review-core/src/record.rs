//! Lenient card rows as stored by the web app, and their normalization.
//!
//! Rows written by older versions of the app may miss any scheduling field.
//! [`CardRecord::normalize`] fills defaults and restores the card invariants
//! so the scheduler only ever sees a well-formed [`Card`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::settings::SchedulerConfig;
use crate::types::{Card, CardId, CardStatus, Interval};

/// Persisted card row. `interval` is minutes while on a ladder, days otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: CardId,
    #[serde(default, deserialize_with = "lenient_status")]
    pub card_state: Option<CardStatus>,
    #[serde(default)]
    pub ease_factor: Option<f64>,
    #[serde(default)]
    pub interval: Option<f64>,
    #[serde(default)]
    pub learning_step: Option<i64>,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviews_count: Option<i64>,
    #[serde(default)]
    pub lapses: Option<i64>,
    #[serde(default)]
    pub is_suspended: Option<bool>,
    #[serde(default)]
    pub lapsed_interval_days: Option<f64>,
}

/// Accepts `"new"`, `"NEW"`, `"Review"` and so on; anything unrecognized reads as missing.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<CardStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "new" => Some(CardStatus::New),
        "learning" => Some(CardStatus::Learning),
        "review" => Some(CardStatus::Review),
        "relearning" => Some(CardStatus::Relearning),
        _ => None,
    }))
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn count(value: Option<i64>) -> u32 {
    value
        .map(|v| v.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

impl CardRecord {
    /// Build a strict card, repairing whatever the row is missing.
    pub fn normalize(&self, config: &SchedulerConfig) -> Card {
        let status = self.card_state.unwrap_or_default();
        let mut repaired = self.card_state.is_none();

        let ease_factor = match finite(self.ease_factor) {
            Some(ease) if ease >= config.minimum_ease => ease,
            Some(_) => {
                repaired = true;
                config.minimum_ease
            }
            None => {
                repaired = true;
                config.initial_ease
            }
        };

        let is_suspended = self.is_suspended.unwrap_or(false);
        let card = match status {
            CardStatus::New => Card {
                ease_factor,
                is_suspended,
                ..Card::new(self.id)
            },
            CardStatus::Learning | CardStatus::Relearning => {
                let steps = if status == CardStatus::Learning {
                    &config.learning_steps_minutes
                } else {
                    &config.relearning_steps_minutes
                };
                let last = steps.len().saturating_sub(1);
                let step = match self.learning_step {
                    Some(step) if step >= 0 => (step as usize).min(last),
                    _ => {
                        repaired = true;
                        0
                    }
                };
                let minutes = finite(self.interval)
                    .filter(|m| *m > 0.0)
                    .unwrap_or_else(|| steps.get(step).copied().unwrap_or(0.0));
                Card {
                    id: self.id,
                    status,
                    ease_factor,
                    interval: Interval::Minutes(minutes),
                    learning_step: Some(step),
                    next_review_date: self.next_review_date,
                    last_review_date: self.last_review_date,
                    reviews_count: count(self.reviews_count),
                    lapses: count(self.lapses),
                    is_suspended,
                    lapsed_interval_days: if status == CardStatus::Relearning {
                        finite(self.lapsed_interval_days).filter(|d| *d > 0.0)
                    } else {
                        None
                    },
                }
            }
            CardStatus::Review => Card {
                id: self.id,
                status,
                ease_factor,
                interval: Interval::Days(finite(self.interval).unwrap_or(0.0).max(0.0)),
                learning_step: None,
                next_review_date: self.next_review_date,
                last_review_date: self.last_review_date,
                reviews_count: count(self.reviews_count),
                lapses: count(self.lapses),
                is_suspended,
                lapsed_interval_days: None,
            },
        };

        if repaired || (status == CardStatus::New && self.reviews_count.unwrap_or(0) != 0) {
            debug!(card_id = %self.id, status = status.as_str(), "normalized legacy card record");
        }
        card
    }
}

impl From<&Card> for CardRecord {
    fn from(card: &Card) -> Self {
        let interval = match (card.status, card.interval) {
            (CardStatus::Learning | CardStatus::Relearning, interval) => interval.as_minutes(),
            (_, interval) => interval.as_days(),
        };
        Self {
            id: card.id,
            card_state: Some(card.status),
            ease_factor: Some(card.ease_factor),
            interval: Some(interval),
            learning_step: card.learning_step.map(|s| s as i64),
            next_review_date: card.next_review_date,
            last_review_date: card.last_review_date,
            reviews_count: Some(i64::from(card.reviews_count)),
            lapses: Some(i64::from(card.lapses)),
            is_suspended: Some(card.is_suspended),
            lapsed_interval_days: card.lapsed_interval_days,
        }
    }
}
