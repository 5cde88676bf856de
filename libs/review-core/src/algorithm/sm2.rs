//! SM-2 spaced repetition algorithm with learning ladders.
//!
//! New and lapsed cards climb a short ladder of minute-scale steps before
//! (re)graduating to day-scale reviews driven by the ease factor.

use super::SpacedRepetitionAlgorithm;
use crate::error::{Result, ScheduleError, SettingsError};
use crate::settings::SchedulerConfig;
use crate::types::{Card, CardStatus, Interval, Rating};
use chrono::{DateTime, Utc};
use tracing::debug;

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone, Default)]
pub struct Sm2 {
    config: SchedulerConfig,
}

impl Sm2 {
    /// Build the scheduler, rejecting configs it could not run with
    /// (empty ladders, non-positive intervals and the like).
    pub fn new(config: SchedulerConfig) -> std::result::Result<Self, SettingsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn ladder(&self, status: CardStatus) -> &[f64] {
        match status {
            CardStatus::Relearning => &self.config.relearning_steps_minutes,
            _ => &self.config.learning_steps_minutes,
        }
    }

    fn enter_ladder(&self, card: &mut Card, status: CardStatus) {
        card.status = status;
        card.learning_step = Some(0);
        card.interval = Interval::Minutes(self.ladder(status)[0]);
    }

    fn schedule_ladder(&self, card: &mut Card, rating: Rating) {
        let steps = self.ladder(card.status);
        let last = steps.len() - 1;
        let step = card.learning_step.unwrap_or(0).min(last);

        match rating {
            Rating::Again => {
                card.learning_step = Some(0);
                card.interval = Interval::Minutes(steps[0]);
            }
            Rating::Hard => {
                card.learning_step = Some(step);
                card.interval = Interval::Minutes(steps[step]);
            }
            Rating::Good if step < last => {
                card.learning_step = Some(step + 1);
                card.interval = Interval::Minutes(steps[step + 1]);
            }
            Rating::Good | Rating::Easy => self.graduate(card, rating),
        }
    }

    fn graduate(&self, card: &mut Card, rating: Rating) {
        let easy = rating == Rating::Easy;
        let days = if card.status == CardStatus::Relearning {
            let resumed = card
                .lapsed_interval_days
                .unwrap_or(self.config.graduating_interval_days)
                * self.config.relearn_interval_multiplier;
            let resumed = resumed.max(self.config.graduating_interval_days);
            if easy {
                resumed * self.config.easy_bonus
            } else {
                resumed
            }
        } else if easy {
            self.config.easy_interval_days
        } else {
            self.config.graduating_interval_days
        };

        card.status = CardStatus::Review;
        card.learning_step = None;
        card.lapsed_interval_days = None;
        card.interval = Interval::Days(days.min(self.config.maximum_interval_days));
    }

    fn schedule_review(&self, card: &mut Card, rating: Rating) {
        let current_days = card.interval.as_days();
        let ease = card.ease_factor;

        let (days, ease_adj) = match rating {
            Rating::Again => {
                card.lapses = card.lapses.saturating_add(1);
                card.lapsed_interval_days = Some(current_days.max(0.0));
                card.ease_factor = ease - self.config.again_ease_penalty;
                self.enter_ladder(card, CardStatus::Relearning);
                return;
            }
            Rating::Hard => (
                current_days * ease * self.config.hard_interval_factor,
                -self.config.hard_ease_penalty,
            ),
            Rating::Good => (current_days * ease, 0.0),
            Rating::Easy => (
                current_days * ease * self.config.easy_bonus,
                self.config.easy_ease_bonus,
            ),
        };

        card.ease_factor = ease + ease_adj;
        card.learning_step = None;
        card.interval = Interval::Days(days.clamp(1.0, self.config.maximum_interval_days));
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn schedule(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> Result<Card> {
        if card.is_suspended {
            return Err(ScheduleError::CardSuspended(card.id));
        }

        let mut next = card.clone();
        match card.status {
            CardStatus::New => self.enter_ladder(&mut next, CardStatus::Learning),
            CardStatus::Learning | CardStatus::Relearning => self.schedule_ladder(&mut next, rating),
            CardStatus::Review => self.schedule_review(&mut next, rating),
        }

        next.ease_factor = self.config.clamp_ease(next.ease_factor);
        next.reviews_count = card.reviews_count.saturating_add(1);
        next.last_review_date = Some(now);
        next.next_review_date = Some(now + next.interval.to_duration());

        debug!(
            card_id = %card.id,
            rating = %rating,
            from = card.status.as_str(),
            to = next.status.as_str(),
            interval = ?next.interval,
            ease = next.ease_factor,
            "scheduled card"
        );

        Ok(next)
    }
}
