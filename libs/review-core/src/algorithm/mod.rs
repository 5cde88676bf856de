//! Spaced repetition scheduling.

pub mod sm2;

use crate::error::Result;
use crate::types::{ButtonIntervals, Card, Rating};
use chrono::{DateTime, Utc};

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the card's next state after a review graded `rating` at `now`.
    ///
    /// The input card is left untouched; callers persist the returned copy.
    fn schedule(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> Result<Card>;

    /// Interval each answer button would produce, for display before grading.
    fn button_intervals(&self, card: &Card, now: DateTime<Utc>) -> Result<ButtonIntervals> {
        Ok(ButtonIntervals {
            again: self.schedule(card, Rating::Again, now)?.interval,
            hard: self.schedule(card, Rating::Hard, now)?.interval,
            good: self.schedule(card, Rating::Good, now)?.interval,
            easy: self.schedule(card, Rating::Easy, now)?.interval,
        })
    }
}

/// Cards that are not suspended and whose review date has arrived (or was never set).
pub fn get_due_cards(cards: &[Card], now: DateTime<Utc>) -> Vec<Card> {
    cards.iter().filter(|card| card.is_due(now)).cloned().collect()
}
