//! In-memory queue for a single study session.
//!
//! A [`SessionQueue`] is an ordinary value owned by the caller. Cards are
//! graded strictly front to back; a graded card either goes to the back of
//! the queue (it will come up again within minutes) or leaves the session.
//! The session is complete once the queue is empty.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::{get_due_cards, SpacedRepetitionAlgorithm};
use crate::error::SessionError;
use crate::settings::{SchedulerConfig, SessionLimit};
use crate::types::{Card, Rating};

/// Where a graded card ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Appended to the back of the queue.
    Requeued,
    /// Dropped from this session; it stays in the learner's collection.
    Left,
}

/// Result of grading the front card.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub card: Card,
    pub rating: Rating,
    pub placement: Placement,
}

impl ReviewOutcome {
    pub fn stays_in_session(&self) -> bool {
        self.placement == Placement::Requeued
    }
}

/// Cards left to grade in one sitting, front card first.
///
/// Graded cards whose next step is shorter than the requeue threshold go to
/// the back; everything else leaves the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionQueue {
    cards: VecDeque<Card>,
    requeue_threshold_minutes: f64,
}

impl SessionQueue {
    /// Queue exactly `cards`, in order.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>, config: &SchedulerConfig) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            requeue_threshold_minutes: config.requeue_threshold_minutes,
        }
    }

    /// Start a session over the due subset of `cards`.
    ///
    /// With `shuffle` the due cards are permuted before the limit is applied;
    /// otherwise their order is kept.
    pub fn start(
        cards: &[Card],
        limit: SessionLimit,
        shuffle: bool,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Self {
        Self::start_with_rng(cards, limit, shuffle, now, config, &mut rand::rng())
    }

    /// [`SessionQueue::start`] with a caller-supplied random source.
    pub fn start_with_rng<R: Rng + ?Sized>(
        cards: &[Card],
        limit: SessionLimit,
        shuffle: bool,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
        rng: &mut R,
    ) -> Self {
        let mut due = get_due_cards(cards, now);
        if shuffle {
            due.shuffle(rng);
        }
        limit.apply(&mut due);
        Self::from_cards(due, config)
    }

    /// Practice fallback when nothing is due: every non-suspended card, shuffled.
    pub fn practice_anyway<R: Rng + ?Sized>(
        cards: &[Card],
        limit: SessionLimit,
        config: &SchedulerConfig,
        rng: &mut R,
    ) -> Self {
        let mut pool: Vec<Card> = cards.iter().filter(|c| !c.is_suspended).cloned().collect();
        pool.shuffle(rng);
        limit.apply(&mut pool);
        Self::from_cards(pool, config)
    }

    pub fn current(&self) -> Option<&Card> {
        self.cards.front()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// A session is complete once nothing is left to grade.
    pub fn is_complete(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Whether a freshly graded card comes up again in this sitting.
    pub fn stays_in_session(&self, card: &Card) -> bool {
        card.status.is_stepped() && card.interval.as_minutes() < self.requeue_threshold_minutes
    }

    /// Grade the front card without touching the queue.
    pub fn preview_review<A>(
        &self,
        algorithm: &A,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, SessionError>
    where
        A: SpacedRepetitionAlgorithm + ?Sized,
    {
        let front = self.cards.front().ok_or(SessionError::Empty)?;
        let card = algorithm.schedule(front, rating, now)?;
        let placement = if self.stays_in_session(&card) {
            Placement::Requeued
        } else {
            Placement::Left
        };
        Ok(ReviewOutcome {
            card,
            rating,
            placement,
        })
    }

    /// Apply an outcome produced by [`SessionQueue::preview_review`] for the current front card.
    pub fn commit(&mut self, outcome: &ReviewOutcome) -> Result<(), SessionError> {
        let front = self.cards.front().ok_or(SessionError::Empty)?;
        if front.id != outcome.card.id {
            return Err(SessionError::CardMismatch {
                expected: front.id,
                found: outcome.card.id,
            });
        }
        self.cards.pop_front();
        if outcome.placement == Placement::Requeued {
            self.cards.push_back(outcome.card.clone());
        }
        Ok(())
    }

    /// Grade the front card and move it to the back or out of the session.
    pub fn submit_review<A>(
        &mut self,
        algorithm: &A,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, SessionError>
    where
        A: SpacedRepetitionAlgorithm + ?Sized,
    {
        let outcome = self.preview_review(algorithm, rating, now)?;
        self.commit(&outcome)?;
        Ok(outcome)
    }

    /// Drop the front card from this session only.
    ///
    /// Flagging the card as suspended in storage is the caller's job.
    pub fn suspend(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }
}
