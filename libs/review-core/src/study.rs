//! Study session driver: queue, scheduler, clock and store wired together.
//!
//! Each graded card is written to the store before the queue moves on, so a
//! failed save leaves the session exactly where it was.

use serde::Serialize;
use tracing::{info, warn};

use crate::algorithm::sm2::Sm2;
use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::clock::Clock;
use crate::error::SessionError;
use crate::session::{Placement, ReviewOutcome, SessionQueue};
use crate::settings::StudySettings;
use crate::store::CardStore;
use crate::types::{ButtonIntervals, Card, Rating};

/// Running tally for the session summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub reviewed: u32,
    pub requeued: u32,
    pub finished: u32,
    pub suspended: u32,
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl SessionStats {
    fn record(&mut self, outcome: &ReviewOutcome) {
        self.reviewed += 1;
        match outcome.placement {
            Placement::Requeued => self.requeued += 1,
            Placement::Left => self.finished += 1,
        }
        match outcome.rating {
            Rating::Again => self.again += 1,
            Rating::Hard => self.hard += 1,
            Rating::Good => self.good += 1,
            Rating::Easy => self.easy += 1,
        }
    }
}

/// One sitting over a learner's collection.
///
/// Owns the session queue and grades cards with `A`, persisting every result
/// through `S` before the queue advances.
pub struct StudySession<S, A = Sm2> {
    store: S,
    algorithm: A,
    queue: SessionQueue,
    clock: Clock,
    stats: SessionStats,
    reversed: bool,
}

impl<S: CardStore> StudySession<S, Sm2> {
    /// Start a session over the store's due cards with the settings' scheduler.
    pub fn start(
        store: S,
        settings: &StudySettings,
        clock: Clock,
        shuffle: bool,
    ) -> Result<Self, SessionError> {
        let algorithm = Sm2::new(settings.scheduler.clone())?;
        Self::start_with_algorithm(store, algorithm, settings, clock, shuffle)
    }

    /// Practice every non-suspended card, due or not, in random order.
    pub fn practice_anyway(
        store: S,
        settings: &StudySettings,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        let algorithm = Sm2::new(settings.scheduler.clone())?;
        let cards = store.load_cards()?;
        let queue = SessionQueue::practice_anyway(
            &cards,
            settings.session_limit,
            &settings.scheduler,
            &mut rand::rng(),
        );
        info!(cards = queue.len(), "practice session started");
        Ok(Self::assemble(store, algorithm, queue, clock, settings.reversed))
    }
}

impl<S: CardStore, A: SpacedRepetitionAlgorithm> StudySession<S, A> {
    /// Start a session graded by a caller-supplied algorithm.
    ///
    /// Requeueing is decided by `settings.scheduler.requeue_threshold_minutes`
    /// alone; the algorithm's own ladders should be configured to match.
    pub fn start_with_algorithm(
        store: S,
        algorithm: A,
        settings: &StudySettings,
        clock: Clock,
        shuffle: bool,
    ) -> Result<Self, SessionError> {
        settings.scheduler.validate()?;
        let cards = store.load_cards()?;
        let queue = SessionQueue::start(
            &cards,
            settings.session_limit,
            shuffle,
            clock.now(),
            &settings.scheduler,
        );
        info!(
            algorithm = algorithm.name(),
            total = cards.len(),
            queued = queue.len(),
            limit = %settings.session_limit,
            shuffle,
            "study session started"
        );
        Ok(Self::assemble(store, algorithm, queue, clock, settings.reversed))
    }

    fn assemble(store: S, algorithm: A, queue: SessionQueue, clock: Clock, reversed: bool) -> Self {
        Self {
            store,
            algorithm,
            queue,
            clock,
            stats: SessionStats::default(),
            reversed,
        }
    }

    pub fn current(&self) -> Option<&Card> {
        self.queue.current()
    }

    /// Button intervals for the current card, `None` once the session is done.
    pub fn button_intervals(&self) -> Result<Option<ButtonIntervals>, SessionError> {
        match self.queue.current() {
            Some(card) => Ok(Some(self.algorithm.button_intervals(card, self.clock.now())?)),
            None => Ok(None),
        }
    }

    /// Grade the current card, persist it, then advance the queue.
    pub fn answer(&mut self, rating: Rating) -> Result<ReviewOutcome, SessionError> {
        let outcome = self
            .queue
            .preview_review(&self.algorithm, rating, self.clock.now())?;

        if let Err(err) = self.store.save_card(&outcome.card) {
            warn!(card_id = %outcome.card.id, error = %err, "failed to save review, queue not advanced");
            return Err(err.into());
        }

        self.queue.commit(&outcome)?;
        self.stats.record(&outcome);

        if self.queue.is_complete() {
            info!(
                reviewed = self.stats.reviewed,
                suspended = self.stats.suspended,
                "study session complete"
            );
        }
        Ok(outcome)
    }

    /// Grade with a raw 1-4 button value.
    pub fn answer_value(&mut self, value: u8) -> Result<ReviewOutcome, SessionError> {
        let rating = Rating::try_from(value)?;
        self.answer(rating)
    }

    /// Suspend the current card in the store and drop it from the session.
    pub fn suspend_current(&mut self) -> Result<Option<Card>, SessionError> {
        let Some(id) = self.queue.current().map(|card| card.id) else {
            return Ok(None);
        };
        self.store.set_suspended(id, true)?;
        let mut removed = self.queue.suspend();
        if let Some(card) = removed.as_mut() {
            card.is_suspended = true;
        }
        self.stats.suspended += 1;
        Ok(removed)
    }

    pub fn queue(&self) -> &SessionQueue {
        &self.queue
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_complete()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Display-only flag carried from settings.
    pub fn reversed(&self) -> bool {
        self.reversed
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
