//! Shared fixtures for review-core integration tests.
#![allow(dead_code)]

pub mod fixtures;

use std::cell::Cell;

use review_core::{Card, CardId, CardStore, MemoryCardStore, StoreError};

/// Store wrapper that fails the next `n` saves.
pub struct FlakyStore {
    pub inner: MemoryCardStore,
    failing_saves: Cell<u32>,
}

impl FlakyStore {
    pub fn new(inner: MemoryCardStore) -> Self {
        Self {
            inner,
            failing_saves: Cell::new(0),
        }
    }

    pub fn fail_next_saves(&self, n: u32) {
        self.failing_saves.set(n);
    }
}

impl CardStore for FlakyStore {
    fn load_cards(&self) -> Result<Vec<Card>, StoreError> {
        self.inner.load_cards()
    }

    fn save_card(&self, card: &Card) -> Result<(), StoreError> {
        let remaining = self.failing_saves.get();
        if remaining > 0 {
            self.failing_saves.set(remaining - 1);
            return Err(StoreError::Backend("connection reset".to_string()));
        }
        self.inner.save_card(card)
    }

    fn set_suspended(&self, id: CardId, suspended: bool) -> Result<(), StoreError> {
        self.inner.set_suspended(id, suspended)
    }
}
