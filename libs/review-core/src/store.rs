//! Persistence collaborator for one learner's card collection.

use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::record::CardRecord;
use crate::settings::SchedulerConfig;
use crate::types::{Card, CardId};

type Result<T> = std::result::Result<T, StoreError>;

/// Repository for a learner's cards.
pub trait CardStore {
    /// Every card in the collection, suspended ones included.
    fn load_cards(&self) -> Result<Vec<Card>>;
    /// Insert or replace a card's review state.
    fn save_card(&self, card: &Card) -> Result<()>;
    fn set_suspended(&self, id: CardId, suspended: bool) -> Result<()>;
}

impl<T: CardStore + ?Sized> CardStore for &T {
    fn load_cards(&self) -> Result<Vec<Card>> {
        (**self).load_cards()
    }

    fn save_card(&self, card: &Card) -> Result<()> {
        (**self).save_card(card)
    }

    fn set_suspended(&self, id: CardId, suspended: bool) -> Result<()> {
        (**self).set_suspended(id, suspended)
    }
}

/// Row-backed in-memory store.
///
/// Rows keep the lenient legacy shape and are normalized on every load, the
/// same way a database-backed store would read them.
#[derive(Debug, Default)]
pub struct MemoryCardStore {
    rows: Mutex<Vec<CardRecord>>,
    config: SchedulerConfig,
}

impl MemoryCardStore {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            config,
        }
    }

    pub fn from_records(records: Vec<CardRecord>, config: SchedulerConfig) -> Self {
        Self {
            rows: Mutex::new(records),
            config,
        }
    }

    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>, config: SchedulerConfig) -> Self {
        Self::from_records(cards.into_iter().map(CardRecord::from).collect(), config)
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<CardRecord>>> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Backend("card store lock poisoned".to_string()))
    }

    pub fn get(&self, id: CardId) -> Result<Option<Card>> {
        Ok(self
            .rows()?
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.normalize(&self.config)))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.rows()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.rows()?.is_empty())
    }
}

impl CardStore for MemoryCardStore {
    fn load_cards(&self) -> Result<Vec<Card>> {
        Ok(self
            .rows()?
            .iter()
            .map(|row| row.normalize(&self.config))
            .collect())
    }

    fn save_card(&self, card: &Card) -> Result<()> {
        let mut rows = self.rows()?;
        let record = CardRecord::from(card);
        match rows.iter_mut().find(|row| row.id == card.id) {
            Some(row) => *row = record,
            None => rows.push(record),
        }
        Ok(())
    }

    fn set_suspended(&self, id: CardId, suspended: bool) -> Result<()> {
        let mut rows = self.rows()?;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::CardNotFound(id))?;
        row.is_suspended = Some(suspended);
        Ok(())
    }
}
