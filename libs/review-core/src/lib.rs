//! Spaced repetition core for vocabulary flashcard review.
//!
//! Provides:
//! - SM-2 scheduler with learning and relearning ladders
//! - Due-card selection and answer-button interval previews
//! - Per-session review queue with requeueing of cards still on a ladder
//! - Study session driver over a pluggable card store
//! - Normalization of legacy card rows into strict cards

pub mod algorithm;
pub mod clock;
pub mod error;
pub mod format;
pub mod record;
pub mod session;
pub mod settings;
pub mod store;
pub mod study;
pub mod types;

pub use algorithm::sm2::Sm2;
pub use algorithm::{get_due_cards, SpacedRepetitionAlgorithm};
pub use clock::Clock;
pub use error::{Result, ScheduleError, SessionError, SettingsError, StoreError};
pub use format::format_interval;
pub use record::CardRecord;
pub use session::{Placement, ReviewOutcome, SessionQueue};
pub use settings::{SchedulerConfig, SessionLimit, StudySettings};
pub use store::{CardStore, MemoryCardStore};
pub use study::{SessionStats, StudySession};
pub use types::{ButtonIntervals, Card, CardId, CardStatus, Interval, Rating};
