//! Factory functions for test cards.

use chrono::{DateTime, Duration, TimeZone, Utc};

use review_core::{Card, CardId, CardStatus, Interval};

/// Deterministic "now" for every test.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 18, 30, 0).unwrap()
}

pub fn new_card() -> Card {
    Card::new(CardId::new_v4())
}

pub fn new_cards(n: usize) -> Vec<Card> {
    (0..n).map(|_| new_card()).collect()
}

/// A graduated card whose review date is `due_in` from [`now`].
pub fn review_card(interval_days: f64, ease_factor: f64, due_in: Duration) -> Card {
    Card {
        status: CardStatus::Review,
        interval: Interval::Days(interval_days),
        ease_factor,
        reviews_count: 6,
        last_review_date: Some(now() - Duration::days(interval_days as i64)),
        next_review_date: Some(now() + due_in),
        ..new_card()
    }
}

pub fn suspended(card: Card) -> Card {
    Card {
        is_suspended: true,
        ..card
    }
}
