//! End-to-end study session tests over the in-memory store.

mod common;

use chrono::Duration;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use review_core::{
    CardId, CardRecord, CardStatus, CardStore, Clock, Interval, MemoryCardStore, Placement,
    Rating, ScheduleError, SchedulerConfig, SessionError, SessionLimit, SessionStats,
    SettingsError, Sm2, StoreError, StudySession, StudySettings,
};

use common::fixtures::{self, now};
use common::FlakyStore;

fn settings() -> StudySettings {
    StudySettings::default()
}

#[test]
fn test_session_walks_new_cards_through_ladder() {
    let new_cards = fixtures::new_cards(3);
    let later = fixtures::review_card(5.0, 2.5, Duration::days(2));
    let parked = fixtures::suspended(fixtures::new_card());

    let mut all = new_cards.clone();
    all.push(later.clone());
    all.push(parked.clone());
    let store = MemoryCardStore::from_cards(&all, SchedulerConfig::default());

    let mut session = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();
    assert_eq!(session.queue().len(), 3);
    assert_eq!(session.current().map(|c| c.id), Some(new_cards[0].id));

    let mut graded = 0;
    while !session.is_complete() {
        session.answer(Rating::Good).unwrap();
        graded += 1;
    }
    assert_eq!(graded, 9);
    assert_eq!(
        session.stats(),
        SessionStats {
            reviewed: 9,
            requeued: 6,
            finished: 3,
            good: 9,
            ..Default::default()
        }
    );

    for card in &new_cards {
        let saved = store.get(card.id).unwrap().unwrap();
        assert_eq!(saved.status, CardStatus::Review);
        assert_eq!(saved.interval, Interval::Days(1.0));
        assert_eq!(saved.reviews_count, 3);
        assert_eq!(saved.last_review_date, Some(now()));
        assert_eq!(saved.next_review_date, Some(now() + Duration::days(1)));
    }
    assert_eq!(store.get(later.id).unwrap(), Some(later));
    assert_eq!(store.get(parked.id).unwrap(), Some(parked));
}

#[test]
fn test_lapse_relearns_within_session_and_resumes_interval() {
    let card = fixtures::review_card(10.0, 2.5, Duration::zero());
    let store = MemoryCardStore::from_cards([&card], SchedulerConfig::default());
    let mut session = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();

    let lapse = session.answer(Rating::Again).unwrap();
    assert_eq!(lapse.placement, Placement::Requeued);
    assert_eq!(lapse.card.status, CardStatus::Relearning);
    assert_eq!(lapse.card.lapses, 1);
    assert!((lapse.card.ease_factor - 2.3).abs() < 1e-9);
    assert_eq!(lapse.card.next_review_date, Some(now() + Duration::minutes(10)));

    let stored = store.get(card.id).unwrap().unwrap();
    assert_eq!(stored.status, CardStatus::Relearning);
    assert_eq!(stored.lapsed_interval_days, Some(10.0));

    session.clock_mut().advance(Duration::minutes(10));
    let buttons = session.button_intervals().unwrap().unwrap();
    assert_eq!(buttons.again, Interval::Minutes(10.0));
    assert_eq!(buttons.good, Interval::Days(10.0));

    let resumed = session.answer(Rating::Good).unwrap();
    assert_eq!(resumed.placement, Placement::Left);
    assert_eq!(resumed.card.status, CardStatus::Review);
    assert_eq!(resumed.card.interval, Interval::Days(10.0));
    assert!(session.is_complete());
    assert_eq!(session.button_intervals().unwrap(), None);

    let stored = store.get(card.id).unwrap().unwrap();
    assert_eq!(stored.lapses, 1);
    assert_eq!(stored.lapsed_interval_days, None);
    assert_eq!(
        stored.next_review_date,
        Some(now() + Duration::minutes(10) + Duration::days(10))
    );
}

#[test]
fn test_failed_save_does_not_advance_queue() {
    let cards = fixtures::new_cards(2);
    let store = FlakyStore::new(MemoryCardStore::from_cards(&cards, SchedulerConfig::default()));
    let mut session = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();

    store.fail_next_saves(1);
    let result = session.answer(Rating::Good);
    assert_eq!(
        result,
        Err(SessionError::Store(StoreError::Backend("connection reset".to_string())))
    );
    assert_eq!(session.queue().len(), 2);
    assert_eq!(session.current().map(|c| c.id), Some(cards[0].id));
    assert_eq!(session.stats(), SessionStats::default());
    assert_eq!(store.inner.get(cards[0].id).unwrap(), Some(cards[0].clone()));

    let retried = session.answer(Rating::Good).unwrap();
    assert_eq!(retried.card.id, cards[0].id);
    assert_eq!(retried.card.reviews_count, 1);
    assert_eq!(session.current().map(|c| c.id), Some(cards[1].id));
}

#[test]
fn test_invalid_grade_value_is_rejected() {
    let cards = fixtures::new_cards(1);
    let store = MemoryCardStore::from_cards(&cards, SchedulerConfig::default());
    let mut session = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();

    assert_eq!(
        session.answer_value(9),
        Err(SessionError::Schedule(ScheduleError::InvalidGrade(9)))
    );
    assert_eq!(session.queue().len(), 1);
    assert_eq!(store.get(cards[0].id).unwrap(), Some(cards[0].clone()));

    let outcome = session.answer_value(4).unwrap();
    assert_eq!(outcome.rating, Rating::Easy);
}

#[test]
fn test_suspend_current_flags_card_and_drops_it() {
    let cards = fixtures::new_cards(2);
    let store = MemoryCardStore::from_cards(&cards, SchedulerConfig::default());
    let mut session = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();

    let removed = session.suspend_current().unwrap().unwrap();
    assert_eq!(removed.id, cards[0].id);
    assert!(removed.is_suspended);
    assert_eq!(session.current().map(|c| c.id), Some(cards[1].id));
    assert_eq!(session.stats().suspended, 1);
    assert!(store.get(cards[0].id).unwrap().unwrap().is_suspended);

    let next = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();
    assert_eq!(next.queue().len(), 1);
}

#[test]
fn test_suspend_on_finished_session_is_noop() {
    let store = MemoryCardStore::default();
    let mut session = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();
    assert!(session.is_complete());
    assert_eq!(session.suspend_current().unwrap(), None);
    assert_eq!(session.answer(Rating::Good), Err(SessionError::Empty));
}

#[test]
fn test_session_limit_caps_queue() {
    let cards = fixtures::new_cards(30);
    let store = MemoryCardStore::from_cards(&cards, SchedulerConfig::default());
    let settings = StudySettings {
        session_limit: SessionLimit::Ten,
        ..Default::default()
    };

    let scheduled = StudySession::start(&store, &settings, Clock::fixed(now()), false).unwrap();
    assert_eq!(scheduled.queue().len(), 10);

    let shuffled = StudySession::start(&store, &settings, Clock::fixed(now()), true).unwrap();
    assert_eq!(shuffled.queue().len(), 10);
}

#[test]
fn test_practice_anyway_when_nothing_is_due() {
    let cards = vec![
        fixtures::review_card(4.0, 2.5, Duration::days(3)),
        fixtures::review_card(9.0, 2.1, Duration::days(1)),
        fixtures::suspended(fixtures::review_card(9.0, 2.1, Duration::days(-1))),
    ];
    let store = MemoryCardStore::from_cards(&cards, SchedulerConfig::default());

    let scheduled = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();
    assert!(scheduled.is_complete());

    let practice = StudySession::practice_anyway(&store, &settings(), Clock::fixed(now())).unwrap();
    assert_eq!(practice.queue().len(), 2);
    assert!(practice.queue().iter().all(|c| !c.is_suspended));
}

#[test]
fn test_settings_json_drives_scheduler() {
    let settings = StudySettings::from_json(
        r#"{
            "session_limit": "all",
            "reversed": true,
            "scheduler": {"learning_steps_minutes": [1, 5, 15]}
        }"#,
    )
    .unwrap();
    let card = fixtures::new_card();
    let store = MemoryCardStore::from_cards([&card], settings.scheduler.clone());
    let mut session = StudySession::start(&store, &settings, Clock::fixed(now()), false).unwrap();
    assert!(session.reversed());

    let mut intervals = Vec::new();
    while !session.is_complete() {
        intervals.push(session.answer(Rating::Good).unwrap().card.interval);
    }
    assert_eq!(
        intervals,
        vec![
            Interval::Minutes(1.0),
            Interval::Minutes(5.0),
            Interval::Minutes(15.0),
            Interval::Days(1.0),
        ]
    );
}

#[test]
fn test_legacy_rows_are_scheduled_after_normalization() {
    let ids = [
        "0b6c7d9e-1f2a-4b3c-8d4e-5f6a7b8c9d01",
        "0b6c7d9e-1f2a-4b3c-8d4e-5f6a7b8c9d02",
        "0b6c7d9e-1f2a-4b3c-8d4e-5f6a7b8c9d03",
    ];
    let json = format!(
        r#"[
            {{"id": "{}", "cardState": "NEW"}},
            {{"id": "{}", "cardState": "review", "easeFactor": null, "interval": 3,
              "nextReviewDate": "2024-06-01T00:00:00Z", "reviewsCount": 4}},
            {{"id": "{}", "cardState": "learning", "interval": 10, "learningStep": 1,
              "reviewsCount": 2, "nextReviewDate": "2024-06-03T18:00:00Z"}}
        ]"#,
        ids[0], ids[1], ids[2]
    );
    let records: Vec<CardRecord> = serde_json::from_str(&json).unwrap();
    let store = MemoryCardStore::from_records(records, SchedulerConfig::default());
    let mut session = StudySession::start(&store, &settings(), Clock::fixed(now()), false).unwrap();
    assert_eq!(session.queue().len(), 3);

    let first = session.answer(Rating::Good).unwrap();
    assert_eq!(first.card.status, CardStatus::Learning);

    let second = session.answer(Rating::Good).unwrap();
    assert_eq!(second.card.interval, Interval::Days(7.5));
    assert_eq!(second.card.ease_factor, 2.5);
    assert_eq!(second.placement, Placement::Left);

    let third = session.answer(Rating::Good).unwrap();
    assert_eq!(third.card.status, CardStatus::Review);
    assert_eq!(third.card.interval, Interval::Days(1.0));

    let review_id = CardId::from(Uuid::parse_str(ids[1]).unwrap());
    let saved = store.load_cards().unwrap();
    let review = saved.iter().find(|c| c.id == review_id).unwrap();
    assert_eq!(review.reviews_count, 5);
    assert_eq!(review.next_review_date, Some(now() + Duration::hours(180)));
}

#[test]
fn test_empty_ladder_settings_are_rejected_before_grading() {
    let card = fixtures::review_card(10.0, 2.5, Duration::zero());
    let store = MemoryCardStore::from_cards([&card], SchedulerConfig::default());
    let settings = StudySettings {
        scheduler: SchedulerConfig {
            relearning_steps_minutes: vec![],
            ..Default::default()
        },
        ..Default::default()
    };

    let expected = Err(SessionError::Settings(SettingsError::Invalid(
        "relearning_steps_minutes must not be empty".to_string(),
    )));
    assert_eq!(
        StudySession::start(&store, &settings, Clock::fixed(now()), false).map(|_| ()),
        expected
    );
    assert_eq!(
        StudySession::practice_anyway(&store, &settings, Clock::fixed(now())).map(|_| ()),
        expected
    );
    assert_eq!(
        StudySession::start_with_algorithm(
            &store,
            Sm2::default(),
            &settings,
            Clock::fixed(now()),
            false
        )
        .map(|_| ()),
        expected
    );
    assert_eq!(store.get(card.id).unwrap(), Some(card));
}

#[test]
fn test_custom_algorithm_requeues_by_settings_threshold() {
    let config = SchedulerConfig {
        learning_steps_minutes: vec![1.0, 60.0],
        ..Default::default()
    };
    let algorithm = Sm2::new(config.clone()).unwrap();
    let settings = StudySettings {
        scheduler: SchedulerConfig {
            requeue_threshold_minutes: 90.0,
            ..config
        },
        ..Default::default()
    };
    let cards = fixtures::new_cards(1);
    let store = MemoryCardStore::from_cards(&cards, SchedulerConfig::default());
    let mut session =
        StudySession::start_with_algorithm(&store, algorithm, &settings, Clock::fixed(now()), false)
            .unwrap();

    session.answer(Rating::Good).unwrap();
    let second = session.answer(Rating::Good).unwrap();
    assert_eq!(second.card.interval, Interval::Minutes(60.0));
    assert_eq!(second.placement, Placement::Requeued);
    assert!(!session.is_complete());
}
