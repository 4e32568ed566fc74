// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Security tests for the intake guard.
//!
//! These tests replay resubmission spam against the intake service on a
//! manual clock and check that the validator and cooldown hold.

mod harness;

use harness::{
    attacks::{pick, SpamConfig},
    generators,
    metrics::{Outcome, SpamMetrics},
};
use komak_intake::{
    clock::ManualClock,
    config::CooldownConfig,
    intake::{IntakeService, GENERIC_FAILURE_MESSAGE},
    persistence::MemorySink,
    store::MemoryStore,
    throttle::SubmissionThrottle,
    validator::FieldValidator,
};

/// Run a spam simulation against a fresh intake service.
async fn run_spam(config: &SpamConfig) -> (SpamMetrics, usize) {
    let clock = ManualClock::new(1_700_000_000_000);
    let throttle =
        SubmissionThrottle::with_clock(MemoryStore::new(), &clock, &CooldownConfig::default());
    let service = IntakeService::new(FieldValidator::new(), throttle, MemorySink::new());

    let junk = generators::junk_applications();
    let mut metrics = SpamMetrics::new();
    let mut inserts_attempted = 0usize;

    for i in 0..config.total_attempts {
        let form = if pick(config.invalid_ratio, i) {
            junk[i % junk.len()].clone()
        } else {
            generators::valid_application(i)
        };

        let cooling = service.cooldown().in_cooldown;
        let will_insert = !cooling && service.validator().validate(&form).is_valid();
        if will_insert {
            inserts_attempted += 1;
            let fail = config
                .backend_failure_every
                .is_some_and(|n| inserts_attempted % n == 0);
            service
                .sink()
                .fail_with(fail.then_some("connection reset by peer"))
                .await;
        }

        let outcome = service.submit(&form).await;
        metrics.record(&outcome);

        clock.advance(config.interval);
    }

    let stored = service.sink().len().await;
    (metrics, stored)
}

#[tokio::test]
async fn test_rapid_resubmit() {
    let config = SpamConfig::rapid_resubmit();
    let (metrics, stored) = run_spam(&config).await;
    println!("{}", metrics);

    let window = CooldownConfig::default().window();
    assert_eq!(metrics.count(Outcome::Accepted), config.max_accepted(window));
    assert_eq!(stored, metrics.count(Outcome::Accepted));
    assert_eq!(
        metrics.count(Outcome::Throttled),
        config.total_attempts - stored
    );
    assert!(metrics.waits().iter().all(|w| (1..=60).contains(w)));
}

#[tokio::test]
async fn test_paced_resubmit_just_under_window() {
    let config = SpamConfig::paced_resubmit();
    let (metrics, _) = run_spam(&config).await;
    println!("{}", metrics);

    // 59 s apart: every other attempt lands inside the previous window.
    assert_eq!(metrics.count(Outcome::Accepted), config.total_attempts / 2);
    assert_eq!(metrics.count(Outcome::Throttled), config.total_attempts / 2);
    assert!(metrics.waits().iter().all(|w| *w == 1));
}

#[tokio::test]
async fn test_junk_flood_never_stored() {
    let config = SpamConfig::junk_flood();
    let (metrics, stored) = run_spam(&config).await;
    println!("{}", metrics);

    assert_eq!(stored, 0);
    assert_eq!(metrics.count(Outcome::Rejected), config.total_attempts);
    assert_eq!(metrics.count(Outcome::Throttled), 0);
}

#[tokio::test]
async fn test_outages_do_not_start_cooldown() {
    let config = SpamConfig::mixed_with_outages();
    let (metrics, stored) = run_spam(&config).await;
    println!("{}", metrics);

    let expected_invalid = (0..config.total_attempts)
        .filter(|i| pick(config.invalid_ratio, *i))
        .count();

    assert_eq!(metrics.count(Outcome::Rejected), expected_invalid);
    assert!(metrics.count(Outcome::Failed) > 0);
    assert_eq!(stored, metrics.count(Outcome::Accepted));

    let window = CooldownConfig::default().window();
    assert!(stored <= config.max_accepted(window));
    assert_eq!(metrics.total(), config.total_attempts);
}

#[tokio::test]
async fn test_backend_detail_never_shown() {
    let config = SpamConfig {
        total_attempts: 5,
        backend_failure_every: Some(1),
        ..Default::default()
    };
    let (metrics, stored) = run_spam(&config).await;

    assert_eq!(stored, 0);
    assert_eq!(metrics.count(Outcome::Failed), 5);
    assert!(metrics
        .messages()
        .iter()
        .all(|m| m == GENERIC_FAILURE_MESSAGE && !m.contains("connection reset")));
}
