use std::time::{Duration, Instant};

use super::{DecayScheduler, TickTimer};

#[test]
fn first_value_is_exactly_from() {
    let mut s = DecayScheduler::new(500.0, 4000.0, 10.0);
    assert_eq!(s.next_value(), 500.0);
    assert_eq!(s.count(), 1);
}

#[test]
fn values_increase_monotonically_towards_to() {
    let mut s = DecayScheduler::new(500.0, 4000.0, 10.0);
    let mut prev = s.next_value();
    for _ in 0..200 {
        let v = s.next_value();
        assert!(v > prev, "{v} should exceed {prev}");
        assert!(v < 4000.0);
        prev = v;
    }
    assert!(4000.0 - prev < 1e-2);
}

#[test]
fn half_life_halves_the_distance() {
    let mut s = DecayScheduler::new(0.0, 1000.0, 4.0);
    let values: Vec<f64> = (0..9).map(|_| s.next_value()).collect();
    assert!((values[4] - 500.0).abs() < 1e-9);
    assert!((values[8] - 750.0).abs() < 1e-9);
}

#[test]
fn decreasing_schedules_also_converge() {
    let mut s = DecayScheduler::new(4000.0, 500.0, 2.0);
    let mut prev = s.next_value();
    for _ in 0..50 {
        let v = s.next_value();
        assert!(v < prev);
        assert!(v > 500.0);
        prev = v;
    }
}

#[test]
fn next_returns_millisecond_durations() {
    let mut s = DecayScheduler::new(500.0, 4000.0, 10.0);
    assert_eq!(s.next(), Duration::from_millis(500));
    assert!(s.next() > Duration::from_millis(500));
}

#[test]
fn timer_fires_once_when_due() {
    let t0 = Instant::now();
    let mut timer = TickTimer::new();
    assert!(!timer.fire_if_due(t0));

    timer.schedule_in(t0, Duration::from_millis(100));
    assert!(!timer.fire_if_due(t0 + Duration::from_millis(99)));
    assert!(timer.fire_if_due(t0 + Duration::from_millis(100)));
    assert!(!timer.fire_if_due(t0 + Duration::from_millis(500)));
    assert!(!timer.is_pending());
}

#[test]
fn rescheduling_replaces_the_pending_deadline() {
    let t0 = Instant::now();
    let mut timer = TickTimer::new();
    timer.schedule_in(t0, Duration::from_millis(100));
    timer.schedule_in(t0, Duration::from_millis(300));
    assert!(!timer.fire_if_due(t0 + Duration::from_millis(200)));
    assert_eq!(timer.remaining(t0 + Duration::from_millis(200)), Some(Duration::from_millis(100)));
}

#[test]
fn cancel_clears_the_deadline() {
    let t0 = Instant::now();
    let mut timer = TickTimer::new();
    timer.schedule_at(t0);
    assert!(timer.cancel());
    assert!(!timer.cancel());
    assert!(!timer.fire_if_due(t0 + Duration::from_secs(1)));
    assert_eq!(timer.remaining(t0), None);
}
