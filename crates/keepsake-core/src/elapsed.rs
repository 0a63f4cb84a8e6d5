//! The elapsed-time counter and the per-second ticker that drives it.
//!
//! Every unit is derived from one raw second count; there is no calendar or
//! timezone arithmetic.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};

/// `2025-01-08T00:00:00+08:00`.
pub const DEFAULT_START_UNIX: i64 = 1_736_265_600;

pub const TICK: Duration = Duration::from_secs(1);

pub fn default_start() -> DateTime<Utc> {
  DateTime::from_timestamp(DEFAULT_START_UNIX, 0).unwrap_or_default()
}

// ─── Elapsed ─────────────────────────────────────────────────────────────────

/// Whole units elapsed since a start instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Elapsed {
  pub seconds: i64,
  pub minutes: i64,
  pub hours:   i64,
  pub days:    i64,
  pub weeks:   i64,
}

impl Elapsed {
  pub fn from_seconds(seconds: i64) -> Self {
    Self {
      seconds,
      minutes: seconds.div_euclid(60),
      hours:   seconds.div_euclid(3_600),
      days:    seconds.div_euclid(86_400),
      weeks:   seconds.div_euclid(604_800),
    }
  }

  /// `floor((now - start) / 1s)`, computed from the millisecond difference.
  pub fn between(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
    let millis = (now - start).num_milliseconds();
    Self::from_seconds(millis.div_euclid(1_000))
  }
}

// ─── Ticker ──────────────────────────────────────────────────────────────────

/// A repeating task that runs until it is cancelled or dropped.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct Ticker {
  handle: JoinHandle<()>,
}

impl Ticker {
  /// Call `on_tick` immediately, then once every `period`.
  pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
  where
    F: FnMut() + Send + 'static,
  {
    let handle = tokio::spawn(async move {
      let mut interval = tokio::time::interval(period);
      interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
      loop {
        interval.tick().await;
        on_tick();
      }
    });
    Self { handle }
  }

  pub fn cancel(self) {}

  pub fn is_finished(&self) -> bool { self.handle.is_finished() }
}

impl Drop for Ticker {
  fn drop(&mut self) { self.handle.abort(); }
}

// ─── Timer view ──────────────────────────────────────────────────────────────

/// A mounted timer: recomputes [`Elapsed`] once per second and publishes it.
///
/// Dropping the view stops the underlying [`Ticker`].
#[derive(Debug)]
pub struct TimerView {
  rx:     watch::Receiver<Elapsed>,
  ticker: Ticker,
}

impl TimerView {
  pub fn mount(start: DateTime<Utc>) -> Self { Self::mount_with_clock(start, TICK, Utc::now) }

  pub fn mount_with_clock<C>(start: DateTime<Utc>, period: Duration, clock: C) -> Self
  where
    C: Fn() -> DateTime<Utc> + Send + 'static,
  {
    let (tx, rx) = watch::channel(Elapsed::between(start, clock()));
    let ticker = Ticker::spawn(period, move || {
      tx.send_replace(Elapsed::between(start, clock()));
    });
    Self { rx, ticker }
  }

  pub fn current(&self) -> Elapsed { *self.rx.borrow() }

  /// Wait for the next recomputation. Returns `None` once the ticker stops.
  pub async fn next(&mut self) -> Option<Elapsed> {
    self.rx.changed().await.ok()?;
    Some(*self.rx.borrow_and_update())
  }

  pub fn unmount(self) { self.ticker.cancel(); }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicI64, AtomicUsize, Ordering},
  };

  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn default_start_is_midnight_in_utc_plus_eight() {
    let expected = chrono::FixedOffset::east_opt(8 * 3_600)
      .unwrap()
      .with_ymd_and_hms(2025, 1, 8, 0, 0, 0)
      .unwrap();
    assert_eq!(default_start(), expected);
  }

  #[test]
  fn units_are_integer_divisions_of_seconds() {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let now = start + chrono::Duration::milliseconds(1_000_000_999);
    let e = Elapsed::between(start, now);
    assert_eq!(e.seconds, 1_000_000);
    assert_eq!(e.minutes, 1_000_000 / 60);
    assert_eq!(e.hours, 1_000_000 / 3_600);
    assert_eq!(e.days, 1_000_000 / 86_400);
    assert_eq!(e.weeks, 1_000_000 / 604_800);
  }

  #[test]
  fn partial_seconds_are_floored() {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(Elapsed::between(start, start + chrono::Duration::milliseconds(999)).seconds, 0);
    assert_eq!(Elapsed::between(start, start + chrono::Duration::milliseconds(1_000)).seconds, 1);
    // Before the start instant the count floors towards negative infinity.
    assert_eq!(Elapsed::between(start, start - chrono::Duration::milliseconds(1)).seconds, -1);
  }

  #[tokio::test(start_paused = true)]
  async fn ticker_stops_when_dropped() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let ticker = Ticker::spawn(Duration::from_secs(1), move || {
      c.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    let before = count.load(Ordering::SeqCst);
    assert!(before >= 3, "ticked {before} times");

    drop(ticker);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(count.load(Ordering::SeqCst), before);
  }

  #[tokio::test(start_paused = true)]
  async fn timer_view_publishes_each_second() {
    let start = Utc.with_ymd_and_hms(2025, 1, 8, 0, 0, 0).unwrap();
    let offset = Arc::new(AtomicI64::new(59));
    let o = offset.clone();
    let mut view = TimerView::mount_with_clock(start, TICK, move || {
      start + chrono::Duration::seconds(o.fetch_add(1, Ordering::SeqCst))
    });

    // The first value is computed at mount.
    assert_eq!(view.current().seconds, 59);
    let first = view.next().await.unwrap();
    assert_eq!(first.seconds, 60);
    assert_eq!(first.minutes, 1);
    let second = view.next().await.unwrap();
    assert_eq!(second.seconds, 61);

    view.unmount();
  }
}
