//! End-to-end schedule flows against deterministic server clocks, run
//! under the paused tokio clock so wall-clock waits resolve instantly but
//! measured gaps stay exact.

use chrono::Utc;
use futures::StreamExt;
use tokio::time::Instant;
use unison::{
    AnimationEvent, ColorFrame, FramePackage, Result, ServerClock, Unison, UnisonError,
};

/// Server clock at a fixed skew from the local clock.
struct SkewedClock {
    skew_millis: i64,
}

#[async_trait::async_trait]
impl ServerClock for SkewedClock {
    async fn server_time_millis(&mut self) -> Result<i64> {
        Ok(Utc::now().timestamp_millis() + self.skew_millis)
    }
}

/// Server clock that always fails, forcing the cached-offset fallback.
struct UnreachableClock;

#[async_trait::async_trait]
impl ServerClock for UnreachableClock {
    async fn server_time_millis(&mut self) -> Result<i64> {
        Err(UnisonError::connection_failed("no route to backend"))
    }
}

fn start_time_from_now(seconds_ahead: i64) -> String {
    (Utc::now() + chrono::Duration::seconds(seconds_ahead))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

fn rgb(r: u8, g: u8, b: u8) -> ColorFrame {
    ColorFrame::new(r, g, b)
}

#[tokio::test(start_paused = true)]
async fn two_seconds_early_plays_the_full_show_on_the_beat() {
    // The §8-style example: three frames at 1Hz, scheduled 2s out.
    let frames = vec![rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255)];
    let package = FramePackage::new(frames.clone(), 1, start_time_from_now(2))
        .expect("valid package");

    let scheduled_at = Instant::now();
    let mut handle = Unison::spawn(SkewedClock { skew_millis: 0 }, package);

    let mut events = Vec::new();
    let mut stamps = Vec::new();
    while let Some(event) = handle.events.next().await {
        stamps.push(Instant::now());
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            AnimationEvent::Started,
            AnimationEvent::Frame(frames[0]),
            AnimationEvent::Frame(frames[1]),
            AnimationEvent::Frame(frames[2]),
            AnimationEvent::Ended,
        ]
    );

    // Playback began ~2s after scheduling (the start-time string only has
    // seconds precision, so allow the sub-second truncation).
    let wait = (stamps[0] - scheduled_at).as_millis() as i64;
    assert!((1000..=2100).contains(&wait), "waited {wait}ms before starting");

    // 1Hz cadence between frames.
    for pair in stamps[1..4].windows(2) {
        let gap = (pair[1] - pair[0]).as_millis() as i64;
        assert!((995..=1005).contains(&gap), "frame gap was {gap}ms");
    }
}

#[tokio::test(start_paused = true)]
async fn late_joiner_inside_the_grace_window_still_flashes() {
    // Server 8s ahead: the device discovers a start time 8s stale.
    let package = FramePackage::new(vec![rgb(255, 255, 255); 4], 20, start_time_from_now(0))
        .expect("valid package");

    let mut handle = Unison::spawn(SkewedClock { skew_millis: 8_000 }, package);
    let events: Vec<AnimationEvent> = (&mut handle.events).collect().await;

    assert_eq!(events.first(), Some(&AnimationEvent::Started));
    assert_eq!(events.last(), Some(&AnimationEvent::Ended));
    assert_eq!(events.len(), 6); // start + 4 frames + end
}

#[tokio::test(start_paused = true)]
async fn late_joiner_beyond_the_grace_window_is_rejected() {
    // Server 30s ahead: the show is long over for everyone else.
    let package = FramePackage::new(vec![rgb(255, 255, 255); 4], 20, start_time_from_now(0))
        .expect("valid package");

    let mut handle = Unison::spawn(SkewedClock { skew_millis: 30_000 }, package);
    let events: Vec<AnimationEvent> = (&mut handle.events).collect().await;

    assert_eq!(events.len(), 1);
    let AnimationEvent::Failed(reason) = &events[0] else {
        panic!("expected a failure event, got {events:?}");
    };
    assert!(reason.contains("start time has passed"), "reason was {reason:?}");
}

#[tokio::test(start_paused = true)]
async fn unreachable_server_clock_degrades_but_still_plays() {
    // With no cached offset the fallback trusts the local clock; the show
    // must still run.
    let package = FramePackage::new(vec![rgb(1, 2, 3); 2], 10, start_time_from_now(3))
        .expect("valid package");

    let mut handle = Unison::spawn(UnreachableClock, package);
    let events: Vec<AnimationEvent> = (&mut handle.events).collect().await;

    assert_eq!(
        events,
        vec![
            AnimationEvent::Started,
            AnimationEvent::Frame(rgb(1, 2, 3)),
            AnimationEvent::Frame(rgb(1, 2, 3)),
            AnimationEvent::Ended,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn every_accepted_start_time_encoding_schedules() {
    // Use a future instant so each variant takes the wait-then-play path.
    let base = Utc::now() + chrono::Duration::seconds(90);
    let encodings = [
        base.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        base.format("%Y-%m-%dT%H:%MZ").to_string(),
        base.format("%Y-%m-%dT%H:%M:%S").to_string(),
        base.format("%Y-%m-%dT%H:%M").to_string(),
    ];

    for start_time in encodings {
        let package = FramePackage::new(vec![rgb(9, 9, 9)], 1, start_time.clone())
            .expect("valid package");
        let mut handle = Unison::spawn(SkewedClock { skew_millis: 0 }, package);
        let events: Vec<AnimationEvent> = (&mut handle.events).collect().await;

        assert_eq!(
            events,
            vec![
                AnimationEvent::Started,
                AnimationEvent::Frame(rgb(9, 9, 9)),
                AnimationEvent::Ended,
            ],
            "encoding {start_time:?} did not play"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_schedules_run_independently() {
    // Two in-flight invocations are never coordinated; each drives its
    // own callback stream to completion.
    let short = FramePackage::new(vec![rgb(255, 0, 0); 2], 10, start_time_from_now(1))
        .expect("valid package");
    let long = FramePackage::new(vec![rgb(0, 0, 255); 5], 10, start_time_from_now(4))
        .expect("valid package");

    let mut first = Unison::spawn(SkewedClock { skew_millis: 0 }, short);
    let mut second = Unison::spawn(SkewedClock { skew_millis: 0 }, long);

    let (first_events, second_events): (Vec<AnimationEvent>, Vec<AnimationEvent>) =
        tokio::join!((&mut first.events).collect(), (&mut second.events).collect());

    assert_eq!(first_events.len(), 4); // start + 2 frames + end
    assert_eq!(second_events.len(), 7); // start + 5 frames + end
    assert_eq!(first_events.last(), Some(&AnimationEvent::Ended));
    assert_eq!(second_events.last(), Some(&AnimationEvent::Ended));
}
