//! Criterion benchmarks for the touch-to-wire hot path.
//!
//! A touch-move event arrives every few milliseconds while a finger is on
//! the surface; translating it must stay far below that.
//!
//! Run with:
//! ```bash
//! cargo bench --package touchpad-core --bench gesture_bench
//! ```

use std::rc::Rc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use touchpad_core::input::AccelerationCurve;
use touchpad_core::{Command, DeviceEvent, InputEngine, ManualClock, RemoteConfig, TouchPoint};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn engine(update_rate: f64) -> (InputEngine, ManualClock) {
    let clock = ManualClock::new();
    let mut engine = InputEngine::new(Rc::new(clock.clone()));
    engine.configure(RemoteConfig {
        update_rate,
        ..RemoteConfig::default()
    });
    (engine, clock)
}

fn touch(event: fn(Vec<TouchPoint>) -> DeviceEvent, id: i64, x: f64, y: f64) -> DeviceEvent {
    event(vec![TouchPoint::new(id, x, y)])
}

fn start(touches: Vec<TouchPoint>) -> DeviceEvent {
    DeviceEvent::TouchStart { touches }
}

fn moved(touches: Vec<TouchPoint>) -> DeviceEvent {
    DeviceEvent::TouchMove { touches }
}

fn end(touches: Vec<TouchPoint>) -> DeviceEvent {
    DeviceEvent::TouchEnd { touches }
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_single_finger_pan(c: &mut Criterion) {
    c.bench_function("pan_100_moves_unthrottled", |b| {
        b.iter(|| {
            let (mut engine, clock) = engine(0.0);
            engine.dispatch(&touch(start, 1, 0.0, 0.0));
            for i in 1..=100 {
                clock.advance(Duration::from_millis(8));
                engine.dispatch(&touch(moved, 1, f64::from(i) * 3.0, 0.0));
            }
            engine.dispatch(&touch(end, 1, 300.0, 0.0));
            let sent: Vec<Command> = engine.drain_outbox().collect();
            black_box(sent)
        })
    });
}

fn bench_throttled_scroll(c: &mut Criterion) {
    c.bench_function("scroll_100_moves_60hz", |b| {
        b.iter(|| {
            let (mut engine, clock) = engine(60.0);
            engine.dispatch(&DeviceEvent::TouchStart {
                touches: vec![TouchPoint::new(1, 0.0, 0.0), TouchPoint::new(2, 40.0, 0.0)],
            });
            for i in 1..=100 {
                clock.advance(Duration::from_millis(4));
                engine.fire_due_timers();
                let y = f64::from(i) * 2.0;
                engine.dispatch(&DeviceEvent::TouchMove {
                    touches: vec![TouchPoint::new(1, 0.0, y), TouchPoint::new(2, 40.0, y)],
                });
            }
            let sent: Vec<Command> = engine.drain_outbox().collect();
            black_box(sent)
        })
    });
}

fn bench_acceleration_curve(c: &mut Criterion) {
    let curve = AccelerationCurve::default();
    c.bench_function("acceleration_multiplier", |b| {
        b.iter(|| curve.multiplier(black_box(360.0)))
    });
}

criterion_group!(
    benches,
    bench_single_finger_pan,
    bench_throttled_scroll,
    bench_acceleration_curve
);
criterion_main!(benches);
