// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct Counter {
    ticks: AtomicUsize,
    closed: AtomicBool,
}

impl PeriodicFlush for Counter {
    fn flush_tick(&self) -> bool {
        self.ticks.fetch_add(1, Ordering::SeqCst);
        !self.closed.load(Ordering::SeqCst)
    }
}

fn wait_for(deadline: Duration, cond: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}

#[test]
fn ticks_without_any_writes() {
    let counter = Arc::new(Counter::default());
    let worker = FlushWorker::spawn(counter.clone(), Duration::from_millis(10)).unwrap();

    assert!(wait_for(Duration::from_secs(5), || {
        counter.ticks.load(Ordering::SeqCst) >= 3
    }));

    worker.stop();
}

#[test]
fn stop_interrupts_a_long_period() {
    let counter = Arc::new(Counter::default());
    let worker = FlushWorker::spawn(counter.clone(), Duration::from_secs(3600)).unwrap();

    let start = Instant::now();
    worker.stop();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(counter.ticks.load(Ordering::SeqCst), 0);
}

#[test]
fn exits_once_target_reports_closed() {
    let counter = Arc::new(Counter::default());
    counter.closed.store(true, Ordering::SeqCst);
    let worker = FlushWorker::spawn(counter.clone(), Duration::from_millis(5)).unwrap();

    assert!(wait_for(Duration::from_secs(5), || worker.handle.is_finished()));
    assert_eq!(counter.ticks.load(Ordering::SeqCst), 1);

    worker.stop();
}
