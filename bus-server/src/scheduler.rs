//! Periodic task runner.
//!
//! A task is driven by a [`Ticker`]; the runner awaits each invocation
//! before waiting for the next tick. Ticks that fall due while a run is in
//! progress are dropped rather than queued.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Source of "run now" signals.
pub trait Ticker: Send {
    /// Wait for the next tick. `false` means no more ticks will come.
    fn tick(&mut self) -> impl Future<Output = bool> + Send;
}

/// Ticks on a fixed period, starting immediately.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Must be called inside a tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Ticks only when told to. Stops once every [`TickTrigger`] is dropped.
#[derive(Debug)]
pub struct ManualTicker {
    rx: mpsc::Receiver<()>,
}

/// Sends ticks to a [`ManualTicker`].
#[derive(Debug, Clone)]
pub struct TickTrigger {
    tx: mpsc::Sender<()>,
}

impl ManualTicker {
    pub fn new() -> (TickTrigger, ManualTicker) {
        let (tx, rx) = mpsc::channel(16);
        (TickTrigger { tx }, ManualTicker { rx })
    }
}

impl Ticker for ManualTicker {
    async fn tick(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}

impl TickTrigger {
    /// Queue one tick. Returns `false` if the ticker is gone.
    pub async fn fire(&self) -> bool {
        self.tx.send(()).await.is_ok()
    }
}

/// Guard against running the same task twice at once.
#[derive(Debug, Default)]
pub struct SingleFlight {
    running: AtomicBool,
}

/// Held for the duration of one run; releases the flight on drop.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    running: &'a AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flight, or `None` if a run is already in progress.
    pub fn try_acquire(&self) -> Option<FlightGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                running: &self.running,
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Run `task` on every tick until the ticker stops.
pub async fn run_periodic<T, F, Fut>(name: &'static str, mut ticker: T, mut task: F)
where
    T: Ticker,
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = ()> + Send,
{
    info!(task = name, "periodic task started");
    while ticker.tick().await {
        debug!(task = name, "tick");
        task().await;
    }
    info!(task = name, "periodic task stopped");
}
