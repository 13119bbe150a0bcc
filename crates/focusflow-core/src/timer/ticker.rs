//! Cancelable once-per-period driver for [`Tickable`] timers.
//!
//! The timer stays a pure state machine; the ticker only calls `tick()` on a
//! fixed interval and forwards whatever events come out. The task ends on its
//! own once the timer stops being active (completed, cancelled or paused).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::Tickable;
use crate::events::Event;

/// Timer shared between the ticker task and its owner.
pub type SharedTimer<T> = Arc<Mutex<T>>;

pub struct Ticker;

impl Ticker {
    /// Spawn a task that ticks `timer` every `period`.
    ///
    /// Must be called inside a tokio runtime. Events go to `events`; a closed
    /// receiver does not stop the countdown.
    pub fn spawn<T: Tickable>(
        period: Duration,
        timer: SharedTimer<T>,
        events: mpsc::UnboundedSender<Event>,
    ) -> TickerHandle<T> {
        let stopped = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(run(period, Arc::clone(&timer), Arc::clone(&stopped), events));
        TickerHandle { timer, stopped, task }
    }
}

async fn run<T: Tickable>(
    period: Duration,
    timer: SharedTimer<T>,
    stopped: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<Event>,
) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let (event, active) = {
            let Ok(mut guard) = timer.lock() else {
                tracing::error!("timer lock poisoned, stopping ticker");
                return;
            };
            if stopped.load(Ordering::SeqCst) {
                return;
            }
            let event = guard.tick();
            (event, guard.is_active())
        };

        if let Some(event) = event {
            let _ = events.send(event);
        }
        if !active {
            return;
        }
    }
}

/// Stop handle for a spawned ticker.
pub struct TickerHandle<T> {
    timer: SharedTimer<T>,
    stopped: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl<T> TickerHandle<T> {
    /// Cancel the ticker. No tick runs after this returns.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        // A tick already holding the lock finishes before we get it.
        drop(self.timer.lock());
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the ticker to end by itself.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}
