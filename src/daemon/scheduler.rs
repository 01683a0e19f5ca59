use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default wake-up period of the polling loop
pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

/// Default delay before the one-shot initial run
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5 * 60);

/// Why a job fired on a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Initial,
    Interval,
}

/// Trigger bookkeeping for one interval job plus a one-shot initial run
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    /// `None` when the next firing lies past what `Instant` can represent
    next_interval: Option<Instant>,
    initial_at: Option<Instant>,
}

impl Schedule {
    pub fn new(interval: Duration, initial_delay: Duration, start: Instant) -> Self {
        Self {
            interval,
            next_interval: start.checked_add(interval),
            initial_at: start.checked_add(initial_delay),
        }
    }

    /// Which trigger (if any) fires at `now`. The initial trigger is dropped
    /// once it fires, and a firing reschedules the interval trigger to
    /// `now + interval`. When both are due together the job runs once.
    pub fn due(&mut self, now: Instant) -> Option<Trigger> {
        let initial_due = self.initial_at.is_some_and(|at| now >= at);
        let interval_due = self.next_interval.is_some_and(|at| now >= at);

        if initial_due {
            self.initial_at = None;
        }
        if interval_due || initial_due {
            if interval_due {
                self.next_interval = now.checked_add(self.interval);
            }
            return Some(if initial_due {
                Trigger::Initial
            } else {
                Trigger::Interval
            });
        }
        None
    }

    pub fn has_initial(&self) -> bool {
        self.initial_at.is_some()
    }

    pub fn next_interval(&self) -> Option<Instant> {
        self.next_interval
    }
}

/// Cloneable stop flag; waiting on it wakes as soon as it is raised
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        if let Ok(mut stopped) = lock.lock() {
            *stopped = true;
        }
        cvar.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        lock.lock().map(|s| *s).unwrap_or(true)
    }

    /// Sleep up to `timeout`; returns true if stop was raised
    pub fn wait(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let Ok(guard) = lock.lock() else {
            return true;
        };
        match cvar.wait_timeout_while(guard, timeout, |stopped| !*stopped) {
            Ok((stopped, _)) => *stopped,
            Err(_) => true,
        }
    }
}

/// Cooperative polling loop.
///
/// Every `tick` it checks the schedule and runs the job synchronously on the
/// calling thread. A job in progress is never interrupted; stop is observed
/// on the next wait.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pub interval: Duration,
    pub initial_delay: Duration,
    pub tick: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            initial_delay: DEFAULT_INITIAL_DELAY,
            tick: DEFAULT_TICK,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Run until `stop` is raised. Returns how many times the job ran.
    pub fn run<F>(&self, stop: &StopSignal, mut job: F) -> usize
    where
        F: FnMut(Trigger),
    {
        let mut schedule = Schedule::new(self.interval, self.initial_delay, Instant::now());
        let mut runs = 0;
        info!(
            interval_secs = self.interval.as_secs(),
            initial_delay_secs = self.initial_delay.as_secs(),
            "Scheduler started"
        );

        while !stop.wait(self.tick) {
            if let Some(trigger) = schedule.due(Instant::now()) {
                debug!(?trigger, "Running scheduled job");
                job(trigger);
                runs += 1;
            }
        }

        info!(runs, "Scheduler stopped");
        runs
    }
}
