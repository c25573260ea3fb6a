use chrono::{Duration, NaiveDateTime};
use log::{info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, RwLock,
    },
    thread::{self, JoinHandle},
    time::{Duration as StdDuration, Instant},
};

use super::sim_error::SimError;

const PAUSE_POLL_MILLIS: u64 = 100;

/// Drives simulated time from a background thread.
///
/// Every tick advances the simulated clock by `tick_advance` and hands the
/// new time, together with the tick count, to the callback given to
/// [`Timer::start`].
pub struct Timer {
    current_time: Mutex<NaiveDateTime>,
    tick_advance: RwLock<Duration>,
    tick_interval: StdDuration,
    running: AtomicBool,
    paused: AtomicBool,
}

impl Timer {
    pub fn new(
        start_time: NaiveDateTime,
        tick_advance_minutes: i64,
        tick_interval: StdDuration,
    ) -> Arc<Self> {
        Arc::new(Self {
            current_time: Mutex::new(start_time),
            tick_advance: RwLock::new(Duration::minutes(tick_advance_minutes)),
            tick_interval,
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
        })
    }

    /// Changes the simulated minutes advanced per tick.
    pub fn set_tick_advance(&self, new_tick_advance_minutes: i64) -> Result<(), SimError> {
        if new_tick_advance_minutes <= 0 || new_tick_advance_minutes > 10000 {
            return Err(SimError::InvalidDuration(
                new_tick_advance_minutes.to_string(),
            ));
        }

        let mut tick_advance = self.tick_advance.write().map_err(|_| {
            SimError::TimerLockError("Failed to acquire write lock for tick_advance.".to_string())
        })?;
        *tick_advance = Duration::minutes(new_tick_advance_minutes);
        Ok(())
    }

    pub fn current_time(&self) -> Result<NaiveDateTime, SimError> {
        self.current_time
            .lock()
            .map(|time| *time)
            .map_err(|_| SimError::TimerLockError("current_time is poisoned".to_string()))
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Advances the clock by one tick and returns the new time.
    fn advance(&self) -> Result<NaiveDateTime, SimError> {
        let tick_advance = *self.tick_advance.read().map_err(|_| {
            SimError::TimerLockError("Failed to acquire read lock on tick_advance.".to_string())
        })?;

        let mut time = self.current_time.lock().map_err(|_| {
            SimError::TimerLockError("Failed to acquire lock on current_time.".to_string())
        })?;
        *time += tick_advance;
        Ok(*time)
    }

    /// Starts the timer thread, calling `tick_callback` on each tick until stopped.
    pub fn start(
        self: Arc<Self>,
        tick_callback: impl Fn(NaiveDateTime, usize) + Send + 'static,
    ) -> Result<JoinHandle<()>, SimError> {
        thread::Builder::new()
            .name("timer-thread".to_string())
            .spawn(move || {
                let mut tick_count = 0;
                while self.is_running() {
                    if self.paused.load(Ordering::SeqCst) {
                        thread::sleep(StdDuration::from_millis(PAUSE_POLL_MILLIS));
                        continue;
                    }

                    let started = Instant::now();

                    match self.advance() {
                        Ok(current_time) => {
                            tick_count += 1;
                            tick_callback(current_time, tick_count);
                        }
                        Err(e) => warn!("{}. Skipping tick.", e),
                    }

                    thread::sleep(self.tick_interval.saturating_sub(started.elapsed()));
                }

                info!("Timer stopped.");
            })
            .map_err(|e| SimError::TimerStartError(e.to_string()))
    }
}
