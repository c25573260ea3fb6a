use std::{
    env,
    io::{self, BufRead, Write},
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::Utc;
use log::error;
use simulator::{SimError, Simulation, Timer, TICK_FREQUENCY_MILLIS};

const DEFAULT_TIME_RATE_MINUTES: i64 = 1;

/// Prints one flight map payload per tick on stdout until stdin is closed
/// or receives `exit`.
fn main() -> Result<(), SimError> {
    let time_rate = match env::args().nth(1) {
        Some(minutes) => minutes.parse().map_err(|_| SimError::InvalidInput)?,
        None => DEFAULT_TIME_RATE_MINUTES,
    };

    let now = Utc::now().naive_utc();
    let sim = Arc::new(Mutex::new(Simulation::with_test_data(now)?));

    let timer = Timer::new(
        now,
        1,
        Duration::from_millis(TICK_FREQUENCY_MILLIS),
    );
    timer.set_tick_advance(time_rate)?;

    let tick_sim = Arc::clone(&sim);
    let handle = Arc::clone(&timer).start(move |current_time, _| {
        let Ok(mut sim) = tick_sim.lock() else {
            error!("Simulation lock poisoned. Skipping tick.");
            return;
        };
        sim.advance(current_time);

        match sim.payload() {
            Ok(payload) => {
                let mut stdout = io::stdout().lock();
                if writeln!(stdout, "{}", payload).and_then(|_| stdout.flush()).is_err() {
                    error!("Failed to write payload");
                }
            }
            Err(e) => error!("{}", e),
        }
    })?;

    for line in io::stdin().lock().lines() {
        match line.as_deref().map(str::trim) {
            Ok("pause") => timer.pause(),
            Ok("resume") => timer.resume(),
            Ok("exit") | Err(_) => break,
            Ok(_) => {}
        }
    }

    timer.stop();
    handle
        .join()
        .map_err(|_| SimError::TimerStartError("timer thread panicked".to_string()))
}
