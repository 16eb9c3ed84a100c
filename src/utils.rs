use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{info, warn, LevelFilter};

/// Installs `env_logger` at `info` unless `RUST_LOG` says otherwise.
/// Calling it twice is harmless.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}

/// Switches every log statement in the process on or off.
pub fn set_logging(enabled: bool) {
    log::set_max_level(if enabled {
        LevelFilter::Trace
    } else {
        LevelFilter::Off
    });
}

/// Wall-clock stopwatches addressed by generated ids.
#[derive(Debug, Default)]
pub struct Timers {
    running: HashMap<String, Instant>,
    next_id: usize,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a timer and returns its id, `timer0`, `timer1` and so on.
    pub fn start(&mut self) -> String {
        let mut k = self.next_id;
        while self.running.contains_key(&format!("timer{}", k)) {
            k += 1;
        }
        let id = format!("timer{}", k);
        self.running.insert(id.clone(), Instant::now());
        self.next_id = k;
        id
    }

    /// Time since `id` was started, leaving it running.
    pub fn elapsed(&self, id: &str) -> Option<Duration> {
        match self.running.get(id) {
            Some(start) => Some(start.elapsed()),
            None => {
                warn!("request for non-existent timer {}", id);
                None
            }
        }
    }

    pub fn stop(&mut self, id: &str) -> Option<Duration> {
        let elapsed = self.elapsed(id)?;
        self.running.remove(id);
        Some(elapsed)
    }

    pub fn stop_and_log(&mut self, id: &str, description: &str) -> Option<Duration> {
        let elapsed = self.stop(id)?;
        if description.is_empty() {
            info!("{} elapsed time.", friendly_duration(elapsed));
        } else {
            info!("{}: {} elapsed time.", description, friendly_duration(elapsed));
        }
        Some(elapsed)
    }
}

pub fn friendly_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    let hours = millis / 3_600_000;
    let minutes = millis % 3_600_000 / 60_000;
    let seconds = millis % 60_000 / 1000;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else if seconds > 0 {
        format!("{:.2}s", millis as f64 / 1000.0)
    } else {
        format!("{}ms", millis)
    }
}
