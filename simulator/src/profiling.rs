//! Refresh tick metrics with time-based measurements.
//!
//! Counts the primitives each refresh pass sends to the display, which is the
//! number the diffing renderer exists to keep small. The `DebugLog` type is in
//! the common crate since it doesn't need time.

use std::fmt::Write;
use std::time::{Duration, Instant};

use heapless::String;

/// Per-tick bus traffic and timing statistics.
pub struct TickMetrics {
    // Refresh timing (microseconds)
    pub refresh_time_us: u32,
    pub refresh_time_max_us: u32,
    refresh_time_avg_us: f32,

    // Primitive counters
    pub primitives_last: u32,
    pub primitives_max: u32,
    pub primitives_total: u64,

    // Tick counters
    pub total_ticks: u64,
    /// Ticks that sent nothing to the display.
    pub idle_ticks: u64,

    start_time: Instant,
}

impl TickMetrics {
    const EMA_ALPHA: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            refresh_time_us: 0,
            refresh_time_max_us: 0,
            refresh_time_avg_us: 0.0,
            primitives_last: 0,
            primitives_max: 0,
            primitives_total: 0,
            total_ticks: 0,
            idle_ticks: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one refresh pass over the panel.
    pub fn record_tick(
        &mut self,
        refresh_time: Duration,
        primitives: u32,
    ) {
        let us = refresh_time.as_micros() as u32;
        self.refresh_time_us = us;
        self.refresh_time_max_us = self.refresh_time_max_us.max(us);

        if self.total_ticks == 0 {
            self.refresh_time_avg_us = us as f32;
        } else {
            self.refresh_time_avg_us =
                Self::EMA_ALPHA.mul_add(us as f32, (1.0 - Self::EMA_ALPHA) * self.refresh_time_avg_us);
        }

        self.primitives_last = primitives;
        self.primitives_max = self.primitives_max.max(primitives);
        self.primitives_total += u64::from(primitives);
        if primitives == 0 {
            self.idle_ticks += 1;
        }
        self.total_ticks += 1;
    }

    #[inline]
    pub const fn refresh_time_avg_us(&self) -> u32 { self.refresh_time_avg_us as u32 }

    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }

    /// Uptime as `HH:MM:SS`.
    pub fn uptime_string(&self) -> String<12> {
        let secs = self.uptime().as_secs();
        let mut s = String::new();
        write!(s, "{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60).ok();
        s
    }

    /// One-line summary for the status corner of the footer.
    pub fn status_line(&self) -> String<32> {
        let mut s = String::new();
        write!(s, "t{} p{}/{}", self.total_ticks, self.primitives_last, self.primitives_max).ok();
        s
    }
}

impl Default for TickMetrics {
    fn default() -> Self { Self::new() }
}
