//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, which the `no_std` common crate cannot, so
//! the common crate only carries the interval in milliseconds.

use std::time::Duration;

use ventilator_common::config::REFRESH_INTERVAL_MS;

/// Event polling period (~50 Hz). Keeps keyboard input responsive between refresh ticks.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Period of the scheduled refresh pass over all gauges.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(REFRESH_INTERVAL_MS);
