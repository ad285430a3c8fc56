//! Gauge engine for the ventilator control panel.
//!
//! This crate is the platform-agnostic part of the panel firmware, shared by
//! the desktop simulator and the hardware build:
//!
//! - [`geometry`]: value to needle angle and needle polygon
//! - [`gauge`]: per-gauge configuration, values and painted snapshots
//! - [`range`]: in/over/under range classification and transitions
//! - [`input`]: the four ways a gauge value is updated
//! - [`render`]: incremental dial renderer
//! - [`surface`]: display capability, `embedded-graphics` adapter and a recording test double
//! - [`colors`], [`styles`], [`config`]: palette, fonts and compile-time layout
//! - [`command`]: setpoint exchange with the motor-control peripheral
//! - [`sensor`]: airway pressure sensing
//! - [`profiling`]: on-screen event log
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests. Logging goes through `defmt` when
//! the `defmt` feature is enabled and compiles away otherwise.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod command;
pub mod config;
pub mod gauge;
pub mod geometry;
pub mod input;
pub mod profiling;
pub mod range;
pub mod render;
pub mod sensor;
pub mod styles;
pub mod surface;

// Re-export commonly used items
pub use colors::Palette;
pub use config::*;
pub use gauge::{Channel, Direction, Gauge, GaugeConfig, GaugeError};
pub use range::{RangeState, Transition};
pub use render::{DiffRenderer, RefreshReport};
pub use surface::{DisplaySurface, GraphicsSurface};
