//! Ventilator control panel simulator for desktop.
//!
//! Runs the gauge engine against an `embedded-graphics-simulator` window, with
//! the keyboard standing in for the panel's rotary encoders, a loopback
//! motor-control link and a simulated pressure sensor.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | `A` / `D` | Select previous / next dial |
//! | `W` / `S` | Step the selected target up / down |
//! | `H` / `E` | Selected target to its minimum / maximum position |
//! | `O` / `U` | Force the selected target over / under range |
//! | `T` | Touch the selected dial at 12 o'clock |
//! | `C` | Commit setpoints to the peripheral |
//! | `M` | Toggle the motor |
//! | `R` | Repaint all dial bases |
//! | `Q` | Quit |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]

mod panel;
mod peripheral;
mod profiling;
mod timing;

use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use ventilator_common::command::{Command, CommandLink, Setpoint, SetpointTracker, send};
use ventilator_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use ventilator_common::profiling::DebugLog;
use ventilator_common::sensor::{AirwayPressure, MAX_PEAK, PressureAlarm};
use ventilator_common::{Channel, Direction, GraphicsSurface};

use crate::panel::{Panel, idx};
use crate::peripheral::{LoopbackLink, SimulatedSensor};
use crate::profiling::TickMetrics;
use crate::timing::{FRAME_TIME, REFRESH_INTERVAL};

/// Fraction of the remaining distance a measured value closes per tick.
const SETTLE_RATE: f32 = 0.5;

/// 12 o'clock on the dial.
const TOUCH_ANGLE_DEG: f32 = 90.0;

fn main() {
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Ventilator Panel Sim", &output_settings);

    let mut panel = match Panel::new() {
        Ok(panel) => panel,
        Err(e) => {
            eprintln!("invalid gauge configuration: {e}");
            return;
        }
    };

    let mut log = DebugLog::new();
    let mut metrics = TickMetrics::new();
    let mut link = LoopbackLink::new();
    let mut setpoints = SetpointTracker::new();
    let mut sensor = SimulatedSensor::new();
    let mut pressure = AirwayPressure::new();
    let mut alarm = PressureAlarm::Normal;
    let mut cancelled_breath = false;

    // Baseline is taken with the motor stopped
    match pressure.calibrate(&mut sensor) {
        Ok(()) => log.push("Sensor calibrated"),
        Err(e) => log.push_fmt(format_args!("{e}")),
    }

    // Operator defaults, matching what the peripheral boots with
    let applied = link.applied();
    panel.gauge_mut(idx::VOLUME).update_by_value(Channel::Target, applied.volume);
    panel.gauge_mut(idx::INHALE).update_by_value(Channel::Target, applied.inhale);
    panel.gauge_mut(idx::BPM).update_by_value(Channel::Target, applied.bpm);
    panel.gauge_mut(idx::PRESSURE).update_by_value(Channel::Target, MAX_PEAK);

    send_command(&mut link, Command::VolumeMode, &mut log);
    send_command(&mut link, Command::EnableMotor, &mut log);
    commit_setpoints(&panel, &mut setpoints, &mut link, &mut log);

    display.clear(panel.palette().back).ok();
    panel.draw_base(&mut GraphicsSurface::new(&mut display));
    window.update(&display);

    let mut last_tick: Option<Instant> = None;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let mut input = false;

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => {
                    print_summary(&metrics, &log);
                    return;
                }
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    input = true;
                    match keycode {
                        Keycode::Q => {
                            print_summary(&metrics, &log);
                            return;
                        }
                        Keycode::A if !repeat => panel.select_prev(),
                        Keycode::D if !repeat => panel.select_next(),
                        Keycode::W | Keycode::S => {
                            // One encoder detent per key press
                            let delta = if keycode == Keycode::W { 1 } else { -1 };
                            let gauge = panel.selected_mut();
                            gauge.set_direction(Direction::from_delta(delta));
                            gauge.update_by_direction(Channel::Target);
                        }
                        Keycode::H | Keycode::E => {
                            let gauge = panel.selected_mut();
                            let position = if keycode == Keycode::E { gauge.max_position() } else { 0 };
                            gauge.set_position(Channel::Target, position);
                            gauge.update_by_position(Channel::Target);
                        }
                        Keycode::O | Keycode::U => {
                            let gauge = panel.selected_mut();
                            let config = *gauge.config();
                            let value = if keycode == Keycode::O {
                                config.max + config.increment
                            } else {
                                config.min - config.increment
                            };
                            gauge.update_by_value(Channel::Target, value);
                        }
                        Keycode::T if !repeat => panel.selected_mut().update_by_angle(Channel::Target, TOUCH_ANGLE_DEG),
                        Keycode::C if !repeat => commit_setpoints(&panel, &mut setpoints, &mut link, &mut log),
                        Keycode::M if !repeat => {
                            let command = if link.motor_enabled() {
                                Command::DisableMotor
                            } else {
                                Command::EnableMotor
                            };
                            send_command(&mut link, command, &mut log);
                        }
                        Keycode::R if !repeat => {
                            display.clear(panel.palette().back).ok();
                            panel.draw_base(&mut GraphicsSurface::new(&mut display));
                            log.push("Panel repainted");
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Breath waveform and pressure sampling run every frame
        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();
        if sensor.advance(dt, &link.applied(), link.motor_enabled()) {
            if let (Some(peak), Some(peep)) = (pressure.peak(), pressure.peep()) {
                log.push_fmt(format_args!("Breath {}: peak {peak:.1} PEEP {peep:.1}", sensor.breaths()));
            }
            pressure.reset_breath();
            cancelled_breath = false;
        }
        match pressure.sample(&mut sensor) {
            Ok(_) => {
                let level = pressure.alarm();
                if level != alarm {
                    log.push_fmt(format_args!("Pressure {} ({:.1} cmH2O)", level.label(), pressure.airway()));
                    alarm = level;
                }
                if pressure.is_over() && !cancelled_breath {
                    send_command(&mut link, Command::Cancel, &mut log);
                    cancelled_breath = true;
                }
            }
            Err(e) => log.push_fmt(format_args!("{e}")),
        }

        let scheduled = last_tick.is_none_or(|t| t.elapsed() >= REFRESH_INTERVAL);
        if scheduled {
            settle_measurements(&mut panel, &link, &pressure);
            last_tick = Some(Instant::now());
        }

        if scheduled || input {
            let mut surface = GraphicsSurface::new(&mut display);
            let refresh_start = Instant::now();
            let primitives = panel.refresh(&mut surface, &mut log);
            metrics.record_tick(refresh_start.elapsed(), primitives);
            panel.draw_footer(surface.target(), &log, metrics.status_line());
        }

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}

/// Move each measured value toward what the peripheral is running.
fn settle_measurements(
    panel: &mut Panel,
    link: &LoopbackLink,
    pressure: &AirwayPressure,
) {
    let applied = link.applied();
    for (i, target) in [
        (idx::VOLUME, applied.volume),
        (idx::INHALE, applied.inhale),
        (idx::BPM, applied.bpm),
    ] {
        let gauge = panel.gauge(i);
        let current = gauge.current().value();
        let step = gauge.config().increment;
        let next = if (target - current).abs() < step {
            target
        } else {
            current + (target - current) * SETTLE_RATE
        };
        panel.measure(i, next);
    }
    panel.measure(idx::PRESSURE, pressure.airway());
}

/// Stage the in-range operator targets and send whatever changed.
fn commit_setpoints<L: CommandLink>(
    panel: &Panel,
    setpoints: &mut SetpointTracker,
    link: &mut L,
    log: &mut DebugLog,
) where
    L::Error: core::fmt::Display,
{
    for (setpoint, i) in [
        (Setpoint::Volume, idx::VOLUME),
        (Setpoint::Inhale, idx::INHALE),
        (Setpoint::Bpm, idx::BPM),
    ] {
        let gauge = panel.gauge(i);
        if gauge.error_state().is_error() {
            log.push_fmt(format_args!("{}: not sent, target out of range", gauge.config().label));
            continue;
        }
        if let Err(e) = setpoints.stage::<L::Error>(setpoint, gauge.target().value()) {
            log.push_fmt(format_args!("{e}"));
        }
    }

    match setpoints.flush(link) {
        Ok(replies) if replies.is_empty() => log.push("Setpoints unchanged"),
        Ok(replies) => {
            for (setpoint, response) in replies {
                log.push_fmt(format_args!(
                    "{} {} -> {}",
                    setpoint.label(),
                    setpoints.staged(setpoint),
                    response.label()
                ));
            }
        }
        Err(e) => log.push_fmt(format_args!("{e}")),
    }
}

fn send_command<L: CommandLink>(
    link: &mut L,
    command: Command,
    log: &mut DebugLog,
) where
    L::Error: core::fmt::Display,
{
    match send(link, command.code()) {
        Ok(response) => log.push_fmt(format_args!("{command:?} -> {}", response.label())),
        Err(e) => log.push_fmt(format_args!("{e}")),
    }
}

fn print_summary(
    metrics: &TickMetrics,
    log: &DebugLog,
) {
    for line in log.iter() {
        println!("{line}");
    }
    println!(
        "uptime {}  ticks {} ({} idle)  primitives {} total, {} max/tick  refresh last {} us, avg {} us, max {} us",
        metrics.uptime_string(),
        metrics.total_ticks,
        metrics.idle_ticks,
        metrics.primitives_total,
        metrics.primitives_max,
        metrics.refresh_time_us,
        metrics.refresh_time_avg_us(),
        metrics.refresh_time_max_us,
    );
}
