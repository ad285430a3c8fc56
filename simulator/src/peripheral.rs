//! Simulated motor-control peripheral and pressure sensor.
//!
//! The loopback link accepts setpoint bytes the way the peripheral does and
//! remembers them; the simulated sensor produces a breath waveform shaped by
//! those setpoints.

use std::f32::consts::PI;

use ventilator_common::command::{Command, CommandLink, Response, SHARED_BYTE, Setpoint};
use ventilator_common::sensor::{HPA_TO_CMH2O, PressureSensor, SensorStatus};

/// Sea-level atmosphere in hPa.
const ATMOSPHERE_HPA: f32 = 1013.25;

/// Airway pressure between breaths (cmH2O).
const PEEP_CMH2O: f32 = 5.0;

/// Stiff adult lung, mL per cmH2O.
const COMPLIANCE_ML_PER_CMH2O: f32 = 25.0;

/// Powered, idle, no faults.
const STATUS_READY: u8 = 0b0100_0000;

/// Setpoints accepted by the peripheral, in engineering units.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Applied {
    pub volume: f32,
    pub inhale: f32,
    pub bpm: f32,
}

impl Default for Applied {
    fn default() -> Self {
        Self {
            volume: 0.5,
            inhale: 2.0,
            bpm: 12.0,
        }
    }
}

/// In-process stand-in for the I2C link to the motor controller.
///
/// Setpoint bytes are decoded in send order: [`SHARED_BYTE`] is the inhale
/// time when the volume was just sent, otherwise volume.
#[derive(Default)]
pub struct LoopbackLink {
    applied: Applied,
    motor_enabled: bool,
    last: Option<Setpoint>,
}

impl LoopbackLink {
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub const fn applied(&self) -> Applied { self.applied }

    #[inline]
    pub const fn motor_enabled(&self) -> bool { self.motor_enabled }

    fn decode(
        &self,
        byte: u8,
    ) -> Option<(Setpoint, f32)> {
        let value = f32::from(byte);
        match byte {
            20..=49 => Some((Setpoint::Volume, (value - 10.0) / 50.0)),
            SHARED_BYTE if self.last == Some(Setpoint::Volume) => Some((Setpoint::Inhale, (value - 40.0) / 20.0)),
            SHARED_BYTE => Some((Setpoint::Volume, (value - 10.0) / 50.0)),
            51..=80 => Some((Setpoint::Inhale, (value - 40.0) / 20.0)),
            81..=115 => Some((Setpoint::Bpm, value - 72.0)),
            _ => None,
        }
    }
}

impl CommandLink for LoopbackLink {
    type Error = core::convert::Infallible;

    fn exchange(
        &mut self,
        command: u8,
    ) -> Result<u8, Self::Error> {
        if command == Command::EnableMotor.code() {
            self.motor_enabled = true;
            return Ok(Response::Valid as u8);
        }
        if command == Command::DisableMotor.code() {
            self.motor_enabled = false;
            return Ok(Response::Valid as u8);
        }
        if (Command::Ready.code()..=Command::Sigh.code()).contains(&command) {
            return Ok(Response::Valid as u8);
        }

        let Some((setpoint, value)) = self.decode(command) else {
            return Ok(Response::Invalid as u8);
        };
        match setpoint {
            Setpoint::Volume => self.applied.volume = value,
            Setpoint::Inhale => self.applied.inhale = value,
            Setpoint::Bpm => self.applied.bpm = value,
        }
        self.last = Some(setpoint);

        // A new breath rate takes effect at the end of the current breath
        let response = if setpoint == Setpoint::Bpm {
            Response::Updating
        } else {
            Response::Valid
        };
        Ok(response as u8)
    }
}

/// Breath phase generator and MPR-style sensor model.
pub struct SimulatedSensor {
    /// Seconds since the current breath started.
    phase: f32,
    airway: f32,
    breaths: u32,
}

impl SimulatedSensor {
    pub const fn new() -> Self {
        Self {
            phase: 0.0,
            airway: 0.0,
            breaths: 0,
        }
    }

    #[inline]
    pub const fn breaths(&self) -> u32 { self.breaths }

    /// Advance the waveform by `dt` seconds. Returns true when a new breath starts.
    pub fn advance(
        &mut self,
        dt: f32,
        applied: &Applied,
        motor_enabled: bool,
    ) -> bool {
        let period = 60.0 / applied.bpm.max(1.0);
        let inhale = applied.inhale.min(period * 0.8);
        let peak = PEEP_CMH2O + applied.volume * 1000.0 / COMPLIANCE_ML_PER_CMH2O;

        self.phase += dt;
        let new_breath = self.phase >= period;
        if new_breath {
            self.phase -= period;
            self.breaths += 1;
        }

        self.airway = if !motor_enabled {
            0.0
        } else if self.phase < inhale {
            PEEP_CMH2O + (peak - PEEP_CMH2O) * (self.phase / inhale * PI / 2.0).sin()
        } else {
            let t = (self.phase - inhale) / (period - inhale).max(0.1);
            PEEP_CMH2O + (peak - PEEP_CMH2O) * (-4.0 * t).exp()
        };
        new_breath
    }
}

impl PressureSensor for SimulatedSensor {
    type Error = core::convert::Infallible;

    fn read_pressure_hpa(&mut self) -> Result<f32, Self::Error> { Ok(ATMOSPHERE_HPA + self.airway / HPA_TO_CMH2O) }

    fn read_status(&mut self) -> Result<SensorStatus, Self::Error> { Ok(SensorStatus::from_bits(STATUS_READY)) }
}

#[cfg(test)]
mod tests {
    use ventilator_common::command::{SetpointTracker, send};
    use ventilator_common::sensor::AirwayPressure;

    use super::*;

    #[test]
    fn test_loopback_applies_setpoints_in_order() {
        let mut link = LoopbackLink::new();
        let mut tracker = SetpointTracker::new();
        tracker.stage::<()>(Setpoint::Volume, 0.8).unwrap();
        tracker.stage::<()>(Setpoint::Inhale, 0.5).unwrap();
        tracker.stage::<()>(Setpoint::Bpm, 20.0).unwrap();

        let replies = tracker.flush(&mut link).unwrap();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[2], (Setpoint::Bpm, Response::Updating));

        let applied = link.applied();
        assert!((applied.volume - 0.8).abs() < 1e-6);
        assert!((applied.inhale - 0.5).abs() < 1e-6);
        assert!((applied.bpm - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_loopback_shortest_inhale_alone() {
        let mut link = LoopbackLink::new();
        let mut tracker = SetpointTracker::new();
        tracker.flush(&mut link).unwrap();

        // 0.5 s encodes to the byte volume 0.8 L also uses
        tracker.stage::<()>(Setpoint::Inhale, 0.5).unwrap();
        tracker.flush(&mut link).unwrap();

        let applied = link.applied();
        assert!((applied.inhale - 0.5).abs() < 1e-6);
        assert!((applied.volume - 0.5).abs() < 1e-6);
        assert!(!tracker.is_changed(Setpoint::Inhale));
    }

    #[test]
    fn test_loopback_largest_volume_after_inhale_change() {
        let mut link = LoopbackLink::new();
        let mut tracker = SetpointTracker::new();
        tracker.flush(&mut link).unwrap();

        tracker.stage::<()>(Setpoint::Volume, 0.8).unwrap();
        tracker.stage::<()>(Setpoint::Inhale, 0.5).unwrap();
        tracker.flush(&mut link).unwrap();

        let applied = link.applied();
        assert!((applied.volume - 0.8).abs() < 1e-6);
        assert!((applied.inhale - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_loopback_rejects_unknown_bytes() {
        let mut link = LoopbackLink::new();
        assert_eq!(send(&mut link, 200), Ok(Response::Invalid));
        assert_eq!(send(&mut link, Command::EnableMotor.code()), Ok(Response::Valid));
        assert!(link.motor_enabled());
    }

    #[test]
    fn test_waveform_peaks_during_inhale() {
        let mut sensor = SimulatedSensor::new();
        let mut pressure = AirwayPressure::new();
        pressure.set_atmosphere_hpa(ATMOSPHERE_HPA);
        let applied = Applied::default();

        for _ in 0..250 {
            sensor.advance(0.02, &applied, true);
            pressure.sample(&mut sensor).unwrap();
        }
        // 0.5 L into 25 mL/cmH2O on top of PEEP
        let peak = pressure.peak().unwrap();
        assert!(peak > 24.0 && peak < 25.5, "peak {peak}");
        assert!(pressure.peep().unwrap() >= PEEP_CMH2O - 0.5);
    }

    #[test]
    fn test_new_breath_each_period() {
        let mut sensor = SimulatedSensor::new();
        let applied = Applied {
            bpm: 30.0,
            ..Applied::default()
        };
        let starts = (0..40).filter(|_| sensor.advance(0.25, &applied, true)).count();
        // 10 s at 2 s per breath
        assert_eq!(starts, 5);
        assert_eq!(sensor.breaths(), 5);
    }
}
