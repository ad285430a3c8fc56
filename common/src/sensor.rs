//! Airway pressure sensing.
//!
//! The sensor reports absolute pressure in hPa. Airway pressure is the
//! difference to the atmosphere baseline captured while the circuit is open,
//! converted to cmH2O. Within a breath the highest reading is the peak and the
//! lowest is the PEEP.

use core::fmt;

/// hPa to cmH2O.
pub const HPA_TO_CMH2O: f32 = 1.0197;

/// Airway pressure above which the pressure alarm is raised (cmH2O).
pub const HIGH_PEAK: f32 = 35.0;

/// Airway pressure above which the breath must be aborted (cmH2O).
pub const MAX_PEAK: f32 = 40.0;

const _: () = assert!(HIGH_PEAK < MAX_PEAK);

// =============================================================================
// Status
// =============================================================================

/// Decoded sensor status byte.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorStatus(u8);

impl SensorStatus {
    const MATH_SATURATED: u8 = 1 << 0;
    const MEMORY_FAILED: u8 = 1 << 2;
    const BUSY: u8 = 1 << 5;
    const POWERED: u8 = 1 << 6;

    pub const fn from_bits(bits: u8) -> Self { Self(bits) }

    #[inline]
    pub const fn bits(self) -> u8 { self.0 }

    /// Internal math overflowed; the last reading is clipped.
    #[inline]
    pub const fn is_saturated(self) -> bool { self.0 & Self::MATH_SATURATED != 0 }

    /// Calibration memory failed its integrity check.
    #[inline]
    pub const fn memory_failed(self) -> bool { self.0 & Self::MEMORY_FAILED != 0 }

    /// Conversion in progress.
    #[inline]
    pub const fn is_busy(self) -> bool { self.0 & Self::BUSY != 0 }

    #[inline]
    pub const fn is_powered(self) -> bool { self.0 & Self::POWERED != 0 }

    /// Powered, idle and with sound calibration.
    pub const fn is_ready(self) -> bool { self.is_powered() && !self.is_busy() && !self.memory_failed() }

    /// Reading can be trusted.
    pub const fn is_healthy(self) -> bool { self.is_ready() && !self.is_saturated() }
}

/// Absolute pressure sensor.
pub trait PressureSensor {
    type Error;

    /// Absolute pressure in hPa.
    fn read_pressure_hpa(&mut self) -> Result<f32, Self::Error>;

    fn read_status(&mut self) -> Result<SensorStatus, Self::Error>;
}

// =============================================================================
// Airway Pressure
// =============================================================================

/// Alarm level of an airway pressure reading.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressureAlarm {
    #[default]
    Normal,
    /// Above [`HIGH_PEAK`].
    High,
    /// Above [`MAX_PEAK`].
    Over,
}

impl PressureAlarm {
    pub fn of(airway: f32) -> Self {
        if airway > MAX_PEAK {
            Self::Over
        } else if airway > HIGH_PEAK {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "HIGH",
            Self::Over => "OVER",
        }
    }
}

/// Why a sample was not taken.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError<E> {
    Bus(E),
    /// Sensor not ready or reporting a fault.
    Unhealthy(SensorStatus),
    /// Reading was NaN or infinite.
    InvalidReading,
}

impl<E: fmt::Display> fmt::Display for SensorError<E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "pressure sensor bus error: {e}"),
            Self::Unhealthy(s) => write!(f, "pressure sensor not ready (status {:#04x})", s.bits()),
            Self::InvalidReading => f.write_str("pressure sensor returned an invalid reading"),
        }
    }
}

/// Airway pressure state in cmH2O.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct AirwayPressure {
    atmosphere: f32,
    airway: f32,
    peep: Option<f32>,
    peak: Option<f32>,
}

impl AirwayPressure {
    pub const fn new() -> Self {
        Self {
            atmosphere: 0.0,
            airway: 0.0,
            peep: None,
            peak: None,
        }
    }

    /// Atmosphere baseline in cmH2O.
    #[inline]
    pub const fn atmosphere(&self) -> f32 { self.atmosphere }

    /// Latest airway pressure relative to atmosphere.
    #[inline]
    pub const fn airway(&self) -> f32 { self.airway }

    /// Lowest airway pressure this breath.
    #[inline]
    pub const fn peep(&self) -> Option<f32> { self.peep }

    /// Highest airway pressure this breath.
    #[inline]
    pub const fn peak(&self) -> Option<f32> { self.peak }

    /// Use an absolute reading as the atmosphere baseline.
    pub fn set_atmosphere_hpa(
        &mut self,
        hpa: f32,
    ) {
        self.atmosphere = hpa * HPA_TO_CMH2O;
    }

    /// Record an absolute reading and return the airway pressure.
    pub fn record_hpa(
        &mut self,
        hpa: f32,
    ) -> f32 {
        self.airway = hpa * HPA_TO_CMH2O - self.atmosphere;
        self.peak = Some(self.peak.map_or(self.airway, |p| p.max(self.airway)));
        self.peep = Some(self.peep.map_or(self.airway, |p| p.min(self.airway)));
        self.airway
    }

    /// Start a new breath: forget peak and PEEP.
    pub fn reset_breath(&mut self) {
        self.peak = None;
        self.peep = None;
    }

    #[inline]
    pub fn alarm(&self) -> PressureAlarm { PressureAlarm::of(self.airway) }

    #[inline]
    pub fn is_high(&self) -> bool { self.airway > HIGH_PEAK }

    #[inline]
    pub fn is_over(&self) -> bool { self.airway > MAX_PEAK }

    /// Capture the atmosphere baseline from the sensor.
    pub fn calibrate<S: PressureSensor>(
        &mut self,
        sensor: &mut S,
    ) -> Result<(), SensorError<S::Error>> {
        let hpa = read_checked(sensor)?;
        self.set_atmosphere_hpa(hpa);

        #[cfg(feature = "defmt")]
        defmt::info!("atmosphere baseline {=f32} cmH2O", self.atmosphere);

        Ok(())
    }

    /// Take one sample from the sensor and return the airway pressure.
    pub fn sample<S: PressureSensor>(
        &mut self,
        sensor: &mut S,
    ) -> Result<f32, SensorError<S::Error>> {
        let hpa = read_checked(sensor)?;
        let airway = self.record_hpa(hpa);

        #[cfg(feature = "defmt")]
        if self.is_over() {
            defmt::warn!("airway pressure {=f32} cmH2O over limit", airway);
        }

        Ok(airway)
    }
}

fn read_checked<S: PressureSensor>(sensor: &mut S) -> Result<f32, SensorError<S::Error>> {
    let status = sensor.read_status().map_err(SensorError::Bus)?;
    if !status.is_ready() {
        return Err(SensorError::Unhealthy(status));
    }
    let hpa = sensor.read_pressure_hpa().map_err(SensorError::Bus)?;
    if !hpa.is_finite() {
        return Err(SensorError::InvalidReading);
    }
    Ok(hpa)
}
