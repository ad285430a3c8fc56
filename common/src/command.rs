//! Command exchange with the motor-control peripheral.
//!
//! Every exchange is one command byte out and one response byte back. The
//! transport (I2C on the panel, a loopback in the simulator) lives behind
//! [`CommandLink`]; this module only encodes, tracks and decodes.
//!
//! # Byte Map
//!
//! | Byte | Meaning |
//! |------|---------|
//! | 3..=9 | Fixed [`Command`]s |
//! | 20..=50 | Tidal volume, `50 * L + 10` |
//! | 50..=80 | Inhale time, `20 * s + 40` |
//! | 80..=115 | Breath rate, `72 + bpm` |
//!
//! Volume and inhale windows share [`SHARED_BYTE`]; the peripheral reads it as
//! inhale only right after a volume byte. Setpoints therefore always go out as
//! the whole volume, inhale, bpm triple, so every flush ends on bpm and a
//! volume byte always directly precedes the inhale byte.

use core::fmt;

use heapless::Vec;
#[allow(unused_imports)]
use micromath::F32Ext;

/// Fixed command codes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Ready for the next breath.
    Ready = 3,
    /// Abort the breath in progress.
    Cancel = 4,
    EnableMotor = 5,
    DisableMotor = 6,
    VolumeMode = 7,
    PressureMode = 8,
    /// Hourly sigh breath.
    Sigh = 9,
}

impl Command {
    #[inline]
    pub const fn code(self) -> u8 { self as u8 }
}

/// Peripheral reply to a command byte.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Response {
    Valid = 1,
    Invalid = 2,
    Updating = 18,
    Finished = 19,
}

impl Response {
    /// Short name for log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Updating => "updating",
            Self::Finished => "finished",
        }
    }
}

impl TryFrom<u8> for Response {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            1 => Ok(Self::Valid),
            2 => Ok(Self::Invalid),
            18 => Ok(Self::Updating),
            19 => Ok(Self::Finished),
            other => Err(other),
        }
    }
}

// =============================================================================
// Setpoints
// =============================================================================

/// Top of the volume window and bottom of the inhale window.
pub const SHARED_BYTE: u8 = 50;

/// Operator setpoint forwarded to the peripheral.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setpoint {
    /// Tidal volume in litres.
    Volume,
    /// Inhale time in seconds.
    Inhale,
    /// Breaths per minute.
    Bpm,
}

impl Setpoint {
    /// Send order.
    pub const ALL: [Self; 3] = [Self::Volume, Self::Inhale, Self::Bpm];

    const fn index(self) -> usize {
        match self {
            Self::Volume => 0,
            Self::Inhale => 1,
            Self::Bpm => 2,
        }
    }

    /// Command byte window for this setpoint, inclusive.
    pub const fn window(self) -> (u8, u8) {
        match self {
            Self::Volume => (20, SHARED_BYTE),
            Self::Inhale => (SHARED_BYTE, 80),
            Self::Bpm => (80, 115),
        }
    }

    /// Byte sent before any setpoint has been staged.
    pub const fn default_byte(self) -> u8 {
        match self {
            // 0.5 L
            Self::Volume => 35,
            // 2.0 s
            Self::Inhale => 80,
            // 12 bpm
            Self::Bpm => 84,
        }
    }

    /// Encode `value` as a command byte, or `None` if it falls outside the window.
    pub fn encode(
        self,
        value: f32,
    ) -> Option<u8> {
        if !value.is_finite() {
            return None;
        }
        let raw = match self {
            Self::Volume => 50.0 * value + 10.0,
            Self::Inhale => 20.0 * value + 40.0,
            Self::Bpm => 72.0 + value,
        }
        .round();

        let (lo, hi) = self.window();
        (raw >= f32::from(lo) && raw <= f32::from(hi)).then_some(raw as u8)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Inhale => "inhale",
            Self::Bpm => "bpm",
        }
    }
}

// =============================================================================
// Link
// =============================================================================

/// One-byte request/response transport to the peripheral.
pub trait CommandLink {
    type Error;

    /// Send `command` and return the peripheral's reply byte.
    fn exchange(
        &mut self,
        command: u8,
    ) -> Result<u8, Self::Error>;
}

/// Failure of a command exchange.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError<E> {
    /// Transport failure.
    Link(E),
    /// Reply byte outside the known responses.
    UnknownResponse(u8),
    /// Setpoint value has no command byte.
    OutOfRange(Setpoint),
}

impl<E: fmt::Display> fmt::Display for CommandError<E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "command link failed: {e}"),
            Self::UnknownResponse(b) => write!(f, "unknown response byte {b}"),
            Self::OutOfRange(s) => write!(f, "{} setpoint out of range", s.label()),
        }
    }
}

/// Send one byte and decode the reply.
pub fn send<L: CommandLink>(
    link: &mut L,
    command: u8,
) -> Result<Response, CommandError<L::Error>> {
    let byte = link.exchange(command).map_err(CommandError::Link)?;
    let response = Response::try_from(byte).map_err(CommandError::UnknownResponse)?;

    #[cfg(feature = "defmt")]
    defmt::debug!("command {=u8} -> {}", command, response);

    Ok(response)
}

// =============================================================================
// Change Tracking
// =============================================================================

/// Staged setpoint bytes and what the peripheral last accepted.
///
/// Each setpoint is tracked on its own: staging a new bpm never hides a
/// pending volume change and vice versa.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SetpointTracker {
    staged: [u8; 3],
    sent: [Option<u8>; 3],
}

impl SetpointTracker {
    /// Defaults staged, nothing sent, so the first flush sends all three.
    pub const fn new() -> Self {
        Self {
            staged: [
                Setpoint::Volume.default_byte(),
                Setpoint::Inhale.default_byte(),
                Setpoint::Bpm.default_byte(),
            ],
            sent: [None; 3],
        }
    }

    #[inline]
    pub const fn staged(
        &self,
        setpoint: Setpoint,
    ) -> u8 {
        self.staged[setpoint.index()]
    }

    /// Stage an operator value. Out-of-range values leave the staged byte alone.
    pub fn stage<E>(
        &mut self,
        setpoint: Setpoint,
        value: f32,
    ) -> Result<u8, CommandError<E>> {
        let byte = setpoint.encode(value).ok_or(CommandError::OutOfRange(setpoint))?;
        self.staged[setpoint.index()] = byte;
        Ok(byte)
    }

    /// True if the staged byte differs from the last accepted one.
    #[inline]
    pub fn is_changed(
        &self,
        setpoint: Setpoint,
    ) -> bool {
        self.sent[setpoint.index()] != Some(self.staged[setpoint.index()])
    }

    /// Record that the staged byte was accepted.
    pub fn mark_sent(
        &mut self,
        setpoint: Setpoint,
    ) {
        self.sent[setpoint.index()] = Some(self.staged[setpoint.index()]);
    }

    /// Send the full triple in order if any setpoint changed.
    ///
    /// A setpoint counts as sent unless the peripheral answers `Invalid`, in
    /// which case it stays pending for the next flush. A link error stops the
    /// flush; setpoints before it keep their sent status.
    pub fn flush<L: CommandLink>(
        &mut self,
        link: &mut L,
    ) -> Result<Vec<(Setpoint, Response), 3>, CommandError<L::Error>> {
        let mut replies = Vec::new();
        if !Setpoint::ALL.iter().any(|&s| self.is_changed(s)) {
            return Ok(replies);
        }
        for setpoint in Setpoint::ALL {
            let response = send(link, self.staged(setpoint))?;
            if response != Response::Invalid {
                self.mark_sent(setpoint);
            }
            replies.push((setpoint, response)).ok();
        }
        Ok(replies)
    }
}

impl Default for SetpointTracker {
    fn default() -> Self { Self::new() }
}
