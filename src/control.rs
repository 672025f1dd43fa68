//! Encoder driven front panel loop
//!
//! [`ControlLoop`] sits on top of any [`Tuner`] and turns user input into
//! tuner calls:
//! - encoder detents become channel or volume steps, depending on the
//!   [`EncoderMode`]
//! - a periodic tick refreshes the [`DisplayState`] from the tuner getters
//!
//! Reading the encoder pins is left to the caller. [`Encoder`] debounces the
//! sampled levels and produces signed detent counts, so the loop can be fed
//! from a timer interrupt, a polling task or a test.
//!
//! # Example
//! ```no_run
//! use si4703::control::{ControlEvent, ControlLoop, Encoder, EncoderMode, Tuner};
//!
//! fn run<T: Tuner>(tuner: T, mut sample: impl FnMut() -> (u32, bool, bool)) -> Result<(), T::Error> {
//!     let mut control = ControlLoop::new(tuner, 500);
//!     let mut encoder = Encoder::new(3);
//!     loop {
//!         let (now_ms, clk, dt) = sample();
//!         if let Some(steps) = encoder.sample(clk, dt) {
//!             control.handle(EncoderMode::Tuning.event(steps))?;
//!         }
//!         if let Some(display) = control.handle(ControlEvent::Tick { now_ms })? {
//!             let _ = display.frequency;
//!         }
//!     }
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::BandLimits;
use crate::error::Error;
use crate::tuner::Si4703;

/// Tuner operations the control loop relies on
///
/// Frequencies are in 10 kHz units.
pub trait Tuner {
    /// Error returned by the tuner operations
    type Error;

    /// Frequency the tuner is on.
    fn channel(&mut self) -> Result<u16, Self::Error>;
    /// Tunes to `frequency` and returns the frequency reached.
    fn set_channel(&mut self, frequency: u16) -> Result<u16, Self::Error>;
    /// Current volume step.
    fn volume(&mut self) -> Result<u8, Self::Error>;
    /// Sets the volume, clamped to the tuner's range, and returns it.
    fn set_volume(&mut self, volume: i32) -> Result<u8, Self::Error>;
    /// Signal strength of the current channel, dBµV.
    fn rssi(&mut self) -> Result<u8, Self::Error>;
    /// Whether the current channel is received in stereo.
    fn stereo(&mut self) -> Result<bool, Self::Error>;
    /// Band and spacing the tuner works in.
    fn band_limits(&self) -> BandLimits;
}

impl<I2C, RST, D> Tuner for Si4703<I2C, RST, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Error<I2C::Error>;

    fn channel(&mut self) -> Result<u16, Self::Error> {
        Si4703::channel(self)
    }

    fn set_channel(&mut self, frequency: u16) -> Result<u16, Self::Error> {
        Si4703::set_channel(self, frequency)
    }

    fn volume(&mut self) -> Result<u8, Self::Error> {
        Si4703::volume(self)
    }

    fn set_volume(&mut self, volume: i32) -> Result<u8, Self::Error> {
        Si4703::set_volume(self, volume)
    }

    fn rssi(&mut self) -> Result<u8, Self::Error> {
        Si4703::rssi(self)
    }

    fn stereo(&mut self) -> Result<bool, Self::Error> {
        Si4703::stereo(self)
    }

    fn band_limits(&self) -> BandLimits {
        Si4703::band_limits(self)
    }
}

/// Debounced digital level
///
/// A new level is accepted once it has been sampled `required` times in a
/// row after the first sample that differed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    stable: bool,
    last_sample: bool,
    count: u8,
    required: u8,
}

impl Debouncer {
    /// Starts at `initial`, accepting a change after `required` equal samples.
    pub const fn new(initial: bool, required: u8) -> Self {
        Self {
            stable: initial,
            last_sample: initial,
            count: 0,
            required,
        }
    }

    /// Accepted level.
    pub const fn level(&self) -> bool {
        self.stable
    }

    /// Feeds one sample. Returns the new level when it changes.
    pub fn update(&mut self, sample: bool) -> Option<bool> {
        if sample == self.last_sample {
            self.count = self.count.saturating_add(1);
        } else {
            self.last_sample = sample;
            self.count = 0;
        }

        if self.count >= self.required && sample != self.stable {
            self.stable = sample;
            return Some(sample);
        }
        None
    }
}

/// Quadrature encoder decoder
///
/// Counts one detent per debounced rising edge of CLK (A) and takes the
/// direction from DT (B) at that edge: DT low is clockwise (+1), DT high
/// counter-clockwise (-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Encoder {
    clk: Debouncer,
}

impl Encoder {
    /// `required` is the number of equal CLK samples needed to accept an edge.
    pub const fn new(required: u8) -> Self {
        Self {
            clk: Debouncer::new(false, required),
        }
    }

    /// Feeds one sample of both pins. Returns the detent, if one completed.
    pub fn sample(&mut self, clk: bool, dt: bool) -> Option<i32> {
        match self.clk.update(clk) {
            Some(true) => Some(if dt { -1 } else { 1 }),
            _ => None,
        }
    }
}

/// What the encoder currently adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderMode {
    /// Detents move the channel
    #[default]
    Tuning,
    /// Detents change the volume
    Volume,
}

impl EncoderMode {
    /// Event for `steps` encoder detents in this mode.
    pub const fn event(self, steps: i32) -> ControlEvent {
        match self {
            Self::Tuning => ControlEvent::ChannelStep(steps),
            Self::Volume => ControlEvent::VolumeStep(steps),
        }
    }

    /// The other mode.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Tuning => Self::Volume,
            Self::Volume => Self::Tuning,
        }
    }
}

/// Input to [`ControlLoop::handle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlEvent {
    /// Move this many channels (positive = up)
    ChannelStep(i32),
    /// Change the volume by this many steps (positive = louder)
    VolumeStep(i32),
    /// Time has passed; `now_ms` is a free running millisecond counter
    Tick { now_ms: u32 },
}

/// Values shown on the front panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    /// Tuned frequency, 10 kHz units
    pub frequency: u16,
    /// Volume step
    pub volume: u8,
    /// Signal strength, dBµV
    pub rssi: u8,
    /// Stereo pilot detected
    pub stereo: bool,
}

/// Front panel loop driving a [`Tuner`]
pub struct ControlLoop<T> {
    tuner: T,
    refresh_interval_ms: u32,
    last_refresh_ms: Option<u32>,
}

impl<T> ControlLoop<T>
where
    T: Tuner,
{
    /// `refresh_interval_ms` is the minimum time between two display
    /// refreshes triggered by ticks.
    pub fn new(tuner: T, refresh_interval_ms: u32) -> Self {
        Self {
            tuner,
            refresh_interval_ms,
            last_refresh_ms: None,
        }
    }

    /// The driven tuner, for calls the loop does not cover.
    pub fn tuner(&mut self) -> &mut T {
        &mut self.tuner
    }

    /// Stops the loop and returns the tuner.
    pub fn release(self) -> T {
        self.tuner
    }

    /// Applies one event.
    ///
    /// Returns a fresh [`DisplayState`] after every step and on ticks once the
    /// refresh interval has elapsed. Ticks before that return `None`. The
    /// first tick always refreshes.
    pub fn handle(&mut self, event: ControlEvent) -> Result<Option<DisplayState>, T::Error> {
        match event {
            ControlEvent::ChannelStep(steps) => {
                let current = self.tuner.channel()?;
                let target = self.tuner.band_limits().step(current, steps);
                self.tuner.set_channel(target)?;
                self.refresh().map(Some)
            }
            ControlEvent::VolumeStep(steps) => {
                let current = self.tuner.volume()?;
                self.tuner
                    .set_volume(i32::from(current).saturating_add(steps))?;
                self.refresh().map(Some)
            }
            ControlEvent::Tick { now_ms } => {
                let due = match self.last_refresh_ms {
                    Some(last) => now_ms.wrapping_sub(last) >= self.refresh_interval_ms,
                    None => true,
                };
                if !due {
                    return Ok(None);
                }
                self.last_refresh_ms = Some(now_ms);
                self.refresh().map(Some)
            }
        }
    }

    /// Reads everything the display shows.
    pub fn refresh(&mut self) -> Result<DisplayState, T::Error> {
        Ok(DisplayState {
            frequency: self.tuner.channel()?,
            volume: self.tuner.volume()?,
            rssi: self.tuner.rssi()?,
            stereo: self.tuner.stereo()?,
        })
    }
}
