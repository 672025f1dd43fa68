//! Tuner configuration
//!
//! Region, seek and audio settings applied once by [`Si4703::start`], and the
//! [`BandLimits`] derived from them that convert between hardware channel
//! numbers and frequencies.
//!
//! All frequencies handled by this crate are in 10 kHz units: 87.5 MHz is
//! `8750`, 102.4 MHz is `10240`.
//!
//! [`Si4703::start`]: crate::Si4703::start

/// Band select (BAND)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    /// 87.5-108 MHz (US / Europe)
    #[default]
    UsEurope = 0b00,
    /// 76-108 MHz (Japan wide band)
    JapanWide = 0b01,
    /// 76-90 MHz (Japan)
    Japan = 0b10,
}

impl Band {
    /// Lowest and highest frequency of the band.
    pub const fn range(self) -> (u16, u16) {
        match self {
            Band::UsEurope => (8750, 10800),
            Band::JapanWide => (7600, 10800),
            Band::Japan => (7600, 9000),
        }
    }
}

/// Channel spacing (SPACE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Spacing {
    /// 200 kHz (US / Australia)
    Khz200 = 0b00,
    /// 100 kHz (Europe / Japan)
    #[default]
    Khz100 = 0b01,
    /// 50 kHz
    Khz50 = 0b10,
}

impl Spacing {
    /// Spacing in 10 kHz units.
    pub const fn ticks(self) -> u16 {
        match self {
            Spacing::Khz200 => 20,
            Spacing::Khz100 => 10,
            Spacing::Khz50 => 5,
        }
    }
}

/// De-emphasis (DE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeEmphasis {
    /// 75 µs, used in the USA
    #[default]
    Us75 = 0,
    /// 50 µs, used in Europe, Australia and Japan
    Us50 = 1,
}

/// Behaviour of a seek at the band edge (SKMODE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeekMode {
    /// Wrap around to the other end of the band
    Wrap = 0,
    /// Stop at the band limit and report a seek failure
    #[default]
    Stop = 1,
}

/// Seek direction (SEEKUP)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeekDirection {
    /// Towards lower frequencies
    Down = 0,
    /// Towards higher frequencies
    Up = 1,
}

/// Stereo/mono blend level adjustment (BLNDADJ)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlendAdjust {
    /// 31-49 RSSI dBµV
    #[default]
    Rssi31To49 = 0b00,
    /// 37-55 RSSI dBµV (+6 dB)
    Rssi37To55 = 0b01,
    /// 19-37 RSSI dBµV (-12 dB)
    Rssi19To37 = 0b10,
    /// 25-43 RSSI dBµV (-6 dB)
    Rssi25To43 = 0b11,
}

/// Softmute attenuation (SMUTEA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoftmuteAttenuation {
    /// 16 dB (reset default)
    #[default]
    Db16 = 0b00,
    /// 14 dB
    Db14 = 0b01,
    /// 12 dB
    Db12 = 0b10,
    /// 10 dB
    Db10 = 0b11,
}

/// Softmute attack/recover rate (SMUTER)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoftmuteRate {
    /// Fastest (reset default)
    #[default]
    Fastest = 0b00,
    /// Fast
    Fast = 0b01,
    /// Slow
    Slow = 0b10,
    /// Slowest
    Slowest = 0b11,
}

/// General purpose pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gpio {
    /// GPIO1 (SYSCONFIG1[1:0])
    Gpio1,
    /// GPIO2 (SYSCONFIG1[3:2]), also the STC/RDS interrupt output
    Gpio2,
    /// GPIO3 (SYSCONFIG1[5:4]), also the stereo indicator
    Gpio3,
}

/// GPIO pin mode (GPIO1/GPIO2/GPIO3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioMode {
    /// High impedance (reset default)
    #[default]
    HighImpedance = 0b00,
    /// Pin function: reserved on GPIO1, STC/RDS interrupt on GPIO2,
    /// stereo indicator on GPIO3
    Function = 0b01,
    /// Driven low
    Low = 0b10,
    /// Driven high
    High = 0b11,
}

/// Settings applied by [`Si4703::start`](crate::Si4703::start)
///
/// The defaults match a US/European receiver: 87.5-108 MHz, 100 kHz spacing,
/// 75 µs de-emphasis, seeks stopping at the band edge with the strictest
/// impulse and SNR thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Frequency band (BAND)
    pub band: Band,
    /// Channel spacing (SPACE)
    pub spacing: Spacing,
    /// De-emphasis time constant (DE)
    pub de_emphasis: DeEmphasis,
    /// Seek behaviour at the band edge (SKMODE)
    pub seek_mode: SeekMode,
    /// RSSI seek threshold (SEEKTH)
    pub seek_threshold: u8,
    /// FM impulse detection threshold (SKCNT, 4 bits)
    /// - 0 = disabled
    /// - 1 = most stops
    /// - 15 = fewest stops
    pub seek_impulse_count: u8,
    /// SNR threshold (SKSNR, 4 bits)
    /// - 0 = disabled
    /// - 1 = most stops
    /// - 15 = fewest stops
    pub seek_snr: u8,
    /// Disable the automatic gain control (AGCD)
    pub agc_disabled: bool,
    /// Stereo/mono blend range (BLNDADJ)
    pub blend: BlendAdjust,
    /// Softmute attenuation (SMUTEA)
    pub softmute_attenuation: SoftmuteAttenuation,
    /// Softmute attack/recover rate (SMUTER)
    pub softmute_rate: SoftmuteRate,
    /// Maximum number of status polls while waiting for a tune or seek to
    /// complete, and again for the completion flag to clear.
    ///
    /// Waits are effectively unbounded with the default of `u32::MAX`; a
    /// lower limit turns a missing or faulty device into
    /// [`Error::Timeout`](crate::Error::Timeout) instead of a hang.
    pub poll_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            band: Band::UsEurope,
            spacing: Spacing::Khz100,
            de_emphasis: DeEmphasis::Us75,
            seek_mode: SeekMode::Stop,
            seek_threshold: 24,
            seek_impulse_count: 0xF,
            seek_snr: 0xF,
            agc_disabled: false,
            blend: BlendAdjust::Rssi31To49,
            softmute_attenuation: SoftmuteAttenuation::Db16,
            softmute_rate: SoftmuteRate::Fastest,
            poll_limit: u32::MAX,
        }
    }
}

impl Config {
    /// Selects the frequency band.
    pub const fn with_band(mut self, band: Band) -> Self {
        self.band = band;
        self
    }

    /// Selects the channel spacing.
    pub const fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Selects the de-emphasis time constant.
    pub const fn with_de_emphasis(mut self, de_emphasis: DeEmphasis) -> Self {
        self.de_emphasis = de_emphasis;
        self
    }

    /// Selects whether seeks wrap at the band edges.
    pub const fn with_seek_mode(mut self, seek_mode: SeekMode) -> Self {
        self.seek_mode = seek_mode;
        self
    }

    /// Sets the RSSI, impulse count and SNR seek thresholds.
    pub const fn with_seek_thresholds(mut self, rssi: u8, impulse_count: u8, snr: u8) -> Self {
        self.seek_threshold = rssi;
        self.seek_impulse_count = impulse_count;
        self.seek_snr = snr;
        self
    }

    /// Disables (`true`) the automatic gain control.
    pub const fn with_agc_disabled(mut self, disabled: bool) -> Self {
        self.agc_disabled = disabled;
        self
    }

    /// Selects the stereo/mono blend RSSI range.
    pub const fn with_blend(mut self, blend: BlendAdjust) -> Self {
        self.blend = blend;
        self
    }

    /// Sets the softmute attenuation and attack/recover rate.
    pub const fn with_softmute(
        mut self,
        attenuation: SoftmuteAttenuation,
        rate: SoftmuteRate,
    ) -> Self {
        self.softmute_attenuation = attenuation;
        self.softmute_rate = rate;
        self
    }

    /// Sets the maximum number of status polls per seek/tune wait.
    pub const fn with_poll_limit(mut self, poll_limit: u32) -> Self {
        self.poll_limit = poll_limit;
        self
    }

    /// Band limits implied by the band and spacing.
    pub const fn band_limits(&self) -> BandLimits {
        BandLimits::new(self.band, self.spacing)
    }
}

/// Frequency range and channel spacing, in 10 kHz units
///
/// Converts between hardware channel numbers and frequencies:
/// `frequency = spacing * channel + start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandLimits {
    /// Lowest frequency of the band
    pub start: u16,
    /// Highest frequency of the band
    pub end: u16,
    /// Distance between adjacent channels
    pub spacing: u16,
}

impl BandLimits {
    /// Limits of `band` with `spacing` between channels.
    pub const fn new(band: Band, spacing: Spacing) -> Self {
        let (start, end) = band.range();
        Self {
            start,
            end,
            spacing: spacing.ticks(),
        }
    }

    /// Clamps a frequency into the band.
    pub fn clamp(&self, frequency: u16) -> u16 {
        frequency.clamp(self.start, self.end)
    }

    /// Channel number for a frequency, after clamping it into the band.
    ///
    /// Frequencies between two channels round down.
    pub fn channel(&self, frequency: u16) -> u16 {
        (self.clamp(frequency) - self.start) / self.spacing
    }

    /// Frequency of a channel number.
    pub fn frequency(&self, channel: u16) -> u16 {
        self.spacing * channel + self.start
    }

    /// Frequency `steps` channels away from `frequency`, clamped into the band.
    pub fn step(&self, frequency: u16, steps: i32) -> u16 {
        let target = steps
            .saturating_mul(i32::from(self.spacing))
            .saturating_add(i32::from(frequency));
        target.clamp(i32::from(self.start), i32::from(self.end)) as u16
    }
}

impl Default for BandLimits {
    fn default() -> Self {
        Self::new(Band::default(), Spacing::default())
    }
}
