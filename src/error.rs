//! Driver error type

use core::fmt;

/// Errors returned by the Si4703 driver
///
/// `E` is the error type of the I2C bus.
///
/// # Important Notes
/// - Bus errors are never retried by the driver
/// - A failed seek is not an error, see [`Si4703::seek`](crate::Si4703::seek)
/// - Out of range frequencies and volumes are clamped, not rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C transfer failed
    Bus(E),
    /// Driving the reset or SDIO pin failed
    Pin,
    /// The seek/tune complete flag did not reach the expected level within
    /// the configured poll limit
    Timeout,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "I2C bus error: {e:?}"),
            Error::Pin => f.write_str("reset or SDIO pin error"),
            Error::Timeout => f.write_str("timed out waiting for seek/tune complete"),
        }
    }
}
