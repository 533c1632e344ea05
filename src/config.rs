//! Timing parameters for the DHT11 protocol.
//!
//! All tick values assume a counter running at one tick per microsecond.
//! Use [`Timing::scaled`] when the counter runs at another rate.

/// A duration measured in counter ticks.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticks(pub u32);

/// Shortest start-low hold the sensor accepts, in milliseconds.
pub const MIN_START_LOW_MS: u32 = 18;

/// Timing constants used by [`Dht11`](crate::Dht11).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// How long the host holds the line low to request a reading.
    pub start_low_ms: u32,
    /// How long the host drives the line high before releasing it.
    pub start_high_us: u32,
    /// Bound on each half of the sensor's acknowledgement (~80us each).
    pub response_timeout: Ticks,
    /// Bound on each half of a data bit (~50us low, 26-70us high).
    pub bit_timeout: Ticks,
    /// High pulses longer than this decode as `1`.
    pub bit_threshold: Ticks,
}

impl Timing {
    /// The defaults for a 1 tick/us counter.
    pub const fn new() -> Self {
        Timing {
            start_low_ms: 25,
            start_high_us: 30,
            response_timeout: Ticks(100),
            bit_timeout: Ticks(100),
            bit_threshold: Ticks(50),
        }
    }

    /// Scales every tick bound for a counter that advances `ticks` every
    /// `per_us` microseconds, e.g. `(8, 1)` at 8 MHz or `(1, 2)` at 500 kHz.
    ///
    /// Results round down. A zero in either argument is treated as one. The
    /// start holds are real-time delays and are left alone.
    pub const fn scaled(self, ticks: u32, per_us: u32) -> Self {
        let ticks = if ticks == 0 { 1 } else { ticks };
        let per_us = if per_us == 0 { 1 } else { per_us };
        Timing {
            response_timeout: scale(self.response_timeout, ticks, per_us),
            bit_timeout: scale(self.bit_timeout, ticks, per_us),
            bit_threshold: scale(self.bit_threshold, ticks, per_us),
            ..self
        }
    }

    /// Sets the start-low hold, never going below [`MIN_START_LOW_MS`].
    pub const fn with_start_low_ms(self, ms: u32) -> Self {
        let start_low_ms = if ms < MIN_START_LOW_MS {
            MIN_START_LOW_MS
        } else {
            ms
        };
        Timing {
            start_low_ms,
            ..self
        }
    }
}

const fn scale(value: Ticks, ticks: u32, per_us: u32) -> Ticks {
    let scaled = value.0 as u64 * ticks as u64 / per_us as u64;
    if scaled > u32::MAX as u64 {
        Ticks(u32::MAX)
    } else {
        Ticks(scaled as u32)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}
