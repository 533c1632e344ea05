//! One "read, report, wait" cycle.

use embedded_hal::delay::DelayNs;

use crate::dht11::Dht11;
use crate::error::ErrorKind;
use crate::line::TimedLine;
use crate::reading::Reading;
use crate::report::Report;

/// The DHT11 cannot be sampled more often than once per second.
pub const MIN_READ_INTERVAL_MS: u32 = 1_000;

/// Scheduling parameters for [`Monitor`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    interval_ms: u32,
    lamp_test_step_ms: Option<u32>,
}

impl MonitorConfig {
    /// Idle time after each cycle, raised to [`MIN_READ_INTERVAL_MS`] if lower.
    pub const fn new(interval_ms: u32) -> Self {
        let interval_ms = if interval_ms < MIN_READ_INTERVAL_MS {
            MIN_READ_INTERVAL_MS
        } else {
            interval_ms
        };
        MonitorConfig {
            interval_ms,
            lamp_test_step_ms: None,
        }
    }

    /// Runs [`Report::self_test`] at the start of every cycle, lighting each
    /// output for `step_ms`.
    pub const fn with_lamp_test(self, step_ms: u32) -> Self {
        MonitorConfig {
            lamp_test_step_ms: Some(step_ms),
            ..self
        }
    }

    /// Idle time after each cycle, in milliseconds.
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Step of the per-cycle lamp test, if enabled.
    pub const fn lamp_test_step_ms(&self) -> Option<u32> {
        self.lamp_test_step_ms
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(MIN_READ_INTERVAL_MS)
    }
}

/// Pairs a sensor with a reporter and paces reads.
pub struct Monitor<LINE, D, R> {
    sensor: Dht11<LINE, D>,
    reporter: R,
    config: MonitorConfig,
}

impl<LINE, D, R, E> Monitor<LINE, D, R>
where
    LINE: TimedLine<Error = E>,
    D: DelayNs,
    R: Report,
{
    /// Creates a monitor that owns `sensor` and `reporter`.
    pub fn new(sensor: Dht11<LINE, D>, reporter: R, config: MonitorConfig) -> Self {
        Monitor {
            sensor,
            reporter,
            config,
        }
    }

    /// Reads the sensor once, reports the outcome, then idles for the interval.
    ///
    /// Sensor failures are part of the normal outcome; the next cycle simply
    /// tries again. The idle wait happens even when the reporter fails, so a
    /// caller looping on `cycle` never samples the sensor too often.
    ///
    /// # Errors
    ///
    /// Only a failing reporter is surfaced as an error. [`Report::end`] is
    /// still attempted after a failed [`Report::report`], and the first error
    /// wins.
    pub fn cycle(&mut self) -> Result<Result<Reading, ErrorKind>, R::Error> {
        let result = self.read_and_report();
        self.sensor.delay().delay_ms(self.config.interval_ms());
        result
    }

    fn read_and_report(&mut self) -> Result<Result<Reading, ErrorKind>, R::Error> {
        if let Some(step_ms) = self.config.lamp_test_step_ms() {
            self.reporter.self_test(self.sensor.delay(), step_ms)?;
        }
        self.reporter.begin()?;

        let outcome = self.sensor.read().map_err(|err| err.kind());
        #[cfg(feature = "defmt")]
        match &outcome {
            Ok(reading) => defmt::info!(
                "temperature {}C humidity {}%",
                reading.temp_int,
                reading.humidity_int
            ),
            Err(kind) => defmt::warn!("read failed: {}", kind),
        }

        let reported = self.reporter.report(outcome.as_ref().map_err(|kind| *kind));
        let ended = self.reporter.end();
        reported?;
        ended?;
        Ok(outcome)
    }

    /// The reporter, e.g. to show something between cycles.
    pub fn reporter(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// Gives back the sensor driver and reporter.
    pub fn release(self) -> (Dht11<LINE, D>, R) {
        (self.sensor, self.reporter)
    }
}
