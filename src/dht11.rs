//! Bit-banged DHT11 protocol driver.
//!
//! ```txt
//!      START           ACK        DATA (x40)
//!   ┌─────────┐ ┌────┐ ┌────┐ ┌────┐ ┌────┐ ┌────┐ ┌────┐
//! ──┐         ┌──┐   ┌──────┐ ┌─────┐ ┌──────┐ ┌──────────┐
//!   │         │  │   │      │ │     │ │      │ │          │
//!   └─────────┘  └───┘      └─┘     └─┘      └─┘          └──
//!     25ms    30us  80us 80us 50us 27us 50us   70us
//!                             (bit 0)     (bit 1)
//! ```
//!
//! Every wait is a busy poll against the line's counter, which is reset at
//! each phase boundary. The width of each data bit's high pulse decides its
//! value.

use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::config::{Ticks, Timing};
use crate::error::DhtError;
use crate::line::{Mode, TimedLine};
use crate::reading::{Frame, Reading};

/// Driver for the DHT11 temperature and humidity sensor.
pub struct Dht11<LINE, D> {
    line: LINE,
    delay: D,
    timing: Timing,
}

impl<LINE, D, E> Dht11<LINE, D>
where
    LINE: TimedLine<Error = E>,
    D: DelayNs,
{
    /// Creates a new instance of the DHT11 driver with the default [`Timing`].
    ///
    /// # Arguments
    ///
    /// * `line` - The timed data line the sensor is wired to.
    /// * `delay` - A delay provider used for the start signal holds.
    pub fn new(line: LINE, delay: D) -> Self {
        Self::with_timing(line, delay, Timing::default())
    }

    /// Creates a driver with custom timing, e.g. for a faster counter.
    pub fn with_timing(line: LINE, delay: D, timing: Timing) -> Self {
        Dht11 {
            line,
            delay,
            timing,
        }
    }

    /// The timing this driver was built with.
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Gives back the line and delay provider.
    pub fn release(self) -> (LINE, D) {
        (self.line, self.delay)
    }

    pub(crate) fn delay(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Reads a measurement and validates its checksum.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if all 40 bits arrived and the checksum is valid.
    /// * `Err(DhtError)` if the sensor did not answer, a bit timed out, or the
    ///   checksum does not match.
    pub fn read(&mut self) -> Result<Reading, DhtError<E>> {
        self.read_frame()?.validate()
    }

    /// Runs one full transfer and returns the five raw bytes.
    ///
    /// The checksum is not checked here; see [`Frame::validate`].
    pub fn read_frame(&mut self) -> Result<Frame, DhtError<E>> {
        self.start()?;

        self.line.start_timer();
        let result = self.receive();
        self.line.stop_timer();

        #[cfg(feature = "defmt")]
        match &result {
            Ok(frame) => defmt::trace!("dht11 frame {:x}", frame.bytes),
            Err(err) => defmt::debug!("dht11 read failed: {}", err.kind()),
        }

        result
    }

    /// Sends the start signal: low for `start_low_ms`, high for
    /// `start_high_us`, then releases the line to the sensor.
    fn start(&mut self) -> Result<(), DhtError<E>> {
        self.line.set_mode(Mode::Output)?;
        self.line.write(PinState::Low)?;
        self.delay.delay_ms(self.timing.start_low_ms);
        self.line.write(PinState::High)?;
        self.delay.delay_us(self.timing.start_high_us);
        self.line.set_mode(Mode::Input)?;
        Ok(())
    }

    fn receive(&mut self) -> Result<Frame, DhtError<E>> {
        self.check_response()?;

        let mut bytes = [0; 5];
        for b in bytes.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(Frame::new(bytes))
    }

    /// Waits out the sensor's acknowledgement: ~80us low, then ~80us high.
    ///
    /// Unlike a data bit, an acknowledgement phase that reaches
    /// `response_timeout` ticks is already a failure.
    fn check_response(&mut self) -> Result<(), DhtError<E>> {
        self.acknowledge_phase(PinState::Low)?;
        self.acknowledge_phase(PinState::High)
    }

    fn acknowledge_phase(&mut self, level: PinState) -> Result<(), DhtError<E>> {
        let bound = self.timing.response_timeout;
        let elapsed = self.wait_while(level, bound, DhtError::NoResponse)?;
        if elapsed >= bound {
            return Err(DhtError::NoResponse);
        }
        Ok(())
    }

    /// Reads one byte, most significant bit first.
    fn read_byte(&mut self) -> Result<u8, DhtError<E>> {
        let mut byte: u8 = 0;

        for i in 0..8 {
            let bit_mask = 1 << (7 - i);
            if self.read_bit()? {
                byte |= bit_mask;
            }
        }

        Ok(byte)
    }

    /// Reads a single bit.
    ///
    /// Each bit starts with a ~50us low pulse. The high pulse that follows
    /// lasts ~27us for a `0` and ~70us for a `1`.
    fn read_bit(&mut self) -> Result<bool, DhtError<E>> {
        let bound = self.timing.bit_timeout;
        self.wait_while(PinState::Low, bound, DhtError::Timeout)?;
        let width = self.wait_while(PinState::High, bound, DhtError::Timeout)?;
        Ok(width > self.timing.bit_threshold)
    }

    /// Polls until the line leaves `level`, returning how long that took.
    ///
    /// # Errors
    ///
    /// Returns `expired` once more than `bound` ticks pass without a change.
    fn wait_while(
        &mut self,
        level: PinState,
        bound: Ticks,
        expired: DhtError<E>,
    ) -> Result<Ticks, DhtError<E>> {
        self.line.reset_timer();
        loop {
            if self.line.read()? != level {
                return Ok(self.line.timer_elapsed());
            }
            if self.line.timer_elapsed() > bound {
                return Err(expired);
            }
        }
    }
}
