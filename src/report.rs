//! Reporting a cycle's outcome.
//!
//! [`IndicatorBank`] drives the classic board layout: a "working" lamp, an
//! error lamp, and five lamps showing a number in binary.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::error::ErrorKind;
use crate::reading::Reading;

/// Something that presents each read cycle's result.
pub trait Report {
    type Error;

    /// Exercises the outputs so a dead one is visible.
    ///
    /// Runs before [`begin`](Report::begin) when the monitor is configured
    /// with a lamp test. Does nothing by default.
    fn self_test<D: DelayNs>(
        &mut self,
        _delay: &mut D,
        _step_ms: u32,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called before the sensor is read.
    fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Presents a validated reading or the kind of failure.
    fn report(&mut self, outcome: Result<&Reading, ErrorKind>) -> Result<(), Self::Error>;

    /// Called once the cycle is over, before the idle wait.
    fn end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Number of lamps showing the binary value.
pub const NUMBER_LAMPS: usize = 5;

/// Default step of [`IndicatorBank::lamp_test`], in milliseconds.
pub const LAMP_TEST_STEP_MS: u32 = 400;

/// A bank of indicator outputs.
pub struct IndicatorBank<P> {
    working: P,
    error: P,
    /// Least significant bit first.
    number: [P; NUMBER_LAMPS],
}

impl<P, E> IndicatorBank<P>
where
    P: OutputPin<Error = E>,
{
    /// Creates a bank from its lamps. Pin levels are left untouched.
    ///
    /// # Arguments
    ///
    /// * `working` - Lit while a read cycle is in progress.
    /// * `error` - Lit when the number lamps show an error code.
    /// * `number` - Five lamps, least significant bit first.
    pub fn new(working: P, error: P, number: [P; NUMBER_LAMPS]) -> Self {
        IndicatorBank {
            working,
            error,
            number,
        }
    }

    /// Shows `number` in binary on the number lamps and sets the error lamp.
    ///
    /// Only the low five bits of `number` are visible.
    pub fn show(&mut self, error: bool, number: u8) -> Result<(), E> {
        self.error.set_state(error.into())?;
        for (bit, lamp) in self.number.iter_mut().enumerate() {
            lamp.set_state((number & (1 << bit) != 0).into())?;
        }
        Ok(())
    }

    /// Lights or clears the working lamp.
    pub fn set_working(&mut self, on: bool) -> Result<(), E> {
        self.working.set_state(on.into())
    }

    /// Turns every lamp off.
    pub fn clear(&mut self) -> Result<(), E> {
        self.working.set_low()?;
        self.error.set_low()?;
        for lamp in self.number.iter_mut() {
            lamp.set_low()?;
        }
        Ok(())
    }

    /// Lights every lamp in turn, one `step_ms` at a time.
    ///
    /// Order: working, error, then the number lamps from the most
    /// significant down. Every lamp is off when this returns.
    pub fn lamp_test<D: DelayNs>(&mut self, delay: &mut D, step_ms: u32) -> Result<(), E> {
        self.clear()?;
        delay.delay_ms(step_ms);

        self.working.set_high()?;
        delay.delay_ms(step_ms);
        self.error.set_high()?;
        self.working.set_low()?;
        delay.delay_ms(step_ms);

        let mut previous = &mut self.error;
        for lamp in self.number.iter_mut().rev() {
            lamp.set_high()?;
            previous.set_low()?;
            delay.delay_ms(step_ms);
            previous = lamp;
        }
        previous.set_low()?;
        delay.delay_ms(step_ms);
        Ok(())
    }

    /// Gives back the pins: working, error, number lamps.
    pub fn release(self) -> (P, P, [P; NUMBER_LAMPS]) {
        (self.working, self.error, self.number)
    }
}

impl<P, E> Report for IndicatorBank<P>
where
    P: OutputPin<Error = E>,
{
    type Error = E;

    fn self_test<D: DelayNs>(&mut self, delay: &mut D, step_ms: u32) -> Result<(), E> {
        self.lamp_test(delay, step_ms)
    }

    fn begin(&mut self) -> Result<(), E> {
        self.set_working(true)
    }

    fn report(&mut self, outcome: Result<&Reading, ErrorKind>) -> Result<(), E> {
        match outcome {
            Ok(reading) => self.show(false, reading.temperature()),
            Err(kind) => self.show(true, kind.code()),
        }
    }

    fn end(&mut self) -> Result<(), E> {
        self.set_working(false)
    }
}
