//! The timed data line the driver talks through.
//!
//! [`TimedLine`] is the whole hardware surface the protocol needs: one
//! direction-switchable pin and a free-running counter. [`OpenDrainLine`]
//! implements it on top of an `embedded-hal` pin.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::config::Ticks;

/// Direction of the data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The host drives the level.
    Output,
    /// The host only senses; the sensor (or pull-up) drives the level.
    Input,
}

/// A single bidirectional pin paired with a microsecond-scale counter.
pub trait TimedLine {
    type Error;

    /// Switches pin direction.
    fn set_mode(&mut self, mode: Mode) -> Result<(), Self::Error>;

    /// Drives the pin. Only valid in [`Mode::Output`].
    fn write(&mut self, level: PinState) -> Result<(), Self::Error>;

    /// Samples the current level. Valid in either mode.
    fn read(&mut self) -> Result<PinState, Self::Error>;

    /// Lets the counter run. Counters that never stop can ignore this.
    fn start_timer(&mut self) {}

    /// Halts the counter between reads.
    fn stop_timer(&mut self) {}

    /// Restarts elapsed-time measurement from zero.
    fn reset_timer(&mut self);

    /// Ticks since the last [`reset_timer`](TimedLine::reset_timer).
    fn timer_elapsed(&mut self) -> Ticks;
}

impl<T: TimedLine + ?Sized> TimedLine for &mut T {
    type Error = T::Error;

    fn set_mode(&mut self, mode: Mode) -> Result<(), Self::Error> {
        T::set_mode(self, mode)
    }

    fn write(&mut self, level: PinState) -> Result<(), Self::Error> {
        T::write(self, level)
    }

    fn read(&mut self) -> Result<PinState, Self::Error> {
        T::read(self)
    }

    fn start_timer(&mut self) {
        T::start_timer(self)
    }

    fn stop_timer(&mut self) {
        T::stop_timer(self)
    }

    fn reset_timer(&mut self) {
        T::reset_timer(self)
    }

    fn timer_elapsed(&mut self) -> Ticks {
        T::timer_elapsed(self)
    }
}

/// A free-running hardware counter.
///
/// The count may wrap; elapsed time is computed with wrapping subtraction.
pub trait FreeRunningCounter {
    /// Current raw count.
    fn now(&mut self) -> u32;

    /// Starts counting, if the counter can be gated.
    fn start(&mut self) {}

    /// Stops counting, if the counter can be gated.
    fn stop(&mut self) {}
}

impl<F> FreeRunningCounter for F
where
    F: FnMut() -> u32,
{
    fn now(&mut self) -> u32 {
        self()
    }
}

/// Errors raised by [`OpenDrainLine`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum LineError<E> {
    /// Error from the underlying GPIO pin.
    Pin(E),
    /// A write was attempted while the line was in [`Mode::Input`].
    WrongMode,
}

impl<E> From<E> for LineError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}

/// [`TimedLine`] over an open-drain `embedded-hal` pin and a counter.
///
/// Input mode releases the line high so the pull-up and the sensor own it.
pub struct OpenDrainLine<PIN, C> {
    pin: PIN,
    counter: C,
    mode: Mode,
    mark: u32,
}

impl<PIN, C, E> OpenDrainLine<PIN, C>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    C: FreeRunningCounter,
{
    /// Creates a line in [`Mode::Input`]. The pin level is left untouched.
    pub fn new(pin: PIN, mut counter: C) -> Self {
        let mark = counter.now();
        OpenDrainLine {
            pin,
            counter,
            mode: Mode::Input,
            mark,
        }
    }

    /// Current direction of the line.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Gives back the pin and counter.
    pub fn release(self) -> (PIN, C) {
        (self.pin, self.counter)
    }
}

impl<PIN, C, E> TimedLine for OpenDrainLine<PIN, C>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    C: FreeRunningCounter,
{
    type Error = LineError<E>;

    fn set_mode(&mut self, mode: Mode) -> Result<(), Self::Error> {
        if mode == Mode::Input {
            self.pin.set_high()?;
        }
        self.mode = mode;
        Ok(())
    }

    fn write(&mut self, level: PinState) -> Result<(), Self::Error> {
        if self.mode != Mode::Output {
            return Err(LineError::WrongMode);
        }
        self.pin.set_state(level)?;
        Ok(())
    }

    fn read(&mut self) -> Result<PinState, Self::Error> {
        Ok(PinState::from(self.pin.is_high()?))
    }

    fn start_timer(&mut self) {
        self.counter.start();
    }

    fn stop_timer(&mut self) {
        self.counter.stop();
    }

    fn reset_timer(&mut self) {
        self.mark = self.counter.now();
    }

    fn timer_elapsed(&mut self) -> Ticks {
        Ticks(self.counter.now().wrapping_sub(self.mark))
    }
}
