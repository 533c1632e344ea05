//! Deterministic stand-ins for the data line and delay provider.
//!
//! [`ScriptedLine`] plays back a sensor waveform on a virtual clock that
//! advances one tick per `read`. The waveform restarts every time the line is
//! released to input, so repeated cycles see identical behaviour.

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::config::Ticks;
use crate::line::{Mode, TimedLine};

/// Nominal high pulse for a `0` bit.
pub(crate) const ZERO_WIDTH: u32 = 27;
/// Nominal high pulse for a `1` bit.
pub(crate) const ONE_WIDTH: u32 = 70;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Mode(Mode),
    Write(PinState),
    DelayMs(u32),
    DelayUs(u32),
    TimerStart,
    TimerStop,
}

pub(crate) type Log = Rc<RefCell<Vec<Event>>>;

/// Sequence of sensor-driven levels, each held for a number of ticks.
#[derive(Clone, Debug, Default)]
pub(crate) struct Waveform {
    segments: Vec<(PinState, u32)>,
}

impl Waveform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn low(mut self, ticks: u32) -> Self {
        self.segments.push((PinState::Low, ticks));
        self
    }

    pub(crate) fn high(mut self, ticks: u32) -> Self {
        self.segments.push((PinState::High, ticks));
        self
    }

    /// The tail of the acknowledgement low pulse, then its 80us high pulse.
    pub(crate) fn response(self) -> Self {
        self.low(50).high(80)
    }

    pub(crate) fn bit(self, one: bool) -> Self {
        self.low(50).high(if one { ONE_WIDTH } else { ZERO_WIDTH })
    }

    pub(crate) fn byte(self, byte: u8) -> Self {
        (0..8).fold(self, |wave, i| wave.bit(byte & (0x80 >> i) != 0))
    }

    pub(crate) fn bytes(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |wave, b| wave.byte(*b))
    }

    /// Final low pulse after the last bit, before the line idles high.
    pub(crate) fn end(self) -> Self {
        self.low(50)
    }

    /// A complete, well-formed transfer of `bytes`.
    pub(crate) fn transfer(bytes: [u8; 5]) -> Self {
        Self::new().response().bytes(&bytes).end()
    }

    pub(crate) fn duration(&self) -> u32 {
        self.segments.iter().map(|(_, ticks)| ticks).sum()
    }

    fn level_at(&self, tick: u32, idle: PinState) -> PinState {
        let mut end = 0;
        for (level, ticks) in &self.segments {
            end += ticks;
            if tick < end {
                return *level;
            }
        }
        idle
    }
}

pub(crate) struct ScriptedLine {
    wave: Waveform,
    idle: PinState,
    log: Log,
    mode: Mode,
    driven: PinState,
    now: u32,
    released_at: u32,
    mark: u32,
    reads: usize,
    violations: usize,
}

impl ScriptedLine {
    /// A line whose sensor plays `wave` after each release, then idles high.
    pub(crate) fn new(wave: Waveform, log: Log) -> Self {
        ScriptedLine {
            wave,
            idle: PinState::High,
            log,
            mode: Mode::Input,
            driven: PinState::High,
            now: 0,
            released_at: 0,
            mark: 0,
            reads: 0,
            violations: 0,
        }
    }

    /// Absolute virtual time, in ticks.
    pub(crate) fn now(&self) -> u32 {
        self.now
    }

    /// Virtual time at which the last release to input happened.
    pub(crate) fn released_at(&self) -> u32 {
        self.released_at
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads
    }

    /// Writes attempted while the line was in input mode.
    pub(crate) fn violations(&self) -> usize {
        self.violations
    }
}

impl TimedLine for ScriptedLine {
    type Error = Infallible;

    fn set_mode(&mut self, mode: Mode) -> Result<(), Self::Error> {
        if mode == Mode::Input {
            self.released_at = self.now;
        }
        self.mode = mode;
        self.log.borrow_mut().push(Event::Mode(mode));
        Ok(())
    }

    fn write(&mut self, level: PinState) -> Result<(), Self::Error> {
        if self.mode == Mode::Input {
            self.violations += 1;
        }
        self.driven = level;
        self.log.borrow_mut().push(Event::Write(level));
        Ok(())
    }

    fn read(&mut self) -> Result<PinState, Self::Error> {
        let level = match self.mode {
            Mode::Output => self.driven,
            Mode::Input => self.wave.level_at(self.now - self.released_at, self.idle),
        };
        self.now += 1;
        self.reads += 1;
        Ok(level)
    }

    fn start_timer(&mut self) {
        self.log.borrow_mut().push(Event::TimerStart);
    }

    fn stop_timer(&mut self) {
        self.log.borrow_mut().push(Event::TimerStop);
    }

    fn reset_timer(&mut self) {
        self.mark = self.now;
    }

    fn timer_elapsed(&mut self) -> Ticks {
        Ticks(self.now - self.mark)
    }
}

/// Delay provider that records calls instead of sleeping.
pub(crate) struct LoggedDelay {
    log: Log,
}

impl LoggedDelay {
    pub(crate) fn new(log: Log) -> Self {
        LoggedDelay { log }
    }
}

impl DelayNs for LoggedDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

pub(crate) fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}
