// Recording transport used by the unit tests.
//
// SPI, DC, RST and delay all append to one shared log so a test can see
// exactly which level DC had when each byte went out, and where the waits
// fell in the sequence.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{self, ErrorKind, ErrorType as SpiErrorType, Operation, SpiDevice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Dc(bool),
    Rst(bool),
    Write(Vec<u8>),
    DelayNs(u64),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSpiError;

impl spi::Error for MockSpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockSpi {
    log: Log,
    // Fail the n-th write (0-based) and every one after it.
    fail_from: Option<usize>,
    writes: usize,
}

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone(), fail_from: None, writes: 0 }
    }

    pub fn failing_from(log: &Log, nth_write: usize) -> Self {
        Self { log: log.clone(), fail_from: Some(nth_write), writes: 0 }
    }
}

impl SpiErrorType for MockSpi {
    type Error = MockSpiError;
}

impl SpiDevice<u8> for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    if self.fail_from.is_some_and(|n| self.writes >= n) {
                        return Err(MockSpiError);
                    }
                    self.writes += 1;
                    self.log.borrow_mut().push(Event::Write(bytes.to_vec()));
                }
                Operation::DelayNs(ns) => {
                    self.log.borrow_mut().push(Event::DelayNs(*ns as u64));
                }
                _ => unreachable!("driver only writes"),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Line {
    Dc,
    Rst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub struct MockPin {
    log: Log,
    line: Line,
    failing: bool,
}

impl MockPin {
    pub fn new(log: &Log, line: Line) -> Self {
        Self { log: log.clone(), line, failing: false }
    }

    // Every level change fails and nothing is recorded.
    pub fn failing(log: &Log, line: Line) -> Self {
        Self { log: log.clone(), line, failing: true }
    }

    fn record(&mut self, high: bool) -> Result<(), MockPinError> {
        if self.failing {
            return Err(MockPinError);
        }
        let ev = match self.line {
            Line::Dc => Event::Dc(high),
            Line::Rst => Event::Rst(high),
        };
        self.log.borrow_mut().push(ev);
        Ok(())
    }
}

impl PinErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true)
    }
}

pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Event::DelayNs(us as u64 * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ms as u64 * 1_000_000));
    }
}

/// One entry of the controller-visible trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wire {
    Cmd(u8),
    Data(u8),
    DelayMs(u64),
}

/// Collapse the raw log into (is-command, byte) pairs plus delays, tracking
/// the DC level at the moment each byte is clocked out.
pub fn wire_trace(log: &Log) -> Vec<Wire> {
    let mut dc_high = false;
    let mut out = Vec::new();
    for ev in log.borrow().iter() {
        match ev {
            Event::Dc(level) => dc_high = *level,
            Event::Rst(_) => {}
            Event::Write(bytes) => {
                for &b in bytes {
                    out.push(if dc_high { Wire::Data(b) } else { Wire::Cmd(b) });
                }
            }
            Event::DelayNs(ns) => out.push(Wire::DelayMs(ns / 1_000_000)),
        }
    }
    out
}

/// Number of SPI write operations recorded.
pub fn write_count(log: &Log) -> usize {
    log.borrow().iter().filter(|e| matches!(e, Event::Write(_))).count()
}

/// Data bytes following the last 0x2C command.
pub fn pixel_stream(log: &Log) -> Vec<u8> {
    let trace = wire_trace(log);
    let start = trace
        .iter()
        .rposition(|w| *w == Wire::Cmd(0x2C))
        .map(|i| i + 1)
        .unwrap_or(trace.len());
    trace[start..]
        .iter()
        .filter_map(|w| match w {
            Wire::Data(b) => Some(*b),
            _ => None,
        })
        .collect()
}
