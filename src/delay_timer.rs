//! Busy-wait delay on a free-running hardware counter.
//!
//! The counter only needs to tick at a known rate and wrap at 16 bits.
//! Waits longer than half the rollover period are split into smaller
//! chunks, so the counter is never asked to measure a span it cannot
//! represent.

use embedded_hal::delay::DelayNs;

/// A monotonically increasing counter that wraps at `u16::MAX`.
pub trait FreeRunningCounter {
    /// Counter ticks per microsecond (1 for a timer prescaled to 1 MHz).
    fn ticks_per_us(&self) -> u32;

    /// Current counter value.
    fn now(&mut self) -> u16;
}

// Largest span measured in one go. Half the period keeps `wrapping_sub`
// unambiguous even if the loop is preempted for a while.
const MAX_CHUNK_TICKS: u32 = (u16::MAX as u32) / 2;

pub struct CounterDelay<C> {
    counter: C,
}

impl<C: FreeRunningCounter> CounterDelay<C> {
    pub fn new(counter: C) -> Self {
        Self { counter }
    }

    pub fn release(self) -> C {
        self.counter
    }

    #[inline]
    fn spin_ticks(&mut self, ticks: u16) {
        let start = self.counter.now();
        while self.counter.now().wrapping_sub(start) < ticks {
            core::hint::spin_loop();
        }
    }

    fn spin_us(&mut self, us: u32) {
        let tpu = self.counter.ticks_per_us().max(1);
        let max_chunk_us = (MAX_CHUNK_TICKS / tpu).max(1);

        let mut remaining = us;
        while remaining > 0 {
            let step = remaining.min(max_chunk_us);
            let ticks = (step * tpu).min(MAX_CHUNK_TICKS) as u16;
            self.spin_ticks(ticks);
            remaining -= step;
        }
    }
}

impl<C: FreeRunningCounter> DelayNs for CounterDelay<C> {
    #[inline]
    fn delay_ns(&mut self, ns: u32) {
        self.spin_us(ns.div_ceil(1_000));
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.spin_us(us);
    }

    // Repeated 1 ms waits, never one long counter span.
    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.spin_us(1_000);
        }
    }
}
