//! Global processor control lines.
//!
//! The board routes four lines between the CPU, the peripheral chips and
//! the front end: RESET, READY, NMI and IRQ. Three of them are active-low,
//! and the physical wire convention leaks into the chip models (a VIA
//! reports "true" when *no* interrupt is pending). To keep that polarity
//! from being silently inverted during maintenance, lines are a named
//! two-state type: callers speak in terms of asserted/released and the
//! wire level stays an implementation detail.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    ActiveLow,
    ActiveHigh,
}

/// One control line with explicit polarity.
///
/// The stored value is the physical wire level; `assert`/`release` and
/// `is_asserted` translate through the line's polarity so call sites never
/// compare raw booleans.
#[derive(Debug)]
pub struct Line {
    polarity: Polarity,
    level: AtomicBool,
}

impl Line {
    /// An active-low line in its released (high) state.
    #[must_use]
    pub fn active_low() -> Self {
        Self {
            polarity: Polarity::ActiveLow,
            level: AtomicBool::new(true),
        }
    }

    /// An active-high line in its released (low) state.
    #[must_use]
    pub fn active_high() -> Self {
        Self {
            polarity: Polarity::ActiveHigh,
            level: AtomicBool::new(false),
        }
    }

    pub fn assert(&self) {
        self.level
            .store(self.polarity == Polarity::ActiveHigh, Ordering::Relaxed);
    }

    pub fn release(&self) {
        self.level
            .store(self.polarity == Polarity::ActiveLow, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_asserted(&self) -> bool {
        match self.polarity {
            Polarity::ActiveLow => !self.level.load(Ordering::Relaxed),
            Polarity::ActiveHigh => self.level.load(Ordering::Relaxed),
        }
    }

    /// The physical wire level (true = high).
    #[must_use]
    pub fn level(&self) -> bool {
        self.level.load(Ordering::Relaxed)
    }

    /// Drive the physical wire level directly (true = high). Used when a
    /// level is computed from device outputs rather than asserted by name.
    pub fn set_level(&self, level: bool) {
        self.level.store(level, Ordering::Relaxed);
    }
}

/// The machine's global signal block.
///
/// Shared by the CPU loop, the render loop and the DMA worker. RESET comes
/// up asserted so the CPU performs its power-on reset sequence on the
/// first tick; READY gates the clock; IRQ is recomputed from the chips'
/// open-drain outputs by whoever changes interrupt state.
#[derive(Debug)]
pub struct Signals {
    /// Reset line (active-low).
    pub reset: Line,
    /// Ready line (active-high); deasserting it halts the clock.
    pub ready: Line,
    /// Non-maskable interrupt line (active-low).
    pub nmi: Line,
    /// Interrupt request line (active-low, open-drain AND of the chips).
    pub irq: Line,
    /// Render-owned liveness flag; the CPU loop exits when it drops.
    running: AtomicBool,
}

impl Signals {
    #[must_use]
    pub fn new() -> Self {
        let reset = Line::active_low();
        reset.assert();
        Self {
            reset,
            ready: {
                let ready = Line::active_high();
                ready.assert();
                ready
            },
            nmi: Line::active_low(),
            irq: Line::active_low(),
            running: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Cooperative shutdown: the CPU loop observes this at its next
    /// instruction boundary and exits.
    pub fn halt(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_low_polarity() {
        let line = Line::active_low();
        assert!(!line.is_asserted());
        assert!(line.level(), "released active-low line idles high");

        line.assert();
        assert!(line.is_asserted());
        assert!(!line.level(), "asserted active-low line pulls the wire low");
    }

    #[test]
    fn active_high_polarity() {
        let line = Line::active_high();
        assert!(!line.is_asserted());
        assert!(!line.level());

        line.assert();
        assert!(line.is_asserted());
        assert!(line.level());
    }

    #[test]
    fn signals_power_on_state() {
        let signals = Signals::new();
        assert!(signals.reset.is_asserted(), "RESET asserted at power-on");
        assert!(signals.ready.is_asserted(), "READY asserted at power-on");
        assert!(!signals.nmi.is_asserted());
        assert!(!signals.irq.is_asserted());
        assert!(signals.is_running());
    }
}
