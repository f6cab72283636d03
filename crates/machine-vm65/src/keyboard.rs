//! Keyboard report queue.
//!
//! The render loop translates host key events into byte-level key codes
//! (the translation tables are the keyboard collaborator's side of the
//! interface) and feeds them here. Reports are 8 bytes in the usual
//! HID shape — byte 0 holds the modifier bits, byte 1 is reserved,
//! bytes 2-7 hold up to six concurrent key codes — and queue in an
//! 8-deep ring.
//!
//! Delivery is one byte per render iteration: whenever the IRQ line is
//! free and an undelivered report exists, the next byte lands on VIA 1's
//! port A and control line 1 is raised as the manufactured report-ready
//! signal the ROM's interrupt handler polls.

use crate::memory::{SystemBus, VIA1};
use emu_core::Bus;

const REPORT_COUNT: usize = 8;
const REPORT_BYTES: usize = 8;

/// A translated key event, as produced by the keyboard collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A hardware key code (bytes 2-7 of the report).
    Code(u8),
    /// A modifier bit mask for report byte 0 (e.g. 0x02 = left shift).
    Modifier(u8),
}

/// The keyboard report ring.
pub struct KeyReporter {
    reports: [[u8; REPORT_BYTES]; REPORT_COUNT],
    /// Delivery state per report; a slot must be delivered before it can
    /// be reused for a new event.
    sent: [bool; REPORT_COUNT],
    /// Next code lands at this report byte; 2 means no keys held.
    keys_pressed: usize,
    /// Index of the next report to deliver.
    packet: usize,
    /// Index of the next report slot to fill.
    store: usize,
    /// Bytes of the current report already delivered.
    byte: usize,
}

impl KeyReporter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: [[0; REPORT_BYTES]; REPORT_COUNT],
            sent: [true; REPORT_COUNT],
            keys_pressed: 2,
            packet: 0,
            store: 0,
            byte: 0,
        }
    }

    /// Record a key press. Dropped if the ring slot is still queued.
    pub fn key_down(&mut self, key: Key) {
        if !self.sent[self.store] {
            return;
        }
        self.clone_previous();
        match key {
            Key::Modifier(mask) => self.reports[self.store][0] |= mask,
            Key::Code(code) => {
                let already = self.reports[self.store][2..].contains(&code);
                if !already && self.keys_pressed < REPORT_BYTES {
                    self.reports[self.store][self.keys_pressed] = code;
                    self.keys_pressed += 1;
                }
            }
        }
        self.queue_store();
    }

    /// Record a key release. A code that was never reported is ignored.
    pub fn key_up(&mut self, key: Key) {
        if !self.sent[self.store] {
            return;
        }
        self.clone_previous();
        match key {
            Key::Modifier(mask) => {
                self.reports[self.store][0] &= !mask;
                self.queue_store();
            }
            Key::Code(code) => {
                let found = (2..REPORT_BYTES).find(|&i| self.reports[self.store][i] == code);
                if let Some(position) = found {
                    for i in position..REPORT_BYTES - 1 {
                        self.reports[self.store][i] = self.reports[self.store][i + 1];
                    }
                    self.reports[self.store][REPORT_BYTES - 1] = 0;
                    if self.keys_pressed > 2 {
                        self.keys_pressed -= 1;
                    }
                    self.queue_store();
                }
            }
        }
    }

    /// Deliver the next report byte to the keyboard VIA if the IRQ line
    /// is free and an undelivered report exists: feed port A, raise CA1
    /// and republish the interrupt line. After the eighth byte the
    /// report is marked delivered and delivery moves to the next slot.
    pub fn pump(&mut self, machine: &mut SystemBus) {
        if machine.signals.irq.is_asserted() || self.sent[self.packet] {
            return;
        }
        let value = self.reports[self.packet][self.byte];
        machine.vias[VIA1].feed_port_a(value);
        machine.vias[VIA1].assert_ca1();
        machine.sync_interrupts();
        if self.byte == REPORT_BYTES - 1 {
            self.sent[self.packet] = true;
            self.packet = (self.packet + 1) % REPORT_COUNT;
            self.byte = 0;
        } else {
            self.byte += 1;
        }
    }

    /// Anything still waiting for delivery?
    #[must_use]
    pub fn pending(&self) -> bool {
        !self.sent[self.packet]
    }

    // A new report starts from the previous one's held state; byte 1 is
    // reserved and always travels as zero.
    fn clone_previous(&mut self) {
        let prev = (self.store + REPORT_COUNT - 1) % REPORT_COUNT;
        self.reports[self.store][0] = self.reports[prev][0];
        for i in 2..REPORT_BYTES {
            self.reports[self.store][i] = self.reports[prev][i];
        }
    }

    fn queue_store(&mut self) {
        self.sent[self.store] = false;
        self.store = (self.store + 1) % REPORT_COUNT;
    }
}

impl Default for KeyReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_places_code_after_reserved_bytes() {
        let mut keys = KeyReporter::new();
        keys.key_down(Key::Code(0x04));
        assert!(keys.pending());
        assert_eq!(keys.reports[0], [0, 0, 0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn held_keys_carry_into_the_next_report() {
        let mut keys = KeyReporter::new();
        keys.key_down(Key::Code(0x04));
        keys.key_down(Key::Code(0x05));
        assert_eq!(keys.reports[1], [0, 0, 0x04, 0x05, 0, 0, 0, 0]);
    }

    #[test]
    fn duplicate_key_down_is_not_reported_twice() {
        let mut keys = KeyReporter::new();
        keys.key_down(Key::Code(0x04));
        keys.key_down(Key::Code(0x04));
        assert_eq!(keys.reports[1], [0, 0, 0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn modifier_bits_set_and_clear() {
        let mut keys = KeyReporter::new();
        keys.key_down(Key::Modifier(0x02));
        assert_eq!(keys.reports[0][0], 0x02);
        keys.key_up(Key::Modifier(0x02));
        assert_eq!(keys.reports[1][0], 0x00);
    }

    #[test]
    fn key_up_shifts_remaining_codes_down() {
        let mut keys = KeyReporter::new();
        keys.key_down(Key::Code(0x04));
        keys.key_down(Key::Code(0x05));
        keys.key_down(Key::Code(0x06));
        keys.key_up(Key::Code(0x05));
        assert_eq!(keys.reports[3], [0, 0, 0x04, 0x06, 0, 0, 0, 0]);
    }

    #[test]
    fn key_up_for_unreported_code_stores_nothing() {
        let mut keys = KeyReporter::new();
        keys.key_up(Key::Code(0x33));
        assert!(!keys.pending());
    }

    #[test]
    fn at_most_six_concurrent_codes() {
        let mut keys = KeyReporter::new();
        for code in 1..=7 {
            keys.key_down(Key::Code(code));
        }
        // The seventh code found no free report byte.
        assert_eq!(keys.reports[6], [0, 0, 1, 2, 3, 4, 5, 6]);
    }
}
