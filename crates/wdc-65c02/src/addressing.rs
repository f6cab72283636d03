//! Addressing-mode resolution.
//!
//! Each mode computes an effective address from the operand bytes after
//! the opcode. Operand and pointer fetches are plain memory reads; only
//! the final data access (done by the caller) goes through device decode.
//! The indexed read modes (`AbsX`, `AbsY`, `IndY`) debit one cycle when
//! the effective address lands on a different page than the reference
//! operand byte; the store/modify variants (`AbsXW`, `AbsYW`, `IndYW`)
//! always cost their base amount.

use emu_core::Bus;

use crate::{Cpu, peek16};

/// Addressing mode of one dispatch-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// No operand (register and stack forms).
    Imp,
    /// Operate on the accumulator.
    Acc,
    /// Immediate: the operand byte itself.
    Imm,
    /// Relative: one signed offset byte (branches).
    Rel,
    /// Zero page.
    Zpg,
    /// Zero page indexed by X (wraps within the zero page).
    ZpgX,
    /// Zero page indexed by Y (wraps within the zero page).
    ZpgY,
    /// Zero page indirect.
    ZpgInd,
    /// Zero page indexed indirect: ($LL,X).
    XInd,
    /// Zero page indirect indexed: ($LL),Y with page-cross penalty.
    IndY,
    /// ($LL),Y store form, no page-cross penalty.
    IndYW,
    /// Absolute.
    Abs,
    /// Absolute indexed by X with page-cross penalty.
    AbsX,
    /// Absolute indexed by X, no penalty (stores and modifies).
    AbsXW,
    /// Absolute indexed by Y with page-cross penalty.
    AbsY,
    /// Absolute indexed by Y, no penalty (stores).
    AbsYW,
    /// Absolute indirect.
    Ind,
    /// Absolute indexed indirect: ($LLHH,X).
    AbsXInd,
}

impl Mode {
    /// Operand bytes following the opcode.
    pub(crate) fn operand_len(self) -> u16 {
        match self {
            Mode::Imp | Mode::Acc => 0,
            Mode::Imm
            | Mode::Rel
            | Mode::Zpg
            | Mode::ZpgX
            | Mode::ZpgY
            | Mode::ZpgInd
            | Mode::XInd
            | Mode::IndY
            | Mode::IndYW => 1,
            Mode::Abs
            | Mode::AbsX
            | Mode::AbsXW
            | Mode::AbsY
            | Mode::AbsYW
            | Mode::Ind
            | Mode::AbsXInd => 2,
        }
    }
}

impl Cpu {
    /// Compute the effective address for `mode`. PC still points at the
    /// first operand byte; the caller advances it afterwards.
    pub(crate) fn resolve<B: Bus>(&mut self, bus: &B, mode: Mode) -> u16 {
        match mode {
            Mode::Imp | Mode::Acc | Mode::Imm | Mode::Rel => self.pc,
            Mode::Zpg => u16::from(bus.peek(self.pc)),
            Mode::ZpgX => u16::from(bus.peek(self.pc).wrapping_add(self.x)),
            Mode::ZpgY => u16::from(bus.peek(self.pc).wrapping_add(self.y)),
            Mode::ZpgInd => {
                // Pointer high byte comes from zp+1 without wrapping into
                // the zero page: a pointer at $FF reads its high byte
                // from $0100.
                let zp = u16::from(bus.peek(self.pc));
                u16::from(bus.peek(zp + 1)) << 8 | u16::from(bus.peek(zp))
            }
            Mode::XInd => {
                // Pre-indexed pointer wraps within the zero page.
                let zp = bus.peek(self.pc).wrapping_add(self.x);
                u16::from(bus.peek(u16::from(zp.wrapping_add(1)))) << 8
                    | u16::from(bus.peek(u16::from(zp)))
            }
            Mode::IndY | Mode::IndYW => {
                let zp = u16::from(bus.peek(self.pc));
                let base = u16::from(bus.peek(zp + 1)) << 8 | u16::from(bus.peek(zp));
                let address = base.wrapping_add(u16::from(self.y));
                if mode == Mode::IndY {
                    self.page = (self.pc >> 8) as u8;
                    if (address >> 8) as u8 != self.page {
                        self.cycles -= 1;
                    }
                }
                address
            }
            Mode::Abs => peek16(bus, self.pc),
            Mode::AbsX | Mode::AbsXW => {
                let address = peek16(bus, self.pc).wrapping_add(u16::from(self.x));
                if mode == Mode::AbsX {
                    self.page = (self.pc.wrapping_add(1) >> 8) as u8;
                    if (address >> 8) as u8 != self.page {
                        self.cycles -= 1;
                    }
                }
                address
            }
            Mode::AbsY | Mode::AbsYW => {
                let address = peek16(bus, self.pc).wrapping_add(u16::from(self.y));
                if mode == Mode::AbsY {
                    self.page = (self.pc.wrapping_add(1) >> 8) as u8;
                    if (address >> 8) as u8 != self.page {
                        self.cycles -= 1;
                    }
                }
                address
            }
            Mode::Ind => {
                let pointer = peek16(bus, self.pc);
                peek16(bus, pointer)
            }
            Mode::AbsXInd => {
                let pointer = peek16(bus, self.pc).wrapping_add(u16::from(self.x));
                peek16(bus, pointer)
            }
        }
    }
}
