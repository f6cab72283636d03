//! Instruction semantics.
//!
//! `execute` looks the fetched opcode up in the dispatch table, resolves
//! the addressing mode, performs the operation and advances PC by the
//! operand length. Base cycle costs come from the table; page-crossing
//! and decimal-mode penalties are debited where they occur.

use emu_core::Bus;

use crate::addressing::Mode;
use crate::flags;
use crate::table::{DISPATCH, Op};
use crate::{Cpu, IRQ_VECTOR, peek16};

impl Cpu {
    /// Decode and execute the opcode in the instruction register.
    pub fn execute<B: Bus>(&mut self, bus: &mut B) {
        self.addr = 0;
        self.page = 0;

        let entry = DISPATCH[usize::from(self.ir)];
        let mode = entry.mode;
        self.cycles -= entry.cycles;

        match entry.op {
            Op::Lda => {
                let value = self.load_operand(bus, mode);
                self.a = value;
                self.update_nz(value);
            }
            Op::Ldx => {
                let value = self.load_operand(bus, mode);
                self.x = value;
                self.update_nz(value);
            }
            Op::Ldy => {
                let value = self.load_operand(bus, mode);
                self.y = value;
                self.update_nz(value);
            }
            Op::Sta => {
                let value = self.a;
                self.store_result(bus, mode, value);
            }
            Op::Stx => {
                let value = self.x;
                self.store_result(bus, mode, value);
            }
            Op::Sty => {
                let value = self.y;
                self.store_result(bus, mode, value);
            }
            Op::Stz => self.store_result(bus, mode, 0),

            Op::Ora => {
                let value = self.load_operand(bus, mode);
                self.a |= value;
                let a = self.a;
                self.update_nz(a);
            }
            Op::And => {
                let value = self.load_operand(bus, mode);
                self.a &= value;
                let a = self.a;
                self.update_nz(a);
            }
            Op::Eor => {
                let value = self.load_operand(bus, mode);
                self.a ^= value;
                let a = self.a;
                self.update_nz(a);
            }
            Op::Adc => {
                let value = self.load_operand(bus, mode);
                self.adc(value);
                let a = self.a;
                self.update_nz(a);
            }
            Op::Sbc => {
                let value = self.load_operand(bus, mode);
                self.sbc(value);
                let a = self.a;
                self.update_nz(a);
            }

            Op::Asl => {
                if mode == Mode::Acc {
                    let result = self.asl_value(self.a);
                    self.a = result;
                    self.update_nz(result);
                } else {
                    let value = self.read_modify(bus, mode);
                    let result = self.asl_value(value);
                    self.write_back(bus, result, mode);
                    self.update_nz(result);
                }
            }
            Op::Rol => {
                if mode == Mode::Acc {
                    let result = self.rol_value(self.a);
                    self.a = result;
                    self.update_nz(result);
                } else {
                    let value = self.read_modify(bus, mode);
                    let result = self.rol_value(value);
                    self.write_back(bus, result, mode);
                    self.update_nz(result);
                }
            }
            // The board updates LSR/ROR flags in a different order than
            // the other shifts: Z from the result, then N forced clear
            // without the decimal-mode negative check.
            Op::Lsr => {
                if mode == Mode::Acc {
                    let result = self.lsr_value(self.a);
                    self.a = result;
                    self.update_zero(result);
                    self.sr &= !flags::N;
                } else {
                    let value = self.read_modify(bus, mode);
                    let result = self.lsr_value(value);
                    self.write_back(bus, result, mode);
                    self.update_zero(result);
                    self.sr &= !flags::N;
                }
            }
            Op::Ror => {
                if mode == Mode::Acc {
                    let result = self.ror_value(self.a);
                    self.a = result;
                    self.update_nz(result);
                } else {
                    let value = self.read_modify(bus, mode);
                    let result = self.ror_value(value);
                    self.write_back(bus, result, mode);
                    self.update_nz(result);
                }
            }

            Op::Inc => {
                if mode == Mode::Acc {
                    self.a = self.a.wrapping_add(1);
                    let a = self.a;
                    self.update_nz(a);
                } else {
                    let value = self.read_modify(bus, mode);
                    let result = value.wrapping_add(1);
                    self.write_back(bus, result, mode);
                    self.update_nz(result);
                }
            }
            Op::Dec => {
                if mode == Mode::Acc {
                    self.a = self.a.wrapping_sub(1);
                    let a = self.a;
                    self.update_nz(a);
                } else {
                    let value = self.read_modify(bus, mode);
                    let result = value.wrapping_sub(1);
                    self.write_back(bus, result, mode);
                    self.update_nz(result);
                }
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                let x = self.x;
                self.update_nz(x);
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                let y = self.y;
                self.update_nz(y);
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                let x = self.x;
                self.update_nz(x);
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                let y = self.y;
                self.update_nz(y);
            }

            Op::Cmp => {
                let reg = self.a;
                self.compare(bus, mode, reg);
            }
            Op::Cpx => {
                let reg = self.x;
                self.compare(bus, mode, reg);
            }
            Op::Cpy => {
                let reg = self.y;
                self.compare(bus, mode, reg);
            }

            Op::Bit => {
                let address = self.resolve(&*bus, mode);
                self.addr = address;
                if mode == Mode::Imm {
                    // The immediate form only touches Z.
                    let value = bus.peek(address);
                    let masked = self.a & value;
                    self.update_zero(masked);
                } else {
                    // N and V are OR-ed in from the operand; the board
                    // never clears them here.
                    let value = bus.read(address);
                    self.sr |= value & flags::N;
                    self.sr |= value & flags::V;
                    let masked = self.a & value;
                    self.update_zero(masked);
                }
                self.pc = self.pc.wrapping_add(mode.operand_len());
            }
            Op::Tsb => {
                let value = self.read_modify(bus, mode);
                let masked = self.a & value;
                self.update_zero(masked);
                let result = value | self.a;
                self.write_back(bus, result, mode);
            }
            Op::Trb => {
                let value = self.read_modify(bus, mode);
                let masked = self.a & value;
                self.update_zero(masked);
                let result = value & !self.a;
                self.write_back(bus, result, mode);
            }

            Op::Bpl => {
                let taken = self.sr & flags::N == 0;
                self.branch(bus, taken);
            }
            Op::Bmi => {
                let taken = self.sr & flags::N != 0;
                self.branch(bus, taken);
            }
            Op::Bvc => {
                let taken = self.sr & flags::V == 0;
                self.branch(bus, taken);
            }
            Op::Bvs => {
                let taken = self.sr & flags::V != 0;
                self.branch(bus, taken);
            }
            Op::Bcc => {
                let taken = self.sr & flags::C == 0;
                self.branch(bus, taken);
            }
            Op::Bcs => {
                let taken = self.sr & flags::C != 0;
                self.branch(bus, taken);
            }
            Op::Bne => {
                let taken = self.sr & flags::Z == 0;
                self.branch(bus, taken);
            }
            Op::Beq => {
                let taken = self.sr & flags::Z != 0;
                self.branch(bus, taken);
            }
            Op::Bra => self.branch(bus, true),

            Op::Jmp => {
                let target = self.resolve(&*bus, mode);
                self.addr = target;
                self.pc = target;
            }
            Op::Jsr => {
                let ret = self.pc.wrapping_add(2);
                self.push(bus, (ret >> 8) as u8);
                self.push(bus, ret as u8);
                let target = peek16(bus, self.pc);
                self.addr = target;
                self.pc = target;
            }
            Op::Rts => {
                let lo = self.pull(bus);
                let hi = self.pull(bus);
                self.pc = u16::from(hi) << 8 | u16::from(lo);
                self.addr = self.pc;
            }
            Op::Rti => {
                self.sr = self.pull(bus) & !(flags::B | flags::U);
                let lo = self.pull(bus);
                let hi = self.pull(bus);
                self.pc = u16::from(hi) << 8 | u16::from(lo);
                self.addr = self.pc;
                bus.sync_interrupts();
            }
            Op::Brk => {
                // Pushes the address of the byte after the padding byte
                // and the status with B and the unused bit forced set.
                // The interrupt-disable flag is left alone.
                let ret = self.pc.wrapping_add(1);
                self.push(bus, (ret >> 8) as u8);
                self.push(bus, ret as u8);
                self.push(bus, self.sr | flags::B | flags::U);
                self.pc = peek16(bus, IRQ_VECTOR);
            }

            Op::Pha => {
                let value = self.a;
                self.push(bus, value);
            }
            Op::Phx => {
                let value = self.x;
                self.push(bus, value);
            }
            Op::Phy => {
                let value = self.y;
                self.push(bus, value);
            }
            Op::Php => {
                let value = self.sr | flags::B | flags::U;
                self.push(bus, value);
            }
            // Pulls restore the register without touching N/Z.
            Op::Pla => self.a = self.pull(bus),
            Op::Plx => self.x = self.pull(bus),
            Op::Ply => self.y = self.pull(bus),
            Op::Plp => self.sr = self.pull(bus) & !(flags::B | flags::U),

            Op::Tax => {
                self.x = self.a;
                let x = self.x;
                self.update_nz(x);
            }
            Op::Tay => {
                self.y = self.a;
                let y = self.y;
                self.update_nz(y);
            }
            Op::Txa => {
                self.a = self.x;
                let a = self.a;
                self.update_nz(a);
            }
            Op::Tya => {
                self.a = self.y;
                let a = self.a;
                self.update_nz(a);
            }
            Op::Tsx => {
                self.x = self.sp;
                let x = self.x;
                self.update_nz(x);
            }
            Op::Txs => self.sp = self.x,

            Op::Clc => self.sr &= !flags::C,
            Op::Sec => self.sr |= flags::C,
            Op::Cli => self.sr &= !flags::I,
            Op::Sei => self.sr |= flags::I,
            Op::Cld => self.sr &= !flags::D,
            Op::Sed => self.sr |= flags::D,
            Op::Clv => self.sr &= !flags::V,

            Op::Nop => self.pc = self.pc.wrapping_add(mode.operand_len()),
        }
    }

    /// Resolve, read the operand and advance PC. Immediate operands come
    /// from the instruction stream; everything else is a decoded access.
    fn load_operand<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> u8 {
        let address = self.resolve(&*bus, mode);
        self.addr = address;
        let value = if mode == Mode::Imm {
            bus.peek(address)
        } else {
            bus.read(address)
        };
        self.pc = self.pc.wrapping_add(mode.operand_len());
        value
    }

    /// Resolve, write through the decoded store path and advance PC.
    fn store_result<B: Bus>(&mut self, bus: &mut B, mode: Mode, value: u8) {
        let address = self.resolve(&*bus, mode);
        self.addr = address;
        bus.write(address, value);
        self.pc = self.pc.wrapping_add(mode.operand_len());
    }

    /// First half of a read-modify-write: resolve and read. The address
    /// is kept in `addr` for `write_back`.
    fn read_modify<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> u8 {
        let address = self.resolve(&*bus, mode);
        self.addr = address;
        bus.read(address)
    }

    /// Second half of a read-modify-write: store and advance PC.
    fn write_back<B: Bus>(&mut self, bus: &mut B, value: u8, mode: Mode) {
        bus.write(self.addr, value);
        self.pc = self.pc.wrapping_add(mode.operand_len());
    }

    fn compare<B: Bus>(&mut self, bus: &mut B, mode: Mode, reg: u8) {
        let address = self.resolve(&*bus, mode);
        self.addr = address;
        let value = bus.read(address);
        self.set_flag(flags::C, reg >= value);
        self.set_flag(flags::Z, reg == value);
        // N reflects the comparison outcome, not bit 7 of the difference.
        self.set_flag(flags::N, reg < value);
        self.pc = self.pc.wrapping_add(mode.operand_len());
    }

    /// Relative branch: 1 extra cycle when taken, 1 more when the target
    /// lands on a different page than the offset operand.
    fn branch<B: Bus>(&mut self, bus: &B, taken: bool) {
        if taken {
            let page = (self.pc >> 8) as u8;
            let offset = bus.peek(self.pc) as i8;
            let target = self.pc.wrapping_add(1).wrapping_add(offset as u16);
            self.pc = target;
            self.addr = target;
            self.cycles -= 1;
            if (target >> 8) as u8 != page {
                self.cycles -= 1;
            }
        } else {
            self.pc = self.pc.wrapping_add(1);
            self.addr = self.pc;
        }
    }

    /// Add with carry: binary pass, then the BCD adjustment when the
    /// decimal flag is set. Each decimal correction costs one cycle.
    pub(crate) fn adc(&mut self, value: u8) {
        let carry = self.sr & flags::C;
        let sum = u16::from(self.a) + u16::from(value) + u16::from(carry);
        let result = sum as u8;
        // V tracks a sign change of the accumulator itself.
        self.set_flag(flags::V, (self.a < 0x80) != (result < 0x80));
        self.set_flag(flags::C, sum > 0xFF);
        self.a = result;

        if self.sr & flags::D != 0 {
            if self.a & 0x0F > 9 {
                self.a = self.a.wrapping_add(0x06);
            }
            if self.a >> 4 > 9 {
                self.a = self.a.wrapping_add(0x60);
                self.sr |= flags::C;
                self.cycles -= 1;
            }
            if self.sr & flags::V != 0 {
                self.sr &= !flags::V;
                self.cycles -= 1;
            }
        }
    }

    /// Subtract with carry. The carry acts as an extra subtrahend and is
    /// *set* on borrow — the board's convention, inverse of the datasheet.
    pub(crate) fn sbc(&mut self, value: u8) {
        let carry = self.sr & flags::C;
        let result = self.a.wrapping_sub(value).wrapping_sub(carry);
        self.set_flag(flags::V, (self.a < 0x80) != (result < 0x80));
        self.set_flag(
            flags::C,
            u16::from(value) + u16::from(carry) > u16::from(self.a),
        );
        self.a = result;

        if self.sr & flags::D != 0 {
            if self.a & 0x0F > 9 {
                self.a = self.a.wrapping_sub(0x06);
            }
            if self.a >> 4 > 9 {
                self.a = self.a.wrapping_sub(0x60);
                self.sr |= flags::C;
                self.cycles -= 1;
            }
            if self.sr & flags::V != 0 {
                self.sr &= !flags::V;
                self.cycles -= 1;
            }
        }
    }

    fn asl_value(&mut self, value: u8) -> u8 {
        self.set_flag(flags::C, value & 0x80 != 0);
        value << 1
    }

    fn lsr_value(&mut self, value: u8) -> u8 {
        self.set_flag(flags::C, value & 0x01 != 0);
        value >> 1
    }

    fn rol_value(&mut self, value: u8) -> u8 {
        let carry_in = self.sr & flags::C;
        self.set_flag(flags::C, value & 0x80 != 0);
        (value << 1) | carry_in
    }

    fn ror_value(&mut self, value: u8) -> u8 {
        let carry_in = (self.sr & flags::C) << 7;
        self.set_flag(flags::C, value & 0x01 != 0);
        (value >> 1) | carry_in
    }
}
