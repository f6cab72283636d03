//! 256-entry opcode dispatch table.
//!
//! Each entry carries the operation, the addressing mode and the base
//! cycle cost; page-crossing and decimal-mode penalties are debited at
//! execution time. Reserved opcodes dispatch to `Nop` with the exact
//! per-opcode cost and operand skip the board exhibits — e.g. `$03` burns
//! a single cycle and advances nothing, while `$5C` burns eight and skips
//! two operand bytes.

use crate::addressing::Mode;

/// Operation selector for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Ora,
    And,
    Eor,
    Adc,
    Sbc,
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    Stz,
    Asl,
    Lsr,
    Rol,
    Ror,
    Inc,
    Dec,
    Inx,
    Iny,
    Dex,
    Dey,
    Cmp,
    Cpx,
    Cpy,
    Bit,
    Tsb,
    Trb,
    Bpl,
    Bmi,
    Bvc,
    Bvs,
    Bcc,
    Bcs,
    Bne,
    Beq,
    Bra,
    Jmp,
    Jsr,
    Rts,
    Rti,
    Brk,
    Pha,
    Phx,
    Phy,
    Php,
    Pla,
    Plx,
    Ply,
    Plp,
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,
    Clc,
    Sec,
    Cli,
    Sei,
    Cld,
    Sed,
    Clv,
    Nop,
}

/// One dispatch-table entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub op: Op,
    pub mode: Mode,
    pub cycles: i64,
}

const fn e(op: Op, mode: Mode, cycles: i64) -> Entry {
    Entry { op, mode, cycles }
}

#[rustfmt::skip]
pub(crate) static DISPATCH: [Entry; 256] = [
    e(Op::Brk, Mode::Imp, 7),     // $00 BRK
    e(Op::Ora, Mode::XInd, 6),    // $01 ORA (zp,X)
    e(Op::Nop, Mode::Imm, 2),     // $02
    e(Op::Nop, Mode::Imp, 1),     // $03
    e(Op::Tsb, Mode::Zpg, 5),     // $04 TSB zp
    e(Op::Ora, Mode::Zpg, 3),     // $05 ORA zp
    e(Op::Asl, Mode::Zpg, 5),     // $06 ASL zp
    e(Op::Nop, Mode::Imp, 1),     // $07
    e(Op::Php, Mode::Imp, 3),     // $08 PHP
    e(Op::Ora, Mode::Imm, 2),     // $09 ORA #
    e(Op::Asl, Mode::Acc, 2),     // $0A ASL A
    e(Op::Nop, Mode::Imp, 1),     // $0B
    e(Op::Tsb, Mode::Abs, 6),     // $0C TSB abs
    e(Op::Ora, Mode::Abs, 4),     // $0D ORA abs
    e(Op::Asl, Mode::Abs, 6),     // $0E ASL abs
    e(Op::Nop, Mode::Imp, 1),     // $0F
    e(Op::Bpl, Mode::Rel, 2),     // $10 BPL rel
    e(Op::Ora, Mode::IndY, 5),    // $11 ORA (zp),Y
    e(Op::Ora, Mode::ZpgInd, 5),  // $12 ORA (zp)
    e(Op::Nop, Mode::Imp, 1),     // $13
    e(Op::Trb, Mode::Zpg, 5),     // $14 TRB zp
    e(Op::Ora, Mode::ZpgX, 4),    // $15 ORA zp,X
    e(Op::Asl, Mode::ZpgX, 6),    // $16 ASL zp,X
    e(Op::Nop, Mode::Imp, 1),     // $17
    e(Op::Clc, Mode::Imp, 2),     // $18 CLC
    e(Op::Ora, Mode::AbsY, 4),    // $19 ORA abs,Y
    e(Op::Inc, Mode::Acc, 2),     // $1A INC A
    e(Op::Nop, Mode::Imp, 1),     // $1B
    e(Op::Trb, Mode::Abs, 6),     // $1C TRB abs
    e(Op::Ora, Mode::AbsX, 4),    // $1D ORA abs,X
    e(Op::Asl, Mode::AbsXW, 7),   // $1E ASL abs,X
    e(Op::Nop, Mode::Imp, 1),     // $1F
    e(Op::Jsr, Mode::Abs, 6),     // $20 JSR abs
    e(Op::And, Mode::XInd, 6),    // $21 AND (zp,X)
    e(Op::Nop, Mode::Imm, 2),     // $22
    e(Op::Nop, Mode::Imp, 1),     // $23
    e(Op::Bit, Mode::Zpg, 3),     // $24 BIT zp
    e(Op::And, Mode::Zpg, 3),     // $25 AND zp
    e(Op::Rol, Mode::Zpg, 5),     // $26 ROL zp
    e(Op::Nop, Mode::Imp, 1),     // $27
    e(Op::Plp, Mode::Imp, 4),     // $28 PLP
    e(Op::And, Mode::Imm, 2),     // $29 AND #
    e(Op::Rol, Mode::Acc, 2),     // $2A ROL A
    e(Op::Nop, Mode::Imp, 1),     // $2B
    e(Op::Bit, Mode::Abs, 4),     // $2C BIT abs
    e(Op::And, Mode::Abs, 4),     // $2D AND abs
    e(Op::Rol, Mode::Abs, 6),     // $2E ROL abs
    e(Op::Nop, Mode::Imp, 1),     // $2F
    e(Op::Bmi, Mode::Rel, 2),     // $30 BMI rel
    e(Op::And, Mode::IndY, 5),    // $31 AND (zp),Y
    e(Op::And, Mode::ZpgInd, 5),  // $32 AND (zp)
    e(Op::Nop, Mode::Imp, 1),     // $33
    e(Op::Bit, Mode::ZpgX, 4),    // $34 BIT zp,X
    e(Op::And, Mode::ZpgX, 4),    // $35 AND zp,X
    e(Op::Rol, Mode::ZpgX, 6),    // $36 ROL zp,X
    e(Op::Nop, Mode::Imp, 1),     // $37
    e(Op::Sec, Mode::Imp, 2),     // $38 SEC
    e(Op::And, Mode::AbsY, 4),    // $39 AND abs,Y
    e(Op::Dec, Mode::Acc, 2),     // $3A DEC A
    e(Op::Nop, Mode::Imp, 1),     // $3B
    e(Op::Bit, Mode::AbsX, 4),    // $3C BIT abs,X
    e(Op::And, Mode::AbsX, 4),    // $3D AND abs,X
    e(Op::Rol, Mode::AbsXW, 7),   // $3E ROL abs,X
    e(Op::Nop, Mode::Imp, 1),     // $3F
    e(Op::Rti, Mode::Imp, 6),     // $40 RTI
    e(Op::Eor, Mode::XInd, 6),    // $41 EOR (zp,X)
    e(Op::Nop, Mode::Imm, 2),     // $42
    e(Op::Nop, Mode::Imp, 1),     // $43
    e(Op::Nop, Mode::Imm, 3),     // $44
    e(Op::Eor, Mode::Zpg, 3),     // $45 EOR zp
    e(Op::Lsr, Mode::Zpg, 5),     // $46 LSR zp
    e(Op::Nop, Mode::Imp, 1),     // $47
    e(Op::Pha, Mode::Imp, 3),     // $48 PHA
    e(Op::Eor, Mode::Imm, 2),     // $49 EOR #
    e(Op::Lsr, Mode::Acc, 2),     // $4A LSR A
    e(Op::Nop, Mode::Imp, 1),     // $4B
    e(Op::Jmp, Mode::Abs, 3),     // $4C JMP abs
    e(Op::Eor, Mode::Abs, 4),     // $4D EOR abs
    e(Op::Lsr, Mode::Abs, 6),     // $4E LSR abs
    e(Op::Nop, Mode::Imp, 1),     // $4F
    e(Op::Bvc, Mode::Rel, 2),     // $50 BVC rel
    e(Op::Eor, Mode::IndY, 5),    // $51 EOR (zp),Y
    e(Op::Eor, Mode::ZpgInd, 5),  // $52 EOR (zp)
    e(Op::Nop, Mode::Imp, 1),     // $53
    e(Op::Nop, Mode::Imm, 4),     // $54
    e(Op::Eor, Mode::ZpgX, 4),    // $55 EOR zp,X
    e(Op::Lsr, Mode::ZpgX, 6),    // $56 LSR zp,X
    e(Op::Nop, Mode::Imp, 1),     // $57
    e(Op::Cli, Mode::Imp, 2),     // $58 CLI
    e(Op::Eor, Mode::AbsY, 4),    // $59 EOR abs,Y
    e(Op::Phy, Mode::Imp, 3),     // $5A PHY
    e(Op::Nop, Mode::Imp, 1),     // $5B
    e(Op::Nop, Mode::Abs, 8),     // $5C
    e(Op::Eor, Mode::AbsX, 4),    // $5D EOR abs,X
    e(Op::Lsr, Mode::AbsXW, 7),   // $5E LSR abs,X
    e(Op::Nop, Mode::Imp, 1),     // $5F
    e(Op::Rts, Mode::Imp, 6),     // $60 RTS
    e(Op::Adc, Mode::XInd, 6),    // $61 ADC (zp,X)
    e(Op::Nop, Mode::Imm, 2),     // $62
    e(Op::Nop, Mode::Imp, 1),     // $63
    e(Op::Stz, Mode::Zpg, 3),     // $64 STZ zp
    e(Op::Adc, Mode::Zpg, 3),     // $65 ADC zp
    e(Op::Ror, Mode::Zpg, 5),     // $66 ROR zp
    e(Op::Nop, Mode::Imp, 1),     // $67
    e(Op::Pla, Mode::Imp, 4),     // $68 PLA
    e(Op::Adc, Mode::Imm, 2),     // $69 ADC #
    e(Op::Ror, Mode::Acc, 2),     // $6A ROR A
    e(Op::Nop, Mode::Imp, 1),     // $6B
    e(Op::Jmp, Mode::Ind, 6),     // $6C JMP (abs)
    e(Op::Adc, Mode::Abs, 4),     // $6D ADC abs
    e(Op::Ror, Mode::Abs, 6),     // $6E ROR abs
    e(Op::Nop, Mode::Imp, 1),     // $6F
    e(Op::Bvs, Mode::Rel, 2),     // $70 BVS rel
    e(Op::Adc, Mode::IndY, 5),    // $71 ADC (zp),Y
    e(Op::Adc, Mode::ZpgInd, 5),  // $72 ADC (zp)
    e(Op::Nop, Mode::Imp, 1),     // $73
    e(Op::Stz, Mode::ZpgX, 4),    // $74 STZ zp,X
    e(Op::Adc, Mode::ZpgX, 4),    // $75 ADC zp,X
    e(Op::Ror, Mode::ZpgX, 6),    // $76 ROR zp,X
    e(Op::Nop, Mode::Imp, 1),     // $77
    e(Op::Sei, Mode::Imp, 2),     // $78 SEI
    e(Op::Adc, Mode::AbsY, 4),    // $79 ADC abs,Y
    e(Op::Ply, Mode::Imp, 4),     // $7A PLY
    e(Op::Nop, Mode::Imp, 1),     // $7B
    e(Op::Jmp, Mode::AbsXInd, 3), // $7C JMP (abs,X) — board cost, not datasheet
    e(Op::Adc, Mode::AbsX, 4),    // $7D ADC abs,X
    e(Op::Ror, Mode::AbsXW, 7),   // $7E ROR abs,X
    e(Op::Nop, Mode::Imp, 1),     // $7F
    e(Op::Bra, Mode::Rel, 2),     // $80 BRA rel
    e(Op::Sta, Mode::XInd, 6),    // $81 STA (zp,X)
    e(Op::Nop, Mode::Imm, 2),     // $82
    e(Op::Nop, Mode::Imp, 1),     // $83
    e(Op::Sty, Mode::Zpg, 3),     // $84 STY zp
    e(Op::Sta, Mode::Zpg, 3),     // $85 STA zp
    e(Op::Stx, Mode::Zpg, 3),     // $86 STX zp
    e(Op::Nop, Mode::Imp, 1),     // $87
    e(Op::Dey, Mode::Imp, 2),     // $88 DEY
    e(Op::Bit, Mode::Imm, 2),     // $89 BIT # (Z only)
    e(Op::Txa, Mode::Imp, 2),     // $8A TXA
    e(Op::Nop, Mode::Imp, 1),     // $8B
    e(Op::Sty, Mode::Abs, 4),     // $8C STY abs
    e(Op::Sta, Mode::Abs, 4),     // $8D STA abs
    e(Op::Stx, Mode::Abs, 4),     // $8E STX abs
    e(Op::Nop, Mode::Imp, 1),     // $8F
    e(Op::Bcc, Mode::Rel, 2),     // $90 BCC rel
    e(Op::Sta, Mode::IndYW, 6),   // $91 STA (zp),Y
    e(Op::Sta, Mode::ZpgInd, 5),  // $92 STA (zp)
    e(Op::Nop, Mode::Imp, 1),     // $93
    e(Op::Sty, Mode::ZpgX, 4),    // $94 STY zp,X
    e(Op::Sta, Mode::ZpgX, 4),    // $95 STA zp,X
    e(Op::Stx, Mode::ZpgY, 4),    // $96 STX zp,Y
    e(Op::Nop, Mode::Imp, 1),     // $97
    e(Op::Tya, Mode::Imp, 2),     // $98 TYA
    e(Op::Sta, Mode::AbsYW, 5),   // $99 STA abs,Y
    e(Op::Txs, Mode::Imp, 2),     // $9A TXS
    e(Op::Nop, Mode::Imp, 1),     // $9B
    e(Op::Stz, Mode::Abs, 4),     // $9C STZ abs
    e(Op::Sta, Mode::AbsXW, 5),   // $9D STA abs,X
    e(Op::Stz, Mode::AbsXW, 5),   // $9E STZ abs,X
    e(Op::Nop, Mode::Imp, 1),     // $9F
    e(Op::Ldy, Mode::Imm, 2),     // $A0 LDY #
    e(Op::Lda, Mode::XInd, 6),    // $A1 LDA (zp,X)
    e(Op::Ldx, Mode::Imm, 2),     // $A2 LDX #
    e(Op::Nop, Mode::Imp, 1),     // $A3
    e(Op::Ldy, Mode::Zpg, 3),     // $A4 LDY zp
    e(Op::Lda, Mode::Zpg, 3),     // $A5 LDA zp
    e(Op::Ldx, Mode::Zpg, 3),     // $A6 LDX zp
    e(Op::Nop, Mode::Imp, 1),     // $A7
    e(Op::Tay, Mode::Imp, 2),     // $A8 TAY
    e(Op::Lda, Mode::Imm, 2),     // $A9 LDA #
    e(Op::Tax, Mode::Imp, 2),     // $AA TAX
    e(Op::Nop, Mode::Imp, 1),     // $AB
    e(Op::Ldy, Mode::Abs, 4),     // $AC LDY abs
    e(Op::Lda, Mode::Abs, 4),     // $AD LDA abs
    e(Op::Ldx, Mode::Abs, 4),     // $AE LDX abs
    e(Op::Nop, Mode::Imp, 1),     // $AF
    e(Op::Bcs, Mode::Rel, 2),     // $B0 BCS rel
    e(Op::Lda, Mode::IndY, 5),    // $B1 LDA (zp),Y
    e(Op::Lda, Mode::ZpgInd, 5),  // $B2 LDA (zp)
    e(Op::Nop, Mode::Imp, 1),     // $B3
    e(Op::Ldy, Mode::ZpgX, 4),    // $B4 LDY zp,X
    e(Op::Lda, Mode::ZpgX, 4),    // $B5 LDA zp,X
    e(Op::Ldx, Mode::ZpgY, 4),    // $B6 LDX zp,Y
    e(Op::Nop, Mode::Imp, 1),     // $B7
    e(Op::Clv, Mode::Imp, 2),     // $B8 CLV
    e(Op::Lda, Mode::AbsY, 4),    // $B9 LDA abs,Y
    e(Op::Tsx, Mode::Imp, 2),     // $BA TSX
    e(Op::Nop, Mode::Imp, 1),     // $BB
    e(Op::Ldy, Mode::AbsX, 4),    // $BC LDY abs,X
    e(Op::Lda, Mode::AbsX, 4),    // $BD LDA abs,X
    e(Op::Ldx, Mode::AbsY, 4),    // $BE LDX abs,Y
    e(Op::Nop, Mode::Imp, 1),     // $BF
    e(Op::Cpy, Mode::Imm, 2),     // $C0 CPY #
    e(Op::Cmp, Mode::XInd, 6),    // $C1 CMP (zp,X)
    e(Op::Nop, Mode::Imm, 2),     // $C2
    e(Op::Nop, Mode::Imp, 1),     // $C3
    e(Op::Cpy, Mode::Zpg, 3),     // $C4 CPY zp
    e(Op::Cmp, Mode::Zpg, 3),     // $C5 CMP zp
    e(Op::Dec, Mode::Zpg, 5),     // $C6 DEC zp
    e(Op::Nop, Mode::Imp, 1),     // $C7
    e(Op::Iny, Mode::Imp, 2),     // $C8 INY
    e(Op::Cmp, Mode::Imm, 2),     // $C9 CMP #
    e(Op::Dex, Mode::Imp, 2),     // $CA DEX
    e(Op::Nop, Mode::Imp, 1),     // $CB
    e(Op::Cpy, Mode::Abs, 4),     // $CC CPY abs
    e(Op::Cmp, Mode::Abs, 4),     // $CD CMP abs
    e(Op::Dec, Mode::Abs, 6),     // $CE DEC abs
    e(Op::Nop, Mode::Imp, 1),     // $CF
    e(Op::Bne, Mode::Rel, 2),     // $D0 BNE rel
    e(Op::Cmp, Mode::IndY, 5),    // $D1 CMP (zp),Y
    e(Op::Cmp, Mode::ZpgInd, 5),  // $D2 CMP (zp)
    e(Op::Nop, Mode::Imp, 1),     // $D3
    e(Op::Nop, Mode::Imm, 4),     // $D4
    e(Op::Cmp, Mode::ZpgX, 4),    // $D5 CMP zp,X
    e(Op::Dec, Mode::ZpgX, 6),    // $D6 DEC zp,X
    e(Op::Nop, Mode::Imp, 1),     // $D7
    e(Op::Cld, Mode::Imp, 2),     // $D8 CLD
    e(Op::Cmp, Mode::AbsY, 4),    // $D9 CMP abs,Y
    e(Op::Phx, Mode::Imp, 3),     // $DA PHX
    e(Op::Nop, Mode::Imp, 1),     // $DB
    e(Op::Nop, Mode::Abs, 4),     // $DC
    e(Op::Cmp, Mode::AbsX, 4),    // $DD CMP abs,X
    e(Op::Dec, Mode::AbsXW, 7),   // $DE DEC abs,X
    e(Op::Nop, Mode::Imp, 1),     // $DF
    e(Op::Cpx, Mode::Imm, 2),     // $E0 CPX #
    e(Op::Sbc, Mode::XInd, 6),    // $E1 SBC (zp,X)
    e(Op::Nop, Mode::Imm, 2),     // $E2
    e(Op::Nop, Mode::Imp, 1),     // $E3
    e(Op::Cpx, Mode::Zpg, 3),     // $E4 CPX zp
    e(Op::Sbc, Mode::Zpg, 3),     // $E5 SBC zp
    e(Op::Inc, Mode::Zpg, 5),     // $E6 INC zp
    e(Op::Nop, Mode::Imp, 1),     // $E7
    e(Op::Inx, Mode::Imp, 2),     // $E8 INX
    e(Op::Sbc, Mode::Imm, 2),     // $E9 SBC #
    e(Op::Nop, Mode::Imp, 2),     // $EA NOP
    e(Op::Nop, Mode::Imp, 1),     // $EB
    e(Op::Cpx, Mode::Abs, 4),     // $EC CPX abs
    e(Op::Sbc, Mode::Abs, 4),     // $ED SBC abs
    e(Op::Inc, Mode::Abs, 6),     // $EE INC abs
    e(Op::Nop, Mode::Imp, 1),     // $EF
    e(Op::Beq, Mode::Rel, 2),     // $F0 BEQ rel
    e(Op::Sbc, Mode::IndY, 5),    // $F1 SBC (zp),Y
    e(Op::Sbc, Mode::ZpgInd, 5),  // $F2 SBC (zp)
    e(Op::Nop, Mode::Imp, 1),     // $F3
    e(Op::Nop, Mode::Imm, 4),     // $F4
    e(Op::Sbc, Mode::ZpgX, 4),    // $F5 SBC zp,X
    e(Op::Inc, Mode::ZpgX, 6),    // $F6 INC zp,X
    e(Op::Nop, Mode::Imp, 1),     // $F7
    e(Op::Sed, Mode::Imp, 2),     // $F8 SED
    e(Op::Sbc, Mode::AbsY, 4),    // $F9 SBC abs,Y
    e(Op::Plx, Mode::Imp, 4),     // $FA PLX
    e(Op::Nop, Mode::Imp, 1),     // $FB
    e(Op::Nop, Mode::Abs, 4),     // $FC
    e(Op::Sbc, Mode::AbsX, 4),    // $FD SBC abs,X
    e(Op::Inc, Mode::AbsX, 7),    // $FE INC abs,X — takes the page-cross penalty
    e(Op::Nop, Mode::Imp, 1),     // $FF
];
