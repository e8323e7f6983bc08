//! The CPU instruction decoder and executor (spec §9 redesign): a pure-ish
//! decode step that turns an opcode byte stream into a tagged [`Inst`], and
//! a single exhaustive `match` that executes it. Replaces a closure-table
//! dispatch with data the rest of the core can reason about directly (e.g.
//! cycle accounting lives next to the case that earns it, not in a parallel
//! table).

use crate::cpu::Cpu;

pub const CB_PREFIX: u8 = 0xcb;

/// An 8-bit operand location: one of the seven registers or the byte at
/// `(HL)`. Bit-field layout matches the hardware's 3-bit register encoding
/// (`B,C,D,E,H,L,(HL),A` in that order), which is why decoding register
/// opcodes boils down to extracting 3-bit fields instead of a 256-way match.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    HlInd,
    A,
}

impl Reg8 {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Reg8::B,
            1 => Reg8::C,
            2 => Reg8::D,
            3 => Reg8::E,
            4 => Reg8::H,
            5 => Reg8::L,
            6 => Reg8::HlInd,
            _ => Reg8::A,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Src8 {
    Reg(Reg8),
    Imm(u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reg16 {
    Bc,
    De,
    Hl,
    Sp,
}

impl Reg16 {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Reg16::Bc,
            1 => Reg16::De,
            2 => Reg16::Hl,
            _ => Reg16::Sp,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stack16 {
    Bc,
    De,
    Hl,
    Af,
}

impl Stack16 {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Stack16::Bc,
            1 => Stack16::De,
            2 => Stack16::Hl,
            _ => Stack16::Af,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cond {
    Nz,
    Z,
    Nc,
    C,
}

impl Cond {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Cond::Nz,
            1 => Cond::Z,
            2 => Cond::Nc,
            _ => Cond::C,
        }
    }
}

/// An ALU operation against `A`, selected by the 3-bit field at bits 3-5 of
/// opcodes 0x80-0xBF (and, with an immediate operand, 0xC6-0xFE).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// A CB-prefixed rotate/shift operation, selected by bits 3-5 of 0xCB 0x00-0x3F.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Inst {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,

    LdReg { dst: Reg8, src: Src8 },
    LdReg16Imm { dst: Reg16, imm: u16 },
    LdSpHl,
    LdHlSpImm { offset: i8 },
    LdIndImm16Sp { addr: u16 },

    LdIndBcA,
    LdIndDeA,
    LdAIndBc,
    LdAIndDe,
    LdIndHlIncA,
    LdIndHlDecA,
    LdAIndHlInc,
    LdAIndHlDec,

    LdIndImm16A { addr: u16 },
    LdAIndImm16 { addr: u16 },
    LdhIndImm8A { offset: u8 },
    LdhAIndImm8 { offset: u8 },
    LdhIndCA,
    LdhAIndC,

    Push(Stack16),
    Pop(Stack16),

    Alu { op: AluOp, src: Src8 },
    Inc(Reg8),
    Dec(Reg8),
    AddHl(Reg16),
    IncReg16(Reg16),
    DecReg16(Reg16),
    AddSpImm { offset: i8 },

    Rlca,
    Rla,
    Rrca,
    Rra,
    Daa,
    Cpl,
    Ccf,
    Scf,

    Shift { op: ShiftOp, reg: Reg8 },
    Bit { bit: u8, reg: Reg8 },
    Res { bit: u8, reg: Reg8 },
    Set { bit: u8, reg: Reg8 },

    JpImm { addr: u16 },
    JpCond { cond: Cond, addr: u16 },
    JpHl,
    JrImm { offset: i8 },
    JrCond { cond: Cond, offset: i8 },
    CallImm { addr: u16 },
    CallCond { cond: Cond, addr: u16 },
    Ret,
    Reti,
    RetCond(Cond),
    Rst(u16),

    Unimplemented { opcode: u8, cb_prefixed: bool },
}

/// Fetches and decodes the next instruction, advancing `cpu.pc` past the
/// opcode and any immediate operand bytes it consumes.
pub fn decode(cpu: &mut Cpu) -> Inst {
    let opcode = cpu.fetch_u8();

    if opcode == CB_PREFIX {
        return decode_cb(cpu);
    }

    match opcode {
        0x00 => Inst::Nop,
        0x10 => {
            cpu.fetch_u8();
            Inst::Stop
        }
        0x76 => Inst::Halt,
        0xf3 => Inst::Di,
        0xfb => Inst::Ei,

        // 0x01/0x11/0x21/0x31 - LD rr,nn
        0x01 | 0x11 | 0x21 | 0x31 => Inst::LdReg16Imm {
            dst: Reg16::from_bits(opcode >> 4),
            imm: cpu.fetch_u16(),
        },

        0x02 => Inst::LdIndBcA,
        0x12 => Inst::LdIndDeA,
        0x22 => Inst::LdIndHlIncA,
        0x32 => Inst::LdIndHlDecA,

        0x0a => Inst::LdAIndBc,
        0x1a => Inst::LdAIndDe,
        0x2a => Inst::LdAIndHlInc,
        0x3a => Inst::LdAIndHlDec,

        0x03 | 0x13 | 0x23 | 0x33 => Inst::IncReg16(Reg16::from_bits(opcode >> 4)),
        0x0b | 0x1b | 0x2b | 0x3b => Inst::DecReg16(Reg16::from_bits(opcode >> 4)),
        0x09 | 0x19 | 0x29 | 0x39 => Inst::AddHl(Reg16::from_bits(opcode >> 4)),

        // 0b00rrr100 - INC r, 0b00rrr101 - DEC r, 0b00rrr110 - LD r,n
        _ if opcode & 0xc7 == 0x04 => Inst::Inc(Reg8::from_bits(opcode >> 3)),
        _ if opcode & 0xc7 == 0x05 => Inst::Dec(Reg8::from_bits(opcode >> 3)),
        _ if opcode & 0xc7 == 0x06 => Inst::LdReg {
            dst: Reg8::from_bits(opcode >> 3),
            src: Src8::Imm(cpu.fetch_u8()),
        },

        0x07 => Inst::Rlca,
        0x17 => Inst::Rla,
        0x0f => Inst::Rrca,
        0x1f => Inst::Rra,
        0x27 => Inst::Daa,
        0x2f => Inst::Cpl,
        0x37 => Inst::Scf,
        0x3f => Inst::Ccf,

        0x18 => Inst::JrImm {
            offset: cpu.fetch_u8() as i8,
        },
        0x20 | 0x28 | 0x30 | 0x38 => Inst::JrCond {
            cond: Cond::from_bits(opcode >> 3),
            offset: cpu.fetch_u8() as i8,
        },

        0x08 => Inst::LdIndImm16Sp {
            addr: cpu.fetch_u16(),
        },

        // 0b01dddsss - LD d,s (0x76 handled above as HALT)
        0x40..=0x7f => Inst::LdReg {
            dst: Reg8::from_bits(opcode >> 3),
            src: Src8::Reg(Reg8::from_bits(opcode)),
        },

        // 0b10ooosss - ALU A,s
        0x80..=0xbf => Inst::Alu {
            op: AluOp::from_bits(opcode >> 3),
            src: Src8::Reg(Reg8::from_bits(opcode)),
        },

        0xc6 | 0xd6 | 0xe6 | 0xf6 | 0xce | 0xde | 0xee | 0xfe => Inst::Alu {
            op: AluOp::from_bits(opcode >> 3),
            src: Src8::Imm(cpu.fetch_u8()),
        },

        0xc0 | 0xc8 | 0xd0 | 0xd8 => Inst::RetCond(Cond::from_bits(opcode >> 3)),
        0xc9 => Inst::Ret,
        0xd9 => Inst::Reti,

        0xc2 | 0xca | 0xd2 | 0xda => Inst::JpCond {
            cond: Cond::from_bits(opcode >> 3),
            addr: cpu.fetch_u16(),
        },
        0xc3 => Inst::JpImm {
            addr: cpu.fetch_u16(),
        },
        0xe9 => Inst::JpHl,

        0xc4 | 0xcc | 0xd4 | 0xdc => Inst::CallCond {
            cond: Cond::from_bits(opcode >> 3),
            addr: cpu.fetch_u16(),
        },
        0xcd => Inst::CallImm {
            addr: cpu.fetch_u16(),
        },

        0xc1 | 0xd1 | 0xe1 | 0xf1 => Inst::Pop(Stack16::from_bits(opcode >> 4)),
        0xc5 | 0xd5 | 0xe5 | 0xf5 => Inst::Push(Stack16::from_bits(opcode >> 4)),

        0xc7 | 0xcf | 0xd7 | 0xdf | 0xe7 | 0xef | 0xf7 | 0xff => Inst::Rst((opcode & 0x38) as u16),

        0xe0 => Inst::LdhIndImm8A {
            offset: cpu.fetch_u8(),
        },
        0xf0 => Inst::LdhAIndImm8 {
            offset: cpu.fetch_u8(),
        },
        0xe2 => Inst::LdhIndCA,
        0xf2 => Inst::LdhAIndC,

        0xea => Inst::LdIndImm16A {
            addr: cpu.fetch_u16(),
        },
        0xfa => Inst::LdAIndImm16 {
            addr: cpu.fetch_u16(),
        },

        0xe8 => Inst::AddSpImm {
            offset: cpu.fetch_u8() as i8,
        },
        0xf8 => Inst::LdHlSpImm {
            offset: cpu.fetch_u8() as i8,
        },
        0xf9 => Inst::LdSpHl,

        _ => Inst::Unimplemented {
            opcode,
            cb_prefixed: false,
        },
    }
}

fn decode_cb(cpu: &mut Cpu) -> Inst {
    let opcode = cpu.fetch_u8();
    let reg = Reg8::from_bits(opcode);

    match opcode >> 6 {
        0b00 => Inst::Shift {
            op: ShiftOp::from_bits(opcode >> 3),
            reg,
        },
        0b01 => Inst::Bit {
            bit: (opcode >> 3) & 0x07,
            reg,
        },
        0b10 => Inst::Res {
            bit: (opcode >> 3) & 0x07,
            reg,
        },
        _ => Inst::Set {
            bit: (opcode >> 3) & 0x07,
            reg,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;

    fn cpu_with(bytes: &[u8]) -> Cpu {
        let mut bus = Bus::new();
        for (i, &b) in bytes.iter().enumerate() {
            bus.write(0x0100 + i as u16, b);
        }
        let mut cpu = Cpu::new(bus);
        cpu.boot();
        cpu
    }

    #[test]
    fn decodes_nop() {
        let mut cpu = cpu_with(&[0x00]);
        assert!(matches!(decode(&mut cpu), Inst::Nop));
    }

    #[test]
    fn decodes_ld_b_imm8() {
        let mut cpu = cpu_with(&[0x06, 0x42]);
        match decode(&mut cpu) {
            Inst::LdReg {
                dst: Reg8::B,
                src: Src8::Imm(0x42),
            } => {}
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn decodes_ld_b_c_as_register_move() {
        let mut cpu = cpu_with(&[0x41]);
        match decode(&mut cpu) {
            Inst::LdReg {
                dst: Reg8::B,
                src: Src8::Reg(Reg8::C),
            } => {}
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn decodes_add_a_imm8() {
        let mut cpu = cpu_with(&[0xc6, 0x01]);
        match decode(&mut cpu) {
            Inst::Alu {
                op: AluOp::Add,
                src: Src8::Imm(0x01),
            } => {}
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn decodes_cb_bit_7_h() {
        let mut cpu = cpu_with(&[0xcb, 0x7c]);
        match decode(&mut cpu) {
            Inst::Bit {
                bit: 7,
                reg: Reg8::H,
            } => {}
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn unknown_opcode_is_marked_unimplemented() {
        let mut cpu = cpu_with(&[0xd3]);
        match decode(&mut cpu) {
            Inst::Unimplemented {
                opcode: 0xd3,
                cb_prefixed: false,
            } => {}
            other => panic!("unexpected decode: {other:?}"),
        }
    }
}
