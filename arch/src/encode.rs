use crate::reg::{Reg, CG, SR};

// ----------------------------------------------------------------------------
// Opcode word layouts. Field order re-derived from the MSP430 ISA encoding
// tables; opcode always occupies the most significant bits.
//
//   single: opcode[15:7] bw[6] as[5:4] reg[3:0]
//   double: opcode[15:12] src[11:8] ad[7] bw[6] as[5:4] dst[3:0]
//   jump:   opcode[15:10] offset[9:0]  (offset = distance / 2, two's compl.)

pub fn pack_single(opcode: u16, bw: u16, as_bits: u16, reg: u16) -> u16 {
    (opcode << 7) | (bw << 6) | (as_bits << 4) | reg
}

pub fn pack_double(opcode: u16, src: u16, ad: u16, bw: u16, as_bits: u16, dst: u16) -> u16 {
    (opcode << 12) | (src << 8) | (ad << 7) | (bw << 6) | (as_bits << 4) | dst
}

pub fn pack_jump(opcode: u16, half_offset: i16) -> u16 {
    (opcode << 10) | ((half_offset as u16) & 0x3FF)
}

pub fn unpack_single(word: u16) -> (u16, u16, u16, u16) {
    (word >> 7, (word >> 6) & 1, (word >> 4) & 3, word & 0xF)
}

pub fn unpack_double(word: u16) -> (u16, u16, u16, u16, u16, u16) {
    (
        word >> 12,
        (word >> 8) & 0xF,
        (word >> 7) & 1,
        (word >> 6) & 1,
        (word >> 4) & 3,
        word & 0xF,
    )
}

pub fn unpack_jump(word: u16) -> (u16, i16) {
    // sign-extend the 10-bit offset field
    let off = ((word & 0x3FF) as i16) << 6 >> 6;
    (word >> 10, off)
}

// ----------------------------------------------------------------------------
// Constant generator

/// Register/As selection for the six immediates the constant generators
/// cover. These immediates are encoded without an extension word.
pub fn congen(value: i32) -> Option<(Reg, u16)> {
    match value {
        -1 => Some((CG, 3)),
        0 => Some((CG, 0)),
        1 => Some((CG, 1)),
        2 => Some((CG, 2)),
        4 => Some((SR, 2)),
        8 => Some((SR, 3)),
        _ => None,
    }
}
