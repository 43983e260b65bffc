pub const OPCODE_WIDTH: u32 = 4;
pub const PAYLOAD_WIDTH: u32 = 12;

pub const REG_COUNT: usize = 16;
pub const PC_REG: usize = 15;

pub const MEMORY_SIZE: usize = 64;

pub const INSTRUCTION_BYTES: usize = 2;

/// Raw two-byte pattern that switches the fetch loop into data-preload mode.
///
/// Pinned per the spec's design note: opcode nibble 0 (NOP) with payload 0xFF0,
/// checked as a literal byte pattern at fetch time rather than decoded through
/// the normal opcode table (the source material disagreed on whether this is a
/// word or a raw byte pair; we settled on the latter, which is what both
/// `asm.py` and `disasm.py` actually compare against).
pub const PRELOAD_SENTINEL: [u8; 2] = [0xF0, 0xFF];
pub const PRELOAD_TERMINATOR: [u8; 2] = [0x00, 0x00];
