//! Inverse of [`crate::assembler::assemble`]: bytes to the same textual form
//! the assembler accepts, so `assemble(&disassemble(bytes)?) == bytes` for any
//! program the assembler could have produced.

use miscvm::constants::{PRELOAD_SENTINEL, PRELOAD_TERMINATOR};
use miscvm::isa;

use crate::error::DisasmError;

pub fn disassemble(bytes: &[u8]) -> Result<String, DisasmError> {
    let mut lines = Vec::new();
    let mut pc = 0usize;

    if bytes.len() >= 2 && bytes[0..2] == PRELOAD_SENTINEL {
        lines.push(".data".to_owned());
        pc += 2;
        loop {
            if pc + 2 > bytes.len() {
                return Err(DisasmError::TrailingBytes { remaining: bytes.len() - pc });
            }
            let pair = [bytes[pc], bytes[pc + 1]];
            pc += 2;
            if pair == PRELOAD_TERMINATOR {
                break;
            }
            lines.push(format!("byte {} {}", pair[0], pair[1]));
        }
    }

    lines.push(".text".to_owned());

    while pc < bytes.len() {
        if pc + 2 > bytes.len() {
            return Err(DisasmError::TrailingBytes { remaining: bytes.len() - pc });
        }
        let word = u16::from_le_bytes([bytes[pc], bytes[pc + 1]]);
        let instr = isa::decode(word).expect("every opcode nibble is defined");
        lines.push(format!("{instr}"));
        pc += 2;
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;

    #[test]
    fn round_trips_assembler_output() {
        let source = ".text\nMOV_REG_IMM r0, 104\nSYSCALL 1\nMOV_REG_IMM r0, 0\nSYSCALL 0\n";
        let bytes = assemble(source).unwrap();
        let text = disassemble(&bytes).unwrap();
        let reassembled = assemble(&text).unwrap();
        assert_eq!(bytes, reassembled);
    }

    #[test]
    fn round_trips_data_preload_block() {
        let source = ".data\nbyte 5 171\n.text\nSYSCALL 0\n";
        let bytes = assemble(source).unwrap();
        let text = disassemble(&bytes).unwrap();
        let reassembled = assemble(&text).unwrap();
        assert_eq!(bytes, reassembled);
    }
}
