use crate::constants::{PC_REG, REG_COUNT};
use crate::error::VmFault;

/// The 16 general-purpose 8-bit registers. Register 15 is the protected
/// program counter; only the interpreter's own fetch/jump paths may write it.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegisterFile {
    cells: [u8; REG_COUNT],
}

impl RegisterFile {
    pub fn new() -> RegisterFile {
        RegisterFile { cells: [0; REG_COUNT] }
    }

    pub fn get(&self, index: u8) -> u8 {
        self.cells[index as usize]
    }

    pub fn pc(&self) -> u8 {
        self.cells[PC_REG]
    }

    /// Writes a general-purpose register. Rejects writes to the protected PC.
    pub fn set(&mut self, index: u8, value: u8) -> Result<(), VmFault> {
        if index as usize == PC_REG {
            return Err(VmFault::ProtectedReg);
        }
        self.cells[index as usize] = value;
        Ok(())
    }

    /// Sets the PC directly. Only the interpreter's fetch/jump logic may call this.
    pub(crate) fn set_pc(&mut self, value: u8) {
        self.cells[PC_REG] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writing_pc_directly_is_rejected() {
        let mut regs = RegisterFile::new();
        assert_eq!(regs.set(PC_REG as u8, 42), Err(VmFault::ProtectedReg));
    }

    #[test]
    fn general_purpose_write_and_read() {
        let mut regs = RegisterFile::new();
        regs.set(3, 200).unwrap();
        assert_eq!(regs.get(3), 200);
    }
}
