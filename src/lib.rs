pub mod constants;
pub mod error;
pub mod isa;
pub mod memory;
pub mod processor;
pub mod register;
pub mod syscalls;

pub use error::VmFault;
pub use isa::{Instruction, OpCode};
pub use memory::Memory;
pub use processor::{Interpreter, RunResult, StateSnapshot, StepOutcome};
pub use register::RegisterFile;
pub use syscalls::{Syscall, SyscallContext, SyscallEffect, SyscallRegistry};

#[cfg(test)]
mod tests {
    use crate::isa::{encode, Instruction};
    use crate::syscalls::{standard_registry, BufferedOutput};
    use crate::{Interpreter, StepOutcome};

    fn bytes_of(instrs: &[Instruction]) -> Vec<u8> {
        instrs.iter().flat_map(|i| encode(*i).to_le_bytes()).collect()
    }

    #[test]
    fn hello_world_program_writes_expected_output() {
        let mut program = Vec::new();
        for byte in b"hi" {
            program.extend(bytes_of(&[
                Instruction::MovRegImm { d: 0, imm: *byte },
                Instruction::Syscall { id: 0x01 },
            ]));
        }
        program.extend(bytes_of(&[
            Instruction::MovRegImm { d: 0, imm: 0 },
            Instruction::Syscall { id: 0x00 },
        ]));

        let mut output = BufferedOutput::new(false);
        let result = Interpreter::new(&program, standard_registry(), &mut output, Some(100)).run();

        assert!(!result.halted);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(output.contents(), "hi");
    }

    #[test]
    fn protected_register_write_faults() {
        let program = bytes_of(&[Instruction::MovRegImm { d: 15, imm: 0 }]);
        let mut output = BufferedOutput::new(false);
        let result = Interpreter::new(&program, standard_registry(), &mut output, Some(10)).run();

        assert!(result.halted);
        assert_eq!(result.steps, 1);
    }

    #[test]
    fn step_debug_surfaces_the_decoded_instruction_before_executing() {
        let program = bytes_of(&[Instruction::MovRegImm { d: 0, imm: 7 }, Instruction::Syscall { id: 0 }]);
        let mut output = BufferedOutput::new(false);
        let mut interp = Interpreter::new(&program, standard_registry(), &mut output, Some(10));

        let (snapshot, instr, outcome) = interp.step_debug();
        assert_eq!(snapshot.registers[0], 0);
        assert!(matches!(instr, Some(Instruction::MovRegImm { d: 0, imm: 7 })));
        assert!(matches!(outcome, StepOutcome::Continue));
    }

    #[test]
    fn jumping_past_the_program_end_faults_with_illegal_pc() {
        let program = bytes_of(&[
            Instruction::MovRegImm { d: 0, imm: 0 },
            Instruction::MovRegImm { d: 6, imm: 200 },
            Instruction::Jz { d: 0, s: 6, imm: 0 },
        ]);
        let mut output = BufferedOutput::new(false);
        let result = Interpreter::new(&program, standard_registry(), &mut output, Some(10)).run();

        assert!(result.halted);
        assert_eq!(result.error, Some(crate::error::VmFault::IllegalPc));
    }

    #[test]
    fn an_overflowing_jump_target_saturates_instead_of_wrapping() {
        // r0 + imm = 200 + 100 = 300: wrapping would land at byte 44 (inside
        // the program, no fault); clamping saturates to 255, which is well
        // past this program's end and faults with ILLEGAL_PC.
        let program = bytes_of(&[
            Instruction::MovRegImm { d: 0, imm: 200 },
            Instruction::Jmp { d: 0, imm: 100 },
        ]);
        let mut output = BufferedOutput::new(false);
        let result = Interpreter::new(&program, standard_registry(), &mut output, Some(10)).run();

        assert!(result.halted);
        assert_eq!(result.error, Some(crate::error::VmFault::IllegalPc));
    }

    #[test]
    fn a_taken_branch_skips_the_instruction_it_jumps_over() {
        let mut program = bytes_of(&[
            Instruction::MovRegImm { d: 0, imm: 0 },
            Instruction::MovRegImm { d: 6, imm: 8 },
            Instruction::Jz { d: 0, s: 6, imm: 0 },
            Instruction::MovRegImm { d: 1, imm: 99 },
        ]);
        assert_eq!(program.len(), 8);
        program.extend(bytes_of(&[
            Instruction::MovRegImm { d: 1, imm: 7 },
            Instruction::Syscall { id: 0x00 },
        ]));

        let mut output = BufferedOutput::new(false);
        let result = Interpreter::new(&program, standard_registry(), &mut output, Some(10)).run();

        assert!(!result.halted);
        assert_eq!(result.final_state.registers[1], 7);
    }

    #[test]
    fn data_preload_writes_memory_before_execution_resumes() {
        let mut program = crate::constants::PRELOAD_SENTINEL.to_vec();
        program.extend_from_slice(&[0x05, 0xAB]);
        program.extend_from_slice(&crate::constants::PRELOAD_TERMINATOR);
        program.extend(bytes_of(&[
            Instruction::LdRegMem { d: 0, s: 0, imm: 5 },
            Instruction::Syscall { id: 0x00 },
        ]));

        let mut output = BufferedOutput::new(false);
        let result = Interpreter::new(&program, standard_registry(), &mut output, Some(10)).run();

        assert!(!result.halted);
        assert_eq!(result.final_state.registers[0], 0xAB);
    }
}
