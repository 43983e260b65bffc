//! Fetch-decode-execute loop (C2) plus the host-facing `Interpreter` that wires
//! the syscall registry, output sink, and step budget around the inner `Core`.

mod core;

use tracing::{debug, trace};

use crate::error::VmFault;
use crate::isa::Instruction;
use crate::register::RegisterFile;
use crate::syscalls::{SyscallContext, SyscallEffect, SyscallRegistry};
use core::{Core, TickResult};

/// Outcome of a single `Interpreter::step` call, surfaced to the host loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    Continue,
    Syscall(u8),
    Stop(u8),
    Fault(VmFault),
}

/// A point-in-time copy of the registers and memory, independent of the live run.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    pub registers: [u8; crate::constants::REG_COUNT],
    pub memory: [u8; crate::constants::MEMORY_SIZE],
}

/// The record produced by a completed run.
#[derive(Clone, Debug)]
pub struct RunResult {
    pub halted: bool,
    pub error: Option<VmFault>,
    pub exit_code: Option<u8>,
    pub steps: u32,
    pub final_state: StateSnapshot,
}

/// Wraps the inner `Core` with a syscall registry and output sink, presenting
/// the run/step-debug API described for the host loop.
pub struct Interpreter<'p, 'o> {
    core: Core<'p>,
    registry: SyscallRegistry,
    output: &'o mut dyn crate::syscalls::OutputSink,
}

impl<'p, 'o> Interpreter<'p, 'o> {
    pub fn new(
        program: &'p [u8],
        registry: SyscallRegistry,
        output: &'o mut dyn crate::syscalls::OutputSink,
        step_budget: Option<u32>,
    ) -> Interpreter<'p, 'o> {
        Interpreter { core: Core::new(program, step_budget), registry, output }
    }

    pub fn registers(&self) -> &RegisterFile {
        self.core.registers()
    }

    pub fn memory(&self) -> &crate::memory::Memory {
        self.core.memory()
    }

    fn snapshot(&self) -> StateSnapshot {
        let mut registers = [0u8; crate::constants::REG_COUNT];
        for (i, cell) in registers.iter_mut().enumerate() {
            *cell = self.core.registers().get(i as u8);
        }
        let mut memory = [0u8; crate::constants::MEMORY_SIZE];
        for (addr, cell) in memory.iter_mut().enumerate() {
            *cell = self.core.memory().read(addr as i32).expect("in-range by construction");
        }
        StateSnapshot { registers, memory }
    }

    /// Advances the run by one fetch-decode-execute cycle, dispatching any
    /// syscall interrupt raised along the way.
    pub fn step(&mut self) -> StepOutcome {
        match self.core.tick() {
            TickResult::Continue => StepOutcome::Continue,
            TickResult::Fault(fault) => {
                debug!(pc = self.core.registers().pc(), ?fault, "interpreter halted");
                StepOutcome::Fault(fault)
            }
            TickResult::Syscall(id) => {
                trace!(pc = self.core.registers().pc(), id, "syscall dispatched");
                let (regs, memory) = self.core.regs_and_memory_mut();
                let mut ctx = SyscallContext { regs, memory, output: self.output };
                match self.registry.dispatch(id, &mut ctx) {
                    Ok(SyscallEffect::Continue) => StepOutcome::Continue,
                    Ok(SyscallEffect::Stop(code)) => StepOutcome::Stop(code),
                    Err(fault) => {
                        debug!(pc = self.core.registers().pc(), ?fault, "syscall fault");
                        StepOutcome::Fault(fault)
                    }
                }
            }
        }
    }

    /// Runs to completion, producing the run's final record.
    pub fn run(mut self) -> RunResult {
        loop {
            match self.step() {
                StepOutcome::Continue => continue,
                StepOutcome::Stop(code) => {
                    return RunResult {
                        halted: false,
                        error: None,
                        exit_code: Some(code),
                        steps: self.core.steps(),
                        final_state: self.snapshot(),
                    };
                }
                StepOutcome::Fault(fault) => {
                    return RunResult {
                        halted: true,
                        error: Some(fault),
                        exit_code: None,
                        steps: self.core.steps(),
                        final_state: self.snapshot(),
                    };
                }
                StepOutcome::Syscall(_) => unreachable!("step() resolves syscalls internally"),
            }
        }
    }

    /// Yields `(state_snapshot, disassembled_current_instruction)` before each
    /// instruction (and is `None` for the instruction text while parked on the
    /// preload sentinel or a data pair), then performs exactly one `step`.
    pub fn step_debug(&mut self) -> (StateSnapshot, Option<Instruction>, StepOutcome) {
        let snapshot = self.snapshot();
        let instr = self.core.peek();
        let outcome = self.step();
        (snapshot, instr, outcome)
    }
}
