use thiserror::Error;

/// A fatal interrupt: the VM halts and the run's result records this as `error`.
/// A graceful `STOP` from the EXIT syscall is *not* a `VmFault` — see [`crate::StepOutcome`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum VmFault {
    #[error("step budget exhausted")]
    MaxSteps,
    #[error("program counter ran past the end of the program")]
    IllegalPc,
    #[error("write targeted the protected program counter register")]
    ProtectedReg,
    #[error("opcode nibble does not name a known instruction")]
    UnknownOpcode,
    #[error("memory access outside the addressable range")]
    MemoryAccess,
    #[error("syscall id has no registered handler")]
    UnknownSyscall,
}
