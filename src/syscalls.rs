//! Syscall registry (C3): an id -> handler mapping assembled from a known set.
//! Handlers observe and mutate the live register/memory state through an
//! explicit, short-lived borrow — no shared mutable runtime record, no hidden
//! aliasing, per the spec's state-sharing design note.

use std::collections::HashMap;

use crate::error::VmFault;
use crate::memory::Memory;
use crate::register::RegisterFile;

/// Destination for bytes written by the `PUTC` syscall.
pub trait OutputSink {
    fn write_char(&mut self, byte: u8);
}

/// Buffers written characters and can optionally mirror them to stdout,
/// mirroring `original_source/syscalls.py`'s `OutputStream`.
#[derive(Default)]
pub struct BufferedOutput {
    buffer: String,
    echo: bool,
}

impl BufferedOutput {
    pub fn new(echo: bool) -> BufferedOutput {
        BufferedOutput { buffer: String::new(), echo }
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl OutputSink for BufferedOutput {
    fn write_char(&mut self, byte: u8) {
        let ch = byte as char;
        self.buffer.push(ch);
        if self.echo {
            print!("{ch}");
        }
    }
}

/// The effect a syscall handler had on control flow.
#[derive(Debug)]
pub enum SyscallEffect {
    /// Execution resumes with the next fetch.
    Continue,
    /// The EXIT syscall (or an equivalent) requests a graceful shutdown.
    Stop(u8),
}

/// The live state a syscall handler is allowed to touch, borrowed for exactly
/// the duration of the call.
pub struct SyscallContext<'a> {
    pub regs: &'a mut RegisterFile,
    pub memory: &'a mut Memory,
    pub output: &'a mut dyn OutputSink,
}

pub trait Syscall {
    fn call(&mut self, ctx: &mut SyscallContext) -> SyscallEffect;
}

/// `SYSCALL_ID = 0x00`: raises `Stop(r[0])`.
pub struct ExitSyscall;

impl Syscall for ExitSyscall {
    fn call(&mut self, ctx: &mut SyscallContext) -> SyscallEffect {
        SyscallEffect::Stop(ctx.regs.get(0))
    }
}

/// `SYSCALL_ID = 0x01`: writes `chr(r[0])` to the configured output stream.
pub struct PutcSyscall;

impl Syscall for PutcSyscall {
    fn call(&mut self, ctx: &mut SyscallContext) -> SyscallEffect {
        ctx.output.write_char(ctx.regs.get(0));
        SyscallEffect::Continue
    }
}

/// Id -> handler table, built up by registering syscall instances.
///
/// This plays the role of `original_source/syscalls.py`'s `build_systable`,
/// re-expressed as an explicit builder: Rust has no analog for Python's
/// implicit `__init_subclass__` global registry, and the spec asks for an
/// explicit borrow with no hidden aliasing anyway.
#[derive(Default)]
pub struct SyscallRegistry {
    handlers: HashMap<u8, Box<dyn Syscall>>,
}

impl SyscallRegistry {
    pub fn new() -> SyscallRegistry {
        SyscallRegistry::default()
    }

    /// Registers a handler under `id`. Panics on a duplicate id: two handlers
    /// claiming the same syscall number is a wiring bug, not a runtime fault.
    pub fn register(&mut self, id: u8, handler: Box<dyn Syscall>) -> &mut Self {
        if self.handlers.insert(id, handler).is_some() {
            panic!("duplicate syscall id {:#04x}", id);
        }
        self
    }

    pub fn dispatch(&mut self, id: u8, ctx: &mut SyscallContext) -> Result<SyscallEffect, VmFault> {
        match self.handlers.get_mut(&id) {
            Some(handler) => Ok(handler.call(ctx)),
            None => Err(VmFault::UnknownSyscall),
        }
    }
}

/// The registry with just the architecture's baseline handlers (EXIT, PUTC).
/// Task-specific syscalls (e.g. maze movement) are registered on top of this.
pub fn standard_registry() -> SyscallRegistry {
    let mut registry = SyscallRegistry::new();
    registry.register(0x00, Box::new(ExitSyscall));
    registry.register(0x01, Box::new(PutcSyscall));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_syscall_faults() {
        let mut registry = standard_registry();
        let mut regs = RegisterFile::new();
        let mut memory = Memory::new();
        let mut output = BufferedOutput::new(false);
        let mut ctx = SyscallContext { regs: &mut regs, memory: &mut memory, output: &mut output };
        assert_eq!(registry.dispatch(0x42, &mut ctx).unwrap_err(), VmFault::UnknownSyscall);
    }

    #[test]
    fn exit_stops_with_register_zero() {
        let mut registry = standard_registry();
        let mut regs = RegisterFile::new();
        regs.set(0, 42).unwrap();
        let mut memory = Memory::new();
        let mut output = BufferedOutput::new(false);
        let mut ctx = SyscallContext { regs: &mut regs, memory: &mut memory, output: &mut output };
        match registry.dispatch(0x00, &mut ctx).unwrap() {
            SyscallEffect::Stop(code) => assert_eq!(code, 42),
            SyscallEffect::Continue => panic!("expected Stop"),
        }
    }
}
