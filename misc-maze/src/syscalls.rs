//! Movement syscalls (grounded on `original_source/maze_syscalls.py`). Each
//! handler closes over a shared `Rc<RefCell<Maze>>` rather than a bare
//! `&mut Maze`: six independent syscall ids all need to reach the same maze,
//! and `SyscallRegistry` owns each handler as a separate boxed trait object.

use std::cell::RefCell;
use std::rc::Rc;

use miscvm::syscalls::{Syscall, SyscallContext, SyscallEffect, SyscallRegistry};

use crate::maze::{Direction, Maze};

pub const SYSCALL_MOVE_UP: u8 = 0x10;
pub const SYSCALL_MOVE_DOWN: u8 = 0x11;
pub const SYSCALL_MOVE_LEFT: u8 = 0x12;
pub const SYSCALL_MOVE_RIGHT: u8 = 0x13;
pub const SYSCALL_GET_FINISH_POS: u8 = 0x14;
pub const SYSCALL_GET_PLAYER_POS: u8 = 0x15;

struct MoveSyscall {
    maze: Rc<RefCell<Maze>>,
    direction: Direction,
}

impl Syscall for MoveSyscall {
    fn call(&mut self, _ctx: &mut SyscallContext) -> SyscallEffect {
        self.maze.borrow_mut().move_player(self.direction);
        SyscallEffect::Continue
    }
}

struct GetFinishPosSyscall {
    maze: Rc<RefCell<Maze>>,
}

impl Syscall for GetFinishPosSyscall {
    fn call(&mut self, ctx: &mut SyscallContext) -> SyscallEffect {
        let (y, x) = self.maze.borrow().finish();
        let _ = ctx.regs.set(0, y as u8);
        let _ = ctx.regs.set(1, x as u8);
        SyscallEffect::Continue
    }
}

struct GetPlayerPosSyscall {
    maze: Rc<RefCell<Maze>>,
}

impl Syscall for GetPlayerPosSyscall {
    fn call(&mut self, ctx: &mut SyscallContext) -> SyscallEffect {
        let (y, x) = self.maze.borrow().player();
        let _ = ctx.regs.set(0, y as u8);
        let _ = ctx.regs.set(1, x as u8);
        SyscallEffect::Continue
    }
}

/// Registers the movement syscalls (0x10-0x15) against `maze` on top of
/// whatever baseline registry the caller already built.
pub fn register_maze_syscalls(registry: &mut SyscallRegistry, maze: Rc<RefCell<Maze>>) {
    registry.register(
        SYSCALL_MOVE_UP,
        Box::new(MoveSyscall { maze: maze.clone(), direction: Direction::Up }),
    );
    registry.register(
        SYSCALL_MOVE_DOWN,
        Box::new(MoveSyscall { maze: maze.clone(), direction: Direction::Down }),
    );
    registry.register(
        SYSCALL_MOVE_LEFT,
        Box::new(MoveSyscall { maze: maze.clone(), direction: Direction::Left }),
    );
    registry.register(
        SYSCALL_MOVE_RIGHT,
        Box::new(MoveSyscall { maze: maze.clone(), direction: Direction::Right }),
    );
    registry.register(SYSCALL_GET_FINISH_POS, Box::new(GetFinishPosSyscall { maze: maze.clone() }));
    registry.register(SYSCALL_GET_PLAYER_POS, Box::new(GetPlayerPosSyscall { maze }));
}
