pub mod maze;
pub mod scorer;
pub mod syscalls;

pub use maze::{Cell, Direction, Maze, MazeLayout};
pub use scorer::grade_maze_performance;
pub use syscalls::register_maze_syscalls;
