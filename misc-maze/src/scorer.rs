//! Fitness scoring for a completed maze run (grounded on
//! `original_source/maze_scorer.py`'s `grade_maze_performance`). The reward
//! constants are pinned exactly as in the original: they are tuning knobs for
//! the genetic search, not architectural choices.

use miscvm::RunResult;

use crate::maze::Maze;

pub const REWARD_FINISH: i64 = 10_000;
pub const REWARD_UNIQUE_CELL: i64 = 50;
pub const REWARD_VALID_MOVE: i64 = 5;
pub const PENALTY_STEP: i64 = 1;
const PENALTY_HALT: i64 = 100;

pub fn grade_maze_performance(result: &RunResult, maze: &Maze) -> i64 {
    let mut score = 0i64;

    if maze.is_finished() {
        score += REWARD_FINISH;
    }

    score += maze.visited_count() as i64 * REWARD_UNIQUE_CELL;
    score += maze.valid_moves() as i64 * REWARD_VALID_MOVE;
    score -= maze.total_steps() as i64 * PENALTY_STEP;

    if result.halted {
        score -= PENALTY_HALT;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Cell, Direction, MazeLayout};
    use miscvm::StateSnapshot;

    fn corridor_maze() -> Maze {
        let grid = vec![
            vec![Cell::Wall, Cell::Wall, Cell::Wall, Cell::Wall],
            vec![Cell::Wall, Cell::Floor, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Wall, Cell::Wall, Cell::Wall],
        ];
        Maze::from_layout(MazeLayout { width: 4, height: 3, grid, start: (1, 1), finish: (1, 2) })
    }

    fn ok_result() -> RunResult {
        RunResult {
            halted: false,
            error: None,
            exit_code: Some(0),
            steps: 1,
            final_state: StateSnapshot { registers: [0; 16], memory: [0; 64] },
        }
    }

    #[test]
    fn reaching_the_finish_earns_the_finish_reward() {
        let mut maze = corridor_maze();
        maze.move_player(Direction::Right);
        let score = grade_maze_performance(&ok_result(), &maze);
        assert!(maze.is_finished());
        assert_eq!(
            score,
            REWARD_FINISH + 2 * REWARD_UNIQUE_CELL + REWARD_VALID_MOVE - PENALTY_STEP
        );
    }

    #[test]
    fn halting_applies_the_fixed_penalty() {
        let maze = corridor_maze();
        let mut result = ok_result();
        result.halted = true;
        result.error = Some(miscvm::VmFault::MaxSteps);
        let score = grade_maze_performance(&result, &maze);
        assert_eq!(score, REWARD_UNIQUE_CELL - PENALTY_HALT);
    }
}
