//! The generational loop (grounded on `original_source/genetics.py`'s
//! `GeneticAlgo.run`) plus the maze-task evaluator that turns a population of
//! candidate programs into `Scored` individuals.

use std::cell::RefCell;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use miscvm::syscalls::{standard_registry, BufferedOutput};
use miscvm::Interpreter;

use misc_maze::{grade_maze_performance, register_maze_syscalls, Maze, MazeLayout};

use crate::crossover::crossover;
use crate::mutation::mutate;
use crate::selection::{select_pairs, Scored};

/// Observer hooks fired at fixed points in each generation, mirroring the
/// `hook_*` callback parameters on `original_source/genetics.py`'s
/// `GeneticAlgo`. All default to no-ops so callers only wire up what they use
/// (the progress-bar consumer in `original_source/bar.py` is the model for
/// `on_next_gen`/`on_log_scores`).
type ScoreLogHook<'a> = Box<dyn FnMut(usize, &[i64]) + 'a>;

pub struct GaHooks<'a> {
    pub on_next_gen: Box<dyn FnMut(usize) + 'a>,
    pub on_log_scores: ScoreLogHook<'a>,
    pub on_selection: Box<dyn FnMut(f64) + 'a>,
    pub on_reproduction: Box<dyn FnMut() + 'a>,
    pub on_finished: Box<dyn FnMut() + 'a>,
}

impl<'a> Default for GaHooks<'a> {
    fn default() -> Self {
        GaHooks {
            on_next_gen: Box::new(|_| {}),
            on_log_scores: Box::new(|_, _| {}),
            on_selection: Box::new(|_| {}),
            on_reproduction: Box::new(|| {}),
            on_finished: Box::new(|| {}),
        }
    }
}

/// Evaluates every program in `population` against a randomly chosen maze
/// from `mazes`, in parallel across the `rayon` global pool. Each individual
/// gets its own PRNG seeded by XOR-ing `master_seed` with its index, so
/// maze selection doesn't correlate across the population.
pub fn evaluate_population(
    population: &[Vec<u8>],
    mazes: &[MazeLayout],
    step_budget: u32,
    master_seed: u64,
) -> Vec<Scored> {
    population
        .par_iter()
        .enumerate()
        .map(|(i, program)| {
            let mut rng = ChaCha8Rng::seed_from_u64(master_seed ^ (i as u64));
            let maze_index = rng.gen_range(0..mazes.len());
            let maze = Rc::new(RefCell::new(Maze::from_layout(mazes[maze_index].clone())));

            let mut registry = standard_registry();
            register_maze_syscalls(&mut registry, maze.clone());
            let mut output = BufferedOutput::new(false);
            let result = Interpreter::new(program, registry, &mut output, Some(step_budget)).run();

            let score = grade_maze_performance(&result, &maze.borrow());
            Scored { program: program.clone(), score }
        })
        .collect()
}

/// The generational genetic search itself: selection, crossover, mutation,
/// repeated for a fixed number of generations.
pub struct GeneticAlgo {
    pub mutation_rate: f64,
    pub crossover_rate: f64,
}

impl GeneticAlgo {
    pub fn new(mutation_rate: f64, crossover_rate: f64) -> GeneticAlgo {
        GeneticAlgo { mutation_rate, crossover_rate }
    }

    /// Runs generations until `exit_criteria` returns true, scoring each with
    /// `test_func` (typically [`evaluate_population`] bound to a fixed maze
    /// test set), and returns the final generation's scored population.
    ///
    /// `exit_criteria` is checked against the population just tested and the
    /// current generation index, mirroring `original_source/genetics.py`'s
    /// `exit_criteria` parameter — pass [`GeneticAlgo::fixed_generations`]
    /// for the common fixed-generation-count case.
    pub fn run(
        &self,
        mut population: Vec<Vec<u8>>,
        mut hooks: GaHooks,
        rng: &mut impl Rng,
        test_func: impl Fn(&[Vec<u8>]) -> Vec<Scored>,
        exit_criteria: impl Fn(&[Vec<u8>], usize) -> bool,
    ) -> Vec<Scored> {
        let mut generation = 0;

        loop {
            (hooks.on_next_gen)(generation);
            let scored_population = test_func(&population);
            let scores: Vec<i64> = scored_population.iter().map(|s| s.score).collect();
            (hooks.on_log_scores)(generation, &scores);

            if exit_criteria(&population, generation) {
                (hooks.on_finished)();
                return scored_population;
            }

            let mean_score = scores.iter().sum::<i64>() as f64 / scores.len() as f64;
            (hooks.on_selection)(mean_score);

            let survivors = select_pairs(&scored_population, rng);
            (hooks.on_reproduction)();

            population = survivors
                .into_iter()
                .flat_map(|(p1, p2)| {
                    let (c1, c2) = crossover(&p1, &p2, self.crossover_rate, rng);
                    vec![mutate(&c1, self.mutation_rate, rng), mutate(&c2, self.mutation_rate, rng)]
                })
                .collect();

            generation += 1;
        }
    }

    /// Builds the default exit criteria: stop once `generation + 1` reaches
    /// `total_generations`, matching the original's fallback when no
    /// `exit_criteria` predicate is supplied.
    pub fn fixed_generations(total_generations: usize) -> impl Fn(&[Vec<u8>], usize) -> bool {
        move |_population, generation| generation + 1 >= total_generations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use misc_maze::Cell;
    use rand::SeedableRng;

    fn corridor() -> MazeLayout {
        let grid = vec![
            vec![Cell::Wall, Cell::Wall, Cell::Wall, Cell::Wall],
            vec![Cell::Wall, Cell::Floor, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Wall, Cell::Wall, Cell::Wall],
        ];
        MazeLayout { width: 4, height: 3, grid, start: (1, 1), finish: (1, 2) }
    }

    #[test]
    fn evaluation_scores_every_individual() {
        let population = vec![vec![0x00, 0x00], vec![0x01, 0x00]];
        let mazes = vec![corridor()];
        let scored = evaluate_population(&population, &mazes, 20, 42);
        assert_eq!(scored.len(), 2);
    }

    #[test]
    fn one_generation_preserves_population_size() {
        let mazes = vec![corridor()];
        let population: Vec<Vec<u8>> = (0..6).map(|i| vec![i as u8, 0x00]).collect();
        let algo = GeneticAlgo::new(0.0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let scored = algo.run(
            population.clone(),
            GaHooks::default(),
            &mut rng,
            |pop| evaluate_population(pop, &mazes, 20, 7),
            GeneticAlgo::fixed_generations(2),
        );
        assert_eq!(scored.len(), population.len());
    }

    #[test]
    fn a_predicate_exit_criteria_stops_the_loop_on_its_own_terms() {
        let mazes = vec![corridor()];
        let population: Vec<Vec<u8>> = (0..4).map(|i| vec![i as u8, 0x00]).collect();
        let algo = GeneticAlgo::new(0.0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let scored = algo.run(
            population.clone(),
            GaHooks::default(),
            &mut rng,
            |pop| evaluate_population(pop, &mazes, 20, 7),
            |_population, _generation| true,
        );
        assert_eq!(scored.len(), population.len());
    }
}
