pub mod crossover;
pub mod mutation;
pub mod population;
pub mod selection;

pub use crossover::crossover;
pub use mutation::mutate;
pub use population::{evaluate_population, GaHooks, GeneticAlgo};
pub use selection::{select_pairs, Scored};
